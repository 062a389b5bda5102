//! Record store access layer
//!
//! All persisted state lives in an external workspace/document store. The
//! [`RecordStore`] trait is the seam the whole service is written against:
//! the HTTP backend talks to the remote API, the in-memory backend backs the
//! test suite.

use crate::errors::Result;

pub mod http;
pub mod memory;
pub mod models;

pub use http::HttpRecordStore;
pub use memory::MemoryRecordStore;
pub use models::{
    Block, BlockContent, BlockList, CreateDatabase, CreatePage, Database, FileRef, Icon, Page,
    Parent, Properties, PropertySchema, PropertyValue, RichText, RowFilter, RowList,
    SchemaProperties, SelectSchema, SelectValue,
};

/// Typed operations against the workspace store.
///
/// Calls are synchronous with bounded timeouts and no automatic retry;
/// callers hop onto a blocking thread before invoking them.
pub trait RecordStore: Send + Sync {
    /// Fetch a page by id.
    fn retrieve_page(&self, page_id: &str) -> Result<Page>;

    /// Create a page (standalone or as a database row).
    fn create_page(&self, request: CreatePage) -> Result<Page>;

    /// Overwrite the given properties of a page, returning the updated page.
    fn update_page(&self, page_id: &str, properties: Properties) -> Result<Page>;

    /// One page of the child blocks of a page, `page_size` at a time.
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<BlockList>;

    /// Replace the content of a child block.
    fn update_block(&self, block_id: &str, content: BlockContent) -> Result<Block>;

    /// Create a nested database.
    fn create_database(&self, request: CreateDatabase) -> Result<Database>;

    /// Fetch a database with its column schema.
    fn retrieve_database(&self, database_id: &str) -> Result<Database>;

    /// Query rows of a database, optionally filtered.
    fn query_rows(
        &self,
        database_id: &str,
        filter: Option<&RowFilter>,
        page_size: usize,
    ) -> Result<RowList>;

    /// Upload a binary and return a file reference id usable in `files`
    /// properties. The wire protocol is two-phase (register, then send
    /// bytes); backends hide that behind a single call.
    fn upload_file(&self, filename: &str, content_type: &str, bytes: &[u8]) -> Result<String>;
}
