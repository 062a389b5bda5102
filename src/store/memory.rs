//! In-memory record store backend
//!
//! Mutex-guarded maps standing in for the remote workspace. Used by the test
//! suite and by local experiments that should not touch a real workspace.
//! Behavior mirrors the remote store where it matters: uploads referenced by
//! a `files` property come back as hosted files with a synthetic URL.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::models::{
    Block, BlockContent, BlockList, BlockTitle, CreateDatabase, CreatePage, Database, FileRef,
    FileUrl, Page, Parent, Properties, PropertyValue, RowFilter, RowList,
};
use super::RecordStore;
use crate::errors::{Result, VotelinkerError};

#[derive(Default)]
struct Inner {
    pages: HashMap<String, Page>,
    databases: HashMap<String, Database>,
    /// Ordered child blocks per parent (pages and the workspace root).
    children: HashMap<String, Vec<Block>>,
    /// Ordered row page ids per database.
    rows: HashMap<String, Vec<String>>,
    uploads: HashMap<String, Vec<u8>>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Uploaded file references turn into hosted files on read-back, the way
    /// the remote store resolves them.
    fn resolve_files(inner: &Inner, properties: &mut Properties) {
        for value in properties.values_mut() {
            if let PropertyValue::Files { files } = value {
                for file in files.iter_mut() {
                    if let FileRef::FileUpload { file_upload, name } = file {
                        if inner.uploads.contains_key(&file_upload.id) {
                            *file = FileRef::File {
                                file: FileUrl {
                                    url: format!("memstore://files/{}", file_upload.id),
                                },
                                name: name.clone(),
                            };
                        }
                    }
                }
            }
        }
    }

    /// Number of binaries uploaded so far (test inspection).
    pub fn upload_count(&self) -> usize {
        self.inner.lock().unwrap().uploads.len()
    }

    /// Ids of the rows of a database, in insertion order (test inspection).
    pub fn row_ids(&self, database_id: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .get(database_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        let inner = self.inner.lock().unwrap();
        inner
            .pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| VotelinkerError::store_operation(format!("page {page_id} not found")))
    }

    fn create_page(&self, request: CreatePage) -> Result<Page> {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::new_id();

        let mut properties = request.properties;
        Self::resolve_files(&inner, &mut properties);

        let page = Page {
            id: id.clone(),
            properties,
            url: Some(format!("memstore://pages/{id}")),
        };

        match request.parent {
            Parent::PageId { page_id } => {
                let title = page.title_text().unwrap_or_default();
                inner.children.entry(page_id).or_default().push(Block {
                    id: id.clone(),
                    content: BlockContent::ChildPage {
                        child_page: BlockTitle { title },
                    },
                });
            }
            Parent::DatabaseId { database_id } => {
                if !inner.databases.contains_key(&database_id) {
                    return Err(VotelinkerError::store_operation(format!(
                        "database {database_id} not found"
                    )));
                }
                inner.rows.entry(database_id).or_default().push(id.clone());
            }
        }

        // Child blocks supplied at creation become the page's block list.
        let blocks: Vec<Block> = request
            .children
            .into_iter()
            .map(|content| Block {
                id: Self::new_id(),
                content,
            })
            .collect();
        if !blocks.is_empty() {
            inner.children.entry(id.clone()).or_default().extend(blocks);
        }

        inner.pages.insert(id.clone(), page.clone());
        Ok(page)
    }

    fn update_page(&self, page_id: &str, properties: Properties) -> Result<Page> {
        let mut inner = self.inner.lock().unwrap();

        let mut properties = properties;
        Self::resolve_files(&inner, &mut properties);

        let page = inner
            .pages
            .get_mut(page_id)
            .ok_or_else(|| VotelinkerError::store_operation(format!("page {page_id} not found")))?;
        for (name, value) in properties {
            page.properties.insert(name, value);
        }
        Ok(page.clone())
    }

    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<BlockList> {
        let inner = self.inner.lock().unwrap();
        let all = inner.children.get(block_id).cloned().unwrap_or_default();

        let start = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| VotelinkerError::store_operation(format!("bad cursor: {cursor}")))?,
            None => 0,
        };
        let end = (start + page_size.max(1)).min(all.len());
        let has_more = end < all.len();

        Ok(BlockList {
            results: all[start.min(all.len())..end].to_vec(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }

    fn update_block(&self, block_id: &str, content: BlockContent) -> Result<Block> {
        let mut inner = self.inner.lock().unwrap();
        for blocks in inner.children.values_mut() {
            if let Some(block) = blocks.iter_mut().find(|b| b.id == block_id) {
                block.content = content;
                return Ok(block.clone());
            }
        }
        Err(VotelinkerError::store_operation(format!(
            "block {block_id} not found"
        )))
    }

    fn create_database(&self, request: CreateDatabase) -> Result<Database> {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::new_id();

        let database = Database {
            id: id.clone(),
            title: request.title,
            properties: request.properties,
        };

        let Parent::PageId { page_id } = request.parent else {
            return Err(VotelinkerError::store_operation(
                "databases can only be created under a page",
            ));
        };
        inner.children.entry(page_id).or_default().push(Block {
            id: id.clone(),
            content: BlockContent::ChildDatabase {
                child_database: BlockTitle {
                    title: database.title_text(),
                },
            },
        });

        inner.rows.insert(id.clone(), Vec::new());
        inner.databases.insert(id.clone(), database.clone());
        Ok(database)
    }

    fn retrieve_database(&self, database_id: &str) -> Result<Database> {
        let inner = self.inner.lock().unwrap();
        inner.databases.get(database_id).cloned().ok_or_else(|| {
            VotelinkerError::store_operation(format!("database {database_id} not found"))
        })
    }

    fn query_rows(
        &self,
        database_id: &str,
        filter: Option<&RowFilter>,
        page_size: usize,
    ) -> Result<RowList> {
        let inner = self.inner.lock().unwrap();
        let row_ids = inner.rows.get(database_id).ok_or_else(|| {
            VotelinkerError::store_operation(format!("database {database_id} not found"))
        })?;

        let results = row_ids
            .iter()
            .filter_map(|id| inner.pages.get(id))
            .filter(|page| filter.is_none_or(|f| row_matches(page, f)))
            .take(page_size.max(1))
            .cloned()
            .collect();

        Ok(RowList { results })
    }

    fn upload_file(&self, _filename: &str, _content_type: &str, bytes: &[u8]) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let id = Self::new_id();
        inner.uploads.insert(id.clone(), bytes.to_vec());
        Ok(id)
    }
}

fn row_matches(page: &Page, filter: &RowFilter) -> bool {
    match filter {
        RowFilter::TitleEquals { property, value } => page
            .property(property)
            .and_then(|p| match p {
                PropertyValue::Title { .. } => p.as_plain_text(),
                _ => None,
            })
            .is_some_and(|text| text == *value),
        RowFilter::RichTextEquals { property, value } => page
            .property(property)
            .and_then(|p| match p {
                PropertyValue::RichText { .. } => p.as_plain_text(),
                _ => None,
            })
            .is_some_and(|text| text == *value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{FileUploadRef, Icon, RichText};

    fn root_page(store: &MemoryRecordStore) -> Page {
        // A root to parent everything under; the workspace root is just a
        // page id the store never needs to resolve.
        let mut properties = Properties::new();
        properties.insert("title".into(), PropertyValue::title("Root"));
        store
            .create_page(CreatePage {
                parent: Parent::PageId {
                    page_id: "workspace".into(),
                },
                icon: None,
                properties,
                children: Vec::new(),
            })
            .unwrap()
    }

    #[test]
    fn test_create_page_registers_child_block() {
        let store = MemoryRecordStore::new();
        let root = root_page(&store);

        let mut properties = Properties::new();
        properties.insert("title".into(), PropertyValue::title("Acme"));
        store
            .create_page(CreatePage {
                parent: Parent::PageId {
                    page_id: root.id.clone(),
                },
                icon: Some(Icon::Emoji {
                    emoji: "🎨".into(),
                }),
                properties,
                children: Vec::new(),
            })
            .unwrap();

        let children = store.list_children(&root.id, None, 100).unwrap();
        assert_eq!(children.results.len(), 1);
        match &children.results[0].content {
            BlockContent::ChildPage { child_page } => assert_eq!(child_page.title, "Acme"),
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn test_list_children_pagination() {
        let store = MemoryRecordStore::new();
        let root = root_page(&store);

        for i in 0..5 {
            let mut properties = Properties::new();
            properties.insert("title".into(), PropertyValue::title(format!("Page {i}")));
            store
                .create_page(CreatePage {
                    parent: Parent::PageId {
                        page_id: root.id.clone(),
                    },
                    icon: None,
                    properties,
                    children: Vec::new(),
                })
                .unwrap();
        }

        let first = store.list_children(&root.id, None, 2).unwrap();
        assert_eq!(first.results.len(), 2);
        assert!(first.has_more);

        let second = store
            .list_children(&root.id, first.next_cursor.as_deref(), 2)
            .unwrap();
        assert_eq!(second.results.len(), 2);
        assert!(second.has_more);

        let third = store
            .list_children(&root.id, second.next_cursor.as_deref(), 2)
            .unwrap();
        assert_eq!(third.results.len(), 1);
        assert!(!third.has_more);
        assert!(third.next_cursor.is_none());
    }

    #[test]
    fn test_query_rows_title_filter() {
        let store = MemoryRecordStore::new();
        let root = root_page(&store);

        let database = store
            .create_database(CreateDatabase {
                parent: Parent::PageId {
                    page_id: root.id.clone(),
                },
                title: vec![RichText::plain("Résultats")],
                is_inline: true,
                icon: None,
                properties: Default::default(),
            })
            .unwrap();

        for name in ["Acme", "Globex"] {
            let mut properties = Properties::new();
            properties.insert("Client".into(), PropertyValue::title(name));
            store
                .create_page(CreatePage {
                    parent: Parent::DatabaseId {
                        database_id: database.id.clone(),
                    },
                    icon: None,
                    properties,
                    children: Vec::new(),
                })
                .unwrap();
        }

        let filter = RowFilter::TitleEquals {
            property: "Client".into(),
            value: "Acme".into(),
        };
        let rows = store.query_rows(&database.id, Some(&filter), 10).unwrap();
        assert_eq!(rows.results.len(), 1);
        assert_eq!(rows.results[0].title_text().as_deref(), Some("Acme"));
    }

    #[test]
    fn test_upload_resolves_to_hosted_file() {
        let store = MemoryRecordStore::new();
        let root = root_page(&store);
        let upload_id = store
            .upload_file("shot.png", "image/png", b"\x89PNG")
            .unwrap();

        let mut properties = Properties::new();
        properties.insert("title".into(), PropertyValue::title("Acme"));
        properties.insert(
            "Image".into(),
            PropertyValue::files(vec![FileRef::FileUpload {
                file_upload: FileUploadRef {
                    id: upload_id.clone(),
                },
                name: Some("shot.png".into()),
            }]),
        );
        let page = store
            .create_page(CreatePage {
                parent: Parent::PageId {
                    page_id: root.id,
                },
                icon: None,
                properties,
                children: Vec::new(),
            })
            .unwrap();

        let url = page.property("Image").unwrap().as_first_file_url().unwrap();
        assert_eq!(url, format!("memstore://files/{upload_id}"));
    }
}
