//! HTTP backend for the record store
//!
//! Thin `ureq` client over the workspace REST API. Requests carry a bearer
//! token and share one agent with a global timeout; there is no automatic
//! retry, a failed call surfaces immediately.

use std::time::Duration;

use serde_json::json;
use tracing::trace;
use ureq::Agent;

use super::models::{
    Block, BlockContent, BlockList, CreateDatabase, CreatePage, Database, Page, Properties,
    RowFilter, RowList,
};
use super::RecordStore;
use crate::errors::{Result, VotelinkerError};

/// Store calls get a few seconds each, like every outbound dependency.
const STORE_TIMEOUT_SECS: u64 = 8;

pub struct HttpRecordStore {
    agent: Agent,
    base_url: String,
    token: String,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, token: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(STORE_TIMEOUT_SECS)))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.endpoint(path);
        trace!("store GET {}", url);
        let response = self
            .agent
            .get(&url)
            .header("Authorization", self.auth_header().as_str())
            .call()
            .map_err(|e| map_store_err(e, what))?;
        response
            .into_body()
            .read_json()
            .map_err(|e| VotelinkerError::serialization(format!("{what}: {e}")))
    }

    fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl serde::Serialize,
        what: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        trace!("store {} {}", method.as_str(), url);
        let request = match method {
            Method::Post => self.agent.post(&url),
            Method::Patch => self.agent.patch(&url),
        };
        let response = request
            .header("Authorization", self.auth_header().as_str())
            .send_json(body)
            .map_err(|e| map_store_err(e, what))?;
        response
            .into_body()
            .read_json()
            .map_err(|e| VotelinkerError::serialization(format!("{what}: {e}")))
    }
}

#[derive(Clone, Copy)]
enum Method {
    Post,
    Patch,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// Transport failures are connection errors, everything the remote side
/// answered (including non-2xx) is an operation error.
fn map_store_err(err: ureq::Error, what: &str) -> VotelinkerError {
    match err {
        ureq::Error::StatusCode(code) => {
            VotelinkerError::store_operation(format!("{what} failed with status {code}"))
        }
        other => VotelinkerError::store_connection(format!("{what}: {other}")),
    }
}

fn filter_json(filter: &RowFilter) -> serde_json::Value {
    match filter {
        RowFilter::TitleEquals { property, value } => json!({
            "property": property,
            "title": { "equals": value },
        }),
        RowFilter::RichTextEquals { property, value } => json!({
            "property": property,
            "rich_text": { "equals": value },
        }),
    }
}

impl RecordStore for HttpRecordStore {
    fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        self.get_json(&format!("pages/{page_id}"), "retrieve page")
    }

    fn create_page(&self, request: CreatePage) -> Result<Page> {
        self.send_json(Method::Post, "pages", &request, "create page")
    }

    fn update_page(&self, page_id: &str, properties: Properties) -> Result<Page> {
        self.send_json(
            Method::Patch,
            &format!("pages/{page_id}"),
            &json!({ "properties": properties }),
            "update page",
        )
    }

    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<BlockList> {
        let mut path = format!("blocks/{block_id}/children?page_size={page_size}");
        if let Some(cursor) = cursor {
            path.push_str("&start_cursor=");
            path.push_str(&urlencoding::encode(cursor));
        }
        self.get_json(&path, "list children")
    }

    fn update_block(&self, block_id: &str, content: BlockContent) -> Result<Block> {
        self.send_json(
            Method::Patch,
            &format!("blocks/{block_id}"),
            &content,
            "update block",
        )
    }

    fn create_database(&self, request: CreateDatabase) -> Result<Database> {
        self.send_json(Method::Post, "databases", &request, "create database")
    }

    fn retrieve_database(&self, database_id: &str) -> Result<Database> {
        self.get_json(&format!("databases/{database_id}"), "retrieve database")
    }

    fn query_rows(
        &self,
        database_id: &str,
        filter: Option<&RowFilter>,
        page_size: usize,
    ) -> Result<RowList> {
        let mut body = json!({ "page_size": page_size });
        if let Some(filter) = filter {
            body["filter"] = filter_json(filter);
        }
        self.send_json(
            Method::Post,
            &format!("databases/{database_id}/query"),
            &body,
            "query rows",
        )
    }

    fn upload_file(&self, filename: &str, content_type: &str, bytes: &[u8]) -> Result<String> {
        // Two-phase: register the upload, then push the bytes.
        #[derive(serde::Deserialize)]
        struct UploadHandle {
            id: String,
        }

        let handle: UploadHandle = self.send_json(
            Method::Post,
            "file_uploads",
            &json!({
                "mode": "single_part",
                "filename": filename,
                "content_type": content_type,
            }),
            "register upload",
        )?;

        self.agent
            .post(&self.endpoint(&format!("file_uploads/{}/send", handle.id)))
            .header("Authorization", self.auth_header().as_str())
            .header("Content-Type", content_type)
            .send(bytes)
            .map_err(|e| map_store_err(e, "send upload"))?;

        Ok(handle.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_json_title_equals() {
        let filter = RowFilter::TitleEquals {
            property: "Client".into(),
            value: "Acme".into(),
        };
        let json = filter_json(&filter);
        assert_eq!(json["property"], "Client");
        assert_eq!(json["title"]["equals"], "Acme");
    }

    #[test]
    fn test_filter_json_rich_text_equals() {
        let filter = RowFilter::RichTextEquals {
            property: "Client ID".into(),
            value: "abc123".into(),
        };
        let json = filter_json(&filter);
        assert_eq!(json["rich_text"]["equals"], "abc123");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpRecordStore::new("https://api.example.com/v1/", "secret");
        assert_eq!(store.endpoint("pages/x"), "https://api.example.com/v1/pages/x");
    }
}
