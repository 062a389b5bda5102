//! Shared results table access
//!
//! A single table under the workspace root holds one row per client with the
//! latest ranking. Rows are joined to client pages by an explicit client-id
//! column; matching on the display name remains as a fallback for rows
//! written before that column existed.

use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::labels::{
    labels, Lang, RANK_SLOTS, RESULTS_DB_TITLES, RESULT_CLIENT_COL, RESULT_CLIENT_ID_COL,
};
use crate::store::{
    BlockContent, CreateDatabase, CreatePage, Icon, Page, Parent, Properties, PropertySchema,
    PropertyValue, RecordStore, RichText, RowFilter, SchemaProperties,
};

/// Page size used when scanning the root for the results table.
const ROOT_SCAN_PAGE_SIZE: usize = 50;

pub struct AggregateTable {
    store: Arc<dyn RecordStore>,
    root_id: String,
}

impl AggregateTable {
    pub fn new(store: Arc<dyn RecordStore>, root_id: &str) -> Self {
        Self {
            store,
            root_id: root_id.to_string(),
        }
    }

    /// Locate the shared results table under the root, matching any
    /// localized title.
    pub fn find(&self) -> Result<Option<String>> {
        let mut cursor: Option<String> = None;
        loop {
            let batch =
                self.store
                    .list_children(&self.root_id, cursor.as_deref(), ROOT_SCAN_PAGE_SIZE)?;
            for block in &batch.results {
                if let BlockContent::ChildDatabase { child_database } = &block.content {
                    if RESULTS_DB_TITLES.contains(&child_database.title.as_str()) {
                        return Ok(Some(block.id.clone()));
                    }
                }
            }
            cursor = batch.has_more.then_some(batch.next_cursor).flatten();
            if cursor.is_none() {
                return Ok(None);
            }
        }
    }

    /// Locate the results table, creating it with the canonical schema when
    /// absent. The table title follows the language of the client whose
    /// publish triggered the creation; the columns are always canonical so
    /// every later write lands on the same names.
    pub fn find_or_create(&self, lang: Lang) -> Result<String> {
        if let Some(id) = self.find()? {
            return Ok(id);
        }

        debug!("results table missing, creating it");
        let canonical = labels(Lang::Fr);

        let mut properties = SchemaProperties::new();
        properties.insert(RESULT_CLIENT_COL.to_string(), PropertySchema::Title {});
        for col in canonical.result_rank_cols.iter().take(RANK_SLOTS) {
            properties.insert(col.to_string(), PropertySchema::RichText {});
        }
        properties.insert(
            canonical.result_comment.to_string(),
            PropertySchema::RichText {},
        );
        properties.insert(canonical.result_date.to_string(), PropertySchema::Date {});
        properties.insert(canonical.result_vote_link.to_string(), PropertySchema::Url {});
        properties.insert(canonical.result_site_link.to_string(), PropertySchema::Url {});
        properties.insert(RESULT_CLIENT_ID_COL.to_string(), PropertySchema::RichText {});

        let database = self.store.create_database(CreateDatabase {
            parent: Parent::PageId {
                page_id: self.root_id.clone(),
            },
            title: vec![RichText::plain(labels(lang).results_db_title)],
            is_inline: true,
            icon: Some(Icon::Emoji {
                emoji: "📊".into(),
            }),
            properties,
        })?;
        Ok(database.id)
    }

    /// Find a client's row: by client id first, by display name as fallback.
    pub fn find_row(
        &self,
        table_id: &str,
        client_page_id: &str,
        client_name: Option<&str>,
    ) -> Result<Option<Page>> {
        let by_id = RowFilter::RichTextEquals {
            property: RESULT_CLIENT_ID_COL.to_string(),
            value: client_page_id.to_string(),
        };
        let rows = self.store.query_rows(table_id, Some(&by_id), 1)?;
        if let Some(row) = rows.results.into_iter().next() {
            return Ok(Some(row));
        }

        if let Some(name) = client_name {
            let by_name = RowFilter::TitleEquals {
                property: RESULT_CLIENT_COL.to_string(),
                value: name.to_string(),
            };
            let rows = self.store.query_rows(table_id, Some(&by_name), 1)?;
            return Ok(rows.results.into_iter().next());
        }

        Ok(None)
    }

    /// Append a fresh row for a client.
    pub fn create_row(
        &self,
        table_id: &str,
        client_name: &str,
        client_page_id: &str,
        vote_url: &str,
        site_url: Option<&str>,
    ) -> Result<Page> {
        let canonical = labels(Lang::Fr);

        let mut properties = Properties::new();
        properties.insert(
            RESULT_CLIENT_COL.to_string(),
            PropertyValue::title(client_name),
        );
        properties.insert(
            RESULT_CLIENT_ID_COL.to_string(),
            PropertyValue::rich_text(client_page_id),
        );
        properties.insert(
            canonical.result_vote_link.to_string(),
            PropertyValue::url(vote_url),
        );
        if let Some(site_url) = site_url {
            properties.insert(
                canonical.result_site_link.to_string(),
                PropertyValue::url(site_url),
            );
        }

        self.store.create_page(CreatePage {
            parent: Parent::DatabaseId {
                database_id: table_id.to_string(),
            },
            icon: None,
            properties,
            children: Vec::new(),
        })
    }
}
