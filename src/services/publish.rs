//! Publish/upsert engine
//!
//! Publishing a client either creates its page, design table and results row,
//! or resets an existing set in place. Republishing never recreates design
//! rows: the vote link handed to humans must keep pointing at the same
//! records. Prior votes are not discarded silently either, they are folded
//! into a dated archive line at the head of the results-row comment.
//!
//! Writes run in a fixed order with the shared results row last, so a
//! publish that dies halfway leaves a client page without a results row —
//! the one shape of orphan the read path knows how to reconcile. There is
//! no rollback beyond that.

use std::sync::Arc;

use base64::Engine;
use chrono::Utc;
use tracing::{debug, info};

use super::aggregate::AggregateTable;
use super::slug::{slugify, SlugResolver};
use crate::config::AppConfig;
use crate::errors::{Result, VotelinkerError};
use crate::labels::{
    canonical_labels, labels, Lang, DESIGN_TITLE_COL, RANK_SLOTS, RESULT_CLIENT_ID_COL, VARIANTS,
};
use crate::store::{
    BlockContent, CreateDatabase, CreatePage, FileRef, Icon, Parent, Properties, PropertySchema,
    PropertyValue, RecordStore, RichText, SchemaProperties, SelectSchema, SelectValue,
};
use crate::utils::{derive_client_name, validate_url, validation_error_message};

/// Select-option colors for the rank options, in slot order.
const RANK_OPTION_COLORS: [&str; 4] = ["green", "blue", "yellow", "gray"];

/// Request to publish or republish a client.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub site_url: String,
    /// Derived from the site hostname when absent.
    pub client_name: Option<String>,
    pub lang: Lang,
    pub button_color: String,
    pub presence_color: String,
    /// Either a remote image URL or an embedded `data:image/...;base64,` URI.
    pub screenshot: String,
}

/// Result of a publish.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub client_page_id: String,
    pub result_row_id: String,
    pub vote_url: String,
    pub was_update: bool,
}

/// The screenshot as something a `files` property can reference. Embedded
/// binaries are uploaded exactly once and the handle reused for every row.
enum ImageSource {
    Uploaded(String),
    External(String),
}

impl ImageSource {
    fn file_ref(&self, name: &str) -> FileRef {
        match self {
            ImageSource::Uploaded(id) => FileRef::FileUpload {
                file_upload: crate::store::models::FileUploadRef { id: id.clone() },
                name: Some(name.to_string()),
            },
            ImageSource::External(url) => FileRef::External {
                external: crate::store::models::FileUrl { url: url.clone() },
                name: Some(name.to_string()),
            },
        }
    }
}

pub struct PublishEngine {
    store: Arc<dyn RecordStore>,
    resolver: SlugResolver,
    aggregate: AggregateTable,
    config: Arc<AppConfig>,
}

impl PublishEngine {
    pub fn new(store: Arc<dyn RecordStore>, config: Arc<AppConfig>) -> Self {
        let resolver = SlugResolver::new(
            store.clone(),
            &config.store.workspace_root_id,
            config.store.scan_page_size,
        );
        let aggregate = AggregateTable::new(store.clone(), &config.store.workspace_root_id);
        Self {
            store,
            resolver,
            aggregate,
            config,
        }
    }

    pub fn publish(&self, request: PublishRequest) -> Result<PublishResult> {
        let site_url = validate_url(&request.site_url)
            .map_err(|e| VotelinkerError::validation(validation_error_message(&e)))?;

        let client_name = match request
            .client_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            Some(name) => name.to_string(),
            None => derive_client_name(&site_url).ok_or_else(|| {
                VotelinkerError::validation("cannot derive a client name from the site URL")
            })?,
        };

        let slug = slugify(&client_name);
        let vote_url = self.config.vote_url(&slug);

        let image = self.prepare_image(&request.screenshot)?;

        // An existing client page means republish; NotFound means first
        // publish. Any other resolver failure aborts.
        let existing_client = match self.resolver.resolve(&slug) {
            Ok(id) => Some(id),
            Err(VotelinkerError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        let was_update = existing_client.is_some();

        let client_page_id = match existing_client {
            Some(page_id) => {
                info!("republishing {client_name} onto existing page {page_id}");
                self.reset_client_page(&page_id, &request, &image)?;
                page_id
            }
            None => {
                info!("first publish for {client_name}");
                self.create_client_page(&client_name, &request, site_url.as_str(), &image)?
            }
        };

        // Shared results row goes last: a failure above leaves nothing in
        // the shared table pointing at a half-built client.
        let table_id = self.aggregate.find_or_create(request.lang)?;
        let result_row_id = self.upsert_result_row(
            &table_id,
            &client_name,
            &client_page_id,
            &vote_url,
            site_url.as_str(),
        )?;

        Ok(PublishResult {
            client_page_id,
            result_row_id,
            vote_url,
            was_update,
        })
    }

    fn prepare_image(&self, screenshot: &str) -> Result<ImageSource> {
        if let Some(rest) = screenshot.strip_prefix("data:") {
            let (mime, data) = rest.split_once(";base64,").ok_or_else(|| {
                VotelinkerError::validation("screenshot data URI must be base64-encoded")
            })?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data.trim())
                .map_err(|e| {
                    VotelinkerError::validation(format!("screenshot base64 is invalid: {e}"))
                })?;
            let content_type = if mime.is_empty() { "image/png" } else { mime };
            let upload_id = self
                .store
                .upload_file("screenshot.png", content_type, &bytes)?;
            debug!("uploaded embedded screenshot as {upload_id}");
            Ok(ImageSource::Uploaded(upload_id))
        } else {
            validate_url(screenshot)
                .map_err(|e| VotelinkerError::validation(validation_error_message(&e)))?;
            Ok(ImageSource::External(screenshot.to_string()))
        }
    }

    /// Republish path: reset every design row in place and refresh the color
    /// block. Row identity survives so external references stay valid.
    fn reset_client_page(
        &self,
        page_id: &str,
        request: &PublishRequest,
        image: &ImageSource,
    ) -> Result<()> {
        let blocks = self.store.list_children(page_id, None, 20)?;

        for block in &blocks.results {
            if let BlockContent::Code { .. } = block.content {
                self.store.update_block(
                    &block.id,
                    BlockContent::code(color_settings_json(request), "json"),
                )?;
                break;
            }
        }

        let database_id = blocks
            .results
            .iter()
            .find_map(|b| match &b.content {
                BlockContent::ChildDatabase { .. } => Some(b.id.clone()),
                _ => None,
            })
            .ok_or_else(|| VotelinkerError::not_found("no database found on this page"))?;

        // Clearing must use the table's stored language, which can differ
        // from the language of this republish.
        let database = self.store.retrieve_database(&database_id)?;
        let stored_labels = labels(Lang::detect(database.column_names()));

        let rows = self.store.query_rows(&database_id, None, 10)?;
        for (i, row) in rows.results.iter().enumerate() {
            let letter = VARIANTS.get(i).map(|v| v.letter).unwrap_or("X");
            let mut properties = Properties::new();
            properties.insert(
                stored_labels.ranking.to_string(),
                PropertyValue::select_none(),
            );
            properties.insert(
                stored_labels.comment.to_string(),
                PropertyValue::rich_text(""),
            );
            properties.insert(
                stored_labels.image.to_string(),
                PropertyValue::files(vec![image.file_ref(&format!("widget-{letter}.png"))]),
            );
            self.store.update_page(&row.id, properties)?;
        }

        Ok(())
    }

    /// First-publish path: client page, color block, design table and one
    /// row per variant in the fixed canonical order.
    fn create_client_page(
        &self,
        client_name: &str,
        request: &PublishRequest,
        site_url: &str,
        image: &ImageSource,
    ) -> Result<String> {
        let label_set = labels(request.lang);

        let mut page_properties = Properties::new();
        page_properties.insert("title".to_string(), PropertyValue::title(client_name));

        let page = self.store.create_page(CreatePage {
            parent: Parent::PageId {
                page_id: self.config.store.workspace_root_id.clone(),
            },
            icon: Some(Icon::Emoji {
                emoji: "🎨".into(),
            }),
            properties: page_properties,
            children: vec![
                BlockContent::paragraph(vec![RichText::linked(site_url, site_url)]),
                BlockContent::code(color_settings_json(request), "json"),
            ],
        })?;

        let mut schema = SchemaProperties::new();
        schema.insert(DESIGN_TITLE_COL.to_string(), PropertySchema::Title {});
        schema.insert(label_set.image.to_string(), PropertySchema::Files {});
        schema.insert(label_set.description.to_string(), PropertySchema::RichText {});
        schema.insert(label_set.recommended.to_string(), PropertySchema::Checkbox {});
        schema.insert(
            label_set.ranking.to_string(),
            PropertySchema::Select {
                select: SelectSchema {
                    options: label_set
                        .rank_options
                        .iter()
                        .enumerate()
                        .map(|(i, name)| SelectValue {
                            name: (*name).to_string(),
                            color: RANK_OPTION_COLORS.get(i).map(|c| (*c).to_string()),
                        })
                        .collect(),
                },
            },
        );
        schema.insert(label_set.comment.to_string(), PropertySchema::RichText {});

        let database = self.store.create_database(CreateDatabase {
            parent: Parent::PageId {
                page_id: page.id.clone(),
            },
            title: vec![RichText::plain(label_set.db_title)],
            is_inline: true,
            icon: Some(Icon::Emoji {
                emoji: "🗳️".into(),
            }),
            properties: schema,
        })?;

        for variant in &VARIANTS {
            let mut properties = Properties::new();
            properties.insert(
                DESIGN_TITLE_COL.to_string(),
                PropertyValue::title(variant.row_title(request.lang)),
            );
            properties.insert(
                label_set.description.to_string(),
                PropertyValue::rich_text(variant.description(request.lang)),
            );
            properties.insert(
                label_set.recommended.to_string(),
                PropertyValue::checkbox(variant.recommended),
            );
            properties.insert(
                label_set.image.to_string(),
                PropertyValue::files(vec![
                    image.file_ref(&format!("widget-{}.png", variant.letter))
                ]),
            );
            self.store.create_page(CreatePage {
                parent: Parent::DatabaseId {
                    database_id: database.id.clone(),
                },
                icon: None,
                properties,
                children: Vec::new(),
            })?;
        }

        Ok(page.id)
    }

    /// Results-row upsert. On republish the prior ranking is archived into
    /// the comment, the rank columns and date cleared, the links refreshed.
    fn upsert_result_row(
        &self,
        table_id: &str,
        client_name: &str,
        client_page_id: &str,
        vote_url: &str,
        site_url: &str,
    ) -> Result<String> {
        let existing = self
            .aggregate
            .find_row(table_id, client_page_id, Some(client_name))?;

        let Some(row) = existing else {
            let row = self.aggregate.create_row(
                table_id,
                client_name,
                client_page_id,
                vote_url,
                Some(site_url),
            )?;
            return Ok(row.id);
        };

        let canonical = canonical_labels();

        let prior_ranks: Vec<String> = canonical
            .result_rank_cols
            .iter()
            .take(RANK_SLOTS)
            .filter_map(|col| row.property(col).and_then(|p| p.as_plain_text()))
            .filter(|text| !text.is_empty())
            .collect();
        let prior_comment = row
            .property(canonical.result_comment)
            .and_then(|p| p.as_plain_text())
            .unwrap_or_default();

        let comment = if prior_ranks.is_empty() {
            prior_comment
        } else {
            let archive = archive_line(&prior_ranks);
            if prior_comment.is_empty() {
                archive
            } else {
                format!("{archive}\n{prior_comment}")
            }
        };

        let mut properties = Properties::new();
        for col in canonical.result_rank_cols.iter().take(RANK_SLOTS) {
            properties.insert(col.to_string(), PropertyValue::rich_text(""));
        }
        properties.insert(
            canonical.result_comment.to_string(),
            PropertyValue::rich_text(comment),
        );
        properties.insert(canonical.result_date.to_string(), PropertyValue::date_none());
        properties.insert(
            canonical.result_vote_link.to_string(),
            PropertyValue::url(vote_url),
        );
        properties.insert(
            canonical.result_site_link.to_string(),
            PropertyValue::url(site_url),
        );
        properties.insert(
            RESULT_CLIENT_ID_COL.to_string(),
            PropertyValue::rich_text(client_page_id),
        );

        let updated = self.store.update_page(&row.id, properties)?;
        Ok(updated.id)
    }
}

fn color_settings_json(request: &PublishRequest) -> String {
    serde_json::json!({
        "buttonColor": request.button_color,
        "presenceColor": request.presence_color,
    })
    .to_string()
}

/// `[Archive DD/MM: first, second, third]`
fn archive_line(ranked_titles: &[String]) -> String {
    format!(
        "[Archive {}: {}]",
        Utc::now().format("%d/%m"),
        ranked_titles.join(", ")
    )
}
