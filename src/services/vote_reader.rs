//! Vote data assembly
//!
//! Builds the consolidated view a voting page needs: the client's display
//! name, the design rows with their current ranks, whether a ballot was
//! already cast, and the client's row in the shared results table.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::aggregate::AggregateTable;
use super::slug::{slugify, SlugResolver};
use crate::config::AppConfig;
use crate::errors::{Result, VotelinkerError};
use crate::labels::{labels, LabelSet, Lang, DESIGN_TITLE_COL, PLACEHOLDER_CLIENT_NAME};
use crate::store::{Block, BlockContent, Page, RecordStore};
use crate::store::models::plain_text;

/// Child blocks fetched from a client page. A client page holds a site-link
/// paragraph, a color block and the design table, so one small page is
/// plenty.
const CLIENT_PAGE_BLOCK_LIMIT: usize = 20;

/// Design tables hold 4-6 rows, no pagination loop needed.
const DESIGN_ROW_LIMIT: usize = 10;

/// One design row as shown to voters.
#[derive(Debug, Clone)]
pub struct VoteDesign {
    pub page_id: String,
    pub title: String,
    pub description: String,
    pub recommended: bool,
    pub image_url: String,
    pub ranking: Option<String>,
    pub comment: String,
}

/// Everything a voting page load needs.
#[derive(Debug, Clone)]
pub struct VoteView {
    pub client_name: String,
    pub database_id: String,
    pub lang: Lang,
    pub labels: LabelSet,
    pub designs: Vec<VoteDesign>,
    pub has_voted: bool,
    pub result_row_id: Option<String>,
    pub button_color: Option<String>,
    pub presence_color: Option<String>,
}

/// Color pair persisted as a JSON code block on the client page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorSettings {
    button_color: Option<String>,
    presence_color: Option<String>,
}

pub struct VoteReader {
    store: Arc<dyn RecordStore>,
    resolver: SlugResolver,
    aggregate: AggregateTable,
    config: Arc<AppConfig>,
}

impl VoteReader {
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

    /// Assemble the vote view for a slug or record id.
    pub fn read(&self, identifier: &str) -> Result<VoteView> {
        let page_id = self.resolver.resolve(identifier)?;

        let page = self.store.retrieve_page(&page_id)?;
        let client_name = page
            .title_text()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_CLIENT_NAME.to_string());

        let blocks = self
            .store
            .list_children(&page_id, None, CLIENT_PAGE_BLOCK_LIMIT)?;

        let colors = extract_colors(&blocks.results);
        let site_url = extract_site_url(&blocks.results);

        let database_id = blocks
            .results
            .iter()
            .find_map(|b| match &b.content {
                BlockContent::ChildDatabase { .. } => Some(b.id.clone()),
                _ => None,
            })
            .ok_or_else(|| VotelinkerError::not_found("no database found on this page"))?;

        let database = self.store.retrieve_database(&database_id)?;
        let lang = Lang::detect(database.column_names());
        let label_set = labels(lang);

        let rows = self.store.query_rows(&database_id, None, DESIGN_ROW_LIMIT)?;
        let designs: Vec<VoteDesign> = rows
            .results
            .iter()
            .map(|row| design_from_row(row, label_set))
            .collect();

        let has_voted = designs.iter().any(|d| d.ranking.is_some());

        // Best-effort: voting works without a linked results row, the
        // submission path just degrades to per-design writes.
        let result_row_id = match self.locate_or_repair_row(&page_id, &client_name, site_url.as_deref())
        {
            Ok(row_id) => row_id,
            Err(e) => {
                warn!("failed to locate results row for {client_name}: {e}");
                None
            }
        };

        Ok(VoteView {
            client_name,
            database_id,
            lang,
            labels: label_set.clone(),
            designs,
            has_voted,
            result_row_id,
            button_color: colors.button_color,
            presence_color: colors.presence_color,
        })
    }

    /// Locate the client's results row. A client page without one is the
    /// leftover of a publish that died before its final write; recreating
    /// the row here reconciles it, and looking it up first keeps the repair
    /// idempotent.
    fn locate_or_repair_row(
        &self,
        client_page_id: &str,
        client_name: &str,
        site_url: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(table_id) = self.aggregate.find()? else {
            return Ok(None);
        };

        if let Some(row) = self
            .aggregate
            .find_row(&table_id, client_page_id, Some(client_name))?
        {
            return Ok(Some(row.id));
        }

        debug!("no results row for {client_name}, recreating one");
        let vote_url = self.config.vote_url(&slugify(client_name));
        let row = self.aggregate.create_row(
            &table_id,
            client_name,
            client_page_id,
            &vote_url,
            site_url,
        )?;
        Ok(Some(row.id))
    }
}

fn design_from_row(row: &Page, label_set: &LabelSet) -> VoteDesign {
    VoteDesign {
        page_id: row.id.clone(),
        title: row
            .property(DESIGN_TITLE_COL)
            .and_then(|p| p.as_plain_text())
            .unwrap_or_default(),
        description: row
            .property(label_set.description)
            .and_then(|p| p.as_plain_text())
            .unwrap_or_default(),
        recommended: row
            .property(label_set.recommended)
            .and_then(|p| p.as_checkbox())
            .unwrap_or(false),
        image_url: row
            .property(label_set.image)
            .and_then(|p| p.as_first_file_url())
            .unwrap_or_default()
            .to_string(),
        ranking: row
            .property(label_set.ranking)
            .and_then(|p| p.as_select_name())
            .map(str::to_string),
        comment: row
            .property(label_set.comment)
            .and_then(|p| p.as_plain_text())
            .unwrap_or_default(),
    }
}

fn extract_colors(blocks: &[Block]) -> ColorSettings {
    for block in blocks {
        if let BlockContent::Code { code } = &block.content {
            let content = plain_text(&code.rich_text);
            match serde_json::from_str::<ColorSettings>(&content) {
                Ok(colors) => return colors,
                Err(e) => {
                    warn!("color settings block is not valid JSON: {e}");
                }
            }
        }
    }
    ColorSettings::default()
}

fn extract_site_url(blocks: &[Block]) -> Option<String> {
    blocks.iter().find_map(|block| match &block.content {
        BlockContent::Paragraph { paragraph } => paragraph
            .rich_text
            .iter()
            .find_map(|f| f.text.link.as_ref().map(|l| l.url.clone())),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{CodeBody, RichText, RichTextBody};

    fn code_block(content: &str) -> Block {
        Block {
            id: "b1".into(),
            content: BlockContent::Code {
                code: CodeBody {
                    rich_text: vec![RichText::plain(content)],
                    language: Some("json".into()),
                },
            },
        }
    }

    #[test]
    fn test_extract_colors_from_code_block() {
        let blocks = vec![code_block(r##"{"buttonColor":"#0066FF","presenceColor":"#22c55e"}"##)];
        let colors = extract_colors(&blocks);
        assert_eq!(colors.button_color.as_deref(), Some("#0066FF"));
        assert_eq!(colors.presence_color.as_deref(), Some("#22c55e"));
    }

    #[test]
    fn test_extract_colors_tolerates_invalid_json() {
        let blocks = vec![code_block("not json at all")];
        let colors = extract_colors(&blocks);
        assert!(colors.button_color.is_none());
        assert!(colors.presence_color.is_none());
    }

    #[test]
    fn test_extract_site_url_from_paragraph_link() {
        let blocks = vec![Block {
            id: "b2".into(),
            content: BlockContent::Paragraph {
                paragraph: RichTextBody {
                    rich_text: vec![RichText::linked(
                        "https://example.com",
                        "https://example.com",
                    )],
                },
            },
        }];
        assert_eq!(
            extract_site_url(&blocks).as_deref(),
            Some("https://example.com")
        );
    }
}
