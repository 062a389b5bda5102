//! Wire model of the external record store
//!
//! The workspace API exposes pages, nested tabular databases and typed
//! properties. Everything here mirrors the JSON the remote service speaks:
//! values carry a `type` discriminator next to a field of the same name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One rich-text fragment. The store echoes `plain_text` back on reads;
/// on writes only `text.content` (and an optional link) matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub text: TextContent,
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<TextLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLink {
    pub url: String,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        RichText {
            plain_text: content.clone(),
            text: TextContent {
                content,
                link: None,
            },
        }
    }

    pub fn linked(content: impl Into<String>, url: impl Into<String>) -> Self {
        let content = content.into();
        RichText {
            plain_text: content.clone(),
            text: TextContent {
                content,
                link: Some(TextLink { url: url.into() }),
            },
        }
    }
}

/// Concatenated plain text of a rich-text array.
pub fn plain_text(fragments: &[RichText]) -> String {
    fragments
        .iter()
        .map(|f| {
            if f.plain_text.is_empty() {
                f.text.content.as_str()
            } else {
                f.plain_text.as_str()
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadRef {
    pub id: String,
}

/// A file attached to a `files` property: hosted by the store, referenced
/// externally, or a fresh upload handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileRef {
    File {
        file: FileUrl,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    External {
        external: FileUrl,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    FileUpload {
        file_upload: FileUploadRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// A typed property value on a page/row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Select { select: Option<SelectValue> },
    Checkbox { checkbox: bool },
    Files { files: Vec<FileRef> },
    Url { url: Option<String> },
    Date { date: Option<DateValue> },
}

impl PropertyValue {
    pub fn title(text: impl Into<String>) -> Self {
        PropertyValue::Title {
            title: vec![RichText::plain(text)],
        }
    }

    pub fn rich_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let fragments = if text.is_empty() {
            Vec::new()
        } else {
            vec![RichText::plain(text)]
        };
        PropertyValue::RichText {
            rich_text: fragments,
        }
    }

    pub fn select(name: impl Into<String>) -> Self {
        PropertyValue::Select {
            select: Some(SelectValue {
                name: name.into(),
                color: None,
            }),
        }
    }

    pub fn select_none() -> Self {
        PropertyValue::Select { select: None }
    }

    pub fn checkbox(value: bool) -> Self {
        PropertyValue::Checkbox { checkbox: value }
    }

    pub fn files(files: Vec<FileRef>) -> Self {
        PropertyValue::Files { files }
    }

    pub fn url(url: impl Into<String>) -> Self {
        PropertyValue::Url {
            url: Some(url.into()),
        }
    }

    pub fn date(start: impl Into<String>) -> Self {
        PropertyValue::Date {
            date: Some(DateValue {
                start: start.into(),
            }),
        }
    }

    pub fn date_none() -> Self {
        PropertyValue::Date { date: None }
    }

    /// Plain text of a title or rich-text value, `None` for other kinds.
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title { title } => Some(plain_text(title)),
            PropertyValue::RichText { rich_text } => Some(plain_text(rich_text)),
            _ => None,
        }
    }

    pub fn as_select_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Select { select } => select.as_ref().map(|s| s.name.as_str()),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self {
            PropertyValue::Checkbox { checkbox } => Some(*checkbox),
            _ => None,
        }
    }

    /// Best-available URL of the first attached file. Hosted uploads win
    /// over external references.
    pub fn as_first_file_url(&self) -> Option<&str> {
        match self {
            PropertyValue::Files { files } => files.first().and_then(|f| match f {
                FileRef::File { file, .. } => Some(file.url.as_str()),
                FileRef::External { external, .. } => Some(external.url.as_str()),
                FileRef::FileUpload { .. } => None,
            }),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            PropertyValue::Url { url } => url.as_deref(),
            _ => None,
        }
    }
}

/// Column declaration used when creating a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertySchema {
    Title {},
    RichText {},
    Select { select: SelectSchema },
    Checkbox {},
    Files {},
    Url {},
    Date {},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectSchema {
    pub options: Vec<SelectValue>,
}

pub type Properties = HashMap<String, PropertyValue>;
pub type SchemaProperties = HashMap<String, PropertySchema>;

/// A page: either a standalone record or a row of a database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Page {
    /// Plain text of the page's title property, whatever column carries it.
    pub fn title_text(&self) -> Option<String> {
        self.properties.values().find_map(|v| match v {
            PropertyValue::Title { title } => Some(plain_text(title)),
            _ => None,
        })
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A nested tabular database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
    #[serde(default)]
    pub properties: SchemaProperties,
}

impl Database {
    pub fn title_text(&self) -> String {
        plain_text(&self.title)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| k.as_str())
    }
}

/// Content of a child block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    ChildPage { child_page: BlockTitle },
    ChildDatabase { child_database: BlockTitle },
    Paragraph { paragraph: RichTextBody },
    Code { code: CodeBody },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTitle {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBody {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBody {
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl BlockContent {
    pub fn paragraph(fragments: Vec<RichText>) -> Self {
        BlockContent::Paragraph {
            paragraph: RichTextBody {
                rich_text: fragments,
            },
        }
    }

    pub fn code(content: impl Into<String>, language: impl Into<String>) -> Self {
        BlockContent::Code {
            code: CodeBody {
                rich_text: vec![RichText::plain(content)],
                language: Some(language.into()),
            },
        }
    }
}

/// A child block as returned by a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(flatten)]
    pub content: BlockContent,
}

/// One page of a paginated child-block listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockList {
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Result of a row query. The design tables are small and fixed-size, so
/// row queries are not paginated the way block listings are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowList {
    pub results: Vec<Page>,
}

/// Filter for row queries.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    /// Exact match on a title column.
    TitleEquals { property: String, value: String },
    /// Exact match on the plain text of a rich-text column.
    RichTextEquals { property: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parent {
    PageId { page_id: String },
    DatabaseId { database_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
}

/// Payload for page creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePage {
    pub parent: Parent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub properties: Properties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockContent>,
}

/// Payload for database creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDatabase {
    pub parent: Parent,
    pub title: Vec<RichText>,
    pub is_inline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub properties: SchemaProperties,
}
