//! Slug resolution
//!
//! Vote links carry a human-friendly slug rather than a raw record id. A
//! slug resolves to the client page whose normalized title matches it, by
//! scanning the children of the workspace root page by page. The scan is
//! linear in the number of clients; at tens to low hundreds of clients that
//! is fine, and keeping it dumb is a deliberate non-goal to optimize.

use std::sync::Arc;

use tracing::{debug, trace};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::errors::{Result, VotelinkerError};
use crate::store::{BlockContent, RecordStore};

/// Normalize a display name into a URL-safe slug.
///
/// Lowercase, Unicode-decompose and drop diacritics, collapse every run of
/// non-alphanumeric characters into a single hyphen, trim hyphens at both
/// ends. `Société Général` → `societe-general`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        for lc in c.to_lowercase() {
            if lc.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(lc);
            } else {
                pending_hyphen = true;
            }
        }
    }

    slug
}

/// Whether an identifier already has the shape of a native record id:
/// 32 lowercase hex characters once hyphens are removed.
pub fn is_record_id(identifier: &str) -> bool {
    if !(32..=36).contains(&identifier.len()) {
        return false;
    }
    let stripped: Vec<char> = identifier.chars().filter(|c| *c != '-').collect();
    stripped.len() == 32
        && stripped
            .iter()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(c))
}

/// Resolves slugs against the configured workspace root.
pub struct SlugResolver {
    store: Arc<dyn RecordStore>,
    root_id: String,
    scan_page_size: usize,
}

impl SlugResolver {
    pub fn new(store: Arc<dyn RecordStore>, root_id: &str, scan_page_size: usize) -> Self {
        Self {
            store,
            root_id: root_id.to_string(),
            scan_page_size,
        }
    }

    /// Resolve an identifier to a client page id.
    ///
    /// Native record ids pass through untouched. Anything else is slugified
    /// and matched against the slugified titles of the root's child pages.
    pub fn resolve(&self, identifier: &str) -> Result<String> {
        if is_record_id(identifier) {
            return Ok(identifier.to_string());
        }

        let slug = slugify(identifier);
        debug!("resolving slug {:?} (from {:?})", slug, identifier);

        let mut cursor: Option<String> = None;
        loop {
            let batch =
                self.store
                    .list_children(&self.root_id, cursor.as_deref(), self.scan_page_size)?;

            for block in &batch.results {
                if let BlockContent::ChildPage { child_page } = &block.content {
                    let title_slug = slugify(&child_page.title);
                    trace!("  child page {:?} → slug {:?}", child_page.title, title_slug);
                    if title_slug == slug {
                        debug!("resolved slug {:?} to {}", slug, block.id);
                        return Ok(block.id.clone());
                    }
                }
            }

            cursor = batch.has_more.then_some(batch.next_cursor).flatten();
            if cursor.is_none() {
                break;
            }
        }

        Err(VotelinkerError::not_found(format!(
            "client not found: {identifier}"
        )))
    }
}
