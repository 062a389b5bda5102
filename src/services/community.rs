//! Community ballots and leaderboard
//!
//! Anonymous votes from the public demo land as extra rows in the shared
//! results table. After each one, a leaderboard tally is rendered and pushed
//! to the chat channel. The tally is peripheral: no invariant depends on it,
//! and a notification failure never fails the vote.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::aggregate::AggregateTable;
use super::notify::ChatNotifier;
use crate::config::AppConfig;
use crate::errors::{Result, VotelinkerError};
use crate::labels::{canonical_labels, Lang, RESULT_CLIENT_COL};
use crate::store::{CreatePage, Parent, Properties, PropertyValue, RecordStore};

/// Display name when the voter leaves the name field empty.
const ANONYMOUS_VOTER: &str = "Anonyme";

/// Rows fetched when building the tally.
const TALLY_ROW_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct CommunityBallot {
    pub voter_name: Option<String>,
    pub concept_id: String,
    pub concept_label: String,
    pub site_url: Option<String>,
}

/// One leaderboard entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TallyEntry {
    pub design: String,
    pub count: usize,
}

pub struct CommunityEngine {
    store: Arc<dyn RecordStore>,
    aggregate: AggregateTable,
    notifier: Arc<ChatNotifier>,
    config: Arc<AppConfig>,
}

impl CommunityEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<ChatNotifier>,
        config: Arc<AppConfig>,
    ) -> Self {
        let aggregate = AggregateTable::new(store.clone(), &config.store.workspace_root_id);
        Self {
            store,
            aggregate,
            notifier,
            config,
        }
    }

    /// Record a community vote and kick off the leaderboard notification.
    pub fn submit(&self, ballot: CommunityBallot) -> Result<()> {
        if ballot.concept_id.is_empty() || ballot.concept_label.is_empty() {
            return Err(VotelinkerError::validation(
                "concept_id and concept_label are required",
            ));
        }

        let table_id = self.aggregate.find_or_create(Lang::Fr)?;
        let canonical = canonical_labels();

        let voter = ballot
            .voter_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS_VOTER)
            .to_string();

        let mut properties = Properties::new();
        properties.insert(RESULT_CLIENT_COL.to_string(), PropertyValue::title(&voter));
        properties.insert(
            canonical.result_rank_cols[0].to_string(),
            PropertyValue::rich_text(&ballot.concept_label),
        );
        properties.insert(
            canonical.result_date.to_string(),
            PropertyValue::date(Utc::now().format("%Y-%m-%d").to_string()),
        );
        properties.insert(
            canonical.result_vote_link.to_string(),
            PropertyValue::url(format!(
                "{}/demo",
                self.config.links.public_base_url.trim_end_matches('/')
            )),
        );
        if let Some(site_url) = ballot.site_url.as_deref().filter(|s| !s.is_empty()) {
            properties.insert(
                canonical.result_comment.to_string(),
                PropertyValue::rich_text(site_url),
            );
        }

        self.store.create_page(CreatePage {
            parent: Parent::DatabaseId {
                database_id: table_id.clone(),
            },
            icon: None,
            properties,
            children: Vec::new(),
        })?;

        info!("community vote recorded: {voter} → {}", ballot.concept_label);

        // Leaderboard push runs detached; the vote is already durable.
        if self.notifier.enabled() {
            let notifier = self.notifier.clone();
            let engine = CommunityTally {
                store: self.store.clone(),
                table_id,
            };
            let concept_label = ballot.concept_label.clone();
            std::thread::spawn(move || match engine.tally() {
                Ok(tally) => {
                    let text = render_leaderboard(&voter, &concept_label, &tally);
                    notifier.post_best_effort(&text);
                }
                Err(e) => {
                    tracing::warn!("leaderboard tally failed: {e}");
                }
            });
        }

        Ok(())
    }
}

struct CommunityTally {
    store: Arc<dyn RecordStore>,
    table_id: String,
}

impl CommunityTally {
    /// Count first-choice votes per design across the whole table.
    fn tally(&self) -> Result<Vec<TallyEntry>> {
        let canonical = canonical_labels();
        let rows = self
            .store
            .query_rows(&self.table_id, None, TALLY_ROW_LIMIT)?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &rows.results {
            let Some(text) = row
                .property(canonical.result_rank_cols[0])
                .and_then(|p| p.as_plain_text())
            else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            *counts.entry(tally_key(text).to_string()).or_default() += 1;
        }

        let mut tally: Vec<TallyEntry> = counts
            .into_iter()
            .map(|(design, count)| TallyEntry { design, count })
            .collect();
        tally.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.design.cmp(&b.design)));
        Ok(tally)
    }
}

/// Group votes by the `Option <letter>` prefix of a design title, so
/// `Option B2 - Présence Intégrée ⭐` counts under `Option B2`.
fn tally_key(text: &str) -> &str {
    if text.starts_with("Option ") {
        text.split(" - ").next().unwrap_or(text).trim_end()
    } else {
        text
    }
}

/// Chat message: who voted, the running percentages, the current leader.
fn render_leaderboard(voter: &str, concept_label: &str, tally: &[TallyEntry]) -> String {
    let total: usize = tally.iter().map(|e| e.count).sum();

    let lines: Vec<String> = tally
        .iter()
        .map(|entry| {
            let pct = if total > 0 {
                (entry.count * 100 + total / 2) / total
            } else {
                0
            };
            let filled = pct.div_ceil(5).min(20);
            let bar = "█".repeat(filled) + &"░".repeat(20 - filled);
            let plural = if entry.count > 1 { "s" } else { "" };
            format!(
                "{}: {} {} vote{} ({}%)",
                entry.design, bar, entry.count, plural, pct
            )
        })
        .collect();

    let mut text = vec![
        "🗳️ *Nouveau vote !*".to_string(),
        format!("*{voter}* a voté pour *{concept_label}*"),
        String::new(),
        format!(
            "📊 *Classement en temps réel* ({total} vote{})",
            if total > 1 { "s" } else { "" }
        ),
        lines.join("\n"),
    ];

    if let Some(leader) = tally.first() {
        text.push(String::new());
        text.push(format!(
            "🏆 *En tête : {}* avec {} vote{}",
            leader.design,
            leader.count,
            if leader.count > 1 { "s" } else { "" }
        ));
    }

    text.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_key_groups_by_option_prefix() {
        assert_eq!(tally_key("Option B2 - Présence Intégrée ⭐"), "Option B2");
        assert_eq!(tally_key("Option B - Classique"), "Option B");
        assert_eq!(tally_key("free text"), "free text");
    }

    #[test]
    fn test_render_leaderboard_mentions_leader() {
        let tally = vec![
            TallyEntry {
                design: "Option B2".into(),
                count: 3,
            },
            TallyEntry {
                design: "Option D".into(),
                count: 1,
            },
        ];
        let text = render_leaderboard("Alice", "Option B2 - Présence Intégrée", &tally);
        assert!(text.contains("*Alice* a voté pour"));
        assert!(text.contains("En tête : Option B2"));
        assert!(text.contains("(4 votes)"));
    }

    #[test]
    fn test_render_leaderboard_singular_vote() {
        let tally = vec![TallyEntry {
            design: "Option D".into(),
            count: 1,
        }];
        let text = render_leaderboard("Bob", "Option D", &tally);
        assert!(text.contains("(1 vote)"));
        assert!(text.contains("avec 1 vote"));
        assert!(!text.contains("1 votes"));
    }
}
