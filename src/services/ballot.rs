//! Ballot submission engine
//!
//! Validates a ranked ballot, writes the ranks onto the design rows, and
//! mirrors a denormalized summary into the client's row of the shared
//! results table. Validation happens here, before any write, so a malformed
//! ballot mutates nothing no matter what the UI let through.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::{Result, VotelinkerError};
use crate::labels::{
    canonical_labels, labels, rank_ordinal, Lang, DESIGN_TITLE_COL, RANK_SLOTS,
};
use crate::store::{Properties, PropertyValue, RecordStore};

/// One (design, rank) pair of a ballot.
#[derive(Debug, Clone)]
pub struct VoteEntry {
    /// Design row id.
    pub page_id: String,
    /// Rank label in any supported language (`"2nd choice"`, `"2e choix"`).
    pub ranking: String,
}

/// A complete ballot for one client.
#[derive(Debug, Clone)]
pub struct BallotRequest {
    pub votes: Vec<VoteEntry>,
    pub comment: Option<String>,
    /// Stored language of the design table, as reported by the vote view.
    pub lang: Lang,
    /// The client's row in the shared results table, when one is linked.
    pub result_row_id: Option<String>,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct BallotResult {
    pub designs_updated: usize,
    /// False when no results row was linked; the ranks are still durable on
    /// the design rows.
    pub aggregate_updated: bool,
}

pub struct BallotEngine {
    store: Arc<dyn RecordStore>,
}

impl BallotEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn submit(&self, request: BallotRequest) -> Result<BallotResult> {
        validate_ballot(&request.votes)?;

        let table_labels = labels(request.lang);
        let comment = request
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        // Write each rank, translated to the table's stored labels, and
        // collect the design titles for the shared summary.
        let mut ranked: Vec<(u32, String)> = Vec::with_capacity(request.votes.len());
        for vote in &request.votes {
            let ordinal = rank_ordinal(&vote.ranking);
            let stored_label = table_labels.rank_options[(ordinal - 1) as usize];

            let mut properties = Properties::new();
            properties.insert(
                table_labels.ranking.to_string(),
                PropertyValue::select(stored_label),
            );
            if ordinal == 1 {
                if let Some(comment) = comment {
                    properties.insert(
                        table_labels.comment.to_string(),
                        PropertyValue::rich_text(comment),
                    );
                }
            }

            let updated = self.store.update_page(&vote.page_id, properties)?;
            let title = updated
                .property(DESIGN_TITLE_COL)
                .and_then(|p| p.as_plain_text())
                .unwrap_or_default();
            ranked.push((ordinal, title));
        }

        let aggregate_updated = match &request.result_row_id {
            Some(row_id) => {
                self.update_result_row(row_id, &mut ranked, comment)?;
                true
            }
            None => {
                warn!("ballot has no linked results row, skipping shared summary");
                false
            }
        };

        info!(
            "ballot recorded: {} designs, aggregate_updated={}",
            ranked.len(),
            aggregate_updated
        );
        Ok(BallotResult {
            designs_updated: ranked.len(),
            aggregate_updated,
        })
    }

    /// Overwrite the shared summary row in a single update: one title per
    /// rank column in ordinal order, the comment, today's date.
    fn update_result_row(
        &self,
        row_id: &str,
        ranked: &mut [(u32, String)],
        comment: Option<&str>,
    ) -> Result<()> {
        ranked.sort_by_key(|(ordinal, _)| *ordinal);
        let canonical = canonical_labels();

        let mut properties = Properties::new();
        properties.insert(
            canonical.result_date.to_string(),
            PropertyValue::date(Utc::now().format("%Y-%m-%d").to_string()),
        );
        for (i, (_, title)) in ranked.iter().take(RANK_SLOTS).enumerate() {
            properties.insert(
                canonical.result_rank_cols[i].to_string(),
                PropertyValue::rich_text(title.clone()),
            );
        }
        if let Some(comment) = comment {
            properties.insert(
                canonical.result_comment.to_string(),
                PropertyValue::rich_text(comment),
            );
        }

        self.store.update_page(row_id, properties)?;
        Ok(())
    }
}

/// Ballot validation: every rank used at most once, every slot filled,
/// every label recognized. Checked before the first store write.
fn validate_ballot(votes: &[VoteEntry]) -> Result<()> {
    if votes.is_empty() {
        return Err(VotelinkerError::validation("votes are required"));
    }

    let ordinals: Vec<u32> = votes.iter().map(|v| rank_ordinal(&v.ranking)).collect();

    let distinct: HashSet<u32> = ordinals.iter().copied().collect();
    if distinct.len() != ordinals.len() {
        return Err(VotelinkerError::validation("each rank may be used once"));
    }

    if votes.len() != RANK_SLOTS {
        return Err(VotelinkerError::validation("all slots must be filled"));
    }

    if let Some(bad) = votes
        .iter()
        .find(|v| !(1..=RANK_SLOTS as u32).contains(&rank_ordinal(&v.ranking)))
    {
        return Err(VotelinkerError::validation(format!(
            "unrecognized rank label: {}",
            bad.ranking
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(page_id: &str, ranking: &str) -> VoteEntry {
        VoteEntry {
            page_id: page_id.into(),
            ranking: ranking.into(),
        }
    }

    #[test]
    fn test_valid_ballot_passes() {
        let votes = vec![
            entry("a", "1er choix"),
            entry("b", "2e choix"),
            entry("c", "3e choix"),
        ];
        assert!(validate_ballot(&votes).is_ok());
    }

    #[test]
    fn test_mixed_language_ballot_passes() {
        let votes = vec![
            entry("a", "1st choice"),
            entry("b", "2ª opción"),
            entry("c", "3e choix"),
        ];
        assert!(validate_ballot(&votes).is_ok());
    }

    #[test]
    fn test_duplicate_rank_rejected_before_slot_count() {
        // Two votes sharing a rank must fail as a duplicate, not as a
        // missing slot.
        let votes = vec![entry("a", "1er choix"), entry("b", "1er choix")];
        let err = validate_ballot(&votes).unwrap_err();
        assert!(err.message().contains("each rank may be used once"));
    }

    #[test]
    fn test_partial_ballot_rejected() {
        let votes = vec![entry("a", "1er choix"), entry("b", "2e choix")];
        let err = validate_ballot(&votes).unwrap_err();
        assert!(err.message().contains("all slots must be filled"));
    }

    #[test]
    fn test_empty_ballot_rejected() {
        let err = validate_ballot(&[]).unwrap_err();
        assert!(err.message().contains("votes are required"));
    }

    #[test]
    fn test_unknown_rank_label_rejected() {
        let votes = vec![
            entry("a", "1er choix"),
            entry("b", "2e choix"),
            entry("c", "9e choix"),
        ];
        let err = validate_ballot(&votes).unwrap_err();
        assert!(err.message().contains("unrecognized rank label"));
    }
}
