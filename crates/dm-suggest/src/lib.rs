#![forbid(unsafe_code)]

use dm_types::Column;
use serde::{Deserialize, Serialize};

pub const CONFIDENCE_EXACT: u8 = 100;
pub const CONFIDENCE_SUBSTRING: u8 = 60;

/// Tuning constants for the prefix heuristic. These are coarse stand-ins
/// for edit-distance matching, not load-bearing truths, so they stay
/// adjustable per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestOptions {
    /// Number of leading characters that must agree.
    pub prefix_len: usize,
    /// Normalized left name must be strictly longer than this.
    pub min_name_len: usize,
    /// Confidence assigned to a prefix-only match.
    pub prefix_confidence: u8,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            prefix_len: 3,
            min_name_len: 3,
            prefix_confidence: 30,
        }
    }
}

/// One candidate join-key pair. A value object, independent of any dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSuggestion {
    pub left_key: String,
    pub right_key: String,
    pub confidence: u8,
}

/// Comparison form of a column name: lowercase with underscores, spaces,
/// and hyphens stripped.
fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['_', ' ', '-'], "")
}

fn char_prefixes_match(left: &str, right: &str, prefix_len: usize) -> bool {
    let mut left = left.chars();
    let mut right = right.chars();
    for _ in 0..prefix_len {
        match (left.next(), right.next()) {
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }
    true
}

/// Score every (left column, right column) pair as a candidate join key.
///
/// Exact normalized-name match scores 100, an either-direction substring
/// 60, and a same-type prefix agreement the configured fallback. Results
/// come back sorted by confidence descending; the sort is stable, so ties
/// keep discovery order (left columns outer, right columns inner).
#[must_use]
pub fn suggest_join_keys_with_options(
    left_columns: &[Column],
    right_columns: &[Column],
    options: SuggestOptions,
) -> Vec<JoinSuggestion> {
    let mut suggestions = Vec::new();

    for left in left_columns {
        let ln = normalize_name(&left.name);
        for right in right_columns {
            let rn = normalize_name(&right.name);

            let confidence = if ln == rn {
                Some(CONFIDENCE_EXACT)
            } else if ln.contains(&rn) || rn.contains(&ln) {
                Some(CONFIDENCE_SUBSTRING)
            } else if left.dtype == right.dtype
                && ln.chars().count() > options.min_name_len
                && char_prefixes_match(&ln, &rn, options.prefix_len)
            {
                Some(options.prefix_confidence)
            } else {
                None
            };

            if let Some(confidence) = confidence {
                suggestions.push(JoinSuggestion {
                    left_key: left.name.clone(),
                    right_key: right.name.clone(),
                    confidence,
                });
            }
        }
    }

    suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    suggestions
}

#[must_use]
pub fn suggest_join_keys(left_columns: &[Column], right_columns: &[Column]) -> Vec<JoinSuggestion> {
    suggest_join_keys_with_options(left_columns, right_columns, SuggestOptions::default())
}
