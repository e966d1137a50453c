#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use dm_types::{Column, Dataset, Row, SchemaError, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel comparison key for null/absent join-key cells. Two null-keyed
/// rows match each other, mirroring spreadsheet-join expectations rather
/// than SQL null semantics.
pub const NULL_KEY: &str = "__NULL__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Append,
}

impl JoinType {
    fn keeps_unmatched_left(self) -> bool {
        matches!(self, Self::Left | Self::Full)
    }

    fn keeps_unmatched_right(self) -> bool {
        matches!(self, Self::Right | Self::Full)
    }
}

impl FromStr for JoinType {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "full" => Ok(Self::Full),
            "append" => Ok(Self::Append),
            other => Err(MergeError::UnknownJoinType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Per-invocation join parameters. The keys name columns in each dataset;
/// a key naming no column is not an error, its cells simply read as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub left_key: String,
    pub right_key: String,
    pub join_type: JoinType,
}

impl JoinSpec {
    #[must_use]
    pub fn new(left_key: impl Into<String>, right_key: impl Into<String>, join_type: JoinType) -> Self {
        Self {
            left_key: left_key.into(),
            right_key: right_key.into(),
            join_type,
        }
    }
}

/// Freshly allocated per call; the engine keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub data: Vec<Row>,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSide {
    Left,
    Right,
}

impl fmt::Display for DatasetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("unrecognized join type {value:?}")]
    UnknownJoinType { value: String },
    #[error("{side} dataset rejected: {source}")]
    MalformedSchema {
        side: DatasetSide,
        source: SchemaError,
    },
}

/// Canonical comparison form of a join-key cell: null/absent becomes the
/// sentinel, everything else a trimmed lowercase string rendering.
#[must_use]
pub fn normalize_key(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NULL_KEY.to_owned(),
        Some(value) => value.to_string().trim().to_lowercase(),
    }
}

/// One resolved output column on the right side of a join: where to write
/// (`output.name`, renamed on collision) and where to read from in right
/// input rows (`source_name`, always the original name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedColumn {
    pub output: Column,
    pub source_name: String,
}

/// Resolve the right-side output columns once, before any row is touched.
///
/// The right join-key column is dropped entirely (it is never duplicated
/// into the output); any other right column colliding with a left column
/// name is renamed to `<name>_right`.
#[must_use]
pub fn resolve_right_columns(
    left_columns: &[Column],
    right_columns: &[Column],
    right_key: &str,
) -> Vec<RenamedColumn> {
    let left_names: HashSet<&str> = left_columns.iter().map(|c| c.name.as_str()).collect();

    right_columns
        .iter()
        .filter(|column| column.name != right_key)
        .map(|column| {
            let output_name = if left_names.contains(column.name.as_str()) {
                format!("{}_right", column.name)
            } else {
                column.name.clone()
            };
            RenamedColumn {
                output: Column::new(output_name, column.dtype),
                source_name: column.name.clone(),
            }
        })
        .collect()
}

/// Combine one left row and one right row (either may be absent) into a
/// single output row carrying every declared output column. Total: absent
/// sides and missing fields become null, never errors.
#[must_use]
pub fn build_merged_row(
    left_row: Option<&Row>,
    right_row: Option<&Row>,
    left_columns: &[Column],
    renamed_right_columns: &[RenamedColumn],
) -> Row {
    let mut row = Row::with_capacity(left_columns.len() + renamed_right_columns.len());

    for column in left_columns {
        let value = left_row
            .and_then(|r| r.get(&column.name))
            .cloned()
            .unwrap_or(Value::Null);
        row.set(column.name.clone(), value);
    }

    for renamed in renamed_right_columns {
        let value = right_row
            .and_then(|r| r.get(&renamed.source_name))
            .cloned()
            .unwrap_or(Value::Null);
        row.set(renamed.output.name.clone(), value);
    }

    row
}

/// Union/append: stack both row lists vertically over the by-name union of
/// the column lists (left first, first occurrence wins, no renaming).
fn append_datasets(left: &Dataset, right: &Dataset) -> MergeResult {
    let mut columns = left.columns.clone();
    let mut seen: HashSet<&str> = left.columns.iter().map(|c| c.name.as_str()).collect();
    for column in &right.columns {
        if seen.insert(column.name.as_str()) {
            columns.push(column.clone());
        }
    }

    let project = |row: &Row| -> Row {
        let mut out = Row::with_capacity(columns.len());
        for column in &columns {
            out.set(
                column.name.clone(),
                row.get(&column.name).cloned().unwrap_or(Value::Null),
            );
        }
        out
    };

    let data = left
        .rows
        .iter()
        .chain(right.rows.iter())
        .map(project)
        .collect();

    MergeResult { data, columns }
}

fn validate_side(dataset: &Dataset, side: DatasetSide) -> Result<(), MergeError> {
    dataset
        .validate()
        .map_err(|source| MergeError::MalformedSchema { side, source })
}

/// Merge two datasets using the requested join strategy.
///
/// For the relational joins, right rows are indexed by normalized key, so a
/// left row fans out to one output row per matching right row. Matched right
/// keys are tracked per normalized key, not per row: in a right/full join a
/// right row is only re-emitted when its entire key group went unmatched.
/// Output columns are all left columns in original order, then the resolved
/// right columns.
pub fn merge_datasets(
    left: &Dataset,
    right: &Dataset,
    spec: &JoinSpec,
) -> Result<MergeResult, MergeError> {
    validate_side(left, DatasetSide::Left)?;
    validate_side(right, DatasetSide::Right)?;

    if spec.join_type == JoinType::Append {
        return Ok(append_datasets(left, right));
    }

    // Normalized right key -> right row positions, in original order.
    let mut right_index: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, row) in right.rows.iter().enumerate() {
        right_index
            .entry(normalize_key(row.get(&spec.right_key)))
            .or_default()
            .push(pos);
    }

    let renamed = resolve_right_columns(&left.columns, &right.columns, &spec.right_key);
    let mut columns = left.columns.clone();
    columns.extend(renamed.iter().map(|rc| rc.output.clone()));

    let mut data = Vec::new();
    let mut matched_keys: HashSet<String> = HashSet::new();

    for left_row in &left.rows {
        let key = normalize_key(left_row.get(&spec.left_key));
        match right_index.get(&key) {
            Some(positions) => {
                for &pos in positions {
                    data.push(build_merged_row(
                        Some(left_row),
                        Some(&right.rows[pos]),
                        &left.columns,
                        &renamed,
                    ));
                }
                matched_keys.insert(key);
            }
            None if spec.join_type.keeps_unmatched_left() => {
                data.push(build_merged_row(Some(left_row), None, &left.columns, &renamed));
            }
            None => {}
        }
    }

    if spec.join_type.keeps_unmatched_right() {
        for right_row in &right.rows {
            let key = normalize_key(right_row.get(&spec.right_key));
            if !matched_keys.contains(&key) {
                data.push(build_merged_row(None, Some(right_row), &left.columns, &renamed));
            }
        }
    }

    Ok(MergeResult { data, columns })
}
