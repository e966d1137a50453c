#![forbid(unsafe_code)]

//! Shared fixtures for the cross-crate merge conformance suites.
//!
//! The employees/reviews pair is the worked example the whole engine is
//! specified against: two left rows, one matching right row, one right row
//! with no left counterpart.

use dm_types::{Column, ColumnType, Dataset, Row, Value};

#[must_use]
pub fn employees() -> Dataset {
    Dataset::new(
        vec![
            Row::from_pairs([
                ("id", Value::from("1")),
                ("name", Value::from("Alice")),
                ("dept", Value::from("Engineering")),
                ("salary", Value::Int64(120_000)),
            ]),
            Row::from_pairs([
                ("id", Value::from("2")),
                ("name", Value::from("Bob")),
                ("dept", Value::from("Sales")),
                ("salary", Value::Int64(85_000)),
            ]),
            Row::from_pairs([
                ("id", Value::from("3")),
                ("name", Value::from("Charlie")),
                ("dept", Value::from("Marketing")),
                ("salary", Value::Int64(92_000)),
            ]),
        ],
        vec![
            Column::new("id", ColumnType::String),
            Column::new("name", ColumnType::String),
            Column::new("dept", ColumnType::String),
            Column::new("salary", ColumnType::Number),
        ],
    )
}

#[must_use]
pub fn reviews() -> Dataset {
    Dataset::new(
        vec![
            Row::from_pairs([
                ("employee_id", Value::from("1")),
                ("rating", Value::Float64(4.8)),
                ("year", Value::Int64(2025)),
            ]),
            Row::from_pairs([
                ("employee_id", Value::from("2")),
                ("rating", Value::Float64(3.9)),
                ("year", Value::Int64(2025)),
            ]),
            Row::from_pairs([
                ("employee_id", Value::from("4")),
                ("rating", Value::Float64(4.5)),
                ("year", Value::Int64(2025)),
            ]),
        ],
        vec![
            Column::new("employee_id", ColumnType::String),
            Column::new("rating", ColumnType::Number),
            Column::new("year", ColumnType::Number),
        ],
    )
}
