#![forbid(unsafe_code)]

use dm_types::{Column, ColumnType};
use serde::{Deserialize, Serialize};

/// Every chart kind the renderer boundary understands. Serialized under the
/// wire identifiers the downstream option builder expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartKind {
    // Comparison - bars
    BarClustered,
    BarStacked,
    BarPercent,
    BarHorizontal,
    BarHorizontalStacked,
    BarHorizontalPercent,
    BarWaterfall,
    BarRange,
    // Trends - lines
    LineSmooth,
    LineStep,
    LineStraight,
    LineDashed,
    LineMultiAxis,
    LineAreaMix,
    // Trends - areas
    AreaSmooth,
    AreaStep,
    AreaStacked,
    AreaPercent,
    AreaGradient,
    AreaReverse,
    // Part to whole - circular
    Pie,
    Donut,
    PieSemi,
    DonutSemi,
    Rose,
    Sunburst,
    RadialBar,
    Radar,
    // Distribution and correlation
    Scatter,
    Bubble,
    ScatterLine,
    Treemap,
    Heatmap,
    // Combinations
    ComboBarLine,
    ComboStackedLine,
    ComboAreaLine,
    // Informational and indicators
    KpiSingle,
    KpiProgress,
    KpiBullet,
    Table,
    CardList,
    Gauge,
    Sparkline,
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSuggestion {
    pub kind: ChartKind,
    pub score: u8,
    pub reason: String,
}

/// Effective column-type counts the scoring rules run against.
///
/// An assigned dimension collapses the categorical count to one; assigned
/// measures override the numeric count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub categorical: usize,
    pub numeric: usize,
    pub date: usize,
}

impl ColumnProfile {
    #[must_use]
    pub fn from_columns(columns: &[Column], dimension: Option<&str>, measures: &[String]) -> Self {
        let count = |dtype: ColumnType| columns.iter().filter(|c| c.dtype == dtype).count();

        let has_dimension = dimension.is_some_and(|name| !name.is_empty());
        let categorical = if has_dimension {
            1
        } else {
            count(ColumnType::String)
        };
        let numeric = if measures.is_empty() {
            count(ColumnType::Number)
        } else {
            measures.len()
        };

        Self {
            categorical,
            numeric,
            date: count(ColumnType::Date),
        }
    }

    fn satisfies(self, rule: &Rule) -> bool {
        self.categorical >= rule.min_categorical
            && self.numeric >= rule.min_numeric
            && self.date >= rule.min_date
    }
}

/// Minimum column counts that make one chart kind applicable.
struct Rule {
    min_categorical: usize,
    min_numeric: usize,
    min_date: usize,
    kind: ChartKind,
    score: u8,
    reason: &'static str,
}

const fn rule(
    min_categorical: usize,
    min_numeric: usize,
    min_date: usize,
    kind: ChartKind,
    score: u8,
    reason: &'static str,
) -> Rule {
    Rule {
        min_categorical,
        min_numeric,
        min_date,
        kind,
        score,
        reason,
    }
}

/// Static scoring table. Rule order is the tie-break order: a kind scored
/// identically by two rules keeps its first-listed reasoning.
const RULES: &[Rule] = &[
    // Categorical comparison.
    rule(1, 1, 0, ChartKind::BarClustered, 90, "Compare values across categories"),
    rule(1, 1, 0, ChartKind::BarHorizontal, 82, "Horizontal comparison for readability"),
    rule(1, 2, 0, ChartKind::BarStacked, 85, "Show composition across categories"),
    rule(1, 2, 0, ChartKind::BarPercent, 78, "Show proportional breakdown"),
    // Time series.
    rule(0, 1, 1, ChartKind::LineSmooth, 95, "Best for time-series trends"),
    rule(0, 1, 1, ChartKind::LineStraight, 88, "Precise trend tracking"),
    rule(0, 1, 1, ChartKind::AreaSmooth, 84, "Time trend with volume emphasis"),
    rule(0, 1, 1, ChartKind::AreaStacked, 80, "Stacked area for cumulative trends"),
    // Trends across categories.
    rule(1, 1, 0, ChartKind::LineSmooth, 70, "Trend across categories"),
    rule(1, 1, 0, ChartKind::AreaSmooth, 65, "Area trend across categories"),
    // Part to whole.
    rule(1, 1, 0, ChartKind::Pie, 75, "Show proportions of a whole"),
    rule(1, 1, 0, ChartKind::Donut, 74, "Proportions with a clean center"),
    rule(1, 1, 0, ChartKind::Treemap, 68, "Hierarchical proportions"),
    rule(1, 1, 0, ChartKind::Rose, 60, "Polar proportional chart"),
    rule(1, 1, 0, ChartKind::Sunburst, 55, "Nested category breakdown"),
    // Correlation.
    rule(0, 2, 0, ChartKind::Scatter, 85, "Correlation between two measures"),
    rule(0, 3, 0, ChartKind::Bubble, 80, "Three-variable relationship"),
    // Multi-metric profiles.
    rule(1, 3, 0, ChartKind::Radar, 72, "Multi-metric profile comparison"),
    rule(1, 3, 0, ChartKind::RadialBar, 60, "Radial metric comparison"),
    // Combos.
    rule(1, 2, 0, ChartKind::ComboBarLine, 82, "Compare bar + trend line"),
    rule(1, 2, 0, ChartKind::ComboAreaLine, 70, "Area + line overlay"),
    // Single-metric indicators.
    rule(0, 1, 0, ChartKind::KpiSingle, 60, "Display a single key metric"),
    rule(0, 1, 0, ChartKind::Gauge, 55, "Gauge indicator for a metric"),
    rule(0, 1, 0, ChartKind::Sparkline, 50, "Compact inline trend"),
    // Matrix density.
    rule(2, 1, 0, ChartKind::Heatmap, 75, "Density of values in a matrix"),
    // Always available.
    rule(0, 0, 0, ChartKind::Table, 40, "Raw data table view"),
];

/// Rank chart kinds for a column schema, optionally constrained by an
/// assigned dimension and measure list.
///
/// Applies every satisfied rule, keeps the highest score per kind (first
/// hit wins ties and fixes the kind's position), then sorts descending by
/// score with a stable sort.
#[must_use]
pub fn recommend_charts(
    columns: &[Column],
    dimension: Option<&str>,
    measures: &[String],
) -> Vec<ChartSuggestion> {
    let profile = ColumnProfile::from_columns(columns, dimension, measures);
    recommend_for_profile(profile)
}

#[must_use]
pub fn recommend_for_profile(profile: ColumnProfile) -> Vec<ChartSuggestion> {
    let mut ranked: Vec<ChartSuggestion> = Vec::new();

    for r in RULES.iter().filter(|r| profile.satisfies(r)) {
        match ranked.iter_mut().find(|s| s.kind == r.kind) {
            Some(existing) => {
                if r.score > existing.score {
                    existing.score = r.score;
                    existing.reason = r.reason.to_owned();
                }
            }
            None => ranked.push(ChartSuggestion {
                kind: r.kind,
                score: r.score,
                reason: r.reason.to_owned(),
            }),
        }
    }

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use dm_types::{Column, ColumnType};

    use super::{ChartKind, ColumnProfile, recommend_charts, recommend_for_profile};

    fn hr_columns() -> Vec<Column> {
        vec![
            Column::new("department", ColumnType::String),
            Column::new("gender", ColumnType::String),
            Column::new("salary", ColumnType::Number),
            Column::new("tenure", ColumnType::Number),
            Column::new("rating", ColumnType::Number),
        ]
    }

    #[test]
    fn profile_counts_declared_types() {
        let profile = ColumnProfile::from_columns(&hr_columns(), None, &[]);
        assert_eq!(profile.categorical, 2);
        assert_eq!(profile.numeric, 3);
        assert_eq!(profile.date, 0);
    }

    #[test]
    fn dimension_and_measures_override_counts() {
        let measures = vec!["salary".to_owned()];
        let profile = ColumnProfile::from_columns(&hr_columns(), Some("department"), &measures);
        assert_eq!(profile.categorical, 1);
        assert_eq!(profile.numeric, 1);

        // Empty dimension string behaves as unassigned.
        let profile = ColumnProfile::from_columns(&hr_columns(), Some(""), &[]);
        assert_eq!(profile.categorical, 2);
    }

    #[test]
    fn categorical_numeric_mix_ranks_bar_first() {
        let got = recommend_charts(&hr_columns(), None, &[]);
        assert_eq!(got[0].kind, ChartKind::BarClustered);
        assert_eq!(got[0].score, 90);
        assert!(got.windows(2).all(|w| w[0].score >= w[1].score));
        // 2 categoricals unlock the matrix rule.
        assert!(got.iter().any(|s| s.kind == ChartKind::Heatmap));
    }

    #[test]
    fn time_series_ranks_smooth_line_first() {
        let columns = vec![
            Column::new("day", ColumnType::Date),
            Column::new("revenue", ColumnType::Number),
        ];
        let got = recommend_charts(&columns, None, &[]);
        assert_eq!(got[0].kind, ChartKind::LineSmooth);
        assert_eq!(got[0].score, 95);
        assert_eq!(got[0].reason, "Best for time-series trends");
    }

    #[test]
    fn duplicate_kinds_keep_the_highest_score() {
        // Both the time-series rule (95) and the categorical rule (70)
        // nominate LineSmooth; only the 95 entry survives.
        let columns = vec![
            Column::new("region", ColumnType::String),
            Column::new("day", ColumnType::Date),
            Column::new("revenue", ColumnType::Number),
        ];
        let got = recommend_charts(&columns, None, &[]);
        let line: Vec<_> = got.iter().filter(|s| s.kind == ChartKind::LineSmooth).collect();
        assert_eq!(line.len(), 1);
        assert_eq!(line[0].score, 95);
    }

    #[test]
    fn bare_schema_still_offers_a_table() {
        let got = recommend_charts(&[], None, &[]);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].kind, ChartKind::Table);
        assert_eq!(got[0].score, 40);
    }

    #[test]
    fn single_numeric_column_gets_indicator_kinds() {
        let columns = vec![Column::new("total", ColumnType::Number)];
        let got = recommend_charts(&columns, None, &[]);
        let kinds: Vec<ChartKind> = got.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::KpiSingle,
                ChartKind::Gauge,
                ChartKind::Sparkline,
                ChartKind::Table,
            ]
        );
    }

    #[test]
    fn profile_scoring_is_reachable_without_a_schema() {
        let got = recommend_for_profile(ColumnProfile {
            categorical: 1,
            numeric: 3,
            date: 0,
        });
        assert!(got.iter().any(|s| s.kind == ChartKind::Radar && s.score == 72));
        assert!(got.iter().any(|s| s.kind == ChartKind::Bubble && s.score == 80));
    }

    #[test]
    fn chart_kind_serializes_under_wire_identifiers() {
        let json = serde_json::to_string(&ChartKind::BarClustered).expect("serialize");
        assert_eq!(json, r#""BAR_CLUSTERED""#);
        let json = serde_json::to_string(&ChartKind::KpiSingle).expect("serialize");
        assert_eq!(json, r#""KPI_SINGLE""#);
        let back: ChartKind = serde_json::from_str(r#""LINE_MULTI_AXIS""#).expect("deserialize");
        assert_eq!(back, ChartKind::LineMultiAxis);
    }
}
