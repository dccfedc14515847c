use std::fmt;

use crate::stats::ImageStatistics;

/// A statistic that can be selected for output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Image,
    Npix,
    Mean,
    Stddev,
    Min,
    Max,
    Skew,
    Kurtosis,
    Mode,
    Midpt,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Image,
        Field::Npix,
        Field::Mean,
        Field::Stddev,
        Field::Min,
        Field::Max,
        Field::Skew,
        Field::Kurtosis,
        Field::Mode,
        Field::Midpt,
    ];

    /// Name used in field lists and column headers.
    pub fn name(self) -> &'static str {
        match self {
            Field::Image => "image",
            Field::Npix => "npix",
            Field::Mean => "mean",
            Field::Stddev => "stddev",
            Field::Min => "min",
            Field::Max => "max",
            Field::Skew => "skew",
            Field::Kurtosis => "kurtosis",
            Field::Mode => "mode",
            Field::Midpt => "midpt",
        }
    }

    /// Look a field up by name. Names are case-sensitive.
    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One selected statistic, typed by what it holds.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Count(usize),
    Number(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Count(n) => write!(f, "{n}"),
            FieldValue::Number(x) => write!(f, "{x}"),
        }
    }
}

/// Value of one field of a statistics record.
pub fn field_value(stats: &ImageStatistics, field: Field) -> FieldValue {
    match field {
        Field::Image => FieldValue::Text(stats.image.clone()),
        Field::Npix => FieldValue::Count(stats.npix),
        Field::Mean => FieldValue::Number(stats.mean),
        Field::Stddev => FieldValue::Number(stats.stddev),
        Field::Min => FieldValue::Number(stats.min),
        Field::Max => FieldValue::Number(stats.max),
        Field::Skew => FieldValue::Number(stats.skew),
        Field::Kurtosis => FieldValue::Number(stats.kurtosis),
        Field::Mode => FieldValue::Number(stats.mode),
        Field::Midpt => FieldValue::Number(stats.midpt),
    }
}

/// The fields a caller asked for, resolved against a statistics record.
///
/// `labels` and `values` are parallel and keep the caller's order.
/// Unrecognized names land in `skipped` instead of failing the run.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub labels: Vec<&'static str>,
    pub values: Vec<FieldValue>,
    pub skipped: Vec<String>,
}

/// Split a comma-separated field list into trimmed names.
/// Empty entries (stray commas) are dropped.
pub fn parse_field_list(fields: &str) -> Vec<String> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve requested field names against a statistics record.
pub fn select(stats: &ImageStatistics, names: &[String]) -> Selection {
    let mut selection = Selection::default();
    for name in names {
        match Field::parse(name) {
            Some(field) => {
                selection.labels.push(field.name());
                selection.values.push(field_value(stats, field));
            }
            None => selection.skipped.push(name.clone()),
        }
    }
    selection
}
