use std::collections::BTreeMap;
use std::str::FromStr;

use crate::consts::{DISPLAY_SEPARATOR, STRING_SEPARATOR};
use crate::error::ImstatError;
use crate::fields::{FieldValue, Selection};

/// Whether rendered output carries a header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatMode {
    /// Header line plus padded value columns.
    Labeled,
    /// Value line only.
    Unlabeled,
}

impl FromStr for FormatMode {
    type Err = ImstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(FormatMode::Labeled),
            "no" => Ok(FormatMode::Unlabeled),
            _ => Err(ImstatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Shape of the structured result handed back to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnShape {
    /// Comma-joined header and value strings.
    Strings,
    /// Parallel label and value vectors.
    Arrays,
    /// Name to value mapping.
    Mapping,
}

impl FromStr for ReturnShape {
    type Err = ImstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(ReturnShape::Strings),
            "arr" => Ok(ReturnShape::Arrays),
            "dict" => Ok(ReturnShape::Mapping),
            _ => Err(ImstatError::UnknownReturnType(s.to_string())),
        }
    }
}

/// Selected statistics in one of the three return shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    Strings { header: String, values: String },
    Arrays {
        labels: Vec<String>,
        values: Vec<FieldValue>,
    },
    Mapping(BTreeMap<String, FieldValue>),
}

/// Render a selection for display.
///
/// Labeled output is a `#`-prefixed header line and a value line with each
/// column right-aligned to the wider of its label and value; unlabeled
/// output is the value line alone. Either way columns are separated by
/// four spaces. Empty selections render nothing.
pub fn render_lines(selection: &Selection, format: FormatMode) -> Vec<String> {
    if selection.values.is_empty() {
        return Vec::new();
    }

    let rendered: Vec<String> = selection.values.iter().map(|v| v.to_string()).collect();

    match format {
        FormatMode::Labeled => {
            let widths: Vec<usize> = selection
                .labels
                .iter()
                .zip(&rendered)
                .map(|(label, value)| label.len().max(value.len()))
                .collect();

            let header: Vec<String> = selection
                .labels
                .iter()
                .zip(&widths)
                .map(|(label, &width)| format!("{label:>width$}"))
                .collect();
            let values: Vec<String> = rendered
                .iter()
                .zip(&widths)
                .map(|(value, &width)| format!("{value:>width$}"))
                .collect();

            vec![
                format!("# {}", header.join(DISPLAY_SEPARATOR)),
                format!("  {}", values.join(DISPLAY_SEPARATOR)),
            ]
        }
        FormatMode::Unlabeled => vec![rendered.join(DISPLAY_SEPARATOR)],
    }
}

/// Shape a selection into the requested structured return.
pub fn build_report(selection: &Selection, shape: ReturnShape) -> Report {
    match shape {
        ReturnShape::Strings => Report::Strings {
            header: selection.labels.join(STRING_SEPARATOR),
            values: selection
                .values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(STRING_SEPARATOR),
        },
        ReturnShape::Arrays => Report::Arrays {
            labels: selection.labels.iter().map(|s| s.to_string()).collect(),
            values: selection.values.clone(),
        },
        ReturnShape::Mapping => Report::Mapping(
            selection
                .labels
                .iter()
                .zip(&selection.values)
                .map(|(label, value)| (label.to_string(), value.clone()))
                .collect(),
        ),
    }
}
