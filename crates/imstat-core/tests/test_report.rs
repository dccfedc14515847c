use std::str::FromStr;

use imstat_core::error::ImstatError;
use imstat_core::fields::{FieldValue, Selection};
use imstat_core::report::{build_report, render_lines, FormatMode, Report, ReturnShape};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_selection() -> Selection {
    Selection {
        labels: vec!["image", "npix"],
        values: vec![
            FieldValue::Text("m51.fits".to_string()),
            FieldValue::Count(100),
        ],
        skipped: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Mode parsing
// ---------------------------------------------------------------------------

#[test]
fn test_format_mode_from_str() {
    assert_eq!(FormatMode::from_str("yes").unwrap(), FormatMode::Labeled);
    assert_eq!(FormatMode::from_str("no").unwrap(), FormatMode::Unlabeled);
}

#[test]
fn test_format_mode_rejects_unknown() {
    let err = FormatMode::from_str("maybe").unwrap_err();
    assert!(matches!(err, ImstatError::UnknownFormat(_)));
}

#[test]
fn test_return_shape_from_str() {
    assert_eq!(ReturnShape::from_str("str").unwrap(), ReturnShape::Strings);
    assert_eq!(ReturnShape::from_str("arr").unwrap(), ReturnShape::Arrays);
    assert_eq!(ReturnShape::from_str("dict").unwrap(), ReturnShape::Mapping);
}

#[test]
fn test_return_shape_rejects_unknown() {
    let err = ReturnShape::from_str("list").unwrap_err();
    assert!(matches!(err, ImstatError::UnknownReturnType(_)));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_render_labeled_columns() {
    let lines = render_lines(&sample_selection(), FormatMode::Labeled);
    assert_eq!(lines.len(), 2);
    // Each column is right-aligned to the wider of label and value.
    assert_eq!(lines[0], "#    image    npix");
    assert_eq!(lines[1], "  m51.fits     100");
}

#[test]
fn test_render_unlabeled_single_line() {
    let lines = render_lines(&sample_selection(), FormatMode::Unlabeled);
    assert_eq!(lines, vec!["m51.fits    100"]);
}

#[test]
fn test_render_empty_selection() {
    let selection = Selection::default();
    assert!(render_lines(&selection, FormatMode::Labeled).is_empty());
    assert!(render_lines(&selection, FormatMode::Unlabeled).is_empty());
}

#[test]
fn test_render_wide_value_sets_column_width() {
    let selection = Selection {
        labels: vec!["npix"],
        values: vec![FieldValue::Count(123_456_789)],
        skipped: Vec::new(),
    };
    let lines = render_lines(&selection, FormatMode::Labeled);
    assert_eq!(lines[0], "#      npix");
    assert_eq!(lines[1], "  123456789");
}

// ---------------------------------------------------------------------------
// Structured reports
// ---------------------------------------------------------------------------

#[test]
fn test_build_report_strings() {
    let report = build_report(&sample_selection(), ReturnShape::Strings);
    assert_eq!(
        report,
        Report::Strings {
            header: "image,npix".to_string(),
            values: "m51.fits,100".to_string(),
        }
    );
}

#[test]
fn test_build_report_arrays() {
    let report = build_report(&sample_selection(), ReturnShape::Arrays);
    let Report::Arrays { labels, values } = report else {
        panic!("expected array report");
    };
    assert_eq!(labels, vec!["image", "npix"]);
    assert_eq!(values[1], FieldValue::Count(100));
}

#[test]
fn test_build_report_mapping() {
    let report = build_report(&sample_selection(), ReturnShape::Mapping);
    let Report::Mapping(map) = report else {
        panic!("expected mapping report");
    };
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("npix"), Some(&FieldValue::Count(100)));
    assert_eq!(
        map.get("image"),
        Some(&FieldValue::Text("m51.fits".to_string()))
    );
}
