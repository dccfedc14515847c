use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clip::{filter_and_clip, ClipParams};
use crate::consts::{DEFAULT_BINWIDTH, DEFAULT_FIELDS};
use crate::error::Result;
use crate::fields::{parse_field_list, select, Selection};
use crate::region::load_section;
use crate::stats::{compute_statistics, ImageStatistics};

/// Configuration for one statistics run.
///
/// The `clip` table comes last so the TOML form serializes with the
/// scalar settings at the top.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatConfig {
    /// Comma-separated list of fields to report.
    #[serde(default = "default_fields")]
    pub fields: String,
    /// Histogram bin width in units of the sample stddev.
    #[serde(default = "default_binwidth")]
    pub binwidth: f64,
    /// Pixel rejection parameters.
    #[serde(default)]
    pub clip: ClipParams,
}

fn default_fields() -> String {
    DEFAULT_FIELDS.to_string()
}
fn default_binwidth() -> f64 {
    DEFAULT_BINWIDTH
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.to_string(),
            binwidth: DEFAULT_BINWIDTH,
            clip: ClipParams::default(),
        }
    }
}

/// Everything one run produces: the full statistics record plus the
/// fields the caller asked for.
#[derive(Clone, Debug)]
pub struct StatOutcome {
    pub stats: ImageStatistics,
    pub selection: Selection,
}

/// Run the whole pipeline for one region string.
///
/// Loads the section named by `instring` (paths resolved against
/// `base_dir`), applies the range filter and any sigma-clipping passes,
/// computes the statistics record, and resolves the requested fields.
/// Unknown field names are logged and skipped, not fatal.
pub fn run_imstat(instring: &str, base_dir: &Path, config: &StatConfig) -> Result<StatOutcome> {
    let section = load_section(instring, base_dir)?;
    info!(
        image = %section.image,
        height = section.height(),
        width = section.width(),
        "Loaded image section"
    );

    let filtered = filter_and_clip(&section.data, &config.clip);
    let stats = compute_statistics(&section.image, &filtered, config.binwidth);

    let names = parse_field_list(&config.fields);
    let selection = select(&stats, &names);
    for name in &selection.skipped {
        warn!(field = %name, "Ignoring unknown field");
    }

    Ok(StatOutcome { stats, selection })
}
