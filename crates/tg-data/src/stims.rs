use serde::{Deserialize, Serialize};

use tg_types::{config_error, SweepError, SweepResult};

use crate::features::FeatureTable;

/// The stim panel this cohort's assays cover.
pub const STIM_PANEL: [&str; 5] = ["ifna", "il246", "unstim", "lps", "gmcsf"];

/// Marker in an input file stem selecting the whole panel.
const ALL_STIMS_MARKER: &str = "allstims";

/// One stim's slice of the feature table, by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimPartition {
    pub stim: String,
    pub columns: Vec<String>,
}

/// Which stims an input file covers, judged from its file stem.
///
/// A stem containing `allstims` selects the whole panel; otherwise the
/// panel names contained in the stem are selected. A stem naming no stim
/// at all falls back to the whole panel.
pub fn stims_for_input(stem: &str) -> Vec<String> {
    let lowered = stem.to_lowercase();
    if lowered.contains(ALL_STIMS_MARKER) {
        return full_panel();
    }

    let matched: Vec<String> = STIM_PANEL
        .iter()
        .filter(|stim| lowered.contains(*stim))
        .map(|stim| stim.to_string())
        .collect();

    if matched.is_empty() {
        tracing::warn!(
            "Input stem '{}' names no known stim, assuming the full panel",
            stem
        );
        return full_panel();
    }
    matched
}

fn full_panel() -> Vec<String> {
    STIM_PANEL.iter().map(|stim| stim.to_string()).collect()
}

/// Partition feature columns by their case-insensitive `_<stim>` suffix.
///
/// Stims with no matching columns are omitted. An entirely empty partition
/// means the feature naming does not follow the stim convention, which the
/// engine cannot work with.
pub fn split_by_stim(features: &FeatureTable, stims: &[String]) -> SweepResult<Vec<StimPartition>> {
    let lowered: Vec<String> = features
        .columns
        .iter()
        .map(|column| column.to_lowercase())
        .collect();

    let mut partitions = Vec::new();
    for stim in stims {
        let suffix = format!("_{}", stim.to_lowercase());
        let columns: Vec<String> = features
            .columns
            .iter()
            .zip(lowered.iter())
            .filter(|(_, low)| low.ends_with(&suffix))
            .map(|(column, _)| column.clone())
            .collect();

        if columns.is_empty() {
            tracing::debug!("No feature columns for stim '{}'", stim);
            continue;
        }
        partitions.push(StimPartition {
            stim: stim.clone(),
            columns,
        });
    }

    if partitions.is_empty() {
        return Err(config_error!(
            "No stim-specific feature columns found; check your feature names"
        ));
    }

    tracing::info!(
        "Split {} feature columns into {} stim partitions",
        features.n_features(),
        partitions.len()
    );
    Ok(partitions)
}
