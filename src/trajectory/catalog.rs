use std::{collections::HashSet, path::PathBuf};

use crate::foundation::error::{GeostoryError, GeostoryResult};

/// One selectable dataset (one subject's trajectory).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEntry {
    /// Unique id used to switch to the dataset.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Events file, relative to the catalog's data directory.
    pub file: PathBuf,
    /// First date covered, for display.
    #[serde(default)]
    pub start_date: String,
    /// Last date covered, for display.
    #[serde(default)]
    pub end_date: String,
    /// Free-text summary.
    #[serde(default)]
    pub description: String,
    /// Marks the dataset currently shown.
    #[serde(default)]
    pub active: bool,
}

/// Datasets the viewer can switch between. Exactly one is active at a time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DatasetCatalog {
    /// Every dataset, in display order.
    pub datasets: Vec<DatasetEntry>,
}

impl DatasetCatalog {
    /// Reject an empty catalog and empty or duplicate ids.
    pub fn validate(&self) -> GeostoryResult<()> {
        if self.datasets.is_empty() {
            return Err(GeostoryError::validation("dataset catalog is empty"));
        }
        let mut seen = HashSet::new();
        for d in &self.datasets {
            if d.id.trim().is_empty() {
                return Err(GeostoryError::validation("dataset id must be non-empty"));
            }
            if !seen.insert(d.id.as_str()) {
                return Err(GeostoryError::validation(format!(
                    "duplicate dataset id '{}'",
                    d.id
                )));
            }
        }
        Ok(())
    }

    /// The entry flagged active, or the first entry when none is.
    pub fn active(&self) -> Option<&DatasetEntry> {
        self.datasets
            .iter()
            .find(|d| d.active)
            .or_else(|| self.datasets.first())
    }

    /// Make `id` the active dataset.
    ///
    /// Returns `Ok(None)` when `id` is already active, so the caller skips the reload.
    pub fn activate(&mut self, id: &str) -> GeostoryResult<Option<&DatasetEntry>> {
        if !self.datasets.iter().any(|d| d.id == id) {
            return Err(GeostoryError::validation(format!("unknown dataset '{id}'")));
        }
        if self.active().is_some_and(|d| d.id == id) {
            tracing::debug!(id, "dataset already active");
            return Ok(None);
        }
        for d in &mut self.datasets {
            d.active = d.id == id;
        }
        tracing::info!(id, "dataset switched");
        Ok(self.datasets.iter().find(|d| d.id == id))
    }
}
