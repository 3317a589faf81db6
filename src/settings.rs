// Persisted report header metadata
//
// The export screen remembers the company block between sessions. Stored
// as a small JSON file next to the database; a missing file just means
// defaults (all fields empty).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default settings file name, in the working directory
pub const SETTINGS_FILE: &str = "report_info.json";

/// Report header fields shown at the top of the summary sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub contact: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub report_title: String,
}

impl ReportHeader {
    /// Load settings, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(ReportHeader::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let header = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        Ok(header)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;

        Ok(())
    }

    /// Ordered key/value pairs for the report builder. Insertion order is
    /// the contract; the summary sheet prints these rows as-is.
    pub fn header_info(&self) -> Vec<(String, String)> {
        vec![
            ("Company".to_string(), self.company.clone()),
            ("Address".to_string(), self.address.clone()),
            ("Contact".to_string(), self.contact.clone()),
            ("Phone".to_string(), self.phone.clone()),
            ("Email".to_string(), self.email.clone()),
            ("Report Title".to_string(), self.report_title.clone()),
        ]
    }
}
