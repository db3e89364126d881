use crate::core::{default_continent_tags, ContinentTag};
use crate::errors::{AuditError, Result};
use crate::io::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of `.record-audit.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordAuditConfig {
    #[serde(default)]
    pub audit: Option<AuditSection>,

    /// Continent id → continental record tag, layered over the built-in table
    #[serde(default)]
    pub continents: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSection {
    /// First competition year in the audit window
    #[serde(default)]
    pub target_year: Option<i32>,

    #[serde(default)]
    pub parallel: Option<bool>,

    /// Worker threads; 0 lets rayon pick
    #[serde(default)]
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: Option<OutputFormat>,
}

impl RecordAuditConfig {
    pub fn target_year(&self) -> Option<i32> {
        self.audit.as_ref().and_then(|a| a.target_year)
    }

    pub fn parallel(&self) -> bool {
        self.audit.as_ref().and_then(|a| a.parallel).unwrap_or(true)
    }

    pub fn jobs(&self) -> usize {
        self.audit.as_ref().and_then(|a| a.jobs).unwrap_or(0)
    }

    pub fn default_format(&self) -> Option<OutputFormat> {
        self.output.as_ref().and_then(|o| o.default_format)
    }

    /// The built-in continent tags with the `[continents]` overrides applied.
    pub fn continent_tags(&self) -> Result<BTreeMap<String, ContinentTag>> {
        let mut tags = default_continent_tags();
        for (continent_id, raw) in self.continents.iter().flatten() {
            let tag = raw.parse::<ContinentTag>().map_err(|_| {
                AuditError::config(format!(
                    "continent '{}' maps to unknown record tag '{}' (expected one of {})",
                    continent_id,
                    raw,
                    ContinentTag::ALL.map(|t| t.as_str()).join(", ")
                ))
            })?;
            tags.insert(continent_id.clone(), tag);
        }
        Ok(tags)
    }
}

/// Contents written by `record-audit init`.
pub fn default_config_toml() -> String {
    let tags: String = default_continent_tags()
        .iter()
        .map(|(id, tag)| format!("\"{}\" = \"{}\"\n", id, tag))
        .collect();
    format!(
        "# record-audit configuration\n\n\
         [audit]\n\
         # target_year = 2024\n\
         parallel = true\n\
         jobs = 0\n\n\
         [continents]\n\
         {}\n\
         [output]\n\
         default_format = \"terminal\"\n",
        tags
    )
}
