//! cohort.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Team-formation settings. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub thresholds: ThresholdsConfig,
    pub teams: TeamsConfig,
    pub phases: PhasesConfig,
}

/// Minimum overlap, in whole hour blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    /// Navigators plus every djangonaut together.
    pub navigator_meeting_hours: u32,
    /// Captain with each djangonaut individually.
    pub captain_overlap_hours: u32,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            navigator_meeting_hours: 5,
            captain_overlap_hours: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub max_djangonauts: usize,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self { max_djangonauts: 3 }
    }
}

/// Selection-rank tiers for the two allocation phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhasesConfig {
    /// Phase 1 takes candidates with `selection_rank <= primary_max_rank`.
    pub primary_max_rank: u32,
    /// Phase 2 takes candidates with exactly this rank.
    pub overflow_rank: u32,
}

impl Default for PhasesConfig {
    fn default() -> Self {
        Self {
            primary_max_rank: 2,
            overflow_rank: 3,
        }
    }
}

impl FormationConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: FormationConfig = toml::from_str(content)?;
        if config.phases.overflow_rank <= config.phases.primary_max_rank {
            anyhow::bail!(
                "phases.overflow_rank ({}) must be above phases.primary_max_rank ({})",
                config.phases.overflow_rank,
                config.phases.primary_max_rank
            );
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
