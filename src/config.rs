// ⚙️ Generator Configuration - seed, paths and corpus-level rates
//
// Loaded from JSON (every field optional) and then overridden by CLI flags.
// Per-field mess probabilities are fixed in `mess`; only the knobs that
// shape the corpus as a whole live here.

use crate::source::SourceSystem;
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// SOURCE MIX
// ============================================================================

/// Chance that a canonical entity shows up in each source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMix {
    pub crm: f64,
    pub claims: f64,
    pub credentialing: f64,
    pub reference: f64,
}

impl Default for SourceMix {
    fn default() -> Self {
        SourceMix {
            crm: 0.90,
            claims: 0.80,
            credentialing: 0.60,
            reference: 0.40,
        }
    }
}

impl SourceMix {
    pub fn probability(&self, source: SourceSystem) -> f64 {
        match source {
            SourceSystem::Crm => self.crm,
            SourceSystem::Claims => self.claims,
            SourceSystem::Credentialing => self.credentialing,
            SourceSystem::Reference => self.reference,
        }
    }
}

// ============================================================================
// GENERATOR CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the single random stream of the run
    pub seed: u64,

    /// Family definition document (JSON)
    pub families_path: PathBuf,

    /// Directory the CSV files are written to
    pub output_dir: PathBuf,

    pub source_mix: SourceMix,

    /// Chance of a second CRM record for the same entity (default: 0.05)
    pub duplicate_rate: f64,

    /// Chance a CRM child record keeps its parent link (default: 0.60)
    pub parent_link_rate: f64,

    /// Inclusive range of orphan CRM records (default: 5..=8)
    pub orphans_min: u32,
    pub orphans_max: u32,

    /// Chance per child of a parent/child confusion claims record (default: 0.25)
    pub confusion_rate: f64,

    /// Max confusion records per run (default: 8)
    pub confusion_cap: u32,

    /// Also write the canonical entities as a ground-truth CSV
    pub emit_ground_truth: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 42,
            families_path: PathBuf::from("data/payor_families.json"),
            output_dir: PathBuf::from("output"),
            source_mix: SourceMix::default(),
            duplicate_rate: 0.05,
            parent_link_rate: 0.60,
            orphans_min: 5,
            orphans_max: 8,
            confusion_rate: 0.25,
            confusion_cap: 8,
            emit_ground_truth: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: GeneratorConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject probabilities outside [0, 1] and inverted ranges
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("source_mix.crm", self.source_mix.crm),
            ("source_mix.claims", self.source_mix.claims),
            ("source_mix.credentialing", self.source_mix.credentialing),
            ("source_mix.reference", self.source_mix.reference),
            ("duplicate_rate", self.duplicate_rate),
            ("parent_link_rate", self.parent_link_rate),
            ("confusion_rate", self.confusion_rate),
        ];

        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be between 0.0 and 1.0, got {}", name, value);
            }
        }

        if self.orphans_min > self.orphans_max {
            bail!(
                "orphans_min ({}) must not exceed orphans_max ({})",
                self.orphans_min,
                self.orphans_max
            );
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
