// 👪 Family Definitions - the hand-written ground truth a run starts from
//
// A family is one parent organization (optional) plus its subsidiaries.
// The JSON document is an external fixture; this module only reads it.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// FAMILY DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDefinition {
    /// Family identifier (strings or bare numbers are both accepted)
    #[serde(deserialize_with = "string_or_number")]
    pub family_id: String,

    /// Parent organization name; None = family of standalone entities
    #[serde(default)]
    pub parent: Option<String>,

    /// Parent tax id, inherited by children that don't override it
    #[serde(default)]
    pub tax_id: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// Child entities, in generation order
    #[serde(default)]
    pub entities: Vec<ChildDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDefinition {
    pub name: String,

    #[serde(default)]
    pub tax_id: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// Organization type (commercial, medicare, medicaid, exchange...)
    #[serde(default, rename = "type")]
    pub payor_type: Option<String>,

    /// Line of business (PPO, HMO, ...)
    #[serde(default)]
    pub lob: Option<String>,

    /// Doing-business-as name
    #[serde(default)]
    pub dba: Option<String>,

    /// Regulatory (CMS) plan/contract id
    #[serde(default)]
    pub cms_plan_id: Option<String>,
}

impl FamilyDefinition {
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Number of canonical entities this family expands to
    pub fn entity_count(&self) -> usize {
        self.entities.len() + usize::from(self.has_parent())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

// ============================================================================
// LOADING
// ============================================================================

/// Load family definitions from a JSON file
pub fn load_families<P: AsRef<Path>>(path: P) -> Result<Vec<FamilyDefinition>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read families file: {:?}", path.as_ref()))?;

    parse_families(&content)
        .with_context(|| format!("Invalid families file: {:?}", path.as_ref()))
}

/// Parse and sanity-check a family document
pub fn parse_families(json: &str) -> Result<Vec<FamilyDefinition>> {
    let families: Vec<FamilyDefinition> =
        serde_json::from_str(json).context("Failed to parse families JSON")?;

    if families.is_empty() {
        bail!("Family document contains no families");
    }

    let mut seen_ids = HashSet::new();
    for (i, family) in families.iter().enumerate() {
        if family.family_id.trim().is_empty() {
            bail!("Family #{} has an empty family_id", i + 1);
        }
        if !seen_ids.insert(family.family_id.as_str()) {
            bail!("Family id {} is defined more than once", family.family_id);
        }
        if family.parent.as_deref().is_some_and(|p| p.trim().is_empty()) {
            bail!("Family {} has an empty parent name", family.family_id);
        }
        if family.entity_count() == 0 {
            bail!("Family {} defines no parent and no entities", family.family_id);
        }
        if let Some(child) = family.entities.iter().find(|c| c.name.trim().is_empty()) {
            bail!("Family {} has a child with an empty name ({:?})", family.family_id, child);
        }
    }

    Ok(families)
}

// ============================================================================
// TESTS
// ============================================================================
