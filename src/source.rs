// 🏷️ Source Systems - the four upstream systems a payor can show up in
// Every mess rule dispatches on this enum, never on strings

use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE SYSTEM
// ============================================================================

/// SourceSystem - Which simulated upstream system produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSystem {
    /// Sales/relationship CRM: cleanest names, dashed tax ids
    Crm,

    /// Claims adjudication: upper-case names, single-line addresses, stale status
    Claims,

    /// Provider credentialing: DBA-style names, split suite field
    Credentialing,

    /// Regulatory reference data: treated as authoritative
    Reference,
}

impl SourceSystem {
    /// All sources in generation order
    pub const ALL: [SourceSystem; 4] = [
        SourceSystem::Crm,
        SourceSystem::Claims,
        SourceSystem::Credentialing,
        SourceSystem::Reference,
    ];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceSystem::Crm => "CRM",
            SourceSystem::Claims => "Claims",
            SourceSystem::Credentialing => "Credentialing",
            SourceSystem::Reference => "Reference",
        }
    }

    /// Short code for internal use
    pub fn code(&self) -> &'static str {
        match self {
            SourceSystem::Crm => "crm",
            SourceSystem::Claims => "claims",
            SourceSystem::Credentialing => "credentialing",
            SourceSystem::Reference => "cms_reference",
        }
    }

    /// Prefix of the source-local record identifier
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SourceSystem::Crm => "CRM",
            SourceSystem::Claims => "CLM",
            SourceSystem::Credentialing => "CRED",
            SourceSystem::Reference => "REF",
        }
    }

    /// Output file for this source's records
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceSystem::Crm => "src_crm_payors.csv",
            SourceSystem::Claims => "src_claims_payors.csv",
            SourceSystem::Credentialing => "src_credentialing_payors.csv",
            SourceSystem::Reference => "src_reference_payors.csv",
        }
    }

    /// Format a source-local identifier, e.g. `CRM-0007`
    pub fn record_id(&self, index: usize) -> String {
        format!("{}-{:04}", self.id_prefix(), index)
    }
}

impl std::fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// TESTS
// ============================================================================
