// 📄 Source Records - what each upstream system's export looks like
//
// Field order here IS the column order of the CSV files. None serializes
// as an empty cell. Records carry only a source-local id, never the
// canonical entity id.

use serde::Serialize;

// ============================================================================
// CRM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrmRecord {
    pub src_payor_id: String,
    pub payor_name: String,
    pub payor_name_2: Option<String>,
    pub tax_id: Option<String>,
    pub npi: Option<String>,
    pub cms_plan_id: Option<String>,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub payor_type: String,
    /// CRM id of the parent's record (relationship capture is incomplete)
    pub parent_payor_id: Option<String>,
    /// active | inactive | terminated
    pub status: String,
    pub effective_date: String,
    pub termination_date: Option<String>,
}

// ============================================================================
// CLAIMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimsRecord {
    pub claims_payor_code: String,
    pub payor_name: String,
    pub tax_id: Option<String>,
    /// Single-line composite address
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub payor_type: Option<String>,
    pub line_of_business: String,
    /// May be stale (inactive payor still reported active)
    pub is_active: bool,
}

// ============================================================================
// CREDENTIALING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialingRecord {
    pub cred_payor_id: String,
    pub organization_name: String,
    pub doing_business_as: Option<String>,
    pub ein: Option<String>,
    pub street_address: String,
    pub suite: Option<String>,
    pub city: String,
    pub state_code: Option<String>,
    pub postal_code: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub plan_type: String,
    pub network_status: String,
}

// ============================================================================
// REFERENCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRecord {
    pub ref_id: String,
    pub official_name: String,
    pub parent_org_name: Option<String>,
    /// Clean: reference data is treated as authoritative
    pub tax_id: Option<String>,
    pub cms_contract_id: Option<String>,
    pub plan_type: String,
    pub state: Option<String>,
    pub enrollment_count: Option<u32>,
    pub star_rating: Option<f64>,
    pub source_url: String,
}
