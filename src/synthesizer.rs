// 🏭 Source Record Synthesizer - canonical entities → four dirty source feeds
//
// Per entity, each source gets an independent presence draw. Present records
// are dirtied field by field through `mess`. After the per-entity pass, the
// corpus gets its structural anomalies: orphan CRM records that match
// nothing, and claims records that confuse a child with its parent.
//
// Draw order matters: the same seed only reproduces the same corpus if
// entities and sources are visited in exactly this order.

use crate::config::{GeneratorConfig, SourceMix};
use crate::context::{pick, GenerationContext};
use crate::entities::CanonicalEntity;
use crate::fabricate;
use crate::mess::{
    address_variant, maybe_null, maybe_stale_status, name_variant, phone_variant,
    single_line_address, state_variant, tax_id_variant, zip_variant,
};
use crate::records::{ClaimsRecord, CredentialingRecord, CrmRecord, ReferenceRecord};
use crate::source::SourceSystem;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::{debug, info};

const NETWORK_STATUSES: &[&str] = &["in_network", "in_network", "in_network", "out_of_network", "pending"];
const INACTIVE_STATUSES: &[&str] = &["inactive", "terminated"];
const ORPHAN_TYPES: &[&str] = &["commercial", "exchange"];

// ============================================================================
// CORPUS
// ============================================================================

/// Everything one run produces, ready to be written
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceCorpus {
    pub crm: Vec<CrmRecord>,
    pub claims: Vec<ClaimsRecord>,
    pub credentialing: Vec<CredentialingRecord>,
    pub reference: Vec<ReferenceRecord>,
    pub stats: CorpusStats,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CorpusStats {
    pub entities: usize,
    pub crm: usize,
    pub claims: usize,
    pub credentialing: usize,
    pub reference: usize,
    /// Extra CRM records for an entity already in CRM
    pub duplicates: usize,
    pub orphans: usize,
    /// Claims records carrying the parent's name with the child's tax id
    pub confusions: usize,
    /// CRM records that kept a parent_payor_id
    pub parent_links: usize,
}

impl CorpusStats {
    pub fn total(&self) -> usize {
        self.crm + self.claims + self.credentialing + self.reference
    }

    pub fn count(&self, source: SourceSystem) -> usize {
        match source {
            SourceSystem::Crm => self.crm,
            SourceSystem::Claims => self.claims,
            SourceSystem::Credentialing => self.credentialing,
            SourceSystem::Reference => self.reference,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} records from {} entities ({} duplicates, {} orphans, {} confusions)",
            self.total(),
            self.entities,
            self.duplicates,
            self.orphans,
            self.confusions
        )
    }
}

/// Next-id counters per source + where each entity landed in CRM
#[derive(Default)]
struct RunState {
    crm_idx: usize,
    claims_idx: usize,
    cred_idx: usize,
    ref_idx: usize,
    /// entity_id -> CRM id of its first CRM record
    crm_ids: HashMap<u64, String>,
}

// ============================================================================
// SYNTHESIZER
// ============================================================================

pub struct SourceRecordSynthesizer {
    pub source_mix: SourceMix,
    pub duplicate_rate: f64,
    pub parent_link_rate: f64,
    pub orphans: RangeInclusive<u32>,
    pub confusion_rate: f64,
    pub confusion_cap: u32,
}

impl SourceRecordSynthesizer {
    /// Synthesizer with the default rates
    pub fn new() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        SourceRecordSynthesizer {
            source_mix: config.source_mix.clone(),
            duplicate_rate: config.duplicate_rate,
            parent_link_rate: config.parent_link_rate,
            orphans: config.orphans_min..=config.orphans_max,
            confusion_rate: config.confusion_rate,
            confusion_cap: config.confusion_cap,
        }
    }

    /// Produce the four source collections plus corpus-level anomalies
    pub fn synthesize(&self, entities: &[CanonicalEntity], ctx: &mut GenerationContext) -> SourceCorpus {
        let mut corpus = SourceCorpus::default();
        let mut state = RunState::default();
        corpus.stats.entities = entities.len();

        for entity in entities {
            self.emit_for_entity(entity, &mut state, &mut corpus, ctx);
        }

        self.inject_orphans(&mut state, &mut corpus, ctx);
        self.inject_parent_child_confusion(entities, &mut state, &mut corpus, ctx);

        corpus.stats.crm = corpus.crm.len();
        corpus.stats.claims = corpus.claims.len();
        corpus.stats.credentialing = corpus.credentialing.len();
        corpus.stats.reference = corpus.reference.len();
        corpus.stats.parent_links = corpus.crm.iter().filter(|r| r.parent_payor_id.is_some()).count();

        info!(
            crm = corpus.stats.crm,
            claims = corpus.stats.claims,
            credentialing = corpus.stats.credentialing,
            reference = corpus.stats.reference,
            "corpus synthesized"
        );

        corpus
    }

    // ------------------------------------------------------------------------
    // Per-entity pass
    // ------------------------------------------------------------------------

    fn emit_for_entity(
        &self,
        entity: &CanonicalEntity,
        state: &mut RunState,
        corpus: &mut SourceCorpus,
        ctx: &mut GenerationContext,
    ) {
        if ctx.chance(self.source_mix.crm) {
            state.crm_idx += 1;
            let record = self.crm_record(entity, state.crm_idx, &state.crm_ids, ctx);
            state.crm_ids.insert(entity.entity_id, record.src_payor_id.clone());
            corpus.crm.push(record);

            if ctx.chance(self.duplicate_rate) {
                state.crm_idx += 1;
                let mut dup = self.crm_record(entity, state.crm_idx, &state.crm_ids, ctx);
                dup.payor_name = name_variant(&entity.name, SourceSystem::Claims, ctx.rng());
                debug!(entity = entity.entity_id, id = %dup.src_payor_id, "within-source CRM duplicate");
                corpus.crm.push(dup);
                corpus.stats.duplicates += 1;
            }
        }

        if ctx.chance(self.source_mix.claims) {
            state.claims_idx += 1;
            corpus.claims.push(claims_record(entity, state.claims_idx, ctx));
        }

        if ctx.chance(self.source_mix.credentialing) {
            state.cred_idx += 1;
            corpus.credentialing.push(credentialing_record(entity, state.cred_idx, ctx));
        }

        if ctx.chance(self.source_mix.reference) {
            state.ref_idx += 1;
            corpus.reference.push(reference_record(entity, state.ref_idx, ctx));
        }
    }

    fn crm_record(
        &self,
        entity: &CanonicalEntity,
        idx: usize,
        crm_ids: &HashMap<u64, String>,
        ctx: &mut GenerationContext,
    ) -> CrmRecord {
        let src = SourceSystem::Crm;

        let payor_name = name_variant(&entity.name, src, ctx.rng());
        let payor_name_2 = match &entity.dba {
            Some(dba) => Some(dba.clone()),
            None if ctx.chance(0.2) => entity.parent_name.clone(),
            None => None,
        };
        let tax_id = tax_id_variant(entity.tax_id.as_deref(), src, ctx.rng());
        let address_line_1 = address_variant(&entity.address, ctx.rng());
        let address_line_2 = suite(ctx, 0.3, "Suite");
        let phone = phone_variant(Some(&entity.phone), ctx.rng());
        let website = maybe_null(Some(entity.website.clone()), 0.1, ctx.rng());

        // Only links to a parent that actually made it into CRM
        let parent_payor_id = match entity.parent_entity_id {
            Some(parent_id) if ctx.chance(self.parent_link_rate) => crm_ids.get(&parent_id).cloned(),
            _ => None,
        };

        let (status, termination_date) = crm_status(entity, ctx);

        CrmRecord {
            src_payor_id: src.record_id(idx),
            payor_name,
            payor_name_2,
            tax_id,
            npi: entity.npi.clone(),
            cms_plan_id: entity.cms_plan_id.clone(),
            address_line_1,
            address_line_2,
            city: entity.city.clone(),
            state: entity.state.clone(),
            zip: Some(entity.zip.clone()),
            phone,
            website,
            payor_type: entity.payor_type.clone(),
            parent_payor_id,
            status,
            effective_date: entity.effective_date.to_string(),
            termination_date: termination_date.map(|d| d.to_string()),
        }
    }

    // ------------------------------------------------------------------------
    // Corpus-level anomalies
    // ------------------------------------------------------------------------

    /// CRM-only records for organizations that exist nowhere else
    fn inject_orphans(&self, state: &mut RunState, corpus: &mut SourceCorpus, ctx: &mut GenerationContext) {
        let count = ctx.rng().gen_range(self.orphans.clone());

        for _ in 0..count {
            state.crm_idx += 1;
            let record = orphan_record(state.crm_idx, ctx);
            debug!(id = %record.src_payor_id, name = %record.payor_name, "orphan CRM record");
            corpus.crm.push(record);
            corpus.stats.orphans += 1;
        }
    }

    /// Claims records filed under the parent's name with the child's tax id
    fn inject_parent_child_confusion(
        &self,
        entities: &[CanonicalEntity],
        state: &mut RunState,
        corpus: &mut SourceCorpus,
        ctx: &mut GenerationContext,
    ) {
        let mut confused: u32 = 0;

        for entity in entities {
            let Some(parent_name) = &entity.parent_name else {
                continue;
            };

            // Draw happens even once the cap is hit, so the stream stays aligned
            if ctx.chance(self.confusion_rate) && confused < self.confusion_cap {
                state.claims_idx += 1;
                let mut record = claims_record(entity, state.claims_idx, ctx);
                record.payor_name = name_variant(parent_name, SourceSystem::Claims, ctx.rng());
                record.tax_id = tax_id_variant(entity.tax_id.as_deref(), SourceSystem::Claims, ctx.rng());
                debug!(entity = entity.entity_id, id = %record.claims_payor_code, "parent/child confusion");
                corpus.claims.push(record);
                confused += 1;
            }
        }

        corpus.stats.confusions = confused as usize;
    }
}

impl Default for SourceRecordSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RECORD SHAPES
// ============================================================================

fn claims_record(entity: &CanonicalEntity, idx: usize, ctx: &mut GenerationContext) -> ClaimsRecord {
    let src = SourceSystem::Claims;

    let line1 = address_variant(&entity.address, ctx.rng());
    let line2 = suite(ctx, 0.2, "Ste");
    let line_state = entity.state.as_deref().map(|s| state_variant(s, src, ctx.rng()));
    let line_zip = zip_variant(Some(&entity.zip), src, ctx.rng());
    let address = single_line_address(
        &line1,
        line2.as_deref(),
        Some(&entity.city),
        line_state.as_deref(),
        line_zip.as_deref(),
    );

    let payor_name = name_variant(&entity.name, src, ctx.rng());
    let tax_id = maybe_null(entity.tax_id.as_deref(), 0.15, ctx.rng());
    let tax_id = tax_id_variant(tax_id, src, ctx.rng());
    let city = maybe_null(Some(entity.city.clone()), 0.1, ctx.rng());
    let state = entity.state.as_deref().map(|s| state_variant(s, src, ctx.rng()));
    let zip = zip_variant(Some(&entity.zip), src, ctx.rng());
    let payor_type = maybe_null(Some(entity.payor_type.clone()), 0.1, ctx.rng());
    let is_active = maybe_stale_status(entity.is_active, src, ctx.rng());

    ClaimsRecord {
        claims_payor_code: src.record_id(idx),
        payor_name,
        tax_id,
        address,
        city,
        state,
        zip,
        payor_type,
        line_of_business: entity.lob.clone(),
        is_active,
    }
}

fn credentialing_record(entity: &CanonicalEntity, idx: usize, ctx: &mut GenerationContext) -> CredentialingRecord {
    let src = SourceSystem::Credentialing;

    let organization_name = name_variant(&entity.name, src, ctx.rng());
    let doing_business_as = match &entity.dba {
        Some(dba) => Some(dba.clone()),
        None if ctx.chance(0.15) => Some(name_variant(&entity.name, SourceSystem::Claims, ctx.rng())),
        None => None,
    };
    let ein = maybe_null(entity.tax_id.as_deref(), 0.2, ctx.rng());
    let ein = tax_id_variant(ein, src, ctx.rng());
    let street_address = address_variant(&entity.address, ctx.rng());
    let suite = suite(ctx, 0.25, "Suite");
    let postal_code = zip_variant(Some(&entity.zip), src, ctx.rng());
    let contact_phone = maybe_null(Some(entity.phone.as_str()), 0.2, ctx.rng());
    let contact_phone = phone_variant(contact_phone, ctx.rng());
    let contact_email = maybe_null(Some(contact_email_for(&entity.name)), 0.3, ctx.rng());
    let network_status = pick(ctx.rng(), NETWORK_STATUSES).to_string();

    CredentialingRecord {
        cred_payor_id: src.record_id(idx),
        organization_name,
        doing_business_as,
        ein,
        street_address,
        suite,
        city: entity.city.clone(),
        state_code: entity.state.clone(),
        postal_code,
        contact_phone,
        contact_email,
        plan_type: entity.lob.clone(),
        network_status,
    }
}

fn reference_record(entity: &CanonicalEntity, idx: usize, ctx: &mut GenerationContext) -> ReferenceRecord {
    let src = SourceSystem::Reference;

    let official_name = name_variant(&entity.name, src, ctx.rng());
    let parent_org_name = if ctx.chance(0.7) { entity.parent_name.clone() } else { None };

    // Enrollment and star rating only exist for plans with a CMS contract
    let (enrollment_count, star_rating) = match &entity.cms_plan_id {
        Some(_) => {
            let enrollment = if ctx.chance(0.8) {
                Some(ctx.rng().gen_range(1_000..=5_000_000u32))
            } else {
                None
            };
            let stars: f64 = ctx.rng().gen_range(2.0..=5.0);
            (enrollment, Some((stars * 10.0).round() / 10.0))
        }
        None => (None, None),
    };

    ReferenceRecord {
        ref_id: src.record_id(idx),
        official_name,
        parent_org_name,
        tax_id: entity.tax_id.clone(),
        cms_contract_id: entity.cms_plan_id.clone(),
        plan_type: entity.payor_type.clone(),
        state: entity.state.clone(),
        enrollment_count,
        star_rating,
        source_url: format!(
            "https://data.cms.gov/plans/{}",
            entity.cms_plan_id.as_deref().unwrap_or("NA")
        ),
    }
}

fn orphan_record(idx: usize, ctx: &mut GenerationContext) -> CrmRecord {
    let payor_name = format!("{} Health Plan", fabricate::company(ctx.rng()));
    let state = fabricate::state_abbr(ctx.rng()).to_string();
    let tax_id = format!(
        "{}-{}",
        ctx.rng().gen_range(10..=99),
        ctx.rng().gen_range(1_000_000..=9_999_999)
    );
    let address_line_1 = fabricate::street_address(ctx.rng());
    let city = fabricate::city(ctx.rng());
    let zip = fabricate::zipcode(ctx.rng());
    let phone = fabricate::phone_number(ctx.rng());
    let payor_type = pick(ctx.rng(), ORPHAN_TYPES).to_string();

    CrmRecord {
        src_payor_id: SourceSystem::Crm.record_id(idx),
        payor_name,
        payor_name_2: None,
        tax_id: Some(tax_id),
        npi: None,
        cms_plan_id: None,
        address_line_1,
        address_line_2: None,
        city,
        state: Some(state),
        zip: Some(zip),
        phone: Some(phone),
        website: None,
        payor_type,
        parent_payor_id: None,
        status: "active".to_string(),
        effective_date: orphan_effective_date().to_string(),
        termination_date: None,
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// "Suite 123" / "Ste 456" with probability `p`
fn suite(ctx: &mut GenerationContext, p: f64, label: &str) -> Option<String> {
    if ctx.chance(p) {
        Some(format!("{} {}", label, ctx.rng().gen_range(100..=999)))
    } else {
        None
    }
}

/// Active → ("active", None); inactive → inactive/terminated with an end date
/// 1 to 10 years after the effective date
fn crm_status(entity: &CanonicalEntity, ctx: &mut GenerationContext) -> (String, Option<NaiveDate>) {
    if entity.is_active {
        return ("active".to_string(), None);
    }
    let status = pick(ctx.rng(), INACTIVE_STATUSES).to_string();
    let days = ctx.rng().gen_range(365..=3650);
    (status, Some(entity.effective_date + Duration::days(days)))
}

/// contracts@<first 15 chars of the lower-cased, space-free name>.com
pub fn contact_email_for(name: &str) -> String {
    let local: String = name.to_lowercase().chars().filter(|c| *c != ' ').take(15).collect();
    format!("contracts@{}.com", local)
}

fn orphan_effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN)
}

// ============================================================================
// TESTS
// ============================================================================
