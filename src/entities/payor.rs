// 🏥 Payor Entity - canonical ground truth for one organization
//
// Built once per run from family definitions, never mutated afterwards.
// Source records are dirty projections of these; they never carry
// `entity_id`, so the downstream matcher has to rediscover the linkage.

use crate::context::GenerationContext;
use crate::entities::family::{ChildDefinition, FamilyDefinition};
use crate::fabricate;
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

// ============================================================================
// CANONICAL ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEntity {
    /// Dense run-local identity (1..N)
    pub entity_id: u64,

    /// Back-reference to the family it was expanded from
    pub family_id: String,

    pub name: String,
    pub tax_id: Option<String>,
    pub state: Option<String>,
    pub city: String,
    pub address: String,
    pub zip: String,
    pub phone: String,
    pub website: String,

    #[serde(rename = "type")]
    pub payor_type: String,

    pub lob: String,

    pub is_parent: bool,

    /// Parent's entity_id (back-reference only)
    pub parent_entity_id: Option<u64>,

    /// Denormalized copy of the parent's name
    pub parent_name: Option<String>,

    pub is_active: bool,
    pub effective_date: NaiveDate,
    pub dba: Option<String>,
    pub cms_plan_id: Option<String>,
    pub npi: Option<String>,
}

impl CanonicalEntity {
    pub fn has_parent(&self) -> bool {
        self.parent_entity_id.is_some()
    }
}

// ============================================================================
// ENTITY BUILDER
// ============================================================================

/// Expands family definitions into canonical entities
///
/// Parents come first within their family, then children in input order.
/// Ids are allocated from the context so they stay dense across families.
pub struct EntityBuilder {
    /// Organization type forced on parents
    pub parent_type: String,

    /// Line of business forced on parents
    pub parent_lob: String,

    /// Chance a child is inactive (default: 0.08)
    pub inactive_rate: f64,

    /// NPI presence for parents (default: 0.30) and children (default: 0.20)
    pub parent_npi_rate: f64,
    pub child_npi_rate: f64,
}

impl EntityBuilder {
    pub fn new() -> Self {
        EntityBuilder {
            parent_type: "commercial".to_string(),
            parent_lob: "PPO".to_string(),
            inactive_rate: 0.08,
            parent_npi_rate: 0.30,
            child_npi_rate: 0.20,
        }
    }

    /// Build the canonical entity list for all families, in order
    pub fn build(&self, families: &[FamilyDefinition], ctx: &mut GenerationContext) -> Vec<CanonicalEntity> {
        let mut entities = Vec::with_capacity(families.iter().map(|f| f.entity_count()).sum());

        for family in families {
            let parent_id = match &family.parent {
                Some(parent_name) => {
                    let parent = self.build_parent(family, parent_name, ctx);
                    let id = parent.entity_id;
                    entities.push(parent);
                    Some(id)
                }
                None => None,
            };

            for child in &family.entities {
                entities.push(self.build_child(family, child, parent_id, ctx));
            }

            debug!(family = %family.family_id, entities = family.entity_count(), "family expanded");
        }

        entities
    }

    fn build_parent(&self, family: &FamilyDefinition, name: &str, ctx: &mut GenerationContext) -> CanonicalEntity {
        let entity_id = ctx.next_entity_id();
        let city = match family.city.as_deref() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => fabricate::city(ctx.rng()),
        };
        let address = fabricate::street_address(ctx.rng());
        let zip = postal_code(family.state.as_deref(), ctx);
        let phone = fabricate::phone_number(ctx.rng());
        let year = 2000 + ctx.rng().gen_range(0..=15);
        let npi = if ctx.chance(self.parent_npi_rate) {
            Some(fabricate::npi(ctx.rng()))
        } else {
            None
        };

        CanonicalEntity {
            entity_id,
            family_id: family.family_id.clone(),
            name: name.to_string(),
            tax_id: family.tax_id.clone(),
            state: family.state.clone(),
            city,
            address,
            zip,
            phone,
            website: website_for(name),
            payor_type: self.parent_type.clone(),
            lob: self.parent_lob.clone(),
            is_parent: true,
            parent_entity_id: None,
            parent_name: None,
            is_active: true,
            effective_date: first_of_month(year, 1),
            dba: None,
            cms_plan_id: None,
            npi,
        }
    }

    fn build_child(
        &self,
        family: &FamilyDefinition,
        child: &ChildDefinition,
        parent_id: Option<u64>,
        ctx: &mut GenerationContext,
    ) -> CanonicalEntity {
        let entity_id = ctx.next_entity_id();
        let state = child.state.clone().or_else(|| family.state.clone());
        let city = match child.city.as_deref().or(family.city.as_deref()) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => fabricate::city(ctx.rng()),
        };
        let address = fabricate::street_address(ctx.rng());
        let zip = postal_code(state.as_deref(), ctx);
        let phone = fabricate::phone_number(ctx.rng());
        let is_active = !ctx.chance(self.inactive_rate);
        let year = 2000 + ctx.rng().gen_range(0..=20);
        let month = ctx.rng().gen_range(1..=12);
        let npi = if ctx.chance(self.child_npi_rate) {
            Some(fabricate::npi(ctx.rng()))
        } else {
            None
        };

        CanonicalEntity {
            entity_id,
            family_id: family.family_id.clone(),
            name: child.name.clone(),
            tax_id: child.tax_id.clone().or_else(|| family.tax_id.clone()),
            state,
            city,
            address,
            zip,
            phone,
            website: website_for(&child.name),
            payor_type: child.payor_type.clone().unwrap_or_else(|| "commercial".to_string()),
            lob: child.lob.clone().unwrap_or_else(|| "PPO".to_string()),
            is_parent: false,
            parent_entity_id: parent_id,
            parent_name: parent_id.and(family.parent.clone()),
            is_active,
            effective_date: first_of_month(year, month),
            dba: child.dba.clone(),
            cms_plan_id: child.cms_plan_id.clone(),
            npi,
        }
    }
}

impl Default for EntityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// ZIP in the entity's state, or a generic ZIP when the state is missing/unknown
fn postal_code(state: Option<&str>, ctx: &mut GenerationContext) -> String {
    match state.filter(|s| !s.is_empty()) {
        Some(code) => match fabricate::zipcode_in_state(ctx.rng(), code) {
            Some(zip) => zip,
            None => {
                warn!(state = code, "unknown state code, using generic postal code");
                fabricate::zipcode(ctx.rng())
            }
        },
        None => fabricate::zipcode(ctx.rng()),
    }
}

/// "Acme Health, Inc." -> "https://www.acmehealthinc..com" (first 20 chars)
///
/// Commas are dropped for children as well as parents, so no entity ever
/// gets a comma in its host name.
pub fn website_for(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != ',')
        .take(20)
        .collect();
    format!("https://www.{}.com", slug)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::family::parse_families;
    use std::collections::HashSet;

    fn sample_families() -> Vec<FamilyDefinition> {
        parse_families(
            r#"[
            {"family_id": "F01", "parent": "Acme Health, Inc.", "tax_id": "12-3456789", "state": "TX",
             "entities": [
                {"name": "Acme Health of Dallas", "state": "TX"},
                {"name": "Acme Health of Tulsa", "state": "OK", "city": "Tulsa", "tax_id": "98-7654321",
                 "type": "medicare", "lob": "HMO", "cms_plan_id": "H5555"}
             ]},
            {"family_id": "F02",
             "entities": [
                {"name": "Lone Star Care", "state": "TX", "city": "Houston"},
                {"name": "Nowhere Plan", "state": "ZZ"}
             ]}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ids_dense_across_families() {
        let mut ctx = GenerationContext::new(42);
        let entities = EntityBuilder::new().build(&sample_families(), &mut ctx);
        let ids: Vec<u64> = entities.iter().map(|e| e.entity_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(ctx.entities_allocated(), 5);
    }

    #[test]
    fn test_parent_links() {
        let mut ctx = GenerationContext::new(42);
        let entities = EntityBuilder::new().build(&sample_families(), &mut ctx);

        let parent = &entities[0];
        assert!(parent.is_parent);
        assert_eq!(parent.parent_entity_id, None);
        assert_eq!(parent.payor_type, "commercial");
        assert_eq!(parent.lob, "PPO");
        assert!(parent.is_active);

        let ids: HashSet<u64> = entities.iter().map(|e| e.entity_id).collect();
        for child in &entities[1..3] {
            assert_eq!(child.parent_entity_id, Some(1));
            assert_eq!(child.parent_name.as_deref(), Some("Acme Health, Inc."));
            assert!(ids.contains(&child.parent_entity_id.unwrap()));
        }

        for orphan in &entities[3..] {
            assert_eq!(orphan.parent_entity_id, None);
            assert_eq!(orphan.parent_name, None);
        }
    }

    #[test]
    fn test_inheritance_and_overrides() {
        let mut ctx = GenerationContext::new(42);
        let entities = EntityBuilder::new().build(&sample_families(), &mut ctx);

        let dallas = &entities[1];
        assert_eq!(dallas.tax_id.as_deref(), Some("12-3456789"));
        assert_eq!(dallas.state.as_deref(), Some("TX"));
        assert!(!dallas.city.is_empty());

        let tulsa = &entities[2];
        assert_eq!(tulsa.tax_id.as_deref(), Some("98-7654321"));
        assert_eq!(tulsa.city, "Tulsa");
        assert_eq!(tulsa.payor_type, "medicare");
        assert_eq!(tulsa.lob, "HMO");
        assert_eq!(tulsa.cms_plan_id.as_deref(), Some("H5555"));
        let zip: u32 = tulsa.zip.parse().unwrap();
        assert!((73001..=73199).contains(&zip));
    }

    #[test]
    fn test_unknown_state_falls_back_to_generic_zip() {
        let mut ctx = GenerationContext::new(42);
        let entities = EntityBuilder::new().build(&sample_families(), &mut ctx);
        let nowhere = &entities[4];
        assert_eq!(nowhere.state.as_deref(), Some("ZZ"));
        assert_eq!(nowhere.zip.len(), 5);
    }

    #[test]
    fn test_effective_date_windows() {
        let mut ctx = GenerationContext::new(7);
        let families = sample_families();
        let builder = EntityBuilder::new();
        for _ in 0..50 {
            for e in builder.build(&families, &mut ctx) {
                let lo = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
                let hi = if e.is_parent {
                    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
                } else {
                    NaiveDate::from_ymd_opt(2020, 12, 1).unwrap()
                };
                assert!(e.effective_date >= lo && e.effective_date <= hi, "{}", e.effective_date);
            }
        }
    }

    #[test]
    fn test_same_seed_same_entities() {
        let families = sample_families();
        let a = EntityBuilder::new().build(&families, &mut GenerationContext::new(99));
        let b = EntityBuilder::new().build(&families, &mut GenerationContext::new(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_website_slug() {
        assert_eq!(website_for("Acme Health"), "https://www.acmehealth.com");
        assert_eq!(
            website_for("Blue Cross Blue Shield of Texas"),
            "https://www.bluecrossblueshieldo.com"
        );
    }

    #[test]
    fn test_child_website_has_no_comma() {
        let families = parse_families(
            r#"[{"family_id": "F9", "parent": "Zenith Care, Inc.",
                 "entities": [{"name": "Zenith Care, West"}]}]"#,
        )
        .unwrap();
        let entities = EntityBuilder::new().build(&families, &mut GenerationContext::new(1));
        for e in &entities {
            assert!(!e.website.contains(','), "{}", e.website);
        }
        assert_eq!(entities[1].website, "https://www.zenithcarewest.com");
    }
}
