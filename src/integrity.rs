// ✅ Integrity Checks - canonical entities must be sane before we dirty them
//
// The mess is intentional; the ground truth underneath it is not allowed to
// be. A Critical issue here aborts the run before any file is written.

use crate::entities::CanonicalEntity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ============================================================================
// ISSUES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Ground truth is broken; output would mislead the matcher
    Warning,  // Unusual but usable
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub severity: Severity,
    pub entity_id: Option<u64>,
    pub field: String,
    pub issue: String,
}

impl IntegrityIssue {
    fn critical(entity_id: Option<u64>, field: &str, issue: String) -> Self {
        IntegrityIssue {
            severity: Severity::Critical,
            entity_id,
            field: field.to_string(),
            issue,
        }
    }

    fn warning(entity_id: Option<u64>, field: &str, issue: String) -> Self {
        IntegrityIssue {
            severity: Severity::Warning,
            entity_id,
            field: field.to_string(),
            issue,
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub entities_checked: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} entities checked, {} issues ({} critical)",
            self.entities_checked,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Critical)
                .count()
        )
    }
}

// ============================================================================
// CHECKS
// ============================================================================

pub fn check_entities(entities: &[CanonicalEntity]) -> IntegrityReport {
    let mut issues = Vec::new();

    // Rule 1: ids unique and dense (1..N)
    let mut seen = HashSet::new();
    for e in entities {
        if !seen.insert(e.entity_id) {
            issues.push(IntegrityIssue::critical(
                Some(e.entity_id),
                "entity_id",
                format!("Duplicate entity id {}", e.entity_id),
            ));
        }
    }
    let n = entities.len() as u64;
    if let Some(bad) = entities.iter().find(|e| e.entity_id == 0 || e.entity_id > n) {
        issues.push(IntegrityIssue::critical(
            Some(bad.entity_id),
            "entity_id",
            format!("Entity id {} outside dense range 1..={}", bad.entity_id, n),
        ));
    }

    // Rule 2: parent references resolve to a parent in the same list
    let by_id: HashMap<u64, &CanonicalEntity> = entities.iter().map(|e| (e.entity_id, e)).collect();
    for e in entities {
        if e.is_parent && e.parent_entity_id.is_some() {
            issues.push(IntegrityIssue::critical(
                Some(e.entity_id),
                "parent_entity_id",
                format!("Parent entity {} carries a parent reference", e.name),
            ));
        }

        if let Some(pid) = e.parent_entity_id {
            match by_id.get(&pid) {
                Some(parent) if parent.is_parent => {}
                Some(_) => issues.push(IntegrityIssue::critical(
                    Some(e.entity_id),
                    "parent_entity_id",
                    format!("Entity {} points at non-parent {}", e.entity_id, pid),
                )),
                None => issues.push(IntegrityIssue::critical(
                    Some(e.entity_id),
                    "parent_entity_id",
                    format!("Entity {} points at missing entity {}", e.entity_id, pid),
                )),
            }
        }
    }

    // Rule 3: every child of a family with a parent links to that parent
    let family_parents: HashMap<&str, u64> = entities
        .iter()
        .filter(|e| e.is_parent)
        .map(|e| (e.family_id.as_str(), e.entity_id))
        .collect();
    for e in entities.iter().filter(|e| !e.is_parent) {
        if let Some(&pid) = family_parents.get(e.family_id.as_str()) {
            if e.parent_entity_id != Some(pid) {
                issues.push(IntegrityIssue::critical(
                    Some(e.entity_id),
                    "parent_entity_id",
                    format!("{} should link to family parent {}", e.name, pid),
                ));
            }
        }
    }

    // Rule 4: effective dates inside the historical window
    let window = effective_window();
    for e in entities {
        if !window.contains(&e.effective_date) {
            issues.push(IntegrityIssue::warning(
                Some(e.entity_id),
                "effective_date",
                format!("Effective date {} outside {:?}", e.effective_date, window),
            ));
        }
        if e.is_parent && !e.is_active {
            issues.push(IntegrityIssue::warning(
                Some(e.entity_id),
                "is_active",
                format!("Parent {} is inactive", e.name),
            ));
        }
    }

    IntegrityReport {
        entities_checked: entities.len(),
        issues,
    }
}

fn effective_window() -> std::ops::RangeInclusive<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap_or(NaiveDate::MAX);
    start..=end
}

// ============================================================================
// TESTS
// ============================================================================
