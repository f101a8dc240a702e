// Payor MDM Fixture Generator - Core Library
// Exposes all modules for use in the CLI and tests

pub mod source;      // Source systems and their id/file conventions
pub mod states;      // US state table
pub mod context;     // Seeded random stream + entity id allocation
pub mod fabricate;   // Fake addresses, phones, ZIPs
pub mod mess;        // Per-source mess injection
pub mod entities;    // Family definitions + canonical payors
pub mod records;     // CSV row shapes per source
pub mod config;      // Generator configuration
pub mod synthesizer; // Canonical entities → source records
pub mod integrity;   // Ground-truth sanity checks
pub mod output;      // CSV rendering + writing

use anyhow::{bail, Result};
use tracing::{info, warn};

// Re-export commonly used types
pub use config::{GeneratorConfig, SourceMix};
pub use context::GenerationContext;
pub use entities::{
    load_families, parse_families, CanonicalEntity, ChildDefinition, EntityBuilder, FamilyDefinition,
};
pub use integrity::{check_entities, IntegrityIssue, IntegrityReport, Severity};
pub use output::{fingerprint, render_corpus, write_files, RenderedFile, WrittenFile};
pub use records::{ClaimsRecord, CredentialingRecord, CrmRecord, ReferenceRecord};
pub use source::SourceSystem;
pub use synthesizer::{CorpusStats, SourceCorpus, SourceRecordSynthesizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one run produces, still in memory
#[derive(Debug, Clone)]
pub struct Generation {
    pub entities: Vec<CanonicalEntity>,
    pub integrity: IntegrityReport,
    pub corpus: SourceCorpus,
    pub files: Vec<RenderedFile>,
    pub fingerprint: String,
}

/// Run the whole pipeline for one seed without touching the filesystem
///
/// Entities are built and the synthesizer runs on the same random stream,
/// so the result depends only on `families` and `config`.
pub fn generate(families: &[FamilyDefinition], config: &GeneratorConfig) -> Result<Generation> {
    config.validate()?;

    let mut ctx = GenerationContext::new(config.seed);

    let entities = EntityBuilder::new().build(families, &mut ctx);
    let integrity = check_entities(&entities);
    for issue in &integrity.issues {
        warn!(severity = ?issue.severity, entity = ?issue.entity_id, field = %issue.field, "{}", issue.issue);
    }
    if integrity.has_critical_issues() {
        bail!("Canonical entities failed integrity checks: {}", integrity.summary());
    }

    let corpus = SourceRecordSynthesizer::from_config(config).synthesize(&entities, &mut ctx);

    let ground_truth = config.emit_ground_truth.then_some(entities.as_slice());
    let files = render_corpus(&corpus, ground_truth)?;
    let fingerprint = fingerprint(&files);

    info!(seed = ctx.seed(), entities = entities.len(), records = corpus.stats.total(), "generation complete");

    Ok(Generation {
        entities,
        integrity,
        corpus,
        files,
        fingerprint,
    })
}
