// 💾 CSV Output - one file per source, header + one row per record
//
// Everything is rendered in memory first, then staged and moved into place,
// so the output directory holds either the previous run or this one. Empty
// sources produce no file at all.

use crate::entities::CanonicalEntity;
use crate::source::SourceSystem;
use crate::synthesizer::SourceCorpus;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const GROUND_TRUTH_FILE: &str = "canonical_payors.csv";

// ============================================================================
// RENDERED FILES
// ============================================================================

/// A CSV file rendered to bytes, not yet on disk
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub file_name: String,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Render a slice of records as CSV; None when there is nothing to write
pub fn render_csv<T: Serialize>(file_name: &str, records: &[T]) -> Result<Option<RenderedFile>> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to serialize record for {}", file_name))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer for {}: {}", file_name, e))?;

    Ok(Some(RenderedFile {
        file_name: file_name.to_string(),
        rows: records.len(),
        bytes,
    }))
}

/// Render the four source files (and optionally the ground truth), in source order
pub fn render_corpus(corpus: &SourceCorpus, ground_truth: Option<&[CanonicalEntity]>) -> Result<Vec<RenderedFile>> {
    let by_source = [
        (SourceSystem::Crm, render_csv(SourceSystem::Crm.file_name(), &corpus.crm)?),
        (SourceSystem::Claims, render_csv(SourceSystem::Claims.file_name(), &corpus.claims)?),
        (
            SourceSystem::Credentialing,
            render_csv(SourceSystem::Credentialing.file_name(), &corpus.credentialing)?,
        ),
        (SourceSystem::Reference, render_csv(SourceSystem::Reference.file_name(), &corpus.reference)?),
    ];

    let mut files = Vec::new();
    for (source, rendered) in by_source {
        match rendered {
            Some(file) => {
                debug!(source = source.code(), rows = file.rows, "rendered source CSV");
                files.push(file);
            }
            None => debug!(source = source.code(), "no records, skipping file"),
        }
    }

    if let Some(entities) = ground_truth {
        files.extend(render_csv(GROUND_TRUTH_FILE, entities)?);
    }

    Ok(files)
}

/// SHA-256 over every rendered file (name + bytes), hex encoded
///
/// Same seed + same families ⇒ same fingerprint.
pub fn fingerprint(files: &[RenderedFile]) -> String {
    let mut hasher = Sha256::new();
    for file in files {
        hasher.update(file.file_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(&file.bytes);
    }
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// WRITING
// ============================================================================

/// Every file name a run may produce
pub fn known_file_names() -> impl Iterator<Item = &'static str> {
    SourceSystem::ALL
        .into_iter()
        .map(|source| source.file_name())
        .chain(std::iter::once(GROUND_TRUTH_FILE))
}

/// Write a run's files so the directory ends up holding exactly this run
///
/// Each file is staged as `<name>.tmp` first; a failure while staging
/// removes the staged files and leaves existing output untouched. After
/// staging, files are renamed into place and known output files this run
/// did not produce (an empty source, ground truth switched off) are removed.
pub fn write_files(output_dir: &Path, files: &[RenderedFile]) -> Result<Vec<WrittenFile>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for file in files {
        let path = output_dir.join(&file.file_name);
        let tmp = path.with_extension("csv.tmp");
        if let Err(e) = fs::write(&tmp, &file.bytes) {
            discard_staged(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("Failed to write {}", tmp.display()));
        }
        staged.push((tmp, path));
    }

    let mut written = Vec::with_capacity(files.len());
    for ((tmp, path), file) in staged.iter().zip(files) {
        fs::rename(tmp, path).with_context(|| format!("Failed to move {} into place", path.display()))?;
        debug!(path = %path.display(), rows = file.rows, "wrote CSV");
        written.push(WrittenFile {
            path: path.clone(),
            rows: file.rows,
        });
    }

    for name in known_file_names() {
        if files.iter().any(|f| f.file_name == name) {
            continue;
        }
        let stale = output_dir.join(name);
        if stale.exists() {
            fs::remove_file(&stale).with_context(|| format!("Failed to remove stale {}", stale.display()))?;
            debug!(path = %stale.display(), "removed stale CSV from an earlier run");
        }
    }

    Ok(written)
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

// ============================================================================
// TESTS
// ============================================================================
