use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use harvest_core::{DocumentKind, ExtractionRecord, HarvestPipeline};

use super::kind_label;

#[derive(Serialize)]
struct SourcedRecord<'a> {
    file: &'a Path,
    record: &'a ExtractionRecord,
}

pub async fn run(
    pipeline: &HarvestPipeline,
    dir: &Path,
    kind: DocumentKind,
    output: Option<&Path>,
    with_source: bool,
) -> Result<()> {
    let batch = pipeline.process_directory(dir, kind).await?;

    let json = if with_source {
        let sourced: Vec<SourcedRecord<'_>> = batch
            .processed
            .iter()
            .map(|p| SourcedRecord {
                file: &p.path,
                record: &p.record,
            })
            .collect();
        serde_json::to_string_pretty(&sourced)?
    } else {
        serde_json::to_string_pretty(&batch.records().collect::<Vec<_>>())?
    };

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} {} record(s) to {}",
                batch.success_count(),
                kind_label(kind),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    for skipped in &batch.skipped {
        eprintln!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    Ok(())
}
