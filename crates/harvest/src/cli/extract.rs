use std::path::Path;

use anyhow::{bail, Context, Result};

use harvest_core::{DocumentKind, HarvestPipeline};

use super::{kind_label, print_json};

pub async fn run(pipeline: &HarvestPipeline, file: &Path, kind: DocumentKind) -> Result<()> {
    if !file.is_file() {
        bail!("file not found: {}", file.display());
    }

    let processed = pipeline
        .process_file(file, kind)
        .await
        .with_context(|| format!("cannot read {} as a {}", file.display(), kind_label(kind)))?;

    print_json(&processed.record)
}
