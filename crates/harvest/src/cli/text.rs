use std::io::Read;

use anyhow::{Context, Result};

use harvest_core::{Document, DocumentKind, HarvestPipeline};

use super::print_json;

pub async fn run(pipeline: &HarvestPipeline, input: &str, kind: DocumentKind) -> Result<()> {
    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    };

    let record = pipeline.record_for(&Document::new(kind, text)).await;
    print_json(&record)
}
