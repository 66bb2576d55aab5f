pub mod batch;
pub mod config;
pub mod extract;
pub mod text;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use harvest_core::{
    detect_annotator, Assembler, ChatCompletionsExtractor, CompositeExtractor, DocumentKind,
    HarvestConfig, HarvestPipeline, NameStrategy, Strategy,
};

#[derive(Parser)]
#[command(
    name = "hvst",
    about = "Extract structured records from resumes and job descriptions",
    version
)]
pub struct Cli {
    /// JSON config file (default: <config dir>/harvest/config.json)
    #[arg(long, global = true, env = "HARVEST_CONFIG")]
    pub config: Option<PathBuf>,
    /// Record schema: resume or job
    #[arg(short, long, global = true, default_value = "resume")]
    pub kind: DocumentKind,
    /// Name extraction: ner or regex
    #[arg(long, global = true)]
    pub name_strategy: Option<NameStrategy>,
    /// Record production: rules or llm
    #[arg(long, global = true)]
    pub strategy: Option<Strategy>,
    /// External NER program
    #[arg(long, global = true)]
    pub ner_command: Option<String>,
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract one PDF or DOCX file
    Extract {
        file: PathBuf,
    },
    /// Extract from already-decoded UTF-8 text ("-" reads stdin)
    Text {
        input: String,
    },
    /// Extract every PDF and DOCX file in a directory
    Batch {
        dir: PathBuf,
        /// Write the JSON array here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit {"file", "record"} objects instead of bare records
        #[arg(long)]
        with_source: bool,
    },
    /// Print the effective configuration
    Config,
}

impl Cli {
    /// Defaults, config file and environment, then flags from this invocation.
    pub fn load_config(&self) -> Result<HarvestConfig> {
        let mut config = HarvestConfig::load(self.config.as_deref())?;

        if let Some(strategy) = self.name_strategy {
            config.name_strategy = strategy;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(command) = &self.ner_command {
            config.ner.command.clone_from(command);
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn build_pipeline(config: &HarvestConfig) -> HarvestPipeline {
    let mut assembler = Assembler::new()
        .with_library(Arc::new(config.pattern_library()))
        .with_annotator(detect_annotator(&config.ner.command, &config.ner.args))
        .with_name_strategy(config.name_strategy);
    if let Some(date) = config.reference_date {
        assembler = assembler.with_reference_date(date);
    }

    let extractor = CompositeExtractor::default().with_timeout(config.extract_timeout());
    let pipeline = HarvestPipeline::new(assembler).with_extractor(Box::new(extractor));

    if config.strategy != Strategy::Llm {
        return pipeline;
    }

    match ChatCompletionsExtractor::from_config(&config.llm) {
        Ok(llm) => {
            tracing::info!("Using LLM extraction with model {}", config.llm.model);
            pipeline.with_llm(Box::new(llm))
        }
        Err(e) => {
            tracing::warn!("LLM strategy unavailable, using rules: {}", e);
            pipeline
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn kind_label(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Resume => "resume",
        DocumentKind::JobDescription => "job description",
    }
}
