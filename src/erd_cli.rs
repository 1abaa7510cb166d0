//! diagram command - metadata tree to erDiagram text

use anyhow::Context;
use clap::Args;
use erd::{parse_flag, ErdAnalyzer, ErdConfig, MermaidGenerator, MissingValue};
use metadata::{FieldExtractor, ObjectExtractor, SourceLocator};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct DiagramArgs {
    /// Metadata directory or .zip archive
    pub path: PathBuf,
    /// "true" keeps fields that reference no other object
    pub keep_all_fields: Option<String>,
    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Print the diagram instead of saving it
    #[arg(long)]
    pub print: bool,
    /// Dump the extracted model as JSON
    #[arg(long)]
    pub json: bool,
    /// How fields without a label or type are drawn
    #[arg(long, value_enum)]
    pub missing: Option<MissingValue>,
    /// Wrap the diagram in a ```mermaid fence (file and --print)
    #[arg(long)]
    pub fenced: bool,
    /// Extract archives here instead of a temporary directory
    #[arg(long)]
    pub extract_to: Option<PathBuf>,
}

pub fn run(args: DiagramArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args, ErdConfig::from_env());
    tracing::info!("Analyzing: {}", args.path.display());

    let sources = SourceLocator::new()
        .with_extract_to(args.extract_to.clone())
        .locate(&args.path)
        .with_context(|| format!("Failed to read sources from {}", args.path.display()))?;

    let analyzer = ErdAnalyzer::from_sources(&sources, &ObjectExtractor::new(), &FieldExtractor::new())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analyzer.model())?);
        return Ok(());
    }

    let diagram = render_output(&config, &MermaidGenerator::from_config(&config).generate(&analyzer));

    if args.print {
        print!("{}", diagram);
        if !diagram.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    write_output(&config, &diagram)?;
    println!("Saved to: {}", config.output_path.display());

    Ok(())
}

/// Command line values win over `ERD_*` environment values
fn resolve_config(args: &DiagramArgs, mut config: ErdConfig) -> ErdConfig {
    if let Some(flag) = &args.keep_all_fields {
        config.keep_all_fields = parse_flag(flag);
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(missing) = args.missing {
        config.missing = missing;
    }
    if args.fenced {
        config.fenced = true;
    }
    config
}

/// Final text for both `--print` and the saved file
fn render_output(config: &ErdConfig, diagram: &str) -> String {
    if config.fenced {
        MermaidGenerator::fenced(diagram)
    } else {
        diagram.to_string()
    }
}

fn write_output(config: &ErdConfig, content: &str) -> anyhow::Result<()> {
    let path: &Path = &config.output_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
