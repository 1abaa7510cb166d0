//! sfdx-erd - Mermaid ER diagrams from Salesforce object metadata

mod erd_cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sfdx-erd")]
#[command(about = "Generate a Mermaid erDiagram from object and field metadata", version)]
struct Cli {
    #[command(flatten)]
    diagram: erd_cli::DiagramArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    erd_cli::run(cli.diagram)
}
