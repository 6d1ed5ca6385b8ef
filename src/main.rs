use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use labscore::config::{self, EnhancementConfig};
use labscore::{BiomarkerAnalyzer, BiomarkerData, RangeCatalog};

#[derive(Parser)]
#[command(name = config::APP_NAME, version = config::APP_VERSION)]
#[command(about = "Score lab biomarkers against optimal ranges")]
struct Cli {
    /// Directory holding an optimal_ranges.json that replaces the built-in catalog
    #[arg(long, env = config::RESOURCES_DIR_ENV)]
    resources_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a JSON object of biomarker values (`-` reads stdin)
    Analyze {
        input: PathBuf,

        /// Query the retrieval service for additional insights
        #[arg(long)]
        enhanced: bool,
    },
    /// Report retrieval service configuration and health
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    labscore::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match &cli.resources_dir {
        Some(dir) => RangeCatalog::load(dir)?,
        None => RangeCatalog::builtin()?,
    };
    let catalog = Arc::new(catalog);
    let analyzer = BiomarkerAnalyzer::from_config(catalog, EnhancementConfig::from_env())?;

    let output = match cli.command {
        Command::Analyze { input, enhanced } => {
            let data = read_input(&input)?;
            if enhanced && !analyzer.config().enabled {
                tracing::warn!("Enhancement disabled by RAG_ENABLED; output carries baseline only");
            }
            if enhanced {
                serde_json::to_string_pretty(&analyzer.analyze_enhanced(&data).await?)?
            } else {
                serde_json::to_string_pretty(&analyzer.analyze(&data)?)?
            }
        }
        Command::Health => serde_json::to_string_pretty(&analyzer.service_health().await)?,
    };

    println!("{output}");
    Ok(())
}

fn read_input(path: &Path) -> Result<BiomarkerData, Box<dyn std::error::Error>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}
