mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use revscope_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revscope")]
#[command(about = "Scrape product pages and summarize customer reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a product page into a product record with a generated overview.
    Product {
        url: String,
        /// Output file; defaults to `REVSCOPE_PRODUCT_OUTPUT_PATH`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Collect every review page for a product and analyze the collection.
    Reviews {
        url: String,
        /// Output file; defaults to `REVSCOPE_OUTPUT_PATH`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the raw review collection to this file.
        #[arg(long)]
        save_reviews: Option<PathBuf>,
    },
    /// Recompute the analysis from a saved review collection.
    Analyze {
        reviews: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the completion call and use the fallback summary text.
        #[arg(long)]
        no_summary: bool,
    },
}

impl Commands {
    fn output_path(&self, config: &AppConfig) -> PathBuf {
        let (explicit, default) = match self {
            Self::Product { output, .. } => (output, &config.product_output_path),
            Self::Reviews { output, .. } | Self::Analyze { output, .. } => {
                (output, &config.output_path)
            }
        };
        explicit.clone().unwrap_or_else(|| default.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = revscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let output = cli.command.output_path(&config);
    match cli.command {
        Commands::Product { url, .. } => {
            run::run_product(&config, &url, &output).await?;
        }
        Commands::Reviews {
            url, save_reviews, ..
        } => {
            run::run_reviews(&config, &url, &output, save_reviews.as_deref()).await?;
        }
        Commands::Analyze {
            reviews,
            no_summary,
            ..
        } => {
            run::run_analyze(&config, &reviews, &output, no_summary).await?;
        }
    }

    Ok(())
}
