//! vetgate: diagnostic gateway CLI
//!
//! Runs one diagnosis through the gateway, or prints the cache key a
//! request would use.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use vetgate::config::{Config, Secrets};
use vetgate::{CacheKey, InferenceRequest, Vetgate};

/// Vetgate diagnostic gateway
#[derive(Parser)]
#[command(name = "vetgate")]
#[command(version = vetgate::PKG_VERSION)]
#[command(about = "Cached, cascading diagnostic inference gateway")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "VETGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Diagnose a request and print the response as JSON
    Diagnose(RequestArgs),

    /// Print the cache key for a request
    CacheKey(RequestArgs),

    /// Print the full build version
    Version,
}

#[derive(ClapArgs)]
struct RequestArgs {
    /// Observed symptom (repeatable)
    #[arg(short, long = "symptom")]
    symptoms: Vec<String>,
    /// Image reference (repeatable)
    #[arg(short, long = "image")]
    images: Vec<String>,
    /// Free-text description
    #[arg(short, long, default_value = "")]
    description: String,
    /// Subject reference (e.g. a lot id)
    #[arg(long, default_value = "")]
    subject: String,
    /// Requester identity
    #[arg(long, env = "VETGATE_REQUESTER", default_value = "cli")]
    requester: String,
}

impl From<RequestArgs> for InferenceRequest {
    fn from(args: RequestArgs) -> Self {
        InferenceRequest {
            images: args.images,
            symptoms: args.symptoms,
            description: args.description,
            subject_id: args.subject,
            requester_id: args.requester,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vetgate=info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Version => {
            println!("{}", vetgate::version_string());
        }
        Command::CacheKey(request) => {
            let request = InferenceRequest::from(request);
            println!("{}", CacheKey::from(&request));
        }
        Command::Diagnose(request) => {
            let config = Config::load_or_default(args.config.as_deref())?;
            let secrets = Secrets::load()?;

            let gateway = config
                .apply(Vetgate::builder().credentials(secrets.credentials()))
                .build()?;

            let response = gateway.diagnose(&InferenceRequest::from(request)).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
