mod command;
mod display;
mod session;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::bail;
use autoprov_ai::{DEFAULT_MODEL, EndpointClient, GatewayClient, ResponseGenerator};
use autoprov_core::{DisputeDraft, DistanceSaleDraft, PdiDraft};
use autoprov_store::FileStore;
use autoprov_wizard::Wizard;
use clap::{Parser, Subcommand};
use tracing::Level;

use session::{DamageEditor, Generation, NoExtras};

#[derive(Parser)]
#[command(name = "autoprov")]
#[command(about = "Compliance paperwork wizards for used-car dealers", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the saved drafts.
    #[arg(long, env = "AUTOPROV_DATA_DIR", default_value = ".autoprov", global = true)]
    data_dir: PathBuf,

    /// Base URL of the hosted dispute-response function.
    #[arg(long, env = "AUTOPROV_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Bearer token sent with generation requests.
    #[arg(long, env = "AUTOPROV_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Talk to a chat-completions gateway directly instead of the hosted function.
    #[arg(long, env = "AUTOPROV_GATEWAY_URL", global = true)]
    gateway: Option<String>,

    #[arg(long, env = "AUTOPROV_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Tool,
}

#[derive(Subcommand)]
enum Tool {
    /// Dispute Response Builder.
    Dispute,
    /// Distance Sale Pack.
    DistanceSale,
    /// Pre-Delivery Inspection report.
    Pdi,
}

impl Cli {
    fn generator(&self) -> anyhow::Result<Option<Box<dyn ResponseGenerator>>> {
        if let Some(gateway) = &self.gateway {
            let Some(key) = &self.api_key else {
                bail!("--gateway needs --api-key (or AUTOPROV_API_KEY)");
            };
            return Ok(Some(Box::new(GatewayClient::new(
                gateway.as_str(),
                key.as_str(),
                self.model.as_str(),
            ))));
        }
        Ok(self
            .endpoint
            .as_ref()
            .map(|url| Box::new(EndpointClient::new(url.as_str(), self.api_key.clone())) as Box<dyn ResponseGenerator>))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();
    tracing::info!("autoprov v{}", env!("CARGO_PKG_VERSION"));

    let store = FileStore::open(&cli.data_dir);
    let today = chrono::Local::now().date_naive();
    let prompt = io::stdin().is_terminal();
    let input = io::stdin().lock();
    let mut out = io::stdout().lock();

    match &cli.command {
        Tool::Dispute => {
            let tool = Generation {
                generator: cli.generator()?,
            };
            let mut wizard: Wizard<DisputeDraft, _> = Wizard::open(store);
            session::run(&mut wizard, &tool, input, &mut out, today, prompt).await
        }
        Tool::DistanceSale => {
            let mut wizard: Wizard<DistanceSaleDraft, _> = Wizard::open(store);
            session::run(&mut wizard, &NoExtras, input, &mut out, today, prompt).await
        }
        Tool::Pdi => {
            let mut wizard: Wizard<PdiDraft, _> = Wizard::open(store);
            session::run(&mut wizard, &DamageEditor, input, &mut out, today, prompt).await
        }
    }
}
