use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::debug;

use mapgate_client::{
    Bootstrap, BootstrapState, Gateway, HeadlessRuntime, HttpGateway, InputOutcome, SearchFlow,
};

#[derive(Parser)]
#[command(name = "mapgate-cli")]
#[command(about = "Terminal client for a MapGate server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the gateway
    #[arg(short, long, env = "MAPGATE_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Key submitted when the session has none yet
    #[arg(short, long, env = "MAPGATE_API_KEY", hide_env_values = true)]
    key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a key in a fresh session
    SetKey {
        key: String,
    },
    /// Report whether the session holds a key
    Check,
    /// Search places, optionally resolving one of the suggestions
    Search {
        text: String,

        /// 1-based index of the suggestion to geocode
        #[arg(long)]
        pick: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mapgate_shared::telemetry::init_cli_telemetry();
    let cli = Cli::parse();

    // One gateway instance: one cookie jar, one session for the whole run.
    let gateway = Arc::new(HttpGateway::new(&cli.server)?);

    match cli.command {
        Commands::SetKey { key } => handle_set_key(gateway, &key).await?,
        Commands::Check => handle_check(gateway, cli.key.as_deref()).await?,
        Commands::Search { text, pick } => {
            handle_search(gateway, cli.key.as_deref(), &text, pick).await?
        }
    }

    Ok(())
}

async fn handle_set_key(gateway: Arc<HttpGateway>, key: &str) -> anyhow::Result<()> {
    let mut bootstrap = Bootstrap::new(gateway.clone(), HeadlessRuntime::new(gateway));
    report(bootstrap.submit_key(key).await)?;
    println!("API key set, map script reachable.");
    Ok(())
}

async fn handle_check(gateway: Arc<HttpGateway>, key: Option<&str>) -> anyhow::Result<()> {
    if let Some(key) = key {
        gateway.set_api_key(key).await?;
    }
    let exists = gateway.check_api_key().await?;
    println!("apiKeyExists: {}", exists);
    Ok(())
}

async fn handle_search(
    gateway: Arc<HttpGateway>,
    key: Option<&str>,
    text: &str,
    pick: Option<usize>,
) -> anyhow::Result<()> {
    let mut bootstrap = Bootstrap::new(gateway.clone(), HeadlessRuntime::new(gateway.clone()));
    bootstrap.mount().await;
    if *bootstrap.state() == BootstrapState::NoKey {
        let key = key.ok_or_else(|| anyhow!("No API key in session. Pass --key or set MAPGATE_API_KEY."))?;
        bootstrap.submit_key(key).await;
    }
    report(bootstrap.state())?;

    let search = SearchFlow::new(gateway);
    let outcome = search.input(text).await;
    debug!(?outcome, "Search finished");
    if outcome == InputOutcome::Cleared {
        bail!("Search text is empty");
    }

    let state = search.snapshot();
    if state.suggestions.is_empty() {
        println!("No suggestions for {:?}.", text);
        return Ok(());
    }
    for (i, suggestion) in state.suggestions.iter().enumerate() {
        let marker = if suggestion.is_selectable() { ' ' } else { '-' };
        println!("{:>3}{} {}", i + 1, marker, suggestion.label());
    }

    let Some(n) = pick else {
        return Ok(());
    };
    let chosen = n
        .checked_sub(1)
        .and_then(|i| state.suggestions.get(i))
        .ok_or_else(|| anyhow!("--pick {} is out of range (1-{})", n, state.suggestions.len()))?;
    if !chosen.is_selectable() {
        bail!("Suggestion {} has no uri and cannot be resolved", n);
    }

    match search.select(chosen).await {
        Some(location) => println!(
            "{}: lon {:.6}, lat {:.6}, zoom {}",
            chosen.label(),
            location.center[0],
            location.center[1],
            location.zoom
        ),
        None => {
            let message = search.snapshot().error.unwrap_or_default();
            bail!(message)
        }
    }
    Ok(())
}

fn report(state: &BootstrapState) -> anyhow::Result<()> {
    match state {
        BootstrapState::MapReady => Ok(()),
        BootstrapState::Error(message) => bail!("{}", message),
        other => bail!("Unexpected bootstrap state: {:?}", other),
    }
}
