//! chainexec CLI: one action per invocation.
//!
//! ```bash
//! chainexec call rpcCallCached --params '{"rpcUrl":"https://eth.llamarpc.com","method":"eth_blockNumber"}'
//! echo '{"action":"bridgeQuote","params":{"from":"ethereum","to":"base","asset":"USDC","amount":"1000000"}}' | chainexec run
//! chainexec actions
//! ```
//!
//! The response envelope is printed to stdout. The exit code is 0 when the
//! action succeeded and 1 otherwise.

mod config;
mod logging;

use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chainexec_actions::{ActionContext, ActionRegistry, ActionRequest, Dispatcher};
use chainexec_core::{CachedRpcExecutor, FileCacheStore};
use chainexec_http::{HttpClientConfig, HttpRpcClient};
use chainexec_quote::StaticQuoteRegistry;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "chainexec",
    about = "Cached JSON-RPC calls and bridge/swap quotes, one action per invocation",
    long_about = "
ChainExec CLI: run a named action and print its JSON envelope.

ENVIRONMENT VARIABLES:
  CHAINEXEC_STRICT_MODE    Always refresh from the node (true/false)
  CHAINEXEC_ALLOW_STALE    Default for stale fallback (true/false)
  CHAINEXEC_CACHE_DIR      Directory for the shared file cache
  CHAINEXEC_TIMEOUT_SECS   Per-request HTTP timeout
  CHAINEXEC_LOG            Log filter, e.g. \"debug\" or \"warn,chainexec_core=debug\"
",
    version
)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one action with params given on the command line
    Call {
        /// Action name or remote key, e.g. rpcCallCached or rpc_call_cached
        action: String,
        /// JSON object of action params
        #[arg(long, default_value = "{}")]
        params: String,
        /// Print the bare result on success
        #[arg(long)]
        results_only: bool,
    },

    /// Read an {action, params} envelope from stdin and run it
    Run {
        /// Print the bare result on success
        #[arg(long)]
        results_only: bool,
    },

    /// List registered actions
    Actions,

    /// Print version
    Version,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

/// Returns whether the action succeeded.
async fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut app = AppConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        app.log.level = "debug".into();
    }
    if cli.json_logs {
        app.log.json = true;
    }
    logging::init_tracing(&app.log);

    match cli.command {
        Commands::Call {
            action,
            params,
            results_only,
        } => {
            let params: Value = serde_json::from_str(&params).context("--params is not valid JSON")?;
            let mut request = ActionRequest::new(action, params);
            request.results_only = results_only;
            execute(&app, request).await
        }
        Commands::Run { results_only } => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading request from stdin")?;
            let mut request: ActionRequest =
                serde_json::from_str(&input).context("stdin is not an {action, params} envelope")?;
            request.results_only |= results_only;
            execute(&app, request).await
        }
        Commands::Actions => {
            let registry = ActionRegistry::builtin()?;
            println!("{}", serde_json::to_string_pretty(&registry.catalog())?);
            Ok(true)
        }
        Commands::Version => {
            println!("chainexec {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}

async fn execute(app: &AppConfig, request: ActionRequest) -> Result<bool> {
    let dispatcher = build_dispatcher(app)?;
    tracing::info!(action = %request.action, cache_dir = %app.cache_dir.display(), "dispatching");

    let results_only = request.wants_results_only();
    let envelope = dispatcher.dispatch_envelope(request).await;
    let ok = envelope.is_ok();
    println!("{}", serde_json::to_string(&envelope.into_output(results_only))?);
    Ok(ok)
}

fn build_dispatcher(app: &AppConfig) -> Result<Dispatcher> {
    let transport = HttpRpcClient::new(HttpClientConfig {
        request_timeout: Duration::from_secs(app.request_timeout_secs),
        ..HttpClientConfig::default()
    })?;
    let store = FileCacheStore::new(&app.cache_dir);
    let executor = CachedRpcExecutor::new(Arc::new(transport), Arc::new(store), app.executor);

    let ctx = ActionContext::new(Arc::new(executor), Arc::new(StaticQuoteRegistry::builtin()));
    let registry = ActionRegistry::builtin()?;
    Ok(Dispatcher::new(registry, ctx).with_blocked(&app.blocked_actions))
}
