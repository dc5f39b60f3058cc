//! solrpc CLI — probe and inspect Solana RPC nodes from the terminal.
//!
//! Usage:
//! ```bash
//! # Check that an endpoint is reachable
//! solrpc test --url http://127.0.0.1:8899
//!
//! # Print a status summary
//! solrpc status --cluster devnet --commitment confirmed
//!
//! # Send a raw JSON-RPC call
//! solrpc call --url http://127.0.0.1:8899 --method getSlot --params '[{"commitment":"processed"}]'
//!
//! # List public clusters
//! solrpc clusters
//! ```

use std::env;
use std::process;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::EnvFilter;

use solrpc_core::{CancellationToken, Cluster, Commitment, RpcClient};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = match args[1].as_str() {
        "test" => cmd_test(&args[2..], &cancel).await,
        "status" => cmd_status(&args[2..], &cancel).await,
        "call" => cmd_call(&args[2..], &cancel).await,
        "clusters" => {
            cmd_clusters();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("solrpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("solrpc {}", env!("CARGO_PKG_VERSION"));
    println!("Probe and inspect Solana RPC nodes\n");
    println!("USAGE:");
    println!("    solrpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    test       Probe an endpoint (version, health, latency)");
    println!("    status     Print version, health, epoch and ledger bounds");
    println!("    call       Send a raw JSON-RPC call");
    println!("    clusters   List public cluster endpoints");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("FLAGS:");
    println!("    --url <URL>            RPC endpoint URL");
    println!("    --cluster <NAME>       mainnet-beta | testnet | devnet (instead of --url)");
    println!("    --timeout <SECS>       HTTP timeout  [default: {DEFAULT_TIMEOUT_SECS}]");
    println!("    --commitment <LEVEL>   finalized | confirmed | processed  (status)");
    println!("    --method <NAME>        JSON-RPC method  (call)");
    println!("    --params <JSON>        JSON array of params  (call)\n");
    println!("Set RUST_LOG=debug to trace requests and responses.");
}

fn build_client(args: &[String]) -> Result<RpcClient> {
    let url = match (parse_flag(args, "--url"), parse_flag(args, "--cluster")) {
        (Some(url), _) => url,
        (None, Some(name)) => name.parse::<Cluster>().map_err(|e| anyhow!(e))?.url().to_string(),
        (None, None) => bail!("--url or --cluster is required"),
    };
    let timeout = match parse_flag(args, "--timeout") {
        Some(secs) => secs.parse::<u64>().context("--timeout must be whole seconds")?,
        None => DEFAULT_TIMEOUT_SECS,
    };
    Ok(solrpc_http::rpc_client(url, Duration::from_secs(timeout))?)
}

async fn cmd_test(args: &[String], cancel: &CancellationToken) -> Result<()> {
    let client = build_client(args)?;

    println!("Testing {}...", client.url());

    let start = Instant::now();
    client.test_connection(cancel).await?;
    let latency = start.elapsed();

    let version = client.get_version(cancel).await?;
    let health = match client.get_health(cancel).await {
        Ok(h) => h,
        Err(e) => format!("unhealthy ({e})"),
    };

    println!("  Status:   OK");
    println!("  Version:  {version}");
    println!("  Health:   {health}");
    println!("  Latency:  {}ms", latency.as_millis());

    Ok(())
}

async fn cmd_status(args: &[String], cancel: &CancellationToken) -> Result<()> {
    let client = build_client(args)?;
    let commitment = match parse_flag(args, "--commitment") {
        Some(c) => c.parse::<Commitment>().map_err(|e| anyhow!(e))?,
        None => Commitment::default(),
    };

    client.test_connection(cancel).await?;

    let (version, health, epoch, min_slot, first_block) = tokio::join!(
        client.get_version(cancel),
        client.get_health(cancel),
        client.get_epoch_info(commitment, cancel),
        client.get_minimum_ledger_slot(cancel),
        client.get_first_available_block(cancel),
    );

    println!("Node:             {}", client.url());
    println!("Version:          {}", version?);
    println!("Health:           {}", health.unwrap_or_else(|e| format!("unhealthy ({e})")));

    let epoch = epoch?;
    println!("Epoch ({commitment}): {}", epoch.epoch);
    println!("  Absolute slot:  {}", epoch.absolute_slot);
    println!("  Block height:   {}", epoch.block_height);
    println!(
        "  Progress:       {}/{} ({:.1}%)",
        epoch.slot_index,
        epoch.slots_in_epoch,
        epoch.progress() * 100.0
    );
    if let Some(count) = epoch.transaction_count {
        println!("  Transactions:   {count}");
    }

    println!("Min ledger slot:  {}", min_slot?);
    let first_block = first_block?;
    println!("First block:      {first_block}");
    match client.get_block_time(first_block, cancel).await {
        Ok(ts) => println!("First block time: {ts} (unix)"),
        Err(e) => tracing::warn!(error = %e, "first block time unavailable"),
    }

    Ok(())
}

async fn cmd_call(args: &[String], cancel: &CancellationToken) -> Result<()> {
    let client = build_client(args)?;
    let method = parse_flag(args, "--method").ok_or_else(|| anyhow!("--method is required"))?;
    let params = match parse_flag(args, "--params") {
        Some(raw) => serde_json::from_str::<Vec<serde_json::Value>>(&raw)
            .context("--params must be a JSON array")?,
        None => vec![],
    };

    let result: serde_json::Value = client.call(&method, params, cancel).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_clusters() {
    println!("Public Solana clusters:\n");
    for cluster in Cluster::ALL {
        println!("  {:<14}{}", cluster.name(), cluster.url());
    }
    println!();
    println!("Public endpoints are rate limited; point exporters at your own node.");
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
