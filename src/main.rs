mod cli;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use segwit_chain::rpc::CoreRpc;
use segwit_chain::transfer::{a_to_b, b_to_c};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("segwit_chain={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> segwit_chain::Result<()> {
    let config = cli.resolve_config()?;
    init_tracing(&config.logging.level);

    tracing::debug!(
        node = %config.rpc.node_url(),
        wallet = %config.rpc.wallet,
        network = %config.rpc.network,
        "Configuration loaded"
    );

    // Node access; no request is made until the first call
    let rpc = CoreRpc::new(&config.rpc)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::AToB => {
            let outcome = a_to_b::run(&rpc, &config, &mut out)?;
            tracing::info!(txid = %outcome.receipt.txid, "A' -> B' complete");
        }
        Commands::BToC { from, to } => {
            let mut input = io::stdin().lock();
            let outcome = b_to_c::run_standalone(
                &rpc,
                &config,
                from.as_deref(),
                to.as_deref(),
                &mut input,
                &mut out,
            )?;
            tracing::info!(txid = %outcome.receipt.txid, "B' -> C' complete");
        }
        Commands::Chain => {
            let (first, second) = segwit_chain::run_chain(&rpc, &config, &mut out)?;
            tracing::info!(
                first = %first.receipt.txid,
                second = %second.receipt.txid,
                "Chained transfers complete"
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Transfer failed");
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
