//! Second leg: spend the confirmed B' output to C'.

use std::io::{BufRead, Write};

use bitcoincore_rpc::bitcoin::address::NetworkUnchecked;
use bitcoincore_rpc::bitcoin::{Address, Network};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::report;
use crate::rpc::{self, NodeRpc, Utxo};
use crate::session;
use crate::spend::{SendAmount, plan_spend};
use crate::transfer::{TransferReceipt, broadcast};

const LEG: &str = "B' -> C'";

/// Sender B' and receiver C'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub from: Address,
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BtoCOutcome {
    pub endpoints: Endpoints,
    pub utxo: Utxo,
    pub receipt: TransferReceipt,
}

pub fn parse_address(text: &str, network: Network) -> Result<Address> {
    let text = text.trim();
    let invalid = |reason: String| Error::Address {
        address: text.to_owned(),
        reason,
    };

    let address = text
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| invalid(e.to_string()))?;
    rpc::require_network(address, network)
}

/// Use the given addresses, prompting on `input` for any that are missing.
pub fn resolve_endpoints(
    from: Option<&str>,
    to: Option<&str>,
    network: Network,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Endpoints> {
    let mut ask = |given: Option<&str>, prompt: &str| -> Result<Address> {
        let text = match given {
            Some(text) => text.to_owned(),
            None => {
                writeln!(out, "{prompt}")?;
                out.flush()?;
                let mut line = String::new();
                input.read_line(&mut line)?;
                line
            }
        };
        parse_address(&text, network)
    };

    let from = ask(
        from,
        "Enter the actual P2SH-SegWit Address B' (sender from A'->B' transaction):",
    )?;
    let to = ask(to, "Enter the P2SH-SegWit Address C' (receiver):")?;
    Ok(Endpoints { from, to })
}

pub fn run<R: NodeRpc + ?Sized>(
    rpc: &R,
    config: &Config,
    endpoints: Endpoints,
    out: &mut impl Write,
) -> Result<BtoCOutcome> {
    let transfer = &config.transfer;
    let Endpoints { from, to } = &endpoints;

    report::rule(out)?;

    let utxo = rpc
        .list_unspent(transfer.min_conf, transfer.max_conf, from)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoUtxos {
            address: from.to_string(),
            hint: " Ensure that the A'->B' transaction is confirmed.",
        })?;

    writeln!(out, "Selected UTXO:")?;
    writeln!(out, "  TXID: {}", utxo.txid)?;
    writeln!(out, "  VOUT: {}", utxo.vout)?;
    writeln!(out, "  Amount: {:.8} BTC", utxo.amount.to_btc())?;
    writeln!(out, "  Confirmations: {}", utxo.confirmations)?;
    report::rule(out)?;

    let plan = plan_spend(
        &utxo,
        to,
        from,
        SendAmount::UpTo(transfer.forward_cap()),
        transfer.fee(),
    )?;
    let (txid, signed_hex) = broadcast(rpc, &plan, LEG, out)?;

    rpc.generate_to_address(1, to)?;
    report::rule(out)?;

    let decoded = rpc.decode_raw_transaction(&signed_hex)?;
    report::pretty_print(out, "Decoded Transaction B' -> C'", &decoded)?;

    for unlocking in report::unlocking_scripts(&decoded) {
        writeln!(out, "\nUnlocking Script for Input:")?;
        writeln!(out, "{}", unlocking.script_sig)?;
        if let Some(witness) = unlocking.witness {
            writeln!(out, "Witness:")?;
            writeln!(out, "{witness}")?;
        }
    }
    report::closing(out)?;

    Ok(BtoCOutcome {
        endpoints,
        utxo,
        receipt: TransferReceipt {
            txid,
            signed_hex,
            decoded,
        },
    })
}

/// Connect, select the wallet, then run [`run`].
///
/// Split from `run` so the chained mode can reuse an open session.
pub fn run_standalone<R: NodeRpc + ?Sized>(
    rpc: &R,
    config: &Config,
    from: Option<&str>,
    to: Option<&str>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<BtoCOutcome> {
    report::banner(out, "P2SH-SegWit Transaction (B' -> C')")?;
    session::connect(rpc, &config.rpc, out)?;
    session::open_wallet(rpc, &config.rpc.wallet, out)?;

    let endpoints = resolve_endpoints(from, to, config.rpc.network(), input, out)?;
    run(rpc, config, endpoints, out)
}
