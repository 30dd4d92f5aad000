//! First leg: create A', B', C', fund A' from coinbase rewards and pay B'.

use std::io::Write;

use bitcoincore_rpc::bitcoin::{Address, Txid};
use bitcoincore_rpc::json::AddressType;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::report;
use crate::rpc::{self, NodeRpc};
use crate::session;
use crate::spend::{SendAmount, plan_spend};
use crate::transfer::{TransferReceipt, broadcast};

const LEG: &str = "A' -> B'";

#[derive(Debug, Clone, PartialEq)]
pub struct AtoBOutcome {
    pub addr_a: Address,
    pub addr_b: Address,
    pub addr_c: Address,
    pub funding_txid: Txid,
    pub receipt: TransferReceipt,
}

pub fn run<R: NodeRpc + ?Sized>(
    rpc: &R,
    config: &Config,
    out: &mut impl Write,
) -> Result<AtoBOutcome> {
    let transfer = &config.transfer;

    report::banner(out, "P2SH-SegWit Transaction (A' -> B')")?;
    session::connect(rpc, &config.rpc, out)?;
    session::open_wallet(rpc, &config.rpc.wallet, out)?;

    let balance = rpc.balance()?;
    writeln!(out, "Initial Wallet Balance: {:.8} BTC", balance.to_btc())?;

    let network = config.rpc.network();
    let new_address = |label: &str, kind: Option<AddressType>| -> Result<Address> {
        rpc::require_network(rpc.new_address(label, kind)?, network)
    };

    let segwit = Some(AddressType::P2shSegwit);
    let addr_a = new_address("addr_A", segwit)?;
    let addr_b = new_address("addr_B", segwit)?;
    let addr_c = new_address("addr_C", segwit)?;
    report::rule(out)?;
    writeln!(out, "Generated P2SH-SegWit Addresses:")?;
    writeln!(out, "  Address A' (Sender):   {addr_a}")?;
    writeln!(out, "  Address B' (Receiver): {addr_b}")?;
    writeln!(out, "  Address C' (Extra):    {addr_c}")?;
    report::rule(out)?;

    // Coinbase outputs need 100 confirmations before they can be spent
    writeln!(out, "Generating {} blocks to fund coins...", transfer.maturity_blocks)?;
    let mining_addr = new_address("mining", None)?;
    rpc.generate_to_address(transfer.maturity_blocks, &mining_addr)?;
    tracing::debug!(blocks = transfer.maturity_blocks, address = %mining_addr, "Mined funding blocks");

    let fund = transfer.fund_amount();
    let funding_txid = rpc.send_to_address(&addr_a, fund)?;
    writeln!(
        out,
        "Funding Transaction: Sent {:?} BTC to Address A' | TXID: {funding_txid}",
        fund.to_btc()
    )?;
    rpc.generate_to_address(1, &mining_addr)?;
    tracing::info!(txid = %funding_txid, address = %addr_a, amount = %fund, "Funded address A'");
    report::rule(out)?;

    let utxo = rpc
        .list_unspent(transfer.min_conf, transfer.max_conf, &addr_a)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoUtxos {
            address: addr_a.to_string(),
            hint: "",
        })?;
    tracing::debug!(txid = %utxo.txid, vout = utxo.vout, amount = %utxo.amount, "Selected UTXO");

    let plan = plan_spend(
        &utxo,
        &addr_b,
        &addr_a,
        SendAmount::Fixed(transfer.send_amount()),
        transfer.fee(),
    )?;
    let (txid, signed_hex) = broadcast(rpc, &plan, LEG, out)?;

    rpc.generate_to_address(1, &addr_b)?;
    report::rule(out)?;

    let decoded = rpc.decode_raw_transaction(&signed_hex)?;
    report::pretty_print(out, "Decoded Transaction A' -> B'", &decoded)?;

    match report::locking_script_for(&decoded, &addr_b) {
        Some(script) => {
            writeln!(out, "\nLocking Script for Address B':")?;
            writeln!(out, "{script}")?;
        }
        None => {
            tracing::warn!(address = %addr_b, "No output pays address B'");
            writeln!(out, "\nWARNING: Locking script for Address B' not found.")?;
        }
    }
    report::closing(out)?;

    Ok(AtoBOutcome {
        addr_a,
        addr_b,
        addr_c,
        funding_txid,
        receipt: TransferReceipt {
            txid,
            signed_hex,
            decoded,
        },
    })
}
