//! The two P2SH-SegWit transfer legs, A'->B' and B'->C'.

pub mod a_to_b;
pub mod b_to_c;

use std::io::Write;

use bitcoincore_rpc::bitcoin::Txid;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::rpc::NodeRpc;
use crate::spend::SpendPlan;

pub use a_to_b::AtoBOutcome;
pub use b_to_c::{BtoCOutcome, Endpoints};

/// A broadcast transfer and its decoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub txid: Txid,
    pub signed_hex: String,
    pub decoded: Value,
}

/// Build, sign and broadcast `plan`.
///
/// `label` names the leg in the output, e.g. `A' -> B'`.
pub fn broadcast<R: NodeRpc + ?Sized>(
    rpc: &R,
    plan: &SpendPlan,
    label: &str,
    out: &mut impl Write,
) -> Result<(Txid, String)> {
    let raw_hex = rpc.create_raw_transaction(&plan.inputs(), &plan.outputs())?;
    writeln!(out, "\nRaw Transaction Hex ({label}):")?;
    writeln!(out, "{raw_hex}")?;

    let signed = rpc.sign_raw_transaction(&raw_hex)?;
    if !signed.complete {
        tracing::warn!(leg = label, "Wallet could not sign every input");
        return Err(Error::SigningIncomplete);
    }

    let txid = rpc.send_raw_transaction(&signed.hex)?;
    tracing::info!(
        leg = label,
        %txid,
        send = %plan.send,
        fee = %plan.fee,
        change = ?plan.change.as_ref().map(|(_, amount)| amount.to_sat()),
        "Broadcast transaction"
    );
    writeln!(out, "\nTransaction {label} broadcasted. TXID: {txid}")?;

    Ok((txid, signed.hex))
}
