//! Chained P2SH-SegWit transfers against a regtest Bitcoin Core node.
//!
//! Two legs are driven over JSON-RPC: A' is funded from mined coinbase
//! rewards and pays B', then B' pays C'. Signing, coin selection checks and
//! validation all happen inside bitcoind; this crate only sequences the
//! calls and prints what the node returns.

pub mod config;
pub mod error;
pub mod report;
pub mod rpc;
pub mod session;
pub mod spend;
pub mod transfer;

use std::io::Write;

pub use error::{Error, Result};

use crate::config::Config;
use crate::rpc::NodeRpc;
use crate::transfer::{AtoBOutcome, BtoCOutcome, Endpoints, a_to_b, b_to_c};

/// Run A'->B', then spend the new B' output to C' in the same session.
pub fn run_chain<R: NodeRpc + ?Sized>(
    rpc: &R,
    config: &Config,
    out: &mut impl Write,
) -> Result<(AtoBOutcome, BtoCOutcome)> {
    let first = a_to_b::run(rpc, config, out)?;

    let endpoints = Endpoints {
        from: first.addr_b.clone(),
        to: first.addr_c.clone(),
    };
    report::banner(out, "P2SH-SegWit Transaction (B' -> C')")?;
    let second = b_to_c::run(rpc, config, endpoints, out)?;

    Ok((first, second))
}

