//! Console output for the transfer walkthrough.

use std::io::{self, Write};

use bitcoincore_rpc::bitcoin::Address;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

const WIDTH: usize = 60;

pub fn banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(WIDTH))
}

pub fn closing(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(WIDTH))
}

pub fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(WIDTH))
}

/// JSON with four-space indentation.
pub fn to_pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    // Serializing a `Value` into memory cannot fail.
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

pub fn pretty_print(out: &mut impl Write, title: &str, value: &Value) -> io::Result<()> {
    writeln!(out, "\n--- {title} ---")?;
    writeln!(out, "{}", to_pretty_json(value))?;
    rule(out)
}

/// `scriptPubKey.hex` of the first output paying `address`.
///
/// Newer nodes report a single `address`; older ones an `addresses` array.
pub fn locking_script_for<'a>(decoded: &'a Value, address: &Address) -> Option<&'a str> {
    let wanted = address.to_string();

    decoded["vout"].as_array()?.iter().find_map(|out| {
        let spk = &out["scriptPubKey"];
        let single = spk["address"].as_str() == Some(wanted.as_str());
        let listed = spk["addresses"]
            .as_array()
            .is_some_and(|list| list.iter().any(|a| a.as_str() == Some(wanted.as_str())));

        if single || listed { spk["hex"].as_str() } else { None }
    })
}

/// Unlocking data of one input.
#[derive(Debug, Clone, PartialEq)]
pub struct Unlocking<'a> {
    pub script_sig: &'a Value,
    pub witness: Option<&'a Value>,
}

/// Inputs carrying a `scriptSig`, in input order.
pub fn unlocking_scripts(decoded: &Value) -> Vec<Unlocking<'_>> {
    let Some(vin) = decoded["vin"].as_array() else {
        return Vec::new();
    };

    vin.iter()
        .filter_map(|input| {
            let script_sig = input.get("scriptSig")?;
            Some(Unlocking {
                script_sig,
                witness: input.get("txinwitness"),
            })
        })
        .collect()
}
