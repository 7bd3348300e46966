use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::error::PayoutError;

/// Fresh random addresses with no linkage to any real funding. Test
/// networks only; the keypairs are dropped, so nothing can ever spend
/// from these accounts.
pub fn generate_test_payees(count: usize) -> Vec<Pubkey> {
    (0..count).map(|_| Keypair::new().pubkey()).collect()
}

/// Reads a newline-delimited payee list: one base58 address per line,
/// surrounding whitespace tolerated, blank lines skipped.
pub fn load_payees_from_list(path: &Path) -> Result<Vec<Pubkey>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payee list {:?}", path))?;
    let payees = parse_payee_list(&text)?;
    if payees.is_empty() {
        return Err(PayoutError::NoPayees.into());
    }
    Ok(payees)
}

/// Parsing core of the loader. A trimmed-empty line is skipped, never
/// handed to the address parser.
pub fn parse_payee_list(text: &str) -> Result<Vec<Pubkey>, PayoutError> {
    let mut payees = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let payee = line
            .parse::<Pubkey>()
            .map_err(|source| PayoutError::MalformedAddress {
                line: index + 1,
                value: line.to_string(),
                source,
            })?;
        payees.push(payee);
    }
    Ok(payees)
}
