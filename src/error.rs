use solana_sdk::pubkey::ParsePubkeyError;
use thiserror::Error;

use crate::network::Network;

/// Fatal conditions the payout engine diagnoses itself. Configuration and
/// transport failures travel as `anyhow` errors instead.
#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("invalid payee address on line {line}: {value:?}: {source}")]
    MalformedAddress {
        line: usize,
        value: String,
        source: ParsePubkeyError,
    },

    #[error("payee list is empty, nothing to distribute")]
    NoPayees,

    #[error(
        "per-payee share is not positive: {total_lamports} lamports across {payee_count} payees \
         (fee reserve {fee_reserve_lamports} lamports)"
    )]
    NonPositiveShare {
        total_lamports: i128,
        payee_count: usize,
        fee_reserve_lamports: u128,
    },

    #[error("distribution amount exceeds the representable lamport range")]
    AmountTooLarge,

    #[error(
        "insufficient funds on {network}: required {required_lamports} lamports, \
         available {available_lamports} lamports"
    )]
    InsufficientFunds {
        network: Network,
        required_lamports: u64,
        available_lamports: u64,
    },
}
