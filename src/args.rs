use clap::Parser;
use std::path::PathBuf;

use crate::amount::AmountSpec;
use crate::network::Network;

#[derive(Parser, Debug)]
#[command(author = "Vladislav Dyachenko")]
#[command(version = "0.1.0")]
#[command(about = "Solana mass payout utility")]
#[command(
    long_about = "Distributes a pool of SOL from one funding wallet to many payees, \
    splitting it evenly and submitting instruction-bounded transaction batches in strict sequence."
)]
pub struct Args {
    /// Target network for the run
    #[clap(value_enum, default_value_t = Network::Localnet)]
    pub network: Network,

    /// Amount to distribute: "max" for everything net of fees, or a SOL quantity
    #[clap(default_value = "max")]
    pub amount: AmountSpec,

    /// Path to the YAML configuration file
    #[clap(short, long, default_value = "config.yaml")]
    pub config: PathBuf,
}
