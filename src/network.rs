use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::ValueEnum;
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::config::Config;
use crate::payees;

/// Target ledger network for a payout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
    Mainnet,
    Devnet,
    Localnet,
}

impl Network {
    /// Real funds live here: no faucet, and payees come from a curated list.
    pub fn is_production(self) -> bool {
        matches!(self, Network::Mainnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

/// Where the payee list for a run comes from.
#[derive(Debug, Clone)]
pub enum PayeeSource {
    /// Fresh throwaway addresses, test networks only.
    Generated { count: usize },
    /// Operator-maintained newline-delimited address file.
    AddressList { path: PathBuf },
}

/// Everything network-specific a run needs, resolved once at startup and
/// handed to the engine so it never reads ambient state.
#[derive(Debug, Clone)]
pub struct Environment {
    pub network: Network,
    pub rpc_url: String,
    pub payee_source: PayeeSource,
}

impl Environment {
    pub fn from_config(network: Network, config: &Config) -> Result<Self> {
        let payee_source = if network.is_production() {
            match &config.payee_list_path {
                Some(path) => PayeeSource::AddressList { path: path.clone() },
                None => bail!("payee_list_path must be set in the config for mainnet runs"),
            }
        } else {
            PayeeSource::Generated {
                count: config.test_payee_count,
            }
        };

        Ok(Self {
            network,
            rpc_url: config.rpc_endpoints.url_for(network).to_string(),
            payee_source,
        })
    }

    pub fn source_payees(&self) -> Result<Vec<Pubkey>> {
        match &self.payee_source {
            PayeeSource::Generated { count } => {
                info!("Generating {} throwaway payee accounts", count);
                Ok(payees::generate_test_payees(*count))
            }
            PayeeSource::AddressList { path } => payees::load_payees_from_list(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RpcEndpoints;

    fn config_without_payee_list() -> Config {
        Config {
            keypair_path: "funder.json".to_string(),
            payee_list_path: None,
            fee_per_transfer_lamports: 5_000,
            test_payee_count: 10,
            rpc_endpoints: RpcEndpoints::default(),
        }
    }

    #[test]
    fn mainnet_requires_a_payee_list_path() {
        let err = Environment::from_config(Network::Mainnet, &config_without_payee_list())
            .unwrap_err();
        assert!(err.to_string().contains("payee_list_path"));
    }

    #[test]
    fn mainnet_uses_the_configured_address_list() {
        let mut config = config_without_payee_list();
        config.payee_list_path = Some(PathBuf::from("payees.txt"));
        let env = Environment::from_config(Network::Mainnet, &config).unwrap();
        assert!(matches!(
            env.payee_source,
            PayeeSource::AddressList { ref path } if path == &PathBuf::from("payees.txt")
        ));
        assert_eq!(env.rpc_url, "https://api.mainnet-beta.solana.com");
    }

    #[test]
    fn test_networks_generate_payees() {
        let env = Environment::from_config(Network::Devnet, &config_without_payee_list()).unwrap();
        assert!(matches!(env.payee_source, PayeeSource::Generated { count: 10 }));
        assert_eq!(env.rpc_url, "https://api.devnet.solana.com");

        let env =
            Environment::from_config(Network::Localnet, &config_without_payee_list()).unwrap();
        assert!(matches!(env.payee_source, PayeeSource::Generated { count: 10 }));
        assert_eq!(env.rpc_url, "http://127.0.0.1:8899");
    }

    #[test]
    fn only_mainnet_counts_as_production() {
        assert!(Network::Mainnet.is_production());
        assert!(!Network::Devnet.is_production());
        assert!(!Network::Localnet.is_production());
    }

    #[test]
    fn network_names_match_their_cli_tokens() {
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
        assert_eq!(Network::Devnet.to_string(), "devnet");
        assert_eq!(Network::Localnet.to_string(), "localnet");
    }
}
