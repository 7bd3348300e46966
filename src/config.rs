use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::network::Network;

/// Run configuration, loaded once at startup and passed into the engine.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path to the funding wallet keypair (JSON-encoded secret key bytes).
    pub keypair_path: String,

    /// Newline-delimited payee address list; consulted only for mainnet.
    #[serde(default)]
    pub payee_list_path: Option<PathBuf>,

    /// Flat fee estimate reserved per transfer, in lamports.
    #[serde(default = "default_fee_per_transfer")]
    pub fee_per_transfer_lamports: u64,

    /// How many throwaway payees to generate on test networks.
    #[serde(default = "default_test_payee_count")]
    pub test_payee_count: usize,

    #[serde(default)]
    pub rpc_endpoints: RpcEndpoints,
}

#[derive(Debug, Deserialize)]
pub struct RpcEndpoints {
    #[serde(default = "default_mainnet_url")]
    pub mainnet: String,
    #[serde(default = "default_devnet_url")]
    pub devnet: String,
    #[serde(default = "default_localnet_url")]
    pub localnet: String,
}

impl RpcEndpoints {
    pub fn url_for(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Devnet => &self.devnet,
            Network::Localnet => &self.localnet,
        }
    }
}

impl Default for RpcEndpoints {
    fn default() -> Self {
        Self {
            mainnet: default_mainnet_url(),
            devnet: default_devnet_url(),
            localnet: default_localnet_url(),
        }
    }
}

fn default_fee_per_transfer() -> u64 {
    5_000
}

fn default_test_payee_count() -> usize {
    10
}

fn default_mainnet_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

fn default_devnet_url() -> String {
    "https://api.devnet.solana.com".to_string()
}

fn default_localnet_url() -> String {
    "http://127.0.0.1:8899".to_string()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open config file {:?}", path.as_ref()))?;
        let config: Config =
            serde_yaml::from_reader(file).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_in_defaults() {
        let config: Config = serde_yaml::from_str("keypair_path: funder.json\n").unwrap();
        assert_eq!(config.keypair_path, "funder.json");
        assert_eq!(config.payee_list_path, None);
        assert_eq!(config.fee_per_transfer_lamports, 5_000);
        assert_eq!(config.test_payee_count, 10);
        assert_eq!(
            config.rpc_endpoints.mainnet,
            "https://api.mainnet-beta.solana.com"
        );
        assert_eq!(config.rpc_endpoints.devnet, "https://api.devnet.solana.com");
        assert_eq!(config.rpc_endpoints.localnet, "http://127.0.0.1:8899");
    }

    #[test]
    fn explicit_values_override_every_default() {
        let yaml = r#"
keypair_path: /keys/treasury.json
payee_list_path: /ops/payees.txt
fee_per_transfer_lamports: 2000
test_payee_count: 3
rpc_endpoints:
  mainnet: https://rpc.example.com
  devnet: https://devnet.example.com
  localnet: http://localhost:8899
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.payee_list_path, Some(PathBuf::from("/ops/payees.txt")));
        assert_eq!(config.fee_per_transfer_lamports, 2_000);
        assert_eq!(config.test_payee_count, 3);
        assert_eq!(config.rpc_endpoints.mainnet, "https://rpc.example.com");
    }

    #[test]
    fn url_for_selects_the_matching_endpoint() {
        let endpoints = RpcEndpoints {
            mainnet: "m".to_string(),
            devnet: "d".to_string(),
            localnet: "l".to_string(),
        };
        assert_eq!(endpoints.url_for(Network::Mainnet), "m");
        assert_eq!(endpoints.url_for(Network::Devnet), "d");
        assert_eq!(endpoints.url_for(Network::Localnet), "l");
    }

    #[test]
    fn missing_keypair_path_is_a_parse_error() {
        assert!(serde_yaml::from_str::<Config>("test_payee_count: 2\n").is_err());
    }
}
