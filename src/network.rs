//! Network configuration and the per-request network registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ResolutionError, ResolutionResult};

pub const TESTNET_NETWORK_ID: &str = "testnet";
pub const TESTNET_DEFAULT_RPC: &str = "https://rpc.testnet.near.org";
pub const MAINNET_NETWORK_ID: &str = "near";
pub const MAINNET_DEFAULT_RPC: &str = "https://rpc.mainnet.near.org";

/// Connection details of one NEAR network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Account id of the DID registry contract
    #[serde(rename = "contractId")]
    pub contract_id: String,

    /// JSON-RPC endpoint of a node on this network
    #[serde(rename = "rpcUrl")]
    pub rpc_url: String,

    /// Network identifier, e.g. `testnet` or `near`
    #[serde(rename = "networkId")]
    pub network_id: String,
}

impl NetworkConfig {
    pub fn new(
        contract_id: impl Into<String>,
        rpc_url: impl Into<String>,
        network_id: impl Into<String>,
    ) -> Self {
        Self {
            contract_id: contract_id.into(),
            rpc_url: rpc_url.into(),
            network_id: network_id.into(),
        }
    }

    /// Public NEAR testnet with the given registry contract
    pub fn testnet(contract_id: impl Into<String>) -> Self {
        Self::new(contract_id, TESTNET_DEFAULT_RPC, TESTNET_NETWORK_ID)
    }

    /// Public NEAR mainnet with the given registry contract
    pub fn mainnet(contract_id: impl Into<String>) -> Self {
        Self::new(contract_id, MAINNET_DEFAULT_RPC, MAINNET_NETWORK_ID)
    }
}

/// Resolver configuration: a non-empty list of networks, the first of which is
/// the default network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolverConfig {
    networks: Vec<NetworkConfig>,
}

impl ResolverConfig {
    pub fn new(networks: Vec<NetworkConfig>) -> ResolutionResult<Self> {
        let config = Self { networks };
        config.validate()?;
        Ok(config)
    }

    /// Single-network configuration. The network id defaults to `testnet`.
    pub fn single(
        contract_id: impl Into<String>,
        rpc_url: impl Into<String>,
        network_id: Option<&str>,
    ) -> ResolutionResult<Self> {
        Self::new(vec![NetworkConfig::new(
            contract_id,
            rpc_url,
            network_id.unwrap_or(TESTNET_NETWORK_ID),
        )])
    }

    /// Loads a list of `{contractId, rpcUrl, networkId}` objects
    pub fn from_json(json: &str) -> ResolutionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn networks(&self) -> &[NetworkConfig] {
        &self.networks
    }

    fn validate(&self) -> ResolutionResult<()> {
        if self.networks.is_empty() {
            return Err(ResolutionError::InvalidConfiguration(
                "at least one network must be configured".to_string(),
            ));
        }
        for network in &self.networks {
            Url::parse(&network.rpc_url).map_err(|e| {
                ResolutionError::InvalidConfiguration(format!(
                    "RPC URL of network {} is not a URL: {} {e}",
                    network.network_id, network.rpc_url
                ))
            })?;
        }
        Ok(())
    }
}

/// Read-only lookup of network configurations by network id
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: HashMap<String, NetworkConfig>,
    default_network: String,
}

impl NetworkRegistry {
    pub fn new(config: ResolverConfig) -> ResolutionResult<Self> {
        config.validate()?;

        let default_network = config
            .networks
            .first()
            .map(|network| network.network_id.clone())
            .ok_or_else(|| {
                ResolutionError::InvalidConfiguration("no default network".to_string())
            })?;
        let mut networks = HashMap::with_capacity(config.networks.len());
        for network in config.networks {
            // Later duplicates replace earlier ones.
            networks.insert(network.network_id.clone(), network);
        }

        Ok(Self {
            networks,
            default_network,
        })
    }

    pub fn default_network(&self) -> &str {
        &self.default_network
    }

    pub fn get(&self, network_id: &str) -> Option<&NetworkConfig> {
        self.networks.get(network_id)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }
}
