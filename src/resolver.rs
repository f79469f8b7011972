//! Core DID resolution functionality.
//!
//! This module ties the pieces of a did:near resolution together: the DID is
//! classified, a network is selected for it, the controlling keys are fetched
//! from that network and the DID Document is assembled from them.

use log::debug;

use crate::did::{account_network, classify, strip_method_prefix, IdentifierKind, NearDid};
use crate::document::assemble_document;
use crate::error::{ResolutionError, ResolutionResult};
use crate::fetcher::{fetch_account_keys, fetch_registered_owner};
use crate::network::{NetworkConfig, NetworkRegistry, ResolverConfig};
use crate::rpc::{JsonRpcClient, NearRpc};
use crate::types::DIDDocument;

/// Resolver for did:near identifiers.
///
/// The network registry is fixed at construction, so one resolver can serve
/// concurrent resolutions behind an `Arc`.
pub struct Resolver<R = JsonRpcClient> {
    /// Configured networks, keyed by network id
    registry: NetworkRegistry,
    /// Transport used for on-chain queries
    rpc: R,
}

impl Resolver<JsonRpcClient> {
    /// Creates a new Resolver using the HTTP JSON-RPC transport
    pub fn new(config: ResolverConfig) -> ResolutionResult<Self> {
        Self::with_rpc(config, JsonRpcClient::new())
    }
}

impl<R: NearRpc> Resolver<R> {
    /// Creates a new Resolver on top of the given transport
    pub fn with_rpc(config: ResolverConfig, rpc: R) -> ResolutionResult<Self> {
        let registry = NetworkRegistry::new(config)?;
        debug!(
            "Resolver configured with {} networks, default {}",
            registry.len(),
            registry.default_network()
        );
        Ok(Self { registry, rpc })
    }

    /// Picks the network id a DID is resolved against.
    ///
    /// Content identifiers without an explicit network segment fall back to
    /// the default network, even though their registry entry is specific to
    /// one network. A wrong guess then shows up as `NotRegistered`.
    pub fn select_network_id(&self, did: &str, kind: IdentifierKind) -> String {
        match kind {
            IdentifierKind::NamedAccount => account_network(strip_method_prefix(did)).to_string(),
            IdentifierKind::ContentIdentifier => NearDid::parse(did)
                .and_then(|parsed| parsed.network)
                .unwrap_or_else(|| self.registry.default_network().to_string()),
            IdentifierKind::Invalid => self.registry.default_network().to_string(),
        }
    }

    /// Selects and looks up the network configuration for a DID
    pub fn select_network(&self, did: &str, kind: IdentifierKind) -> ResolutionResult<&NetworkConfig> {
        let network_id = self.select_network_id(did, kind);
        self.registry
            .get(&network_id)
            .ok_or(ResolutionError::NetworkNotConfigured {
                did: did.to_string(),
                network_id,
            })
    }

    /// Resolves a did:near identifier
    ///
    /// # Arguments
    /// * `did` - The DID to resolve
    ///
    /// # Example
    /// ```no_run
    /// use near_did_resolver::{Resolver, ResolverConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = ResolverConfig::single(
    ///         "neardti.testnet",
    ///         "https://rpc.testnet.near.org",
    ///         None,
    ///     )?;
    ///     let resolver = Resolver::new(config)?;
    ///     let document = resolver.resolve("did:near:geinergv.testnet").await?;
    ///     println!("Resolved DID Document: {:?}", document);
    ///     Ok(())
    /// }
    /// ```
    pub async fn resolve(&self, did: &str) -> ResolutionResult<DIDDocument> {
        let kind = classify(did);
        debug!("Resolving {did} as {kind:?}");

        let network = self.select_network(did, kind)?;
        debug!("Selected network {} for {did}", network.network_id);

        let keys = match kind {
            IdentifierKind::NamedAccount => {
                fetch_account_keys(&self.rpc, network, strip_method_prefix(did)).await?
            }
            IdentifierKind::ContentIdentifier => {
                fetch_registered_owner(&self.rpc, network, did).await?
            }
            IdentifierKind::Invalid => return Err(ResolutionError::InvalidFormat(did.to_string())),
        };

        Ok(assemble_document(did, &keys))
    }
}

/// Convenience function for resolving a DID without keeping a Resolver around
pub async fn resolve_did(did: &str, config: ResolverConfig) -> ResolutionResult<DIDDocument> {
    let resolver = Resolver::new(config)?;
    resolver.resolve(did).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use crate::fetcher::IDENTITY_OWNER_METHOD;
    use crate::rpc::{AccessKey, AccessKeyInfo, AccessKeyPermission, MockNearRpc};
    use serde_json::json;

    const CONTRACT_ID: &str = "neardti.testnet";
    const RPC_URL: &str = "https://rpc.testnet.near.org";
    const CONTENT_DID: &str = "did:near:CF5RiJYh4EVmEt8UADTjoP3XaZo1NPWxv6w5TmkLqjpR";
    const ACCOUNT_KEY: &str = "7WLUHT69sw5UpYK9xAY5cbdWKf4vSMruXzwfbL999zXo";

    fn full_access(public_key: &str) -> AccessKeyInfo {
        AccessKeyInfo {
            public_key: public_key.to_string(),
            access_key: AccessKey {
                nonce: 0,
                permission: AccessKeyPermission::FullAccess,
            },
        }
    }

    fn single_network_resolver(rpc: MockNearRpc) -> Resolver<MockNearRpc> {
        let config = ResolverConfig::single(CONTRACT_ID, RPC_URL, None).unwrap();
        Resolver::with_rpc(config, rpc).unwrap()
    }

    fn multi_network_resolver(rpc: MockNearRpc) -> Resolver<MockNearRpc> {
        let config = ResolverConfig::new(vec![
            NetworkConfig::testnet(CONTRACT_ID),
            NetworkConfig::mainnet("neardti.near"),
        ])
        .unwrap();
        Resolver::with_rpc(config, rpc).unwrap()
    }

    #[tokio::test]
    async fn test_named_account_resolution() {
        let mut rpc = MockNearRpc::new();
        rpc.expect_view_access_key_list()
            .withf(|network, account_id| {
                network.network_id == "testnet" && account_id == "geinergv.testnet"
            })
            .times(1)
            .returning(|_, _| Ok(vec![full_access(&format!("ed25519:{ACCOUNT_KEY}"))]));

        let resolver = single_network_resolver(rpc);
        let did = "did:near:geinergv.testnet";
        let doc = resolver.resolve(did).await.unwrap();

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "@context": [
                    "https://www.w3.org/ns/did/v1",
                    "https://w3id.org/security/suites/ed25519-2018/v1"
                ],
                "id": did,
                "verificationMethod": [{
                    "id": "did:near:geinergv.testnet#owner",
                    "type": "Ed25519VerificationKey2018",
                    "controller": did,
                    "publicKeyBase58": ACCOUNT_KEY
                }],
                "authentication": ["did:near:geinergv.testnet#owner"],
                "assertionMethod": ["did:near:geinergv.testnet#owner"]
            })
        );
    }

    #[tokio::test]
    async fn test_content_identifier_resolution() {
        let mut rpc = MockNearRpc::new();
        rpc.expect_call_view_function()
            .withf(|_, contract_id, method_name, args| {
                contract_id == CONTRACT_ID
                    && method_name == IDENTITY_OWNER_METHOD
                    && *args == json!({ "identity": CONTENT_DID })
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!(CONTENT_DID)));

        let resolver = single_network_resolver(rpc);
        let doc = resolver.resolve(CONTENT_DID).await.unwrap();

        let key_id = format!("{CONTENT_DID}#owner");
        assert_eq!(doc.id, CONTENT_DID);
        assert_eq!(doc.verification_method.len(), 1);
        assert_eq!(
            doc.verification_method[0].public_key_base58,
            "CF5RiJYh4EVmEt8UADTjoP3XaZo1NPWxv6w5TmkLqjpR"
        );
        assert_eq!(doc.verification_method[0].controller, CONTENT_DID);
        assert_eq!(doc.authentication, vec![key_id.clone()]);
        assert_eq!(doc.assertion_method, vec![key_id]);
    }

    #[tokio::test]
    async fn test_invalid_did_makes_no_network_call() {
        // No expectations: any RPC call panics.
        let resolver = single_network_resolver(MockNearRpc::new());

        for did in ["did:near:alice", "did:web:example.com", "", "did:near:0OIl"] {
            let err = resolver.resolve(did).await.unwrap_err();
            assert!(matches!(err, ResolutionError::InvalidFormat(ref d) if d == did));
        }
    }

    #[tokio::test]
    async fn test_mainnet_account_selects_near_network() {
        let mut rpc = MockNearRpc::new();
        rpc.expect_view_access_key_list()
            .withf(|network, account_id| {
                network.network_id == "near"
                    && network.rpc_url == "https://rpc.mainnet.near.org"
                    && account_id == "geinergv.near"
            })
            .times(1)
            .returning(|_, _| Ok(vec![full_access(&format!("ed25519:{ACCOUNT_KEY}"))]));

        let resolver = multi_network_resolver(rpc);
        let doc = resolver.resolve("did:near:geinergv.near").await.unwrap();

        assert_eq!(doc.verification_method[0].public_key_base58, ACCOUNT_KEY);
    }

    #[tokio::test]
    async fn test_segmented_named_account_is_looked_up() {
        let mut rpc = MockNearRpc::new();
        rpc.expect_view_access_key_list()
            .withf(|network, account_id| {
                network.network_id == "near" && account_id == "testnet:alice.near"
            })
            .times(1)
            .returning(|_, _| {
                Err(RpcError::Server {
                    name: "UNKNOWN_ACCOUNT".to_string(),
                    message: "account testnet:alice.near does not exist while viewing".to_string(),
                })
            });

        let resolver = multi_network_resolver(rpc);
        let err = resolver.resolve("did:near:testnet:alice.near").await.unwrap_err();

        assert!(matches!(
            err,
            ResolutionError::AccountNotFound { ref account_id, .. } if account_id == "testnet:alice.near"
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_network() {
        let resolver = single_network_resolver(MockNearRpc::new());

        let err = resolver.resolve("did:near:geinergv.near").await.unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::NetworkNotConfigured { ref network_id, .. } if network_id == "near"
        ));

        let err = resolver
            .resolve("did:near:betanet:CF5RiJYh4EVmEt8UADTjoP3XaZo1NPWxv6w5TmkLqjpR")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::NetworkNotConfigured { ref network_id, .. } if network_id == "betanet"
        ));
    }

    #[tokio::test]
    async fn test_embedded_network_segment_selects_contract() {
        let did = "did:near:near:CF5RiJYh4EVmEt8UADTjoP3XaZo1NPWxv6w5TmkLqjpR";
        let mut rpc = MockNearRpc::new();
        rpc.expect_call_view_function()
            .withf(move |network, contract_id, _, args| {
                network.network_id == "near"
                    && contract_id == "neardti.near"
                    && args["identity"] == did
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!(ACCOUNT_KEY)));

        let resolver = multi_network_resolver(rpc);
        let doc = resolver.resolve(did).await.unwrap();

        assert_eq!(doc.verification_method[0].public_key_base58, ACCOUNT_KEY);
    }

    #[tokio::test]
    async fn test_unregistered_content_identifier() {
        let mut rpc = MockNearRpc::new();
        rpc.expect_call_view_function()
            .returning(|_, _, _, _| Ok(json!("null")));

        let resolver = single_network_resolver(rpc);
        let err = resolver.resolve(CONTENT_DID).await.unwrap_err();

        assert!(matches!(err, ResolutionError::NotRegistered { ref did, .. } if did == CONTENT_DID));
    }

    #[tokio::test]
    async fn test_registry_transport_failure_propagates() {
        let mut rpc = MockNearRpc::new();
        rpc.expect_call_view_function().times(1).returning(|_, _, _, _| {
            Err(RpcError::UnexpectedResponse("response has neither result nor error".to_string()))
        });

        let resolver = single_network_resolver(rpc);
        let err = resolver.resolve(CONTENT_DID).await.unwrap_err();

        assert!(matches!(err, ResolutionError::Rpc(_)));
    }

    #[test]
    fn test_network_selection() {
        let resolver = multi_network_resolver(MockNearRpc::new());
        let cases = vec![
            ("did:near:alice.testnet", "testnet"),
            ("did:near:alice.near", "near"),
            ("did:near:ALICE.NEAR", "near"),
            ("did:near:testnet:alice.near", "near"),
            (CONTENT_DID, "testnet"),
            ("did:near:near:CF5RiJYh4EVmEt8UADTjoP3XaZo1NPWxv6w5TmkLqjpR", "near"),
            ("did:near:alice", "testnet"),
            ("did:near:betanet:not-an-identifier", "testnet"),
        ];

        for (did, expected) in cases {
            let kind = classify(did);
            let first = resolver.select_network_id(did, kind);
            assert_eq!(first, expected, "{did}");
            assert_eq!(resolver.select_network_id(did, kind), first);
        }
    }
}
