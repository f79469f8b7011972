//! A resolver for did:near identifiers.
//!
//! did:near DIDs come in two shapes. Named accounts (`did:near:alice.testnet`,
//! `did:near:bob.near`) are resolved from the full-access keys of the NEAR
//! account itself. Base-58 content identifiers are resolved through the
//! `identity_owner` view method of a registry contract deployed on the
//! network the DID belongs to.
//!
//! The library performs read-only resolution only; it does not register,
//! update or cache DIDs.

mod adapter;
mod did;
mod document;
mod error;
mod fetcher;
mod network;
mod resolver;
mod rpc;
mod types;

pub use adapter::{get_resolver, DidMethodResolver, GenericResolver, NearMethodResolver};
pub use did::{classify, IdentifierKind, NearDid, METHOD_NAME};
pub use document::assemble_document;
pub use error::{ResolutionError, ResolutionResult, RpcError};
pub use network::{NetworkConfig, NetworkRegistry, ResolverConfig};
pub use resolver::{resolve_did, Resolver};
pub use rpc::{
    AccessKey, AccessKeyInfo, AccessKeyPermission, FunctionCallPermission, JsonRpcClient, NearRpc,
};
pub use types::{
    DIDDocument, DidResolutionOutput, DocumentMetadata, PublicKeyRecord, ResolutionMetadata,
    VerificationMethod,
};

/// Resolves a did:near identifier against the given networks
///
/// # Arguments
/// * `did` - The did:near identifier to resolve
/// * `config` - The networks to resolve against; the first one is the default
///
/// # Example
/// ```no_run
/// use near_did_resolver::{resolve, NetworkConfig, ResolverConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ResolverConfig::new(vec![
///         NetworkConfig::testnet("neardti.testnet"),
///         NetworkConfig::mainnet("neardti.near"),
///     ])?;
///     let document = resolve("did:near:geinergv.near", config).await?;
///
///     println!("Resolved DID Document: {:?}", document);
///     Ok(())
/// }
/// ```
pub async fn resolve(did: &str, config: ResolverConfig) -> Result<DIDDocument, ResolutionError> {
    resolve_did(did, config).await
}
