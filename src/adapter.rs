//! Adapter exposing the resolver to pluggable DID resolution registries.
//!
//! Registries dispatch on the DID method name; [`get_resolver`] returns the
//! did:near entry for such a map without keeping any global state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::did::METHOD_NAME;
use crate::error::ResolutionError;
use crate::resolver::Resolver;
use crate::rpc::NearRpc;
use crate::types::DidResolutionOutput;

pub type GenericResolver = dyn DidMethodResolver + Send + Sync;

/// A resolver for a single DID method
#[async_trait]
pub trait DidMethodResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<DidResolutionOutput, ResolutionError>;
}

/// did:near entry of a resolver registry
pub struct NearMethodResolver<R> {
    inner: Arc<Resolver<R>>,
}

impl<R> NearMethodResolver<R> {
    pub fn new(inner: Arc<Resolver<R>>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: NearRpc> DidMethodResolver for NearMethodResolver<R> {
    async fn resolve(&self, did: &str) -> Result<DidResolutionOutput, ResolutionError> {
        let did_document = self.inner.resolve(did).await?;
        Ok(DidResolutionOutput::new(did_document))
    }
}

/// Builds the method-name keyed resolver map for `resolver`
pub fn get_resolver<R>(resolver: Arc<Resolver<R>>) -> HashMap<String, Box<GenericResolver>>
where
    R: NearRpc + 'static,
{
    let mut resolvers: HashMap<String, Box<GenericResolver>> = HashMap::new();
    resolvers.insert(
        METHOD_NAME.to_string(),
        Box::new(NearMethodResolver::new(resolver)),
    );
    resolvers
}
