//! Core types for did:near resolution.
//!
//! This module provides the DID Document produced by resolution, the public
//! key records it is built from, and the resolution output handed to DID
//! resolution frameworks.

use base58::FromBase58;
use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;

/// Media type of a JSON DID Document
pub const DID_JSON_CONTENT_TYPE: &str = "application/did+json";

/// A DID Document as defined in the DID Core specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DIDDocument {
    /// The context of the DID Document
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The DID itself
    pub id: String,

    /// Verification methods associated with this DID
    #[serde(rename = "verificationMethod")]
    pub verification_method: Vec<VerificationMethod>,

    /// Authentication verification method references
    pub authentication: Vec<String>,

    /// Assertion verification method references
    #[serde(rename = "assertionMethod")]
    pub assertion_method: Vec<String>,
}

/// A verification method in a DID Document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// The identifier of this verification method
    pub id: String,

    /// The type of the verification method
    #[serde(rename = "type")]
    pub method_type: String,

    /// The controller of this verification method
    pub controller: String,

    /// The raw public key, base-58 encoded
    #[serde(rename = "publicKeyBase58")]
    pub public_key_base58: String,
}

/// A public key fetched from the chain, without its curve tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyRecord {
    #[serde(rename = "publicKeyBase58")]
    pub public_key_base58: String,
}

impl PublicKeyRecord {
    pub fn new(public_key_base58: impl Into<String>) -> Self {
        Self {
            public_key_base58: public_key_base58.into(),
        }
    }

    /// Decodes the key material
    pub fn to_bytes(&self) -> Result<Vec<u8>, ResolutionError> {
        self.public_key_base58
            .from_base58()
            .map_err(|e| ResolutionError::Base58DecodeError(format!("{e:?}")))
    }
}

/// Resolution output in the shape expected by pluggable DID resolvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidResolutionOutput {
    /// The resolved DID Document
    pub did_document: DIDDocument,

    /// Metadata about the resolution process
    pub did_resolution_metadata: ResolutionMetadata,

    /// Metadata about the document itself
    pub did_document_metadata: DocumentMetadata,
}

impl DidResolutionOutput {
    pub fn new(did_document: DIDDocument) -> Self {
        Self {
            did_document,
            did_resolution_metadata: ResolutionMetadata::default(),
            did_document_metadata: DocumentMetadata::default(),
        }
    }
}

/// Metadata about the resolution process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionMetadata {
    /// Content type of the resolved document
    pub content_type: String,
}

impl Default for ResolutionMetadata {
    fn default() -> Self {
        Self {
            content_type: DID_JSON_CONTENT_TYPE.to_string(),
        }
    }
}

/// Document metadata. did:near keeps no versioning, so it is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {}
