//! DID parsing and identifier classification.
//!
//! This module splits did:near identifiers into their optional network segment
//! and method-specific identifier, and classifies the identifier as either a
//! human-readable NEAR account or a base-58 content identifier.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

/// The DID method name served by this crate
pub const METHOD_NAME: &str = "near";

/// Prefix shared by every did:near identifier
pub const DID_PREFIX: &str = "did:near:";

lazy_static! {
    static ref TESTNET_ACCOUNT: Regex = Regex::new(r"(?i)^[a-z0-9_.-]+\.testnet$").unwrap();
    static ref NEAR_ACCOUNT: Regex = Regex::new(r"(?i)\.near$").unwrap();
    static ref CONTENT_IDENTIFIER: Regex = Regex::new("^[1-9A-HJ-NP-Za-km-z]{44,50}$").unwrap();
}

/// Shape of the method-specific identifier of a did:near DID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// A human-readable account such as `alice.testnet` or `bob.near`
    NamedAccount,
    /// A base-58 identifier registered in the registry contract
    ContentIdentifier,
    /// Neither of the above
    Invalid,
}

/// A did:near identifier split into its components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearDid {
    /// Explicit network segment, as in `did:near:<network>:<id>`
    pub network: Option<String>,
    /// The method-specific identifier
    pub id: String,
}

impl NearDid {
    /// Creates a new NearDid instance
    pub fn new(network: Option<String>, id: String) -> Self {
        Self { network, id }
    }

    /// Splits a DID string into network segment and identifier.
    ///
    /// Returns `None` when the string does not start with `did:near:` or has
    /// more than four colon-delimited parts.
    pub fn parse(did: &str) -> Option<Self> {
        let rest = did.strip_prefix(DID_PREFIX)?;
        let parts: Vec<&str> = rest.split(':').collect();
        match parts.as_slice() {
            [id] => Some(Self::new(None, (*id).to_string())),
            [network, id] => Some(Self::new(Some((*network).to_string()), (*id).to_string())),
            _ => None,
        }
    }

    /// Classifies this DID
    pub fn kind(&self) -> IdentifierKind {
        classify(&self.to_string())
    }
}

impl fmt::Display for NearDid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.network {
            Some(network) => write!(f, "{DID_PREFIX}{network}:{}", self.id),
            None => write!(f, "{DID_PREFIX}{}", self.id),
        }
    }
}

/// Classifies a DID string. Total: anything that is not a did:near named
/// account or content identifier is [`IdentifierKind::Invalid`].
///
/// The named-account patterns apply to everything after `did:near:`, so
/// `did:near:testnet:alice.near` is a named account. Only content
/// identifiers may carry a `<network>:` segment.
pub fn classify(did: &str) -> IdentifierKind {
    let Some(identifier) = did.strip_prefix(DID_PREFIX) else {
        return IdentifierKind::Invalid;
    };

    if is_named_account(identifier) {
        return IdentifierKind::NamedAccount;
    }

    match NearDid::parse(did) {
        Some(parsed) if is_content_identifier(&parsed.id) => IdentifierKind::ContentIdentifier,
        _ => IdentifierKind::Invalid,
    }
}

/// Strips the did:near prefix, leaving the plain account or identifier
pub fn strip_method_prefix(value: &str) -> &str {
    value.strip_prefix(DID_PREFIX).unwrap_or(value)
}

/// `^[a-z0-9_.-]+\.testnet$` or anything ending in `.near`, ignoring case
pub fn is_named_account(identifier: &str) -> bool {
    TESTNET_ACCOUNT.is_match(identifier) || NEAR_ACCOUNT.is_match(identifier)
}

/// `^[1-9A-HJ-NP-Za-km-z]{44,50}$`
pub fn is_content_identifier(identifier: &str) -> bool {
    CONTENT_IDENTIFIER.is_match(identifier)
}

/// Network implied by the suffix of a named account
pub fn account_network(account_id: &str) -> &'static str {
    if NEAR_ACCOUNT.is_match(account_id) {
        "near"
    } else {
        "testnet"
    }
}
