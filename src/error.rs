//! Error types for did:near resolution operations.
//!
//! Every failure of a resolution attempt is terminal and surfaces as a
//! [`ResolutionError`]. Failures of the NEAR JSON-RPC transport are described
//! by [`RpcError`] and are carried inside the resolution error that caused the
//! lookup.

use thiserror::Error;

/// Boxed error used to carry the underlying cause of a failed account lookup
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during did:near resolution operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolutionError {
    /// The DID is neither a named account nor a content identifier
    #[error("Invalid did:near format: {0}")]
    InvalidFormat(String),

    /// The network selected for the DID has no configuration
    #[error("Network {network_id} is not configured for DID {did}")]
    NetworkNotConfigured { did: String, network_id: String },

    /// The named account could not be looked up or has no full-access key
    #[error("Named account {account_id} not found: {source}")]
    AccountNotFound {
        account_id: String,
        #[source]
        source: BoxError,
    },

    /// The registry contract has no owner for the DID
    #[error("DID {did} not registered in {contract_id}")]
    NotRegistered { did: String, contract_id: String },

    /// The resolver configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// NEAR RPC error
    #[error("NEAR RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Base58 decoding error
    #[error("Base58 decoding error: {0}")]
    Base58DecodeError(String),
}

/// Errors raised by the NEAR JSON-RPC transport
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RpcError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The node answered with a non-success HTTP status
    #[error("HTTP {0} from NEAR RPC endpoint")]
    HttpStatus(reqwest::StatusCode),

    /// The node answered with a JSON-RPC error object
    #[error("{name}: {message}")]
    Server { name: String, message: String },

    /// The response did not have the expected shape
    #[error("Unexpected RPC response: {0}")]
    UnexpectedResponse(String),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_not_found_message_includes_cause() {
        let err = ResolutionError::AccountNotFound {
            account_id: "alice.testnet".to_string(),
            source: Box::new(RpcError::Server {
                name: "HANDLER_ERROR".to_string(),
                message: "account alice.testnet does not exist while viewing".to_string(),
            }),
        };

        let message = err.to_string();
        assert!(message.contains("alice.testnet"));
        assert!(message.contains("does not exist while viewing"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_registered_message() {
        let err = ResolutionError::NotRegistered {
            did: "did:near:abc".to_string(),
            contract_id: "neardti.testnet".to_string(),
        };
        assert_eq!(err.to_string(), "DID did:near:abc not registered in neardti.testnet");
    }
}
