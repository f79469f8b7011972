//! DID Document assembly.

use crate::types::{DIDDocument, PublicKeyRecord, VerificationMethod};

pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";
pub const ED25519_2018_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2018/v1";
pub const ED25519_VERIFICATION_KEY_2018: &str = "Ed25519VerificationKey2018";

/// Fragment shared by every verification method of a did:near document
pub const OWNER_FRAGMENT: &str = "owner";

/// Builds the DID Document for `did` controlled by `keys`.
///
/// Every key is published under the same `#owner` reference, so
/// `authentication` and `assertionMethod` hold that single reference
/// whatever the number of keys.
pub fn assemble_document(did: &str, keys: &[PublicKeyRecord]) -> DIDDocument {
    let key_id = format!("{did}#{OWNER_FRAGMENT}");

    let verification_method = keys
        .iter()
        .map(|key| VerificationMethod {
            id: key_id.clone(),
            method_type: ED25519_VERIFICATION_KEY_2018.to_string(),
            controller: did.to_string(),
            public_key_base58: key.public_key_base58.clone(),
        })
        .collect();

    DIDDocument {
        context: vec![DID_CONTEXT.to_string(), ED25519_2018_CONTEXT.to_string()],
        id: did.to_string(),
        verification_method,
        authentication: vec![key_id.clone()],
        assertion_method: vec![key_id],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_key_document_json() {
        let did = "did:near:geinergv.testnet";
        let doc = assemble_document(
            did,
            &[PublicKeyRecord::new("7WLUHT69sw5UpYK9xAY5cbdWKf4vSMruXzwfbL999zXo")],
        );

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "@context": [
                    "https://www.w3.org/ns/did/v1",
                    "https://w3id.org/security/suites/ed25519-2018/v1"
                ],
                "id": "did:near:geinergv.testnet",
                "verificationMethod": [{
                    "id": "did:near:geinergv.testnet#owner",
                    "type": "Ed25519VerificationKey2018",
                    "controller": "did:near:geinergv.testnet",
                    "publicKeyBase58": "7WLUHT69sw5UpYK9xAY5cbdWKf4vSMruXzwfbL999zXo"
                }],
                "authentication": ["did:near:geinergv.testnet#owner"],
                "assertionMethod": ["did:near:geinergv.testnet#owner"]
            })
        );
    }

    #[test]
    fn test_multiple_keys_share_owner_reference() {
        let did = "did:near:alice.near";
        let keys = vec![
            PublicKeyRecord::new("key1"),
            PublicKeyRecord::new("key2"),
            PublicKeyRecord::new("key3"),
        ];
        let doc = assemble_document(did, &keys);

        assert_eq!(doc.verification_method.len(), 3);
        for (method, key) in doc.verification_method.iter().zip(&keys) {
            assert_eq!(method.id, "did:near:alice.near#owner");
            assert_eq!(method.controller, did);
            assert_eq!(method.public_key_base58, key.public_key_base58);
        }
        assert_eq!(doc.authentication, vec!["did:near:alice.near#owner".to_string()]);
        assert_eq!(doc.assertion_method, doc.authentication);
    }

    #[test]
    fn test_empty_key_list() {
        let doc = assemble_document("did:near:alice.near", &[]);
        assert!(doc.verification_method.is_empty());
        assert_eq!(doc.authentication.len(), 1);
        assert_eq!(doc.assertion_method.len(), 1);
    }
}
