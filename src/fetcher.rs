//! Public key retrieval.
//!
//! Named accounts publish their keys directly as full-access keys of the
//! account. Content identifiers are mapped to an owner by the registry
//! contract of the network they live on.

use log::{debug, warn};
use serde_json::{json, Value};

use crate::did::strip_method_prefix;
use crate::error::{ResolutionError, ResolutionResult, RpcError};
use crate::network::NetworkConfig;
use crate::rpc::NearRpc;
use crate::types::PublicKeyRecord;

/// View method of the registry contract returning the owner of an identity
pub const IDENTITY_OWNER_METHOD: &str = "identity_owner";

/// Fetches the full-access keys of a named account, in node order
pub async fn fetch_account_keys<R>(
    rpc: &R,
    network: &NetworkConfig,
    account_id: &str,
) -> ResolutionResult<Vec<PublicKeyRecord>>
where
    R: NearRpc + ?Sized,
{
    let access_keys = rpc
        .view_access_key_list(network, account_id)
        .await
        .map_err(|e| ResolutionError::AccountNotFound {
            account_id: account_id.to_string(),
            source: Box::new(e),
        })?;

    let total = access_keys.len();
    let keys: Vec<PublicKeyRecord> = access_keys
        .into_iter()
        .filter(|info| info.is_full_access())
        .map(|info| PublicKeyRecord::new(strip_key_type(&info.public_key)))
        .collect();

    debug!(
        "Account {account_id} on {} has {} full-access keys out of {total}",
        network.network_id,
        keys.len()
    );

    if keys.is_empty() {
        warn!("Account {account_id} has no full-access key");
        return Err(ResolutionError::AccountNotFound {
            account_id: account_id.to_string(),
            source: format!("no full-access keys found for account {account_id}").into(),
        });
    }

    Ok(keys)
}

/// Looks up the owner key of a content-identifier DID in the registry contract
pub async fn fetch_registered_owner<R>(
    rpc: &R,
    network: &NetworkConfig,
    did: &str,
) -> ResolutionResult<Vec<PublicKeyRecord>>
where
    R: NearRpc + ?Sized,
{
    let owner = rpc
        .call_view_function(
            network,
            &network.contract_id,
            IDENTITY_OWNER_METHOD,
            &json!({ "identity": did }),
        )
        .await?;

    let owner = match owner {
        Value::Null => None,
        Value::String(owner) if owner.is_empty() || owner == "null" => None,
        Value::String(owner) => Some(owner),
        other => {
            return Err(RpcError::UnexpectedResponse(format!(
                "{IDENTITY_OWNER_METHOD} returned {other}"
            ))
            .into())
        }
    };

    let owner = owner.ok_or_else(|| ResolutionError::NotRegistered {
        did: did.to_string(),
        contract_id: network.contract_id.clone(),
    })?;

    debug!("DID {did} is owned by {owner} in {}", network.contract_id);

    Ok(vec![PublicKeyRecord::new(strip_method_prefix(&owner))])
}

/// Removes the curve tag of a NEAR public key, e.g. `ed25519:`.
/// Keys from the node always carry a tag; untagged values are returned as is.
fn strip_key_type(public_key: &str) -> &str {
    public_key
        .split_once(':')
        .map_or(public_key, |(_, key)| key)
}
