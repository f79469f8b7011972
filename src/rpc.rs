//! NEAR JSON-RPC access.
//!
//! The resolver only needs two read-only queries: the access-key list of an
//! account and a view-function call on a contract. Both go through the
//! [`NearRpc`] trait so the resolution logic can run against any transport.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RpcError;
use crate::network::NetworkConfig;

/// Permission attached to an access key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKeyPermission {
    FullAccess,
    FunctionCall(FunctionCallPermission),
}

/// Restrictions of a function-call access key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallPermission {
    pub allowance: Option<String>,
    pub receiver_id: String,
    #[serde(default)]
    pub method_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    #[serde(default)]
    pub nonce: u64,
    pub permission: AccessKeyPermission,
}

/// One entry of an account's access-key list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyInfo {
    /// Public key with its curve tag, e.g. `ed25519:7WLU...`
    pub public_key: String,
    pub access_key: AccessKey,
}

impl AccessKeyInfo {
    pub fn is_full_access(&self) -> bool {
        self.access_key.permission == AccessKeyPermission::FullAccess
    }
}

#[derive(Debug, Deserialize)]
struct AccessKeyList {
    keys: Vec<AccessKeyInfo>,
}

#[derive(Debug, Deserialize)]
struct CallResult {
    #[serde(default)]
    result: Vec<u8>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    name: Option<String>,
    cause: Option<Value>,
    #[serde(default)]
    message: String,
    data: Option<Value>,
}

impl From<RpcErrorObject> for RpcError {
    fn from(err: RpcErrorObject) -> Self {
        let name = err
            .cause
            .as_ref()
            .and_then(|cause| cause["name"].as_str())
            .map(String::from)
            .or(err.name)
            .unwrap_or_else(|| "RPC_ERROR".to_string());
        let message = match err.data {
            Some(Value::String(data)) => data,
            Some(data) => data.to_string(),
            None => err.message,
        };
        RpcError::Server { name, message }
    }
}

/// Read-only queries against a NEAR network
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NearRpc: Send + Sync {
    /// Lists the access keys of `account_id`, in the order the node returns them
    async fn view_access_key_list(
        &self,
        network: &NetworkConfig,
        account_id: &str,
    ) -> Result<Vec<AccessKeyInfo>, RpcError>;

    /// Calls a view method on `contract_id` and returns its JSON result
    async fn call_view_function(
        &self,
        network: &NetworkConfig,
        contract_id: &str,
        method_name: &str,
        args: &Value,
    ) -> Result<Value, RpcError>;
}

/// [`NearRpc`] over HTTP JSON-RPC
#[derive(Debug, Clone, Default)]
pub struct JsonRpcClient {
    client: Client,
}

impl JsonRpcClient {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Uses a preconfigured HTTP client, e.g. one with a request timeout
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn query<T>(&self, network: &NetworkConfig, params: Value) -> Result<T, RpcError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": "query",
            "params": params,
        });
        debug!("NEAR RPC query on {}: {}", network.rpc_url, body["params"]);

        let response = self
            .client
            .post(network.rpc_url.as_str())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RpcError::HttpStatus(response.status()));
        }

        let response: RpcResponse<T> = response.json().await?;
        match (response.result, response.error) {
            (_, Some(err)) => Err(err.into()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(RpcError::UnexpectedResponse(
                "response has neither result nor error".to_string(),
            )),
        }
    }
}

#[async_trait]
impl NearRpc for JsonRpcClient {
    async fn view_access_key_list(
        &self,
        network: &NetworkConfig,
        account_id: &str,
    ) -> Result<Vec<AccessKeyInfo>, RpcError> {
        let list: AccessKeyList = self
            .query(
                network,
                json!({
                    "request_type": "view_access_key_list",
                    "finality": "final",
                    "account_id": account_id,
                }),
            )
            .await?;
        Ok(list.keys)
    }

    async fn call_view_function(
        &self,
        network: &NetworkConfig,
        contract_id: &str,
        method_name: &str,
        args: &Value,
    ) -> Result<Value, RpcError> {
        let args_base64 = BASE64.encode(serde_json::to_vec(args)?);
        let call: CallResult = self
            .query(
                network,
                json!({
                    "request_type": "call_function",
                    "finality": "final",
                    "account_id": contract_id,
                    "method_name": method_name,
                    "args_base64": args_base64,
                }),
            )
            .await?;
        decode_call_result(call)
    }
}

fn decode_call_result(call: CallResult) -> Result<Value, RpcError> {
    if let Some(error) = call.error {
        return Err(RpcError::Server {
            name: "CONTRACT_EXECUTION_ERROR".to_string(),
            message: error,
        });
    }
    if call.result.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&call.result)?)
}
