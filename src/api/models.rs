//! Request and response shapes of the mempool endpoints.
//!
//! Responses ignore unknown fields; the node may add fields in later
//! versions.

use serde::{Deserialize, Serialize};

/// Body of `POST /mempool/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolListRequest {
    /// Logical network identifier, e.g. `mainnet`
    pub network: String,
}

impl MempoolListRequest {
    /// Creates a request for `network`.
    #[must_use]
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
        }
    }
}

/// Hashes identifying one transaction in the mempool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolTransactionHashes {
    /// Hex-encoded intent hash
    pub intent_hash: String,
    /// Bech32m-encoded intent hash
    pub intent_hash_bech32m: String,
    /// Hex-encoded notarized payload hash
    pub payload_hash: String,
    /// Bech32m-encoded notarized payload hash
    pub payload_hash_bech32m: String,
}

/// Response of `POST /mempool/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolListResponse {
    /// Every transaction currently in the mempool
    pub contents: Vec<MempoolTransactionHashes>,
}

/// Body of `POST /mempool/transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolTransactionRequest {
    /// Logical network identifier, e.g. `mainnet`
    pub network: String,
    /// Hex-encoded notarized payload hash to look up
    pub payload_hash: String,
}

impl MempoolTransactionRequest {
    /// Creates a lookup of `payload_hash` on `network`.
    #[must_use]
    pub fn new(network: impl Into<String>, payload_hash: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            payload_hash: payload_hash.into(),
        }
    }
}

/// One payload returned by `POST /mempool/transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolTransactionPayload {
    /// Hex-encoded notarized payload hash
    pub hash: String,
    /// Bech32m-encoded notarized payload hash
    pub hash_bech32m: String,
    /// Hex-encoded payload, absent when it could not be loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    /// Reason the payload could not be loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `POST /mempool/transaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolTransactionResponse {
    /// Number of payloads found
    pub count: u32,
    /// The payloads found
    pub payloads: Vec<MempoolTransactionPayload>,
}
