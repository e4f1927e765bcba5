use serde::{Deserialize, Serialize};

/// Inbound webhook payload, shaped as
/// `{ event: { data: { block: { number, hash, logs: [...] } } } }`.
/// Every level is optional: a payload without block data is handled as
/// "nothing to process" rather than rejected.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayloadDTO {
    pub event: Option<WebhookEventDTO>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventDTO {
    pub data: Option<WebhookEventDataDTO>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventDataDTO {
    pub block: Option<BlockDTO>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlockDTO {
    pub number: Option<i64>,
    pub hash: Option<String>,
    #[serde(default)]
    pub logs: Vec<LogDTO>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogDTO {
    pub address: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub data: Option<String>,
    pub transaction_hash: Option<String>,
}

impl WebhookPayloadDTO {
    /// The block carried by the payload, if the expected nesting is present
    pub fn into_block(self) -> Option<BlockDTO> {
        self.event?.data?.block
    }
}
