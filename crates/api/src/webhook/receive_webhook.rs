use crate::error::ChainCalError;
use crate::event::subscribers::EnqueueRemindersOnWebhookReceived;
use crate::shared::signature::{verify_webhook_signature, WEBHOOK_SIGNATURE_HEADER};
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use chaincal_api_structs::dtos::{BlockDTO, LogDTO, WebhookPayloadDTO};
use chaincal_api_structs::receive_webhook::*;
use chaincal_domain::{Event, NewEvent, UNKNOWN_EVENT_SIGNATURE};
use chaincal_infra::ChainCalContext;
use tracing::{error, info, warn};

/// Placeholder reminder policy for ingested logs: remind 24 hours after
/// ingest, not derived from on-chain semantics
const DEFAULT_REMINDER_HORIZON_MILLIS: i64 = 1000 * 60 * 60 * 24;

pub async fn receive_webhook_controller(
    http_req: HttpRequest,
    body: web::Bytes,
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let signature = http_req
        .headers()
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ChainCalError::Unauthorized("Webhook signature is missing".into()))?;

    // Fail closed when no signing key was configured
    let signing_key = ctx
        .config
        .webhook_signing_key
        .as_deref()
        .ok_or_else(|| ChainCalError::Unauthorized("Webhook signing key is missing".into()))?;

    if body.is_empty() {
        return Err(ChainCalError::BadClientData("Request body is missing".into()));
    }

    // The digest must be computed over the raw bytes as received;
    // re-serializing the parsed payload would break verification
    if !verify_webhook_signature(signing_key, &body, signature) {
        return Err(ChainCalError::Unauthorized("Invalid webhook signature".into()));
    }

    let payload: WebhookPayloadDTO = serde_json::from_slice(&body)
        .map_err(|e| ChainCalError::BadClientData(format!("Unparseable webhook payload: {}", e)))?;

    let block = match payload.into_block() {
        Some(block) if !block.logs.is_empty() => block,
        _ => {
            info!("No block data or logs found in webhook");
            return Ok(HttpResponse::Ok().json(APIResponse {
                message: "No relevant data to process".into(),
                processed: 0,
                total_logs: 0,
            }));
        }
    };

    let usecase = ReceiveWebhookUseCase { block };
    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                message: format!("Processed {} of {} log(s)", res.events.len(), res.total_logs),
                processed: res.events.len(),
                total_logs: res.total_logs,
            })
        })
        .map_err(ChainCalError::from)
}

/// Materialize one event per log entry of a verified webhook block.
#[derive(Debug)]
pub struct ReceiveWebhookUseCase {
    pub block: BlockDTO,
}

#[derive(Debug)]
pub struct ProcessedWebhook {
    pub events: Vec<Event>,
    pub total_logs: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for ChainCalError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ReceiveWebhookUseCase {
    type Response = ProcessedWebhook;

    type Error = UseCaseError;

    const NAME: &'static str = "ReceiveWebhook";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let next_timestamp = now + DEFAULT_REMINDER_HORIZON_MILLIS;
        let total_logs = self.block.logs.len();
        info!(
            "Processing {} log(s) from block {:?}",
            total_logs, self.block.number
        );

        let mut events = Vec::new();
        for log in &self.block.logs {
            // Each log entry is processed independently, one malformed entry
            // never aborts the batch
            let new_event = match materialize_log(&self.block, log, next_timestamp, now) {
                Some(new_event) => new_event,
                None => {
                    warn!(
                        "Log entry without contract address in block {:?}, skipping",
                        self.block.number
                    );
                    continue;
                }
            };

            match ctx.repos.events.insert(&new_event).await {
                Ok(event) => events.push(event),
                Err(e) => {
                    error!(
                        "Error storing log entry from block {:?}: {:?}",
                        self.block.number, e
                    );
                }
            }
        }

        Ok(ProcessedWebhook { events, total_logs })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(EnqueueRemindersOnWebhookReceived)]
    }
}

fn materialize_log(
    block: &BlockDTO,
    log: &LogDTO,
    next_timestamp: i64,
    now: i64,
) -> Option<NewEvent> {
    let contract_address = log.address.clone()?;
    let event_signature = log
        .topics
        .first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_EVENT_SIGNATURE.to_string());

    // Raw log data stored verbatim, decoding against an ABI is out of scope
    let event_args = serde_json::json!({
        "topics": log.topics,
        "data": log.data,
        "transactionHash": log.transaction_hash,
        "blockNumber": block.number,
        "blockHash": block.hash,
    });

    Some(NewEvent {
        contract_address,
        event_signature,
        event_args,
        next_timestamp,
        created: now,
        updated: now,
    })
}
