use super::subscribers::CreateReminderOnEventCreated;
use crate::error::ChainCalError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chaincal_api_structs::create_event::*;
use chaincal_domain::{Event, NewEvent};
use chaincal_infra::ChainCalContext;

/// Default due time for a manually created subscription: one hour out
const DEFAULT_REMINDER_OFFSET_MILLIS: i64 = 1000 * 60 * 60;

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        contract_address: body.contract_address,
        event_signature: body.event_signature,
        event_args: body.event_args.unwrap_or_else(|| serde_json::json!({})),
        next_timestamp: body.next_timestamp,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(ChainCalError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub contract_address: String,
    pub event_signature: String,
    pub event_args: serde_json::Value,
    /// Explicit due time in millis, defaults to one hour from now
    pub next_timestamp: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidContractAddress,
    InvalidEventSignature,
    StorageError,
}

impl From<UseCaseError> for ChainCalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidContractAddress => Self::BadClientData(
                "Invalid contract address, expected a 0x-prefixed 20 byte hex string".into(),
            ),
            UseCaseError::InvalidEventSignature => {
                Self::BadClientData("Event signature must not be empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

fn is_valid_contract_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        if !is_valid_contract_address(&self.contract_address) {
            return Err(UseCaseError::InvalidContractAddress);
        }
        if self.event_signature.trim().is_empty() {
            return Err(UseCaseError::InvalidEventSignature);
        }

        let now = ctx.sys.get_timestamp_millis();
        let e = NewEvent {
            contract_address: self.contract_address.clone(),
            event_signature: self.event_signature.clone(),
            event_args: self.event_args.clone(),
            next_timestamp: self
                .next_timestamp
                .unwrap_or(now + DEFAULT_REMINDER_OFFSET_MILLIS),
            created: now,
            updated: now,
        };

        ctx.repos
            .events
            .insert(&e)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CreateReminderOnEventCreated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase() -> CreateEventUseCase {
        CreateEventUseCase {
            contract_address: "0x1113322dB8bdd75fD25d27d13023850bE1c2B1e4".into(),
            event_signature: "Transfer(address,address,uint256)".into(),
            event_args: serde_json::json!({}),
            next_timestamp: Some(500),
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_event_and_enqueues_reminder() {
        let ctx = ChainCalContext::create_inmemory();

        let event = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(event.next_timestamp, 500);

        let stored = ctx.repos.events.find(event.id).await;
        assert!(stored.is_some());

        let reminders = ctx.queue.get_all_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].event_id, event.id);
        assert_eq!(reminders[0].due_at, 500);
    }

    #[actix_web::main]
    #[test]
    async fn defaults_due_time_one_hour_out() {
        let ctx = ChainCalContext::create_inmemory();

        let mut uc = usecase();
        uc.next_timestamp = None;
        let before = ctx.sys.get_timestamp_millis();
        let event = execute(uc, &ctx).await.unwrap();
        let after = ctx.sys.get_timestamp_millis();

        assert!(event.next_timestamp >= before + DEFAULT_REMINDER_OFFSET_MILLIS);
        assert!(event.next_timestamp <= after + DEFAULT_REMINDER_OFFSET_MILLIS);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_contract_address() {
        let ctx = ChainCalContext::create_inmemory();

        for address in [
            "",
            "0x123",
            "1113322dB8bdd75fD25d27d13023850bE1c2B1e4aa",
            "0x1113322dB8bdd75fD25d27d13023850bE1c2B1zz",
        ] {
            let mut uc = usecase();
            uc.contract_address = address.into();
            let res = execute(uc, &ctx).await;
            assert_eq!(res.unwrap_err(), UseCaseError::InvalidContractAddress);
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_empty_event_signature() {
        let ctx = ChainCalContext::create_inmemory();

        let mut uc = usecase();
        uc.event_signature = "  ".into();
        let res = execute(uc, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidEventSignature);
    }
}
