use super::subscribers::SyncReminderOnEventSnoozed;
use crate::error::ChainCalError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chaincal_api_structs::snooze_event::*;
use chaincal_domain::Event;
use chaincal_infra::ChainCalContext;

/// A reminder can be pushed at most 24 hours at a time
const MAX_SNOOZE_MILLIS: i64 = 1000 * 60 * 60 * 24;

pub async fn snooze_event_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let usecase = SnoozeEventUseCase {
        event_id: path_params.event_id,
        duration_millis: body.duration_millis,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(ChainCalError::from)
}

#[derive(Debug)]
pub struct SnoozeEventUseCase {
    pub event_id: i64,
    pub duration_millis: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidDuration,
    NotFound(i64),
    StorageError,
}

impl From<UseCaseError> for ChainCalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidDuration => Self::BadClientData(format!(
                "Snooze duration must be between 1 and {} millis",
                MAX_SNOOZE_MILLIS
            )),
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SnoozeEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "SnoozeEvent";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        if self.duration_millis < 1 || self.duration_millis > MAX_SNOOZE_MILLIS {
            return Err(UseCaseError::InvalidDuration);
        }

        let now = ctx.sys.get_timestamp_millis();
        let next_timestamp = now + self.duration_millis;

        match ctx
            .repos
            .events
            .set_next_timestamp(self.event_id, next_timestamp, now)
            .await
        {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncReminderOnEventSnoozed)]
    }
}
