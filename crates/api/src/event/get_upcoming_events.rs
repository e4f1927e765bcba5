use crate::error::ChainCalError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chaincal_api_structs::get_upcoming_events::*;
use chaincal_domain::Event;
use chaincal_infra::ChainCalContext;

const DEFAULT_LIMIT: i64 = 10;

pub async fn get_upcoming_events_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let usecase = GetUpcomingEventsUseCase {
        limit: query_params.limit.unwrap_or(DEFAULT_LIMIT).max(1),
    };

    execute(usecase, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(events)))
        .map_err(ChainCalError::from)
}

#[derive(Debug)]
pub struct GetUpcomingEventsUseCase {
    pub limit: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for ChainCalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUpcomingEventsUseCase {
    /// Events due at or after now, soonest first
    type Response = Vec<Event>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUpcomingEvents";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        ctx.repos
            .events
            .find_upcoming(now, self.limit)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
