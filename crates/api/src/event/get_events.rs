use crate::error::ChainCalError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chaincal_api_structs::get_events::*;
use chaincal_domain::Event;
use chaincal_infra::ChainCalContext;

const DEFAULT_LIMIT: i64 = 50;

pub async fn get_events_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let limit = query_params.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let offset = query_params.offset.unwrap_or(0).max(0);
    let usecase = GetEventsUseCase { limit, offset };

    execute(usecase, &ctx)
        .await
        .map(|(events, total)| HttpResponse::Ok().json(APIResponse::new(events, total, limit, offset)))
        .map_err(ChainCalError::from)
}

#[derive(Debug)]
pub struct GetEventsUseCase {
    pub limit: i64,
    pub offset: i64,
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
impl UseCase for GetEventsUseCase {
    /// Newest events first plus the total row count
    type Response = (Vec<Event>, i64);

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvents";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        let events = ctx
            .repos
            .events
            .list(self.limit, self.offset)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let total = ctx
            .repos
            .events
            .count()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok((events, total))
    }
}
