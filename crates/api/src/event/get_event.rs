use crate::error::ChainCalError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chaincal_api_structs::get_event::*;
use chaincal_domain::Event;
use chaincal_infra::ChainCalContext;

pub async fn get_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<ChainCalContext>,
) -> Result<HttpResponse, ChainCalError> {
    let usecase = GetEventUseCase {
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(ChainCalError::from)
}

#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(i64),
}

impl From<UseCaseError> for ChainCalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvent";

    async fn execute(&mut self, ctx: &ChainCalContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find(self.event_id)
            .await
            .ok_or(UseCaseError::NotFound(self.event_id))
    }
}
