mod event;
mod status;
mod webhook;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::webhook::dtos::*;
}

pub use crate::event::api::*;
pub use crate::status::api::*;
pub use crate::webhook::api::*;
