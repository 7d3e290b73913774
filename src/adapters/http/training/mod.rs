//! HTTP adapter for training sessions and the scenario catalog.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, ScenarioListResponse, StartSessionRequest, SubmitTurnRequest};
pub use handlers::TrainingHandlers;
pub use routes::training_routes;
