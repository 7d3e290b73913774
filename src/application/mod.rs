//! Application layer - session engine, commands, queries and handlers.
//!
//! This layer orchestrates the training domain and coordinates the
//! capability ports. Commands (start, submit, end, reset) and queries
//! (get, list) are kept in separate handlers.

pub mod engine;
pub mod handlers;

pub use engine::{Capabilities, EngineSettings, SessionEngine, SessionRegistry};
pub use handlers::training::{
    DeleteSessionCommand, DeleteSessionHandler, EndSessionCommand, EndSessionHandler,
    GetSessionHandler, GetSessionQuery,
    ListScenariosHandler, ResetSessionCommand, ResetSessionHandler, StartSessionCommand,
    StartSessionHandler, SubmitTurnCommand, SubmitTurnHandler,
};
