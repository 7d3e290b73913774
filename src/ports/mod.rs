//! Ports - interfaces between the application core and the outside world.
//!
//! Adapters implement these traits; handlers and the session engine only
//! ever see the traits.

mod ai_provider;
mod capabilities;
mod scenario_catalog;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use capabilities::{
    CapabilityError, CounterpartGenerator, GoalClassifier, RawTurnScore, TurnScorer,
};
pub use scenario_catalog::ScenarioCatalog;
