//! Training capability adapters.
//!
//! - `LlmCapabilities` - all three capabilities over an `AIProvider`
//! - `HeuristicScorer`, `KeywordGoalClassifier` - deterministic offline stand-ins
//! - `ScriptedScorer`, `ScriptedCounterpart` - queued outputs for tests and demos

mod heuristic;
mod keyword;
mod llm;
mod scripted;

pub use heuristic::HeuristicScorer;
pub use keyword::KeywordGoalClassifier;
pub use llm::LlmCapabilities;
pub use scripted::{ScriptedCounterpart, ScriptedScorer};
