//! Roleplay Trainer - practice conversations with a simulated counterpart
//!
//! A trainee works through a scenario (sales call, objection handling,
//! service de-escalation) against an AI counterpart. Every trainee turn is
//! scored against the scenario rubric, goals are ticked off as they are
//! met, and ending the session produces a report with a pass/fail verdict.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
