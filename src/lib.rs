//! Rehearsal room core
//!
//! UI-agnostic state for rehearsing conversations: scenarios, the session
//! transcript, mock feedback and delayed simulated replies.

pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod reply;
pub mod scenario;
pub mod session;

pub use config::{Config, Overrides, Settings};
pub use error::{RehearsalError, Result};
pub use feedback::{analyze, FeedbackRecord, FeedbackSource, RngSource, Tone};
pub use reply::ReplyScheduler;
pub use scenario::{Scenario, ScenarioStore};
pub use session::{ChatTurn, ReplyPolicy, ReplyRequest, Session, Speaker, TurnId};
