// ABOUTME: Agent module - the session loop that answers questions with tools.
// ABOUTME: Provides AgentConfig, the system prompt, the Transcript, and the Session runner.

mod definition;
pub mod prompt;
mod runner;
mod transcript;

pub use definition::{AgentConfig, DEFAULT_LLM_TIMEOUT, DEFAULT_MAX_ITERATIONS};
pub use prompt::SYSTEM_PROMPT;
pub use runner::{AgentState, Session, TurnOutcome};
pub use transcript::Transcript;
