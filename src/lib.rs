// ABOUTME: Root module for sqlpilot - a guarded natural-language SQL agent.
// ABOUTME: Re-exports all public types from submodules.

pub mod agent;
pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod guard;
pub mod hook;
pub mod llm;
pub mod prelude;
pub mod schema;
pub mod tool;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SqlPilotError;
