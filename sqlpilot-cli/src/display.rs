// ABOUTME: Console output for a turn - numbered tool calls and result previews.
// ABOUTME: Implemented as a Hook so the session loop stays free of printing.

use async_trait::async_trait;
use sqlpilot::hook::{Hook, HookEvent};

const PREVIEW_CHARS: usize = 500;

/// Prints tool activity to stdout as the agent works.
pub struct ConsoleHook {
    show_results: bool,
}

impl ConsoleHook {
    pub fn new(show_results: bool) -> Self {
        Self {
            show_results,
        }
    }
}

#[async_trait]
impl Hook for ConsoleHook {
    fn accepts(&self, event: &HookEvent) -> bool {
        matches!(
            event,
            HookEvent::PreToolUse { .. } | HookEvent::PostToolUse { .. }
        )
    }

    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error> {
        match event {
            HookEvent::PreToolUse { index, call } => {
                println!("\nTool Call #{}: {}", index, call.name);
                println!("Input: {}", serde_json::to_string_pretty(&call.arguments)?);
            }
            HookEvent::PostToolUse { result, .. } if self.show_results => {
                let label = if result.is_error { "Error" } else { "Result" };
                println!("{}: {}", label, preview(&result.content));
            }
            _ => {}
        }
        Ok(())
    }
}

/// First `PREVIEW_CHARS` characters of `text`, marked when cut.
pub fn preview(text: &str) -> String {
    let total = text.chars().count();
    if total <= PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}... [truncated, {} chars total]", head, total)
}
