// ABOUTME: Hook system for observing the agent's turn lifecycle.
// ABOUTME: Provides events and a registry that fans them out to observers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::tool::{ToolCall, ToolResult};

/// Events fired while a user turn is processed.
#[derive(Debug, Clone)]
pub enum HookEvent {
    /// Fired when a question is accepted.
    TurnStart { question: String },

    /// Fired at the start of each reasoning step (1-based).
    Iteration { iteration: usize },

    /// Fired after each LLM response is received.
    ResponseReceived {
        text: String,
        tool_calls: Vec<ToolCall>,
    },

    /// Fired before a tool call is dispatched. `index` counts calls within the turn, from 1.
    PreToolUse { index: usize, call: ToolCall },

    /// Fired after a tool call completes.
    PostToolUse {
        index: usize,
        call: ToolCall,
        result: ToolResult,
    },

    /// Fired when the turn ends, successfully or not.
    TurnEnd {
        iterations: usize,
        error: Option<String>,
    },
}

impl HookEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HookEvent::TurnStart { .. } => "TurnStart",
            HookEvent::Iteration { .. } => "Iteration",
            HookEvent::ResponseReceived { .. } => "ResponseReceived",
            HookEvent::PreToolUse { .. } => "PreToolUse",
            HookEvent::PostToolUse { .. } => "PostToolUse",
            HookEvent::TurnEnd { .. } => "TurnEnd",
        }
    }
}

/// Trait for implementing hooks. Hooks observe; they cannot alter dispatch.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Called when an event occurs. Errors are logged and otherwise ignored.
    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error>;

    /// Optional: Filter which events this hook cares about.
    /// Default returns true for all events.
    fn accepts(&self, event: &HookEvent) -> bool {
        let _ = event;
        true
    }
}

/// Registry for managing and firing hooks.
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn Hook>>>,
}

impl HookRegistry {
    /// Create a new empty hook registry.
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Register a hook.
    pub async fn register(&self, hook: impl Hook + 'static) {
        self.hooks.write().await.push(Arc::new(hook));
    }

    /// Register a hook wrapped in Arc.
    pub async fn register_arc(&self, hook: Arc<dyn Hook>) {
        self.hooks.write().await.push(hook);
    }

    /// Deliver an event to every accepting hook, in registration order.
    pub async fn fire(&self, event: &HookEvent) {
        let hooks = self.hooks.read().await;
        for hook in hooks.iter() {
            if !hook.accepts(event) {
                continue;
            }
            if let Err(e) = hook.on_event(event).await {
                tracing::warn!("Hook failed on {}: {}", event.kind(), e);
            }
        }
    }

    /// Register a closure that only sees PostToolUse events.
    ///
    /// The callback receives (index, call, result).
    pub async fn on_tool_result<F>(&self, f: F)
    where
        F: Fn(usize, &ToolCall, &ToolResult) + Send + Sync + 'static,
    {
        self.register(ToolResultHook { callback: f }).await;
    }

    /// Get the number of registered hooks.
    pub async fn len(&self) -> usize {
        self.hooks.read().await.len()
    }

    /// Check if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.hooks.read().await.is_empty()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook wrapper for PostToolUse events.
struct ToolResultHook<F> {
    callback: F,
}

#[async_trait]
impl<F> Hook for ToolResultHook<F>
where
    F: Fn(usize, &ToolCall, &ToolResult) + Send + Sync,
{
    fn accepts(&self, event: &HookEvent) -> bool {
        matches!(event, HookEvent::PostToolUse { .. })
    }

    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error> {
        if let HookEvent::PostToolUse {
            index,
            call,
            result,
        } = event
        {
            (self.callback)(*index, call, result);
        }
        Ok(())
    }
}
