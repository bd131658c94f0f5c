// ABOUTME: Session runner - drives the reason/act loop for one conversation.
// ABOUTME: Dispatches tool calls in order, caps iterations, and commits turns atomically.

use std::sync::Arc;

use uuid::Uuid;

use super::definition::AgentConfig;
use super::transcript::Transcript;
use crate::error::{AgentError, LlmError};
use crate::hook::{HookEvent, HookRegistry};
use crate::llm::{ContentBlock, LlmClient, Message, Request, Role, Usage};
use crate::tool::{Registry, ToolCall};

/// Where a session is in its reason/act cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    AwaitingUserInput,
    Reasoning,
    ToolCallPending,
    FinalAnswerReady,
}

/// Result of one successfully answered user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Final natural-language answer.
    pub answer: String,

    /// Every tool call dispatched during the turn, in order.
    pub tool_calls: Vec<ToolCall>,

    /// Number of LLM calls made.
    pub iterations: usize,

    /// Token usage for this turn.
    pub usage: Usage,
}

/// One conversation with the agent. Owns its transcript exclusively.
pub struct Session {
    id: String,
    config: AgentConfig,
    client: Arc<dyn LlmClient>,
    tools: Registry,
    hooks: Arc<HookRegistry>,
    transcript: Transcript,
    state: AgentState,
    usage: Usage,
}

impl Session {
    pub fn new(config: AgentConfig, client: Arc<dyn LlmClient>, tools: Registry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            client,
            tools,
            hooks: Arc::new(HookRegistry::new()),
            transcript: Transcript::new(),
            state: AgentState::AwaitingUserInput,
            usage: Usage::default(),
        }
    }

    /// Observe turn events with the given hooks.
    pub fn with_hooks(mut self, hooks: Arc<HookRegistry>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Token usage across all turns of this session.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Answer one user question.
    ///
    /// The turn's messages reach the transcript only when it succeeds. A failed
    /// turn records the question and a notice of the failure instead, and the
    /// session is ready for the next question either way.
    pub async fn ask(&mut self, question: &str) -> Result<TurnOutcome, AgentError> {
        tracing::info!(session = %self.id, "Turn started");
        self.hooks
            .fire(&HookEvent::TurnStart {
                question: question.to_string(),
            })
            .await;

        let mut staged = vec![Message::user(question)];
        let result = self.run_turn(&mut staged).await;

        let (iterations, error) = match &result {
            Ok(outcome) => {
                self.transcript.extend(staged);
                self.usage.accumulate(&outcome.usage);
                tracing::info!(
                    session = %self.id,
                    iterations = outcome.iterations,
                    tool_calls = outcome.tool_calls.len(),
                    "Turn completed"
                );
                (outcome.iterations, None)
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "Turn failed: {}", e);
                self.transcript.push(Message::user(question));
                self.transcript
                    .push(Message::assistant(format!("[This turn failed: {}]", e)));
                (0, Some(e.to_string()))
            }
        };

        self.state = AgentState::AwaitingUserInput;
        self.hooks
            .fire(&HookEvent::TurnEnd { iterations, error })
            .await;

        result
    }

    async fn run_turn(&mut self, staged: &mut Vec<Message>) -> Result<TurnOutcome, AgentError> {
        let limit = self.config.max_iterations;
        let definitions = self.tools.to_definitions().await;
        let mut usage = Usage::default();
        let mut dispatched = Vec::new();

        for iteration in 1..=limit {
            self.state = AgentState::Reasoning;
            tracing::debug!(session = %self.id, iteration, "Reasoning");
            self.hooks.fire(&HookEvent::Iteration { iteration }).await;

            let mut request = Request::new(&self.config.model)
                .system(&self.config.system_prompt)
                .messages(self.transcript.messages().iter().cloned())
                .messages(staged.iter().cloned())
                .tools(definitions.clone())
                .temperature(self.config.temperature);
            if let Some(max_tokens) = self.config.max_tokens {
                request = request.max_tokens(max_tokens);
            }

            let timeout = self.config.llm_timeout;
            let response =
                match tokio::time::timeout(timeout, self.client.create_message(&request)).await {
                    Ok(response) => response?,
                    Err(_) => return Err(LlmError::Timeout(timeout).into()),
                };
            usage.accumulate(&response.usage);

            let calls = response.tool_calls();
            self.hooks
                .fire(&HookEvent::ResponseReceived {
                    text: response.text(),
                    tool_calls: calls.clone(),
                })
                .await;

            if calls.is_empty() {
                self.state = AgentState::FinalAnswerReady;
                let answer = response.text();
                staged.push(Message::assistant(answer.clone()));
                return Ok(TurnOutcome {
                    answer,
                    tool_calls: dispatched,
                    iterations: iteration,
                    usage,
                });
            }

            if iteration == limit {
                break;
            }

            self.state = AgentState::ToolCallPending;
            staged.push(Message {
                role: Role::Assistant,
                content: response.content,
            });

            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                let index = dispatched.len() + 1;
                tracing::debug!(tool = %call.name, index, "Dispatching tool call");
                self.hooks
                    .fire(&HookEvent::PreToolUse {
                        index,
                        call: call.clone(),
                    })
                    .await;

                let result = self.tools.dispatch(&call).await;

                results.push(if result.is_error {
                    ContentBlock::tool_error(&call.id, &result.content)
                } else {
                    ContentBlock::tool_result(&call.id, &result.content)
                });
                self.hooks
                    .fire(&HookEvent::PostToolUse {
                        index,
                        call: call.clone(),
                        result,
                    })
                    .await;
                dispatched.push(call);
            }
            staged.push(Message::tool_results(results));
        }

        tracing::warn!(session = %self.id, limit, "Iteration cap reached");
        Err(AgentError::MaxIterationsExceeded { limit })
    }
}
