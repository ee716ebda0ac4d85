//! Wire DTOs shared by the dashboard routes.
//!
//! Field names follow what the dashboard sends and reads: camelCase for the
//! chat and gateway payloads, snake_case for the agent trace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;

// =============================================================================
// CHAT
// =============================================================================

/// `POST /api/chat-vllm` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub context: Option<ContextInfo>,
    /// Full focused ticket; its fields back-fill `context`.
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

impl ChatRequest {
    /// Page context with the focused ticket folded in.
    #[must_use]
    pub fn effective_context(&self) -> Option<ContextInfo> {
        match (&self.context, &self.ticket) {
            (context, None) => context.clone(),
            (context, Some(ticket)) => Some(context.clone().unwrap_or_default().merge_ticket(ticket)),
        }
    }
}

fn default_max_tokens() -> u32 {
    DEFAULT_CHAT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_CHAT_TEMPERATURE
}

/// What the user is looking at when they ask a question.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContextInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl ContextInfo {
    /// Fill ticket fields the dashboard left out from the focused ticket.
    #[must_use]
    pub fn merge_ticket(mut self, ticket: &Ticket) -> Self {
        self.ticket_id.get_or_insert_with(|| ticket.id.clone());
        self.ticket_title.get_or_insert_with(|| ticket.title.clone());
        self.ticket_status.get_or_insert_with(|| ticket.status.as_str().to_string());
        self.ticket_priority.get_or_insert_with(|| ticket.priority.as_str().to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// `POST /api/chat-vllm` success body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub success: bool,
    pub text: String,
    pub has_context: bool,
    pub usage: Usage,
}

// =============================================================================
// TICKETS
// =============================================================================

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A support ticket as shown on the dashboard. Never persisted here.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// =============================================================================
// RAN AGENT
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    Reasoning,
    Action,
    FinalAnswer,
}

/// One entry of the displayed agent trace.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AgentStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    pub step_number: u32,
}

/// `POST /api/ran-agent` success body.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AgentReply {
    pub success: bool,
    pub answer: String,
    pub steps: Vec<AgentStep>,
    pub retrieved_data: Value,
}

/// Builds an agent trace with sequential step numbers.
#[derive(Debug, Default)]
pub struct StepLog {
    steps: Vec<AgentStep>,
}

impl StepLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reasoning(self, action: impl Into<String>) -> Self {
        self.push(StepKind::Reasoning, action.into(), None)
    }

    #[must_use]
    pub fn action(self, action: impl Into<String>, observation: impl Into<String>) -> Self {
        self.push(StepKind::Action, action.into(), Some(observation.into()))
    }

    #[must_use]
    pub fn final_answer(self, action: impl Into<String>) -> Self {
        self.push(StepKind::FinalAnswer, action.into(), None)
    }

    fn push(mut self, kind: StepKind, action: String, observation: Option<String>) -> Self {
        let step_number = u32::try_from(self.steps.len() + 1).unwrap_or(u32::MAX);
        self.steps.push(AgentStep { kind, action, observation, step_number });
        self
    }

    #[must_use]
    pub fn finish(self) -> Vec<AgentStep> {
        self.steps
    }
}

// =============================================================================
// INFERENCE GATEWAY
// =============================================================================

/// `POST /api/inference` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GenerationResponse {
    pub text: String,
    pub usage: Usage,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
