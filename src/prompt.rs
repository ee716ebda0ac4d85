//! Prompt assembly for the ticket assistant and the inference gateway.
//!
//! DESIGN
//! ======
//! The chat prompt is plain text, not a message list, because vLLM is called
//! through the completions endpoint:
//!
//! ```text
//! <system prompt>
//! [Relevant Context: numbered RAG snippets]
//! [Current Page Context: what the user is looking at]
//!
//! User Question: <message>
//!
//! Assistant Response:
//! ```
//!
//! The stop sequences keep the model from writing the next user turn.

use std::fmt::Write;

use serde_json::Value;

use crate::rag::{ContextKind, RagContext};
use crate::types::ContextInfo;

/// Stop sequences sent with every chat completion.
pub const STOP_SEQUENCES: [&str; 3] = ["User Question:", "\nUser:", "Assistant Response:"];

const ARTICLE_EXCERPT_CHARS: usize = 200;

// =============================================================================
// SYSTEM PROMPT
// =============================================================================

#[must_use]
pub fn build_system_prompt(has_page_context: bool) -> String {
    let context_bullet = if has_page_context {
        "- Provide context-aware responses based on the current page and ticket being viewed"
    } else {
        ""
    };
    format!(
        "You are an intelligent AI Ticket Assistant helping users with IT support tickets and technical issues.

Your role is to:
- Answer questions about tickets and technical issues in 2-3 sentences
- Provide helpful recommendations based on similar past tickets
- Suggest best practices for ticket resolution
- Help identify root causes and solutions
{context_bullet}

IMPORTANT: Keep responses concise (2-4 sentences). Be helpful and professional. Stop after answering the current question."
    )
}

// =============================================================================
// RAG CONTEXT
// =============================================================================

/// Render retrieved snippets as a numbered list. Empty input renders nothing.
#[must_use]
pub fn format_rag_context(contexts: &[RagContext]) -> String {
    if contexts.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\nRelevant Context:\n");
    for (index, ctx) in contexts.iter().enumerate() {
        let original = &ctx.metadata.original;
        let _ = write!(out, "\n{}. [{}] ", index + 1, ctx.metadata.label());
        match ctx.metadata.kind() {
            ContextKind::Ticket => {
                let _ = writeln!(
                    out,
                    "Ticket {}: {}",
                    field(original, "ticketId").unwrap_or_else(|| "Unknown".into()),
                    field(original, "title").unwrap_or_else(|| "No title".into()),
                );
                let _ = writeln!(
                    out,
                    "   Status: {}, Priority: {}",
                    field(original, "status").unwrap_or_else(|| "Unknown".into()),
                    field(original, "priority").unwrap_or_else(|| "Unknown".into()),
                );
                let _ = writeln!(
                    out,
                    "   Description: {}",
                    field(original, "description").unwrap_or_else(|| "No description".into()),
                );
            }
            ContextKind::KnowledgeArticle => {
                let _ = writeln!(out, "{}", field(original, "title").unwrap_or_else(|| "Knowledge Article".into()));
                let excerpt = field(original, "content")
                    .map(|content| content.chars().take(ARTICLE_EXCERPT_CHARS).collect::<String>())
                    .filter(|excerpt| !excerpt.is_empty())
                    .unwrap_or_else(|| "No content".into());
                let _ = writeln!(out, "   {excerpt}...");
            }
            ContextKind::TicketTemplate => {
                let _ = writeln!(out, "Template: {}", field(original, "name").unwrap_or_else(|| "Unknown".into()));
                let description = original
                    .get("fields")
                    .and_then(|fields| field(fields, "description"))
                    .unwrap_or_else(|| "No description".into());
                let _ = writeln!(out, "   {description}");
            }
            ContextKind::Comment | ContextKind::Other(_) => {}
        }
    }
    out
}

/// Scalar field as display text. Empty strings and nulls count as missing.
fn field(value: &Value, key: &str) -> Option<String> {
    display(value.get(key)?)
}

pub(crate) fn display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// =============================================================================
// PAGE CONTEXT
// =============================================================================

#[must_use]
pub fn format_page_context(context: Option<&ContextInfo>) -> String {
    let Some(context) = context else {
        return String::new();
    };
    let mut out = String::from("\n\nCurrent Page Context:\n");
    if let Some(page) = non_empty(context.page.as_ref()) {
        let _ = writeln!(out, "- User is viewing: {page}");
    }
    if let Some(ticket_id) = non_empty(context.ticket_id.as_ref()) {
        let _ = write!(out, "- Focused ticket: {ticket_id}");
        if let Some(title) = non_empty(context.ticket_title.as_ref()) {
            let _ = write!(out, " - {title}");
        }
        out.push('\n');
        if let Some(status) = non_empty(context.ticket_status.as_ref()) {
            let _ = writeln!(out, "  Status: {status}");
        }
        if let Some(priority) = non_empty(context.ticket_priority.as_ref()) {
            let _ = writeln!(out, "  Priority: {priority}");
        }
    }
    if let Some(column) = context
        .metadata
        .as_ref()
        .and_then(|m| m.get("kanbanColumn"))
        .and_then(display)
    {
        let _ = writeln!(out, "- Column: {column}");
    }
    out
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

// =============================================================================
// FULL PROMPTS
// =============================================================================

/// Full completion prompt for one chat question.
#[must_use]
pub fn build_chat_prompt(message: &str, rag_context: &str, context: Option<&ContextInfo>) -> String {
    let system = build_system_prompt(context.is_some());
    let page_context = format_page_context(context);
    format!("{system}\n{rag_context}{page_context}\n\nUser Question: {message}\n\nAssistant Response:")
}

/// Gateway prompt enrichment: prepend retrieved texts to the user prompt.
#[must_use]
pub fn enhance_with_context(prompt: &str, texts: &[&str]) -> String {
    if texts.is_empty() {
        return prompt.to_string();
    }
    format!(
        "I have the following context information that might be relevant:\n\n{}\n\nBased on this context, please respond to the following:\n{prompt}",
        texts.join("\n\n")
    )
}

/// Rough token estimate used when the backend reports no usage: 4 chars/token.
#[must_use]
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
