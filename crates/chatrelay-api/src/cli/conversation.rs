//! Conversation subcommands: chat, history, clear.
//!
//! These run against the same store and provider as the server, so a
//! conversation started in the browser can be continued from the terminal.

use anyhow::Result;
use console::style;

use chatrelay_core::chat::orchestrator::ChatReply;
use chatrelay_types::chat::{ConversationId, Turn, TurnRole};

use crate::state::AppState;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
    /// Nothing on success; errors still surface through the exit path.
    Quiet,
}

impl Output {
    /// `--json` wins over `--quiet`: asking for JSON means asking for output.
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else if quiet {
            Self::Quiet
        } else {
            Self::Text
        }
    }
}

/// `chatrelay chat <conversation> <message>`
pub async fn chat(state: &AppState, conversation: &str, message: &str, output: Output) -> Result<()> {
    let id = ConversationId::from(conversation);
    let reply = state.orchestrator.chat(&id, message).await?;
    emit(format_reply(&reply, output)?);
    Ok(())
}

/// `chatrelay history <conversation>`
pub async fn history(state: &AppState, conversation: &str, output: Output) -> Result<()> {
    let id = ConversationId::from(conversation);
    let messages = state.orchestrator.history(&id).await?;
    emit(format_history(conversation, &messages, output)?);
    Ok(())
}

/// `chatrelay clear <conversation>`
pub async fn clear(state: &AppState, conversation: &str, output: Output) -> Result<()> {
    let id = ConversationId::from(conversation);
    state.orchestrator.clear(&id).await?;
    emit(format_cleared(conversation, output));
    Ok(())
}

fn emit(text: Option<String>) {
    if let Some(text) = text {
        println!("{text}");
    }
}

fn format_reply(reply: &ChatReply, output: Output) -> Result<Option<String>> {
    Ok(match output {
        Output::Quiet => None,
        Output::Json => Some(serde_json::to_string_pretty(reply)?),
        Output::Text => Some(format!(
            "\n  {} {}\n",
            style("assistant").magenta().bold(),
            reply.response
        )),
    })
}

fn format_history(conversation: &str, messages: &[Turn], output: Output) -> Result<Option<String>> {
    match output {
        Output::Quiet => Ok(None),
        Output::Json => Ok(Some(serde_json::to_string_pretty(
            &serde_json::json!({ "messages": messages }),
        )?)),
        Output::Text if messages.is_empty() => Ok(Some(format!(
            "  {} No messages in '{}'",
            style("∅").dim(),
            style(conversation).cyan()
        ))),
        Output::Text => {
            let mut lines = vec![String::new()];
            lines.extend(messages.iter().map(render_turn));
            lines.push(String::new());
            lines.push(format!(
                "  {}",
                style(format!("{} message(s) in '{conversation}'", messages.len())).dim()
            ));
            Ok(Some(lines.join("\n")))
        }
    }
}

fn format_cleared(conversation: &str, output: Output) -> Option<String> {
    match output {
        Output::Quiet => None,
        Output::Json => Some(serde_json::json!({ "success": true }).to_string()),
        Output::Text => Some(format!(
            "  {} Cleared '{}'",
            style("✓").green().bold(),
            style(conversation).cyan()
        )),
    }
}

fn render_turn(turn: &Turn) -> String {
    let who = match turn.role {
        TurnRole::User => style("user").cyan().bold(),
        TurnRole::Assistant => style("assistant").magenta().bold(),
    };
    let when = turn.timestamp.format("%Y-%m-%d %H:%M:%S");
    format!("  {} {} {}", style(when).dim(), who, turn.content)
}
