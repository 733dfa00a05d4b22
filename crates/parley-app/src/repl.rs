//! The interactive chat loop.

use std::io::Write;

use parley_ai::{run_exchange, ChatClient, ChatMode, ConversationSession, Message, Speaker};
use parley_common::ParleyError;
use tracing::info;

use crate::input::LineSource;

const PROMPT: &str = "You: ";
const ASSISTANT_LABEL: &str = "Gemini";

const HELP: &str = "\
Commands:
  /usage    show tokens used so far
  /history  show the full conversation
  /mode     show whether earlier turns are sent with each message
  /help     show this list
  /quit     leave the chat";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Blank,
    Usage,
    History,
    Mode,
    Help,
    Quit,
    Unknown(String),
    Message(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Blank;
        }
        if !line.starts_with('/') {
            return Self::Message(line.to_string());
        }
        match line {
            "/usage" => Self::Usage,
            "/history" => Self::History,
            "/mode" => Self::Mode,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Run the chat until the user quits or input ends.
///
/// Backend failures show up as the apology and the loop continues; only a
/// broken usage counter or an output error ends it with an error.
pub async fn run_chat(
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    session: &mut ConversationSession,
    client: &mut ChatClient,
    user: &str,
) -> Result<(), ParleyError> {
    writeln!(out, "Hi {user}. Type /help for commands.")?;

    while let Some(line) = input.read_line(PROMPT)? {
        match ReplCommand::parse(&line) {
            ReplCommand::Blank => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Usage => writeln!(out, "Tokens used: {}", session.usage_total())?,
            ReplCommand::History => write!(out, "{}", format_history(session.transcript()))?,
            ReplCommand::Mode => writeln!(out, "Mode: {}", mode_name(client.mode()))?,
            ReplCommand::Unknown(command) => {
                writeln!(out, "Unknown command {command}. Type /help for commands.")?
            }
            ReplCommand::Message(text) => {
                if let Some(outcome) = run_exchange(session, client, &text).await? {
                    writeln!(out, "{ASSISTANT_LABEL}: {}", outcome.reply)?;
                    writeln!(out, "[tokens: {}]", session.usage_total())?;
                }
            }
        }
        out.flush()?;
    }

    info!(
        session = %session.id().short(),
        turns = session.len(),
        tokens = session.usage_total(),
        "chat ended"
    );
    writeln!(out, "Goodbye.")?;
    Ok(())
}

fn format_history(transcript: &[Message]) -> String {
    if transcript.is_empty() {
        return "No messages yet.\n".to_string();
    }
    let mut text = String::new();
    for message in transcript {
        let label = match message.speaker {
            Speaker::User => "You",
            Speaker::Assistant => ASSISTANT_LABEL,
        };
        text.push_str(label);
        text.push_str(": ");
        text.push_str(&message.text);
        text.push('\n');
    }
    text
}

fn mode_name(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Stateful => "stateful",
        ChatMode::Stateless => "stateless",
    }
}
