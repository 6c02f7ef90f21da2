//! Command-line client for run-protocol servers.

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::agents::{DATE_AGENT_NAME, ROUTER_AGENT_NAME};
use crate::client::RunClient;
use crate::error::{BridgeError, Result};

const MENU_PROMPT: &str = "1) ask-anything  2) dateAgent  3) named agent  q) quit: ";

/// Talk to agents on a run-protocol (ACP) server.
#[derive(Parser, Debug)]
#[command(name = "agent-bridge", version, about = "Run-protocol (ACP) client")]
pub struct Cli {
    /// Run-protocol base URL, e.g. http://127.0.0.1:8002 or .../acp
    #[arg(long, visible_alias = "acp-url")]
    pub url: Option<String>,

    /// Explicit agent to call
    #[arg(long)]
    pub agent_name: Option<String>,

    /// Call the date agent (no input)
    #[arg(long)]
    pub date: bool,

    /// Send MESSAGE to the default `agent`
    #[arg(long, value_name = "MESSAGE")]
    pub agent: Option<String>,

    /// Message for an auto-selected agent (or input for --agent-name)
    pub message: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Named { agent: String, text: Option<String> },
    AskAnything { text: String },
    Interactive,
}

impl Cli {
    /// Resolve flags to an action. Earlier rules win.
    pub fn action(&self) -> Action {
        let agent_name = self.agent_name.as_deref().filter(|n| !n.is_empty());
        let message = self.message.as_deref().filter(|m| !m.is_empty());

        if self.date {
            return Action::Named {
                agent: DATE_AGENT_NAME.to_string(),
                text: None,
            };
        }
        if let (Some(text), None) = (&self.agent, agent_name) {
            return Action::Named {
                agent: ROUTER_AGENT_NAME.to_string(),
                text: Some(text.clone()),
            };
        }
        if let Some(name) = agent_name {
            return Action::Named {
                agent: name.to_string(),
                text: self.message.clone().or_else(|| self.agent.clone()),
            };
        }
        if let Some(text) = message {
            return Action::AskAnything {
                text: text.to_string(),
            };
        }
        Action::Interactive
    }
}

/// Run a single-shot action and return the line to print.
///
/// An unknown agent is reported as output, not as a failure.
pub async fn execute(client: &RunClient, action: &Action) -> Result<String> {
    let result = match action {
        Action::Named { agent, text } => client.call_named(agent, text.as_deref()).await,
        Action::AskAnything { text } => client.ask_anything(text).await,
        Action::Interactive => {
            return Err(BridgeError::InvalidArgument(
                "interactive mode has no single result".into(),
            ))
        }
    };
    match result {
        Err(e @ BridgeError::AgentNotFound { .. }) => Ok(e.to_string()),
        other => other,
    }
}

/// Menu loop. Failed operations are reported and the loop continues.
pub async fn run_interactive(client: &RunClient) -> Result<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| BridgeError::Configuration(format!("terminal unavailable: {e}")))?;
    println!("ACP interactive mode (q to quit).");

    loop {
        let Some(choice) = read_line(&mut editor, MENU_PROMPT) else {
            break;
        };
        let action = match choice.trim().to_lowercase().as_str() {
            "1" => {
                let Some(text) = read_line(&mut editor, "message: ") else {
                    break;
                };
                Action::AskAnything { text }
            }
            "2" => Action::Named {
                agent: DATE_AGENT_NAME.to_string(),
                text: None,
            },
            "3" => {
                let Some(agent) = read_line(&mut editor, "agent name: ") else {
                    break;
                };
                let Some(text) = read_line(&mut editor, "message (empty for none): ") else {
                    break;
                };
                let text = text.trim().to_string();
                Action::Named {
                    agent: agent.trim().to_string(),
                    text: (!text.is_empty()).then_some(text),
                }
            }
            c if c.starts_with('q') => break,
            _ => {
                println!("invalid; try again");
                continue;
            }
        };

        match execute(client, &action).await {
            Ok(line) => println!("{line}"),
            Err(e) => println!("Error: {e}"),
        }
    }

    println!("bye");
    Ok(())
}

/// `None` on Ctrl-C, Ctrl-D, or a terminal error.
fn read_line(editor: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match editor.readline(prompt) {
        Ok(line) => {
            let _ = editor.add_history_entry(line.as_str());
            Some(line)
        }
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Reading from terminal failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("agent-bridge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn date_flag_wins() {
        assert_eq!(
            parse(&["--date", "--agent", "hi", "msg"]).action(),
            Action::Named { agent: "dateAgent".into(), text: None }
        );
    }

    #[test]
    fn agent_shortcut_targets_router_agent() {
        assert_eq!(
            parse(&["--agent", "What is AAPL"]).action(),
            Action::Named { agent: "agent".into(), text: Some("What is AAPL".into()) }
        );
    }

    #[test]
    fn agent_name_takes_positional_then_agent_text() {
        assert_eq!(
            parse(&["--agent-name", "echo", "hello"]).action(),
            Action::Named { agent: "echo".into(), text: Some("hello".into()) }
        );
        assert_eq!(
            parse(&["--agent-name", "echo", "--agent", "from flag"]).action(),
            Action::Named { agent: "echo".into(), text: Some("from flag".into()) }
        );
        assert_eq!(
            parse(&["--agent-name", "dateAgent"]).action(),
            Action::Named { agent: "dateAgent".into(), text: None }
        );
    }

    #[test]
    fn bare_message_auto_selects() {
        assert_eq!(
            parse(&["hello there"]).action(),
            Action::AskAnything { text: "hello there".into() }
        );
    }

    #[test]
    fn nothing_means_interactive() {
        assert_eq!(parse(&[]).action(), Action::Interactive);
        assert_eq!(parse(&["-v", "--url", "http://x"]).action(), Action::Interactive);
    }

    #[test]
    fn acp_url_alias_is_accepted() {
        assert_eq!(parse(&["--acp-url", "http://h:1/acp"]).url.as_deref(), Some("http://h:1/acp"));
    }
}
