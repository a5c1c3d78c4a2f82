use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use mentor_application::{
    CredentialSource, ExtractionRetryDriver, ProblemChangeBus, ProblemChanged, PromptRenderer,
    SessionController,
};
use mentor_core::config::RetryPolicy;
use mentor_core::error::MentorError;
use mentor_core::notify::ProblemChangeNotifier;
use mentor_core::surface::SurfaceView;
use mentor_interaction::ChatCompletionAgent;

use crate::context::AppContext;
use crate::extractor::{CommandLineExtractor, PageDetails};
use crate::terminal_view::TerminalView;

const SLASH_COMMANDS: &[&str] = &["/goto", "/problem", "/help", "/quit"];

/// rustyline helper providing slash-command completion, highlighting and hints.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: SLASH_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput {
    Empty,
    Quit,
    Help,
    Problem,
    Goto(String),
    Unknown(String),
    Message(String),
}

fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return ReplInput::Quit;
    }
    if !trimmed.starts_with('/') {
        return ReplInput::Message(trimmed.to_string());
    }

    let (command, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/quit" | "/exit" => ReplInput::Quit,
        "/help" => ReplInput::Help,
        "/problem" => ReplInput::Problem,
        "/goto" if !argument.is_empty() => ReplInput::Goto(argument.to_string()),
        _ => ReplInput::Unknown(trimmed.to_string()),
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_black());
    println!("{}", "  /goto <url>   switch to another problem page".bright_black());
    println!("{}", "  /problem      show the current problem".bright_black());
    println!("{}", "  /quit         leave the session".bright_black());
}

/// Re-binds the session whenever the visible problem changes.
fn spawn_change_listener(
    controller: Arc<SessionController>,
    mut changes: broadcast::Receiver<ProblemChanged>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(event) => {
                    tracing::info!("[chat] Visible problem changed to {}", event.address);
                    if let Err(e) = controller.reacquire().await {
                        // Page errors were already shown by the view.
                        if !e.is_page_unavailable() {
                            eprintln!("{}", format!("Could not switch problem: {}", e).red());
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("[chat] Skipped {} stale problem change(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

pub async fn run(context: &AppContext, url: &str, page: PageDetails) -> Result<()> {
    let store = context.open_store().await;

    let settings = context.config.assistant.clone();
    let (api_key, source) = context.credentials().resolve(&settings.api_key_env).await;
    if source == CredentialSource::Absent {
        println!(
            "{}",
            format!(
                "No API key configured. Run `mentor credential set <key>` or set {}.",
                settings.api_key_env
            )
            .yellow()
        );
    }
    let assistant =
        Arc::new(ChatCompletionAgent::new(settings, api_key).context("Failed to create assistant client")?);

    let extractor = Arc::new(CommandLineExtractor::new(url, page));
    // A command-line page answers the same way every time, so retrying is pointless.
    let policy = RetryPolicy {
        max_attempts: 1,
        ..context.config.extraction.clone()
    };
    let view = Arc::new(TerminalView::new());

    let controller = Arc::new(
        SessionController::new(
            store,
            ExtractionRetryDriver::new(extractor.clone()),
            assistant,
            view.clone(),
        )
        .with_prompts(PromptRenderer::new(&context.config.prompt))
        .with_retry_policy(policy),
    );

    controller.start().await?;

    let bus = ProblemChangeBus::new();
    let listener = spawn_change_listener(controller.clone(), bus.subscribe());

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new()));

    println!(
        "{}",
        "Ask anything about this problem. Type '/help' for commands or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let input = parse_input(&line);
                if input != ReplInput::Empty {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match input {
                    ReplInput::Empty => continue,
                    ReplInput::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplInput::Help => print_help(),
                    ReplInput::Problem => match controller.displayed_problem().await {
                        Some(info) => view.show_problem(&info),
                        None => println!("{}", "No problem loaded yet.".yellow()),
                    },
                    ReplInput::Goto(address) => {
                        extractor.navigate(&address);
                        bus.notify_problem_changed(&address);
                    }
                    ReplInput::Unknown(command) => {
                        println!("{}", format!("Unknown command: {}", command).bright_black());
                    }
                    ReplInput::Message(text) => match controller.send_message(&text).await {
                        Ok(_) => {}
                        Err(MentorError::InputRejected { state }) => {
                            println!(
                                "{}",
                                format!("Session is {}; try again in a moment.", state).yellow()
                            );
                        }
                        Err(MentorError::SurfaceClosed) => break,
                        Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                    },
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    controller.close().await;
    drop(bus);
    let _ = listener.await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), ReplInput::Empty);
        assert_eq!(parse_input("exit"), ReplInput::Quit);
        assert_eq!(parse_input("/quit"), ReplInput::Quit);
        assert_eq!(parse_input(" what is a hash map? "), ReplInput::Message("what is a hash map?".into()));
        assert_eq!(
            parse_input("/goto  https://leetcode.com/problems/3sum "),
            ReplInput::Goto("https://leetcode.com/problems/3sum".into())
        );
        assert_eq!(parse_input("/goto"), ReplInput::Unknown("/goto".into()));
        assert_eq!(parse_input("/problem"), ReplInput::Problem);
    }
}
