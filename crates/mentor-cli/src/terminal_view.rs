use colored::{ColoredString, Colorize};
use mentor_application::session::ERROR_TURN_PREFIX;
use mentor_core::conversation::{Turn, TurnRole};
use mentor_core::problem::{Difficulty, ProblemInfo, truncate_chars};
use mentor_core::surface::SurfaceView;
use std::sync::atomic::{AtomicBool, Ordering};

/// Characters of the description shown in the header card.
const HEADER_DESCRIPTION_CHARS: usize = 200;

/// Terminal rendering of one session.
pub struct TerminalView {
    input_enabled: AtomicBool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            input_enabled: AtomicBool::new(false),
        }
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.load(Ordering::SeqCst)
    }
}

fn paint_difficulty(difficulty: Difficulty) -> ColoredString {
    let label = difficulty.as_str();
    match difficulty {
        Difficulty::Easy => label.bright_green(),
        Difficulty::Medium => label.bright_yellow(),
        Difficulty::Hard => label.bright_red(),
        Difficulty::Unknown => label.bright_black(),
    }
}

impl SurfaceView for TerminalView {
    fn show_problem(&self, info: &ProblemInfo) {
        println!();
        println!("{}", format!("=== {} ===", info.title).bright_magenta().bold());
        println!("Difficulty: {}", paint_difficulty(info.difficulty));
        if !info.description.is_empty() {
            let excerpt = truncate_chars(&info.description, HEADER_DESCRIPTION_CHARS);
            println!("{}", excerpt.bright_black());
        }
        println!();
    }

    fn show_turn(&self, turn: &Turn) {
        match turn.role {
            TurnRole::User => println!("{}", format!("> {}", turn.content).green()),
            TurnRole::Assistant if turn.content.starts_with(ERROR_TURN_PREFIX) => {
                println!("{}", turn.content.red());
            }
            TurnRole::Assistant => {
                for line in turn.content.lines() {
                    println!("{}", line.bright_blue());
                }
            }
            TurnRole::System => {}
        }
        println!();
    }

    fn clear_transcript(&self) {
        // Keep scrollback; just mark the boundary.
        println!("{}", "-".repeat(40).bright_black());
    }

    fn set_input_enabled(&self, enabled: bool) {
        let was_enabled = self.input_enabled.swap(enabled, Ordering::SeqCst);
        if was_enabled && !enabled {
            println!("{}", "Thinking...".bright_black());
        }
    }

    fn show_error(&self, title: &str, message: &str) {
        eprintln!("{} {}", format!("{}:", title).red().bold(), message);
    }
}
