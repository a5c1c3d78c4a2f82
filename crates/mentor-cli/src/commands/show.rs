use anyhow::Result;
use colored::Colorize;
use mentor_core::conversation::TurnRole;
use mentor_core::problem::ProblemIdentity;

use crate::context::AppContext;

pub async fn run(context: &AppContext, url: &str, include_system: bool) -> Result<()> {
    let store = context.open_store().await;
    let identity = ProblemIdentity::normalize(url);

    let Some(record) = store.get(&identity).await else {
        println!("{}", format!("No conversation stored for {}", identity).yellow());
        return Ok(());
    };

    let info = &record.problem_info;
    println!("{}", format!("=== {} ({}) ===", info.title, info.difficulty).bright_magenta().bold());
    println!("{}", format!("{} | {} turn(s)", identity, record.len()).bright_black());
    println!();

    for turn in record.turns() {
        match turn.role {
            TurnRole::System if include_system => {
                println!("{}", "[system]".bright_black());
                println!("{}", turn.content.bright_black());
            }
            TurnRole::System => continue,
            TurnRole::User => println!("{}", format!("> {}", turn.content).green()),
            TurnRole::Assistant => {
                for line in turn.content.lines() {
                    println!("{}", line.bright_blue());
                }
            }
        }
        println!();
    }

    Ok(())
}
