use anyhow::{Context, Result};
use colored::Colorize;
use mentor_application::ConversationStore;
use mentor_infrastructure::JsonConversationRepository;
use std::sync::Arc;

use crate::context::AppContext;

pub async fn run(context: &AppContext) -> Result<()> {
    // Opened without the automatic reconcile so the report covers this run.
    let repository = Arc::new(JsonConversationRepository::from_paths(&context.paths));
    let store = ConversationStore::new(repository);
    let loaded = store.load().await;

    let report = store
        .reconcile_keys()
        .await
        .context("Failed to save reconciled conversations")?;

    if !report.changed {
        println!("{}", format!("All {} key(s) already canonical.", loaded.len()).green());
        return Ok(());
    }

    for (from, to) in &report.rekeyed {
        println!("{} {} -> {}", "re-keyed".cyan(), from, to);
    }
    for merge in &report.merges {
        println!("{} {}", "merged".yellow(), merge.canonical);
        println!("    kept    {}", merge.kept);
        for dropped in &merge.dropped {
            println!("    dropped {}", dropped);
        }
    }
    println!(
        "{}",
        format!(
            "{} -> {} conversation(s).",
            loaded.len(),
            store.snapshot().await.len()
        )
        .green()
    );

    Ok(())
}
