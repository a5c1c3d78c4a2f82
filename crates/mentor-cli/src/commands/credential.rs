use anyhow::{Context, Result};
use colored::Colorize;
use mentor_application::CredentialSource;

use crate::context::AppContext;

pub async fn set(context: &AppContext, key: &str) -> Result<()> {
    context
        .credentials()
        .set(key)
        .await
        .context("Failed to store API key")?;
    println!("{}", "API key saved.".green());
    Ok(())
}

pub async fn clear(context: &AppContext) -> Result<()> {
    context
        .credentials()
        .clear()
        .await
        .context("Failed to clear API key")?;
    println!("{}", "Stored API key removed.".green());
    Ok(())
}

pub async fn status(context: &AppContext) {
    let env_var = &context.config.assistant.api_key_env;
    let (_, source) = context.credentials().resolve(env_var).await;
    let line = match source {
        CredentialSource::Stored => "Using the stored API key.".green(),
        CredentialSource::Environment => format!("Using the API key from ${}.", env_var).green(),
        CredentialSource::Absent => format!(
            "No API key configured. Run `mentor credential set <key>` or set ${}.",
            env_var
        )
        .yellow(),
    };
    println!("{}", line);
}
