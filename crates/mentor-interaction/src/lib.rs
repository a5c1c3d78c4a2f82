pub mod chat_completion_agent;

pub use chat_completion_agent::ChatCompletionAgent;
