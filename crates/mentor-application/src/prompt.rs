//! Prompt rendering for new conversations.
//!
//! The system turn carries the tutoring contract and a bounded excerpt of the
//! problem description. The welcome turn is the first visible assistant turn.

use mentor_core::config::PromptSettings;
use mentor_core::error::{MentorError, Result};
use mentor_core::problem::{ProblemInfo, truncate_chars};
use minijinja::{Environment, context};

const SYSTEM_PROMPT_TEMPLATE: &str = "\
You are an expert coding mentor for LeetCode problems. Your goal is to guide students to understand and solve problems independently.

STRICT RULES:
1. NEVER provide complete code solutions
2. Ask probing questions to guide thinking
3. Suggest approaches and algorithms, not implementations
4. Point out edge cases and complexity considerations
5. Explain concepts and techniques
6. Help break down problems into smaller parts
7. Stay on the current problem; steer unrelated questions back to it

Current Problem: {{ title }} ({{ difficulty }})
URL: {{ url }}
Description: {{ excerpt }}

Be encouraging, educational, and guide them to discover the solution themselves!";

const WELCOME_TEMPLATE: &str = "\
Great! I can see you're working on **{{ title }}** ({{ difficulty }}).

I'm here to help you understand and solve this problem step by step! I can assist with:

- **Understanding the problem requirements**
- **Brainstorming solution approaches**
- **Identifying edge cases**
- **Analyzing time/space complexity**
- **Explaining algorithms and data structures**

What would you like to explore first? Feel free to ask me anything about this problem!";

/// Renders the system and welcome turns for a problem.
pub struct PromptRenderer {
    env: Environment<'static>,
    excerpt_chars: usize,
    welcome_template: Option<String>,
}

impl PromptRenderer {
    pub fn new(settings: &PromptSettings) -> Self {
        Self {
            env: Environment::new(),
            excerpt_chars: settings.description_excerpt_chars,
            welcome_template: settings.welcome_template.clone(),
        }
    }

    /// Tutoring contract sent as the system turn.
    pub fn system_prompt(&self, info: &ProblemInfo) -> Result<String> {
        let excerpt = truncate_chars(&info.description, self.excerpt_chars);
        self.render(
            SYSTEM_PROMPT_TEMPLATE,
            context! {
                title => info.title,
                difficulty => info.difficulty.as_str(),
                url => info.source_address,
                excerpt => excerpt,
            },
        )
    }

    /// Greeting shown as the first assistant turn.
    pub fn welcome(&self, info: &ProblemInfo) -> Result<String> {
        let template = self.welcome_template.as_deref().unwrap_or(WELCOME_TEMPLATE);
        self.render(
            template,
            context! {
                title => info.title,
                difficulty => info.difficulty.as_str(),
            },
        )
    }

    fn render(&self, template: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .render_str(template, ctx)
            .map_err(|e| MentorError::internal(format!("Failed to render prompt: {}", e)))
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new(&PromptSettings::default())
    }
}
