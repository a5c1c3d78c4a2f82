//! Secret file DTO

use serde::{Deserialize, Serialize};

/// Contents of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretFileV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}
