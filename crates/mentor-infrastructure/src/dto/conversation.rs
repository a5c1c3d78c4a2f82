//! Conversation DTOs and migrations

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use mentor_core::conversation::{ConversationMap, ConversationRecord, Turn, TurnRole};
use mentor_core::error::{MentorError, Result};
use mentor_core::problem::{Difficulty, ProblemIdentity, ProblemInfo};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

// ============================================================================
// Turn / ProblemInfo DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnV1 {
    pub role: TurnRole,
    pub content: String,
}

impl From<&Turn> for TurnV1 {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

impl From<TurnV1> for Turn {
    fn from(dto: TurnV1) -> Self {
        Turn::new(dto.role, dto.content)
    }
}

/// Difficulty is kept as free text so badge strings written by older builds
/// ("Unknown Difficulty") still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInfoV1 {
    pub title: String,
    pub difficulty: String,
    pub description: String,
    pub source_address: String,
    pub captured_at: DateTime<Utc>,
}

impl From<&ProblemInfo> for ProblemInfoV1 {
    fn from(info: &ProblemInfo) -> Self {
        Self {
            title: info.title.clone(),
            difficulty: info.difficulty.as_str().to_string(),
            description: info.description.clone(),
            source_address: info.source_address.clone(),
            captured_at: info.captured_at,
        }
    }
}

impl From<ProblemInfoV1> for ProblemInfo {
    fn from(dto: ProblemInfoV1) -> Self {
        ProblemInfo {
            title: dto.title,
            difficulty: Difficulty::from_badge(&dto.difficulty),
            description: dto.description,
            source_address: dto.source_address,
            captured_at: dto.captured_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecordV1 {
    pub problem_info: ProblemInfoV1,
    pub turns: Vec<TurnV1>,
}

impl From<&ConversationRecord> for ConversationRecordV1 {
    fn from(record: &ConversationRecord) -> Self {
        Self {
            problem_info: (&record.problem_info).into(),
            turns: record.turns().iter().map(TurnV1::from).collect(),
        }
    }
}

impl From<ConversationRecordV1> for ConversationRecord {
    fn from(dto: ConversationRecordV1) -> Self {
        ConversationRecord::from_parts(
            dto.problem_info.into(),
            dto.turns.into_iter().map(Turn::from).collect(),
        )
    }
}

// ============================================================================
// Documents
// ============================================================================

/// V1.0.0: versioned multi-problem mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDocumentV1 {
    pub schema_version: String,
    pub conversations: BTreeMap<String, ConversationRecordV1>,
}

impl ConversationDocumentV1 {
    pub fn from_domain(map: &ConversationMap) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            conversations: map
                .iter()
                .map(|(key, record)| (key.as_str().to_string(), record.into()))
                .collect(),
        }
    }

    /// Converts to the domain mapping, keeping stored keys verbatim.
    ///
    /// Keys are not normalized here; reconciling historical keys is the
    /// conversation store's job.
    pub fn into_domain(self) -> Result<ConversationMap> {
        let version = Version::parse(&self.schema_version).map_err(|e| MentorError::Serialization {
            format: "JSON".to_string(),
            message: format!("Invalid schema_version '{}': {}", self.schema_version, e),
        })?;
        let current = Version::parse(CURRENT_SCHEMA_VERSION)
            .map_err(|e| MentorError::internal(e.to_string()))?;

        if version.major != current.major {
            return Err(MentorError::Serialization {
                format: "JSON".to_string(),
                message: format!(
                    "Unsupported schema_version {} (this build reads {}.x)",
                    version, current.major
                ),
            });
        }

        Ok(self
            .conversations
            .into_iter()
            .map(|(key, record)| (ProblemIdentity::from_stored(key), record.into()))
            .collect())
    }
}

/// V0: single-slot layout written by the original browser popup.
///
/// ```json
/// { "lastProblemUrl": "...", "lastConversation": [...], "lastProblemDetails": {...} }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySlotV0 {
    pub last_problem_url: String,
    #[serde(default)]
    pub last_conversation: Vec<TurnV1>,
    pub last_problem_details: Option<LegacyProblemDetailsV0>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyProblemDetailsV0 {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LegacySlotV0 {
    /// Migrates the single slot into a one-entry mapping.
    ///
    /// An empty slot (no turns) migrates to an empty mapping.
    pub fn migrate(self) -> ConversationMap {
        let mut map = ConversationMap::new();
        if self.last_conversation.is_empty() {
            return map;
        }

        let problem_info = match self.last_problem_details {
            Some(details) => ProblemInfo {
                title: details.title,
                difficulty: Difficulty::from_badge(&details.difficulty),
                description: details.description,
                source_address: if details.url.is_empty() {
                    self.last_problem_url.clone()
                } else {
                    details.url
                },
                captured_at: details.timestamp.unwrap_or_else(Utc::now),
            },
            None => ProblemInfo::from_address(&self.last_problem_url),
        };

        let record = ConversationRecord::from_parts(
            problem_info,
            self.last_conversation.into_iter().map(Turn::from).collect(),
        );
        map.insert(ProblemIdentity::normalize(&self.last_problem_url), record);
        map
    }
}

/// Any document layout this build can read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredConversations {
    V1(ConversationDocumentV1),
    LegacyV0(LegacySlotV0),
}

impl StoredConversations {
    pub fn current(map: &ConversationMap) -> Self {
        Self::V1(ConversationDocumentV1::from_domain(map))
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyV0(_))
    }

    pub fn into_domain(self) -> Result<ConversationMap> {
        match self {
            Self::V1(doc) => doc.into_domain(),
            Self::LegacyV0(slot) => Ok(slot.migrate()),
        }
    }
}
