//! Feedback record model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Whether a feedback participant is a person or an automated agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    #[default]
    Human,
    Agent,
}

impl ParticipantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Human => "human",
            ParticipantType::Agent => "agent",
        }
    }
}

/// Someone who took part in a feedback exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ParticipantType,
}

impl Participant {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParticipantType::Human,
        }
    }
}

/// An append-only annotation on a plan.
///
/// `step` is a snapshot of the step number at creation time. It is not kept
/// in sync when steps are renumbered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// Generated identifier, also the record's file stem
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,

    /// Free-text source, e.g. `github` or `slack`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default)]
    pub participants: Vec<Participant>,

    pub created_at: Timestamp,
}
