// src/export/types.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of `Connections.csv`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub connected_on: Option<NaiveDateTime>,
    pub email_address: String,
}

impl Connection {
    /// `"First Last"` with surrounding whitespace removed. Not unique.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Lowercased full name, the key used to join against messages.
    pub fn match_key(&self) -> String {
        self.full_name().to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub conversation_id: Option<String>,
    pub sender: String,
    pub date: Option<NaiveDateTime>,
    pub subject: String,
    pub content: String,
}

impl Message {
    /// Content if present, otherwise the subject line.
    pub fn body(&self) -> &str {
        if self.content.is_empty() {
            &self.subject
        } else {
            &self.content
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    #[default]
    Outbound,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invitation {
    pub from_name: String,
    pub to_name: String,
    pub date: Option<NaiveDateTime>,
    pub direction: Direction,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFollow {
    pub company: String,
    pub followed_on: Option<NaiveDateTime>,
}

/// LinkedIn's ad-inference rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inference {
    pub category: String,
    pub inference: String,
    pub description: String,
}

/// Normalized column name → list of values.
pub type AdTargeting = BTreeMap<String, Vec<String>>;

/// Everything parsed out of one export folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Export {
    pub connections: Vec<Connection>,
    pub messages: Vec<Message>,
    pub invitations: Vec<Invitation>,
    pub company_follows: Vec<CompanyFollow>,
    pub inferences: Vec<Inference>,
    pub ad_targeting: AdTargeting,
}

impl Export {
    /// Record counts per kind, for logging.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("connections", self.connections.len()),
            ("messages", self.messages.len()),
            ("invitations", self.invitations.len()),
            ("company_follows", self.company_follows.len()),
            ("inferences", self.inferences.len()),
            ("ad_targeting", self.ad_targeting.len()),
        ])
    }
}
