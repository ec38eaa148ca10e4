use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use crate::classify::Keywords;
use crate::export::{Connection, Message};

const CONNECTION_BONUS: i32 = 2;
const SENIOR_BONUS: i32 = 3;
const GENUINE_BONUS: i32 = 2;
const SPAM_PENALTY: i32 = -3;
const ACTIONABLE_BONUS: i32 = 2;
const RECENCY_BONUS: i32 = 1;
const RECENT_DAYS: i64 = 90;

/// Last message of a conversation with its follow-up score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMessage {
    #[serde(flatten)]
    pub message: Message,
    pub score: i32,
    pub is_connection: bool,
    pub sender_position: String,
}

/// Score the latest dated message of every conversation and rank them,
/// highest first. Messages without a conversation id form one shared group.
pub fn rank_high_value_messages(
    messages: &[Message],
    connections: &[Connection],
    keywords: &Keywords,
    now: NaiveDateTime,
) -> Vec<RankedMessage> {
    let by_name: HashMap<String, &Connection> = connections
        .iter()
        .map(|c| (c.match_key(), c))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    // conversation id → messages, in first-seen order
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut conversations: Vec<Vec<&Message>> = Vec::new();
    for msg in messages {
        let key = msg.conversation_id.as_deref();
        let idx = *index.entry(key).or_insert_with(|| {
            conversations.push(Vec::new());
            conversations.len() - 1
        });
        conversations[idx].push(msg);
    }

    let mut ranked: Vec<RankedMessage> = conversations
        .into_iter()
        .filter_map(|conv| {
            // latest wins; among equal dates the later row wins
            let last = conv
                .into_iter()
                .filter(|m| m.date.is_some())
                .max_by_key(|m| m.date)?;
            Some(score_message(last, &by_name, keywords, now))
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

fn score_message(
    msg: &Message,
    by_name: &HashMap<String, &Connection>,
    keywords: &Keywords,
    now: NaiveDateTime,
) -> RankedMessage {
    let conn = by_name.get(&msg.sender.to_lowercase()).copied();
    let mut score = 0;

    if let Some(c) = conn {
        score += CONNECTION_BONUS;
        if keywords.is_senior(&c.position) {
            score += SENIOR_BONUS;
        }
    }

    score += if keywords.is_spam(&msg.content) {
        SPAM_PENALTY
    } else {
        GENUINE_BONUS
    };

    if keywords.is_actionable(&msg.content) {
        score += ACTIONABLE_BONUS;
    }

    if msg.date.is_some_and(|d| (now - d).num_days() <= RECENT_DAYS) {
        score += RECENCY_BONUS;
    }

    RankedMessage {
        message: msg.clone(),
        score,
        is_connection: conn.is_some(),
        sender_position: conn.map(|c| c.position.clone()).unwrap_or_default(),
    }
}
