use chrono::NaiveDateTime;
use serde::{ser::Serializer, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::export::{Connection, Message};

/// Relationship strength by days since the last message from a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Active,
    SomeContact,
    GoingStale,
    Dormant,
    DeepSleep,
    NeverMessaged,
}

/// Upper bound (inclusive, in days) for each dated tier, checked in order.
const TIER_THRESHOLDS: [(Tier, i64); 4] = [
    (Tier::Active, 30),
    (Tier::SomeContact, 90),
    (Tier::GoingStale, 180),
    (Tier::Dormant, 365),
];

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Active => "Active",
            Tier::SomeContact => "Some Contact",
            Tier::GoingStale => "Going Stale",
            Tier::Dormant => "Dormant",
            Tier::DeepSleep => "Deep Sleep",
            Tier::NeverMessaged => "Never Messaged",
        }
    }

    /// Tier for a contact last heard from `days_ago` days back.
    pub fn from_days(days_ago: i64) -> Self {
        TIER_THRESHOLDS
            .iter()
            .find(|(_, max)| days_ago <= *max)
            .map(|(t, _)| *t)
            .unwrap_or(Tier::DeepSleep)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredConnection {
    #[serde(flatten)]
    pub connection: Connection,
    pub tier: Tier,
    pub last_message_date: Option<NaiveDateTime>,
}

/// Tier → count, largest first. Serializes as a JSON object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct TierDistribution(pub Vec<(Tier, usize)>);

impl TierDistribution {
    pub fn get(&self, tier: Tier) -> usize {
        self.0
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

impl Serialize for TierDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(t, n)| (t.label(), n)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummary {
    pub distribution: TierDistribution,
    pub total: usize,
    pub connections: Vec<ScoredConnection>,
}

/// Latest message date per lowercased sender.
pub fn last_contact_by_sender(messages: &[Message]) -> HashMap<String, NaiveDateTime> {
    let mut latest: HashMap<String, NaiveDateTime> = HashMap::new();
    for msg in messages {
        let sender = msg.sender.trim().to_lowercase();
        let Some(date) = msg.date else { continue };
        if sender.is_empty() {
            continue;
        }
        latest
            .entry(sender)
            .and_modify(|d| {
                if date > *d {
                    *d = date;
                }
            })
            .or_insert(date);
    }
    latest
}

/// Join connections to messages by lowercase full name and assign a tier.
pub fn score_relationships(
    connections: &[Connection],
    messages: &[Message],
    now: NaiveDateTime,
) -> Vec<ScoredConnection> {
    let latest = last_contact_by_sender(messages);

    connections
        .iter()
        .map(|conn| {
            let last = latest.get(&conn.match_key()).copied();
            let tier = match last {
                Some(d) => Tier::from_days((now - d).num_days()),
                None => Tier::NeverMessaged,
            };
            ScoredConnection {
                connection: conn.clone(),
                tier,
                last_message_date: last,
            }
        })
        .collect()
}

/// Count scored connections per tier.
pub fn summarise_tiers(scored: Vec<ScoredConnection>) -> TierSummary {
    let mut order: Vec<Tier> = Vec::new();
    let mut counts: HashMap<Tier, usize> = HashMap::new();
    for s in &scored {
        let n = counts.entry(s.tier).or_insert(0);
        if *n == 0 {
            order.push(s.tier);
        }
        *n += 1;
    }

    let mut dist: Vec<(Tier, usize)> = order.into_iter().map(|t| (t, counts[&t])).collect();
    dist.sort_by(|a, b| b.1.cmp(&a.1));

    TierSummary {
        distribution: TierDistribution(dist),
        total: scored.len(),
        connections: scored,
    }
}
