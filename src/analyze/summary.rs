use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

use crate::export::{Direction, Export};

const DAYS_PER_YEAR: f64 = 365.25;

/// Headline numbers for the summary page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_connections: usize,
    pub total_messages: usize,
    pub total_conversations: usize,
    pub orphan_messages: usize,
    pub total_invitations: usize,
    pub inbound_invitations: usize,
    pub outbound_invitations: usize,
    pub total_company_follows: usize,
    pub total_inferences: usize,
    pub unique_companies: usize,
    pub ad_interests: usize,
    pub ad_skills: usize,
    pub earliest_connection: Option<NaiveDateTime>,
    pub latest_connection: Option<NaiveDateTime>,
    pub network_span_years: Option<f64>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn summary_stats(export: &Export) -> SummaryStats {
    let dates = export.connections.iter().filter_map(|c| c.connected_on);
    let earliest = dates.clone().min();
    let latest = dates.max();

    let unique_companies: HashSet<&str> = export
        .connections
        .iter()
        .map(|c| c.company.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let conversations: HashSet<&str> = export
        .messages
        .iter()
        .filter_map(|m| m.conversation_id.as_deref())
        .collect();

    let count_dir = |dir: Direction| {
        export
            .invitations
            .iter()
            .filter(|i| i.direction == dir)
            .count()
    };
    let ad_len = |key: &str| export.ad_targeting.get(key).map_or(0, Vec::len);

    SummaryStats {
        total_connections: export.connections.len(),
        total_messages: export.messages.len(),
        total_conversations: conversations.len(),
        orphan_messages: export
            .messages
            .iter()
            .filter(|m| m.conversation_id.is_none())
            .count(),
        total_invitations: export.invitations.len(),
        inbound_invitations: count_dir(Direction::Inbound),
        outbound_invitations: count_dir(Direction::Outbound),
        total_company_follows: export.company_follows.len(),
        total_inferences: export.inferences.len(),
        unique_companies: unique_companies.len(),
        ad_interests: ad_len("interests"),
        ad_skills: ad_len("skills"),
        earliest_connection: earliest,
        latest_connection: latest,
        network_span_years: earliest
            .zip(latest)
            .map(|(e, l)| round1((l - e).num_days() as f64 / DAYS_PER_YEAR)),
    }
}
