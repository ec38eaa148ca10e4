use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::Keywords;
use crate::export::{Direction, Invitation, Message};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyInvitations {
    /// `YYYY-MM`
    pub month: String,
    pub inbound: usize,
    pub outbound: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxPeriod {
    /// `YYYY-H1` or `YYYY-H2`
    pub period: String,
    pub genuine: usize,
    pub noise: usize,
    pub total: usize,
}

/// Inbound vs outbound invitations per calendar month, oldest first.
pub fn analyze_invitations(invitations: &[Invitation]) -> Vec<MonthlyInvitations> {
    let mut monthly: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for inv in invitations {
        let Some(date) = inv.date else { continue };
        let slot = monthly.entry(date.format("%Y-%m").to_string()).or_default();
        match inv.direction {
            Direction::Inbound => slot.0 += 1,
            Direction::Outbound => slot.1 += 1,
        }
    }

    monthly
        .into_iter()
        .map(|(month, (inbound, outbound))| MonthlyInvitations {
            month,
            inbound,
            outbound,
        })
        .collect()
}

/// Half-year key for a month number.
fn half_year(year: i32, month: u32) -> String {
    let half = if month <= 6 { "H1" } else { "H2" };
    format!("{}-{}", year, half)
}

/// Genuine vs noise messages per half year, oldest first.
pub fn classify_inbox(messages: &[Message], keywords: &Keywords) -> Vec<InboxPeriod> {
    let mut periods: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for msg in messages {
        let Some(date) = msg.date else { continue };
        let slot = periods
            .entry(half_year(date.year(), date.month()))
            .or_default();
        if keywords.is_spam(msg.body()) {
            slot.1 += 1;
        } else {
            slot.0 += 1;
        }
    }

    periods
        .into_iter()
        .map(|(period, (genuine, noise))| InboxPeriod {
            period,
            genuine,
            noise,
            total: genuine + noise,
        })
        .collect()
}
