// src/analyze/mod.rs

pub mod clusters;
pub mod high_value;
pub mod strata;
pub mod summary;
pub mod tiers;
pub mod trends;

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use crate::config::Config;
use crate::export::{AdTargeting, Export};

pub use clusters::{categorize_companies, cluster_network, CompanyCategory, RoleCluster};
pub use high_value::{rank_high_value_messages, RankedMessage};
pub use strata::{build_career_strata, Phase, Position, Stratum};
pub use summary::{summary_stats, SummaryStats};
pub use tiers::{score_relationships, summarise_tiers, ScoredConnection, Tier, TierSummary};
pub use trends::{analyze_invitations, classify_inbox, InboxPeriod, MonthlyInvitations};

/// Everything the report templates read, keyed by section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub summary_stats: SummaryStats,
    pub network_clusters: Vec<RoleCluster>,
    pub company_categories: Vec<CompanyCategory>,
    pub relationship_tiers: TierSummary,
    pub invitation_trends: Vec<MonthlyInvitations>,
    pub inbox_classification: Vec<InboxPeriod>,
    pub career_strata: Vec<Stratum>,
    pub high_value_messages: Vec<RankedMessage>,
    pub ad_targeting: AdTargeting,
}

/// The `n` most frequent values, most frequent first; ties keep first-seen order.
pub(crate) fn most_common<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        let c = counts.entry(v).or_insert(0);
        if *c == 0 {
            order.push(v);
        }
        *c += 1;
    }
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(n).map(str::to_string).collect()
}

/// Run every analysis over a parsed export. `now` anchors the
/// time-relative tiers and recency scores.
pub fn analyze_all(export: &Export, cfg: &Config, now: NaiveDateTime) -> Analysis {
    let kw = &cfg.keywords;

    let mut high_value = rank_high_value_messages(&export.messages, &export.connections, kw, now);
    high_value.truncate(cfg.high_value_limit);

    let analysis = Analysis {
        summary_stats: summary_stats(export),
        network_clusters: cluster_network(&export.connections, kw),
        company_categories: categorize_companies(&export.company_follows, kw),
        relationship_tiers: summarise_tiers(score_relationships(
            &export.connections,
            &export.messages,
            now,
        )),
        invitation_trends: analyze_invitations(&export.invitations),
        inbox_classification: classify_inbox(&export.messages, kw),
        career_strata: build_career_strata(&export.connections, None),
        high_value_messages: high_value,
        ad_targeting: export.ad_targeting.clone(),
    };

    info!(
        clusters = analysis.network_clusters.len(),
        categories = analysis.company_categories.len(),
        ranked_messages = analysis.high_value_messages.len(),
        "analysis complete"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{parse_date, Connection, Message};

    #[test]
    fn most_common_orders_by_count_then_first_seen() {
        let vals = ["b", "a", "c", "a", "c", "d"];
        assert_eq!(most_common(vals.into_iter(), 3), vec!["a", "c", "b"]);
        assert!(most_common(std::iter::empty(), 3).is_empty());
    }

    #[test]
    fn analyze_all_truncates_ranked_messages() -> anyhow::Result<()> {
        let mut export = Export::default();
        export.connections.push(Connection {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            position: "CTO".into(),
            connected_on: parse_date("1 Jan 2021"),
            ..Default::default()
        });
        for i in 0..5 {
            export.messages.push(Message {
                conversation_id: Some(format!("c{}", i)),
                sender: "Ada Lovelace".into(),
                date: parse_date("2024-12-20"),
                content: "Let's discuss the project".into(),
                ..Default::default()
            });
        }
        let cfg = Config {
            high_value_limit: 3,
            ..Default::default()
        };
        let now = parse_date("2025-01-01").unwrap();

        let analysis = analyze_all(&export, &cfg, now);
        assert_eq!(analysis.high_value_messages.len(), 3);
        assert_eq!(analysis.relationship_tiers.connections[0].tier, Tier::Active);
        assert_eq!(analysis.network_clusters[0].name, "Tech & Engineering");

        let json = serde_json::to_value(&analysis)?;
        for key in [
            "summary_stats",
            "network_clusters",
            "company_categories",
            "relationship_tiers",
            "invitation_trends",
            "inbox_classification",
            "career_strata",
            "high_value_messages",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        Ok(())
    }
}
