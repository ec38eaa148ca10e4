use serde::Serialize;
use std::collections::HashMap;

use super::most_common;
use crate::classify::{Keywords, OTHER_INDUSTRY, OTHER_ROLE};
use crate::export::{CompanyFollow, Connection};

/// How many companies a cluster lists.
const TOP_COMPANIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCluster {
    pub name: String,
    pub count: usize,
    pub top_companies: Vec<String>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCategory {
    pub name: String,
    pub count: usize,
    pub companies: Vec<String>,
}

/// Group items by a label, keeping groups in first-seen order and moving the
/// fallback group to the end. Groups are then ordered by size, largest first;
/// equal sizes keep that order.
fn group_by_label<T: Clone>(
    items: &[T],
    fallback: &str,
    label: impl Fn(&T) -> String,
) -> Vec<(String, Vec<T>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    let mut unmatched: Vec<T> = Vec::new();

    for item in items {
        let name = label(item);
        if name == fallback {
            unmatched.push(item.clone());
            continue;
        }
        let idx = *index.entry(name.clone()).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(item.clone());
    }
    if !unmatched.is_empty() {
        groups.push((fallback.to_string(), unmatched));
    }

    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups
}

/// Cluster connections by the role keywords in their position.
pub fn cluster_network(connections: &[Connection], keywords: &Keywords) -> Vec<RoleCluster> {
    group_by_label(connections, OTHER_ROLE, |c| {
        keywords.classify_role(&c.position).to_string()
    })
    .into_iter()
    .map(|(name, conns)| RoleCluster {
        count: conns.len(),
        top_companies: most_common(
            conns.iter().map(|c| c.company.as_str()).filter(|s| !s.is_empty()),
            TOP_COMPANIES,
        ),
        name,
        connections: conns,
    })
    .collect()
}

/// Bucket followed companies into industries.
pub fn categorize_companies(
    follows: &[CompanyFollow],
    keywords: &Keywords,
) -> Vec<CompanyCategory> {
    group_by_label(follows, OTHER_INDUSTRY, |f| {
        keywords.classify_industry(&f.company).to_string()
    })
    .into_iter()
    .map(|(name, items)| CompanyCategory {
        name,
        count: items.len(),
        companies: items.into_iter().map(|f| f.company).collect(),
    })
    .collect()
}
