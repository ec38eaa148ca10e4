use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;

use super::pools::company_pool;
use crate::export::Export;

/// Coarse industry used to pick a fitting fake company. First match wins.
const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "dtc",
        &[
            "beauty", "skin", "cosmetic", "fashion", "apparel", "clothing", "home", "food",
            "beverage", "wellness", "jewelry", "lifestyle", "retail", "brand", "dtc", "d2c",
            "ecommerce",
        ],
    ),
    (
        "tech",
        &[
            "tech", "technology", "ai", "cloud", "cyber", "fintech", "computing", "digital",
            "software", "platform",
        ],
    ),
    (
        "martech",
        &[
            "klaviyo", "braze", "shopify", "attentive", "yotpo", "analytics", "data",
            "automation", "crm", "martech", "saas",
        ],
    ),
    ("agency", &["agency", "consulting", "service", "studio", "creative"]),
    (
        "recruiting",
        &["recruiting", "staffing", "talent", "hiring", "workforce"],
    ),
    ("finance", &["venture", "capital", "investment", "fund", "finance"]),
    ("luxury", &["luxury", "premium", "prestige", "designer"]),
    ("media", &["media", "publish", "news", "content", "entertainment"]),
];

pub fn classify_company(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    INDUSTRY_KEYWORDS
        .iter()
        .find(|(_, kws)| kws.iter().any(|kw| lower.contains(kw)))
        .map(|(industry, _)| *industry)
        .unwrap_or("other")
}

/// Real company → fake company from the same industry pool.
#[derive(Debug, Clone, Default)]
pub struct CompanyMap {
    map: HashMap<String, String>,
}

impl CompanyMap {
    /// Map every distinct company named by connections and follows. Names are
    /// processed in sorted order so the result does not depend on row order.
    pub fn build(export: &Export) -> Self {
        let real: BTreeSet<&str> = export
            .connections
            .iter()
            .map(|c| c.company.trim())
            .chain(export.company_follows.iter().map(|f| f.company.trim()))
            .filter(|c| !c.is_empty())
            .collect();

        let mut map = HashMap::new();
        let mut used: HashSet<String> = HashSet::new();
        let mut cursor: HashMap<&'static str, usize> = HashMap::new();

        for name in real {
            let industry = classify_company(name);
            let pool = company_pool(industry);
            if pool.is_empty() {
                continue;
            }
            let idx = cursor.get(industry).copied().unwrap_or(0);

            let free = (0..pool.len())
                .map(|offset| (offset, pool[(idx + offset) % pool.len()]))
                .find(|(_, candidate)| !used.contains(*candidate));

            let fake = match free {
                Some((offset, candidate)) => {
                    cursor.insert(industry, (idx + offset + 1) % pool.len());
                    candidate.to_string()
                }
                None => {
                    // pool exhausted
                    cursor.insert(industry, idx + 1);
                    format!("{} ({})", pool[idx % pool.len()], used.len())
                }
            };

            used.insert(fake.clone());
            map.insert(name.to_string(), fake);
        }

        info!(companies = map.len(), "built company map");
        Self { map }
    }

    pub fn get(&self, real: &str) -> Option<&str> {
        self.map.get(real.trim()).map(String::as_str)
    }

    /// Replace in place; names without a mapping are left alone.
    pub fn apply(&self, company: &mut String) {
        if let Some(fake) = self.get(company) {
            *company = fake.to_string();
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
