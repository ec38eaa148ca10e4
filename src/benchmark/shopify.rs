// src/benchmark/shopify.rs
//
// Store metrics against Shopify benchmarks. Values are taken as the store
// reports them: currency for `aov`, counts for `orders_per_day` and
// `product_count`, percentages for everything else.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::{find, round_to, Benchmark, Better, Priority, Rating};

pub const BENCHMARKS: &[Benchmark] = &[
    Benchmark::higher("conversion_rate", 2.5, 4.0, 1.5),
    Benchmark::higher("aov", 60.0, 100.0, 30.0),
    Benchmark::higher("returning_customer_pct", 25.0, 40.0, 15.0),
    Benchmark::higher("cart_completion_rate", 45.0, 60.0, 30.0),
    Benchmark::higher("orders_per_day", 10.0, 50.0, 3.0),
    Benchmark::higher("product_count", 20.0, 100.0, 5.0),
    Benchmark::higher("active_product_pct", 80.0, 95.0, 50.0),
    Benchmark::lower("discount_rate", 10.0, 5.0, 25.0),
];

/// Share of out-of-stock products above which restocking is flagged.
const OUT_OF_STOCK_LIMIT: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreAssessment {
    pub status: Rating,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_good: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_great: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreRecommendation {
    pub priority: Priority,
    pub area: &'static str,
    pub action: String,
    pub expected_impact: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreReport {
    pub assessments: BTreeMap<String, StoreAssessment>,
    pub recommendations: Vec<StoreRecommendation>,
}

/// Rate `value` against `BENCHMARKS`. Between `good` and `warning` a metric
/// is `ok`; past `warning` it is `warning`. Unknown names get `no_benchmark`.
pub fn assess_metric(name: &str, value: f64) -> StoreAssessment {
    let value_2dp = round_to(value, 2);
    let Some(b) = find(BENCHMARKS, name) else {
        return StoreAssessment {
            status: Rating::NoBenchmark,
            value: value_2dp,
            benchmark_good: None,
            benchmark_great: None,
        };
    };

    let status = match b.better {
        Better::Lower if value <= b.great => Rating::Great,
        Better::Lower if value <= b.good => Rating::Good,
        Better::Lower if value >= b.warning => Rating::Warning,
        Better::Higher if value >= b.great => Rating::Great,
        Better::Higher if value >= b.good => Rating::Good,
        Better::Higher if value <= b.warning => Rating::Warning,
        _ => Rating::Ok,
    };

    StoreAssessment {
        status,
        value: value_2dp,
        benchmark_good: Some(b.good),
        benchmark_great: Some(b.great),
    }
}

fn store_recommendations(
    metrics: &BTreeMap<String, f64>,
    assessments: &BTreeMap<String, StoreAssessment>,
) -> Vec<StoreRecommendation> {
    let warned = |name: &str| {
        assessments
            .get(name)
            .is_some_and(|a| a.status == Rating::Warning)
    };
    let metric = |name: &str| metrics.get(name).copied();
    let mut recs = Vec::new();

    if warned("orders_per_day") {
        recs.push(StoreRecommendation {
            priority: Priority::High,
            area: "Order Volume",
            action: "Increase traffic and conversion; order volume is below average".into(),
            expected_impact: "2-3x order volume with paid acquisition + CRO",
        });
    }
    if warned("aov") {
        recs.push(StoreRecommendation {
            priority: Priority::High,
            area: "AOV",
            action: "Implement AOV-boosting tactics: bundles, upsells, free shipping threshold"
                .into(),
            expected_impact: "+20-40% AOV increase",
        });
    }
    if let (Some(out), Some(total)) = (metric("out_of_stock"), metric("product_count")) {
        if total > 0.0 && out / total > OUT_OF_STOCK_LIMIT {
            recs.push(StoreRecommendation {
                priority: Priority::Medium,
                area: "Inventory",
                action: format!(
                    "{} products out of stock ({:.0}%); review inventory planning",
                    out,
                    out / total * 100.0
                ),
                expected_impact: "Recover lost sales from stockouts",
            });
        }
    }
    if let Some(rate) = metric("cancellation_rate").filter(|r| *r > 5.0) {
        recs.push(StoreRecommendation {
            priority: Priority::High,
            area: "Cancellations",
            action: format!(
                "Cancellation rate is {}%; investigate causes and reduce friction",
                rate
            ),
            expected_impact: "Recover 30-50% of cancelled orders",
        });
    }
    if let Some(rate) = metric("discount_rate").filter(|r| *r > 25.0) {
        recs.push(StoreRecommendation {
            priority: Priority::Medium,
            area: "Discount Strategy",
            action: format!(
                "Discount rate at {}%; risk of margin erosion. Shift to value-add offers",
                rate
            ),
            expected_impact: "+5-10% margin improvement",
        });
    }
    if metric("returning_customer_pct").is_some_and(|p| p < 15.0) {
        recs.push(StoreRecommendation {
            priority: Priority::High,
            area: "Retention",
            action: "Low repeat purchase rate; implement post-purchase flows and loyalty program"
                .into(),
            expected_impact: "+25-40% customer retention",
        });
    }
    recs
}

/// Assess every metric in `metrics` and derive store-level recommendations.
/// `out_of_stock` and `cancellation_rate` have no benchmark but feed the
/// recommendations.
pub fn assess_store(metrics: &BTreeMap<String, f64>) -> StoreReport {
    let assessments: BTreeMap<String, StoreAssessment> = metrics
        .iter()
        .map(|(name, value)| (name.clone(), assess_metric(name, *value)))
        .collect();
    let recommendations = store_recommendations(metrics, &assessments);

    info!(
        metrics = metrics.len(),
        recommendations = recommendations.len(),
        "shopify assessment complete"
    );
    StoreReport {
        assessments,
        recommendations,
    }
}
