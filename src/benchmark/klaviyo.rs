// src/benchmark/klaviyo.rs
//
// Email-marketing account audit over an exported Klaviyo account: flows
// against an essential-flows checklist, segment structure, campaign and
// deliverability rates against benchmarks, and the flow/campaign revenue
// split. Rates are fractions on input and percentages on output.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{find, ratio, round_to, Benchmark, Better, Priority, Rating};

/// Only the most recent campaigns are read, as listed in the export.
pub const MAX_CAMPAIGNS: usize = 20;
const TOP_N: usize = 10;

pub const BENCHMARKS: &[Benchmark] = &[
    Benchmark::higher("open_rate", 0.20, 0.30, 0.15),
    Benchmark::higher("click_rate", 0.02, 0.04, 0.015),
    Benchmark::lower("unsubscribe_rate", 0.003, 0.001, 0.005),
    Benchmark::lower("spam_complaint_rate", 0.0005, 0.0002, 0.001),
    Benchmark::higher("flow_revenue_pct", 0.30, 0.50, 0.20),
    Benchmark::lower("bounce_rate", 0.02, 0.01, 0.05),
    Benchmark::higher("list_growth_rate", 0.03, 0.08, 0.01),
];

/// A flow every store should run.
#[derive(Debug, Clone, Copy)]
pub struct EssentialFlow {
    pub name: &'static str,
    pub trigger: &'static str,
    pub priority: Priority,
    /// Substrings that also count as a match.
    pub alternates: &'static [&'static str],
    pub impact: &'static str,
}

pub const ESSENTIAL_FLOWS: &[EssentialFlow] = &[
    EssentialFlow {
        name: "Welcome Series",
        trigger: "List Subscribe",
        priority: Priority::Critical,
        alternates: &["welcome", "onboarding"],
        impact: "10-15% of total email revenue",
    },
    EssentialFlow {
        name: "Abandoned Cart",
        trigger: "Started Checkout",
        priority: Priority::Critical,
        alternates: &["abandon", "cart recovery", "checkout abandon"],
        impact: "15-25% of total email revenue",
    },
    EssentialFlow {
        name: "Browse Abandonment",
        trigger: "Viewed Product",
        priority: Priority::High,
        alternates: &["browse abandon", "viewed product"],
        impact: "5-10% of total email revenue",
    },
    EssentialFlow {
        name: "Post-Purchase",
        trigger: "Placed Order",
        priority: Priority::Critical,
        alternates: &["post purchase", "thank you", "order follow"],
        impact: "8-12% of total email revenue",
    },
    EssentialFlow {
        name: "Winback",
        trigger: "Time Since Last Purchase",
        priority: Priority::High,
        alternates: &["win back", "win-back", "lapsed", "re-engage"],
        impact: "5-8% of total email revenue",
    },
    EssentialFlow {
        name: "Sunset/Re-engagement",
        trigger: "Engagement Date",
        priority: Priority::High,
        alternates: &["sunset", "re-engagement", "sunsetting"],
        impact: "Protect deliverability, reduce costs",
    },
    EssentialFlow {
        name: "Review Request",
        trigger: "Fulfilled Order",
        priority: Priority::Medium,
        alternates: &["review", "feedback request"],
        impact: "Indirect: increases social proof and conversion",
    },
    EssentialFlow {
        name: "Replenishment",
        trigger: "Predicted Next Order",
        priority: Priority::Medium,
        alternates: &["replenish", "reorder", "restock"],
        impact: "5-10% of total email revenue (if applicable)",
    },
    EssentialFlow {
        name: "Birthday/Anniversary",
        trigger: "Date Property",
        priority: Priority::Low,
        alternates: &["birthday", "anniversary", "bday"],
        impact: "2-5% of total email revenue",
    },
    EssentialFlow {
        name: "VIP/Loyalty",
        trigger: "Segment Entry",
        priority: Priority::Medium,
        alternates: &["vip", "loyalty", "high value"],
        impact: "3-8% of total email revenue from high-value segment",
    },
];

/// Segment name fragments per engagement tier, checked in order.
const TIER_KEYWORDS: &[(EngagementTier, &[&str])] = &[
    (EngagementTier::Active, &["active", "engaged", "30 day", "30d", "recent"]),
    (EngagementTier::Warm, &["warm", "60 day", "90 day", "60d", "90d"]),
    (EngagementTier::AtRisk, &["at risk", "at-risk", "cooling", "fading"]),
    (EngagementTier::Lapsed, &["lapsed", "inactive", "unengaged", "180 day", "180d"]),
    (EngagementTier::Suppression, &["suppress", "sunset", "never engaged", "do not"]),
];

const RFM_KEYWORDS: &[&str] = &["rfm", "recency", "frequency", "monetary", "clv", "ltv"];
const PREDICTIVE_KEYWORDS: &[&str] = &["predicted", "churn", "next order", "likely to"];

// ─── input ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Flow {
    pub id: Option<String>,
    pub name: String,
    pub status: Option<String>,
    /// Attributed revenue from the flow report, when exported.
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailList {
    pub name: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CampaignReport {
    pub recipients: u64,
    pub unique_opens: u64,
    pub unique_clicks: u64,
    pub bounces: u64,
    pub unsubscribes: u64,
    pub spam_complaints: u64,
    pub deliveries: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub id: Option<String>,
    pub name: String,
    pub status: Option<String>,
    pub report: Option<CampaignReport>,
}

/// Everything the audit reads, as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Account {
    pub flows: Vec<Flow>,
    pub segments: Vec<Segment>,
    pub lists: Vec<EmailList>,
    pub campaigns: Vec<Campaign>,
}

impl Account {
    /// The first `MAX_CAMPAIGNS` campaigns that have an id and a report.
    fn reported_campaigns(&self) -> impl Iterator<Item = (&Campaign, &CampaignReport)> {
        self.campaigns
            .iter()
            .take(MAX_CAMPAIGNS)
            .filter(|c| c.id.is_some())
            .filter_map(|c| c.report.as_ref().map(|r| (c, r)))
    }
}

// ─── output ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAssessment {
    pub rating: Rating,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_good: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_great: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub reason: String,
    pub expected_impact: String,
}

fn recommend(
    priority: Priority,
    action: impl Into<String>,
    reason: impl Into<String>,
    expected_impact: impl Into<String>,
) -> Recommendation {
    Recommendation {
        priority,
        action: action.into(),
        reason: reason.into(),
        expected_impact: expected_impact.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Found,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub flow: &'static str,
    pub trigger: &'static str,
    pub priority: Priority,
    pub status: FlowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSummary {
    pub total_flows: usize,
    pub active_flows: usize,
    pub inactive_flows: usize,
    pub essential_found: usize,
    pub essential_missing: usize,
    pub coverage_score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRef {
    pub name: String,
    pub status: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowAudit {
    pub summary: FlowSummary,
    pub checklist: Vec<ChecklistItem>,
    pub all_flows: Vec<FlowRef>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementTier {
    Active,
    Warm,
    AtRisk,
    Lapsed,
    Suppression,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierGroup {
    pub count: usize,
    pub segments: Vec<String>,
}

impl TierGroup {
    fn push(&mut self, name: &str) {
        self.count += 1;
        self.segments.push(name.to_string());
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Segments grouped by engagement tier, in tier order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngagementTiers {
    pub active: TierGroup,
    pub warm: TierGroup,
    pub at_risk: TierGroup,
    pub lapsed: TierGroup,
    pub suppression: TierGroup,
    pub other: TierGroup,
}

impl EngagementTiers {
    fn group_mut(&mut self, tier: EngagementTier) -> &mut TierGroup {
        match tier {
            EngagementTier::Active => &mut self.active,
            EngagementTier::Warm => &mut self.warm,
            EngagementTier::AtRisk => &mut self.at_risk,
            EngagementTier::Lapsed => &mut self.lapsed,
            EngagementTier::Suppression => &mut self.suppression,
            EngagementTier::Other => &mut self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub total_segments: usize,
    pub total_lists: usize,
    pub has_engagement_tiers: bool,
    pub has_rfm_segments: bool,
    pub has_predictive_segments: bool,
    pub has_suppression_segment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentHealth {
    pub summary: SegmentSummary,
    pub engagement_tiers: EngagementTiers,
    pub lists: Vec<EmailList>,
    pub recommendations: Vec<Recommendation>,
}

/// One value per campaign rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CampaignMetrics<T> {
    pub open_rate: T,
    pub click_rate: T,
    pub bounce_rate: T,
    pub unsubscribe_rate: T,
    pub spam_complaint_rate: T,
}

impl<T> CampaignMetrics<T> {
    fn map<U>(self, f: impl Fn(&'static str, T) -> U) -> CampaignMetrics<U> {
        CampaignMetrics {
            open_rate: f("open_rate", self.open_rate),
            click_rate: f("click_rate", self.click_rate),
            bounce_rate: f("bounce_rate", self.bounce_rate),
            unsubscribe_rate: f("unsubscribe_rate", self.unsubscribe_rate),
            spam_complaint_rate: f("spam_complaint_rate", self.spam_complaint_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub total_campaigns: usize,
    pub campaigns_analyzed: usize,
    pub total_recipients: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRef {
    pub name: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignPerformance {
    pub period: String,
    pub summary: CampaignSummary,
    pub aggregate_metrics: CampaignMetrics<f64>,
    pub benchmark_assessment: CampaignMetrics<MetricAssessment>,
    pub campaigns: Vec<CampaignRef>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverabilityIssue {
    pub severity: Priority,
    pub issue: &'static str,
    pub detail: String,
    pub impact: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthRecord {
    pub record: &'static str,
    pub note: &'static str,
}

pub const AUTHENTICATION_CHECKLIST: &[AuthRecord] = &[
    AuthRecord {
        record: "SPF",
        note: "Verify include:_spf.klaviyo.com in DNS",
    },
    AuthRecord {
        record: "DKIM",
        note: "Verify CNAME records from Klaviyo Settings",
    },
    AuthRecord {
        record: "DMARC",
        note: "Verify DMARC policy (p=quarantine or p=reject)",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverabilitySummary {
    pub campaigns_checked: usize,
    pub total_sent: u64,
    pub total_delivered: u64,
    pub delivery_rate: f64,
    pub bounce_rate: f64,
    pub complaint_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverabilityAssessments {
    pub bounce_rate: MetricAssessment,
    pub complaint_rate: MetricAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deliverability {
    pub summary: DeliverabilitySummary,
    pub assessments: DeliverabilityAssessments,
    pub issues: Vec<DeliverabilityIssue>,
    pub authentication_checklist: &'static [AuthRecord],
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSource {
    pub name: String,
    pub revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub flow_revenue: f64,
    pub campaign_revenue: f64,
    pub flow_revenue_pct: f64,
    pub campaign_revenue_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueAttribution {
    pub summary: RevenueSummary,
    pub assessment: MetricAssessment,
    pub top_flows: Vec<RevenueSource>,
    pub top_campaigns: Vec<RevenueSource>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountAudit {
    pub flow_audit: FlowAudit,
    pub segment_health: SegmentHealth,
    pub campaign_performance: CampaignPerformance,
    pub deliverability: Deliverability,
    pub revenue_attribution: RevenueAttribution,
}

// ─── assessors ──────────────────────────────────────────────────────

/// Rate `value` (a fraction) against `BENCHMARKS`. Known metrics come back
/// as percentages rounded to two places; unknown ones are echoed as given.
pub fn assess_metric(name: &str, value: f64) -> MetricAssessment {
    let Some(b) = find(BENCHMARKS, name) else {
        return MetricAssessment {
            rating: Rating::Unknown,
            value,
            benchmark_good: None,
            benchmark_great: None,
        };
    };

    let rating = match b.better {
        Better::Lower if value <= b.great => Rating::Great,
        Better::Lower if value <= b.good => Rating::Good,
        Better::Lower if value <= b.warning => Rating::Warning,
        Better::Higher if value >= b.great => Rating::Great,
        Better::Higher if value >= b.good => Rating::Good,
        Better::Higher if value >= b.warning => Rating::Warning,
        _ => Rating::Critical,
    };

    MetricAssessment {
        rating,
        value: round_to(value * 100.0, 2),
        benchmark_good: Some(round_to(b.good * 100.0, 2)),
        benchmark_great: Some(round_to(b.great * 100.0, 2)),
    }
}

fn has_flow(names: &[String], essential: &EssentialFlow) -> bool {
    let words: Vec<String> = essential
        .name
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    names
        .iter()
        .any(|n| words.iter().all(|w| n.contains(w.as_str())))
        || names
            .iter()
            .any(|n| essential.alternates.iter().any(|alt| n.contains(alt)))
}

/// Check `flows` against `ESSENTIAL_FLOWS`. Matching is by lowercased name:
/// every word of the essential name, or any one alternate, as a substring.
pub fn audit_flows(flows: &[Flow]) -> FlowAudit {
    let names: Vec<String> = flows.iter().map(|f| f.name.to_lowercase()).collect();

    let checklist: Vec<ChecklistItem> = ESSENTIAL_FLOWS
        .iter()
        .map(|e| ChecklistItem {
            flow: e.name,
            trigger: e.trigger,
            priority: e.priority,
            status: if has_flow(&names, e) {
                FlowStatus::Found
            } else {
                FlowStatus::Missing
            },
        })
        .collect();

    let found = checklist
        .iter()
        .filter(|c| c.status == FlowStatus::Found)
        .count();
    let active = flows
        .iter()
        .filter(|f| f.status.as_deref() == Some("live"))
        .count();

    let mut recommendations: Vec<Recommendation> = ESSENTIAL_FLOWS
        .iter()
        .zip(&checklist)
        .filter(|(_, c)| c.status == FlowStatus::Missing)
        .map(|(e, _)| {
            recommend(
                e.priority,
                format!("Create {} flow", e.name),
                format!("Missing essential flow (trigger: {})", e.trigger),
                e.impact,
            )
        })
        .collect();
    if recommendations.is_empty() {
        recommendations.push(recommend(
            Priority::Info,
            "All essential flows present",
            "Focus on optimizing existing flows",
            "Incremental 10-20% improvement per flow",
        ));
    }

    FlowAudit {
        summary: FlowSummary {
            total_flows: flows.len(),
            active_flows: active,
            inactive_flows: flows.len() - active,
            essential_found: found,
            essential_missing: ESSENTIAL_FLOWS.len() - found,
            coverage_score: format!("{}/{}", found, ESSENTIAL_FLOWS.len()),
        },
        checklist,
        all_flows: flows
            .iter()
            .map(|f| FlowRef {
                name: f.name.clone(),
                status: f.status.clone(),
                id: f.id.clone(),
            })
            .collect(),
        recommendations,
    }
}

fn mentions_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| name.contains(kw))
}

pub fn engagement_tier(segment_name: &str) -> EngagementTier {
    let name = segment_name.to_lowercase();
    TIER_KEYWORDS
        .iter()
        .find(|(_, kws)| mentions_any(&name, kws))
        .map(|(tier, _)| *tier)
        .unwrap_or(EngagementTier::Other)
}

/// Group segments into engagement tiers and flag missing segment types.
pub fn analyze_segments(segments: &[Segment], lists: &[EmailList]) -> SegmentHealth {
    let mut tiers = EngagementTiers::default();
    for seg in segments {
        tiers.group_mut(engagement_tier(&seg.name)).push(&seg.name);
    }

    let lowered: Vec<String> = segments.iter().map(|s| s.name.to_lowercase()).collect();
    let has_rfm = lowered.iter().any(|n| mentions_any(n, RFM_KEYWORDS));
    let has_predictive = lowered.iter().any(|n| mentions_any(n, PREDICTIVE_KEYWORDS));
    let has_engagement = !tiers.active.is_empty() || !tiers.warm.is_empty();

    let mut recommendations = Vec::new();
    if !has_engagement {
        recommendations.push(recommend(
            Priority::High,
            "Create engagement tier segments",
            "No engagement-based segmentation found",
            "20-30% improvement in campaign targeting",
        ));
    }
    if tiers.suppression.is_empty() {
        recommendations.push(recommend(
            Priority::High,
            "Create suppression segment",
            "No suppression segment for unengaged contacts",
            "Protect deliverability, reduce costs",
        ));
    }
    if !has_rfm {
        recommendations.push(recommend(
            Priority::Medium,
            "Implement RFM segmentation",
            "No RFM-based segments detected",
            "15-25% lift in campaign revenue",
        ));
    }
    if !has_predictive {
        recommendations.push(recommend(
            Priority::Medium,
            "Enable predictive segments",
            "Not using Klaviyo predictive analytics (CLV, churn risk)",
            "10-20% better targeting for winback and VIP flows",
        ));
    }

    SegmentHealth {
        summary: SegmentSummary {
            total_segments: segments.len(),
            total_lists: lists.len(),
            has_engagement_tiers: has_engagement,
            has_rfm_segments: has_rfm,
            has_predictive_segments: has_predictive,
            has_suppression_segment: !tiers.suppression.is_empty(),
        },
        engagement_tiers: tiers,
        lists: lists.to_vec(),
        recommendations,
    }
}

/// Aggregate rates over the reported campaigns and rate them.
pub fn compare_campaigns(account: &Account, days: u32) -> CampaignPerformance {
    let mut totals = CampaignReport::default();
    let mut analyzed = 0;
    let mut listed = Vec::new();

    for (campaign, report) in account.reported_campaigns() {
        listed.push(CampaignRef {
            name: campaign.name.clone(),
            status: campaign.status.clone(),
        });
        if report.recipients == 0 {
            continue;
        }
        analyzed += 1;
        totals.recipients += report.recipients;
        totals.unique_opens += report.unique_opens;
        totals.unique_clicks += report.unique_clicks;
        totals.bounces += report.bounces;
        totals.unsubscribes += report.unsubscribes;
        totals.spam_complaints += report.spam_complaints;
        totals.revenue += report.revenue;
    }

    let sent = totals.recipients as f64;
    let rates = CampaignMetrics {
        open_rate: ratio(totals.unique_opens as f64, sent),
        click_rate: ratio(totals.unique_clicks as f64, sent),
        bounce_rate: ratio(totals.bounces as f64, sent),
        unsubscribe_rate: ratio(totals.unsubscribes as f64, sent),
        spam_complaint_rate: ratio(totals.spam_complaints as f64, sent),
    };
    let assessments = rates.map(assess_metric);

    let mut recommendations = Vec::new();
    if assessments.open_rate.rating.needs_attention() {
        recommendations.push(recommend(
            Priority::High,
            "Improve subject lines and sender reputation",
            format!("Open rate {:.1}% below benchmark", rates.open_rate * 100.0),
            "20-40% increase in open rates",
        ));
    }
    if assessments.click_rate.rating.needs_attention() {
        recommendations.push(recommend(
            Priority::High,
            "Optimize email content and CTAs",
            format!("Click rate {:.1}% below benchmark", rates.click_rate * 100.0),
            "30-50% increase in click rates",
        ));
    }
    if assessments.unsubscribe_rate.rating.needs_attention() {
        recommendations.push(recommend(
            Priority::High,
            "Reduce send frequency or improve segmentation",
            format!(
                "Unsubscribe rate {:.2}% above threshold",
                rates.unsubscribe_rate * 100.0
            ),
            "50% reduction in unsubscribes",
        ));
    }

    CampaignPerformance {
        period: format!("Last {} days", days),
        summary: CampaignSummary {
            total_campaigns: account.campaigns.len(),
            campaigns_analyzed: analyzed,
            total_recipients: totals.recipients,
            total_revenue: round_to(totals.revenue, 2),
        },
        aggregate_metrics: rates.map(|_, v| round_to(v * 100.0, 2)),
        benchmark_assessment: assessments,
        campaigns: listed,
        recommendations,
    }
}

/// Bounce and complaint rates over the reported campaigns, with threshold
/// issues.
pub fn check_deliverability(account: &Account) -> Deliverability {
    let (mut checked, mut sent, mut bounces, mut complaints, mut delivered) = (0, 0, 0, 0, 0);
    for (_, report) in account.reported_campaigns() {
        if report.recipients == 0 {
            continue;
        }
        checked += 1;
        sent += report.recipients;
        bounces += report.bounces;
        complaints += report.spam_complaints;
        delivered += report.deliveries;
    }

    let bounce_rate = ratio(bounces as f64, sent as f64);
    let complaint_rate = ratio(complaints as f64, sent as f64);
    let delivery_rate = ratio(delivered as f64, sent as f64);

    let mut issues = Vec::new();
    if bounce_rate > 0.05 {
        issues.push(DeliverabilityIssue {
            severity: Priority::Critical,
            issue: "High bounce rate",
            detail: format!("Bounce rate {:.2}% exceeds 5% threshold", bounce_rate * 100.0),
            impact: "ISPs may throttle or block your sending",
        });
    }
    if complaint_rate > 0.001 {
        issues.push(DeliverabilityIssue {
            severity: Priority::Critical,
            issue: "High spam complaint rate",
            detail: format!(
                "Complaint rate {:.3}% exceeds 0.1% threshold",
                complaint_rate * 100.0
            ),
            impact: "Risk of being blacklisted by major ISPs",
        });
    }
    if bounce_rate > 0.02 {
        issues.push(DeliverabilityIssue {
            severity: Priority::High,
            issue: "Elevated bounce rate",
            detail: format!("Bounce rate {:.2}% above 2% benchmark", bounce_rate * 100.0),
            impact: "Sender reputation degradation over time",
        });
    }
    if complaint_rate > 0.0005 {
        issues.push(DeliverabilityIssue {
            severity: Priority::High,
            issue: "Elevated complaint rate",
            detail: format!(
                "Complaint rate {:.3}% above 0.05% benchmark",
                complaint_rate * 100.0
            ),
            impact: "Gradual inbox placement decline",
        });
    }

    let mut recommendations = Vec::new();
    if issues.is_empty() {
        recommendations.push(recommend(
            Priority::Info,
            "Deliverability metrics within healthy range",
            "No critical issues detected",
            "Continue monitoring",
        ));
    }
    if bounce_rate > 0.02 {
        recommendations.push(recommend(
            Priority::High,
            "Implement list cleaning",
            "Elevated bounce rate indicates stale email addresses",
            "Reduce bounces by 60-80%",
        ));
    }
    if complaint_rate > 0.0005 {
        recommendations.push(recommend(
            Priority::High,
            "Review sending frequency and content relevance",
            "Spam complaints above safe threshold",
            "Reduce complaints by 50-70%",
        ));
    }
    recommendations.push(recommend(
        Priority::Medium,
        "Verify DNS authentication (SPF, DKIM, DMARC)",
        "Authentication protects sender reputation",
        "Improved inbox placement across all ISPs",
    ));

    Deliverability {
        summary: DeliverabilitySummary {
            campaigns_checked: checked,
            total_sent: sent,
            total_delivered: delivered,
            delivery_rate: round_to(delivery_rate * 100.0, 2),
            bounce_rate: round_to(bounce_rate * 100.0, 2),
            complaint_rate: round_to(complaint_rate * 100.0, 3),
        },
        assessments: DeliverabilityAssessments {
            bounce_rate: assess_metric("bounce_rate", bounce_rate),
            complaint_rate: assess_metric("spam_complaint_rate", complaint_rate),
        },
        issues,
        authentication_checklist: AUTHENTICATION_CHECKLIST,
        recommendations,
    }
}

fn top_by_revenue(mut sources: Vec<RevenueSource>) -> Vec<RevenueSource> {
    // stable, so ties keep export order
    sources.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    sources.truncate(TOP_N);
    sources
}

/// Split attributed revenue between flows and campaigns.
pub fn revenue_attribution(account: &Account) -> RevenueAttribution {
    let mut flow_revenue = 0.0;
    let mut earning_flows = Vec::new();
    for flow in account.flows.iter().filter(|f| f.id.is_some()) {
        let Some(rev) = flow.revenue else { continue };
        flow_revenue += rev;
        if rev > 0.0 {
            earning_flows.push(RevenueSource {
                name: flow.name.clone(),
                revenue: round_to(rev, 2),
                status: flow.status.clone(),
            });
        }
    }

    let mut campaign_revenue = 0.0;
    let mut earning_campaigns = Vec::new();
    for (campaign, report) in account.reported_campaigns() {
        campaign_revenue += report.revenue;
        if report.revenue > 0.0 {
            earning_campaigns.push(RevenueSource {
                name: campaign.name.clone(),
                revenue: round_to(report.revenue, 2),
                status: None,
            });
        }
    }

    let total = flow_revenue + campaign_revenue;
    let flow_pct = ratio(flow_revenue, total) * 100.0;
    let campaign_pct = ratio(campaign_revenue, total) * 100.0;

    let mut recommendations = Vec::new();
    if flow_pct < 30.0 {
        recommendations.push(recommend(
            Priority::High,
            "Increase flow automation coverage",
            format!("Flow revenue at {:.0}% (benchmark: 30-50%)", flow_pct),
            "Shift 10-20% more revenue to automated flows",
        ));
    }
    if flow_pct > 70.0 {
        recommendations.push(recommend(
            Priority::Medium,
            "Invest in campaign strategy",
            format!("Over-reliant on flows ({:.0}% of revenue)", flow_pct),
            "Diversify revenue sources, reduce flow fatigue",
        ));
    }
    if earning_flows.len() < 5 {
        recommendations.push(recommend(
            Priority::High,
            "Add more revenue-generating flows",
            format!("Only {} flows generating revenue", earning_flows.len()),
            "Each new flow adds 5-15% incremental revenue",
        ));
    }

    RevenueAttribution {
        summary: RevenueSummary {
            total_revenue: round_to(total, 2),
            flow_revenue: round_to(flow_revenue, 2),
            campaign_revenue: round_to(campaign_revenue, 2),
            flow_revenue_pct: round_to(flow_pct, 1),
            campaign_revenue_pct: round_to(campaign_pct, 1),
        },
        assessment: assess_metric("flow_revenue_pct", flow_pct / 100.0),
        top_flows: top_by_revenue(earning_flows),
        top_campaigns: top_by_revenue(earning_campaigns),
        recommendations,
    }
}

/// Every section of the account audit.
pub fn audit_account(account: &Account, days: u32) -> AccountAudit {
    let audit = AccountAudit {
        flow_audit: audit_flows(&account.flows),
        segment_health: analyze_segments(&account.segments, &account.lists),
        campaign_performance: compare_campaigns(account, days),
        deliverability: check_deliverability(account),
        revenue_attribution: revenue_attribution(account),
    };
    info!(
        flows = account.flows.len(),
        segments = account.segments.len(),
        campaigns = account.campaigns.len(),
        coverage = %audit.flow_audit.summary.coverage_score,
        "klaviyo audit complete"
    );
    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn flow(name: &str, status: &str, revenue: Option<f64>) -> Flow {
        Flow {
            id: Some(format!("f-{}", name)),
            name: name.into(),
            status: Some(status.into()),
            revenue,
        }
    }

    fn segment(name: &str) -> Segment {
        Segment {
            id: None,
            name: name.into(),
        }
    }

    fn campaign(name: &str, report: CampaignReport) -> Campaign {
        Campaign {
            id: Some(format!("c-{}", name)),
            name: name.into(),
            status: Some("Sent".into()),
            report: Some(report),
        }
    }

    fn report(recipients: u64, opens: u64, clicks: u64, bounces: u64) -> CampaignReport {
        CampaignReport {
            recipients,
            unique_opens: opens,
            unique_clicks: clicks,
            bounces,
            deliveries: recipients - bounces,
            ..Default::default()
        }
    }

    #[test]
    fn higher_is_better_ratings() {
        let a = assess_metric("open_rate", 0.25);
        assert_eq!(a.rating, Rating::Good);
        assert_eq!(a.value, 25.0);
        assert_eq!(a.benchmark_good, Some(20.0));
        assert_eq!(a.benchmark_great, Some(30.0));
        assert_eq!(assess_metric("open_rate", 0.30).rating, Rating::Great);
        assert_eq!(assess_metric("open_rate", 0.15).rating, Rating::Warning);
        assert_eq!(assess_metric("open_rate", 0.10).rating, Rating::Critical);
    }

    #[test]
    fn lower_is_better_ratings() {
        assert_eq!(assess_metric("bounce_rate", 0.005).rating, Rating::Great);
        assert_eq!(assess_metric("bounce_rate", 0.02).rating, Rating::Good);
        assert_eq!(assess_metric("bounce_rate", 0.04).rating, Rating::Warning);
        assert_eq!(assess_metric("bounce_rate", 0.06).rating, Rating::Critical);
        let spam = assess_metric("spam_complaint_rate", 0.0003);
        assert_eq!(spam.rating, Rating::Good);
        assert_eq!(spam.value, 0.03);
    }

    #[test]
    fn unknown_metric_is_echoed() -> Result<()> {
        let a = assess_metric("reply_rate", 0.4);
        assert_eq!(a.rating, Rating::Unknown);
        assert_eq!(a.value, 0.4);
        assert_eq!(
            serde_json::to_value(&a)?,
            serde_json::json!({"rating": "unknown", "value": 0.4})
        );
        Ok(())
    }

    #[test]
    fn flow_checklist_uses_words_and_alternates() {
        let flows = vec![
            flow("Welcome Series - New Subscribers", "live", None),
            flow("Checkout Abandon 3-email", "live", None),
            flow("Thank You for your order", "draft", None),
            flow("Win-Back 120d", "manual", None),
        ];
        let audit = audit_flows(&flows);

        let found: Vec<&str> = audit
            .checklist
            .iter()
            .filter(|c| c.status == FlowStatus::Found)
            .map(|c| c.flow)
            .collect();
        assert_eq!(found, vec!["Welcome Series", "Abandoned Cart", "Post-Purchase", "Winback"]);
        assert_eq!(audit.summary.active_flows, 2);
        assert_eq!(audit.summary.inactive_flows, 2);
        assert_eq!(audit.summary.coverage_score, "4/10");

        assert_eq!(audit.recommendations.len(), 6);
        let browse = &audit.recommendations[0];
        assert_eq!(browse.action, "Create Browse Abandonment flow");
        assert_eq!(browse.reason, "Missing essential flow (trigger: Viewed Product)");
        assert_eq!(browse.expected_impact, "5-10% of total email revenue");
        assert_eq!(browse.priority, Priority::High);
    }

    #[test]
    fn full_flow_coverage_gets_an_info_note() {
        let flows: Vec<Flow> = ESSENTIAL_FLOWS
            .iter()
            .map(|e| flow(e.name, "live", None))
            .collect();
        let audit = audit_flows(&flows);
        assert_eq!(audit.summary.essential_missing, 0);
        assert_eq!(audit.recommendations.len(), 1);
        assert_eq!(audit.recommendations[0].priority, Priority::Info);
    }

    #[test]
    fn segments_fall_into_first_matching_tier() {
        let segments = vec![
            segment("Engaged 30d"),
            segment("At-Risk Customers"),
            segment("Sunset - suppress"),
            segment("Predicted CLV top 10%"),
            segment("Newsletter"),
        ];
        let health = analyze_segments(&segments, &[]);

        assert_eq!(health.engagement_tiers.active.segments, vec!["Engaged 30d"]);
        assert_eq!(health.engagement_tiers.at_risk.count, 1);
        assert_eq!(health.engagement_tiers.suppression.count, 1);
        assert_eq!(health.engagement_tiers.other.count, 2);
        assert!(health.summary.has_engagement_tiers);
        assert!(health.summary.has_rfm_segments);
        assert!(health.summary.has_predictive_segments);
        assert!(health.recommendations.is_empty());
    }

    #[test]
    fn bare_segments_get_every_recommendation() {
        let health = analyze_segments(&[segment("Everyone")], &[]);
        let actions: Vec<&str> = health.recommendations.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Create engagement tier segments",
                "Create suppression segment",
                "Implement RFM segmentation",
                "Enable predictive segments",
            ]
        );
    }

    #[test]
    fn campaign_rates_aggregate_over_reports() {
        let mut account = Account {
            campaigns: vec![
                campaign("a", report(1000, 150, 10, 5)),
                campaign("b", report(1000, 110, 10, 5)),
                campaign("empty", CampaignReport::default()),
            ],
            ..Default::default()
        };
        account.campaigns.push(Campaign {
            id: None,
            name: "no id".into(),
            status: None,
            report: Some(report(1000, 1000, 1000, 0)),
        });

        let perf = compare_campaigns(&account, 30);
        assert_eq!(perf.period, "Last 30 days");
        assert_eq!(perf.summary.total_campaigns, 4);
        assert_eq!(perf.summary.campaigns_analyzed, 2);
        assert_eq!(perf.summary.total_recipients, 2000);
        assert_eq!(perf.aggregate_metrics.open_rate, 13.0);
        assert_eq!(perf.aggregate_metrics.click_rate, 1.0);
        assert_eq!(perf.benchmark_assessment.open_rate.rating, Rating::Critical);
        assert_eq!(perf.campaigns.len(), 3);

        let reasons: Vec<&str> = perf.recommendations.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec!["Open rate 13.0% below benchmark", "Click rate 1.0% below benchmark"]
        );
    }

    #[test]
    fn only_the_first_campaigns_are_read() {
        let account = Account {
            campaigns: (0..25).map(|i| campaign(&i.to_string(), report(100, 30, 5, 0))).collect(),
            ..Default::default()
        };
        assert_eq!(compare_campaigns(&account, 7).summary.campaigns_analyzed, MAX_CAMPAIGNS);
        assert_eq!(check_deliverability(&account).summary.campaigns_checked, MAX_CAMPAIGNS);
    }

    #[test]
    fn high_bounces_raise_issues() {
        let account = Account {
            campaigns: vec![campaign("a", report(1000, 300, 40, 60))],
            ..Default::default()
        };
        let d = check_deliverability(&account);

        assert_eq!(d.summary.bounce_rate, 6.0);
        assert_eq!(d.summary.delivery_rate, 94.0);
        let issues: Vec<&str> = d.issues.iter().map(|i| i.issue).collect();
        assert_eq!(issues, vec!["High bounce rate", "Elevated bounce rate"]);
        assert_eq!(d.issues[0].detail, "Bounce rate 6.00% exceeds 5% threshold");
        assert_eq!(d.assessments.bounce_rate.rating, Rating::Critical);
        assert_eq!(d.recommendations[0].action, "Implement list cleaning");
        assert_eq!(d.authentication_checklist.len(), 3);
    }

    #[test]
    fn clean_sending_is_reported_healthy() {
        let account = Account {
            campaigns: vec![campaign("a", report(1000, 300, 40, 5))],
            ..Default::default()
        };
        let d = check_deliverability(&account);
        assert!(d.issues.is_empty());
        assert_eq!(d.recommendations[0].priority, Priority::Info);
        assert_eq!(d.recommendations.len(), 2);
    }

    #[test]
    fn revenue_split_between_flows_and_campaigns() {
        let mut big = report(1000, 300, 40, 5);
        big.revenue = 1000.0;
        let account = Account {
            flows: vec![
                flow("Welcome Series", "live", Some(1500.0)),
                flow("Abandoned Cart", "live", Some(2500.0)),
                flow("Idle", "draft", Some(0.0)),
            ],
            campaigns: vec![campaign("Spring Sale", big)],
            ..Default::default()
        };
        let rev = revenue_attribution(&account);

        assert_eq!(rev.summary.total_revenue, 5000.0);
        assert_eq!(rev.summary.flow_revenue_pct, 80.0);
        assert_eq!(rev.summary.campaign_revenue_pct, 20.0);
        assert_eq!(rev.assessment.rating, Rating::Great);
        let names: Vec<&str> = rev.top_flows.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Abandoned Cart", "Welcome Series"]);
        assert_eq!(rev.top_campaigns[0].status, None);

        let actions: Vec<&str> = rev.recommendations.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["Invest in campaign strategy", "Add more revenue-generating flows"]
        );
    }

    #[test]
    fn empty_account_audits_without_dividing_by_zero() -> Result<()> {
        let account: Account = serde_json::from_str("{}")?;
        let audit = audit_account(&account, 30);
        assert_eq!(audit.campaign_performance.aggregate_metrics.open_rate, 0.0);
        assert_eq!(audit.revenue_attribution.summary.flow_revenue_pct, 0.0);
        assert_eq!(audit.flow_audit.summary.coverage_score, "0/10");

        let json = serde_json::to_value(&audit)?;
        assert_eq!(json["segment_health"]["engagement_tiers"]["at_risk"]["count"], 0);
        assert_eq!(json["flow_audit"]["checklist"][0]["priority"], "CRITICAL");
        assert_eq!(json["flow_audit"]["checklist"][0]["status"], "missing");
        Ok(())
    }
}
