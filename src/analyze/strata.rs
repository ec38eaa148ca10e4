use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::most_common;
use crate::export::Connection;

/// Open-ended phases run up to this year.
const LAST_PHASE_END: i32 = 2030;
const TOP_N: usize = 10;

/// A career phase covering `start_year..=end_year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub label: String,
    pub start_year: i32,
    pub end_year: i32,
}

/// A position from the member's own profile, used to derive phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub title: String,
    pub start_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stratum {
    pub label: String,
    pub start_year: i32,
    pub end_year: i32,
    pub count: usize,
    pub top_companies: Vec<String>,
    pub top_roles: Vec<String>,
}

pub fn default_phases() -> Vec<Phase> {
    [
        ("Early Career", 2010, 2014),
        ("Growth Phase", 2015, 2018),
        ("Senior Phase", 2019, 2022),
        ("Current Phase", 2023, LAST_PHASE_END),
    ]
    .into_iter()
    .map(|(label, start_year, end_year)| Phase {
        label: label.to_string(),
        start_year,
        end_year,
    })
    .collect()
}

/// One phase per dated position, each ending the year before the next starts.
/// Falls back to [`default_phases`] when no position has a start date.
pub fn phases_from_positions(positions: &[Position]) -> Vec<Phase> {
    let mut dated: Vec<(&Position, NaiveDateTime)> = positions
        .iter()
        .filter_map(|p| p.start_date.map(|d| (p, d)))
        .collect();
    if dated.is_empty() {
        return default_phases();
    }
    dated.sort_by_key(|(_, d)| *d);

    dated
        .iter()
        .enumerate()
        .map(|(i, (pos, start))| Phase {
            label: if pos.title.is_empty() {
                format!("Phase {}", i + 1)
            } else {
                pos.title.clone()
            },
            start_year: start.year(),
            end_year: dated
                .get(i + 1)
                .map(|(_, next)| next.year() - 1)
                .unwrap_or(LAST_PHASE_END),
        })
        .collect()
}

/// Bucket connections by the year they connected into career phases.
pub fn build_career_strata(
    connections: &[Connection],
    positions: Option<&[Position]>,
) -> Vec<Stratum> {
    let phases = match positions {
        Some(p) if !p.is_empty() => phases_from_positions(p),
        _ => default_phases(),
    };

    phases
        .into_iter()
        .map(|phase| {
            let bucket: Vec<&Connection> = connections
                .iter()
                .filter(|c| {
                    c.connected_on
                        .map(|d| (phase.start_year..=phase.end_year).contains(&d.year()))
                        .unwrap_or(false)
                })
                .collect();

            Stratum {
                count: bucket.len(),
                top_companies: most_common(
                    bucket.iter().map(|c| c.company.as_str()).filter(|s| !s.is_empty()),
                    TOP_N,
                ),
                top_roles: most_common(
                    bucket.iter().map(|c| c.position.as_str()).filter(|s| !s.is_empty()),
                    TOP_N,
                ),
                label: phase.label,
                start_year: phase.start_year,
                end_year: phase.end_year,
            }
        })
        .collect()
}
