// src/benchmark/mod.rs
//
// Industry-benchmark assessors for e-commerce marketing data. Input is JSON
// the user already exported from the vendor; nothing here talks to an API.

pub mod klaviyo;
pub mod shopify;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};
use tracing::debug;

/// Which side of the thresholds a metric wants to be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Better {
    Higher,
    Lower,
}

/// Thresholds for one named metric. For `Better::Lower` metrics `great` is
/// the smallest value and `warning` the largest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Benchmark {
    pub name: &'static str,
    pub good: f64,
    pub great: f64,
    pub warning: f64,
    pub better: Better,
}

impl Benchmark {
    const fn higher(name: &'static str, good: f64, great: f64, warning: f64) -> Self {
        Self {
            name,
            good,
            great,
            warning,
            better: Better::Higher,
        }
    }

    const fn lower(name: &'static str, good: f64, great: f64, warning: f64) -> Self {
        Self {
            name,
            good,
            great,
            warning,
            better: Better::Lower,
        }
    }
}

pub fn find<'a>(table: &'a [Benchmark], name: &str) -> Option<&'a Benchmark> {
    table.iter().find(|b| b.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Great,
    Good,
    Ok,
    Warning,
    Critical,
    Unknown,
    NoBenchmark,
}

impl Rating {
    pub fn needs_attention(self) -> bool {
        matches!(self, Rating::Warning | Rating::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

pub(crate) fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round() / scale
}

/// `part / whole`, or 0 when `whole` is 0.
pub(crate) fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}

/// Decode a JSON input file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("decoding {}", path.display()))?;
    debug!(path = %path.display(), "loaded benchmark input");
    Ok(value)
}
