// src/export/mod.rs

pub mod date_parser;
pub mod readers;
pub mod types;
pub mod utils;

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info};

use crate::error::VizError;

pub use date_parser::parse_date;
pub use readers::{
    parse_ad_targeting, parse_company_follows, parse_connections, parse_inferences,
    parse_invitations, parse_messages,
};
pub use types::{
    AdTargeting, CompanyFollow, Connection, Direction, Export, Inference, Invitation, Message,
};

/// File names LinkedIn has used for each export file, in lookup order.
pub const CONNECTIONS_FILES: &[&str] = &["Connections.csv", "connections.csv"];
pub const MESSAGES_FILES: &[&str] = &["messages.csv", "Messages.csv"];
pub const INVITATIONS_FILES: &[&str] =
    &["Invitations.csv", "invitations.csv", "Sent Invitations.csv"];
pub const COMPANY_FOLLOWS_FILES: &[&str] = &[
    "Company Follows.csv",
    "Company_Follows.csv",
    "company_follows.csv",
];
pub const INFERENCES_FILES: &[&str] = &[
    "Inferences_about_you.csv",
    "Inferences.csv",
    "inferences.csv",
];
pub const AD_TARGETING_FILES: &[&str] =
    &["Ad_Targeting.csv", "Ad Targeting.csv", "ad_targeting.csv"];

/// First candidate that exists under `folder`.
pub fn find_file(folder: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| folder.join(name))
        .find(|p| p.exists())
}

/// Parse every known export file in `folder`. Files that are absent simply
/// leave their section empty; a missing folder yields an empty export.
pub fn parse_all(folder: &Path) -> Export {
    if !folder.is_dir() {
        error!(folder = %folder.display(), "export folder does not exist");
        return Export::default();
    }

    let export = Export {
        connections: find_file(folder, CONNECTIONS_FILES)
            .map(|p| parse_connections(&p))
            .unwrap_or_default(),
        messages: find_file(folder, MESSAGES_FILES)
            .map(|p| parse_messages(&p))
            .unwrap_or_default(),
        invitations: find_file(folder, INVITATIONS_FILES)
            .map(|p| parse_invitations(&p))
            .unwrap_or_default(),
        company_follows: find_file(folder, COMPANY_FOLLOWS_FILES)
            .map(|p| parse_company_follows(&p))
            .unwrap_or_default(),
        inferences: find_file(folder, INFERENCES_FILES)
            .map(|p| parse_inferences(&p))
            .unwrap_or_default(),
        ad_targeting: find_file(folder, AD_TARGETING_FILES)
            .map(|p| parse_ad_targeting(&p))
            .unwrap_or_default(),
    };

    info!(counts = ?export.counts(), "parsed LinkedIn export");
    export
}

/// Load an export either from a folder of CSVs or from the JSON written by
/// `linkviz parse`.
pub fn load_export(input: &Path) -> Result<Export> {
    if input.is_dir() {
        return Ok(parse_all(input));
    }
    if input.extension().and_then(|e| e.to_str()) == Some("json") {
        let text = fs::read_to_string(input)
            .with_context(|| format!("reading parsed export {}", input.display()))?;
        let export: Export = serde_json::from_str(&text)
            .with_context(|| format!("decoding parsed export {}", input.display()))?;
        return Ok(export);
    }
    Err(VizError::InvalidInput(input.to_path_buf()).into())
}
