// src/export/readers.rs

use csv::{ReaderBuilder, StringRecord, Trim};
use std::{fs, path::Path};
use tracing::{debug, error, warn};

use super::date_parser::parse_opt_date;
use super::types::{
    AdTargeting, CompanyFollow, Connection, Direction, Inference, Invitation, Message,
};
use super::utils::{normalize_ad_key, skip_lines, split_multi, strip_bom};

/// Lines of notes LinkedIn prepends to `Connections.csv` before the header row.
pub const CONNECTIONS_PREAMBLE_LINES: usize = 3;

/// One CSV data row addressed by header name.
pub struct Row<'a> {
    headers: &'a StringRecord,
    record: StringRecord,
}

impl Row<'_> {
    /// Trimmed cell under `column`, or `None` if the column or cell is absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.record.get(idx).map(str::trim)
    }

    /// First non-empty cell among `columns`, or `""`.
    pub fn first(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .filter_map(|c| self.get(c))
            .find(|v| !v.is_empty())
            .unwrap_or("")
            .to_string()
    }

    /// Iterate `(header, cell)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().zip(self.record.iter())
    }
}

/// Read a file as UTF-8 with any BOM removed. Missing or unreadable files are
/// logged and yield `None`.
fn load_text(path: &Path, kind: &str) -> Option<String> {
    if !path.exists() {
        warn!(kind, path = %path.display(), "file not found");
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(strip_bom(&text).to_string()),
        Err(e) => {
            error!(kind, path = %path.display(), "failed to read: {}", e);
            None
        }
    }
}

/// Parse `text` as a headed CSV and map each row with `f`. Rows the CSV reader
/// rejects are logged and skipped.
fn map_rows<T>(text: &str, kind: &str, mut f: impl FnMut(&Row) -> T) -> Vec<T> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = match rdr.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            error!(kind, "failed to read header row: {}", e);
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        match record {
            Ok(record) => {
                let row = Row {
                    headers: &headers,
                    record,
                };
                out.push(f(&row));
            }
            Err(e) => warn!(kind, row = i + 1, "skipping malformed row: {}", e),
        }
    }
    debug!(kind, rows = out.len(), "parsed");
    out
}

/// `Connections.csv`; the first three lines are a notes preamble.
pub fn parse_connections(path: &Path) -> Vec<Connection> {
    let Some(text) = load_text(path, "connections") else {
        return Vec::new();
    };
    let body = skip_lines(&text, CONNECTIONS_PREAMBLE_LINES);

    map_rows(&body, "connections", |row| Connection {
        first_name: row.first(&["First Name"]),
        last_name: row.first(&["Last Name"]),
        company: row.first(&["Company"]),
        position: row.first(&["Position"]),
        connected_on: parse_opt_date(row.get("Connected On")),
        email_address: row.first(&["Email Address"]),
    })
}

/// `messages.csv`. An empty `CONVERSATION ID` becomes `None`.
pub fn parse_messages(path: &Path) -> Vec<Message> {
    let Some(text) = load_text(path, "messages") else {
        return Vec::new();
    };

    map_rows(&text, "messages", |row| {
        let conv = row.first(&["CONVERSATION ID"]);
        let date = row.first(&["DATE", "Date"]);
        Message {
            conversation_id: (!conv.is_empty()).then_some(conv),
            sender: row.first(&["FROM", "SENDER PROFILE URL", "Sender"]),
            date: parse_opt_date(Some(&date)),
            subject: row.first(&["SUBJECT", "Subject"]),
            content: row.first(&["CONTENT", "Content"]),
        }
    })
}

/// Direction from the `Direction` column, falling back to "has a sender".
fn infer_direction(row: &Row) -> Direction {
    let raw = row.get("Direction").unwrap_or("").to_lowercase();
    if raw.contains("incoming") || raw.contains("inbound") {
        Direction::Inbound
    } else if raw.contains("outgoing") || raw.contains("outbound") {
        Direction::Outbound
    } else if !row.first(&["From"]).is_empty() {
        Direction::Inbound
    } else {
        Direction::Outbound
    }
}

pub fn parse_invitations(path: &Path) -> Vec<Invitation> {
    let Some(text) = load_text(path, "invitations") else {
        return Vec::new();
    };

    map_rows(&text, "invitations", |row| {
        let date = row.first(&["Sent At", "Date"]);
        Invitation {
            from_name: row.first(&["From", "From Name"]),
            to_name: row.first(&["To", "To Name"]),
            date: parse_opt_date(Some(&date)),
            direction: infer_direction(row),
            message: row.first(&["Message", "message"]),
        }
    })
}

pub fn parse_company_follows(path: &Path) -> Vec<CompanyFollow> {
    let Some(text) = load_text(path, "company_follows") else {
        return Vec::new();
    };

    map_rows(&text, "company_follows", |row| {
        let date = row.first(&["Followed On", "Date"]);
        CompanyFollow {
            company: row.first(&["Organization", "Company", "Organization Name"]),
            followed_on: parse_opt_date(Some(&date)),
        }
    })
}

pub fn parse_inferences(path: &Path) -> Vec<Inference> {
    let Some(text) = load_text(path, "inferences") else {
        return Vec::new();
    };

    map_rows(&text, "inferences", |row| Inference {
        category: row.first(&["Category", "Type"]),
        inference: row.first(&["Inference", "Description", "Type Description"]),
        description: row.first(&["Description"]),
    })
}

/// `Ad_Targeting.csv` is a single wide row whose cells hold `;`-separated
/// lists. Only the first data row is read.
pub fn parse_ad_targeting(path: &Path) -> AdTargeting {
    let Some(text) = load_text(path, "ad_targeting") else {
        return AdTargeting::new();
    };

    let mut result = AdTargeting::new();
    let rows = map_rows(&text, "ad_targeting", |row| {
        row.cells()
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (normalize_ad_key(header), split_multi(cell)))
            .collect::<Vec<_>>()
    });
    if let Some(first) = rows.into_iter().next() {
        result.extend(first);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Datelike;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(content: &str) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn connections_start_after_three_junk_lines() -> Result<()> {
        let tmp = fixture(
            "\u{feff}Notes:\n\
             \"When exporting your connection data, you may notice...\"\n\
             \n\
             First Name,Last Name,URL,Email Address,Company,Position,Connected On\n\
             Ada,Lovelace,https://x,,Analytical Engines,Founder & CEO,12 Jan 2024\n\
             Grace, Hopper ,https://y,grace@navy.mil,US Navy,Rear Admiral,2019-03-01\n",
        )?;

        let conns = parse_connections(tmp.path());
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0].first_name, "Ada");
        assert_eq!(conns[0].company, "Analytical Engines");
        assert_eq!(conns[0].connected_on.map(|d| d.year()), Some(2024));
        assert_eq!(conns[1].last_name, "Hopper");
        assert_eq!(conns[1].email_address, "grace@navy.mil");
        Ok(())
    }

    #[test]
    fn connections_with_carriage_return_line_endings() -> Result<()> {
        let tmp = fixture(
            "Notes:\r\"junk\"\r\rFirst Name,Last Name,Company\rAda,Lovelace,Analytical Engines\r",
        )?;

        let conns = parse_connections(tmp.path());
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].first_name, "Ada");
        assert_eq!(conns[0].company, "Analytical Engines");
        Ok(())
    }

    #[test]
    fn missing_file_is_empty() {
        let conns = parse_connections(Path::new("/definitely/not/here/Connections.csv"));
        assert!(conns.is_empty());
        assert!(parse_ad_targeting(Path::new("/nope/Ad_Targeting.csv")).is_empty());
    }

    #[test]
    fn messages_keep_null_conversation_ids() -> Result<()> {
        let tmp = fixture(
            "CONVERSATION ID,FROM,DATE,SUBJECT,CONTENT\n\
             abc,Ada Lovelace,2024-01-12 08:30:45 UTC,Hi,\"Hello, world\"\n\
             ,Grace Hopper,garbage,,Orphan\n",
        )?;

        let msgs = parse_messages(tmp.path());
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].conversation_id.as_deref(), Some("abc"));
        assert_eq!(msgs[0].content, "Hello, world");
        assert!(msgs[0].date.is_some());
        assert_eq!(msgs[1].conversation_id, None);
        assert_eq!(msgs[1].date, None);
        Ok(())
    }

    #[test]
    fn invitation_direction_inference() -> Result<()> {
        let tmp = fixture(
            "From,To,Sent At,Message,Direction\n\
             Ada Lovelace,Me,12 Jan 2024,hi,INCOMING\n\
             Me,Grace Hopper,13 Jan 2024,,OUTGOING\n\
             Alan Turing,Me,14 Jan 2024,,\n\
             ,Someone,15 Jan 2024,,\n",
        )?;

        let invs = parse_invitations(tmp.path());
        let dirs: Vec<Direction> = invs.iter().map(|i| i.direction).collect();
        assert_eq!(
            dirs,
            vec![
                Direction::Inbound,
                Direction::Outbound,
                Direction::Inbound,
                Direction::Outbound
            ]
        );
        assert_eq!(invs[0].message, "hi");
        Ok(())
    }

    #[test]
    fn company_follows_and_inferences_use_fallback_columns() -> Result<()> {
        let follows = fixture("Organization Name,Date\nKlaviyo,3 Mar 2021\n")?;
        let f = parse_company_follows(follows.path());
        assert_eq!(f[0].company, "Klaviyo");
        assert!(f[0].followed_on.is_some());

        let inf = fixture("Type,Type Description\nInterest,Marketing\n")?;
        let i = parse_inferences(inf.path());
        assert_eq!(i[0].category, "Interest");
        assert_eq!(i[0].inference, "Marketing");
        assert_eq!(i[0].description, "");
        Ok(())
    }

    #[test]
    fn ad_targeting_reads_first_row_only() -> Result<()> {
        let tmp = fixture(
            "Member Interests,Job Titles,Skills\n\
             \"Marketing; SaaS\",Founder,\n\
             ignored,ignored,ignored\n",
        )?;

        let ads = parse_ad_targeting(tmp.path());
        assert_eq!(ads["interests"], vec!["Marketing", "SaaS"]);
        assert_eq!(ads["job_titles"], vec!["Founder"]);
        assert!(ads["skills"].is_empty());
        Ok(())
    }
}
