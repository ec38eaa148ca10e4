use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid non-alphanumeric regex"));

/// Drop a leading UTF-8 byte-order mark, which Excel-touched exports carry.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Skip the first `n` lines, keeping line endings of the rest. `\n`, `\r\n`
/// and a lone `\r` all end a line. Files with `n` lines or fewer are
/// returned whole.
pub fn skip_lines(text: &str, n: usize) -> String {
    let bytes = text.as_bytes();
    let mut skipped = 0;
    let mut i = 0;
    while skipped < n && i < bytes.len() {
        match bytes[i] {
            b'\n' => skipped += 1,
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                skipped += 1;
            }
            _ => {}
        }
        i += 1;
    }
    if skipped == n && i < bytes.len() {
        text[i..].to_string()
    } else {
        text.to_string()
    }
}

/// Ad-targeting column name → snake_case key.
///  - `"Member Interests"` → `"interests"`
///  - `"Job Titles"` → `"job_titles"`
pub fn normalize_ad_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase().replace("member ", "");
    NON_ALNUM
        .replace_all(&key, "_")
        .trim_matches('_')
        .to_string()
}

/// Split a `;`-separated cell into trimmed, non-empty items.
pub fn split_multi(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
