// src/output.rs

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tracing::info;

/// Write `value` as pretty JSON. Written to a dot-prefixed tmp file next to
/// `path` first, then renamed over it, so readers never see half a file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out.json".to_string());
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    // pretty-print with a trailing newline
    serde_json::to_writer_pretty(&mut tmp, value).context("serializing JSON")?;
    tmp.write_all(b"\n")?;
    drop(tmp);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;

    info!(path = %path.display(), "wrote JSON");
    Ok(())
}

/// Pretty JSON to `path`, or to stdout when no path is given.
pub fn emit_json<T: Serialize + ?Sized>(path: Option<&Path>, value: &T) -> Result<()> {
    match path {
        Some(p) => write_json(p, value),
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, value).context("serializing JSON")?;
            out.write_all(b"\n")?;
            Ok(())
        }
    }
}
