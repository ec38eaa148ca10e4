// src/report/mod.rs
//
// Static HTML pages built by placeholder substitution. Templates are plain
// HTML files containing `{{DATA}}`, `{{THEME_CSS}}` and `{{GENERATED_AT}}`.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, warn};

use crate::error::VizError;

/// The nine single-chart pages, written under the same file name.
pub const INDIVIDUAL_TEMPLATES: &[&str] = &[
    "network-clusters.html",
    "company-categories.html",
    "relationship-tiers.html",
    "invitation-trends.html",
    "inbox-classification.html",
    "career-strata.html",
    "high-value-messages.html",
    "ad-targeting.html",
    "summary-stats.html",
];

pub const DASHBOARD_TEMPLATE: &str = "dashboard.html";

const ASSETS_DIR: &str = "assets";

/// Read a template file.
pub fn load_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(VizError::TemplateNotFound(path.to_path_buf()).into());
    }
    fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}

/// CSS from `path`, or an empty string when no theme is given or the file
/// does not exist.
pub fn read_theme(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p.exists() => {
            fs::read_to_string(p).with_context(|| format!("reading theme {}", p.display()))
        }
        Some(p) => {
            warn!(path = %p.display(), "theme not found, using no theme CSS");
            Ok(String::new())
        }
        None => Ok(String::new()),
    }
}

/// Fill every placeholder in `template`. Data is embedded as compact JSON.
pub fn inject_data<T: Serialize + ?Sized>(
    template: &str,
    data: &T,
    theme_css: &str,
    generated_at: NaiveDateTime,
) -> Result<String> {
    let json = serde_json::to_string(data).context("serializing page data")?;
    Ok(template
        .replace("{{DATA}}", &json)
        .replace("{{THEME_CSS}}", theme_css)
        .replace(
            "{{GENERATED_AT}}",
            &generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        ))
}

/// Shared inputs for one render.
pub struct Render<'a, T: Serialize + ?Sized> {
    pub template_dir: &'a Path,
    pub output_dir: &'a Path,
    pub data: &'a T,
    pub theme_css: &'a str,
    pub generated_at: NaiveDateTime,
}

impl<T: Serialize + ?Sized> Render<'_, T> {
    fn render_page(&self, template_name: &str) -> Result<PathBuf> {
        let template = load_template(&self.template_dir.join(template_name))?;
        let html = inject_data(&template, self.data, self.theme_css, self.generated_at)?;
        let out = self.output_dir.join(template_name);
        fs::write(&out, html).with_context(|| format!("writing {}", out.display()))?;
        Ok(out)
    }
}

/// Write every individual page whose template exists. Missing templates and
/// failed writes are logged and skipped.
pub fn generate_individual<T: Serialize + ?Sized>(render: &Render<'_, T>) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(render.output_dir)
        .with_context(|| format!("creating {}", render.output_dir.display()))?;

    let mut written = Vec::new();
    for name in INDIVIDUAL_TEMPLATES {
        let template_path = render.template_dir.join(name);
        if !template_path.is_file() {
            warn!(template = %template_path.display(), "template not found, skipping");
            continue;
        }
        match render.render_page(name) {
            Ok(path) => {
                debug!(path = %path.display(), "generated page");
                written.push(path);
            }
            Err(e) => error!(page = name, error = %e, "failed to generate page"),
        }
    }

    info!(pages = written.len(), "generated individual pages");
    Ok(written)
}

/// Write `dashboard.html`. A missing dashboard template is an error.
pub fn generate_dashboard<T: Serialize + ?Sized>(render: &Render<'_, T>) -> Result<PathBuf> {
    fs::create_dir_all(render.output_dir)
        .with_context(|| format!("creating {}", render.output_dir.display()))?;
    let path = render.render_page(DASHBOARD_TEMPLATE)?;
    info!(path = %path.display(), "generated dashboard");
    Ok(path)
}

/// Replace `dst` with a recursive copy of `src`.
pub fn copy_assets(src: &Path, dst: &Path) -> Result<usize> {
    if dst.exists() {
        fs::remove_dir_all(dst).with_context(|| format!("removing {}", dst.display()))?;
    }
    fs::create_dir_all(dst).with_context(|| format!("creating {}", dst.display()))?;

    // the source dir itself must match literally
    let pattern = Path::new(&glob::Pattern::escape(&src.to_string_lossy()))
        .join("**")
        .join("*");
    let mut copied = 0;
    for entry in glob::glob(&pattern.to_string_lossy()).context("bad assets glob")? {
        let from = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "unreadable asset entry");
                continue;
            }
        };
        let rel = from.strip_prefix(src).with_context(|| {
            format!("{} is outside {}", from.display(), src.display())
        })?;
        let to = dst.join(rel);
        if from.is_dir() {
            fs::create_dir_all(&to).with_context(|| format!("creating {}", to.display()))?;
        } else {
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&from, &to)
                .with_context(|| format!("copying {} -> {}", from.display(), to.display()))?;
            copied += 1;
        }
    }

    info!(files = copied, dst = %dst.display(), "copied assets");
    Ok(copied)
}

/// Paths written by [`generate_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Generated {
    pub individual: Vec<PathBuf>,
    pub dashboard: Option<PathBuf>,
}

/// Assets, individual pages, then the dashboard. A missing dashboard template
/// is logged and leaves `dashboard` empty.
pub fn generate_all<T: Serialize + ?Sized>(render: &Render<'_, T>) -> Result<Generated> {
    fs::create_dir_all(render.output_dir)
        .with_context(|| format!("creating {}", render.output_dir.display()))?;

    let assets = render.template_dir.join(ASSETS_DIR);
    if assets.is_dir() {
        copy_assets(&assets, &render.output_dir.join(ASSETS_DIR))?;
    }

    let individual = generate_individual(render)?;
    let dashboard = match generate_dashboard(render) {
        Ok(p) => Some(p),
        Err(e) => {
            error!(error = %e, "failed to generate dashboard");
            None
        }
    };

    Ok(Generated {
        individual,
        dashboard,
    })
}
