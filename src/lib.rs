//! cvrender
//!
//! Projects a structured résumé record onto a headless HTML document. A host
//! page exposes named mount points; each résumé section has a projection
//! routine that clears its mount point and rebuilds it from the record.
//!
//! # Features
//!
//! - **Headless view**: an arena-backed document tree parsed with `scraper`
//! - **Literal text**: record values are only ever inserted as text nodes
//! - **Ordered sections**: the page order is a table, configurable per render
//! - **Fail fast**: malformed records are rejected before anything is written
//!
//! # Example
//!
//! ```
//! use cvrender::{Page, RenderConfig, ResumeData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = ResumeData::bundled()?;
//! let mut page = Page::with_default_template(data, RenderConfig::default())?;
//! page.dom_content_loaded()?;
//! assert!(page.text_snapshot().text.contains("Certifications"));
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod data;
pub mod dom;
pub mod page;
pub mod render;
pub mod view;

pub use data::{
    EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo, ProjectEntry, ResumeData,
    SkillGroup, SkillGroups,
};
pub use dom::{Document, NodeId};
pub use page::{Page, DEFAULT_TEMPLATE};
pub use render::{RenderReport, Renderer, Section, SECTIONS};
pub use view::View;

/// What to do when one section cannot be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing section and return the error
    #[default]
    Abort,
    /// Log the failure, record it in the report and keep going
    Isolate,
}

/// Configuration for a render pass
///
/// The defaults validate the record up front, abort on the first failing
/// section and render every section in page order.
///
/// # Examples
///
/// ```
/// let cfg = cvrender::RenderConfig::default();
/// assert!(cfg.validate);
/// assert_eq!(cfg.sections.len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Behaviour when a section fails
    pub failure_policy: FailurePolicy,
    /// Validate the record before rendering anything
    pub validate: bool,
    /// Sections to render, in visual order
    pub sections: Vec<Section>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            validate: true,
            sections: Section::ALL.to_vec(),
        }
    }
}

impl RenderConfig {
    /// Read a JSON config file; omitted keys keep their defaults
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.check()?;
        Ok(config)
    }

    /// Each section may appear at most once
    pub fn check(&self) -> Result<()> {
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].contains(section) {
                return Err(Error::ConfigError(format!(
                    "section '{}' listed more than once",
                    section
                )));
            }
        }
        Ok(())
    }
}

/// A textual snapshot of a rendered page
///
/// Returned by [`Document::text_snapshot`]; handy for tests and quick
/// inspection from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    /// Contents of `<title>`
    pub title: String,
    /// Visible body text, one line per block element
    pub text: String,
}

/// Render `data` into `template` and return the resulting HTML
pub fn render_to_html(template: &str, data: ResumeData, config: RenderConfig) -> Result<String> {
    let mut page = Page::new(template, data, config)?;
    page.dom_content_loaded()?;
    Ok(page.to_html())
}
