//! Page lifecycle: a host document, a record and a one-shot ready trigger.

use crate::data::ResumeData;
use crate::dom::Document;
use crate::render::{RenderReport, Renderer};
use crate::{Error, RenderConfig, Result, TextSnapshot};

/// Host page bundled with the crate; exposes every mount point
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/index.html");

/// A résumé page.
///
/// Content is projected when [`Page::dom_content_loaded`] fires. The first
/// successful call renders every configured section; later calls return the
/// stored report and leave the document alone.
pub struct Page {
    document: Document,
    data: ResumeData,
    renderer: Renderer,
    report: Option<RenderReport>,
}

impl Page {
    pub fn new(template: &str, data: ResumeData, config: RenderConfig) -> Result<Self> {
        if template.trim().is_empty() {
            return Err(Error::TemplateError("host document is empty".into()));
        }
        Ok(Self {
            document: Document::parse_html(template)?,
            data,
            renderer: Renderer::new(config)?,
            report: None,
        })
    }

    /// Page backed by [`DEFAULT_TEMPLATE`]
    pub fn with_default_template(data: ResumeData, config: RenderConfig) -> Result<Self> {
        Self::new(DEFAULT_TEMPLATE, data, config)
    }

    /// The "document ready" trigger.
    ///
    /// A render that fails leaves the page not ready, so the trigger can be
    /// fired again once the host document has been fixed.
    pub fn dom_content_loaded(&mut self) -> Result<&RenderReport> {
        let report = match self.report.take() {
            Some(report) => {
                log::debug!("page already rendered; ignoring ready trigger");
                report
            }
            None => {
                let report = self.renderer.render(&self.data, &mut self.document)?;
                log::info!(
                    "page ready: {} sections rendered, {} failed",
                    report.rendered.len(),
                    report.failed.len()
                );
                report
            }
        };
        let report: &RenderReport = self.report.insert(report);
        Ok(report)
    }

    pub fn is_ready(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&RenderReport> {
        self.report.as_ref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the host document, e.g. to repair a mount point
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn data(&self) -> &ResumeData {
        &self.data
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    pub fn text_snapshot(&self) -> TextSnapshot {
        self.document.text_snapshot()
    }
}
