//! Section orchestration.
//!
//! The visual order of the page is data: [`SECTIONS`] pairs each section
//! with its projection and [`RenderConfig::sections`](crate::RenderConfig)
//! picks the order the [`Renderer`] walks.

pub mod sections;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::ResumeData;
use crate::view::View;
use crate::{Error, FailurePolicy, RenderConfig, Result};

pub use sections::{
    render_certifications, render_education, render_experience, render_languages,
    render_personal_info, render_profile, render_projects, render_skills,
};

/// A projection from the whole record onto the view
pub type Projection = fn(&ResumeData, &mut dyn View) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PersonalInfo,
    Profile,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
}

/// Every section with its projection, in page order
pub const SECTIONS: [(Section, Projection); 8] = [
    (Section::PersonalInfo, project_personal_info as Projection),
    (Section::Profile, project_profile as Projection),
    (Section::Experience, project_experience as Projection),
    (Section::Education, project_education as Projection),
    (Section::Skills, project_skills as Projection),
    (Section::Projects, project_projects as Projection),
    (Section::Certifications, project_certifications as Projection),
    (Section::Languages, project_languages as Projection),
];

impl Section {
    /// Page order
    pub const ALL: [Section; 8] = [
        Section::PersonalInfo,
        Section::Profile,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
        Section::Languages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::PersonalInfo => "personal_info",
            Section::Profile => "profile",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Languages => "languages",
        }
    }

    /// Element ids this section writes to
    pub fn mount_points(self) -> &'static [&'static str] {
        use self::sections::*;
        match self {
            Section::PersonalInfo => &[NAME, TITLE, EMAIL, PHONE, LINKEDIN, GITHUB, LOCATION],
            Section::Profile => &[PROFILE],
            Section::Experience => &[EXPERIENCE_CONTAINER],
            Section::Education => &[EDUCATION_CONTAINER],
            Section::Skills => &[SKILLS_CONTAINER],
            Section::Projects => &[PROJECTS_CONTAINER],
            Section::Certifications => &[CERTIFICATIONS_LIST],
            Section::Languages => &[LANGUAGES_CONTAINER],
        }
    }

    pub fn projection(self) -> Projection {
        SECTIONS[self as usize].1
    }

    /// Project this section of `data` onto `view`
    pub fn render(self, data: &ResumeData, view: &mut dyn View) -> Result<()> {
        (self.projection())(data, view)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn project_personal_info(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_personal_info(&data.personal_info, view)
}

fn project_profile(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_profile(&data.profile, view)
}

fn project_experience(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_experience(&data.experience, view)
}

fn project_education(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_education(&data.education, view)
}

fn project_skills(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_skills(&data.skills, view)
}

fn project_projects(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_projects(&data.projects, view)
}

fn project_certifications(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_certifications(&data.certifications, view)
}

fn project_languages(data: &ResumeData, view: &mut dyn View) -> Result<()> {
    render_languages(&data.languages, view)
}

/// Outcome of one pass over the configured sections
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Sections that now reflect the data, in render order
    pub rendered: Vec<Section>,
    /// Sections that failed under [`FailurePolicy::Isolate`]
    pub failed: Vec<(Section, Error)>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the configured sections over a view
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.check()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render every configured section once, in order.
    ///
    /// With `validate` set the record is checked first and nothing is
    /// written if it is malformed. Section failures either abort the pass
    /// (`Error::SectionFailed`) or are collected in the report, depending on
    /// the failure policy.
    pub fn render(&self, data: &ResumeData, view: &mut dyn View) -> Result<RenderReport> {
        if self.config.validate {
            data.validate()?;
        }

        let mut report = RenderReport::default();
        for &section in &self.config.sections {
            match section.render(data, view) {
                Ok(()) => {
                    log::debug!("rendered section {}", section);
                    report.rendered.push(section);
                }
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        log::error!("section {} failed, aborting render: {}", section, e);
                        return Err(Error::SectionFailed {
                            section: section.to_string(),
                            source: Box::new(e),
                        });
                    }
                    FailurePolicy::Isolate => {
                        log::warn!("section {} failed: {}", section, e);
                        report.failed.push((section, e));
                    }
                },
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::page::DEFAULT_TEMPLATE;

    #[test]
    fn table_matches_section_order() {
        for (i, (section, _)) in SECTIONS.iter().enumerate() {
            assert_eq!(Section::ALL[i], *section);
            assert_eq!(*section as usize, i);
        }
    }

    #[test]
    fn default_template_has_every_mount_point() {
        let doc = Document::parse_html(DEFAULT_TEMPLATE).unwrap();
        for section in Section::ALL {
            for id in section.mount_points() {
                assert!(doc.get_element_by_id(id).is_some(), "missing #{}", id);
            }
        }
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let data = ResumeData::bundled().unwrap();
        let mut doc = Document::parse_html(
            "<html><body><p id=\"profile\"></p><ul id=\"certifications-list\"></ul></body></html>",
        )
        .unwrap();
        let renderer = Renderer::new(RenderConfig {
            sections: vec![Section::Profile, Section::Skills, Section::Certifications],
            ..Default::default()
        })
        .unwrap();

        let err = renderer.render(&data, &mut doc).unwrap_err();
        assert!(err.is_missing_mount_point());
        assert!(err.to_string().starts_with("Section 'skills' failed"));
        let certs = doc.get_element_by_id("certifications-list").unwrap();
        assert!(doc.children(certs).unwrap().is_empty());
    }

    #[test]
    fn isolate_policy_renders_remaining_sections() {
        let data = ResumeData::bundled().unwrap();
        let mut doc = Document::parse_html(
            "<html><body><p id=\"profile\"></p><ul id=\"certifications-list\"></ul></body></html>",
        )
        .unwrap();
        let renderer = Renderer::new(RenderConfig {
            failure_policy: FailurePolicy::Isolate,
            sections: vec![Section::Profile, Section::Skills, Section::Certifications],
            ..Default::default()
        })
        .unwrap();

        let report = renderer.render(&data, &mut doc).unwrap();
        assert_eq!(report.rendered, vec![Section::Profile, Section::Certifications]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, Section::Skills);
        assert!(!report.is_complete());
    }

    #[test]
    fn invalid_data_is_rejected_before_any_write() {
        let mut data = ResumeData::bundled().unwrap();
        data.personal_info.github = "javascript:alert(1)".into();
        let mut doc = Document::parse_html(DEFAULT_TEMPLATE).unwrap();
        let before = doc.to_html();

        let renderer = Renderer::new(RenderConfig::default()).unwrap();
        assert!(matches!(
            renderer.render(&data, &mut doc),
            Err(Error::InvalidData(_))
        ));
        assert_eq!(doc.to_html(), before);
    }
}
