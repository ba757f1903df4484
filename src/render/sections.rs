//! One projection routine per résumé section.
//!
//! Every routine resolves its own mount point(s), clears them and rebuilds
//! their content from the data slice it is given. All data is written as
//! literal text; the only markup synthesized from data are the two profile
//! links, whose `href` is a re-parsed http(s) URL.

use crate::data::{
    profile_url, EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo, ProjectEntry,
    SkillGroups,
};
use crate::view::View;
use crate::Result;

pub const NAME: &str = "name";
pub const TITLE: &str = "title";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const LINKEDIN: &str = "linkedin";
pub const GITHUB: &str = "github";
pub const LOCATION: &str = "location";
pub const PROFILE: &str = "profile";
pub const EXPERIENCE_CONTAINER: &str = "experience-container";
pub const EDUCATION_CONTAINER: &str = "education-container";
pub const SKILLS_CONTAINER: &str = "skills-container";
pub const PROJECTS_CONTAINER: &str = "projects-container";
pub const CERTIFICATIONS_LIST: &str = "certifications-list";
pub const LANGUAGES_CONTAINER: &str = "languages-container";

pub const LINKEDIN_LABEL: &str = "LinkedIn";
pub const GITHUB_LABEL: &str = "Github";

/// `"{company}, {location} | {period}"`
pub fn experience_subtitle(entry: &ExperienceEntry) -> String {
    format!("{}, {} | {}", entry.company, entry.location, entry.period)
}

/// `"{institution}, {location} | {period}"`
pub fn education_subtitle(entry: &EducationEntry) -> String {
    format!("{}, {} | {}", entry.institution, entry.location, entry.period)
}

pub fn skill_items(skills: &[String]) -> String {
    skills.join(", ")
}

pub fn technologies_line(technologies: &str) -> String {
    format!("Technologies: {}", technologies)
}

/// The level is shown after the name with a leading `" - "`
pub fn language_level_label(level: &str) -> String {
    format!(" - {}", level)
}

/// Name, title, contact fields and the two profile links.
///
/// Every mount point and both URLs are checked before anything is written,
/// so a failure leaves the personal fields untouched.
pub fn render_personal_info(info: &PersonalInfo, view: &mut dyn View) -> Result<()> {
    let text_fields = [
        (NAME, info.name.as_str()),
        (TITLE, info.title.as_str()),
        (EMAIL, info.email.as_str()),
        (PHONE, info.phone.as_str()),
        (LOCATION, info.location.as_str()),
    ];
    let mut text_targets = Vec::with_capacity(text_fields.len());
    for (id, text) in text_fields {
        text_targets.push((view.mount_point(id)?, text));
    }

    let links = [
        (LINKEDIN, profile_url(&info.linkedin)?, LINKEDIN_LABEL),
        (GITHUB, profile_url(&info.github)?, GITHUB_LABEL),
    ];
    let mut link_targets = Vec::with_capacity(links.len());
    for (id, url, label) in links {
        link_targets.push((view.mount_point(id)?, url, label));
    }

    for (node, text) in text_targets {
        view.set_text_content(node, text)?;
    }

    for (region, url, label) in link_targets {
        view.clear_children(region)?;
        let a = view.create_element("a");
        view.set_attribute(a, "href", url.as_str())?;
        view.set_attribute(a, "target", "_blank")?;
        view.set_attribute(a, "rel", "noopener noreferrer")?;
        view.set_text_content(a, label)?;
        view.append_child(region, a)?;
    }
    Ok(())
}

pub fn render_profile(profile: &str, view: &mut dyn View) -> Result<()> {
    let region = view.mount_point(PROFILE)?;
    view.set_text_content(region, profile)
}

/// One `experience-item` per entry. An entry without achievements still
/// gets its (empty) list.
pub fn render_experience(entries: &[ExperienceEntry], view: &mut dyn View) -> Result<()> {
    let region = view.claim_region(EXPERIENCE_CONTAINER)?;

    for exp in entries {
        let item = view.create_with_class("div", "experience-item", None)?;
        let header = view.create_with_class("div", "experience-header", None)?;
        let job_title = view.create_with_class("div", "job-title", Some(&exp.position))?;
        let company_info =
            view.create_with_class("div", "company-info", Some(&experience_subtitle(exp)))?;
        view.append_child(header, job_title)?;
        view.append_child(header, company_info)?;

        let achievements = view.create_element("ul");
        for achievement in &exp.achievements {
            let li = view.create_with_class("li", "", Some(achievement))?;
            view.append_child(achievements, li)?;
        }

        view.append_child(item, header)?;
        view.append_child(item, achievements)?;
        view.append_child(region, item)?;
    }
    Ok(())
}

pub fn render_education(entries: &[EducationEntry], view: &mut dyn View) -> Result<()> {
    let region = view.claim_region(EDUCATION_CONTAINER)?;

    for edu in entries {
        let item = view.create_with_class("div", "education-item", None)?;
        let degree = view.create_with_class("div", "degree-title", Some(&edu.degree))?;
        let institution =
            view.create_with_class("div", "institution-info", Some(&education_subtitle(edu)))?;
        view.append_child(item, degree)?;
        view.append_child(item, institution)?;

        if let Some(additional) = edu.additional_line() {
            let line = view.create_with_class("div", "additional-info", Some(additional))?;
            view.append_child(item, line)?;
        }

        view.append_child(region, item)?;
    }
    Ok(())
}

pub fn render_skills(skills: &SkillGroups, view: &mut dyn View) -> Result<()> {
    let region = view.claim_region(SKILLS_CONTAINER)?;
    let grid = view.create_with_class("div", "skills-grid", None)?;

    for group in skills {
        let category = view.create_with_class("div", "skill-category", None)?;
        let name = view.create_with_class("span", "skill-category-name", Some(&group.category))?;
        let items =
            view.create_with_class("span", "skill-items", Some(&skill_items(&group.skills)))?;
        view.append_child(category, name)?;
        view.append_child(category, items)?;
        view.append_child(grid, category)?;
    }

    view.append_child(region, grid)
}

pub fn render_projects(projects: &[ProjectEntry], view: &mut dyn View) -> Result<()> {
    let region = view.claim_region(PROJECTS_CONTAINER)?;

    for project in projects {
        let item = view.create_with_class("div", "project-item", None)?;
        let name = view.create_with_class("div", "project-name", Some(&project.name))?;
        let description =
            view.create_with_class("div", "project-description", Some(&project.description))?;
        let tech = view.create_with_class(
            "div",
            "project-tech",
            Some(&technologies_line(&project.technologies)),
        )?;
        view.append_child(item, name)?;
        view.append_child(item, description)?;
        view.append_child(item, tech)?;
        view.append_child(region, item)?;
    }
    Ok(())
}

pub fn render_certifications(certifications: &[String], view: &mut dyn View) -> Result<()> {
    let list = view.claim_region(CERTIFICATIONS_LIST)?;
    for cert in certifications {
        let li = view.create_with_class("li", "", Some(cert))?;
        view.append_child(list, li)?;
    }
    Ok(())
}

pub fn render_languages(languages: &[LanguageEntry], view: &mut dyn View) -> Result<()> {
    let region = view.claim_region(LANGUAGES_CONTAINER)?;
    let grid = view.create_with_class("div", "languages-grid", None)?;

    for lang in languages {
        let item = view.create_with_class("div", "language-item", None)?;
        let name = view.create_with_class("span", "language-name", Some(&lang.language))?;
        let level = view.create_with_class(
            "span",
            "language-level",
            Some(&language_level_label(&lang.level)),
        )?;
        view.append_child(item, name)?;
        view.append_child(item, level)?;
        view.append_child(grid, item)?;
    }

    view.append_child(region, grid)
}
