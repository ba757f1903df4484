//! Résumé data record.
//!
//! The record is plain data: it is deserialized once (from JSON shaped like
//! the page's configuration object), validated, and then only read.
//!
//! Malformed records fail fast. Missing required keys are rejected by the
//! deserializer and [`ResumeData::validate`] rejects blank required values
//! and profile links that are not absolute `http`/`https` URLs.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// The sample résumé shipped with the crate
pub const BUNDLED_RESUME_JSON: &str = include_str!("../data/resume.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    pub location: String,
    pub period: String,
    /// Display order is list order
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
}

impl EducationEntry {
    /// The extra line to show, if any. Blank values count as absent.
    pub fn additional_line(&self) -> Option<&str> {
        self.additional
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// One skill category and its labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<String>,
}

/// Skill categories in insertion order, keyed by unique category name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillGroups(Vec<SkillGroup>);

impl SkillGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category at the end. Category names are unique.
    pub fn push(&mut self, category: impl Into<String>, skills: Vec<String>) -> Result<()> {
        let category = category.into();
        if self.get(&category).is_some() {
            return Err(Error::InvalidData(format!(
                "duplicate skill category '{}'",
                category
            )));
        }
        self.0.push(SkillGroup { category, skills });
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.skills.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a SkillGroups {
    type Item = &'a SkillGroup;
    type IntoIter = std::slice::Iter<'a, SkillGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for SkillGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in &self.0 {
            map.serialize_entry(&group.category, &group.skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = SkillGroups;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of skill category to a list of skills")
            }

            // Entries arrive in document order, which is the display order.
            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut groups = SkillGroups::new();
                while let Some((category, skills)) = map.next_entry::<String, Vec<String>>()? {
                    groups
                        .push(category, skills)
                        .map_err(|e| <A::Error as de::Error>::custom(e))?;
                }
                Ok(groups)
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    /// Shown verbatim; a list in the source is joined with ", "
    #[serde(deserialize_with = "technologies_text")]
    pub technologies: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Technologies {
    Text(String),
    List(Vec<String>),
}

fn technologies_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(match Technologies::deserialize(deserializer)? {
        Technologies::Text(s) => s,
        Technologies::List(items) => items.join(", "),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    #[serde(rename = "lang")]
    pub language: String,
    pub level: String,
}

/// The complete résumé
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub profile: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: SkillGroups,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<String>,
    pub languages: Vec<LanguageEntry>,
}

impl ResumeData {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a record from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::LoadError(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::LoadError(format!("{}: {}", path.display(), e)))
    }

    /// The sample résumé shipped in `data/resume.json`
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_RESUME_JSON)
    }

    /// Check every required value. All problems are reported at once.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let p = &self.personal_info;
        for (field, value) in [
            ("personalInfo.name", &p.name),
            ("personalInfo.title", &p.title),
            ("personalInfo.email", &p.email),
            ("personalInfo.phone", &p.phone),
            ("personalInfo.location", &p.location),
        ] {
            require(&mut problems, field, value);
        }
        for (field, value) in [
            ("personalInfo.linkedin", &p.linkedin),
            ("personalInfo.github", &p.github),
        ] {
            if let Err(e) = profile_url(value) {
                problems.push(format!("{}: {}", field, e));
            }
        }

        require(&mut problems, "profile", &self.profile);

        for (i, e) in self.experience.iter().enumerate() {
            require(&mut problems, &format!("experience[{}].position", i), &e.position);
            require(&mut problems, &format!("experience[{}].company", i), &e.company);
            require(&mut problems, &format!("experience[{}].location", i), &e.location);
            require(&mut problems, &format!("experience[{}].period", i), &e.period);
        }

        for (i, e) in self.education.iter().enumerate() {
            require(&mut problems, &format!("education[{}].degree", i), &e.degree);
            require(&mut problems, &format!("education[{}].institution", i), &e.institution);
            require(&mut problems, &format!("education[{}].location", i), &e.location);
            require(&mut problems, &format!("education[{}].period", i), &e.period);
        }

        for group in &self.skills {
            require(&mut problems, "skills category", &group.category);
            for (i, skill) in group.skills.iter().enumerate() {
                require(&mut problems, &format!("skills[{}][{}]", group.category, i), skill);
            }
        }

        for (i, pr) in self.projects.iter().enumerate() {
            require(&mut problems, &format!("projects[{}].name", i), &pr.name);
            require(&mut problems, &format!("projects[{}].description", i), &pr.description);
            require(&mut problems, &format!("projects[{}].technologies", i), &pr.technologies);
        }

        for (i, cert) in self.certifications.iter().enumerate() {
            require(&mut problems, &format!("certifications[{}]", i), cert);
        }

        for (i, l) in self.languages.iter().enumerate() {
            require(&mut problems, &format!("languages[{}].lang", i), &l.language);
            require(&mut problems, &format!("languages[{}].level", i), &l.level);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidData(problems.join("; ")))
        }
    }
}

fn require(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{} is empty", field));
    }
}

/// Parse a profile link. Only absolute `http`/`https` URLs with a host are
/// accepted, so `javascript:` and similar schemes never reach an `href`.
pub fn profile_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::InvalidData(format!("'{}' is not a valid URL ({})", raw, e)))?;
    if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() {
        Ok(url)
    } else {
        Err(Error::InvalidData(format!(
            "'{}' must be an absolute http(s) URL",
            raw
        )))
    }
}
