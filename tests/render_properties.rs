//! End-to-end checks of the rendered page, read back with a real HTML parser.

use cvrender::{
    render_to_html, Document, Page, RenderConfig, Renderer, ResumeData, DEFAULT_TEMPLATE,
};
use scraper::{Html, Selector};

fn record(overrides: serde_json::Value) -> ResumeData {
    let mut base = serde_json::json!({
        "personalInfo": {
            "name": "Ada Lovelace",
            "title": "Analyst",
            "email": "ada@example.com",
            "phone": "+44 1",
            "linkedin": "https://example.com/x",
            "github": "https://example.com/ada",
            "location": "London"
        },
        "profile": "Writes programs.",
        "experience": [],
        "education": [],
        "skills": {},
        "projects": [],
        "certifications": [],
        "languages": []
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(base).expect("fixture record")
}

fn render(data: ResumeData) -> Html {
    let html = render_to_html(DEFAULT_TEMPLATE, data, RenderConfig::default()).expect("render");
    Html::parse_document(&html)
}

fn texts(doc: &Html, selector: &str) -> Vec<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel).map(|e| e.text().collect::<String>()).collect()
}

#[test]
fn personal_links_open_in_new_context_without_leaks() {
    let doc = render(record(serde_json::json!({})));
    let sel = Selector::parse("#linkedin a").unwrap();
    let links: Vec<_> = doc.select(&sel).collect();
    assert_eq!(links.len(), 1);

    let a = links[0].value();
    assert_eq!(a.attr("href"), Some("https://example.com/x"));
    assert_eq!(a.attr("target"), Some("_blank"));
    let rel: Vec<&str> = a.attr("rel").unwrap().split_whitespace().collect();
    assert!(rel.contains(&"noopener"));
    assert!(rel.contains(&"noreferrer"));
    assert_eq!(texts(&doc, "#linkedin a"), vec!["LinkedIn"]);
    assert_eq!(texts(&doc, "#github a"), vec!["Github"]);
    assert_eq!(texts(&doc, "#name"), vec!["Ada Lovelace"]);
    assert_eq!(texts(&doc, "#location"), vec!["London"]);
}

#[test]
fn profile_markup_is_rendered_as_text() {
    let payload = "<script>alert('x')</script><b>bold</b>";
    let doc = render(record(serde_json::json!({ "profile": payload })));
    assert_eq!(texts(&doc, "#profile"), vec![payload]);
    assert!(texts(&doc, "#profile script").is_empty());
    assert!(texts(&doc, "#profile b").is_empty());
    assert!(texts(&doc, "script").is_empty());
}

#[test]
fn quotes_in_urls_cannot_break_the_attribute() {
    let doc = render(record(serde_json::json!({
        "personalInfo": {
            "name": "A", "title": "T", "email": "e", "phone": "p", "location": "l",
            "linkedin": "https://example.com/a\"onmouseover=\"alert(1)",
            "github": "https://example.com/b"
        }
    })));
    let sel = Selector::parse("#linkedin a").unwrap();
    let a = doc.select(&sel).next().unwrap().value();
    assert!(a.attr("onmouseover").is_none());
    assert!(a.attr("href").unwrap().starts_with("https://example.com/a"));
}

#[test]
fn experience_blocks_follow_array_order() {
    let doc = render(record(serde_json::json!({
        "experience": [
            {
                "position": "Lead", "company": "Acme", "location": "Lima, Peru",
                "period": "2020-2022", "achievements": ["first", "second"]
            },
            {
                "position": "Junior", "company": "Initech", "location": "Austin",
                "period": "2018-2020", "achievements": []
            }
        ]
    })));
    assert_eq!(texts(&doc, ".job-title"), vec!["Lead", "Junior"]);
    assert_eq!(
        texts(&doc, ".company-info"),
        vec!["Acme, Lima, Peru | 2020-2022", "Initech, Austin | 2018-2020"]
    );
    assert_eq!(texts(&doc, ".experience-item:nth-child(1) li"), vec!["first", "second"]);
    // The empty list is present, not omitted
    assert_eq!(texts(&doc, ".experience-item:nth-child(2) ul"), vec![""]);
    assert!(texts(&doc, ".experience-item:nth-child(2) li").is_empty());
}

#[test]
fn education_additional_line_only_when_present() {
    let doc = render(record(serde_json::json!({
        "education": [
            { "degree": "CS", "institution": "UNI", "location": "Lima", "period": "2014", "additional": "X" },
            { "degree": "Cert", "institution": "AWS", "location": "Online", "period": "2023" }
        ]
    })));
    assert_eq!(texts(&doc, ".education-item:nth-child(1) .additional-info"), vec!["X"]);
    assert!(texts(&doc, ".education-item:nth-child(2) .additional-info").is_empty());
    assert_eq!(
        texts(&doc, ".institution-info"),
        vec!["UNI, Lima | 2014", "AWS, Online | 2023"]
    );
}

#[test]
fn skills_projects_certifications_languages() {
    let doc = render(record(serde_json::json!({
        "skills": { "Cloud": ["AWS", "Azure"] },
        "projects": [
            { "name": "P", "description": "D", "technologies": "Rust, Serde" }
        ],
        "certifications": ["CKA", "Terraform Associate"],
        "languages": [ { "lang": "English", "level": "Advanced (C1)" } ]
    })));
    assert_eq!(texts(&doc, ".skill-category-name"), vec!["Cloud"]);
    assert_eq!(texts(&doc, ".skill-items"), vec!["AWS, Azure"]);
    assert_eq!(texts(&doc, ".project-tech"), vec!["Technologies: Rust, Serde"]);
    assert_eq!(texts(&doc, "#certifications-list li"), vec!["CKA", "Terraform Associate"]);
    assert_eq!(texts(&doc, ".language-name"), vec!["English"]);
    assert_eq!(texts(&doc, ".language-level"), vec![" - Advanced (C1)"]);
}

#[test]
fn rendering_twice_matches_rendering_once() {
    let data = ResumeData::bundled().unwrap();
    let renderer = Renderer::new(RenderConfig::default()).unwrap();

    let mut once = Document::parse_html(DEFAULT_TEMPLATE).unwrap();
    renderer.render(&data, &mut once).unwrap();

    let mut twice = Document::parse_html(DEFAULT_TEMPLATE).unwrap();
    renderer.render(&data, &mut twice).unwrap();
    renderer.render(&data, &mut twice).unwrap();

    assert_eq!(once.to_html(), twice.to_html());
    assert_eq!(once.node_count(), twice.node_count());
    assert_eq!(once.digest(), twice.digest());
}

#[test]
fn prior_region_content_is_replaced() {
    let template = DEFAULT_TEMPLATE.replace(
        "<ul id=\"certifications-list\"></ul>",
        "<ul id=\"certifications-list\"><li>stale</li><li>entries</li></ul>",
    );
    let data = record(serde_json::json!({ "certifications": ["fresh"] }));
    let mut page = Page::new(&template, data, RenderConfig::default()).unwrap();
    page.dom_content_loaded().unwrap();

    let doc = Html::parse_document(&page.to_html());
    assert_eq!(texts(&doc, "#certifications-list li"), vec!["fresh"]);
}

#[test]
fn missing_mount_point_surfaces_an_error() {
    let template = DEFAULT_TEMPLATE.replace("id=\"languages-container\"", "id=\"langs\"");
    let data = ResumeData::bundled().unwrap();
    let err = render_to_html(&template, data, RenderConfig::default()).unwrap_err();
    assert!(err.is_missing_mount_point());
    assert!(err.to_string().contains("languages-container"));
}
