//! Typed shapes of the built-in content domains.
//!
//! Documents travel as untyped JSON trees, but every built-in domain has exactly one
//! accepted shape. Unknown fields are rejected so a typo in an admin form cannot silently
//! create data the site never renders.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HomepageContent {
    pub hero: Hero,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub subsidiaries: Vec<Subsidiary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
}

/// A headline statistic (`"120+" projects delivered`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Achievement {
    pub label: String,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Subsidiary {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BusinessPageContent {
    pub title: String,
    pub intro: String,
    #[serde(default)]
    pub divisions: Vec<Division>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Division {
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SupportPageContent {
    pub title: String,
    pub intro: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Contact {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewsContent {
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Publication date, `YYYY-MM-DD`.
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectsContent {
    #[serde(default)]
    pub items: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub client: String,
    pub year: u16,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn homepage_accepts_camel_case() {
        let page: HomepageContent = serde_json::from_value(json!({
            "hero": { "title": "T", "subtitle": "S", "ctaLabel": "Go" },
            "achievements": [{ "label": "Projects", "value": 120, "suffix": "+" }]
        }))
        .unwrap();
        assert_eq!(page.hero.cta_label.as_deref(), Some("Go"));
        assert!(page.subsidiaries.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<NewsContent>(json!({ "items": [], "extra": 1 }));
        assert!(result.is_err());
    }
}
