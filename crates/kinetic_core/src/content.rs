//! Read-only content model
//!
//! Project records are supplied by the surrounding application shell and
//! are never mutated by the engine; trackers and sliders only ever index
//! and filter them. The field set mirrors the JSON shape the content store
//! serves.

use serde::{Deserialize, Serialize};

/// A single portfolio project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Additional gallery images
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ProjectRecord {
    /// Whether the record carries the given tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Filter a project list down to records carrying `tag`. A `None` tag
/// selects everything (the gallery's "all" filter).
pub fn filter_by_tag<'a>(
    projects: &'a [ProjectRecord],
    tag: Option<&str>,
) -> Vec<&'a ProjectRecord> {
    match tag {
        None => projects.iter().collect(),
        Some(tag) => projects.iter().filter(|p| p.has_tag(tag)).collect(),
    }
}

/// Collect the distinct tags across a project list, preserving first-seen
/// order (drives the gallery's filter chips).
pub fn distinct_tags(projects: &[ProjectRecord]) -> Vec<&str> {
    let mut tags: Vec<&str> = Vec::new();
    for project in projects {
        for tag in &project.tags {
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag);
            }
        }
    }
    tags
}
