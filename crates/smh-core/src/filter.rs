//! # Material filtering
//!
//! [`FilterOptions`] is the raw query bag (`searchQuery`, `subject`,
//! `semester`, `type`) shared by the HTTP query string and client UI state.
//! [`FilterOptions::into_filter`] turns it into a typed [`MaterialFilter`];
//! storage adapters translate that predicate to their query language, and
//! the client evaluates it in memory with [`MaterialFilter::matches`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{MaterialType, Semester, StudyMaterial};

/// The `type` value that disables type filtering.
pub const ALL_TYPES: &str = "ALL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Conjunction of optional constraints. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialFilter {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Exact subject code.
    pub subject: Option<String>,
    pub semester: Option<Semester>,
    pub kind: Option<MaterialType>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl FilterOptions {
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn semester(mut self, semester: impl ToString) -> Self {
        self.semester = Some(semester.to_string());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Empty strings and `type=ALL` impose no constraint. A semester that is
    /// not an integer in 1..=8 or a type outside {PDF, VIDEO} is rejected.
    pub fn into_filter(self) -> Result<MaterialFilter> {
        let semester = non_empty(self.semester)
            .map(|s| s.parse::<Semester>())
            .transpose()?;
        let kind = non_empty(self.kind)
            .filter(|k| k != ALL_TYPES)
            .map(|k| k.parse::<MaterialType>())
            .transpose()?;

        Ok(MaterialFilter {
            search: non_empty(self.search_query),
            subject: non_empty(self.subject),
            semester,
            kind,
        })
    }
}

impl MaterialFilter {
    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }

    /// The search constraint alone: Unicode case-insensitive substring of
    /// `title` or `description`.
    pub fn matches_text(&self, title: &str, description: &str) -> bool {
        self.search.as_deref().map_or(true, |query| {
            let needle = query.to_lowercase();
            title.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
        })
    }

    pub fn matches(&self, material: &StudyMaterial) -> bool {
        let search_ok = self.matches_text(&material.title, &material.description);
        let subject_ok = self
            .subject
            .as_deref()
            .map_or(true, |subject| material.subject == subject);
        let semester_ok = self.semester.map_or(true, |s| material.semester == s);
        let kind_ok = self.kind.map_or(true, |k| material.kind == k);

        search_ok && subject_ok && semester_ok && kind_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use uuid::Uuid;

    fn material(title: &str, subject: &str, semester: i64, kind: MaterialType) -> StudyMaterial {
        StudyMaterial {
            id: Uuid::now_v7(),
            title: title.into(),
            description: "Lecture notes".into(),
            subject: subject.into(),
            semester: Semester::try_from(semester).unwrap(),
            kind,
            link: "https://example.com".into(),
            tags: vec![],
            upload_date: "2024-01-01T00:00:00.000Z".into(),
            author: "Staff".into(),
        }
    }

    #[test]
    fn test_empty_options_are_unconstrained() {
        let filter = FilterOptions {
            search_query: Some(String::new()),
            subject: Some(String::new()),
            semester: Some(String::new()),
            kind: Some("ALL".into()),
        }
        .into_filter()
        .unwrap();
        assert!(filter.is_unconstrained());
    }

    #[test]
    fn test_filter_composition() {
        let a = material("Data Structures", "CSE", 3, MaterialType::Pdf);
        let b = material("Signals", "ECE", 2, MaterialType::Video);
        let both = [a.clone(), b.clone()];
        let select = |opts: FilterOptions| -> Vec<StudyMaterial> {
            let filter = opts.into_filter().unwrap();
            both.iter().filter(|m| filter.matches(m)).cloned().collect()
        };

        assert_eq!(select(FilterOptions::default().subject("CSE")), vec![a.clone()]);
        assert_eq!(select(FilterOptions::default().kind("VIDEO")), vec![b.clone()]);
        assert!(select(FilterOptions::default().semester(3).kind("VIDEO")).is_empty());
        assert_eq!(select(FilterOptions::default()).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let m = material("Data Structures", "CSE", 3, MaterialType::Pdf);
        let by = |q: &str| FilterOptions::default().search(q).into_filter().unwrap().matches(&m);

        assert!(by("data"));
        assert!(by("STRUCT"));
        assert!(by("lecture"));
        assert!(!by("algorithms"));
    }

    #[test]
    fn test_invalid_semester_and_type_are_rejected() {
        assert_eq!(
            FilterOptions::default().semester("abc").into_filter(),
            Err(AppError::InvalidSemester("abc".into()))
        );
        assert!(FilterOptions::default().semester(9).into_filter().is_err());
        assert_eq!(
            FilterOptions::default().kind("AUDIO").into_filter(),
            Err(AppError::InvalidType("AUDIO".into()))
        );
    }

    #[test]
    fn test_query_string_field_names() {
        let opts: FilterOptions =
            serde_json::from_str(r#"{"searchQuery":"x","type":"PDF","semester":"1"}"#).unwrap();
        assert_eq!(opts.search_query.as_deref(), Some("x"));
        assert_eq!(opts.kind.as_deref(), Some("PDF"));
        assert_eq!(opts.semester.as_deref(), Some("1"));
    }
}
