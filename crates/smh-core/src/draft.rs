//! # Material drafts
//!
//! A [`MaterialDraft`] is the loosely-typed create payload as it arrives from
//! a form or an HTTP body. Every field is optional so that presence can be
//! reported as a single, structured [`AppError::MissingFields`] instead of a
//! deserialization failure on the first absent key.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, REQUIRED_FIELDS};
use crate::models::{MaterialType, NewMaterial, Semester};

/// Semester as submitted: forms send strings, API callers send numbers.
/// JSON has no integer type, so `3.0` arrives as `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SemesterInput {
    Number(i64),
    Decimal(f64),
    Text(String),
}

impl SemesterInput {
    fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0,
            Self::Decimal(n) => *n == 0.0,
            Self::Text(s) => s.is_empty(),
        }
    }

    fn parse(&self) -> Result<Semester> {
        match self {
            Self::Number(n) => Semester::try_from(*n),
            // `as` saturates, so huge whole numbers still fail the range check.
            Self::Decimal(n) if n.fract() == 0.0 => Semester::try_from(*n as i64),
            Self::Decimal(n) => Err(AppError::InvalidSemester(n.to_string())),
            Self::Text(s) => s.parse(),
        }
    }
}

impl From<Semester> for SemesterInput {
    fn from(semester: Semester) -> Self {
        Self::Number(i64::from(semester))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<SemesterInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl MaterialDraft {
    /// A draft with every required field set.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        kind: MaterialType,
        author: impl Into<String>,
        semester: Semester,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            kind: Some(kind.as_str().to_string()),
            author: Some(author.into()),
            semester: Some(semester.into()),
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a tag unless it is empty or already present. Returns whether
    /// the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let tags = self.tags.get_or_insert_with(Vec::new);
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            return false;
        }
        tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(tags) = self.tags.as_mut() {
            tags.retain(|t| t != tag);
        }
    }

    /// Checks presence, then `type`, then `semester`, mirroring the order the
    /// API reports problems in.
    pub fn validate(&self) -> Result<NewMaterial> {
        // 1. Presence of every required field
        let semester_given = self.semester.as_ref().is_some_and(|s| !s.is_blank());
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| match *field {
                "title" => filled(&self.title).is_none(),
                "link" => filled(&self.link).is_none(),
                "type" => filled(&self.kind).is_none(),
                "author" => filled(&self.author).is_none(),
                "semester" => !semester_given,
                "subject" => filled(&self.subject).is_none(),
                _ => false,
            })
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let (Some(title), Some(link), Some(kind), Some(author), Some(semester), Some(subject)) = (
            filled(&self.title),
            filled(&self.link),
            filled(&self.kind),
            filled(&self.author),
            self.semester.as_ref(),
            filled(&self.subject),
        ) else {
            return Err(AppError::MissingFields(REQUIRED_FIELDS.to_vec()));
        };

        // 2. Enumerations and ranges
        let kind: MaterialType = kind.parse()?;
        let semester = semester.parse()?;

        Ok(NewMaterial {
            title: title.to_string(),
            description: self.description.clone().unwrap_or_default(),
            link: link.to_string(),
            kind,
            tags: self.tags.clone().unwrap_or_default(),
            author: author.to_string(),
            semester,
            subject: subject.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> MaterialDraft {
        MaterialDraft::new(
            "Operating Systems",
            "https://example.com/os.pdf",
            MaterialType::Pdf,
            "Tanenbaum",
            Semester::try_from(4).unwrap(),
            "CSE",
        )
    }

    #[test]
    fn test_valid_draft_defaults_optional_fields() {
        let new = draft().validate().unwrap();
        assert_eq!(new.description, "");
        assert!(new.tags.is_empty());
        assert_eq!(new.semester.get(), 4);
        assert_eq!(new.kind, MaterialType::Pdf);
    }

    #[test]
    fn test_missing_fields_are_listed_in_order() {
        let mut d = draft();
        d.title = Some(String::new());
        d.subject = None;
        assert_eq!(
            d.validate(),
            Err(AppError::MissingFields(vec!["title", "subject"]))
        );
    }

    #[test]
    fn test_zero_semester_counts_as_missing() {
        let mut d = draft();
        d.semester = Some(SemesterInput::Number(0));
        assert_eq!(d.validate(), Err(AppError::MissingFields(vec!["semester"])));
    }

    #[test]
    fn test_type_checked_before_semester() {
        let mut d = draft();
        d.kind = Some("AUDIO".into());
        d.semester = Some(SemesterInput::Number(11));
        assert_eq!(d.validate(), Err(AppError::InvalidType("AUDIO".into())));
    }

    #[test]
    fn test_semester_from_text() {
        let mut d = draft();
        d.semester = Some(SemesterInput::Text("7".into()));
        assert_eq!(d.validate().unwrap().semester.get(), 7);

        d.semester = Some(SemesterInput::Text("seven".into()));
        assert!(matches!(d.validate(), Err(AppError::InvalidSemester(_))));
    }

    #[test]
    fn test_payload_with_numeric_or_string_semester() {
        let json = r#"{"title":"t","link":"l","type":"VIDEO","author":"a","semester":"2","subject":"ECE"}"#;
        let d: MaterialDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.semester, Some(SemesterInput::Text("2".into())));

        let json = r#"{"title":"t","semester":2,"tags":null}"#;
        let d: MaterialDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.semester, Some(SemesterInput::Number(2)));
        assert_eq!(d.tags, None);
    }

    #[test]
    fn test_whole_decimal_semester_is_accepted() {
        let json = r#"{"title":"t","link":"l","type":"PDF","author":"a","semester":3.0,"subject":"CSE"}"#;
        let d: MaterialDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.semester, Some(SemesterInput::Decimal(3.0)));
        assert_eq!(d.validate().unwrap().semester.get(), 3);

        let mut d = draft();
        d.semester = Some(SemesterInput::Decimal(2.5));
        assert_eq!(d.validate(), Err(AppError::InvalidSemester("2.5".into())));

        d.semester = Some(SemesterInput::Decimal(9.0));
        assert!(matches!(d.validate(), Err(AppError::InvalidSemester(_))));

        d.semester = Some(SemesterInput::Decimal(0.0));
        assert_eq!(d.validate(), Err(AppError::MissingFields(vec!["semester"])));
    }

    #[test]
    fn test_tags_refuse_duplicates_and_blanks() {
        let mut d = draft();
        assert!(d.add_tag("exam"));
        assert!(!d.add_tag("exam"));
        assert!(!d.add_tag("  "));
        assert!(d.add_tag("Exam"));
        d.remove_tag("exam");
        assert_eq!(d.tags, Some(vec!["Exam".to_string()]));
    }
}
