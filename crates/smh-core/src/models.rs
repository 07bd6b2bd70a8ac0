//! # Domain Models
//!
//! These structs represent the core entities of the Study Materials Hub.
//! Materials use UUID v7 for time-ordered, globally unique identification.
//!
//! Two shapes of a material exist: [`MaterialRecord`] is the normalized
//! storage row (category foreign key, creation timestamp), while
//! [`StudyMaterial`] is the flattened view-model handed to clients. The only
//! way from one to the other is the `From` impl at the bottom of this file.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::departments::department_label;
use crate::error::AppError;

/// Email of the placeholder user every material is attributed to.
pub const DEFAULT_USER_EMAIL: &str = "default@example.com";
pub const DEFAULT_USER_NAME: &str = "Default User";

/// Kind of resource a material links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "VIDEO")]
    Video,
}

impl MaterialType {
    pub const ALL: [MaterialType; 2] = [MaterialType::Pdf, MaterialType::Video];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Video => "VIDEO",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = AppError;

    /// Exact, case-sensitive match on the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDF" => Ok(Self::Pdf),
            "VIDEO" => Ok(Self::Video),
            other => Err(AppError::InvalidType(other.to_string())),
        }
    }
}

/// Academic semester, always within 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Semester(u8);

impl Semester {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Semester {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // Range checked above, the cast cannot truncate.
            Ok(Self(value as u8))
        } else {
            Err(AppError::InvalidSemester(value.to_string()))
        }
    }
}

impl From<Semester> for i64 {
    fn from(semester: Semester) -> Self {
        i64::from(semester.0)
    }
}

impl FromStr for Semester {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidSemester(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placeholder owner attached to every material. Not used for authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn default_user(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: DEFAULT_USER_EMAIL.to_string(),
            name: Some(DEFAULT_USER_NAME.to_string()),
            created_at: now,
        }
    }
}

/// A subject grouping. The `id` is the subject code clients filter by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// The category created on first use of a subject code.
    pub fn for_subject(code: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: code.to_string(),
            name: department_label(code).unwrap_or(code).to_string(),
            description: Some(format!("Category for {code}")),
            created_at: now,
        }
    }
}

/// A material as it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub kind: MaterialType,
    pub tags: Vec<String>,
    pub author: String,
    pub semester: Semester,
    pub user_id: Uuid,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a material. Produced by
/// [`MaterialDraft::validate`](crate::draft::MaterialDraft::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaterial {
    pub title: String,
    pub description: String,
    pub link: String,
    pub kind: MaterialType,
    pub tags: Vec<String>,
    pub author: String,
    pub semester: Semester,
    /// Subject code; resolved to a category on insert.
    pub subject: String,
}

impl NewMaterial {
    /// The row to insert: a fresh time-ordered id, the subject code as the
    /// category reference.
    pub fn into_record(self, user_id: Uuid, created_at: DateTime<Utc>) -> MaterialRecord {
        MaterialRecord {
            id: Uuid::now_v7(),
            title: self.title,
            description: Some(self.description),
            file_url: self.link,
            kind: self.kind,
            tags: self.tags,
            author: self.author,
            semester: self.semester,
            user_id,
            category_id: self.subject,
            created_at,
        }
    }
}

/// The flattened, client-facing shape of a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub semester: Semester,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub link: String,
    pub tags: Vec<String>,
    pub upload_date: String,
    pub author: String,
}

impl StudyMaterial {
    /// Parsed `upload_date`; `None` if the string is not RFC 3339.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.upload_date)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<MaterialRecord> for StudyMaterial {
    fn from(record: MaterialRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description.unwrap_or_default(),
            subject: record.category_id,
            semester: record.semester,
            kind: record.kind,
            link: record.file_url,
            tags: record.tags,
            upload_date: iso_timestamp(record.created_at),
            author: record.author,
        }
    }
}
