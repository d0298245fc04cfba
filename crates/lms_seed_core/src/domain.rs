//! crates/lms_seed_core/src/domain.rs
//!
//! Defines the data structures exchanged with the remote learning-management API.
//! The driver only ever holds transient local copies of remote resources; every
//! identifier here is opaque and assigned by the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Opaque Identifiers
//=========================================================================================

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

opaque_id!(
    /// Server-assigned id of a user account.
    UserId
);
opaque_id!(
    /// Server-assigned id of a course.
    CourseId
);
opaque_id!(
    /// Server-assigned id of a lesson.
    LessonId
);
opaque_id!(
    /// Server-assigned id of a quiz.
    QuizId
);

/// Bearer token obtained from the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens never end up in logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

//=========================================================================================
// Accounts and Users
//=========================================================================================

/// Login payload.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An account the driver wants to exist on the server. Doubles as the
/// registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSpec {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AccountSpec {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// What a successful login hands back. Either half may be absent depending on
/// the server's response shape.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    pub token: Option<AuthToken>,
    pub user_id: Option<UserId>,
}

/// A student account as seen by the driver. The id is `None` when it could not
/// be recovered from either the login or the register response; callers must
/// skip such accounts before using the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAccount {
    pub id: Option<UserId>,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role '{0}': must be either 'student' or 'admin'")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// A user record as listed by the user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserWire")]
pub struct UserSummary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// `None` when the server reports no role or one the driver does not know.
    pub role: Option<Role>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire shape of a user. The server may send `_id`, `id`, or both.
#[derive(Deserialize)]
struct UserWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<UserId>,
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, deserialize_with = "known_role")]
    role: Option<Role>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<UserWire> for UserSummary {
    fn from(wire: UserWire) -> Self {
        Self {
            id: wire.mongo_id.or(wire.id),
            name: wire.name,
            email: wire.email,
            role: wire.role,
            created_at: wire.created_at,
        }
    }
}

fn known_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.parse().ok()))
}

//=========================================================================================
// Courses
//=========================================================================================

/// Course categories accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Secundaria,
    Preparatoria,
}

/// A course definition from one of the built-in datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
}

/// Course creation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub access_list: Vec<String>,
}

/// The part of a course the driver reads back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub id: CourseId,
    pub title: Option<String>,
}

//=========================================================================================
// Lessons and Content
//=========================================================================================

/// A typed content item, used when the driver builds new content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Video {
        title: String,
        url: String,
    },
    Pdf {
        title: String,
        url: String,
    },
    Text {
        title: String,
        #[serde(rename = "textContent")]
        text_content: String,
    },
    Quiz {
        title: String,
        #[serde(rename = "quizId")]
        quiz_id: QuizId,
    },
}

impl ContentItem {
    pub fn to_value(&self) -> Value {
        // Serializing a plain tagged enum of strings cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Returns the referenced quiz when this is a quiz item.
    pub fn quiz_id(&self) -> Option<&QuizId> {
        match self {
            ContentItem::Quiz { quiz_id, .. } => Some(quiz_id),
            _ => None,
        }
    }
}

/// Lesson creation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub contents: Vec<ContentItem>,
}

/// A lesson as returned by the server.
///
/// `contents` is kept as raw JSON so that a re-fetch, append and overwrite
/// round trip preserves every server-owned field of existing items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LessonWire")]
pub struct Lesson {
    #[serde(rename = "_id")]
    pub id: LessonId,
    pub course_id: Option<CourseId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub contents: Vec<Value>,
}

/// Wire shape of a lesson. `_id` wins over `id` when both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<LessonId>,
    #[serde(default)]
    id: Option<LessonId>,
    #[serde(default)]
    course_id: Option<CourseId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    contents: Vec<Value>,
}

impl TryFrom<LessonWire> for Lesson {
    type Error = String;

    fn try_from(wire: LessonWire) -> Result<Self, Self::Error> {
        let id = wire
            .mongo_id
            .or(wire.id)
            .ok_or_else(|| "lesson has neither `_id` nor `id`".to_string())?;
        Ok(Self {
            id,
            course_id: wire.course_id,
            title: wire.title,
            description: wire.description,
            contents: wire.contents,
        })
    }
}

impl Lesson {
    /// Content items the driver understands; anything else is skipped.
    pub fn content_items(&self) -> Vec<ContentItem> {
        self.contents
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    }
}

/// Partial lesson update. Only fields that are `Some` reach the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LessonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Value>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

//=========================================================================================
// Quizzes
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FillInTheBlank,
    MultipleAnswer,
    CompleteTheCode,
}

/// A question's correct answer, or a submitted answer. The server stores a
/// mixed type: a single text, a list of texts, or a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Text(String),
    Choices(Vec<String>),
}

impl Answer {
    pub fn text(s: impl Into<String>) -> Self {
        Answer::Text(s.into())
    }

    pub fn choices<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Choices(items.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub correct_answer: Answer,
    #[serde(default = "default_points")]
    pub value: u32,
}

fn default_points() -> u32 {
    1
}

/// Quiz creation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub course_id: CourseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<LessonId>,
    pub questions: Vec<Question>,
}

/// A created quiz together with the exact question payload that was sent.
/// The questions are the only local source of the correct answers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRecord {
    pub id: QuizId,
    pub title: String,
    pub questions: Vec<Question>,
}

/// Explicit accumulator of created quizzes, keyed by quiz id.
#[derive(Debug, Clone, Default)]
pub struct QuizLedger {
    quizzes: BTreeMap<QuizId, QuizRecord>,
}

impl QuizLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, quiz: QuizRecord) {
        self.quizzes.insert(quiz.id.clone(), quiz);
    }

    pub fn get(&self, id: &QuizId) -> Option<&QuizRecord> {
        self.quizzes.get(id)
    }

    /// Looks up several quizzes at once, silently skipping unknown ids.
    pub fn select<'a>(&'a self, ids: &'a [QuizId]) -> impl Iterator<Item = &'a QuizRecord> + 'a {
        ids.iter().filter_map(move |id| self.quizzes.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizRecord> {
        self.quizzes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &QuizId> {
        self.quizzes.keys()
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

/// One submitted answer to one quiz question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub quiz_id: QuizId,
    pub user_id: UserId,
    pub question_index: usize,
    pub answer: Answer,
}
