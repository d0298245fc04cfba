//! crates/lms_seed_core/src/ports.rs
//!
//! Defines the contract (trait) for the remote learning-management API.
//! The workflow steps only talk to this trait, which keeps them independent of
//! the HTTP client and lets tests swap in an in-memory implementation.

use async_trait::async_trait;

use crate::domain::{
    AccountSpec, AnswerSubmission, AuthSession, AuthToken, CourseId, CourseRecord, Credentials,
    Lesson, LessonId, LessonUpdate, NewCourse, NewLesson, NewQuiz, QuizId, Role, UserId,
    UserSummary,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Errors surfaced by any call across the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The server could not be reached (refused, DNS, timeout).
    #[error("Connection failed: {0}")]
    Connection(String),
    /// 401 or 403.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Any other 4xx, typically validation.
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// 5xx and any other non-2xx status.
    #[error("Server error with status {status}: {message}")]
    Server { status: u16, message: String },
    /// The response body could not be parsed.
    #[error("Could not decode response: {0}")]
    Decode(String),
    /// A 2xx create response that carried neither `id` nor `_id`.
    #[error("Response did not include an id")]
    MissingId,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// Maps a non-2xx status and its extracted message onto the error taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => PortError::Unauthorized(message),
            404 => PortError::NotFound(message),
            400..=499 => PortError::Rejected { status, message },
            _ => PortError::Server { status, message },
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, PortError::Connection(_))
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Port (Trait)
//=========================================================================================

#[async_trait]
pub trait LmsApi: Send + Sync {
    // --- Auth ---
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthSession>;

    /// Registers an account, returning the created user's id when the server echoes it.
    async fn register(&self, account: &AccountSpec) -> PortResult<Option<UserId>>;

    // --- Courses ---
    async fn create_course(&self, token: &AuthToken, course: &NewCourse) -> PortResult<CourseRecord>;

    /// Lists the courses visible to the token's owner.
    async fn list_courses(&self, token: &AuthToken) -> PortResult<Vec<CourseRecord>>;

    // --- Lessons ---
    async fn create_lesson(&self, token: &AuthToken, lesson: &NewLesson) -> PortResult<LessonId>;

    async fn get_lesson(&self, token: &AuthToken, lesson_id: &LessonId) -> PortResult<Lesson>;

    async fn update_lesson(
        &self,
        token: &AuthToken,
        lesson_id: &LessonId,
        update: &LessonUpdate,
    ) -> PortResult<()>;

    /// Deletes a lesson, returning the server's confirmation message.
    async fn delete_lesson(&self, token: &AuthToken, lesson_id: &LessonId) -> PortResult<String>;

    async fn list_course_lessons(&self, course_id: &CourseId) -> PortResult<Vec<Lesson>>;

    async fn toggle_completion(
        &self,
        lesson_id: &LessonId,
        user_id: &UserId,
        completed: bool,
    ) -> PortResult<()>;

    // --- Quizzes ---
    async fn create_quiz(&self, token: &AuthToken, quiz: &NewQuiz) -> PortResult<QuizId>;

    /// Submits one answer without authentication.
    async fn submit_answer(&self, submission: &AnswerSubmission) -> PortResult<()>;

    // --- Users ---
    async fn list_users(&self, token: Option<&AuthToken>) -> PortResult<Vec<UserSummary>>;

    async fn get_user(&self, token: Option<&AuthToken>, user_id: &UserId) -> PortResult<UserSummary>;

    async fn update_user_role(
        &self,
        token: Option<&AuthToken>,
        user_id: &UserId,
        role: Role,
    ) -> PortResult<UserSummary>;
}
