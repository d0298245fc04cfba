pub mod attempts;
pub mod courses;
pub mod datasets;
pub mod directory;
pub mod domain;
pub mod lessons;
pub mod outcome;
pub mod ports;
pub mod progress;
pub mod provisioning;
pub mod quizzes;

pub use attempts::{AttemptPolicy, AttemptReport};
pub use domain::{
    AccountSpec, Answer, AnswerSubmission, AuthSession, AuthToken, Category, ContentItem, CourseId,
    CourseRecord, CourseTemplate, Credentials, Lesson, LessonId, LessonUpdate, NewCourse, NewLesson,
    NewQuiz, Question, QuestionKind, QuizId, QuizLedger, QuizRecord, Role, StudentAccount, UserId,
    UserSummary,
};
pub use outcome::{StepFailure, StepOutcome, StepStatus};
pub use ports::{LmsApi, PortError, PortResult};
pub use progress::ProgressReport;
