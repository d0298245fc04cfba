//! crates/lms_seed_core/src/quizzes.rs
//!
//! Quiz creation and linking. Linking is a second, non-transactional phase:
//! the lesson is re-fetched, a quiz reference is appended to its contents, and
//! the whole content list is written back. A quiz whose link fails stays on the
//! server unreferenced; nothing is rolled back or retried.

use rand::Rng;
use tracing::{info, warn};

use crate::datasets::{bulk_quiz_title, quiz_title, BULK_QUIZ_DESCRIPTION, QUIZ_DESCRIPTION};
use crate::domain::{
    AuthToken, ContentItem, CourseId, LessonId, LessonUpdate, NewQuiz, Question, QuizId, QuizLedger,
    QuizRecord,
};
use crate::outcome::{StepFailure, StepOutcome};
use crate::ports::{LmsApi, PortResult};

pub const KEEP_PROBABILITY: f64 = 0.7;
pub const MIN_POINTS: u32 = 1;
pub const MAX_POINTS: u32 = 10;

/// Picks a random subset of `bank` and assigns each question a random value.
/// Each question survives with probability 0.7; if none does, the first bank
/// question is used alone.
pub fn build_questions<R: Rng>(rng: &mut R, bank: &[Question]) -> Vec<Question> {
    let mut questions: Vec<Question> = bank
        .iter()
        .filter(|_| rng.gen::<f64>() < KEEP_PROBABILITY)
        .cloned()
        .collect();
    if questions.is_empty() {
        questions.extend(bank.first().cloned());
    }
    for q in &mut questions {
        q.value = rng.gen_range(MIN_POINTS..=MAX_POINTS);
    }
    questions
}

/// Appends a quiz reference to the lesson's current contents.
async fn link_quiz(
    api: &dyn LmsApi,
    token: &AuthToken,
    lesson_id: &LessonId,
    title: &str,
    quiz_id: &QuizId,
) -> PortResult<()> {
    let lesson = api.get_lesson(token, lesson_id).await?;
    let mut contents = lesson.contents;
    contents.push(
        ContentItem::Quiz {
            title: title.to_string(),
            quiz_id: quiz_id.clone(),
        }
        .to_value(),
    );
    let update = LessonUpdate {
        contents: Some(contents),
        ..Default::default()
    };
    api.update_lesson(token, lesson_id, &update).await
}

/// Creates one quiz per lesson and links it into that lesson.
///
/// Only quizzes that were both created and linked are recorded in `ledger` and
/// returned. When creation fails the lesson is not touched.
pub async fn add_quizzes<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    token: &AuthToken,
    course_id: &CourseId,
    lesson_ids: &[LessonId],
    bank: &[Question],
    ledger: &mut QuizLedger,
) -> StepOutcome<Vec<QuizId>> {
    info!("Creating quizzes and linking them to {} lessons", lesson_ids.len());
    let mut linked = Vec::new();
    let mut failures = Vec::new();

    for (i, lesson_id) in lesson_ids.iter().enumerate() {
        let title = quiz_title(i + 1);
        let quiz = NewQuiz {
            title: title.clone(),
            description: QUIZ_DESCRIPTION.to_string(),
            course_id: course_id.clone(),
            lesson_id: Some(lesson_id.clone()),
            questions: build_questions(rng, bank),
        };

        let quiz_id = match api.create_quiz(token, &quiz).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Error creating quiz for lesson {}: {}", lesson_id, e);
                failures.push(StepFailure::new(format!("quiz for lesson {lesson_id}"), e));
                continue;
            }
        };

        if let Err(e) = link_quiz(api, token, lesson_id, &title, &quiz_id).await {
            warn!("Quiz {} could not be linked to lesson {}: {}", quiz_id, lesson_id, e);
            failures.push(StepFailure::new(format!("link quiz {quiz_id} to lesson {lesson_id}"), e));
            continue;
        }

        ledger.record(QuizRecord {
            id: quiz_id.clone(),
            title,
            questions: quiz.questions,
        });
        linked.push(quiz_id);
    }

    info!("Created and linked {} quizzes", linked.len());
    StepOutcome::from_parts(linked, failures)
}

/// Creates `count` stand-alone quizzes for a course, recording each in `ledger`.
pub async fn create_course_quizzes<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    token: &AuthToken,
    course_id: &CourseId,
    count: usize,
    bank: &[Question],
    ledger: &mut QuizLedger,
) -> StepOutcome<Vec<QuizId>> {
    let mut created = Vec::with_capacity(count);
    let mut failures = Vec::new();

    for n in 1..=count {
        let quiz = NewQuiz {
            title: bulk_quiz_title(n),
            description: BULK_QUIZ_DESCRIPTION.to_string(),
            course_id: course_id.clone(),
            lesson_id: None,
            questions: build_questions(rng, bank),
        };

        match api.create_quiz(token, &quiz).await {
            Ok(id) => {
                info!("Quiz {} created for course {}", n, course_id);
                ledger.record(QuizRecord {
                    id: id.clone(),
                    title: quiz.title,
                    questions: quiz.questions,
                });
                created.push(id);
            }
            Err(e) => {
                warn!("Error creating quiz {} for course {}: {}", n, course_id, e);
                failures.push(StepFailure::new(format!("quiz {n} of course {course_id}"), e));
            }
        }
    }

    StepOutcome::from_parts(created, failures)
}
