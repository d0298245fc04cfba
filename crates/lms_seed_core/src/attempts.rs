//! crates/lms_seed_core/src/attempts.rs
//!
//! Simulates students answering quizzes. Every answer is an independent,
//! unauthenticated submission; failures are counted and otherwise ignored.

use rand::Rng;
use tracing::{debug, info};

use crate::domain::{Answer, AnswerSubmission, QuizRecord, StudentAccount};
use crate::ports::LmsApi;

/// Sentinel submitted in place of a correct answer by the full seed.
pub const WRONG_ANSWER: &str = "Wrong Answer Value";
/// Sentinel submitted in place of a correct answer by the bulk quiz flow.
pub const BULK_WRONG_ANSWER: &str = "Wrong answer ._.";

/// Knobs for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptPolicy {
    /// Chance a student does not take a given quiz at all.
    pub skip_probability: f64,
    /// Chance a single answer is replaced by `wrong_answer`.
    pub wrong_probability: f64,
    /// Chance, checked before each question, that the student stops the attempt.
    pub abandon_probability: f64,
    pub wrong_answer: String,
}

impl AttemptPolicy {
    /// Half the students skip each quiz; one answer in five is wrong.
    pub fn seed() -> Self {
        Self {
            skip_probability: 0.5,
            wrong_probability: 0.2,
            abandon_probability: 0.0,
            wrong_answer: WRONG_ANSWER.to_string(),
        }
    }

    /// Everybody attempts every quiz but may give up midway.
    pub fn bulk() -> Self {
        Self {
            skip_probability: 0.0,
            wrong_probability: 0.2,
            abandon_probability: 0.05,
            wrong_answer: BULK_WRONG_ANSWER.to_string(),
        }
    }
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self::seed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptReport {
    /// (student, quiz) pairs that were attempted.
    pub attempts: usize,
    /// Answer submissions issued, including failed ones.
    pub submissions: usize,
    pub failed_submissions: usize,
}

impl AttemptReport {
    pub fn absorb(&mut self, other: AttemptReport) {
        self.attempts += other.attempts;
        self.submissions += other.submissions;
        self.failed_submissions += other.failed_submissions;
    }
}

/// Chooses the answer for one question: the recorded correct answer, or the
/// policy's sentinel with probability `wrong_probability`.
pub fn choose_answer<R: Rng>(rng: &mut R, correct: &Answer, policy: &AttemptPolicy) -> Answer {
    if rng.gen::<f64>() < policy.wrong_probability {
        Answer::Text(policy.wrong_answer.clone())
    } else {
        correct.clone()
    }
}

/// Runs the simulation over every (student, quiz) pair.
///
/// Students without a recovered id are skipped. With S students and quizzes of
/// K questions each, at most S×K submissions are issued per quiz.
pub async fn simulate_attempts<'a, R, I>(
    api: &dyn LmsApi,
    rng: &mut R,
    students: &[StudentAccount],
    quizzes: I,
    policy: &AttemptPolicy,
) -> AttemptReport
where
    R: Rng,
    I: IntoIterator<Item = &'a QuizRecord>,
{
    let mut report = AttemptReport::default();

    for quiz in quizzes {
        for student in students {
            let Some(user_id) = &student.id else {
                continue;
            };
            if rng.gen::<f64>() < policy.skip_probability {
                continue;
            }

            for (index, question) in quiz.questions.iter().enumerate() {
                if rng.gen::<f64>() < policy.abandon_probability {
                    break;
                }
                let submission = AnswerSubmission {
                    quiz_id: quiz.id.clone(),
                    user_id: user_id.clone(),
                    question_index: index,
                    answer: choose_answer(rng, &question.correct_answer, policy),
                };
                report.submissions += 1;
                if let Err(e) = api.submit_answer(&submission).await {
                    debug!("Answer submission for quiz {} failed: {}", quiz.id, e);
                    report.failed_submissions += 1;
                }
            }

            report.attempts += 1;
        }
    }

    if report.attempts > 0 {
        info!("Simulated {} student attempts on these quizzes", report.attempts);
    }
    report
}
