//! services/seeder/src/driver.rs
//!
//! Sequential run drivers, one per entry point. Each driver chains the core
//! workflow steps against an `LmsApi`, pauses between courses, and stops at the
//! next course boundary once `cancel` fires.

use std::time::Duration;

use lms_seed_core::attempts::{simulate_attempts, AttemptPolicy, AttemptReport};
use lms_seed_core::courses::create_course;
use lms_seed_core::datasets::{
    bulk_question_bank, seed_question_bank, student_accounts, student_emails, SCHOOL_SUBJECTS,
    WORKSHOP_COURSES,
};
use lms_seed_core::directory::{change_role, RoleChange};
use lms_seed_core::lessons::add_lessons;
use lms_seed_core::progress::{advance_course, plan_student_progress, ProgressReport};
use lms_seed_core::provisioning::{ensure_students, obtain_admin_token, register_accounts};
use lms_seed_core::quizzes::{add_quizzes, create_course_quizzes};
use lms_seed_core::{
    AuthToken, CourseTemplate, LmsApi, QuizLedger, StepOutcome, StudentAccount, UserSummary,
};
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::error::SeederError;

/// Totals of a course seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub courses_created: usize,
    pub courses_failed: usize,
    pub lessons_created: usize,
    pub quizzes_linked: usize,
    pub attempts: AttemptReport,
    /// The run stopped early because it was cancelled.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub quizzes_created: usize,
    pub quizzes_failed: usize,
    pub attempts: AttemptReport,
    pub cancelled: bool,
}

/// Sleeps for `pause` unless cancelled first. Returns `false` when cancelled.
async fn pause(pause: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(pause) => true,
    }
}

fn log_failures<T>(step: &str, outcome: &StepOutcome<T>) {
    for failure in outcome.failures() {
        warn!("{}: {}", step, failure);
    }
}

//=========================================================================================
// Full Seed
//=========================================================================================

/// Admin login, students, then for every workshop course: course, lessons,
/// linked quizzes and simulated attempts.
///
/// Failing to obtain the admin token is the only error; everything else is
/// logged and counted.
pub async fn run_full_seed<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<SeedSummary, SeederError> {
    let admin = config.require_admin()?;
    let token = obtain_admin_token(api, &admin).await?;

    let accounts = student_accounts(config.student_count, &config.student_password);
    let outcome = ensure_students(api, &accounts).await;
    log_failures("Student provisioning", &outcome);
    let students = outcome.into_value().unwrap_or_default();
    let emails: Vec<String> = students.iter().map(|s| s.email.clone()).collect();

    info!("Starting content generation");
    let mut summary = SeedSummary::default();
    let mut ledger = QuizLedger::new();
    let bank = seed_question_bank();
    let policy = AttemptPolicy::seed();

    for template in WORKSHOP_COURSES.iter() {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        let Some(course_id) = create_course(api, rng, &token, template, &emails).await.into_value() else {
            summary.courses_failed += 1;
            continue;
        };
        summary.courses_created += 1;

        let lessons = add_lessons(api, rng, &token, &course_id).await;
        log_failures("Lesson creation", &lessons);
        let lesson_ids = lessons.into_value().unwrap_or_default();
        summary.lessons_created += lesson_ids.len();

        if !lesson_ids.is_empty() {
            let quizzes =
                add_quizzes(api, rng, &token, &course_id, &lesson_ids, &bank, &mut ledger).await;
            log_failures("Quiz creation", &quizzes);
            let quiz_ids = quizzes.into_value().unwrap_or_default();
            summary.quizzes_linked += quiz_ids.len();

            if !quiz_ids.is_empty() && !students.is_empty() {
                let report =
                    simulate_attempts(api, rng, &students, ledger.select(&quiz_ids), &policy).await;
                summary.attempts.absorb(report);
            }
        }

        if !pause(config.course_pause, cancel).await {
            summary.cancelled = true;
            break;
        }
    }

    info!(
        "Seed finished: {} courses, {} lessons, {} quizzes, {} attempts",
        summary.courses_created,
        summary.lessons_created,
        summary.quizzes_linked,
        summary.attempts.attempts
    );
    Ok(summary)
}

//=========================================================================================
// Content Seed
//=========================================================================================

/// Creates the school-subject courses with lessons, enrolling a random subset
/// of test users that are assumed to exist already. No quizzes.
pub async fn run_content_seed<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<SeedSummary, SeederError> {
    let admin = config.require_admin()?;
    let token = obtain_admin_token(api, &admin).await?;
    let emails = student_emails(config.progress_student_count);
    if let (Some(first), Some(last)) = (emails.first(), emails.last()) {
        info!("Target students: {} ... {}", first, last);
    }

    Ok(seed_courses(api, rng, &token, &SCHOOL_SUBJECTS, &emails, config.course_pause, cancel).await)
}

async fn seed_courses<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    token: &AuthToken,
    templates: &[CourseTemplate],
    emails: &[String],
    course_pause: Duration,
    cancel: &CancellationToken,
) -> SeedSummary {
    let mut summary = SeedSummary::default();

    for template in templates {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        let Some(course_id) = create_course(api, rng, token, template, emails).await.into_value() else {
            summary.courses_failed += 1;
            continue;
        };
        summary.courses_created += 1;

        let lessons = add_lessons(api, rng, token, &course_id).await;
        log_failures("Lesson creation", &lessons);
        summary.lessons_created += lessons.value().map_or(0, Vec::len);

        if !pause(course_pause, cancel).await {
            summary.cancelled = true;
            break;
        }
    }

    info!(
        "Content seed finished: {} courses, {} lessons",
        summary.courses_created, summary.lessons_created
    );
    summary
}

//=========================================================================================
// Bulk Quizzes
//=========================================================================================

/// Creates `quizzes_per_course` quizzes for each configured course, then has
/// every configured user attempt every created quiz.
pub async fn run_bulk_quizzes<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<BulkSummary, SeederError> {
    if config.bulk_course_ids.is_empty() {
        return Err(ConfigError::MissingVar("BULK_COURSE_IDS".to_string()).into());
    }
    let admin = config.require_admin()?;
    let token = obtain_admin_token(api, &admin).await?;

    let mut summary = BulkSummary::default();
    let mut ledger = QuizLedger::new();
    let bank = bulk_question_bank();

    for course_id in &config.bulk_course_ids {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        let outcome = create_course_quizzes(
            api,
            rng,
            &token,
            course_id,
            config.quizzes_per_course,
            &bank,
            &mut ledger,
        )
        .await;
        summary.quizzes_failed += outcome.failures().len();
        summary.quizzes_created += outcome.value().map_or(0, Vec::len);
    }

    if summary.cancelled {
        return Ok(summary);
    }

    let students: Vec<StudentAccount> = config
        .bulk_user_ids
        .iter()
        .map(|id| StudentAccount {
            id: Some(id.clone()),
            email: id.to_string(),
        })
        .collect();
    if students.is_empty() {
        warn!("BULK_USER_IDS is empty; no attempts will be simulated");
    }
    summary.attempts =
        simulate_attempts(api, rng, &students, ledger.iter(), &AttemptPolicy::bulk()).await;

    info!(
        "Bulk run finished: {} quizzes created, {} submissions",
        summary.quizzes_created, summary.attempts.submissions
    );
    Ok(summary)
}

//=========================================================================================
// Student Progress
//=========================================================================================

/// Logs in each numbered test student and marks about two thirds of the
/// lessons of every visible course complete.
pub async fn run_progress<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    config: &Config,
    cancel: &CancellationToken,
) -> ProgressReport {
    let mut report = ProgressReport::default();
    let accounts = student_accounts(config.progress_student_count, &config.test_user_password);

    'students: for account in &accounts {
        if cancel.is_cancelled() {
            break;
        }
        info!("Processing {}", account.email);
        let Some(plan) = plan_student_progress(api, account).await else {
            report.students_skipped += 1;
            continue;
        };
        report.students_processed += 1;

        for course in &plan.courses {
            let (seen, marked) = advance_course(api, rng, &plan.user_id, course).await;
            report.courses_visited += 1;
            report.lessons_seen += seen;
            report.lessons_marked += marked;

            if seen > 0 && !pause(config.course_pause, cancel).await {
                break 'students;
            }
        }
    }

    info!(
        "Progress updated: {} lessons marked across {} students",
        report.lessons_marked, report.students_processed
    );
    report
}

//=========================================================================================
// User Directory
//=========================================================================================

/// Registers the numbered test users, returning the emails that were created.
pub async fn run_create_test_users(api: &dyn LmsApi, config: &Config) -> StepOutcome<Vec<String>> {
    info!("Creating {} test users", config.test_user_count);
    let accounts = student_accounts(config.test_user_count, &config.test_user_password);
    let outcome = register_accounts(api, &accounts).await;
    log_failures("Registration", &outcome);
    outcome
}

/// Logs in as admin when admin credentials are configured.
async fn optional_admin_token(
    api: &dyn LmsApi,
    config: &Config,
) -> Result<Option<AuthToken>, SeederError> {
    match config.admin_account() {
        Some(admin) => Ok(Some(obtain_admin_token(api, &admin).await?)),
        None => Ok(None),
    }
}

pub async fn run_list_users(api: &dyn LmsApi, config: &Config) -> Result<Vec<UserSummary>, SeederError> {
    let token = optional_admin_token(api, config).await?;
    info!("Fetching all users");
    Ok(api.list_users(token.as_ref()).await?)
}

pub async fn run_update_role(api: &dyn LmsApi, config: &Config) -> Result<RoleChange, SeederError> {
    let user_id = config
        .target_user_id
        .as_ref()
        .ok_or_else(|| ConfigError::MissingVar("TARGET_USER_ID".to_string()))?;
    let role = config
        .new_role
        .ok_or_else(|| ConfigError::MissingVar("NEW_ROLE".to_string()))?;

    let token = optional_admin_token(api, config).await?;
    let change = change_role(api, token.as_ref(), user_id, role).await?;
    if change.applied(role) {
        info!("Verified: user {} now has role '{}'", user_id, role);
    } else {
        warn!("User {} still reports role {:?} after the update", user_id, change.after.role);
    }
    Ok(change)
}
