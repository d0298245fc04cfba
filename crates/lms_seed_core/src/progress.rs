//! crates/lms_seed_core/src/progress.rs
//!
//! Simulates students working through their enrolled courses by marking
//! lessons complete.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::{AccountSpec, AuthToken, CourseRecord, UserId};
use crate::ports::LmsApi;

/// Two out of three lessons get marked complete.
pub const COMPLETION_PROBABILITY: f64 = 2.0 / 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressReport {
    pub students_processed: usize,
    pub students_skipped: usize,
    pub courses_visited: usize,
    pub lessons_seen: usize,
    pub lessons_marked: usize,
}

impl ProgressReport {
    pub fn absorb(&mut self, other: ProgressReport) {
        self.students_processed += other.students_processed;
        self.students_skipped += other.students_skipped;
        self.courses_visited += other.courses_visited;
        self.lessons_seen += other.lessons_seen;
        self.lessons_marked += other.lessons_marked;
    }
}

/// A logged-in student and the courses visible to them.
#[derive(Debug, Clone)]
pub struct StudentProgressPlan {
    pub user_id: UserId,
    pub token: AuthToken,
    pub courses: Vec<CourseRecord>,
}

/// Logs the student in and lists their courses. Returns `None` (after logging
/// why) when the login yields no id or no token, or no course is visible.
pub async fn plan_student_progress(
    api: &dyn LmsApi,
    account: &AccountSpec,
) -> Option<StudentProgressPlan> {
    let session = match api.login(&account.credentials()).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Could not log in {}: {}", account.email, e);
            return None;
        }
    };
    let (Some(user_id), Some(token)) = (session.user_id, session.token) else {
        warn!("Login for {} did not return both a user id and a token", account.email);
        return None;
    };

    let courses = match api.list_courses(&token).await {
        Ok(courses) => courses,
        Err(e) => {
            debug!("Listing courses for {} failed: {}", account.email, e);
            Vec::new()
        }
    };
    if courses.is_empty() {
        info!("No enrollments found for {}", account.email);
        return None;
    }

    Some(StudentProgressPlan {
        user_id,
        token,
        courses,
    })
}

/// Walks one course's lessons, marking each complete with probability 2/3.
/// Returns `(lessons_seen, lessons_marked)`.
pub async fn advance_course<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    user_id: &UserId,
    course: &CourseRecord,
) -> (usize, usize) {
    let lessons = match api.list_course_lessons(&course.id).await {
        Ok(lessons) => lessons,
        Err(e) => {
            debug!("Listing lessons of course {} failed: {}", course.id, e);
            return (0, 0);
        }
    };
    if lessons.is_empty() {
        return (0, 0);
    }

    let mut marked = 0;
    for lesson in &lessons {
        if !rng.gen_bool(COMPLETION_PROBABILITY) {
            continue;
        }
        match api.toggle_completion(&lesson.id, user_id, true).await {
            Ok(()) => marked += 1,
            Err(e) => debug!("Toggling lesson {} failed: {}", lesson.id, e),
        }
    }

    info!(
        "Course {}: marked {}/{} lessons as complete",
        course.title.as_deref().unwrap_or(course.id.as_str()),
        marked,
        lessons.len()
    );
    (lessons.len(), marked)
}

/// Runs the whole progress simulation for one student without pausing.
pub async fn simulate_student_progress<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    account: &AccountSpec,
) -> ProgressReport {
    let mut report = ProgressReport::default();
    let Some(plan) = plan_student_progress(api, account).await else {
        report.students_skipped = 1;
        return report;
    };

    report.students_processed = 1;
    for course in &plan.courses {
        let (seen, marked) = advance_course(api, rng, &plan.user_id, course).await;
        report.courses_visited += 1;
        report.lessons_seen += seen;
        report.lessons_marked += marked;
    }
    report
}
