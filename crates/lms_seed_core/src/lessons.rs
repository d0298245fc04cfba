//! crates/lms_seed_core/src/lessons.rs

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::datasets::{lesson_title, lesson_video_title, LESSON_DESCRIPTION, VIDEO_LINKS};
use crate::domain::{AuthToken, ContentItem, CourseId, LessonId, NewLesson};
use crate::outcome::{StepFailure, StepOutcome};
use crate::ports::LmsApi;

pub const MIN_LESSONS: usize = 3;
pub const MAX_LESSONS: usize = 5;

/// Builds the payload for lesson number `n` (1-based) with one video item.
pub fn video_lesson<R: Rng>(rng: &mut R, course_id: &CourseId, n: usize) -> NewLesson {
    let url = VIDEO_LINKS.choose(rng).copied().unwrap_or(VIDEO_LINKS[0]);
    NewLesson {
        course_id: course_id.clone(),
        title: lesson_title(n),
        description: LESSON_DESCRIPTION.to_string(),
        contents: vec![ContentItem::Video {
            title: lesson_video_title(n),
            url: url.to_string(),
        }],
    }
}

/// Adds 3 to 5 video lessons to a course and returns the ids that were created.
/// Lessons that fail are left out of the returned list.
pub async fn add_lessons<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    token: &AuthToken,
    course_id: &CourseId,
) -> StepOutcome<Vec<LessonId>> {
    let count = rng.gen_range(MIN_LESSONS..=MAX_LESSONS);
    let mut created = Vec::with_capacity(count);
    let mut failures = Vec::new();

    for n in 1..=count {
        let lesson = video_lesson(rng, course_id, n);
        match api.create_lesson(token, &lesson).await {
            Ok(id) => created.push(id),
            Err(e) => {
                warn!("Error adding lesson {} to course {}: {}", n, course_id, e);
                failures.push(StepFailure::new(format!("lesson {n}"), e));
            }
        }
    }

    info!("Added {} video lessons to course {}", created.len(), course_id);
    StepOutcome::from_parts(created, failures)
}
