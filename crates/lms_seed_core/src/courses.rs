//! crates/lms_seed_core/src/courses.rs

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::domain::{AuthToken, CourseId, CourseTemplate, NewCourse};
use crate::outcome::{StepFailure, StepOutcome};
use crate::ports::LmsApi;

/// Draws one random subset of `emails` whose size is uniform in
/// `[min(3, N), N]`. No email appears twice.
pub fn pick_enrollees<R: Rng>(rng: &mut R, emails: &[String]) -> Vec<String> {
    let n = emails.len();
    let size = rng.gen_range(n.min(3)..=n);
    emails.choose_multiple(rng, size).cloned().collect()
}

/// Creates a course from `template`, enrolling a random subset of `emails`.
pub async fn create_course<R: Rng>(
    api: &dyn LmsApi,
    rng: &mut R,
    token: &AuthToken,
    template: &CourseTemplate,
    emails: &[String],
) -> StepOutcome<CourseId> {
    let course = NewCourse {
        title: template.title.to_string(),
        description: template.description.to_string(),
        category: template.category,
        access_list: pick_enrollees(rng, emails),
    };

    match api.create_course(token, &course).await {
        Ok(record) => {
            info!(
                "Course created: '{}' (ID: {}), {} students enrolled",
                record.title.as_deref().unwrap_or(template.title),
                record.id,
                course.access_list.len()
            );
            StepOutcome::Success(record.id)
        }
        Err(e) => {
            warn!("Error creating course '{}': {}", template.title, e);
            StepOutcome::Failure(StepFailure::new(format!("course '{}'", template.title), e))
        }
    }
}
