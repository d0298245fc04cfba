//! crates/lms_seed_core/src/provisioning.rs
//!
//! Admin and student account provisioning: login first, fall back to
//! registration, then log in again.

use tracing::{debug, info, warn};

use crate::domain::{AccountSpec, AuthToken, StudentAccount};
use crate::outcome::{StepFailure, StepOutcome};
use crate::ports::{LmsApi, PortError, PortResult};

/// Returns a bearer token for the admin account.
///
/// Registration runs only when the first login does not yield a token, and its
/// own result is not inspected: a second login decides. Failing that login is
/// the only fatal condition of a seed run.
pub async fn obtain_admin_token(api: &dyn LmsApi, admin: &AccountSpec) -> PortResult<AuthToken> {
    info!("Logging in as admin ({})", admin.email);
    let credentials = admin.credentials();

    match api.login(&credentials).await {
        Ok(session) => {
            if let Some(token) = session.token {
                return Ok(token);
            }
            warn!("Admin login succeeded without a token");
        }
        Err(e) => debug!("Admin login failed: {}", e),
    }

    info!("Admin account not usable; registering {}", admin.email);
    if let Err(e) = api.register(admin).await {
        warn!("Admin registration failed: {}", e);
    }

    let session = api.login(&credentials).await?;
    session.token.ok_or_else(|| {
        PortError::Unauthorized(format!("could not obtain a token for {}", admin.email))
    })
}

/// Makes sure every target student account exists and recovers its id.
///
/// Every requested account appears in the result, in order. An account whose
/// id could not be recovered is kept with `id: None` and reported as a failure,
/// which makes the outcome `Partial`.
pub async fn ensure_students(
    api: &dyn LmsApi,
    accounts: &[AccountSpec],
) -> StepOutcome<Vec<StudentAccount>> {
    info!("Preparing {} test students", accounts.len());
    let mut students = Vec::with_capacity(accounts.len());
    let mut failures = Vec::new();

    for account in accounts {
        let id = match api.login(&account.credentials()).await {
            // A successful login without an id does not fall back to register.
            Ok(session) => session.user_id,
            Err(login_err) => {
                debug!("Login failed for {}: {}", account.email, login_err);
                match api.register(account).await {
                    Ok(id) => id,
                    Err(e) => {
                        warn!("Could not register {}: {}", account.email, e);
                        None
                    }
                }
            }
        };

        if id.is_none() {
            failures.push(StepFailure::new(account.email.clone(), "user id not recovered"));
        }
        students.push(StudentAccount {
            id,
            email: account.email.clone(),
        });
    }

    info!("{} students ready", students.len());
    StepOutcome::from_parts(students, failures)
}

/// Registers a batch of accounts, returning the emails that were created.
///
/// Individual rejections (e.g. already registered) are recorded and skipped;
/// a connection failure stops the batch since every later call would fail too.
pub async fn register_accounts(
    api: &dyn LmsApi,
    accounts: &[AccountSpec],
) -> StepOutcome<Vec<String>> {
    let mut created = Vec::new();
    let mut failures = Vec::new();

    for account in accounts {
        match api.register(account).await {
            Ok(_) => {
                info!("User created: {}", account.email);
                created.push(account.email.clone());
            }
            Err(e) => {
                warn!("Registration failed for {}: {}", account.email, e);
                let fatal = e.is_connection();
                failures.push(StepFailure::new(account.email.clone(), e));
                if fatal {
                    break;
                }
            }
        }
    }

    StepOutcome::from_parts(created, failures)
}
