//! In-memory stand-in for the LMS API with per-endpoint failure injection.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use lms_seed_core::{
    AccountSpec, AnswerSubmission, AuthSession, AuthToken, CourseId, CourseRecord, Credentials,
    Lesson, LessonId, LessonUpdate, LmsApi, NewCourse, NewLesson, NewQuiz, PortError, PortResult,
    QuizId, Role, UserId, UserSummary,
};

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Default)]
pub struct State {
    pub users: Vec<FakeUser>,
    pub courses: Vec<(CourseId, NewCourse)>,
    pub lessons: BTreeMap<LessonId, Lesson>,
    pub quizzes: Vec<(QuizId, NewQuiz)>,
    pub submissions: Vec<AnswerSubmission>,
    pub completions: Vec<(LessonId, UserId, bool)>,
    pub calls: Vec<&'static str>,
    /// Endpoint -> `None` to fail every call, or the zero-based call numbers to fail.
    pub failing: HashMap<&'static str, Option<HashSet<usize>>>,
    pub counters: HashMap<&'static str, usize>,
    pub login_omits_id: bool,
    pub register_omits_id: bool,
    /// Every call fails as if the server were unreachable.
    pub disconnected: bool,
    next_id: usize,
}

impl State {
    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Debug, Default)]
pub struct FakeLms {
    state: Mutex<State>,
}

impl FakeLms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_user(self, account: &AccountSpec, role: Role) -> Self {
        {
            let mut state = self.state();
            let id = UserId::new(state.mint("user"));
            state.users.push(FakeUser {
                id,
                name: account.name.clone(),
                email: account.email.clone(),
                password: account.password.clone(),
                role,
            });
        }
        self
    }

    /// Makes every call to `endpoint` fail with a 500.
    pub fn fail(&self, endpoint: &'static str) {
        self.state().failing.insert(endpoint, None);
    }

    /// Makes only the given zero-based calls to `endpoint` fail.
    pub fn fail_on(&self, endpoint: &'static str, calls: &[usize]) {
        self.state()
            .failing
            .insert(endpoint, Some(calls.iter().copied().collect()));
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == endpoint).count()
    }

    pub fn user_id(&self, email: &str) -> Option<UserId> {
        self.state()
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id.clone())
    }

    fn enter(&self, endpoint: &'static str) -> PortResult<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(endpoint);
        let counter = state.counters.entry(endpoint).or_insert(0);
        let call = *counter;
        *counter += 1;
        if state.disconnected {
            return Err(PortError::Connection("connection refused".into()));
        }
        let fails = match state.failing.get(endpoint) {
            Some(None) => true,
            Some(Some(calls)) => calls.contains(&call),
            None => false,
        };
        if fails {
            return Err(PortError::Server {
                status: 500,
                message: format!("{endpoint} failed"),
            });
        }
        Ok(state)
    }
}

fn summary(user: &FakeUser) -> UserSummary {
    UserSummary {
        id: Some(user.id.clone()),
        name: Some(user.name.clone()),
        email: Some(user.email.clone()),
        role: Some(user.role),
        created_at: None,
    }
}

#[async_trait]
impl LmsApi for FakeLms {
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthSession> {
        let state = self.enter("login")?;
        let user = state
            .users
            .iter()
            .find(|u| u.email == credentials.email && u.password == credentials.password)
            .ok_or_else(|| PortError::Unauthorized("Invalid credentials".into()))?;
        Ok(AuthSession {
            token: Some(AuthToken::new(format!("token-{}", user.id))),
            user_id: (!state.login_omits_id).then(|| user.id.clone()),
        })
    }

    async fn register(&self, account: &AccountSpec) -> PortResult<Option<UserId>> {
        let mut state = self.enter("register")?;
        if state.users.iter().any(|u| u.email == account.email) {
            return Err(PortError::Rejected {
                status: 400,
                message: "User already exists".into(),
            });
        }
        let id = UserId::new(state.mint("user"));
        state.users.push(FakeUser {
            id: id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            password: account.password.clone(),
            role: Role::Student,
        });
        Ok((!state.register_omits_id).then_some(id))
    }

    async fn create_course(&self, _token: &AuthToken, course: &NewCourse) -> PortResult<CourseRecord> {
        let mut state = self.enter("create_course")?;
        let id = CourseId::new(state.mint("course"));
        state.courses.push((id.clone(), course.clone()));
        Ok(CourseRecord {
            id,
            title: Some(course.title.clone()),
        })
    }

    async fn list_courses(&self, token: &AuthToken) -> PortResult<Vec<CourseRecord>> {
        let state = self.enter("list_courses")?;
        let email = state
            .users
            .iter()
            .find(|u| format!("token-{}", u.id) == token.as_str())
            .map(|u| u.email.clone())
            .unwrap_or_default();
        Ok(state
            .courses
            .iter()
            .filter(|(_, c)| c.access_list.contains(&email))
            .map(|(id, c)| CourseRecord {
                id: id.clone(),
                title: Some(c.title.clone()),
            })
            .collect())
    }

    async fn create_lesson(&self, _token: &AuthToken, lesson: &NewLesson) -> PortResult<LessonId> {
        let mut state = self.enter("create_lesson")?;
        let id = LessonId::new(state.mint("lesson"));
        state.lessons.insert(
            id.clone(),
            Lesson {
                id: id.clone(),
                course_id: Some(lesson.course_id.clone()),
                title: Some(lesson.title.clone()),
                description: Some(lesson.description.clone()),
                contents: lesson.contents.iter().map(|c| c.to_value()).collect(),
            },
        );
        Ok(id)
    }

    async fn get_lesson(&self, _token: &AuthToken, lesson_id: &LessonId) -> PortResult<Lesson> {
        let state = self.enter("get_lesson")?;
        state
            .lessons
            .get(lesson_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Lesson not found".into()))
    }

    async fn update_lesson(
        &self,
        _token: &AuthToken,
        lesson_id: &LessonId,
        update: &LessonUpdate,
    ) -> PortResult<()> {
        let mut state = self.enter("update_lesson")?;
        let lesson = state
            .lessons
            .get_mut(lesson_id)
            .ok_or_else(|| PortError::NotFound("Lesson not found".into()))?;
        if let Some(title) = &update.title {
            lesson.title = Some(title.clone());
        }
        if let Some(description) = &update.description {
            lesson.description = Some(description.clone());
        }
        if let Some(contents) = &update.contents {
            lesson.contents = contents.clone();
        }
        Ok(())
    }

    async fn delete_lesson(&self, _token: &AuthToken, lesson_id: &LessonId) -> PortResult<String> {
        let mut state = self.enter("delete_lesson")?;
        state
            .lessons
            .remove(lesson_id)
            .map(|_| "Lesson deleted".to_string())
            .ok_or_else(|| PortError::NotFound("Lesson not found".into()))
    }

    async fn list_course_lessons(&self, course_id: &CourseId) -> PortResult<Vec<Lesson>> {
        let state = self.enter("list_course_lessons")?;
        Ok(state
            .lessons
            .values()
            .filter(|l| l.course_id.as_ref() == Some(course_id))
            .cloned()
            .collect())
    }

    async fn toggle_completion(
        &self,
        lesson_id: &LessonId,
        user_id: &UserId,
        completed: bool,
    ) -> PortResult<()> {
        let mut state = self.enter("toggle_completion")?;
        state
            .completions
            .push((lesson_id.clone(), user_id.clone(), completed));
        Ok(())
    }

    async fn create_quiz(&self, _token: &AuthToken, quiz: &NewQuiz) -> PortResult<QuizId> {
        let mut state = self.enter("create_quiz")?;
        let id = QuizId::new(state.mint("quiz"));
        state.quizzes.push((id.clone(), quiz.clone()));
        Ok(id)
    }

    async fn submit_answer(&self, submission: &AnswerSubmission) -> PortResult<()> {
        let mut state = self.enter("submit_answer")?;
        state.submissions.push(submission.clone());
        Ok(())
    }

    async fn list_users(&self, _token: Option<&AuthToken>) -> PortResult<Vec<UserSummary>> {
        let state = self.enter("list_users")?;
        Ok(state.users.iter().map(summary).collect())
    }

    async fn get_user(&self, _token: Option<&AuthToken>, user_id: &UserId) -> PortResult<UserSummary> {
        let state = self.enter("get_user")?;
        state
            .users
            .iter()
            .find(|u| &u.id == user_id)
            .map(summary)
            .ok_or_else(|| PortError::NotFound("User not found".into()))
    }

    async fn update_user_role(
        &self,
        _token: Option<&AuthToken>,
        user_id: &UserId,
        role: Role,
    ) -> PortResult<UserSummary> {
        let mut state = self.enter("update_user_role")?;
        let user = state
            .users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| PortError::NotFound("User not found".into()))?;
        user.role = role;
        Ok(summary(user))
    }
}
