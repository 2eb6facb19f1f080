use super::ControllerError;
use crate::catalog::{DEFAULT_QUESTION_ID, DEFAULT_QUESTION_TEXT};
use crate::format::format_level;
use crate::models::PracticeQuestion;
use crate::render::render_practice_page;
use crate::session::{LocalStore, Redirect, Session};
use crate::view::FeedbackView;
use reqwest::Url;
use serde_json::Value;
use tokio::time::Instant;
use tracing::warn;

pub const EMPTY_ANSWER: &str = "Please type your answer before submitting";
pub const SUBMIT_FAILED: &str = "Failed to submit answer. Please try again later.";
pub const PERSONALIZED_NEEDS_ASSESSMENT: &str =
    "Please complete an assessment to get personalized questions.";

pub fn default_question() -> PracticeQuestion {
    PracticeQuestion {
        question_id: DEFAULT_QUESTION_ID.to_string(),
        question_text: DEFAULT_QUESTION_TEXT.to_string(),
        difficulty_level: "intermediate".to_string(),
        selected_for: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub feedback: FeedbackView,
    pub personalized: bool,
    pub elapsed_seconds: u64,
}

#[derive(Debug)]
pub struct Practice<S> {
    session: Session<S>,
    question: PracticeQuestion,
    personalized_question: bool,
    welcome: Option<String>,
}

impl<S: LocalStore> Practice<S> {
    pub async fn init(mut session: Session<S>, location: &Url) -> Result<Self, ControllerError> {
        let user_id = session.user.init(location).await?;
        let mut practice = Self {
            session,
            question: default_question(),
            personalized_question: false,
            welcome: None,
        };

        if user_id.is_some() {
            practice.load_user_context().await;
            practice.load_personalized_question().await;
        }
        Ok(practice)
    }

    async fn load_user_context(&mut self) {
        let Some(profile) = self.session.load_profile().await else {
            return;
        };
        let user_type = profile
            .get("user_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase();
        let level = format_level(profile.get("proficiency_level").and_then(Value::as_str));
        self.welcome = Some(format!(
            "Welcome back! Practicing for {user_type} | Level: {level}"
        ));
    }

    async fn load_personalized_question(&mut self) -> bool {
        let Some(user_id) = self.session.user.user_id() else {
            return false;
        };

        let loaded = self
            .session
            .api
            .get_personalized_question(user_id)
            .await
            .and_then(|value| Ok(serde_json::from_value::<PracticeQuestion>(value)?));

        match loaded {
            Ok(question) => {
                self.question = question;
                self.personalized_question = true;
                true
            }
            Err(err) => {
                warn!("failed to load personalized question: {err}");
                self.question = default_question();
                self.personalized_question = false;
                false
            }
        }
    }

    pub async fn load_new_question(&mut self) -> Result<bool, ControllerError> {
        if !self.session.user.is_authenticated() {
            return Err(ControllerError::Redirect(Redirect {
                message: PERSONALIZED_NEEDS_ASSESSMENT,
                to: self.session.user.assessment_url(),
            }));
        }
        Ok(self.load_personalized_question().await)
    }

    pub fn question(&self) -> &PracticeQuestion {
        &self.question
    }

    pub fn has_personalized_question(&self) -> bool {
        self.personalized_question
    }

    pub fn welcome(&self) -> Option<&str> {
        self.welcome.as_deref()
    }

    pub fn page(&self) -> String {
        render_practice_page(
            &self.question.question_id,
            &self.question.question_text,
            self.welcome.as_deref(),
        )
    }

    pub async fn submit(&self, answer: &str) -> Result<Submitted, ControllerError> {
        if answer.trim().is_empty() {
            return Err(ControllerError::Validation(EMPTY_ANSWER.to_string()));
        }

        let started = Instant::now();
        let api = &self.session.api;
        let question_id = self.question.question_id.as_str();
        let (response, personalized) = match self.session.user.user_id() {
            Some(user_id) => (
                api.get_enhanced_feedback(user_id, answer, question_id).await,
                true,
            ),
            None => (api.get_basic_feedback(answer, question_id).await, false),
        };
        let elapsed_seconds = started.elapsed().as_secs();

        let response = response.map_err(ControllerError::request(SUBMIT_FAILED))?;
        Ok(Submitted {
            feedback: FeedbackView::from_response(&response, personalized),
            personalized,
            elapsed_seconds,
        })
    }

    pub fn go_to_dashboard(&self) -> Url {
        self.session.user.dashboard_url()
    }

    pub fn take_assessment(&self) -> Url {
        self.session.user.assessment_url()
    }

    pub fn into_session(self) -> Session<S> {
        self.session
    }
}
