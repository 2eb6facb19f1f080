use super::ControllerError;
use crate::client::ClientError;
use crate::format::{validate_profile_form, validate_writing_sample, ProfileForm, MIN_SAMPLE_WORDS};
use crate::models::{AssessmentRequest, ProfileRequest};
use crate::session::{LocalStore, Session};
use crate::view::AssessmentResultsView;
use reqwest::Url;
use serde_json::Value;
use std::io;
use tracing::error;

pub const SUBMISSION_FAILED: &str =
    "Sorry, there was an error processing your assessment. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    ProfileForm = 1,
    WritingSample = 2,
    Processing = 3,
    Results = 4,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    fn previous(self) -> Self {
        match self {
            Step::ProfileForm | Step::WritingSample => Step::ProfileForm,
            Step::Processing => Step::WritingSample,
            Step::Results => Step::Processing,
        }
    }
}

#[derive(Debug)]
pub struct Assessment<S> {
    session: Session<S>,
    step: Step,
    user_id: Option<String>,
    result: Option<Value>,
}

impl<S: LocalStore> Assessment<S> {
    pub async fn init(mut session: Session<S>, location: &Url) -> io::Result<Self> {
        let user_id = session.user.init(location).await?;
        Ok(Self {
            session,
            step: Step::ProfileForm,
            user_id,
            result: None,
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn progress_percent(&self) -> f64 {
        f64::from(self.step.number()) / 4.0 * 100.0
    }

    pub fn shows_target_score(user_type: &str) -> bool {
        user_type == "toefl"
    }

    pub fn next_step(&mut self, form: &ProfileForm) -> Result<Step, ControllerError> {
        if self.step == Step::ProfileForm {
            if let Some(first) = validate_profile_form(form).first() {
                return Err(ControllerError::Validation(first.to_string()));
            }
            self.step = Step::WritingSample;
        }
        Ok(self.step)
    }

    pub fn prev_step(&mut self) -> Step {
        self.step = self.step.previous();
        self.step
    }

    pub async fn submit(
        &mut self,
        form: &ProfileForm,
        sample: &str,
    ) -> Result<AssessmentResultsView, ControllerError> {
        let sample = sample.trim();
        validate_writing_sample(sample, MIN_SAMPLE_WORDS).map_err(ControllerError::Validation)?;

        self.step = Step::Processing;
        match self.run(form, sample).await {
            Ok(view) => {
                self.step = Step::Results;
                Ok(view)
            }
            Err(err) => {
                error!("assessment error: {err}");
                self.step = Step::WritingSample;
                Err(err)
            }
        }
    }

    async fn run(
        &mut self,
        form: &ProfileForm,
        sample: &str,
    ) -> Result<AssessmentResultsView, ControllerError> {
        let user_id = self.create_user_profile(form).await?;

        let request = AssessmentRequest {
            user_id,
            sample_writing: sample.to_string(),
            assessment_type: "initial".to_string(),
        };
        let response = self
            .session
            .api
            .conduct_assessment(&request)
            .await
            .map_err(ControllerError::request(SUBMISSION_FAILED))?;

        let result = response
            .get("assessment_result")
            .cloned()
            .unwrap_or(Value::Null);
        let view = AssessmentResultsView::from_result(&result);
        self.result = Some(result);
        Ok(view)
    }

    async fn create_user_profile(&mut self, form: &ProfileForm) -> Result<String, ControllerError> {
        let profile = ProfileRequest {
            user_type: form.user_type.clone(),
            target_score: form
                .target_score
                .as_deref()
                .and_then(|score| score.trim().parse::<i64>().ok()),
            learning_goals: form.goals.clone(),
        };

        let response = self
            .session
            .api
            .create_user_profile(&profile)
            .await
            .map_err(ControllerError::request(SUBMISSION_FAILED))?;

        let user_id = response
            .get("user_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ControllerError::Request {
                message: SUBMISSION_FAILED,
                source: ClientError::Decode(serde::de::Error::custom(
                    "profile response did not include a user_id",
                )),
            })?;

        self.session.user.persist_user_id(&user_id).await?;
        self.user_id = Some(user_id.clone());
        Ok(user_id)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn go_to_dashboard(&self) -> Url {
        self.session.user.dashboard_url()
    }

    pub fn start_practice(&self) -> Url {
        self.session.user.practice_url()
    }

    pub fn into_session(self) -> Session<S> {
        self.session
    }
}
