use super::{ControllerError, NO_USER};
use crate::client::ClientError;
use crate::models::{LearningPlanDoc, PlanProgress};
use crate::session::{LocalStore, Redirect, Session};
use crate::view::{PlanView, PLAN_DAYS};
use reqwest::Url;
use serde_json::Value;
use tracing::{error, info};

pub const LOAD_FAILED: &str = "Failed to load your learning plan. Please try again.";
pub const GENERATE_FAILED: &str =
    "Failed to generate your learning plan. Please ensure you have completed an assessment.";
pub const PROGRESS_FAILED: &str = "Failed to update progress. Please try again.";
pub const PLAN_COMPLETED: &str = "🎉 Congratulations! You have completed your 7-day learning plan!";

#[derive(Debug)]
pub struct LearningPlan<S> {
    session: Session<S>,
    user_id: String,
    plan: LearningPlanDoc,
    progress: PlanProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCompleted {
    pub view: PlanView,
    pub congratulation: Option<&'static str>,
}

fn field<T: serde::de::DeserializeOwned>(doc: &Value, key: &str) -> Result<Option<T>, ClientError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

impl<S: LocalStore> LearningPlan<S> {
    /// Loads the existing plan, generating one when upstream reports that
    /// none exists yet (404).
    pub async fn init(mut session: Session<S>, location: &Url) -> Result<Self, ControllerError> {
        let Some(user_id) = session.user.init(location).await? else {
            return Err(ControllerError::Redirect(Redirect {
                message: NO_USER,
                to: session.user.assessment_url(),
            }));
        };

        let loaded = session.api.get_learning_plan(&user_id).await;
        let (plan, progress) = match loaded {
            Ok(data) => {
                let plan = field::<LearningPlanDoc>(&data, "learning_plan")
                    .map_err(ControllerError::request(LOAD_FAILED))?
                    .unwrap_or_default();
                let progress = field::<PlanProgress>(&data, "progress")
                    .map_err(ControllerError::request(LOAD_FAILED))?
                    .unwrap_or_else(PlanProgress::fresh);
                (plan, progress)
            }
            Err(err) if err.is_not_found() => {
                info!("no learning plan yet, generating one");
                (Self::generate(&session, &user_id).await?, PlanProgress::fresh())
            }
            Err(err) => {
                error!("error loading learning plan: {err}");
                return Err(ControllerError::Request {
                    message: LOAD_FAILED,
                    source: err,
                });
            }
        };

        Ok(Self {
            session,
            user_id,
            plan,
            progress,
        })
    }

    async fn generate(session: &Session<S>, user_id: &str) -> Result<LearningPlanDoc, ControllerError> {
        let data = session
            .api
            .generate_learning_plan(user_id)
            .await
            .map_err(|err| {
                error!("error generating learning plan: {err}");
                ControllerError::Request {
                    message: GENERATE_FAILED,
                    source: err,
                }
            })?;

        Ok(field::<LearningPlanDoc>(&data, "learning_plan")
            .map_err(ControllerError::request(GENERATE_FAILED))?
            .unwrap_or_default())
    }

    pub fn view(&self) -> PlanView {
        PlanView::build(&self.plan, &self.progress)
    }

    pub fn progress(&self) -> &PlanProgress {
        &self.progress
    }

    pub fn plan(&self) -> &LearningPlanDoc {
        &self.plan
    }

    pub async fn complete_day(&mut self, day: u32) -> Result<DayCompleted, ControllerError> {
        let data = self
            .session
            .api
            .update_plan_progress(&self.user_id, day)
            .await
            .map_err(ControllerError::request(PROGRESS_FAILED))?;

        if let Some(progress) =
            field::<PlanProgress>(&data, "progress").map_err(ControllerError::request(PROGRESS_FAILED))?
        {
            self.progress = progress;
        }

        Ok(DayCompleted {
            view: self.view(),
            congratulation: (day as usize == PLAN_DAYS).then_some(PLAN_COMPLETED),
        })
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
