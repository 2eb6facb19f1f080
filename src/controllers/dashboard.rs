use super::{ControllerError, NO_USER};
use crate::client::ClientError;
use crate::session::{LocalStore, Redirect, Session};
use crate::view::{DashboardData, DashboardView};
use reqwest::Url;
use serde_json::Value;
use tracing::warn;

pub const PLAN_GENERATION_FAILED: &str = "Failed to generate learning plan. Please try again.";
pub const ASSESSMENT_BEFORE_PLAN: &str =
    "Please complete an assessment first to generate a learning plan.";

#[derive(Debug)]
pub struct Dashboard<S> {
    session: Session<S>,
    user_id: String,
    data: DashboardData,
}

impl<S: LocalStore> Dashboard<S> {
    pub async fn init(mut session: Session<S>, location: &Url) -> Result<Self, ControllerError> {
        let Some(user_id) = session.user.init(location).await? else {
            return Err(ControllerError::Redirect(Redirect {
                message: NO_USER,
                to: session.user.assessment_url(),
            }));
        };

        Ok(Self {
            session,
            user_id,
            data: DashboardData::default(),
        })
    }

    pub async fn load_all(&mut self) -> DashboardView {
        let api = &self.session.api;
        let user_id = self.user_id.as_str();
        let (profile, results, plan, sessions) = tokio::join!(
            api.get_user_profile(user_id),
            api.get_assessment_results(user_id),
            api.get_learning_plan(user_id),
            api.get_practice_sessions(user_id),
        );

        self.data = DashboardData {
            profile: settle("profile", profile),
            results: settle("assessment results", results),
            plan: settle("learning plan", plan),
            sessions: settle("practice sessions", sessions),
        };
        self.view()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_data(&self.data)
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    fn has_assessment(&self) -> bool {
        self.data
            .results
            .as_ref()
            .and_then(|results| results.get("latest_assessment"))
            .is_some_and(|latest| !latest.is_null())
    }

    fn has_plan(&self) -> bool {
        self.data
            .plan
            .as_ref()
            .and_then(|plan| plan.get("learning_plan"))
            .is_some_and(|plan| !plan.is_null())
    }

    pub async fn generate_plan(&self) -> Result<Url, ControllerError> {
        if !self.has_assessment() {
            return Err(ControllerError::Redirect(Redirect {
                message: ASSESSMENT_BEFORE_PLAN,
                to: self.session.user.assessment_url(),
            }));
        }

        self.session
            .api
            .generate_learning_plan(&self.user_id)
            .await
            .map_err(ControllerError::request(PLAN_GENERATION_FAILED))?;
        Ok(self.session.user.learning_plan_url())
    }

    pub async fn view_learning_plan(&self) -> Result<Url, ControllerError> {
        if self.has_plan() {
            Ok(self.session.user.learning_plan_url())
        } else {
            self.generate_plan().await
        }
    }

    pub fn take_assessment(&self) -> Url {
        self.session.user.assessment_url()
    }

    pub fn start_practice(&self) -> Url {
        self.session.user.practice_url()
    }

    pub fn into_session(self) -> Session<S> {
        self.session
    }
}

fn settle(section: &str, result: Result<Value, ClientError>) -> Option<Value> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(section, "dashboard section unavailable: {err}");
            None
        }
    }
}
