use crate::models::{
    AssessmentRequest, BasicFeedbackRequest, FeedbackRequest, GeneratePlanRequest,
    PlanProgressRequest, ProfileRequest, Question,
};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {status}")]
    Status { status: StatusCode, body: Option<Value> },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let result = self.send(method, &url, body).await;
        if let Err(err) = &result {
            error!(%endpoint, "api error: {err}");
        }
        result
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(ClientError::Status { status, body });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn get(&self, endpoint: &str) -> Result<Value, ClientError> {
        self.request::<Value>(Method::GET, endpoint, None).await
    }

    pub async fn create_user_profile(&self, profile: &ProfileRequest) -> Result<Value, ClientError> {
        self.request(Method::POST, "/api/writepath/profile", Some(profile))
            .await
    }

    pub async fn get_user_profile(&self, user_id: &str) -> Result<Value, ClientError> {
        self.get(&format!("/api/writepath/profile/{user_id}")).await
    }

    pub async fn update_user_profile(
        &self,
        user_id: &str,
        profile: &ProfileRequest,
    ) -> Result<Value, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/writepath/profile/{user_id}"),
            Some(profile),
        )
        .await
    }

    pub async fn conduct_assessment(
        &self,
        assessment: &AssessmentRequest,
    ) -> Result<Value, ClientError> {
        self.request(Method::POST, "/api/writepath/assess", Some(assessment))
            .await
    }

    pub async fn get_assessment_results(&self, user_id: &str) -> Result<Value, ClientError> {
        self.get(&format!("/api/writepath/results/{user_id}")).await
    }

    pub async fn generate_learning_plan(&self, user_id: &str) -> Result<Value, ClientError> {
        let body = GeneratePlanRequest {
            user_id: user_id.to_string(),
        };
        self.request(Method::POST, "/api/writepath/generate-plan", Some(&body))
            .await
    }

    pub async fn get_learning_plan(&self, user_id: &str) -> Result<Value, ClientError> {
        self.get(&format!("/api/writepath/plan/{user_id}")).await
    }

    pub async fn update_plan_progress(
        &self,
        user_id: &str,
        completed_day: u32,
    ) -> Result<Value, ClientError> {
        let body = PlanProgressRequest {
            user_id: user_id.to_string(),
            completed_day,
        };
        self.request(Method::PUT, "/api/writepath/plan/progress", Some(&body))
            .await
    }

    pub async fn get_personalized_question(&self, user_id: &str) -> Result<Value, ClientError> {
        self.get(&format!("/api/writenow/question/{user_id}")).await
    }

    pub async fn get_enhanced_feedback(
        &self,
        user_id: &str,
        answer: &str,
        question_id: &str,
    ) -> Result<Value, ClientError> {
        let body = FeedbackRequest {
            user_id: user_id.to_string(),
            user_answer: answer.to_string(),
            question_id: question_id.to_string(),
        };
        self.request(Method::POST, "/api/writenow/feedback", Some(&body))
            .await
    }

    pub async fn get_basic_feedback(
        &self,
        answer: &str,
        question_id: &str,
    ) -> Result<Value, ClientError> {
        let body = BasicFeedbackRequest {
            answer: answer.to_string(),
            question_id: question_id.to_string(),
        };
        self.request(Method::POST, "/submit", Some(&body)).await
    }

    pub async fn get_practice_sessions(&self, user_id: &str) -> Result<Value, ClientError> {
        self.get(&format!("/api/writenow/sessions/{user_id}")).await
    }

    pub async fn get_question(&self, id: &str) -> Result<Question, ClientError> {
        let value = self.get(&format!("/questions/{id}")).await?;
        Ok(serde_json::from_value(value)?)
    }
}
