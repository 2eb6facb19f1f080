use axum::{http::StatusCode, response::IntoResponse, Json};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const USER_ID_PLACEHOLDER: &str = "{user_id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
        }
    }
}

/// One row of the forwarding table: where a proxy route goes upstream and
/// what to call the failure when upstream cannot be reached.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub verb: Verb,
    pub template: &'static str,
    pub failure: &'static str,
}

impl Endpoint {
    const fn new(verb: Verb, template: &'static str, failure: &'static str) -> Self {
        Self {
            verb,
            template,
            failure,
        }
    }

    pub fn path(&self, user_id: Option<&str>) -> String {
        match user_id {
            Some(id) => self.template.replace(USER_ID_PLACEHOLDER, id),
            None => self.template.to_string(),
        }
    }
}

pub mod endpoints {
    use super::{Endpoint, Verb};

    pub const ANALYZE: Endpoint = Endpoint::new(Verb::Post, "/analyze", "Analysis failed");
    pub const CREATE_PROFILE: Endpoint = Endpoint::new(
        Verb::Post,
        "/api/writepath/profile",
        "Profile creation failed",
    );
    pub const GET_PROFILE: Endpoint = Endpoint::new(
        Verb::Get,
        "/api/writepath/profile/{user_id}",
        "Profile retrieval failed",
    );
    pub const UPDATE_PROFILE: Endpoint = Endpoint::new(
        Verb::Put,
        "/api/writepath/profile/{user_id}",
        "Profile update failed",
    );
    pub const ASSESS: Endpoint =
        Endpoint::new(Verb::Post, "/api/writepath/assess", "Assessment failed");
    pub const RESULTS: Endpoint = Endpoint::new(
        Verb::Get,
        "/api/writepath/results/{user_id}",
        "Results retrieval failed",
    );
    pub const GENERATE_PLAN: Endpoint = Endpoint::new(
        Verb::Post,
        "/api/writepath/generate-plan",
        "Learning plan generation failed",
    );
    pub const GET_PLAN: Endpoint = Endpoint::new(
        Verb::Get,
        "/api/writepath/plan/{user_id}",
        "Learning plan retrieval failed",
    );
    pub const PLAN_PROGRESS: Endpoint = Endpoint::new(
        Verb::Put,
        "/api/writepath/plan/progress",
        "Progress update failed",
    );
    pub const PERSONALIZED_QUESTION: Endpoint = Endpoint::new(
        Verb::Get,
        "/api/writenow/question/{user_id}",
        "Failed to get personalized question",
    );
    pub const FEEDBACK: Endpoint = Endpoint::new(
        Verb::Post,
        "/api/writenow/feedback",
        "Enhanced feedback failed",
    );
    pub const SESSIONS: Endpoint = Endpoint::new(
        Verb::Get,
        "/api/writenow/sessions/{user_id}",
        "Failed to get practice sessions",
    );
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered {status} with a body that is not JSON: {source}")]
    InvalidBody {
        status: StatusCode,
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Clone)]
pub struct Upstream {
    client: Client,
    base_url: String,
}

impl Upstream {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &Endpoint, user_id: Option<&str>) -> String {
        format!("{}{}", self.base_url, endpoint.path(user_id))
    }

    pub async fn forward(
        &self,
        endpoint: &Endpoint,
        user_id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Relayed, UpstreamError> {
        let url = self.url_for(endpoint, user_id);
        debug!(verb = ?endpoint.verb, %url, "forwarding to upstream");

        let mut request = self.client.request(endpoint.verb.into(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|source| UpstreamError::InvalidBody { status, source })?
        };

        Ok(Relayed { status, body })
    }
}
