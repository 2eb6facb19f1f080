pub mod assessment;
pub mod dashboard;
pub mod learning_plan;
pub mod practice;

pub use assessment::{Assessment, Step};
pub use dashboard::Dashboard;
pub use learning_plan::LearningPlan;
pub use practice::Practice;

use crate::client::ClientError;
use crate::session::Redirect;

pub const NO_USER: &str = "No user found. Please complete an assessment first.";

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", .0.message)]
    Redirect(Redirect),
    #[error("{message}")]
    Request {
        message: &'static str,
        #[source]
        source: ClientError,
    },
    #[error("failed to update local storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl ControllerError {
    pub(crate) fn request(message: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Request { message, source }
    }

    pub fn redirect_target(&self) -> Option<&reqwest::Url> {
        match self {
            Self::Redirect(redirect) => Some(&redirect.to),
            _ => None,
        }
    }
}
