use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub answer: Option<String>,
    #[serde(rename = "questionId")]
    pub question_id: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub user_answer: String,
    pub reference_answer: String,
    pub question_id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileRequest {
    pub user_type: String,
    pub target_score: Option<i64>,
    pub learning_goals: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentRequest {
    pub user_id: String,
    pub sample_writing: String,
    pub assessment_type: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct PlanProgressRequest {
    pub user_id: String,
    pub completed_day: u32,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRequest {
    pub user_id: String,
    pub user_answer: String,
    pub question_id: String,
}

#[derive(Debug, Serialize)]
pub struct BasicFeedbackRequest {
    pub answer: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LearningPlanDoc {
    pub plan_title: String,
    pub plan_summary: String,
    pub weekly_goal: String,
    pub daily_tasks: Vec<DailyTask>,
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyTask {
    pub day: u32,
    pub title: String,
    pub focus_area: String,
    pub tasks: Vec<String>,
    pub learning_objective: String,
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanProgress {
    #[serde(default)]
    pub completed_days: Vec<u32>,
    #[serde(default = "first_day")]
    pub current_day: u32,
    #[serde(default)]
    pub completion_percentage: f64,
}

impl PlanProgress {
    pub fn fresh() -> Self {
        Self {
            completed_days: Vec::new(),
            current_day: first_day(),
            completion_percentage: 0.0,
        }
    }
}

fn first_day() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PracticeQuestion {
    #[serde(deserialize_with = "string_or_number")]
    pub question_id: String,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub difficulty_level: String,
    #[serde(default)]
    pub selected_for: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analyze_request_uses_camel_case_keys() {
        let body = serde_json::to_value(AnalyzeRequest {
            user_answer: "text".into(),
            reference_answer: "".into(),
            question_id: json!("1"),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "userAnswer": "text", "referenceAnswer": "", "questionId": "1" })
        );
    }

    #[test]
    fn practice_question_accepts_numeric_id() {
        let question: PracticeQuestion =
            serde_json::from_value(json!({ "question_id": 7, "question_text": "Why?" })).unwrap();
        assert_eq!(question.question_id, "7");
        assert!(question.selected_for.is_empty());
    }

    #[test]
    fn progress_defaults_to_day_one() {
        let progress: PlanProgress = serde_json::from_value(json!({})).unwrap();
        assert_eq!(progress, PlanProgress::fresh());
    }
}
