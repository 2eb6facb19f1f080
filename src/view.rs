use crate::format::{
    capitalize, display_value, format_date, format_level, format_progress, format_score,
    DEFAULT_MAX_SCORE,
};
use crate::models::{LearningPlanDoc, PlanProgress};
use serde_json::Value;

pub const PLAN_DAYS: usize = 7;

pub const PROFILE_UNAVAILABLE: &str = "Profile unavailable right now.";
pub const GENERATE_PLAN_PROMPT: &str =
    "Assessment completed! Generate your personalized learning plan.";
pub const PLAN_UNAVAILABLE: &str = "No learning plan yet.";
pub const NO_ASSESSMENT: &str = "No assessment completed yet. Take an assessment to get started!";
pub const NO_PRACTICE: &str = "No practice sessions yet.";

fn lookup<'a>(doc: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    let mut current = doc?;
    for key in path {
        current = current.get(key)?;
    }
    (!current.is_null()).then_some(current)
}

fn lookup_str<'a>(doc: Option<&'a Value>, path: &[&str]) -> Option<&'a str> {
    lookup(doc, path).and_then(Value::as_str)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(list_item_text).collect())
        .unwrap_or_default()
}

pub fn list_item_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => other
            .get("text")
            .or_else(|| other.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResultsView {
    pub score: String,
    pub level: String,
    pub strengths: Vec<String>,
    pub focus_areas: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AssessmentResultsView {
    pub fn from_result(result: &Value) -> Self {
        let doc = Some(result);
        Self {
            score: format_score(
                lookup(doc, &["proficiency_score"]).unwrap_or(&Value::Null),
                DEFAULT_MAX_SCORE,
            ),
            level: format!("{} Level", format_level(lookup_str(doc, &["proficiency_level"]))),
            strengths: string_list(lookup(doc, &["strengths"])),
            focus_areas: string_list(lookup(doc, &["weak_areas"]))
                .iter()
                .map(|area| capitalize(area))
                .collect(),
            recommendations: string_list(lookup(doc, &["recommendations"])),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackView {
    Structured {
        personalized: bool,
        score: String,
        corrections: Vec<String>,
        suggestions: Vec<String>,
        personalized_tips: Option<Vec<String>>,
        progress_notes: Option<String>,
    },
    Raw(String),
}

impl FeedbackView {
    pub fn from_response(response: &Value, personalized: bool) -> Self {
        match response {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) if parsed.is_object() => Self::structured(&parsed, personalized),
                _ => Self::Raw(text.clone()),
            },
            Value::Object(_) => Self::structured(response, personalized),
            other => Self::Raw(other.to_string()),
        }
    }

    fn structured(doc: &Value, personalized: bool) -> Self {
        let doc = Some(doc);
        let (personalized_tips, progress_notes) = if personalized {
            (
                lookup(doc, &["personalized_tips"]).map(|tips| string_list(Some(tips))),
                lookup(doc, &["progress_notes"]).map(display_value),
            )
        } else {
            (None, None)
        };

        Self::Structured {
            personalized,
            score: format_score(
                lookup(doc, &["score"]).unwrap_or(&Value::Null),
                DEFAULT_MAX_SCORE,
            ),
            corrections: string_list(lookup(doc, &["corrections"])),
            suggestions: string_list(lookup(doc, &["suggestions"])),
            personalized_tips,
            progress_notes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub profile: Option<Value>,
    pub results: Option<Value>,
    pub plan: Option<Value>,
    pub sessions: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsGrid {
    pub proficiency_score: Option<String>,
    pub proficiency_level: Option<String>,
    pub completed_days: Option<String>,
    pub practice_score: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSection {
    Details(Vec<InfoItem>),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanSection {
    Progress {
        percent: f64,
        completed: String,
        title: String,
    },
    GeneratePrompt,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentSection {
    Summary {
        score: String,
        level: String,
        focus_areas: Vec<String>,
    },
    NotTaken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PracticeSection {
    Summary {
        total_sessions: String,
        average_score: String,
        last_session: String,
    },
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: StatsGrid,
    pub profile: ProfileSection,
    pub plan: PlanSection,
    pub assessment: AssessmentSection,
    pub practice: PracticeSection,
}

impl DashboardView {
    pub fn from_data(data: &DashboardData) -> Self {
        Self {
            stats: stats_grid(data),
            profile: profile_section(data.profile.as_ref()),
            plan: plan_section(data.plan.as_ref(), data.results.as_ref()),
            assessment: assessment_section(data.results.as_ref()),
            practice: practice_section(data.sessions.as_ref()),
        }
    }
}

fn completed_day_count(plan: Option<&Value>) -> Option<usize> {
    lookup(plan, &["progress", "completed_days"])
        .and_then(Value::as_array)
        .map(Vec::len)
}

fn stats_grid(data: &DashboardData) -> StatsGrid {
    StatsGrid {
        proficiency_score: lookup(
            data.results.as_ref(),
            &["latest_assessment", "proficiency_score"],
        )
        .map(display_value),
        proficiency_level: lookup_str(data.profile.as_ref(), &["proficiency_level"])
            .map(|level| format_level(Some(level))),
        completed_days: completed_day_count(data.plan.as_ref())
            .map(|count| format_progress(count, PLAN_DAYS)),
        practice_score: lookup(data.sessions.as_ref(), &["average_score"]).map(display_value),
    }
}

fn profile_section(profile: Option<&Value>) -> ProfileSection {
    if profile.is_none_or(Value::is_null) {
        return ProfileSection::Unavailable;
    }

    let goals = lookup(profile, &["learning_goals"])
        .and_then(Value::as_array)
        .map(|goals| {
            goals
                .iter()
                .map(list_item_text)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "None specified".to_string());

    ProfileSection::Details(vec![
        InfoItem {
            label: "Type",
            value: lookup_str(profile, &["user_type"])
                .unwrap_or_default()
                .to_uppercase(),
        },
        InfoItem {
            label: "Level",
            value: format_level(lookup_str(profile, &["proficiency_level"])),
        },
        InfoItem {
            label: "Goals",
            value: goals,
        },
    ])
}

fn plan_section(plan: Option<&Value>, results: Option<&Value>) -> PlanSection {
    if let Some(learning_plan) = lookup(plan, &["learning_plan"]) {
        let percent = lookup(plan, &["progress", "completion_percentage"])
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let completed = completed_day_count(plan).unwrap_or(0);
        return PlanSection::Progress {
            percent,
            completed: format_progress(completed, PLAN_DAYS),
            title: lookup(Some(learning_plan), &["plan_title"])
                .map(display_value)
                .unwrap_or_default(),
        };
    }

    if lookup(results, &["latest_assessment"]).is_some() {
        PlanSection::GeneratePrompt
    } else {
        PlanSection::Unavailable
    }
}

fn assessment_section(results: Option<&Value>) -> AssessmentSection {
    let Some(latest) = lookup(results, &["latest_assessment"]) else {
        return AssessmentSection::NotTaken;
    };
    let latest = Some(latest);

    AssessmentSection::Summary {
        score: format_score(
            lookup(latest, &["proficiency_score"]).unwrap_or(&Value::Null),
            DEFAULT_MAX_SCORE,
        ),
        level: format_level(lookup_str(latest, &["analysis_result", "proficiency_level"])),
        focus_areas: string_list(lookup(latest, &["weak_areas"]))
            .into_iter()
            .take(3)
            .collect(),
    }
}

fn practice_section(sessions: Option<&Value>) -> PracticeSection {
    let recent = lookup(sessions, &["recent_sessions"])
        .and_then(Value::as_array)
        .and_then(|recent| recent.first());
    let Some(recent) = recent else {
        return PracticeSection::Empty;
    };

    PracticeSection::Summary {
        total_sessions: lookup(sessions, &["total_sessions"])
            .map(display_value)
            .unwrap_or_else(|| "0".to_string()),
        average_score: format_score(
            lookup(sessions, &["average_score"]).unwrap_or(&Value::Null),
            DEFAULT_MAX_SCORE,
        ),
        last_session: lookup_str(Some(recent), &["timestamp"])
            .map(format_date)
            .unwrap_or_else(|| "Unknown date".to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub day: u32,
    pub title: String,
    pub focus_area: String,
    pub tasks: Vec<String>,
    pub learning_objective: String,
    pub estimated_time: String,
    pub completed: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanView {
    pub title: String,
    pub summary: String,
    pub weekly_goal: String,
    pub percent: u32,
    pub status: String,
    pub current_day: String,
    pub days: Vec<DayCard>,
    pub metrics: Vec<String>,
}

impl PlanView {
    pub fn build(plan: &LearningPlanDoc, progress: &PlanProgress) -> Self {
        let completed = progress.completed_days.len();
        let percent = ((completed as f64 / PLAN_DAYS as f64) * 100.0).round() as u32;

        let status = match completed {
            0 => "Getting started...".to_string(),
            PLAN_DAYS => "Plan completed! 🎉".to_string(),
            _ => format!("{} days completed", format_progress(completed, PLAN_DAYS)),
        };

        let current_day = if progress.current_day as usize > PLAN_DAYS {
            "Completed!".to_string()
        } else {
            format!("Day {}", progress.current_day)
        };

        let days = plan
            .daily_tasks
            .iter()
            .map(|task| {
                let done = progress.completed_days.contains(&task.day);
                DayCard {
                    day: task.day,
                    title: task.title.clone(),
                    focus_area: task.focus_area.clone(),
                    tasks: task.tasks.clone(),
                    learning_objective: task.learning_objective.clone(),
                    estimated_time: task.estimated_time.clone(),
                    completed: done,
                    current: task.day == progress.current_day && !done,
                }
            })
            .collect();

        Self {
            title: plan.plan_title.clone(),
            summary: plan.plan_summary.clone(),
            weekly_goal: plan.weekly_goal.clone(),
            percent,
            status,
            current_day,
            days,
            metrics: plan.success_metrics.clone(),
        }
    }
}
