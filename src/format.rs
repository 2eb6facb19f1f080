use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const MIN_SAMPLE_WORDS: usize = 50;
pub const DEFAULT_MAX_SCORE: u32 = 30;

pub const MISSING_USER_TYPE: &str = "Please select your writing focus area.";
pub const MISSING_GOALS: &str = "Please select at least one learning goal.";
pub const EMPTY_SAMPLE: &str = "Please write a response to the prompt.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub user_type: String,
    pub target_score: Option<String>,
    pub goals: Vec<String>,
}

pub fn validate_profile_form(form: &ProfileForm) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if form.user_type.trim().is_empty() {
        errors.push(MISSING_USER_TYPE);
    }
    if form.goals.is_empty() {
        errors.push(MISSING_GOALS);
    }
    errors
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn validate_writing_sample(text: &str, min_words: usize) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err(EMPTY_SAMPLE.to_string());
    }
    if word_count(text) < min_words {
        return Err(format!(
            "Please write at least {min_words} words for a meaningful assessment."
        ));
    }
    Ok(())
}

pub fn format_score(score: &Value, max_score: u32) -> String {
    format!("{}/{max_score}", display_value(score))
}

pub fn format_level(level: Option<&str>) -> String {
    match level {
        Some(level) if !level.is_empty() => capitalize(level),
        _ => "Not assessed".to_string(),
    }
}

pub fn format_progress(completed: usize, total: usize) -> String {
    format!("{completed}/{total}")
}

pub fn format_date(timestamp: &str) -> String {
    let timestamp = timestamp.trim();
    let date = DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").map(|parsed| parsed.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f").map(|parsed| parsed.date()))
        .or_else(|_| NaiveDate::parse_from_str(timestamp, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => "Unknown date".to_string(),
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub const MISSING_VALUE: &str = "--";

pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => MISSING_VALUE.to_string(),
        other => other.to_string(),
    }
}
