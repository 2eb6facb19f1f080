use crate::format::MISSING_VALUE;
use crate::view::{
    AssessmentResultsView, AssessmentSection, DashboardView, FeedbackView, InfoItem, PlanSection,
    PlanView, PracticeSection, ProfileSection, GENERATE_PLAN_PROMPT, NO_ASSESSMENT, NO_PRACTICE,
    PLAN_UNAVAILABLE, PROFILE_UNAVAILABLE,
};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_list(items: &[String], ordered: bool) -> String {
    if items.is_empty() {
        return String::new();
    }
    let tag = if ordered { "ol" } else { "ul" };
    let body: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape(item)))
        .collect();
    format!("<{tag}>{body}</{tag}>")
}

pub fn render_info_item(item: &InfoItem) -> String {
    format!(
        r#"<div class="info-item"><span class="label">{}:</span><span class="value">{}</span></div>"#,
        escape(item.label),
        escape(&item.value)
    )
}

pub fn render_assessment_results(view: &AssessmentResultsView) -> String {
    fill(
        ASSESSMENT_HTML,
        &[
            ("SCORE", escape(&view.score)),
            ("LEVEL", escape(&view.level)),
            ("STRENGTHS", render_list(&view.strengths, false)),
            ("FOCUS", render_list(&view.focus_areas, false)),
            ("NEXT_STEPS", render_list(&view.recommendations, true)),
        ],
    )
}

pub fn render_feedback(view: &FeedbackView) -> String {
    match view {
        FeedbackView::Raw(text) => format!(
            r#"<div class="feedback-content"><h3>📊 AI Feedback Results</h3><div class="feedback-raw">{}</div></div>"#,
            escape(text)
        ),
        FeedbackView::Structured {
            personalized,
            score,
            corrections,
            suggestions,
            personalized_tips,
            progress_notes,
        } => {
            let mut sections = String::new();
            if !corrections.is_empty() {
                sections.push_str(&feedback_list("✏️ Corrections", corrections));
            }
            sections.push_str(&feedback_list("💡 Suggestions for Improvement", suggestions));
            if let Some(tips) = personalized_tips {
                sections.push_str(&feedback_list("🎯 Personalized Tips", tips));
            }
            if let Some(notes) = progress_notes {
                sections.push_str(&format!(
                    r#"<div class="feedback-list"><h4>📈 Progress Notes</h4><p>{}</p></div>"#,
                    escape(notes)
                ));
            }

            let heading = if *personalized {
                "Personalized AI Feedback Results"
            } else {
                "AI Feedback Results"
            };
            format!(
                r#"<div class="feedback-content"><h3>📊 {heading}</h3><div class="score">Score: {}</div>{sections}</div>"#,
                escape(score)
            )
        }
    }
}

fn feedback_list(title: &str, items: &[String]) -> String {
    format!(
        r#"<div class="feedback-list"><h4>{title}</h4>{}</div>"#,
        render_list(items, false)
    )
}

fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape(text))
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let stat = |value: &Option<String>| escape(value.as_deref().unwrap_or(MISSING_VALUE));

    let profile: String = match &view.profile {
        ProfileSection::Details(items) => items.iter().map(render_info_item).collect(),
        ProfileSection::Unavailable => paragraph(PROFILE_UNAVAILABLE),
    };

    let plan = match &view.plan {
        PlanSection::Progress {
            percent,
            completed,
            title,
        } => format!(
            r#"<div class="plan-progress"><div class="progress-bar"><div class="progress-fill" style="width: {percent}%"></div></div><p>{} days completed</p><p class="plan-title">{}</p></div><button id="planActionBtn">View Plan</button>"#,
            escape(completed),
            escape(title)
        ),
        PlanSection::GeneratePrompt => format!(
            r#"{}<button id="planActionBtn">Generate Plan</button>"#,
            paragraph(GENERATE_PLAN_PROMPT)
        ),
        PlanSection::Unavailable => paragraph(PLAN_UNAVAILABLE),
    };

    let assessment = match &view.assessment {
        AssessmentSection::Summary {
            score,
            level,
            focus_areas,
        } => format!(
            r#"<div class="assessment-score"><span class="score-badge">{}</span><span class="level-badge">{}</span></div><div class="weak-areas"><p><strong>Focus Areas:</strong> {}</p></div>"#,
            escape(score),
            escape(level),
            escape(&focus_areas.join(", "))
        ),
        AssessmentSection::NotTaken => paragraph(NO_ASSESSMENT),
    };

    let practice = match &view.practice {
        PracticeSection::Summary {
            total_sessions,
            average_score,
            last_session,
        } => format!(
            r#"<div class="practice-stats"><p><strong>Total Sessions:</strong> {}</p><p><strong>Average Score:</strong> {}</p><p><strong>Last Session:</strong> {}</p></div>"#,
            escape(total_sessions),
            escape(average_score),
            escape(last_session)
        ),
        PracticeSection::Empty => paragraph(NO_PRACTICE),
    };

    fill(
        DASHBOARD_HTML,
        &[
            ("PROFICIENCY_SCORE", stat(&view.stats.proficiency_score)),
            ("PROFICIENCY_LEVEL", stat(&view.stats.proficiency_level)),
            ("COMPLETED_DAYS", stat(&view.stats.completed_days)),
            ("PRACTICE_SCORE", stat(&view.stats.practice_score)),
            ("PROFILE", profile),
            ("PLAN", plan),
            ("ASSESSMENT", assessment),
            ("PRACTICE", practice),
        ],
    )
}

pub fn render_plan(view: &PlanView) -> String {
    let days: String = view
        .days
        .iter()
        .map(|day| {
            let mut class = String::from("day-card");
            if day.completed {
                class.push_str(" completed");
            }
            if day.current {
                class.push_str(" current");
            }
            let button = if day.completed {
                r#"<button class="completion-btn completed" disabled>✓ Completed</button>"#
            } else {
                r#"<button class="completion-btn">Mark Complete</button>"#
            };
            let tasks: String = day
                .tasks
                .iter()
                .map(|task| format!(r#"<div class="task-item">{}</div>"#, escape(task)))
                .collect();
            format!(
                r#"<div class="{class}" data-day="{}"><div class="day-header"><div class="day-number">{}</div><div class="day-title"><h3>{}</h3><div class="focus-area">Focus: {}</div></div>{button}</div><div class="tasks-list">{tasks}</div><div class="learning-objective"><div class="objective-label">Learning Objective:</div><div class="objective-text">{}</div></div><div class="estimated-time">⏱️ {}</div></div>"#,
                day.day,
                day.day,
                escape(&day.title),
                escape(&day.focus_area),
                escape(&day.learning_objective),
                escape(&day.estimated_time)
            )
        })
        .collect();

    fill(
        PLAN_HTML,
        &[
            ("TITLE", escape(&view.title)),
            ("SUMMARY", escape(&view.summary)),
            ("GOAL", escape(&view.weekly_goal)),
            ("DEGREES", (view.percent as f64 * 3.6).to_string()),
            ("PERCENT", view.percent.to_string()),
            ("STATUS", escape(&view.status)),
            ("CURRENT_DAY", escape(&view.current_day)),
            ("DAYS", days),
            ("METRICS", render_list(&view.metrics, false)),
        ],
    )
}

pub fn render_practice_page(question_id: &str, question_text: &str, welcome: Option<&str>) -> String {
    let welcome = welcome
        .map(|text| format!(r#"<div id="userContext"><p id="userWelcome">{}</p></div>"#, escape(text)))
        .unwrap_or_default();

    fill(
        PRACTICE_HTML,
        &[
            ("WELCOME", welcome),
            ("QUESTION_ID", escape(question_id)),
            ("QUESTION", escape(question_text)),
        ],
    )
}

// Placeholders are resolved in one pass over the template, so inserted text
// is never scanned for further placeholders.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let Some(end) = tail.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &tail[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &tail[end + 2..];
    }
    out.push_str(rest);
    out
}

const ASSESSMENT_HTML: &str = r#"<div class="results-header">
  <div class="results-score">{{SCORE}}</div>
  <div class="results-level">{{LEVEL}}</div>
</div>
<div class="results-grid">
  <div class="results-strengths"><h4>✓ Your Strengths</h4>{{STRENGTHS}}</div>
  <div class="results-focus"><h4>⚡ Areas to Focus</h4>{{FOCUS}}</div>
</div>
<div class="results-next"><h4>📋 Recommended Next Steps</h4>{{NEXT_STEPS}}</div>
"#;

const DASHBOARD_HTML: &str = r#"<div id="dashboardContent">
  <div class="stats-grid">
    <div class="stat"><span id="proficiencyScore">{{PROFICIENCY_SCORE}}</span><label>Proficiency Score</label></div>
    <div class="stat"><span id="proficiencyLevel">{{PROFICIENCY_LEVEL}}</span><label>Level</label></div>
    <div class="stat"><span id="completedDays">{{COMPLETED_DAYS}}</span><label>Plan Days</label></div>
    <div class="stat"><span id="practiceScore">{{PRACTICE_SCORE}}</span><label>Practice Average</label></div>
  </div>
  <section id="profileDetails">{{PROFILE}}</section>
  <section id="learningPlanSummary">{{PLAN}}</section>
  <section id="assessmentSummary">{{ASSESSMENT}}</section>
  <section id="practiceSummary">{{PRACTICE}}</section>
</div>
"#;

const PLAN_HTML: &str = r#"<div id="planContent">
  <header>
    <h1 id="planTitle">{{TITLE}}</h1>
    <p id="planSummary">{{SUMMARY}}</p>
    <p class="goal">Weekly goal: <span id="goalText">{{GOAL}}</span></p>
  </header>
  <div class="progress">
    <div id="progressCircle" style="--progress: {{DEGREES}}deg"><span id="progressText">{{PERCENT}}%</span></div>
    <p id="progressStatus">{{STATUS}}</p>
    <p id="currentDayText">{{CURRENT_DAY}}</p>
  </div>
  <div id="dailyTasks">{{DAYS}}</div>
  <div class="metrics"><h3>Success Metrics</h3><div id="metricsList">{{METRICS}}</div></div>
</div>
"#;

const PRACTICE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Write Track Lite</title>
</head>
<body>
  <main class="app">
    <header>
      <h1>Write Track Lite</h1>
      <p class="subtitle">Practice your writing and get AI feedback.</p>
    </header>
    {{WELCOME}}
    <section class="question" data-question-id="{{QUESTION_ID}}">
      <p id="question">{{QUESTION}}</p>
    </section>
    <form id="answer-form">
      <textarea id="userAnswer" rows="14" placeholder="Type your answer here..."></textarea>
      <button id="submitBtn" type="submit">Submit for Personalized AI Review</button>
    </form>
    <div id="loading-indicator" hidden>Analyzing... <span id="seconds-counter">0</span>s</div>
    <div id="feedback" hidden></div>
  </main>
  <script>
    const form = document.getElementById('answer-form');
    const feedback = document.getElementById('feedback');
    const loading = document.getElementById('loading-indicator');
    const counter = document.getElementById('seconds-counter');
    const questionId = document.querySelector('.question').dataset.questionId;

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const answer = document.getElementById('userAnswer').value;
      if (!answer.trim()) {
        alert('Please type your answer before submitting');
        return;
      }
      let seconds = 0;
      counter.textContent = seconds;
      loading.hidden = false;
      const timer = setInterval(() => { counter.textContent = ++seconds; }, 1000);
      try {
        const res = await fetch('/submit', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ answer, questionId })
        });
        if (!res.ok) {
          throw new Error(`HTTP ${res.status}`);
        }
        const data = await res.json();
        feedback.textContent = `Score: ${data.score}/30`;
        feedback.hidden = false;
      } catch (err) {
        alert('Failed to submit answer. Please try again later.');
      } finally {
        clearInterval(timer);
        loading.hidden = true;
      }
    });
  </script>
</body>
</html>
"#;
