mod common;

use axum::http::Method;
use common::{rule, spawn_proxy, words, FakeUpstream};
use reqwest::Url;
use serde_json::json;
use write_track::controllers::assessment::SUBMISSION_FAILED;
use write_track::controllers::learning_plan::{LOAD_FAILED, PLAN_COMPLETED};
use write_track::controllers::{Assessment, ControllerError, Dashboard, LearningPlan, Practice, Step, NO_USER};
use write_track::format::ProfileForm;
use write_track::render::render_dashboard;
use write_track::session::USER_ID_KEY;
use write_track::view::{
    AssessmentSection, FeedbackView, PlanSection, PracticeSection, ProfileSection, NO_PRACTICE,
};
use write_track::{ApiClient, FileStore, LocalStore, MemoryStore, Session, UserManager};

fn origin() -> Url {
    Url::parse("http://localhost:3000/").unwrap()
}

fn location(page: &str) -> Url {
    origin().join(page).unwrap()
}

fn memory_session(proxy: &str) -> Session<MemoryStore> {
    Session::new(
        ApiClient::new(proxy),
        UserManager::new(MemoryStore::default(), origin()),
    )
}

fn unique_store_path() -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("write_track_local_{}_{}.json", std::process::id(), nanos));
    path
}

fn profile_form() -> ProfileForm {
    ProfileForm {
        user_type: "toefl".into(),
        target_score: Some("25".into()),
        goals: vec!["grammar".into()],
    }
}

fn seven_day_plan() -> serde_json::Value {
    json!({
        "plan_title": "Grammar Sprint",
        "plan_summary": "A week of focused grammar work.",
        "weekly_goal": "Cut grammar errors in half",
        "daily_tasks": (1..=7).map(|day| json!({
            "day": day,
            "title": format!("Day {day}"),
            "focus_area": "grammar",
            "tasks": ["Read", "Write"],
            "learning_objective": "Practice",
            "estimated_time": "30 minutes"
        })).collect::<Vec<_>>(),
        "success_metrics": ["Fewer errors"]
    })
}

#[tokio::test]
async fn assessment_creates_profile_and_carries_user_id() {
    let upstream = FakeUpstream::start(vec![
        rule(Method::POST, "/api/writepath/profile", 200, json!({ "user_id": "abc123" })),
        rule(
            Method::POST,
            "/api/writepath/assess",
            200,
            json!({
                "assessment_result": {
                    "proficiency_score": 22,
                    "proficiency_level": "intermediate",
                    "strengths": ["clear structure"],
                    "weak_areas": ["grammar"],
                    "recommendations": ["Review articles"]
                }
            }),
        ),
    ]);
    let proxy = spawn_proxy(&upstream.base_url);
    let store_path = unique_store_path();
    let session = Session::new(
        ApiClient::new(&proxy),
        UserManager::new(FileStore::new(&store_path), origin()),
    );

    let mut assessment = Assessment::init(session, &location("/assessment.html"))
        .await
        .unwrap();
    assessment.next_step(&profile_form()).unwrap();
    let results = assessment
        .submit(&profile_form(), &words(50))
        .await
        .unwrap();

    assert_eq!(assessment.step(), Step::Results);
    assert_eq!(results.score, "22/30");
    assert_eq!(results.level, "Intermediate Level");
    assert_eq!(results.focus_areas, vec!["Grammar"]);
    assert_eq!(assessment.user_id(), Some("abc123"));

    let dashboard = assessment.go_to_dashboard();
    assert_eq!(dashboard.path(), "/dashboard.html");
    assert!(dashboard.as_str().contains("user_id=abc123"));
    assert!(assessment.start_practice().as_str().contains("user_id=abc123"));

    let stored = FileStore::new(&store_path).get(USER_ID_KEY).await.unwrap();
    assert_eq!(stored.as_deref(), Some("abc123"));

    let profile = upstream.requests_to("/api/writepath/profile");
    assert_eq!(
        profile[0].body,
        json!({ "user_type": "toefl", "target_score": 25, "learning_goals": ["grammar"] })
    );
    let assess = upstream.requests_to("/api/writepath/assess");
    assert_eq!(assess[0].body["user_id"], "abc123");
    assert_eq!(assess[0].body["assessment_type"], "initial");
    assert_eq!(assess[0].body["sample_writing"], words(50));

    let _ = std::fs::remove_file(&store_path);
}

#[tokio::test]
async fn failed_assessment_returns_to_writing_sample() {
    let upstream = FakeUpstream::start(vec![
        rule(Method::POST, "/api/writepath/profile", 200, json!({ "user_id": "abc123" })),
        rule(Method::POST, "/api/writepath/assess", 500, json!({ "error": "model offline" })),
    ]);
    let proxy = spawn_proxy(&upstream.base_url);

    let mut assessment = Assessment::init(memory_session(&proxy), &location("/assessment.html"))
        .await
        .unwrap();
    assessment.next_step(&profile_form()).unwrap();
    let err = assessment
        .submit(&profile_form(), &words(60))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), SUBMISSION_FAILED);
    let ControllerError::Request { source, .. } = &err else {
        panic!("expected a request failure, got {err:?}");
    };
    assert_eq!(source.status().map(|status| status.as_u16()), Some(500));
    assert_eq!(assessment.step(), Step::WritingSample);
    assert!(assessment.result().is_none());
}

#[tokio::test]
async fn dashboard_degrades_only_the_failed_section() {
    let upstream = FakeUpstream::start(vec![
        rule(
            Method::GET,
            "/api/writepath/profile/u1",
            200,
            json!({ "user_type": "toefl", "proficiency_level": "intermediate", "learning_goals": ["grammar"] }),
        ),
        rule(
            Method::GET,
            "/api/writepath/results/u1",
            200,
            json!({ "latest_assessment": { "proficiency_score": 21, "weak_areas": ["grammar"] } }),
        ),
        rule(
            Method::GET,
            "/api/writepath/plan/u1",
            200,
            json!({
                "learning_plan": { "plan_title": "Grammar Sprint" },
                "progress": { "completed_days": [1], "completion_percentage": 14.3 }
            }),
        ),
        rule(Method::GET, "/api/writenow/sessions/u1", 500, json!({ "error": "db down" })),
    ]);
    let proxy = spawn_proxy(&upstream.base_url);

    let mut dashboard = Dashboard::init(memory_session(&proxy), &location("/dashboard.html?user_id=u1"))
        .await
        .unwrap();
    let view = dashboard.load_all().await;

    assert!(matches!(view.profile, ProfileSection::Details(_)));
    assert!(matches!(view.assessment, AssessmentSection::Summary { .. }));
    assert!(matches!(view.plan, PlanSection::Progress { .. }));
    assert_eq!(view.practice, PracticeSection::Empty);
    assert_eq!(view.stats.completed_days.as_deref(), Some("1/7"));
    assert!(view.stats.practice_score.is_none());

    let html = render_dashboard(&view);
    assert!(html.contains(NO_PRACTICE));
    assert!(html.contains("Grammar Sprint"));
    assert_eq!(upstream.take().len(), 4);
}

#[tokio::test]
async fn dashboard_without_user_redirects_to_assessment() {
    let upstream = FakeUpstream::start(vec![]);
    let proxy = spawn_proxy(&upstream.base_url);

    let err = Dashboard::init(memory_session(&proxy), &location("/dashboard.html"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), NO_USER);
    assert_eq!(err.redirect_target().unwrap().path(), "/assessment.html");
    assert!(upstream.take().is_empty());
}

#[tokio::test]
async fn dashboard_generates_missing_plan_on_request() {
    let upstream = FakeUpstream::start(vec![
        rule(
            Method::GET,
            "/api/writepath/results/u1",
            200,
            json!({ "latest_assessment": { "proficiency_score": 19 } }),
        ),
        rule(Method::GET, "/api/writepath/plan/u1", 404, json!({ "error": "not found" })),
        rule(
            Method::POST,
            "/api/writepath/generate-plan",
            200,
            json!({ "learning_plan": seven_day_plan() }),
        ),
    ]);
    let proxy = spawn_proxy(&upstream.base_url);

    let mut dashboard = Dashboard::init(memory_session(&proxy), &location("/dashboard.html?user_id=u1"))
        .await
        .unwrap();
    let view = dashboard.load_all().await;
    assert_eq!(view.plan, PlanSection::GeneratePrompt);

    let next = dashboard.view_learning_plan().await.unwrap();
    assert_eq!(next.path(), "/writepath/plan.html");
    assert!(next.as_str().contains("user_id=u1"));

    let generated = upstream.requests_to("/api/writepath/generate-plan");
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].body, json!({ "user_id": "u1" }));
}

#[tokio::test]
async fn learning_plan_is_generated_when_none_exists() {
    let upstream = FakeUpstream::start(vec![
        rule(Method::GET, "/api/writepath/plan/u2", 404, json!({ "error": "not found" })),
        rule(
            Method::POST,
            "/api/writepath/generate-plan",
            200,
            json!({ "learning_plan": seven_day_plan() }),
        ),
        rule(
            Method::PUT,
            "/api/writepath/plan/progress",
            200,
            json!({ "progress": { "completed_days": [7], "current_day": 1, "completion_percentage": 14.3 } }),
        ),
    ]);
    let proxy = spawn_proxy(&upstream.base_url);

    let mut plan = LearningPlan::init(memory_session(&proxy), &location("/writepath/plan.html?user_id=u2"))
        .await
        .unwrap();
    let view = plan.view();
    assert_eq!(view.title, "Grammar Sprint");
    assert_eq!(view.status, "Getting started...");
    assert_eq!(view.current_day, "Day 1");
    assert_eq!(view.days.len(), 7);
    assert!(view.days[0].current);
    assert_eq!(
        upstream.requests_to("/api/writepath/generate-plan")[0].body,
        json!({ "user_id": "u2" })
    );

    let completed = plan.complete_day(7).await.unwrap();
    assert_eq!(completed.congratulation, Some(PLAN_COMPLETED));
    assert_eq!(plan.progress().completed_days, vec![7]);
    assert!(completed.view.days[6].completed);
    assert_eq!(
        upstream.requests_to("/api/writepath/plan/progress")[0].body,
        json!({ "user_id": "u2", "completed_day": 7 })
    );
}

#[tokio::test]
async fn learning_plan_other_failures_do_not_generate() {
    let upstream = FakeUpstream::start(vec![rule(
        Method::GET,
        "/api/writepath/plan/u3",
        500,
        json!({ "error": "plan store unavailable" }),
    )]);
    let proxy = spawn_proxy(&upstream.base_url);

    let err = LearningPlan::init(memory_session(&proxy), &location("/writepath/plan.html?user_id=u3"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), LOAD_FAILED);
    assert!(upstream.requests_to("/api/writepath/generate-plan").is_empty());
}

#[tokio::test]
async fn practice_uses_personalized_question_and_feedback() {
    let upstream = FakeUpstream::start(vec![
        rule(
            Method::GET,
            "/api/writepath/profile/u4",
            200,
            json!({ "user_type": "toefl", "proficiency_level": "advanced" }),
        ),
        rule(
            Method::GET,
            "/api/writenow/question/u4",
            200,
            json!({
                "question_id": 12,
                "question_text": "Describe a teacher who influenced you.",
                "difficulty_level": "advanced",
                "selected_for": ["coherence"]
            }),
        ),
        rule(
            Method::POST,
            "/api/writenow/feedback",
            200,
            json!({
                "score": 26,
                "corrections": [],
                "suggestions": ["Add a counterexample"],
                "personalized_tips": ["Link paragraphs with transitions"],
                "progress_notes": "Steady improvement."
            }),
        ),
    ]);
    let proxy = spawn_proxy(&upstream.base_url);

    let practice = Practice::init(memory_session(&proxy), &location("/index.html?user_id=u4"))
        .await
        .unwrap();
    assert_eq!(
        practice.welcome(),
        Some("Welcome back! Practicing for TOEFL | Level: Advanced")
    );
    assert!(practice.has_personalized_question());
    assert_eq!(practice.question().question_id, "12");
    assert!(practice.page().contains("Describe a teacher who influenced you."));

    let submitted = practice.submit("My favourite teacher taught me patience.").await.unwrap();
    assert!(submitted.personalized);
    let FeedbackView::Structured {
        score,
        personalized_tips,
        progress_notes,
        ..
    } = submitted.feedback
    else {
        panic!("expected structured feedback");
    };
    assert_eq!(score, "26/30");
    assert_eq!(
        personalized_tips,
        Some(vec!["Link paragraphs with transitions".to_string()])
    );
    assert_eq!(progress_notes.as_deref(), Some("Steady improvement."));

    let sent = upstream.requests_to("/api/writenow/feedback");
    assert_eq!(
        sent[0].body,
        json!({
            "user_id": "u4",
            "user_answer": "My favourite teacher taught me patience.",
            "question_id": "12"
        })
    );
}

#[tokio::test]
async fn anonymous_practice_goes_through_basic_feedback() {
    let upstream = FakeUpstream::start(vec![rule(
        Method::POST,
        "/analyze",
        200,
        json!({ "score": 20, "corrections": ["Use 'fewer' here"], "suggestions": [] }),
    )]);
    let proxy = spawn_proxy(&upstream.base_url);

    let practice = Practice::init(memory_session(&proxy), &location("/index.html"))
        .await
        .unwrap();
    assert!(!practice.has_personalized_question());

    let submitted = practice.submit("Technology is useful.").await.unwrap();
    assert!(!submitted.personalized);
    assert_eq!(
        submitted.feedback,
        FeedbackView::Structured {
            personalized: false,
            score: "20/30".into(),
            corrections: vec!["Use 'fewer' here".into()],
            suggestions: vec![],
            personalized_tips: None,
            progress_notes: None,
        }
    );

    let analyzed = upstream.requests_to("/analyze");
    assert_eq!(analyzed.len(), 1);
    assert_eq!(analyzed[0].body["questionId"], "1");
    assert_eq!(analyzed[0].body["userAnswer"], "Technology is useful.");
    assert_ne!(analyzed[0].body["referenceAnswer"], "");
}

#[tokio::test]
async fn practice_falls_back_to_default_question() {
    let upstream = FakeUpstream::start(vec![rule(
        Method::GET,
        "/api/writenow/question/u5",
        500,
        json!({ "error": "no questions" }),
    )]);
    let proxy = spawn_proxy(&upstream.base_url);

    let mut practice = Practice::init(memory_session(&proxy), &location("/index.html?user_id=u5"))
        .await
        .unwrap();
    assert!(!practice.has_personalized_question());
    assert_eq!(practice.question().question_id, "1");
    assert!(!practice.load_new_question().await.unwrap());
}

#[tokio::test]
async fn api_client_reads_local_questions() {
    let upstream = FakeUpstream::start(vec![]);
    let proxy = spawn_proxy(&upstream.base_url);
    let api = ApiClient::new(&proxy);

    let question = api.get_question("1").await.unwrap();
    assert_eq!(question.id, "1");

    let err = api.get_question("404").await.unwrap_err();
    assert!(err.is_not_found());
}
