//! End-to-end tests for the prediction service

use fraudscope::config::Config;
use fraudscope::fragment::{self, HIDDEN_CLASS, RESULT_BOX_ID, RESULT_TEXT_ID};
use fraudscope::http::{HttpState, router};
use fraudscope::model::{ModelPackage, RESULT_FRAUD, RESULT_LEGIT};
use fraudscope::page::{InMemoryPage, PageSurface};
use fraudscope::schemas::{FEATURE_NAMES, FormPayload};
use fraudscope::submit::SubmissionHandler;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Spin up the real service on an ephemeral port with the demo model.
async fn spawn_service() -> String {
    let state = HttpState::new(
        Arc::new(Config::default()),
        Arc::new(ModelPackage::demo()),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn full_payload() -> FormPayload {
    let mut payload = FormPayload::new();
    for name in FEATURE_NAMES {
        payload.push(name, "0.0");
    }
    payload
}

fn multipart_form(payload: &FormPayload) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in payload.fields() {
        form = form.text(name.clone(), value.clone());
    }
    form
}

#[tokio::test]
async fn predict_returns_rendered_verdict() {
    let base = spawn_service().await;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .multipart(multipart_form(&full_payload()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    let extracted = fragment::extract_prediction(&body);

    let result = extracted.result.expect("result slot should be present");
    assert!(result == RESULT_FRAUD || result == RESULT_LEGIT);

    let probability: f64 = extracted
        .probability
        .expect("probability slot should be present")
        .parse()
        .unwrap();
    assert!((0.0..=1.0).contains(&probability));
}

#[tokio::test]
async fn missing_feature_yields_422() {
    let base = spawn_service().await;

    let mut payload = FormPayload::new();
    for name in FEATURE_NAMES.iter().copied().filter(|&n| n != "Amount") {
        payload.push(name, "0.0");
    }

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .multipart(multipart_form(&payload))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let body = response.text().await.unwrap();
    assert!(body.contains("Amount"));
}

#[tokio::test]
async fn non_numeric_feature_yields_422() {
    let base = spawn_service().await;

    let mut payload = full_payload();
    payload.push("V1", "not-a-number"); // later duplicate wins in the field map

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .multipart(multipart_form(&payload))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn index_page_has_form_and_no_result_slot() {
    let base = spawn_service().await;

    let body = reqwest::get(&base).await.unwrap().text().await.unwrap();
    assert!(body.contains(r#"id="predictionForm""#));
    assert!(body.contains(r#"name="Time""#));
    assert!(body.contains(r#"name="V28""#));
    assert!(fragment::extract_prediction(&body).result.is_none());
}

#[tokio::test]
async fn handler_roundtrip_updates_page_from_real_service() {
    let base = spawn_service().await;

    let handler = SubmissionHandler::new(&base, 5_000).unwrap();
    let page = Mutex::new(InMemoryPage::prediction_page());
    let outcome = handler.submit(&full_payload(), &page).await.unwrap();

    assert!(outcome.applied);
    let page = page.lock().await;
    let result = page.element_text(RESULT_TEXT_ID).unwrap();
    assert!(result == RESULT_FRAUD || result == RESULT_LEGIT);
    assert!(!page.has_class(RESULT_BOX_ID, HIDDEN_CLASS));
}

#[tokio::test]
async fn overlapping_submissions_both_complete() {
    let base = spawn_service().await;

    let handler = Arc::new(SubmissionHandler::new(&base, 5_000).unwrap());
    let page = Arc::new(Mutex::new(InMemoryPage::prediction_page()));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let handler = handler.clone();
            let page = page.clone();
            tokio::spawn(async move { handler.submit(&full_payload(), &page).await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().unwrap().applied);
    }
    assert!(!page.lock().await.has_class(RESULT_BOX_ID, HIDDEN_CLASS));
}

#[tokio::test]
async fn health_and_info_respond() {
    let base = spawn_service().await;

    let health = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(health, "ok");

    let info: serde_json::Value = serde_json::from_str(
        &reqwest::get(format!("{}/info", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(info["model"]["features"], 30);
}

#[tokio::test]
async fn metrics_count_predictions() {
    let base = spawn_service().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        client
            .post(format!("{}/predict", base))
            .multipart(multipart_form(&full_payload()))
            .send()
            .await
            .unwrap();
    }

    let body = client
        .get(format!("{}/metrics", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let metrics: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(metrics["total_requests"], 2);
}
