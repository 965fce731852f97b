pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ranking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Ranking API
        .route("/api/v1/rank", post(handlers::handle_rank))
        .route("/api/v1/rank/export", post(handlers::handle_rank_export))
        .route(
            "/api/v1/rank/statistics",
            post(handlers::handle_rank_statistics),
        )
        .route("/api/v1/rank/csv", post(handlers::handle_rank_csv))
        .route("/api/v1/rank/resumes", post(handlers::handle_rank_resumes))
        // Document API
        .route(
            "/api/v1/documents/extract",
            post(handlers::handle_extract_document),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::ranking::similarity::TfIdfScorer;

    const BOUNDARY: &str = "ranker-test-boundary";

    fn app() -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        build_router(AppState {
            config,
            relevance: Arc::new(TfIdfScorer),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Builds a multipart body from (field, optional filename, content) parts.
    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn scenario_body() -> Value {
        json!({
            "target": { "skills": ["python", "data analysis"] },
            "candidates": [
                { "id": 1, "name": "Ada", "email": "ada@example.com", "skills": ["python", "excel"],
                  "experience_years": 4, "education_level": "bachelor" },
                { "id": 2, "name": "Bola", "skills": ["java"],
                  "experience_years": 8, "education_level": "Masters" }
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_rank_orders_candidates() {
        let response = app()
            .oneshot(json_request("/api/v1/rank", scenario_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates[0]["id"], "1");
        assert_eq!(candidates[0]["rank"], 1);
        assert_eq!(candidates[1]["id"], "2");
        assert_eq!(body["scorer_backend"], "tfidf");
        assert!(candidates[0]["summary"]
            .as_str()
            .unwrap()
            .starts_with("Skill relevance"));
    }

    #[tokio::test]
    async fn test_rank_export_projection() {
        let response = app()
            .oneshot(json_request("/api/v1/rank/export", scenario_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rows = body_json(response).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["email"], "ada@example.com");
        assert!(rows[0].get("summary").is_none());
        assert!(rows[0]["score"].as_f64().unwrap() > rows[1]["score"].as_f64().unwrap());
    }

    #[tokio::test]
    async fn test_rank_statistics() {
        let response = app()
            .oneshot(json_request("/api/v1/rank/statistics", scenario_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stats = body_json(response).await;
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["under_review"], 2);
        assert_eq!(stats["highly_recommended"], 0);
        // (36.20 + 32.00) / 2
        assert!((stats["average_score"].as_f64().unwrap() - 34.1).abs() < 0.011);
    }

    #[tokio::test]
    async fn test_rank_reports_status_tier() {
        let response = app()
            .oneshot(json_request("/api/v1/rank", scenario_body()))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["candidates"][0]["status"], "Under Review");
    }

    #[tokio::test]
    async fn test_rank_empty_batch() {
        let body = json!({ "target": { "description": "Analyst" }, "candidates": [] });
        let response = app()
            .oneshot(json_request("/api/v1/rank", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["candidates"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rank_negative_experience_is_400() {
        let body = json!({
            "target": { "skills": ["python"] },
            "candidates": [{ "id": "x", "name": "Neg", "experience_years": -1 }]
        });
        let response = app()
            .oneshot(json_request("/api/v1/rank", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("negative"));
    }

    #[tokio::test]
    async fn test_rank_csv_upload() {
        let csv = "name,email,skills,experience_years,education_level\n\
                   Bola,,Java,8,masters\n\
                   Ada,ada@example.com,\"python, excel\",4,bachelor\n";
        let request = multipart_request(
            "/api/v1/rank/csv",
            &[
                ("target_skills", None, "python, data analysis"),
                ("file", Some("applicants.csv"), csv),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates[0]["name"], "Ada");
        assert_eq!(candidates[0]["id"], "2");
    }

    #[tokio::test]
    async fn test_rank_csv_without_target_is_400() {
        let request = multipart_request(
            "/api/v1/rank/csv",
            &[(
                "file",
                Some("applicants.csv"),
                "name,skills,experience_years\nAda,python,3\n",
            )],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rank_resumes_upload() {
        let request = multipart_request(
            "/api/v1/rank/resumes",
            &[
                (
                    "job_description",
                    None,
                    "Rust engineer for async services with tokio",
                ),
                ("files", Some("baker.txt"), "Tolu Ade\nPastry chef, 12 years of experience"),
                (
                    "files",
                    Some("dev.txt"),
                    "Kemi Ade\nRust engineer, 3 years of experience building async services with tokio",
                ),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["name"], "Kemi Ade");
    }

    #[tokio::test]
    async fn test_rank_resumes_survives_absurd_experience_claim() {
        let absurd = format!("Tolu Ade\n{} years of experience", "9".repeat(400));
        let request = multipart_request(
            "/api/v1/rank/resumes",
            &[
                ("target_skills", None, "python, sql"),
                (
                    "files",
                    Some("ok.txt"),
                    "Kemi Ade\n3 years of experience with Python",
                ),
                ("files", Some("big.txt"), &absurd),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        let big = candidates.iter().find(|c| c["id"] == "2").unwrap();
        assert_eq!(big["experience_years"], 0.0);
    }

    #[tokio::test]
    async fn test_extract_document() {
        let request = multipart_request(
            "/api/v1/documents/extract",
            &[(
                "file",
                Some("cv.txt"),
                "Name: Ada Obi\nada@example.com\n5 years of experience with Python. MSc Data Science",
            )],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["format"], "txt");
        assert_eq!(body["profile"]["name"], "Ada Obi");
        assert_eq!(body["profile"]["education_level"], "masters");
        assert_eq!(body["profile"]["experience_years"], 5.0);
        assert!(body["profile"]["quality_score"].as_u64().unwrap() > 0);
    }
}
