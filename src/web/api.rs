//! Handlers for the `/api/*` HTTP endpoints.

use actix_web::web::Query;
use actix_web::{HttpResponse, Responder, get};
use serde::{Deserialize, Serialize};

use crate::network::prefix::search_known_prefixes;
use crate::report::analyze;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: &'static str,
    message: String,
}

#[derive(Deserialize)]
pub struct ClassifyQuery {
    address: Option<String>,
}

#[derive(Deserialize)]
pub struct KnownQuery {
    filter: Option<String>,
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Full report for one address or block.
#[get("/api/classify")]
pub async fn classify_endpoint(query: Query<ClassifyQuery>) -> impl Responder {
    let Some(address) = query.address.as_deref().filter(|a| !a.trim().is_empty()) else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "bad_request",
            message: "missing query parameter: address".to_string(),
        });
    };

    match analyze(address) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            tracing::debug!(input = address, error = %e, "rejected classify request");
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.code(),
                message: e.to_string(),
            })
        }
    }
}

/// Reference listing of the knowledge base, grouped by category.
#[get("/api/known")]
pub async fn known_prefixes(query: Query<KnownQuery>) -> impl Responder {
    let filter = query.filter.as_deref().unwrap_or("");
    HttpResponse::Ok().json(search_known_prefixes(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    macro_rules! service {
        () => {
            test::init_service(
                App::new()
                    .service(health)
                    .service(classify_endpoint)
                    .service(known_prefixes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let app = service!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_classify_ok() {
        let app = service!();
        let req = test::TestRequest::get()
            .uri("/api/classify?address=2001%3Adb8%3A%3A%2F48")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["classification"]["category"], "Documentation Prefix (Standard)");
        assert_eq!(body["range"]["end"], "2001:db8:0:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(body["range"]["total_addresses"], "1208925819614629174706176");
    }

    #[actix_web::test]
    async fn test_classify_invalid_address() {
        let app = service!();
        let req = test::TestRequest::get()
            .uri("/api/classify?address=2001%3A%3Adb8%3A%3A1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_address_format");
        assert!(body["message"].as_str().unwrap().contains("invalid IPv6"));
    }

    #[actix_web::test]
    async fn test_classify_missing_parameter() {
        let app = service!();
        let req = test::TestRequest::get().uri("/api/classify").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_known_prefixes() {
        let app = service!();
        let req = test::TestRequest::get().uri("/api/known").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let groups = body.as_array().unwrap();
        assert_eq!(groups[0]["category"], "Common & Documentation");
        let total: usize = groups
            .iter()
            .map(|g| g["entries"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 70);

        let req = test::TestRequest::get()
            .uri("/api/known?filter=MDNS")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let groups = body.as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["entries"][0]["prefix"], "ff02::fb/128");
    }
}
