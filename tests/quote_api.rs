//! End-to-end tests of the REST surface with mock carriers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shipquote::api::rest::{AppState, CrudOperation, EnabledOperations, create_router};
use shipquote::application::services::{AggregationConfig, QuoteAggregationEngine};
use shipquote::domain::services::PricingResolver;
use shipquote::infrastructure::fixtures::{
    self, ARMANDO_SUBJECT, CARLOS_SUBJECT, FixtureEndpoints, RAYMUNDO_SUBJECT,
};
use shipquote::infrastructure::persistence::in_memory::{
    InMemoryPricingRuleRepository, InMemoryProviderRepository, InMemoryUserRepository,
};
use shipquote::infrastructure::providers::{HttpClient, HttpProviderFactory};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ESTAFETA: i64 = 1;
const FEDEX: i64 = 2;
const UPS: i64 = 4;

async fn app_with(server: &MockServer, operations: EnabledOperations) -> Router {
    let providers = Arc::new(InMemoryProviderRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let rules = Arc::new(InMemoryPricingRuleRepository::new());

    let base = server.uri();
    let endpoints = FixtureEndpoints {
        estafeta: format!("{base}/estafeta/quote"),
        fedex: format!("{base}/fedex/quote"),
        dhl: format!("{base}/dhl/quote"),
        ups: format!("{base}/ups/quote"),
    };
    fixtures::seed(providers.as_ref(), users.as_ref(), rules.as_ref(), &endpoints)
        .await
        .unwrap();

    let engine = QuoteAggregationEngine::new(
        providers.clone(),
        Arc::new(HttpProviderFactory::new(HttpClient::new(1000).unwrap())),
        PricingResolver::new(rules),
    )
    .with_config(AggregationConfig::default().with_per_provider_timeout(1000));

    create_router(Arc::new(AppState {
        engine,
        providers,
        users,
        provider_operations: operations,
    }))
}

async fn app(server: &MockServer) -> Router {
    app_with(server, EnabledOperations::all()).await
}

async fn mount_estafeta(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/estafeta/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "quotes": [
                    { "service_label": "Terrestre", "service_code": "ground", "amount": 100, "currency_code": "MXN" },
                    { "service_label": "Express", "service_code": "express", "amount": 200, "currency_code": "MXN" }
                ]
            }
        })))
        .mount(server)
        .await;
}

fn quote_body(provider_id: i64) -> Value {
    json!({
        "originZipCode": "64000",
        "destinationZipCode": "06600",
        "packageDimensions": { "weight": 2.5, "length": 30, "width": 20, "height": 10 },
        "providerId": provider_id
    })
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
    subject: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(subject) = subject {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {subject}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn final_prices(body: &Value) -> Vec<f64> {
    body["quotes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|quote| quote["final_price"].as_f64().unwrap())
        .collect()
}

mod quotes {
    use super::*;

    #[tokio::test]
    async fn anonymous_caller_gets_default_markup() {
        let server = MockServer::start().await;
        mount_estafeta(&server).await;

        let body = quote_body(ESTAFETA);
        let (status, json) = send(app(&server).await, "POST", "/api/quotes", Some(&body), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(final_prices(&json), vec![115.0, 230.0]);

        let first = &json["quotes"][0];
        assert_eq!(first["provider"], "Estafeta");
        assert_eq!(first["provider_id"], ESTAFETA);
        assert_eq!(first["service"], "Terrestre");
        assert_eq!(first["service_code"], "ground");
        assert_eq!(first["base_price"].as_f64(), Some(100.0));
        assert_eq!(first["markup_percentage"].as_f64(), Some(15.0));
        assert_eq!(first["currency"], "MXN");
        assert!(first.get("error").is_none());
    }

    #[tokio::test]
    async fn provider_rule_applies_to_its_user() {
        let server = MockServer::start().await;
        mount_estafeta(&server).await;

        let body = quote_body(ESTAFETA);
        let (status, json) = send(
            app(&server).await,
            "POST",
            "/api/quotes",
            Some(&body),
            Some(RAYMUNDO_SUBJECT),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(final_prices(&json), vec![110.0, 220.0]);
    }

    #[tokio::test]
    async fn service_override_wins_over_global_markup() {
        let server = MockServer::start().await;
        mount_estafeta(&server).await;

        let body = quote_body(ESTAFETA);
        let (_, json) = send(
            app(&server).await,
            "POST",
            "/api/quotes",
            Some(&body),
            Some(CARLOS_SUBJECT),
        )
        .await;

        // ground is fixed at 120, express falls through to the 12% global rule.
        assert_eq!(final_prices(&json), vec![120.0, 224.0]);
    }

    #[tokio::test]
    async fn user_without_rules_gets_default_markup() {
        let server = MockServer::start().await;
        mount_estafeta(&server).await;

        let body = quote_body(ESTAFETA);
        let (_, json) = send(
            app(&server).await,
            "POST",
            "/api/quotes",
            Some(&body),
            Some(ARMANDO_SUBJECT),
        )
        .await;

        assert_eq!(final_prices(&json), vec![115.0, 230.0]);
    }

    #[tokio::test]
    async fn empty_carrier_answer_is_a_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fedex/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let body = quote_body(FEDEX);
        let (status, json) = send(app(&server).await, "POST", "/api/quotes", Some(&body), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "quotes": [{
                    "provider": "Fedex",
                    "provider_id": FEDEX,
                    "service": null,
                    "service_code": null,
                    "base_price": null,
                    "markup_percentage": null,
                    "final_price": null,
                    "currency": null,
                    "error": "PROVIDER_NO_SERVICES",
                    "error_message": "Provider returned no services"
                }]
            })
        );
    }

    #[tokio::test]
    async fn unreachable_carrier_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ups/quote"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let body = quote_body(UPS);
        let (status, json) = send(app(&server).await, "POST", "/api/quotes", Some(&body), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["quotes"][0]["error"], "PROVIDER_UNAVAILABLE");
        assert_eq!(json["quotes"][0]["error_message"], "Network error or timeout");
    }

    #[tokio::test]
    async fn misconfigured_endpoint_is_a_provider_error() {
        let server = MockServer::start().await;
        let app = app(&server).await;

        let patch = json!({ "endpointUrl": "not a url" });
        let (status, _) = send(
            app.clone(),
            "PATCH",
            "/api/shipping-providers/2",
            Some(&patch),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body = quote_body(FEDEX);
        let (status, json) = send(app, "POST", "/api/quotes", Some(&body), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["quotes"][0]["error"], "PROVIDER_ERROR");
        assert_eq!(
            json["quotes"][0]["error_message"],
            "Failed to process provider response"
        );
    }

    #[tokio::test]
    async fn unknown_provider_is_not_found() {
        let server = MockServer::start().await;

        let body = quote_body(99);
        let (status, json) = send(app(&server).await, "POST", "/api/quotes", Some(&body), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(
            json["error"]["message"],
            "No quotes available for the given parameters"
        );
    }

    #[tokio::test]
    async fn missing_fields_are_listed() {
        let server = MockServer::start().await;

        let body = json!({ "originZipCode": "64000" });
        let (status, json) = send(app(&server).await, "POST", "/api/quotes", Some(&body), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "MISSING_PARAMS");
        assert_eq!(
            json["error"]["details"]["missing"],
            json!(["originZipCode", "destinationZipCode", "packageDimensions", "providerId"])
        );
    }

    #[tokio::test]
    async fn unknown_bearer_subject_is_rejected() {
        let server = MockServer::start().await;

        let body = quote_body(ESTAFETA);
        let (status, json) = send(
            app(&server).await,
            "POST",
            "/api/quotes",
            Some(&body),
            Some("user_unknown"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "AUTH_ERROR");
    }
}

mod providers {
    use super::*;

    #[tokio::test]
    async fn list_is_wrapped() {
        let server = MockServer::start().await;
        let (status, json) =
            send(app(&server).await, "GET", "/api/shipping-providers", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["items"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn get_by_id() {
        let server = MockServer::start().await;
        let (status, json) =
            send(app(&server).await, "GET", "/api/shipping-providers/4", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["item"]["name"], "UPS");
        assert_eq!(json["data"]["item"]["responseConfig"]["format"], "xml");
    }

    #[tokio::test]
    async fn create_update_delete() {
        let server = MockServer::start().await;
        let app = app(&server).await;

        let body = json!({
            "name": "Paquetexpress",
            "endpointUrl": "http://carrier.test/rates",
            "unknownField": true
        });
        let (status, json) =
            send(app.clone(), "POST", "/api/shipping-providers", Some(&body), None).await;
        assert_eq!(status, StatusCode::OK);
        let id = json["data"]["item"]["id"].as_i64().unwrap();
        assert_eq!(json["data"]["item"]["active"], true);

        let patch = json!({ "active": false });
        let uri = format!("/api/shipping-providers/{id}");
        let (status, json) = send(app.clone(), "PATCH", &uri, Some(&patch), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["item"]["active"], false);
        assert_eq!(json["data"]["item"]["name"], "Paquetexpress");

        let (status, json) = send(app.clone(), "DELETE", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!({ "deleted": true, "id": id }));

        let (status, _) = send(app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_without_required_fields() {
        let server = MockServer::start().await;
        let body = json!({ "active": true });
        let (status, json) = send(
            app(&server).await,
            "POST",
            "/api/shipping-providers",
            Some(&body),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["details"]["missing"], json!(["name", "endpointUrl"]));
    }

    #[tokio::test]
    async fn wrong_field_type_is_invalid_field() {
        let server = MockServer::start().await;
        let body = json!({ "active": "yes" });
        let (status, json) = send(
            app(&server).await,
            "PUT",
            "/api/shipping-providers/1",
            Some(&body),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_FIELD");
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let server = MockServer::start().await;
        let (status, json) =
            send(app(&server).await, "GET", "/api/shipping-providers/abc", None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Invalid ID: abc");
    }

    #[tokio::test]
    async fn disabled_operation_is_method_not_allowed() {
        let server = MockServer::start().await;
        let app = app_with(
            &server,
            EnabledOperations::only([CrudOperation::FindAll, CrudOperation::FindByPk]),
        )
        .await;

        let (status, json) = send(app, "DELETE", "/api/shipping-providers/1", None, None).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json["error"]["code"], "METHOD_NOT_ALLOWED");
        assert_eq!(
            json["error"]["details"]["allowed_methods"],
            json!(["find_all", "find_by_pk"])
        );
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn me_requires_authentication() {
        let server = MockServer::start().await;
        let (status, json) = send(app(&server).await, "GET", "/api/users/me", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "AUTH_NOT_AUTHENTICATED");
    }

    #[tokio::test]
    async fn me_resolves_the_bearer_subject() {
        let server = MockServer::start().await;
        let (status, json) = send(
            app(&server).await,
            "GET",
            "/api/users/me",
            None,
            Some(CARLOS_SUBJECT),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], 2);
        assert_eq!(json["data"]["auth_subject"], CARLOS_SUBJECT);
    }

    #[tokio::test]
    async fn list_and_get() {
        let server = MockServer::start().await;
        let app = app(&server).await;

        let (_, json) = send(app.clone(), "GET", "/api/users", None, None).await;
        let ids: Vec<i64> = json["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|user| user["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let (status, _) = send(app, "GET", "/api/users/42", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn health() {
        let server = MockServer::start().await;
        let (status, json) = send(app(&server).await, "GET", "/api/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn unknown_route_is_enveloped() {
        let server = MockServer::start().await;
        let (status, json) = send(app(&server).await, "GET", "/api/nope", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unsupported_method_is_enveloped() {
        let server = MockServer::start().await;
        let (status, json) = send(app(&server).await, "GET", "/api/quotes", None, None).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json["error"]["code"], "METHOD_NOT_ALLOWED");
        assert_eq!(
            json["error"]["message"],
            "Method GET is not allowed for this resource"
        );
    }
}
