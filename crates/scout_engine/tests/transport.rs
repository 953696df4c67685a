use std::time::Duration;

use pretty_assertions::assert_eq;
use scout_core::RequestError;
use scout_engine::{ClientSettings, ReqwestTransport, Transport};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("valid base url")
}

#[tokio::test]
async fn contributors_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/contributors/facebook/react"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repository": {
                "owner": "facebook",
                "name": "react",
                "full_name": "facebook/react",
                "description": "A JavaScript library",
                "stars": 220000,
                "forks": 45000,
                "language": "JavaScript",
                "topics": ["ui"]
            },
            "contributors": [
                {
                    "username": "gaearon",
                    "avatar_url": "https://avatars.example/g",
                    "contributions": 1800,
                    "profile_url": "https://github.com/gaearon"
                }
            ],
            "total_count": 1
        })))
        .mount(&server)
        .await;

    let data = transport_for(&server)
        .contributors("facebook", "react", 10, &CancellationToken::new())
        .await
        .expect("contributors");
    assert_eq!(data.repository.stars, 220000);
    assert_eq!(data.repository.topics, Some(vec!["ui".to_string()]));
    assert_eq!(data.contributors.len(), 1);
    assert_eq!(data.contributors[0].username, "gaearon");
}

#[tokio::test]
async fn error_status_carries_the_service_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/contributors/nobody/nothing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Repository not found" })),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .contributors("nobody", "nothing", 10, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RequestError::Remote {
            status: 404,
            detail: Some("Repository not found".to_string())
        }
    );
    assert_eq!(err.user_message().as_deref(), Some("Repository not found"));
}

#[tokio::test]
async fn server_errors_without_detail_get_a_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/octocat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .profile("octocat", &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RequestError::Remote {
            status: 503,
            detail: None
        }
    );
    assert_eq!(
        err.user_message().as_deref(),
        Some("Internal server error, please try again later.")
    );
}

#[tokio::test]
async fn recommendations_post_query_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .and(body_json(json!({ "query": "rust web framework", "limit": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis": { "summary": "Web frameworks", "keywords": ["rust", "web"] },
            "recommendations": [
                { "repository": "tokio-rs/axum", "stars": 20000, "match_reason": "async web" }
            ],
            "total_count": 1,
            "query": "rust web framework"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = transport_for(&server)
        .recommendations("rust web framework", 5, &CancellationToken::new())
        .await
        .expect("recommendations");
    assert_eq!(data.recommendations[0].repository, "tokio-rs/axum");
    assert_eq!(
        data.analysis.map(|analysis| analysis.keywords),
        Some(vec!["rust".to_string(), "web".to_string()])
    );
}

#[tokio::test]
async fn suggestions_accept_full_name_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/suggestions"))
        .and(query_param("q", "react"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggestions": [
                { "full_name": "facebook/react", "stars": 220000 },
                { "name": "reactjs/redux" }
            ]
        })))
        .mount(&server)
        .await;

    let data = transport_for(&server)
        .suggestions("react", 5, &CancellationToken::new())
        .await
        .expect("suggestions");
    let names = data
        .suggestions
        .iter()
        .map(|suggestion| suggestion.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["facebook/react", "reactjs/redux"]);
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .health(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(ClientSettings {
        base_url: server.uri(),
        max_body_bytes: 16,
        ..ClientSettings::default()
    })
    .unwrap();
    let err = transport.health(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(message) if message.contains("exceeds")));
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "healthy" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = transport.health(&cancel).await.unwrap_err();
    assert_eq!(err, RequestError::Cancelled);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let transport = ReqwestTransport::new(ClientSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_secs(2),
        ..ClientSettings::default()
    })
    .unwrap();

    let err = transport
        .health(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RequestError::Transport(_) | RequestError::Timeout
    ));
    assert!(err.user_message().is_some());
}
