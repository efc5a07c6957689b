//! Feed API endpoint tests using wiremock.
//!
//! These tests verify that the ApiClient sends the documented requests
//! with the fixed header set and classifies backend responses.

mod common;

use std::time::Duration;

use common::test_config;
use petal::api::ApiClient;
use petal::error::{ApiError, ErrorCategory};
use petal::sample;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a client against the given mock server.
fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&test_config(&server.uri())).expect("Failed to build API client")
}

#[tokio::test]
async fn test_fetch_posts_sends_headers_and_decodes_wire_format() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("Accept", "application/json"))
        .and(header("X-Device-Type", "Android"))
        .and(header_exists("X-Timestamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "post_1",
                "userId": "user_1",
                "name": "用户1",
                "avatar": "https://picsum.photos/id/2/100/100",
                "content": "这是第1条帖子的内容",
                "images": ["https://picsum.photos/id/2/600/800"],
                "likes": 1001,
                "comments": 501,
                "shares": 101,
                "isLiked": true,
                "isFollowing": false,
                "createdAt": "2025-12-04T11:59:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let posts = client.fetch_posts().await.expect("fetch must succeed");

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "post_1");
    assert_eq!(posts[0].user_id, "user_1");
    assert_eq!(posts[0].likes, 1001);
    assert!(posts[0].is_liked);
    // Fields absent from the payload default
    assert_eq!(posts[0].saves, 0);
    assert!(!posts[0].is_saved);
}

#[tokio::test]
async fn test_fetch_single_post() {
    let server = MockServer::start().await;
    let posts = sample::sample_posts(3);

    Mock::given(method("GET"))
        .and(path("/posts/post_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&posts[2]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let post = client.fetch_post("post_2").await.expect("fetch must succeed");

    assert_eq!(post, posts[2]);
}

#[tokio::test]
async fn test_like_posts_to_like_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts/post_1/like"))
        .and(header("X-Device-Type", "Android"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.like_post("post_1").await.expect("like must succeed");
}

#[tokio::test]
async fn test_comment_sends_content_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts/post_1/comment"))
        .and(body_json(json!({"content": "写得不错"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .comment_post("post_1", "写得不错")
        .await
        .expect("comment must succeed");
}

#[tokio::test]
async fn test_share_posts_to_share_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts/post_1/share"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.share_post("post_1").await.expect("share must succeed");
}

#[tokio::test]
async fn test_publish_round_trips_post_body() {
    let server = MockServer::start().await;
    let post = sample::sample_posts(1).remove(0);

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(&post))
        .respond_with(ResponseTemplate::new(201).set_body_json(&post))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.publish_post(&post).await.expect("publish must succeed");
}

#[tokio::test]
async fn test_404_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_post("missing").await.expect_err("must fail");

    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(err.user_message(), "请求的资源不存在");
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_401_maps_to_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts/post_1/like"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "unauthorized"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.like_post("post_1").await.expect_err("must fail");

    assert_eq!(err.category(), ErrorCategory::Unauthorized);
    assert_eq!(err.user_message(), "未授权，请重新登录");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_403_maps_to_forbidden() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts/post_1/share"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.share_post("post_1").await.expect_err("must fail");

    assert_eq!(err.category(), ErrorCategory::Forbidden);
    assert_eq!(err.user_message(), "禁止访问，权限不足");
}

#[tokio::test]
async fn test_500_maps_to_server_and_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_posts().await.expect_err("must fail");

    assert_eq!(err.category(), ErrorCategory::Server);
    assert_eq!(err.user_message(), "服务器错误，请稍后重试");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_posts().await.expect_err("must fail");

    assert_eq!(err.category(), ErrorCategory::Parse);
    assert_eq!(err.user_message(), "数据解析错误，请稍后重试");
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri()).with_request_timeout(Duration::from_millis(100));
    let client = ApiClient::new(&config).expect("Failed to build API client");
    let err = client.fetch_posts().await.expect_err("must time out");

    assert_eq!(err.category(), ErrorCategory::Timeout);
    assert_eq!(err.user_message(), "请求超时，请稍后重试");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network() {
    let client = ApiClient::new(&test_config("http://127.0.0.1:1")).expect("client");

    let err = client.fetch_posts().await.expect_err("must fail");

    assert_eq!(err.category(), ErrorCategory::Network);
    assert_eq!(err.user_message(), "网络连接失败，请检查网络设置");
}
