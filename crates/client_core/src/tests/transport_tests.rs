use super::*;
use crate::mock_server::{
    sample_comments, spawn_comment_server, spawn_failing_comment_server,
    spawn_nested_comment_server, RecordedRequest, CREATED_ID,
};
use axum::http::StatusCode;

#[test]
fn builds_collection_and_item_urls_from_base() {
    let service = HttpCommentService::new("https://jsonplaceholder.typicode.com").expect("service");
    assert_eq!(
        service.collection_url().as_str(),
        "https://jsonplaceholder.typicode.com/comments"
    );
    assert_eq!(
        service.item_url(CommentId(42)).expect("item url").as_str(),
        "https://jsonplaceholder.typicode.com/comments/42"
    );
}

#[test]
fn keeps_base_path_prefix_with_or_without_trailing_slash() {
    for base in ["http://localhost:9000/api", "http://localhost:9000/api/"] {
        let service = HttpCommentService::new(base).expect("service");
        assert_eq!(
            service.collection_url().as_str(),
            "http://localhost:9000/api/comments"
        );
    }
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(HttpCommentService::new("not a url").is_err());
    assert!(HttpCommentService::new("mailto:someone@example.com").is_err());
    assert!(HttpCommentService::new("ftp://example.com").is_err());
}

#[tokio::test]
async fn lists_comments_ignoring_extra_fields() {
    let server = spawn_comment_server(sample_comments(4)).await.expect("spawn server");
    let service = HttpCommentService::new(&server.base_url).expect("service");

    let comments = service.list_comments().await.expect("list");

    assert_eq!(comments, sample_comments(4));
    assert_eq!(server.state.requests().await, vec![RecordedRequest::List]);
}

#[tokio::test]
async fn create_posts_fields_without_identifier() {
    let server = spawn_comment_server(Vec::new()).await.expect("spawn server");
    let service = HttpCommentService::new(&server.base_url).expect("service");
    let request = CreateCommentRequest {
        name: "C".to_string(),
        email: "c@x".to_string(),
        body: "yo".to_string(),
    };

    let created = service.create_comment(&request).await.expect("create");

    assert_eq!(created, Comment::draft("C", "c@x", "yo").with_id(CREATED_ID));
    assert_eq!(
        server.state.requests().await,
        vec![RecordedRequest::Create(request)]
    );
}

#[tokio::test]
async fn replace_puts_to_item_url() {
    let server = spawn_comment_server(Vec::new()).await.expect("spawn server");
    let service = HttpCommentService::new(&server.base_url).expect("service");
    let request = ReplaceCommentRequest::new(CommentId(7), &Comment::draft("B", "a@x", "hi"));

    let replaced = service.replace_comment(&request).await.expect("replace");

    assert_eq!(replaced, Comment::draft("B", "a@x", "hi").with_id(CommentId(7)));
    assert_eq!(
        server.state.requests().await,
        vec![RecordedRequest::Replace(CommentId(7), request)]
    );
}

#[tokio::test]
async fn delete_accepts_empty_object_body() {
    let server = spawn_comment_server(Vec::new()).await.expect("spawn server");
    let service = HttpCommentService::new(&server.base_url).expect("service");

    service.delete_comment(CommentId(3)).await.expect("delete");

    assert_eq!(
        server.state.requests().await,
        vec![RecordedRequest::Delete(CommentId(3))]
    );
}

#[tokio::test]
async fn talks_to_service_mounted_under_prefix() {
    let server = spawn_nested_comment_server("/api", sample_comments(2))
        .await
        .expect("spawn server");
    let service = HttpCommentService::new(&server.base_url).expect("service");

    assert_eq!(service.list_comments().await.expect("list").len(), 2);
    service.delete_comment(CommentId(2)).await.expect("delete");
}

#[tokio::test]
async fn error_statuses_surface_as_failures() {
    let server = spawn_failing_comment_server(StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .expect("spawn server");
    let service = HttpCommentService::new(&server.base_url).expect("service");

    let err = service.list_comments().await.expect_err("list must fail");
    assert!(err.to_string().contains("500"), "unexpected error: {err:#}");
    assert!(service
        .create_comment(&CreateCommentRequest::from(&Comment::default()))
        .await
        .is_err());
    assert!(service.delete_comment(CommentId(1)).await.is_err());
}

#[tokio::test]
async fn unreachable_service_is_a_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = HttpCommentService::with_timeout(&format!("http://{addr}"), Duration::from_secs(2))
        .expect("service");

    assert!(service.list_comments().await.is_err());
}
