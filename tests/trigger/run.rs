use crate::helpers::{TempDirGuard, create_test_repo, create_test_trigger};
use trigger_dependants::CommitResolutionError;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

async fn mount_target(mock_server: &MockServer, slug: &str, branch: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(format!("/repo/{slug}/requests")))
        .and(header("Authorization", "token test-token"))
        .and(header("Travis-API-Version", "3"))
        .and(body_partial_json(serde_json::json!({
            "request": { "branch": branch }
        })))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn every_downstream_target_is_triggered_once() {
    // Arrange
    let guard = TempDirGuard::new("trigger_every_target");
    let head = create_test_repo(guard.path(), "Fix bug\n\nDetails.");
    let mock_server = MockServer::start().await;

    mount_target(&mock_server, "vladfaust%2Fcrystalworld", "master", 202).await;
    mount_target(&mock_server, "vladfaust%2Fonyx-40-loc-distributed-chat", "master", 202).await;
    mount_target(&mock_server, "vladfaust%2Fonyx-todo-json-api", "part-1", 202).await;
    mount_target(&mock_server, "vladfaust%2Fonyx-todo-json-api", "part-2", 202).await;

    let trigger = create_test_trigger(guard.path(), mock_server.uri());

    // Act
    let report = trigger.run().await.unwrap();

    // Assert
    assert!(report.is_success());
    assert_eq!(report.outcomes().len(), 4);

    let hash = head.to_string();
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    for request in requests {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            body["request"]["message"],
            format!("onyx-http@{} Fix bug", &hash[..7])
        );
        assert_eq!(
            body["request"]["config"]["env"],
            format!("ONYX_HTTP_COMMIT={hash}")
        );
    }
}

#[tokio::test]
async fn rejected_target_is_reported_after_all_requests_settle() {
    // Arrange
    let guard = TempDirGuard::new("trigger_rejected_target");
    create_test_repo(guard.path(), "Add feature");
    let mock_server = MockServer::start().await;

    mount_target(&mock_server, "vladfaust%2Fcrystalworld", "master", 202).await;
    mount_target(&mock_server, "vladfaust%2Fonyx-40-loc-distributed-chat", "master", 404).await;
    mount_target(&mock_server, "vladfaust%2Fonyx-todo-json-api", "part-1", 202).await;
    mount_target(&mock_server, "vladfaust%2Fonyx-todo-json-api", "part-2", 202).await;

    let trigger = create_test_trigger(guard.path(), mock_server.uri());

    // Act
    let report = trigger.run().await.unwrap();

    // Assert
    assert!(!report.is_success());
    let failed: Vec<String> = report.failures().map(|(t, _)| t.to_string()).collect();
    assert_eq!(failed, vec!["vladfaust/onyx-40-loc-distributed-chat@master"]);
    assert_eq!(report.succeeded().count(), 3);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn no_request_is_sent_when_the_commit_cannot_be_resolved() {
    // Arrange
    let guard = TempDirGuard::new("trigger_no_repository");
    let mock_server = MockServer::start().await;
    let trigger = create_test_trigger(&guard.path().join("missing"), mock_server.uri());

    // Act
    let outcome = trigger.run().await;

    // Assert
    assert!(matches!(outcome, Err(CommitResolutionError::Hash(_))));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_travis_fails_every_target() {
    // Arrange
    let guard = TempDirGuard::new("trigger_unreachable");
    create_test_repo(guard.path(), "Add feature");
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    drop(mock_server);

    let trigger = create_test_trigger(guard.path(), base_url);

    // Act
    let report = trigger.run().await.unwrap();

    // Assert
    assert_eq!(report.failures().count(), 4);
}
