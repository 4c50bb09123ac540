//! End-to-end tests: configuration → adapter → services, against a mocked
//! Azure DevOps server

use std::sync::Arc;

use application::{ApplicationError, WorkItemService, ports::WorkItemTrackerPort};
use domain::{HierarchyLevel, WorkItem, WorkItemId};
use infrastructure::{AppConfig, AzureDevOpsAdapter};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn link(id: i64) -> String {
    format!("https://dev.azure.com/contoso/_apis/wit/workItems/{id}")
}

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig::from_toml(&format!(
        r#"
        [devops]
        base_url = "{}"
        organization = "contoso"
        personal_access_token = "pat"
        wiql = "SELECT [System.Id] FROM WorkItems WHERE [System.State] <> 'Removed'"
        "#,
        server.uri()
    ))
    .unwrap()
}

fn service_for(config: &AppConfig) -> WorkItemService {
    let adapter = AzureDevOpsAdapter::new(&config.devops).unwrap();
    let tracker: Arc<dyn WorkItemTrackerPort> = Arc::new(adapter);
    WorkItemService::with_query(tracker, config.devops.wiql.clone())
}

async fn mount_item(server: &MockServer, id: i64, relations: serde_json::Value, reads: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/contoso/_apis/wit/workitems/{id}")))
        .and(query_param("$expand", "relations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "rev": 1,
            "fields": {"System.Title": format!("Item {id}")},
            "relations": relations
        })))
        .expect(reads)
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_and_classifies_through_the_rest_api() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("POST"))
        .and(path("/contoso/_apis/wit/wiql"))
        .and(body_json(json!({"query": config.devops.wiql})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asOf": "2026-03-01T10:15:00.123Z",
            "workItems": [{"id": 2}, {"id": 1}, {"id": 3}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contoso/_apis/wit/workitems"))
        .and(query_param("ids", "2,1,3"))
        .and(query_param("asOf", "2026-03-01T10:15:00.123Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "value": [
                {"id": 2, "fields": {"System.Title": "Login page"}},
                {"id": 1, "fields": {"System.Title": "Checkout"}},
                {"id": 3, "fields": {"System.Title": "Password field"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Each item is read once per scan
    mount_item(
        &server,
        1,
        json!([{"rel": "System.LinkTypes.Hierarchy-Forward", "url": link(2)}]),
        2,
    )
    .await;
    mount_item(
        &server,
        2,
        json!([
            {"rel": "System.LinkTypes.Hierarchy-Reverse", "url": link(1)},
            {"rel": "System.LinkTypes.Hierarchy-Forward", "url": link(3)}
        ]),
        2,
    )
    .await;
    mount_item(
        &server,
        3,
        json!([{"rel": "System.LinkTypes.Hierarchy-Reverse", "url": link(2)}]),
        2,
    )
    .await;

    let items = service_for(&config).list_classified().await.unwrap();

    let summary: Vec<(i64, &str, Option<HierarchyLevel>)> = items
        .iter()
        .map(|i| (i.id.value(), i.title.as_str(), i.level))
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, "Login page", Some(HierarchyLevel::Issue)),
            (1, "Checkout", Some(HierarchyLevel::Epic)),
            (3, "Password field", Some(HierarchyLevel::Task)),
        ]
    );
}

#[tokio::test]
async fn updates_title_with_single_patch() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("GET"))
        .and(path("/contoso/_apis/wit/workitems/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "rev": 3, "fields": {"System.Title": "Old"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/contoso/_apis/wit/workitems/5"))
        .and(body_json(json!([
            {"op": "replace", "path": "/fields/System.Title", "value": "New"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "rev": 4, "fields": {"System.Title": "New"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = WorkItem::new(WorkItemId::new(5).unwrap(), "New");
    let report = service_for(&config).update_titles(vec![item]).await;

    assert!(report.all_succeeded());
    assert_eq!(report.into_result().unwrap(), 1);
}

#[tokio::test]
async fn rejected_token_surfaces_as_not_authorized() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("POST"))
        .and(path("/contoso/_apis/wit/wiql"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = service_for(&config).list_classified().await.unwrap_err();
    assert!(matches!(err, ApplicationError::NotAuthorized(_)));
}

#[tokio::test]
async fn unreachable_tracker_is_unhealthy() {
    let config = AppConfig::from_toml(
        r#"
        [devops]
        base_url = "http://127.0.0.1:1"
        organization = "contoso"
        personal_access_token = "pat"
        timeout_secs = 2
        "#,
    )
    .unwrap();

    assert!(!service_for(&config).is_tracker_healthy().await);
}
