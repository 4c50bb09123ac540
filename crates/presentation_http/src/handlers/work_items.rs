//! Work item handlers
//!
//! `/TFS` keeps the request and response shapes the web client was written
//! against; `/v1/work-items` adds a per-item update report.

use application::{ItemOutcome, UpdateReport};
use axum::{Json, extract::State};
use domain::{DomainError, HierarchyLevel, WorkItem, WorkItemId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    error::{ApiError, sanitize_error_message},
    middleware::{RequestId, ValidatedJsonList},
    state::AppState,
};

/// Wire form of a work item
///
/// At most one of the level fields is set; inbound level fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemEntity {
    #[validate(range(min = 1, message = "must be a positive work item id"))]
    pub id: i64,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default)]
    pub epic_level: Option<String>,
    #[serde(default)]
    pub issue_level: Option<String>,
    #[serde(default)]
    pub task_level: Option<String>,
}

impl From<&WorkItem> for WorkItemEntity {
    fn from(item: &WorkItem) -> Self {
        let label = |level: HierarchyLevel| {
            (item.level == Some(level)).then(|| level.label().to_string())
        };
        Self {
            id: item.id.value(),
            title: item.title.clone(),
            epic_level: label(HierarchyLevel::Epic),
            issue_level: label(HierarchyLevel::Issue),
            task_level: label(HierarchyLevel::Task),
        }
    }
}

impl TryFrom<WorkItemEntity> for WorkItem {
    type Error = DomainError;

    fn try_from(entity: WorkItemEntity) -> Result<Self, Self::Error> {
        Ok(Self::new(WorkItemId::new(entity.id)?, entity.title))
    }
}

/// Outcome of one item in an update report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Updated,
    Failed,
    Skipped,
}

/// Per-item entry of [`UpdateReportResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResultResponse {
    pub id: i64,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `POST /v1/work-items/update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReportResponse {
    /// True when every item was updated
    pub success: bool,
    /// Number of items updated
    pub updated: usize,
    /// One entry per submitted item, in request order
    pub results: Vec<ItemResultResponse>,
}

impl From<&UpdateReport> for UpdateReportResponse {
    fn from(report: &UpdateReport) -> Self {
        let results = report
            .results
            .iter()
            .map(|r| {
                let (status, revision, error) = match &r.outcome {
                    ItemOutcome::Updated { revision } => {
                        (ItemStatus::Updated, Some(*revision), None)
                    },
                    ItemOutcome::Failed(e) => (
                        ItemStatus::Failed,
                        None,
                        Some(sanitize_error_message(&e.to_string())),
                    ),
                    ItemOutcome::Skipped => (ItemStatus::Skipped, None, None),
                };
                ItemResultResponse {
                    id: r.id.value(),
                    status,
                    revision,
                    error,
                }
            })
            .collect();

        Self {
            success: report.all_succeeded(),
            updated: report.updated_count(),
            results,
        }
    }
}

fn to_domain(entities: Vec<WorkItemEntity>) -> Result<Vec<WorkItem>, ApiError> {
    entities
        .into_iter()
        .map(|e| WorkItem::try_from(e).map_err(|err| ApiError::BadRequest(err.to_string())))
        .collect()
}

/// List all work items with their hierarchy level
#[instrument(skip(state))]
pub async fn list_work_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkItemEntity>>, ApiError> {
    let items = state.work_items.list_classified().await?;
    info!(count = items.len(), "Listed work items");
    Ok(Json(items.iter().map(WorkItemEntity::from).collect()))
}

/// Push edited titles; answers `true` once every item is updated
#[instrument(skip(state, entities), fields(request_id = %request_id, count = entities.len()))]
pub async fn update_work_items(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJsonList(entities): ValidatedJsonList<WorkItemEntity>,
) -> Result<Json<bool>, ApiError> {
    let items = to_domain(entities)?;
    let report = state.work_items.update_titles(items).await;

    if let Some(failed) = report.failure() {
        warn!(id = failed.id.value(), "Title update stopped at failing item");
    }
    let updated = report.into_result()?;
    info!(updated, "Updated work item titles");
    Ok(Json(true))
}

/// Push edited titles and report the outcome of every item
#[instrument(skip(state, entities), fields(request_id = %request_id, count = entities.len()))]
pub async fn update_work_items_report(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJsonList(entities): ValidatedJsonList<WorkItemEntity>,
) -> Result<Json<UpdateReportResponse>, ApiError> {
    let items = to_domain(entities)?;
    let report = state.work_items.update_titles(items).await;
    let response = UpdateReportResponse::from(&report);

    info!(
        success = response.success,
        updated = response.updated,
        "Updated work item titles"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use application::{ApplicationError, ItemUpdateResult};

    use super::*;

    fn id(value: i64) -> WorkItemId {
        WorkItemId::new(value).unwrap()
    }

    #[test]
    fn entity_carries_single_level_label() {
        let item = WorkItem::new(id(2), "Login page").with_level(HierarchyLevel::Issue);
        let json = serde_json::to_value(WorkItemEntity::from(&item)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "title": "Login page",
                "epicLevel": null,
                "issueLevel": "Issue",
                "taskLevel": null
            })
        );
    }

    #[test]
    fn unclassified_entity_has_no_level() {
        let entity = WorkItemEntity::from(&WorkItem::new(id(9), "Orphan"));
        assert!(entity.epic_level.is_none());
        assert!(entity.issue_level.is_none());
        assert!(entity.task_level.is_none());
    }

    #[test]
    fn inbound_entity_needs_only_id_and_title() {
        let entity: WorkItemEntity =
            serde_json::from_str(r#"{"id": 4, "title": "Renamed", "epicLevel": "Epic"}"#).unwrap();
        let item = WorkItem::try_from(entity).unwrap();
        assert_eq!(item.id, id(4));
        assert_eq!(item.title, "Renamed");
        assert!(item.level.is_none());
    }

    #[test]
    fn title_length_is_validated() {
        let mut entity = WorkItemEntity {
            id: 1,
            title: String::new(),
            epic_level: None,
            issue_level: None,
            task_level: None,
        };
        assert!(entity.validate().is_err());
        entity.title = "x".repeat(255);
        assert!(entity.validate().is_ok());
        entity.title = "x".repeat(256);
        assert!(entity.validate().is_err());
    }

    #[test]
    fn report_response_lists_every_outcome() {
        let report = UpdateReport {
            results: vec![
                ItemUpdateResult {
                    id: id(1),
                    outcome: ItemOutcome::Updated { revision: 3 },
                },
                ItemUpdateResult {
                    id: id(2),
                    outcome: ItemOutcome::Failed(ApplicationError::NotFound(
                        "work item 2".to_string(),
                    )),
                },
                ItemUpdateResult {
                    id: id(3),
                    outcome: ItemOutcome::Skipped,
                },
            ],
        };

        let response = UpdateReportResponse::from(&report);
        assert!(!response.success);
        assert_eq!(response.updated, 1);
        assert_eq!(response.results[0].status, ItemStatus::Updated);
        assert_eq!(response.results[0].revision, Some(3));
        assert_eq!(response.results[1].status, ItemStatus::Failed);
        assert!(response.results[1].error.is_some());
        assert_eq!(response.results[2].status, ItemStatus::Skipped);
    }
}
