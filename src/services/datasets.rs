//! Registered datasets: list, preview, edit, remove, add

use super::{report, Effect};
use crate::api::endpoints::{
    BIDS_PREVIEW, DATASETS_LIST, DATASET_ADD, DATASET_PREVIEW, DATASET_REMOVE, DATASET_UPDATE,
    DEFAULT_DATASET_ADD,
};
use crate::api::{ApiClient, ApiError};
use crate::model::dataset::{Dataset, DatasetPreview};
use crate::model::repository::RepoPath;
use crate::model::route::Route;
use crate::store::{BidsPreview, BidsPreviewAction, DatasetsAction, StoreAction};
use serde_json::{json, Value};

pub const DATA_NOT_FOUND_MESSAGE: &str =
    "There is no data found for the dataset. It might be deleted";

fn dispatch(action: DatasetsAction) -> Effect {
    Effect::Dispatch(StoreAction::Datasets(action))
}

fn failed(err: &ApiError) -> Vec<Effect> {
    let mut effects = vec![dispatch(DatasetsAction::Error {
        message: err.user_message(),
    })];
    effects.extend(report(err));
    effects
}

pub async fn list(api: ApiClient) -> Vec<Effect> {
    match api.post::<Vec<Dataset>>(DATASETS_LIST, json!({ "search": "" })).await {
        Ok(datasets) => {
            tracing::debug!(count = datasets.len(), "datasets listed");
            vec![dispatch(DatasetsAction::Listed(datasets))]
        }
        Err(err) => failed(&err),
    }
}

/// Dataset details plus, for folder-based datasets, the subject table
pub async fn preview(api: ApiClient, dataset_id: String) -> Vec<Effect> {
    let body = json!({ "dataset_id": dataset_id });
    let preview = match api.post::<DatasetPreview>(DATASET_PREVIEW, body.clone()).await {
        Ok(preview) => preview,
        Err(ApiError::NotFound { .. }) => {
            return vec![
                dispatch(DatasetsAction::ClearPreview),
                Effect::Alert(DATA_NOT_FOUND_MESSAGE.to_string()),
            ]
        }
        Err(err) => return failed(&err),
    };

    let imaging = preview.dataset.is_imaging();
    let mut effects = vec![dispatch(DatasetsAction::Previewed(preview))];
    if imaging {
        match api.post::<BidsPreview>(BIDS_PREVIEW, body).await {
            Ok(subjects) => effects.push(Effect::Dispatch(StoreAction::BidsPreview(
                BidsPreviewAction::Set(subjects),
            ))),
            Err(err) => effects.extend(report(&err)),
        }
    }
    effects
}

pub async fn remove(api: ApiClient, dataset_id: String) -> Vec<Effect> {
    match api
        .post::<Value>(DATASET_REMOVE, json!({ "dataset_id": dataset_id }))
        .await
    {
        Ok(_) => {
            tracing::info!(%dataset_id, "dataset removed");
            vec![
                dispatch(DatasetsAction::Removed { dataset_id }),
                Effect::Notice("Dataset has been removed".to_string()),
            ]
        }
        Err(err) => report(&err),
    }
}

/// Editable fields of a registered dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEdit {
    pub dataset_id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub desc: String,
}

pub async fn update(api: ApiClient, edit: DatasetEdit) -> Vec<Effect> {
    let body = json!({
        "dataset_id": edit.dataset_id,
        "name": edit.name,
        "tags": edit.tags,
        "desc": edit.desc,
    });
    match api.post::<Dataset>(DATASET_UPDATE, body).await {
        Ok(dataset) => vec![
            dispatch(DatasetsAction::Updated(dataset)),
            Effect::Notice("Dataset has been updated".to_string()),
        ],
        Err(err) => report(&err),
    }
}

/// Plain dataset registration form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDataset {
    pub name: String,
    pub data_type: String,
    pub path: RepoPath,
    pub tags: Vec<String>,
    pub desc: String,
}

pub async fn add(api: ApiClient, dataset: NewDataset) -> Vec<Effect> {
    let body = json!({
        "name": dataset.name,
        "type": dataset.data_type,
        "path": dataset.path,
        "tags": dataset.tags,
        "desc": dataset.desc,
    });
    registered(api.post::<Value>(DATASET_ADD, body).await)
}

/// Register the node's bundled default (MNIST) dataset
pub async fn add_default(api: ApiClient) -> Vec<Effect> {
    registered(api.post::<Value>(DEFAULT_DATASET_ADD, json!({})).await)
}

/// Effects after any successful registration: open its preview when the id is known
pub(crate) fn registered(result: Result<Value, ApiError>) -> Vec<Effect> {
    match result {
        Ok(value) => {
            let dataset_id = value
                .get("dataset_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            tracing::info!(?dataset_id, "dataset registered");
            let route = match dataset_id {
                Some(dataset_id) => Route::DatasetPreview { dataset_id },
                None => Route::Datasets,
            };
            vec![
                Effect::Notice("Dataset has been successfully added".to_string()),
                Effect::Restart(Route::Datasets),
                Effect::Navigate(route),
            ]
        }
        Err(err) => report(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::{client_for, envelope, error_envelope};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_dispatches_datasets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DATASETS_LIST))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                {"dataset_id": "dataset_1", "name": "heart", "data_type": "csv",
                 "tags": ["heart"], "description": "d", "shape": [10, 3]}
            ]))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = list(api).await;

        let [Effect::Dispatch(StoreAction::Datasets(DatasetsAction::Listed(datasets)))] =
            effects.as_slice()
        else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(datasets[0].name, "heart");
    }

    #[tokio::test]
    async fn test_preview_of_missing_dataset_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DATASET_PREVIEW))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_envelope("Not Found")))
            .mount(&server)
            .await;
        let (api, navigator) = client_for(&server);

        let effects = preview(api, "dataset_404".to_string()).await;

        assert!(effects.contains(&Effect::Alert(DATA_NOT_FOUND_MESSAGE.to_string())));
        assert!(navigator.events().is_empty());
    }

    #[tokio::test]
    async fn test_imaging_preview_loads_subject_table() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DATASET_PREVIEW))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "dataset_id": "dataset_7", "name": "brains", "data_type": "medical-folder"
            }))))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(BIDS_PREVIEW))
            .and(body_json(json!({"dataset_id": "dataset_7"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "dataset_id": "dataset_7",
                "modalities": ["T1", "FLAIR"],
                "subject_table": {"columns": ["subject"], "index": [0], "data": [["sub-01"]]}
            }))))
            .expect(1)
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = preview(api, "dataset_7".to_string()).await;

        assert_eq!(effects.len(), 2);
        let Effect::Dispatch(StoreAction::BidsPreview(BidsPreviewAction::Set(subjects))) =
            &effects[1]
        else {
            panic!("expected subject table, got {effects:?}");
        };
        assert_eq!(subjects.modalities.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_add_opens_preview_of_new_dataset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DATASET_ADD))
            .and(body_json(json!({
                "name": "heart", "type": "csv", "path": ["data", "heart.csv"],
                "tags": ["heart"], "desc": "heart failure"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({"dataset_id": "dataset_3"}))),
            )
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = add(
            api,
            NewDataset {
                name: "heart".to_string(),
                data_type: "csv".to_string(),
                path: vec!["data".to_string(), "heart.csv".to_string()],
                tags: vec!["heart".to_string()],
                desc: "heart failure".to_string(),
            },
        )
        .await;

        assert_eq!(
            effects.last(),
            Some(&Effect::Navigate(Route::DatasetPreview {
                dataset_id: "dataset_3".to_string()
            }))
        );
    }

    #[tokio::test]
    async fn test_remove_failure_alerts_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DATASET_REMOVE))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(error_envelope("Dataset is in use")),
            )
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = remove(api, "dataset_1".to_string()).await;

        assert_eq!(effects, vec![Effect::Alert("Dataset is in use".to_string())]);
    }
}
