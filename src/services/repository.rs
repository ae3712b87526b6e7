//! Node data-path browsing and CSV previews

use super::{report, Effect};
use crate::api::endpoints::{LOAD_CSV_DATA, REPOSITORY_LIST};
use crate::api::{ApiClient, ApiError};
use crate::model::dataset::CsvTable;
use crate::model::repository::{RepoPath, RepositoryListing};
use crate::store::{RepositoryAction, StoreAction};
use serde_json::json;

/// List one folder of the data path; `refresh` asks the node to recompute file stats
pub async fn list(api: ApiClient, path: RepoPath, refresh: bool) -> Vec<Effect> {
    let body = json!({ "path": path, "refresh": refresh });
    match api.post::<RepositoryListing>(REPOSITORY_LIST, body).await {
        Ok(listing) => vec![Effect::Dispatch(StoreAction::Repository(
            RepositoryAction::Listed(listing),
        ))],
        Err(err) => {
            let mut effects = vec![Effect::Dispatch(StoreAction::Repository(
                RepositoryAction::Error {
                    message: err.user_message(),
                },
            ))];
            if err.is_reported() {
                effects.extend(report(&err));
            }
            effects
        }
    }
}

/// Parsed content of a CSV file in the data path
pub async fn load_csv(api: &ApiClient, path: &RepoPath) -> Result<CsvTable, ApiError> {
    let table: CsvTable = api.post(LOAD_CSV_DATA, json!({ "path": path })).await?;
    tracing::debug!(columns = table.columns.len(), rows = table.data.len(), "csv loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::{client_for, envelope, error_envelope};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_listing_dispatched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REPOSITORY_LIST))
            .and(body_json(json!({"path": ["data"], "refresh": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "level": 1, "base": "data", "number": 1, "displays": 1, "path": ["data"],
                "files": [{"type": "dir", "name": "bids", "path": ["data", "bids"],
                           "extension": "", "registered": null, "includes": []}]
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = list(api, vec!["data".to_string()], false).await;

        let [Effect::Dispatch(StoreAction::Repository(RepositoryAction::Listed(listing)))] =
            effects.as_slice()
        else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(listing.files[0].name, "bids");
    }

    #[tokio::test]
    async fn test_missing_folder_lands_in_store() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REPOSITORY_LIST))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope(
                "Requested path does not exist or it is not a directory.",
            )))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = list(api, vec!["nope".to_string()], false).await;

        assert_eq!(
            effects,
            vec![Effect::Dispatch(StoreAction::Repository(RepositoryAction::Error {
                message: "Requested path does not exist or it is not a directory.".to_string()
            }))]
        );
    }

    #[tokio::test]
    async fn test_load_csv() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOAD_CSV_DATA))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "columns": ["id", "age"], "index": [0, 1], "data": [["sub-01", 30], ["sub-02", 41]]
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let table = load_csv(&api, &vec!["data".to_string(), "p.csv".to_string()])
            .await
            .unwrap();

        assert_eq!(table.columns[1], "age");
        assert_eq!(table.data.len(), 2);
    }
}
