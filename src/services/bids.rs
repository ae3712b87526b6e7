//! BIDS wizard calls

use super::datasets::registered;
use super::repository::load_csv;
use super::{report, Effect, Verdict};
use crate::api::endpoints::{BIDS_ADD, BIDS_VALIDATE_REFERENCE_COLUMN, BIDS_VALIDATE_ROOT};
use crate::api::ApiClient;
use crate::model::draft::{ReferenceColumn, ReferenceCsv, SubjectReport};
use crate::model::repository::RepoPath;
use crate::store::{BidsAction, StoreAction};
use serde::Deserialize;
use serde_json::{json, Value};

fn dispatch(action: BidsAction) -> Effect {
    Effect::Dispatch(StoreAction::Bids(action))
}

#[derive(Debug, Deserialize)]
struct RootInfo {
    #[serde(flatten)]
    verdict: Verdict,
    #[serde(default)]
    modalities: Vec<String>,
    #[serde(default, alias = "subjects")]
    patient_folders: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnCheck {
    #[serde(flatten)]
    pub verdict: Verdict,
    #[serde(flatten)]
    pub subjects: SubjectReport,
}

pub async fn validate_root(api: ApiClient, root_path: RepoPath) -> Vec<Effect> {
    let body = json!({ "bids_root": root_path });
    match api.post::<RootInfo>(BIDS_VALIDATE_ROOT, body).await {
        Ok(info) => {
            if let Some(message) = info.verdict.rejection("BIDS root folder is not valid") {
                return vec![dispatch(BidsAction::ResetBidsRoot), Effect::Alert(message)];
            }
            let mut effects = vec![dispatch(BidsAction::SetBidsRoot {
                root_path,
                modalities: info.modalities,
            })];
            if let Some(folders) = info.patient_folders {
                effects.push(dispatch(BidsAction::SetFormat(folders)));
            }
            effects
        }
        Err(err) => {
            let mut effects = vec![dispatch(BidsAction::ResetBidsRoot)];
            effects.extend(report(&err));
            effects
        }
    }
}

/// Load a reference CSV, replacing any previous one and its chosen column
pub async fn load_reference_csv(api: ApiClient, path: RepoPath) -> Vec<Effect> {
    match load_csv(&api, &path).await {
        Ok(data) => vec![
            dispatch(BidsAction::ResetReferenceCsv),
            dispatch(BidsAction::SetReferenceCsv(ReferenceCsv { path, data })),
        ],
        Err(err) => report(&err),
    }
}

/// Check the chosen column against the subject folders; `body` comes from
/// [`wizard::bids::reference_column_request`](crate::wizard::bids::reference_column_request)
pub async fn validate_reference_column(
    api: ApiClient,
    body: Value,
    reference: ReferenceColumn,
) -> Vec<Effect> {
    match api.post::<ColumnCheck>(BIDS_VALIDATE_REFERENCE_COLUMN, body).await {
        Ok(check) => match check
            .verdict
            .rejection("Selected column does not correspond to any subject folder")
        {
            Some(message) => vec![dispatch(BidsAction::ResetBidsRef), Effect::Alert(message)],
            None => vec![dispatch(BidsAction::SetBidsRef {
                reference,
                subjects: check.subjects,
            })],
        },
        Err(err) => {
            let mut effects = vec![dispatch(BidsAction::ResetBidsRef)];
            effects.extend(report(&err));
            effects
        }
    }
}

/// Register the draft; `body` comes from [`wizard::bids::add_request`](crate::wizard::bids::add_request)
pub async fn add(api: ApiClient, body: Value) -> Vec<Effect> {
    let result = api.post::<Value>(BIDS_ADD, body).await;
    let succeeded = result.is_ok();
    let mut effects = registered(result);
    if succeeded {
        effects.insert(0, dispatch(BidsAction::Reset));
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::repository::parse_path;
    use crate::model::route::Route;
    use crate::services::tests::{client_for, envelope, error_envelope};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_valid_root_sets_root_and_modalities() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BIDS_VALIDATE_ROOT))
            .and(body_json(json!({"bids_root": ["data", "x"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "valid": true, "modalities": ["T1"], "patient_folders": ["sub-01", "sub-02"]
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = validate_root(api, parse_path("/data/x")).await;

        assert_eq!(
            effects,
            vec![
                dispatch(BidsAction::SetBidsRoot {
                    root_path: parse_path("/data/x"),
                    modalities: vec!["T1".to_string()],
                }),
                dispatch(BidsAction::SetFormat(vec![
                    "sub-01".to_string(),
                    "sub-02".to_string()
                ])),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_root_resets_and_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BIDS_VALIDATE_ROOT))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(error_envelope("Not a BIDS folder")),
            )
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = validate_root(api, parse_path("/data/x")).await;

        assert_eq!(
            effects,
            vec![
                dispatch(BidsAction::ResetBidsRoot),
                Effect::Alert("Not a BIDS folder".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_column_resets_reference() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BIDS_VALIDATE_REFERENCE_COLUMN))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "valid": false, "message": "No subject matches"
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = validate_reference_column(
            api,
            json!({"index_col": 1}),
            ReferenceColumn {
                index: Some(1),
                name: Some("age".to_string()),
            },
        )
        .await;

        assert_eq!(
            effects,
            vec![
                dispatch(BidsAction::ResetBidsRef),
                Effect::Alert("No subject matches".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_accepted_column_keeps_subject_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BIDS_VALIDATE_REFERENCE_COLUMN))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "valid": true,
                "intersection": ["sub-01"],
                "missing_folders": ["sub-03"],
                "missing_entries": []
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);
        let reference = ReferenceColumn {
            index: Some(0),
            name: Some("participant_id".to_string()),
        };

        let effects = validate_reference_column(api, json!({}), reference.clone()).await;

        let [Effect::Dispatch(StoreAction::Bids(BidsAction::SetBidsRef { subjects, .. }))] =
            effects.as_slice()
        else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(subjects.available_subjects, Some(vec!["sub-01".to_string()]));
        assert_eq!(subjects.missing_folders, Some(vec!["sub-03".to_string()]));
    }

    #[tokio::test]
    async fn test_add_resets_draft_and_opens_preview() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BIDS_ADD))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({"dataset_id": "dataset_5"}))),
            )
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = add(api, json!({"bids_root": ["data", "x"]})).await;

        assert_eq!(effects[0], dispatch(BidsAction::Reset));
        assert_eq!(
            effects.last(),
            Some(&Effect::Navigate(Route::DatasetPreview {
                dataset_id: "dataset_5".to_string()
            }))
        );
    }
}
