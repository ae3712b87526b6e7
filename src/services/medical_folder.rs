//! MedicalFolder wizard calls

use super::bids::ColumnCheck;
use super::datasets::registered;
use super::repository::load_csv;
use super::{report, Effect, Verdict};
use crate::api::endpoints::{
    MEDICAL_FOLDER_ADD, MEDICAL_FOLDER_DEFAULT_MODALITIES, MEDICAL_FOLDER_LIST_DLPS,
    MEDICAL_FOLDER_VALIDATE_REFERENCE_COLUMN, MEDICAL_FOLDER_VALIDATE_ROOT,
};
use crate::api::ApiClient;
use crate::model::dataset::CsvTable;
use crate::model::draft::{ReferenceColumn, ReferenceCsv};
use crate::model::repository::RepoPath;
use crate::store::{MedicalFolderAction, StoreAction};
use serde::Deserialize;
use serde_json::{json, Value};

fn dispatch(action: MedicalFolderAction) -> Effect {
    Effect::Dispatch(StoreAction::MedicalFolder(action))
}

#[derive(Debug, Deserialize)]
struct RootInfo {
    #[serde(flatten)]
    verdict: Verdict,
    #[serde(default)]
    modalities: Vec<String>,
}

pub async fn validate_root(api: ApiClient, root_path: RepoPath) -> Vec<Effect> {
    let body = json!({ "medical_folder_root": root_path });
    match api.post::<RootInfo>(MEDICAL_FOLDER_VALIDATE_ROOT, body).await {
        Ok(info) => match info
            .verdict
            .rejection("MedicalFolder root folder is not valid")
        {
            Some(message) => vec![dispatch(MedicalFolderAction::ResetRoot), Effect::Alert(message)],
            None => vec![dispatch(MedicalFolderAction::SetRoot {
                root_path,
                modalities: info.modalities,
            })],
        },
        Err(err) => {
            let mut effects = vec![dispatch(MedicalFolderAction::ResetRoot)];
            effects.extend(report(&err));
            effects
        }
    }
}

/// Modality names suggested when mapping folders. Entries may be plain
/// strings or `{value, label}` options.
pub async fn default_modalities(api: ApiClient) -> Vec<Effect> {
    match api.get::<Vec<Value>>(MEDICAL_FOLDER_DEFAULT_MODALITIES).await {
        Ok(options) => {
            let names = options
                .iter()
                .filter_map(|option| match option {
                    Value::String(name) => Some(name.clone()),
                    Value::Object(map) => map
                        .get("value")
                        .or_else(|| map.get("label"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect();
            vec![dispatch(MedicalFolderAction::SetDefaultModalityNames(names))]
        }
        Err(err) => report(&err),
    }
}

/// DLP catalog, as a table the operator picks a row from
pub async fn list_dlps(api: ApiClient) -> Vec<Effect> {
    match api.get::<CsvTable>(MEDICAL_FOLDER_LIST_DLPS).await {
        Ok(table) => vec![dispatch(MedicalFolderAction::SetExistingDlps(table))],
        Err(err) => report(&err),
    }
}

pub async fn load_reference_csv(api: ApiClient, path: RepoPath) -> Vec<Effect> {
    match load_csv(&api, &path).await {
        Ok(data) => vec![dispatch(MedicalFolderAction::SetReferenceCsv(ReferenceCsv {
            path,
            data,
        }))],
        Err(err) => report(&err),
    }
}

/// `body` comes from
/// [`wizard::medical_folder::reference_column_request`](crate::wizard::medical_folder::reference_column_request)
pub async fn validate_reference_column(
    api: ApiClient,
    body: Value,
    reference: ReferenceColumn,
) -> Vec<Effect> {
    match api
        .post::<ColumnCheck>(MEDICAL_FOLDER_VALIDATE_REFERENCE_COLUMN, body)
        .await
    {
        Ok(check) => match check.verdict.rejection(
            "Selected column for MedicalFolder subject reference does not correspond any subject folder.",
        ) {
            Some(message) => vec![
                dispatch(MedicalFolderAction::ResetReference),
                Effect::Alert(message),
            ],
            None => vec![
                dispatch(MedicalFolderAction::SetReferenceColumn(reference)),
                dispatch(MedicalFolderAction::SetSubjects(check.subjects)),
            ],
        },
        Err(err) => {
            let mut effects = vec![dispatch(MedicalFolderAction::ResetReference)];
            effects.extend(report(&err));
            effects
        }
    }
}

pub async fn add(api: ApiClient, body: Value) -> Vec<Effect> {
    let result = api.post::<Value>(MEDICAL_FOLDER_ADD, body).await;
    let succeeded = result.is_ok();
    let mut effects = registered(result);
    if succeeded {
        effects.insert(0, dispatch(MedicalFolderAction::Reset));
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::repository::parse_path;
    use crate::services::tests::{client_for, envelope};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_valid_root() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MEDICAL_FOLDER_VALIDATE_ROOT))
            .and(body_json(json!({"medical_folder_root": ["data", "mf"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "valid": true, "modalities": ["T1w", "flair"]
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = validate_root(api, parse_path("/data/mf")).await;

        assert_eq!(
            effects,
            vec![dispatch(MedicalFolderAction::SetRoot {
                root_path: parse_path("/data/mf"),
                modalities: vec!["T1w".to_string(), "flair".to_string()],
            })]
        );
    }

    #[tokio::test]
    async fn test_default_modalities_accepts_options() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(MEDICAL_FOLDER_DEFAULT_MODALITIES))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                {"value": "T1", "label": "T1"},
                "T2",
                {"label": "FLAIR"}
            ]))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = default_modalities(api).await;

        assert_eq!(
            effects,
            vec![dispatch(MedicalFolderAction::SetDefaultModalityNames(vec![
                "T1".to_string(),
                "T2".to_string(),
                "FLAIR".to_string(),
            ]))]
        );
    }

    #[tokio::test]
    async fn test_list_dlps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(MEDICAL_FOLDER_LIST_DLPS))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "columns": ["name", "dlp_id"], "index": [0], "data": [["brain plan", "dlp_1"]]
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = list_dlps(api).await;

        let [Effect::Dispatch(StoreAction::MedicalFolder(MedicalFolderAction::SetExistingDlps(
            table,
        )))] = effects.as_slice()
        else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(table.data.len(), 1);
    }

    #[tokio::test]
    async fn test_accepted_column_sets_reference_then_subjects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MEDICAL_FOLDER_VALIDATE_REFERENCE_COLUMN))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "intersection": ["sub-01", "sub-02"],
                "missing_folders": [],
                "missing_entries": []
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);
        let reference = ReferenceColumn {
            index: Some(0),
            name: Some("FOLDER_NAME".to_string()),
        };

        let effects = validate_reference_column(api, json!({}), reference.clone()).await;

        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[0],
            dispatch(MedicalFolderAction::SetReferenceColumn(reference))
        );
    }
}
