use super::{report, Effect};
use crate::api::endpoints::NODE_ENVIRON;
use crate::api::ApiClient;
use crate::store::{NodeAction, StoreAction};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fetch the node environment shown on the configuration screen
pub async fn environ(api: ApiClient) -> Vec<Effect> {
    match api.get::<BTreeMap<String, Value>>(NODE_ENVIRON).await {
        Ok(environ) => vec![Effect::Dispatch(StoreAction::Node(NodeAction::EnvironLoaded(
            environ,
        )))],
        Err(err) => {
            let mut effects = vec![Effect::Dispatch(StoreAction::Node(NodeAction::Error {
                message: err.user_message(),
            }))];
            effects.extend(report(&err));
            effects
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::{client_for, envelope};
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_environ_loaded_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NODE_ENVIRON))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "NODE_ID": "node_73f1",
                "DB_PATH": "/var/node/db.json"
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = environ(api).await;

        let [Effect::Dispatch(StoreAction::Node(NodeAction::EnvironLoaded(environ)))] =
            effects.as_slice()
        else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(environ["NODE_ID"], json!("node_73f1"));
    }

    #[tokio::test]
    async fn test_server_error_stored_and_alerted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NODE_ENVIRON))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = environ(api).await;

        assert_eq!(effects.len(), 2);
        assert_eq!(effects[1], Effect::Alert("Internal Server Error".to_string()));
    }
}
