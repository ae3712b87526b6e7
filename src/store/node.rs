//! Node environment as reported by the configuration endpoint

use super::{Reducer, StoreAction};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeAction {
    EnvironLoaded(BTreeMap<String, Value>),
    Error { message: String },
}

impl NodeAction {
    pub fn kind(&self) -> &'static str {
        match self {
            NodeAction::EnvironLoaded(_) => "SET_NODE_ENVIRON",
            NodeAction::Error { .. } => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    pub environ: Option<BTreeMap<String, Value>>,
    pub error: Option<String>,
}

impl Reducer for NodeState {
    fn reduce(self, action: &StoreAction) -> Self {
        match action {
            StoreAction::Node(NodeAction::EnvironLoaded(environ)) => Self {
                environ: Some(environ.clone()),
                error: None,
            },
            StoreAction::Node(NodeAction::Error { message }) => Self {
                error: Some(message.clone()),
                ..self
            },
            _ => self,
        }
    }
}
