use super::{WizardFlow, WizardStep};
use crate::store::BidsState;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidsStep {
    Root,
    ReferenceCsv,
    ReferenceColumn,
    Metadata,
    Add,
}

impl WizardStep for BidsStep {
    const ALL: &'static [Self] = &[
        BidsStep::Root,
        BidsStep::ReferenceCsv,
        BidsStep::ReferenceColumn,
        BidsStep::Metadata,
        BidsStep::Add,
    ];

    fn number(&self) -> usize {
        match self {
            BidsStep::Root => 1,
            BidsStep::ReferenceCsv => 2,
            BidsStep::ReferenceColumn => 3,
            BidsStep::Metadata => 4,
            BidsStep::Add => 5,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            BidsStep::Root => "Please select the root folder of BIDS dataset.",
            BidsStep::ReferenceCsv => {
                "Please select reference/demographics CSV file where all subject folder names are stored"
            }
            BidsStep::ReferenceColumn => {
                "Please select the column that represents subject folders in the BIDS root directory."
            }
            BidsStep::Metadata => "Please enter following information",
            BidsStep::Add => "Add/Register BIDS Dataset",
        }
    }
}

impl WizardFlow for BidsState {
    type Step = BidsStep;

    fn is_visible(&self, step: BidsStep) -> bool {
        let has_root = self.bids_root.is_some();
        match step {
            BidsStep::Root => true,
            BidsStep::ReferenceCsv => has_root,
            BidsStep::ReferenceColumn => {
                has_root && self.reference_csv.is_some() && !self.ignore_reference_csv
            }
            BidsStep::Metadata => {
                has_root && (self.bids_ref.reference.is_selected() || self.ignore_reference_csv)
            }
            BidsStep::Add => self.is_visible(BidsStep::Metadata) && self.metadata.is_complete(),
        }
    }
}

pub fn reference_column_request(state: &BidsState, index_col: usize) -> Option<Value> {
    let root = state.bids_root.as_ref()?;
    let csv = state.reference_csv.as_ref()?;
    Some(json!({
        "bids_root": root,
        "reference_csv_path": csv.path,
        "index_col": index_col,
    }))
}

/// Body for the add call; `None` until the final step is visible
pub fn add_request(state: &BidsState) -> Option<Value> {
    if !state.can_submit() {
        return None;
    }
    let root = state.bids_root.as_ref()?;

    let (reference_csv_path, index_col) = if state.ignore_reference_csv {
        (Value::Null, Value::Null)
    } else {
        let csv = state.reference_csv.as_ref()?;
        (json!(csv.path), json!(state.bids_ref.reference.index))
    };

    Some(json!({
        "bids_root": root,
        "reference_csv_path": reference_csv_path,
        "index_col": index_col,
        "name": state.metadata.name,
        "tags": state.metadata.tags,
        "desc": state.metadata.desc,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::CsvTable;
    use crate::model::draft::{MetadataPatch, ReferenceColumn, ReferenceCsv, SubjectReport};
    use crate::model::repository::parse_path;
    use crate::store::{BidsAction, Reducer, StoreAction};

    fn apply(state: BidsState, actions: Vec<BidsAction>) -> BidsState {
        actions
            .into_iter()
            .fold(state, |s, a| s.reduce(&StoreAction::Bids(a)))
    }

    fn with_reference() -> BidsState {
        apply(
            BidsState::default(),
            vec![
                BidsAction::SetBidsRoot {
                    root_path: parse_path("/data/bids"),
                    modalities: vec!["anat".to_string()],
                },
                BidsAction::SetReferenceCsv(ReferenceCsv {
                    path: parse_path("/data/bids/participants.csv"),
                    data: CsvTable::default(),
                }),
                BidsAction::SetBidsRef {
                    reference: ReferenceColumn {
                        index: Some(0),
                        name: Some("participant_id".to_string()),
                    },
                    subjects: SubjectReport::default(),
                },
            ],
        )
    }

    #[test]
    fn test_steps_unlock_in_order() {
        let state = with_reference();
        assert_eq!(
            state.visible_steps(),
            vec![
                BidsStep::Root,
                BidsStep::ReferenceCsv,
                BidsStep::ReferenceColumn,
                BidsStep::Metadata,
            ]
        );
        assert!(!state.can_submit());
    }

    #[test]
    fn test_clearing_root_hides_everything_after_it() {
        let state = apply(
            with_reference(),
            vec![
                BidsAction::SetMetadata(MetadataPatch {
                    name: Some("bids".to_string()),
                    tags: Some(vec!["mri".to_string()]),
                    desc: Some("desc".to_string()),
                }),
                BidsAction::ResetBidsRoot,
            ],
        );
        assert_eq!(state.visible_steps(), vec![BidsStep::Root]);
        assert!(add_request(&state).is_none());
    }

    #[test]
    fn test_add_request_carries_whole_draft() {
        let state = apply(
            with_reference(),
            vec![BidsAction::SetMetadata(MetadataPatch {
                name: Some("bids".to_string()),
                tags: Some(vec!["mri".to_string(), "t1".to_string()]),
                desc: Some("desc".to_string()),
            })],
        );
        assert_eq!(state.current_step(), BidsStep::Add);

        let body = add_request(&state).unwrap();
        assert_eq!(body["bids_root"], json!(["data", "bids"]));
        assert_eq!(body["index_col"], json!(0));
        assert_eq!(body["tags"], json!(["mri", "t1"]));
        assert_eq!(body["name"], json!("bids"));
    }
}
