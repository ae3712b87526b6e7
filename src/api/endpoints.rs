//! Node API endpoint paths (relative to the configured server URL)

pub const AUTH_TOKEN: &str = "/api/token/auth";
pub const REFRESH_TOKEN: &str = "/api/token/refresh";
pub const UPDATE_PASSWORD: &str = "/api/user/password/update";

pub const DATASETS_LIST: &str = "/api/datasets/list";
pub const DATASET_PREVIEW: &str = "/api/datasets/preview";
pub const DATASET_REMOVE: &str = "/api/datasets/remove";
pub const DATASET_UPDATE: &str = "/api/datasets/update";
pub const DATASET_ADD: &str = "/api/datasets/add";
pub const DEFAULT_DATASET_ADD: &str = "/api/datasets/add-default-dataset";
pub const LOAD_CSV_DATA: &str = "/api/datasets/get-csv-data";

pub const REPOSITORY_LIST: &str = "/api/repository/list";
pub const NODE_ENVIRON: &str = "/api/config/node-environ";

// BIDS
pub const BIDS_VALIDATE_ROOT: &str = "/api/datasets/bids/validate-bids-root";
pub const BIDS_VALIDATE_REFERENCE_COLUMN: &str =
    "/api/datasets/bids/validate-reference-column";
pub const BIDS_ADD: &str = "/api/datasets/bids/add";
pub const BIDS_PREVIEW: &str = "/api/datasets/bids/preview";

// MedicalFolder
pub const MEDICAL_FOLDER_VALIDATE_ROOT: &str =
    "/api/datasets/medical-folder-dataset/validate-root";
pub const MEDICAL_FOLDER_VALIDATE_REFERENCE_COLUMN: &str =
    "/api/datasets/medical-folder-dataset/validate-reference-column";
pub const MEDICAL_FOLDER_ADD: &str = "/api/datasets/medical-folder-dataset/add";
pub const MEDICAL_FOLDER_DEFAULT_MODALITIES: &str =
    "/api/datasets/medical-folder-dataset/default-modalities";
pub const MEDICAL_FOLDER_LIST_DLPS: &str = "/api/datasets/medical-folder-dataset/list-dlps";

// Admin
pub const ADMIN_USERS_LIST: &str = "/api/admin/users/list";
pub const ADMIN_USERS_CREATE: &str = "/api/admin/users/create";
pub const ADMIN_REQUESTS_LIST: &str = "/api/admin/requests/list";
pub const ADMIN_REQUESTS_APPROVE: &str = "/api/admin/requests/approve";
pub const ADMIN_REQUESTS_REJECT: &str = "/api/admin/requests/reject";
