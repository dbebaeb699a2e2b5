//! Wire types for the dashboard file endpoints.

use serde::{Deserialize, Serialize};

/// Body of a listing request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListRequest<'a> {
    pub container_name: &'a str,
    pub pod_name: &'a str,
    pub namespace: &'a str,
    pub is_dir: bool,
    pub path: &'a str,
}

/// Body of a delete or download request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActionRequest<'a> {
    pub container_name: &'a str,
    pub pod_name: &'a str,
    pub namespace: &'a str,
    pub path: &'a str,
}

/// Response envelope every JSON endpoint wraps its payload in.
///
/// Both fields are optional on the wire; an envelope with no `data` is
/// treated the same as an empty payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub msg: Option<String>,
    pub data: Option<T>,
}

/// Payload of a listing response.
#[derive(Debug, Deserialize)]
pub(crate) struct RowsPayload {
    pub rows: Option<Vec<RawEntry>>,
}

/// One directory entry as reported by the backend.
///
/// Every field is optional on the wire and normalizes to an empty string,
/// `0` or `false` when missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub permissions: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub mod_time: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
}
