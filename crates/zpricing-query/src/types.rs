//! Wire types for the billing platform's query actions
//!
//! `action/query` and `action/queryMore` exchange camelCase JSON. Records come
//! back untyped; the object name from the statement is injected as the
//! `type` tag before they are decoded into `QueryRecord`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zpricing_core::{models::QueryRecord, AppError, AppResult};

/// Body of `action/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    #[serde(rename = "queryString")]
    pub query_string: String,
}

/// Body of `action/queryMore`
#[derive(Debug, Clone, Serialize)]
pub struct QueryMoreRequest {
    #[serde(rename = "queryLocator")]
    pub query_locator: String,
}

/// Response of both query actions
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryResponse {
    #[serde(default)]
    pub size: usize,

    #[serde(default = "default_done")]
    pub done: bool,

    #[serde(default)]
    pub records: Vec<Map<String, Value>>,

    #[serde(rename = "queryLocator")]
    pub query_locator: Option<String>,

    #[serde(rename = "faultcode")]
    pub fault_code: Option<String>,

    #[serde(rename = "faultstring")]
    pub fault_string: Option<String>,
}

fn default_done() -> bool {
    true
}

impl QueryResponse {
    /// Platform-reported fault, if any
    pub fn fault(&self) -> Option<AppError> {
        if self.fault_code.is_none() && self.fault_string.is_none() {
            return None;
        }
        Some(AppError::Query(format!(
            "{}: {}",
            self.fault_code.as_deref().unwrap_or("UNKNOWN"),
            self.fault_string.as_deref().unwrap_or("no fault string")
        )))
    }

    /// Locator of the next page, when the platform says there is one
    pub fn next_locator(&self) -> Option<&str> {
        if self.done {
            None
        } else {
            self.query_locator.as_deref()
        }
    }
}

/// Decode raw records, tagging untyped ones with `object`
pub fn decode_records(
    records: Vec<Map<String, Value>>,
    object: Option<&str>,
) -> AppResult<Vec<QueryRecord>> {
    records
        .into_iter()
        .map(|mut record| {
            if !record.contains_key("type") {
                let object = object.ok_or_else(|| {
                    AppError::Serialization(
                        "record has no type and the queried object is unknown".to_string(),
                    )
                })?;
                record.insert("type".to_string(), Value::String(object.to_string()));
            }
            serde_json::from_value(Value::Object(record)).map_err(AppError::from)
        })
        .collect()
}
