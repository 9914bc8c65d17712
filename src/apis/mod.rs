pub mod account;
pub mod container;
pub mod flavor;
pub mod instance;

// Re-export all APIs
pub use account::AccountApi;
pub use container::ContainerApi;
pub use flavor::FlavorApi;
pub use instance::InstanceApi;

use crate::error::{OpenStackError, OpenStackResult};
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::str::FromStr;

/// Identifier sent either as a number (older deployments) or as a string
pub(crate) fn id_string(id: Value) -> String {
    match id {
        Value::String(id) => id,
        other => other.to_string(),
    }
}

/// Percent-encode one path segment, refusing names that would resolve relative to the endpoint
pub(crate) fn path_segment(kind: &str, value: &str) -> OpenStackResult<String> {
    if matches!(value, "" | "." | "..") {
        return Err(OpenStackError::invalid_param(format!(
            "{} name {:?} is not a valid path segment",
            kind, value
        )));
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// Read a numeric header, treating a missing header as zero
///
/// Snapshot counts are unsigned, so a negative value is reported as `InvalidResponse`.
pub(crate) fn numeric_header<T>(headers: &HeaderMap, name: &str) -> OpenStackResult<T>
where
    T: FromStr + Default,
{
    let Some(value) = headers.get(name) else {
        return Ok(T::default());
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| {
            OpenStackError::invalid_response(format!("header {} is not a number: {:?}", name, value))
        })
}
