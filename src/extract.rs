//! Form body extraction.
//!
//! Browsers post either `application/x-www-form-urlencoded` or
//! `multipart/form-data`. Both are flattened into key/value pairs, keys are
//! lower-cased (field names are case-insensitive on the wire) and the last
//! value of a repeated key wins, then the pairs are deserialized into `T`.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::error::AppError;

pub struct FormPayload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        let pairs = if is_multipart {
            let mut mp = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let mut pairs = Vec::new();
            while let Some(field) = mp
                .next_field()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
            {
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                if field.file_name().is_some() {
                    continue;
                }
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                pairs.push((name, value));
            }
            pairs
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            serde_urlencoded::from_bytes::<Vec<(String, String)>>(&body)
                .map_err(|e| AppError::BadRequest(e.to_string()))?
        };

        decode_pairs(pairs).map(FormPayload)
    }
}

pub fn decode_pairs<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> Result<T, AppError> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(pairs.len());
    let mut normalized: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key = key.to_ascii_lowercase();
        match index.get(&key) {
            Some(&i) => normalized[i].1 = value,
            None => {
                index.insert(key.clone(), normalized.len());
                normalized.push((key, value));
            }
        }
    }
    let encoded = serde_urlencoded::to_string(&normalized)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    serde_urlencoded::from_str(&encoded).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Accepts `true`/`false`, `on`/`off`, `1`/`0`, `yes`/`no`, any case; blank is false.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean, got `{other}`"
        ))),
    }
}

/// Trimmed value, or `None` when blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
