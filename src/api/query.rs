use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Query string where a repeated key keeps its last value. Every value is
/// passed on as a string, so `T` should use string fields. A query that
/// still cannot be read becomes a 400 in the usual error envelope.
#[derive(Debug, Clone)]
pub struct LastValueQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for LastValueQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        let mut fields = Map::new();
        for (key, value) in pairs {
            fields.insert(key, Value::String(value));
        }

        let value = serde_json::from_value(Value::Object(fields))
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))?;
        Ok(Self(value))
    }
}
