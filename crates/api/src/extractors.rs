//! Request extractors with coded rejections.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use chrono::{DateTime, Utc};
use ledger_core::{limits::MAX_QUERY_LIMIT, AggregateQuery};
use serde::{de::DeserializeOwned, Deserialize};
use telemetry::metrics;

use crate::response::ApiError;

/// JSON body whose rejections surface as `VALID_004`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                metrics().validation_failures.inc();
                Err(ApiError::malformed_body(rejection.body_text()))
            }
        }
    }
}

/// Raw `?since=&limit=` parameters.
#[derive(Debug, Default, Deserialize)]
struct RawListParams {
    since: Option<String>,
    limit: Option<String>,
}

/// Parsed list parameters shared by the aggregate and listing endpoints.
///
/// `since` is RFC 3339; `limit` is a positive integer, clamped to the
/// query cap by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl ListParams {
    pub fn to_query(&self) -> AggregateQuery {
        AggregateQuery {
            since: self.since,
            limit: self.limit,
        }
    }

    fn parse(raw: RawListParams) -> Result<Self, ApiError> {
        let since = match raw.since.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                DateTime::parse_from_rfc3339(s)
                    .map_err(|e| ApiError::invalid_query(format!("since '{}': {}", s, e)))?
                    .with_timezone(&Utc),
            ),
        };

        let limit = match raw.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => match s.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ApiError::invalid_query(format!(
                        "limit '{}' must be an integer between 1 and {}",
                        s, MAX_QUERY_LIMIT
                    )))
                }
                Ok(n) => Some(n),
            },
        };

        Ok(Self { since, limit })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let result = match Query::<RawListParams>::from_request_parts(parts, state).await {
            Ok(Query(raw)) => Self::parse(raw),
            Err(rejection) => Err(ApiError::invalid_query(rejection.body_text())),
        };
        if result.is_err() {
            metrics().validation_failures.inc();
        }
        result
    }
}
