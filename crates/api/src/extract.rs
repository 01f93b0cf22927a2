//! Request extractors for identity supplied by the external auth layer.
//!
//! Authentication itself is out of scope; the gateway in front of this
//! service resolves the session and forwards the tenant and user ids as
//! headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

/// Tenant id from the `X-Tenant-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct TenantId(pub Uuid);

/// User id from the `X-User-Id` header, required for attributed writes.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

const TENANT_HEADER: &str = "x-tenant-id";
const USER_HEADER: &str = "x-user-id";

impl<S: Send + Sync> FromRequestParts<S> for TenantId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_uuid(parts, TENANT_HEADER).map(Self)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_uuid(parts, USER_HEADER).map(Self)
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, ApiError> {
    let value = parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    Uuid::parse_str(value).map_err(|_| ApiError::Unauthorized)
}
