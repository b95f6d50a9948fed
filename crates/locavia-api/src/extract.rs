//! Tenant scoping extractor
//!
//! Tenant routing and authentication run in the platform gateway in front
//! of this service; requests arrive with the resolved identifiers already
//! in headers. `X-Tenant-Id` scopes every query and is mandatory on every
//! route. `X-User-Id` names the acting operator and is read lazily through
//! [`TenantContext::actor`], so only the write endpoints require it.

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use locavia_core::AppError;
use std::future::{ready, Ready};
use tracing::debug;
use uuid::Uuid;

/// Header carrying the tenant identifier
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Header carrying the acting operator
pub const ACTOR_HEADER: &str = "X-User-Id";

/// Tenant scope of a request
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    /// Tenant every query in this request is scoped to
    pub tenant_id: Uuid,

    actor_id: Option<Uuid>,
}

impl TenantContext {
    /// The acting operator, required by write endpoints
    pub fn actor(&self) -> Result<Uuid, AppError> {
        self.actor_id
            .ok_or_else(|| AppError::MissingField(format!("{} header", ACTOR_HEADER)))
    }
}

/// Read and parse an optional UUID header
fn header_uuid(req: &HttpRequest, name: &str) -> Result<Option<Uuid>, AppError> {
    let Some(value) = req.headers().get(name) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::InvalidInput(format!("{} header is not valid UTF-8", name)))?;

    let id = Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidInput(format!("{} header is not a valid UUID", name)))?;

    Ok(Some(id))
}

impl FromRequest for TenantContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let tenant_id = match header_uuid(req, TENANT_HEADER) {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!("Rejected request without {} header", TENANT_HEADER);
                return ready(Err(AppError::MissingField(format!(
                    "{} header",
                    TENANT_HEADER
                ))));
            }
            Err(e) => return ready(Err(e)),
        };

        let actor_id = match header_uuid(req, ACTOR_HEADER) {
            Ok(actor) => actor,
            Err(e) => return ready(Err(e)),
        };

        ready(Ok(TenantContext {
            tenant_id,
            actor_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_tenant_and_actor() {
        let tenant = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, tenant.to_string()))
            .insert_header((ACTOR_HEADER, actor.to_string()))
            .to_http_request();

        let ctx = TenantContext::extract(&req).await.unwrap();
        assert_eq!(ctx.tenant_id, tenant);
        assert_eq!(ctx.actor().unwrap(), actor);
    }

    #[actix_web::test]
    async fn test_missing_tenant_header_rejected() {
        let req = TestRequest::default().to_http_request();

        let err = TenantContext::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::MissingField(_)));
    }

    #[actix_web::test]
    async fn test_malformed_tenant_header_rejected() {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, "not-a-uuid"))
            .to_http_request();

        let err = TenantContext::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[actix_web::test]
    async fn test_actor_is_optional_until_requested() {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, Uuid::new_v4().to_string()))
            .to_http_request();

        let ctx = TenantContext::extract(&req).await.unwrap();
        let err = ctx.actor().unwrap_err();
        assert!(matches!(err, AppError::MissingField(_)));
    }
}
