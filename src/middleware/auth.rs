use crate::AppState;
use crate::utils::auth::{Claims, validate_jwt};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Validates the bearer token from the external session provider and stashes
/// its claims for downstream handlers and role gates.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            if let Ok(claims) = validate_jwt(token, &state.config.jwt_secret) {
                req.extensions_mut().insert(claims);
                return Ok(next.run(req).await);
            }
        }
    }

    Err(StatusCode::UNAUTHORIZED)
}

/// Capability check for the ingestion feature: admin only
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    require_role(req, next, "admin").await
}

/// Capability check for the analytics feature: analyst only
pub async fn require_analyst(req: Request, next: Next) -> Result<Response, StatusCode> {
    require_role(req, next, "analyst").await
}

/// The session provider decides who holds which role; this layer only
/// checks the asserted capability.
async fn require_role(req: Request, next: Next, role: &str) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if claims.role == role {
        Ok(next.run(req).await)
    } else {
        tracing::warn!(
            user = %claims.sub,
            held = %claims.role,
            required = role,
            "role check failed"
        );
        Err(StatusCode::FORBIDDEN)
    }
}
