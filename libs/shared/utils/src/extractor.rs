use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::state::AppState;

/// Requires a valid operator bearer token with the admin role and stores the
/// `Operator` in the request extensions.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    let operator = validate_token(token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    if !operator.is_admin() {
        return Err(AppError::Auth("Administrator role required".to_string()));
    }

    request.extensions_mut().insert(operator);

    Ok(next.run(request).await)
}
