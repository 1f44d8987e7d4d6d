use axum::{
    body::Body,
    extract::{FromRequest, State, rejection::JsonRejection},
    middleware::Next,
    response::{IntoResponse, Response},
};
use error_stack::Report;
use hyper::{Request, header};
use model::{AccessToken, ValidationErrors};
use serde::Serialize;
use utoipa::{
    Modify,
    openapi::security::{ApiKeyValue, SecurityScheme},
};

use crate::{DataError, app::AuthResolver};

pub use model::ACCESS_TOKEN_HEADER_STR;

pub static ACCESS_TOKEN_HEADER: header::HeaderName =
    header::HeaderName::from_static(ACCESS_TOKEN_HEADER_STR);

/// Field name which is used in error responses when the whole request
/// body is invalid.
pub const REQUEST_BODY_FIELD: &str = "body";

/// Middleware for resolving the account which made the request.
///
/// Adds `AccountId` extension to request, so that adding
/// "Extension(api_caller_account_id): Extension<AccountId>"
/// to handlers is possible.
pub async fn authenticate_with_access_token<S: AuthResolver>(
    State(state): State<S>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = match req.headers().get(&ACCESS_TOKEN_HEADER) {
        Some(header) => {
            let key_str = header.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;
            Some(AccessToken::new(key_str.to_string()))
        }
        None => None,
    };

    if let Some(id) = state.resolve_account(token.as_ref()).await {
        req.extensions_mut().insert(id);
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Utoipa API doc security config
pub struct SecurityApiAccessTokenDefault;

impl Modify for SecurityApiAccessTokenDefault {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "access_token",
                SecurityScheme::ApiKey(utoipa::openapi::security::ApiKey::Header(
                    ApiKeyValue::new(ACCESS_TOKEN_HEADER_STR),
                )),
            )
        }
    }
}

// Replace axum's plain text JSON rejections with the same error body
// which validation errors use.

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: hyper::StatusCode,
    message: String,
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errors = ValidationErrors::single(REQUEST_BODY_FIELD, self.message);
        (self.status, axum::Json(errors)).into_response()
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 400
    BAD_REQUEST,
    /// 401
    UNAUTHORIZED,
    /// 404
    NOT_FOUND,
    /// 500
    INTERNAL_SERVER_ERROR,
}

impl From<StatusCode> for hyper::StatusCode {
    fn from(value: StatusCode) -> Self {
        match value {
            StatusCode::BAD_REQUEST => hyper::StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED => hyper::StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND => hyper::StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR => hyper::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        let status: hyper::StatusCode = self.into();
        status.into_response()
    }
}

#[derive(thiserror::Error, Debug)]
enum RequestError {
    #[error("Data reading or writing failed")]
    Data,
}

impl From<Report<DataError>> for StatusCode {
    #[track_caller]
    fn from(value: Report<DataError>) -> Self {
        // Not found is possible only if auth and profile data do not match
        if *value.current_context() == DataError::NotFound {
            tracing::warn!("{:?}", value.change_context(RequestError::Data));
            StatusCode::NOT_FOUND
        } else {
            tracing::error!("{:?}", value.change_context(RequestError::Data));
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Error for route handlers which validate the request body.
#[derive(Debug)]
pub enum RouteError {
    Status(StatusCode),
    /// Response status is 422.
    Validation(ValidationErrors),
}

impl From<StatusCode> for RouteError {
    fn from(value: StatusCode) -> Self {
        Self::Status(value)
    }
}

impl From<ValidationErrors> for RouteError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<Report<DataError>> for RouteError {
    #[track_caller]
    fn from(value: Report<DataError>) -> Self {
        Self::Status(value.into())
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match self {
            Self::Status(status) => status.into_response(),
            Self::Validation(errors) => {
                (hyper::StatusCode::UNPROCESSABLE_ENTITY, axum::Json(errors)).into_response()
            }
        }
    }
}
