use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Ok(Self {
            status: StatusCode::OK.as_u16(),
            message: "ok".to_string(),
            data,
        })
    }

    pub fn created(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::CREATED, "created", data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status: status.as_u16(),
            message: message.into(),
            data,
        })
    }

    /// Renders the envelope and appends a `Set-Cookie` header.
    pub fn with_cookie(self, cookie: &str) -> Result<Response, AppError> {
        let mut response = self.into_response();
        append_cookie(&mut response, cookie)?;
        Ok(response)
    }
}

pub fn append_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|err| AppError::internal_with_source("Failed to build cookie", err))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

impl JsonApiResponse<serde_json::Value> {
    pub(crate) fn from_error(err: &AppError) -> Self {
        let status = status_for(err);
        Self {
            status: status.as_u16(),
            message: err.message().to_string(),
            data: serde_json::Value::Null,
        }
    }

    pub(crate) fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: serde_json::Value::Null,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{StatusCode, header},
        response::IntoResponse,
    };

    use super::{JsonApiResponse, status_for};
    use crate::error::AppError;

    #[test]
    fn error_variants_map_to_http_status() {
        assert_eq!(status_for(&AppError::bad_request("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AppError::unauthorized("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&AppError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&AppError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&AppError::internal("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn created_envelope_uses_201() {
        let response = JsonApiResponse::created(1).expect("envelope").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn with_cookie_appends_set_cookie_header() {
        let response = JsonApiResponse::ok(())
            .expect("envelope")
            .with_cookie("session=abc; Path=/")
            .expect("cookie should be valid");
        assert_eq!(
            response.headers().get(header::SET_COOKIE).map(|v| v.as_bytes()),
            Some("session=abc; Path=/".as_bytes())
        );
    }
}
