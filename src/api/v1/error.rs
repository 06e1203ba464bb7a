use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(code) = err.find::<ApiErrorCode>() {
        (code.clone(), code.to_string())
    } else if err.is_not_found() {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::NotFound,
            ApiErrorCode::NotFound.to_string(),
        ));
        return Ok(warp::reply::with_status(json, StatusCode::NOT_FOUND));
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::InvalidRequest,
            "Method not allowed",
        ));
        return Ok(warp::reply::with_status(json, StatusCode::METHOD_NOT_ALLOWED));
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (ApiErrorCode::InvalidRequest, e.to_string())
    } else if err.find::<reject::MissingHeader>().is_some() {
        (
            ApiErrorCode::InvalidToken,
            ApiErrorCode::InvalidToken.to_string(),
        )
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            ApiErrorCode::InternalError,
            format!("Unhandled error: {:?}", err),
        )
    };

    let status = code.status();
    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("Login is taken")]
    LoginTaken,
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Refresh token is malformed")]
    RefreshTokenMalformed,
    #[error("Refresh token has expired")]
    RefreshTokenExpired,
    #[error("Refresh token is not the active one")]
    RefreshTokenMismatch,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Not found")]
    NotFound,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        error!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials
            | ApiErrorCode::LoginTaken
            | ApiErrorCode::InvalidRequest
            | ApiErrorCode::RefreshTokenMalformed => StatusCode::BAD_REQUEST,
            ApiErrorCode::RefreshTokenExpired
            | ApiErrorCode::RefreshTokenMismatch
            | ApiErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::LoginTaken => ApiErrorCode::LoginTaken,
            AuthError::InvalidInput(reason) => {
                debug!("rejected input: {}", reason);
                ApiErrorCode::InvalidRequest
            }
            AuthError::RefreshTokenExpired => ApiErrorCode::RefreshTokenExpired,
            AuthError::RefreshTokenMalformed => ApiErrorCode::RefreshTokenMalformed,
            AuthError::RefreshTokenMismatch => ApiErrorCode::RefreshTokenMismatch,
            AuthError::AccessTokenInvalid => ApiErrorCode::InvalidToken,
            AuthError::StoreUnavailable(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_failures_split_between_400_and_401() {
        let malformed = ApiErrorCode::from(AuthError::RefreshTokenMalformed);
        let expired = ApiErrorCode::from(AuthError::RefreshTokenExpired);
        let mismatch = ApiErrorCode::from(AuthError::RefreshTokenMismatch);

        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mismatch.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn store_failures_are_internal() {
        let code = ApiErrorCode::from(AuthError::StoreUnavailable("redis down".to_string()));
        assert_eq!(code, ApiErrorCode::InternalError);
        assert_eq!(code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
