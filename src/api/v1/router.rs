use super::error::*;
use super::handler;
use crate::application_port::IdentityService;
use crate::domain_model::ClaimSet;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let signup = warp::path("identity")
        .and(warp::path("signup"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.identity_service.clone()))
        .and_then(handler::signup);

    let login = warp::path("identity")
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.identity_service.clone()))
        .and_then(handler::login);

    let refresh = warp::path("identity")
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.identity_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::path("identity")
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_verification(server.identity_service.clone()))
        .and(with(server.identity_service.clone()))
        .and_then(handler::logout);

    let test = warp::path("test")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_verification(server.identity_service.clone()))
        .and_then(handler::test);

    signup.or(login).or(refresh).or(logout).or(test)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_verification(
    identity_service: Arc<dyn IdentityService>,
) -> impl Filter<Extract = (ClaimSet,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(move |token: String| {
        let identity_service = identity_service.clone();
        async move {
            if let Some(token) = token.strip_prefix("Bearer ") {
                let claims = identity_service
                    .authenticate(token)
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)?;
                Ok(claims)
            } else {
                Err(reject::custom(ApiErrorCode::InvalidToken))
            }
        }
    })
}
