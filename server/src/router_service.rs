use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use warp::http::{header, HeaderValue, Response, StatusCode};
use warp::hyper::body::Bytes;
use warp::hyper::Body;
use warp::path::FullPath;
use warp::{Filter, Rejection};

use cirrus_shared::api::*;

use crate::session_service::Session;
use crate::{account_service, billing, file_service, ClientError, RequestContext, ServerError, ServerState};

type HttpResponse = Response<Body>;

pub fn routes(
    server_state: &Arc<ServerState>,
) -> impl Filter<Extract = (HttpResponse,), Error = Rejection> + Clone {
    let state = server_state.clone();
    warp::any()
        .and(warp::method())
        .and(warp::path::full())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(warp::header::optional::<String>("stripe-signature"))
        .and(warp::body::bytes())
        .and_then(move |method, path, cookie, stripe_sig, body| {
            let state = state.clone();
            async move {
                Ok::<_, Rejection>(route(&state, method, path, cookie, stripe_sig, body).await)
            }
        })
}

macro_rules! authed_route_handler {
    ($TRequest:ty, $handler:path, $state:ident, $cookie:ident, $body:ident) => {{
        info!("Request matched {} {}", <$TRequest>::METHOD, <$TRequest>::ROUTE);

        let session = match authenticate($state, $cookie.as_deref()) {
            Some(session) => session,
            None => return error_response::<$TRequest>(ErrorWrapper::InvalidAuth),
        };
        let request: $TRequest = match unpack(&$body) {
            Ok(request) => request,
            Err(err) => {
                warn!("Error deserializing request: {:?}", err);
                return error_response::<$TRequest>(ErrorWrapper::BadRequest);
            }
        };
        let result = $handler(RequestContext { server_state: $state, request, session }).await;
        pack::<$TRequest>(result)
    }};
}

pub async fn route(
    server_state: &ServerState, method: warp::http::Method, path: FullPath,
    cookie: Option<String>, stripe_sig: Option<String>, body: Bytes,
) -> HttpResponse {
    macro_rules! matches_route {
        ($TRequest:ty) => {
            method == <$TRequest>::METHOD && path.as_str() == <$TRequest>::ROUTE
        };
    }

    if matches_route!(LoginRequest) {
        let request: LoginRequest = match unpack(&body) {
            Ok(request) => request,
            Err(_) => return error_response::<LoginRequest>(ErrorWrapper::BadRequest),
        };
        return match account_service::login(server_state, request).await {
            Ok((identity, token)) => with_session_cookie(
                json_response(StatusCode::OK, &identity),
                server_state,
                &token,
            ),
            Err(err) => pack::<LoginRequest>(Err(err)),
        };
    }

    if matches_route!(SignupRequest) {
        let request: SignupRequest = match unpack(&body) {
            Ok(request) => request,
            Err(_) => return error_response::<SignupRequest>(ErrorWrapper::BadRequest),
        };
        return match account_service::signup(server_state, request).await {
            Ok((identity, token)) => with_session_cookie(
                json_response(StatusCode::CREATED, &identity),
                server_state,
                &token,
            ),
            Err(err) => pack::<SignupRequest>(Err(err)),
        };
    }

    if matches_route!(LogoutRequest) {
        account_service::logout(server_state, cookie.as_deref());
        return with_cleared_cookie(json_response(StatusCode::OK, &()));
    }

    if matches_route!(GetMeRequest) {
        return authed_route_handler!(GetMeRequest, account_service::get_me, server_state, cookie, body);
    }
    if matches_route!(ChangeNameRequest) {
        return authed_route_handler!(ChangeNameRequest, account_service::change_name, server_state, cookie, body);
    }
    if matches_route!(ChangePasswordRequest) {
        return authed_route_handler!(ChangePasswordRequest, account_service::change_password, server_state, cookie, body);
    }
    if matches_route!(GetFilesRequest) {
        return authed_route_handler!(GetFilesRequest, file_service::get_files, server_state, cookie, body);
    }
    if matches_route!(GetStorageUsageRequest) {
        return authed_route_handler!(GetStorageUsageRequest, file_service::get_storage_usage, server_state, cookie, body);
    }
    if matches_route!(PresignedUrlRequest) {
        return authed_route_handler!(PresignedUrlRequest, file_service::presigned_url, server_state, cookie, body);
    }
    if matches_route!(UploadFileMetadataRequest) {
        return authed_route_handler!(UploadFileMetadataRequest, file_service::upload_file_metadata, server_state, cookie, body);
    }
    if matches_route!(RenameFileRequest) {
        return authed_route_handler!(RenameFileRequest, file_service::rename_file, server_state, cookie, body);
    }
    if matches_route!(ToggleFavoriteRequest) {
        return authed_route_handler!(ToggleFavoriteRequest, file_service::toggle_favorite, server_state, cookie, body);
    }
    if matches_route!(DeleteFileRequest) {
        return authed_route_handler!(DeleteFileRequest, file_service::delete_file, server_state, cookie, body);
    }
    if matches_route!(CheckoutRequest) {
        return authed_route_handler!(CheckoutRequest, billing::stripe_service::create_checkout, server_state, cookie, body);
    }

    if method == warp::http::Method::POST && path.as_str() == WEBHOOK_ROUTE {
        return match billing::stripe_service::handle_webhook(server_state, body, stripe_sig).await
        {
            Ok(()) => {
                json_response(StatusCode::OK, &serde_json::json!({ "message": "ok" }))
            }
            Err(ClientError(err)) => {
                warn!("Rejected webhook: {:?}", err);
                json_response(
                    StatusCode::BAD_REQUEST,
                    &serde_json::json!({ "message": "Invalid signature" }),
                )
            }
            Err(ServerError::InternalError(err)) => {
                error!("Internal error! Route: {}, Error: {}", WEBHOOK_ROUTE, err);
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &serde_json::json!({ "message": "Internal server error" }),
                )
            }
        };
    }

    warn!("Request matched no endpoints: {} {}", method, path.as_str());
    plain_response(StatusCode::NOT_FOUND)
}

/// Resolve the cookie to a live session and slide its expiry; every
/// authenticated request keeps its session fresh.
fn authenticate(server_state: &ServerState, token: Option<&str>) -> Option<Session> {
    let token = token?;
    let session = server_state.sessions.get(token)?;
    server_state.sessions.touch(token);
    Some(session)
}

fn unpack<TRequest: Request + DeserializeOwned>(body: &Bytes) -> Result<TRequest, serde_json::Error> {
    // bodyless GETs deserialize like an empty object
    if body.is_empty() {
        serde_json::from_slice(b"{}")
    } else {
        serde_json::from_slice(body)
    }
}

fn pack<TRequest: Request>(
    result: Result<TRequest::Response, ServerError<TRequest::Error>>,
) -> HttpResponse {
    match result {
        Ok(response) => json_response(TRequest::SUCCESS, &response),
        Err(ClientError(err)) => {
            let status = err.status();
            json_response(status, &ErrorWrapper::Endpoint(err))
        }
        Err(ServerError::InternalError(err)) => {
            error!("Internal error! Route: {}, Error: {}", TRequest::ROUTE, err);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorWrapper::<TRequest::Error>::InternalError,
            )
        }
    }
}

fn error_response<TRequest: Request>(wrapper: ErrorWrapper<TRequest::Error>) -> HttpResponse {
    json_response(wrapper.status(), &wrapper)
}

fn json_response<S: Serialize>(status: StatusCode, body: &S) -> HttpResponse {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Error serializing response: {:?}", err);
            return plain_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .unwrap_or_else(|_| plain_response(StatusCode::INTERNAL_SERVER_ERROR))
}

fn plain_response(status: StatusCode) -> HttpResponse {
    Response::builder()
        .status(status)
        .body(Body::empty())
        .expect("static response must build")
}

fn with_session_cookie(
    mut response: HttpResponse, server_state: &ServerState, token: &str,
) -> HttpResponse {
    let max_age = server_state.sessions.ttl().as_secs();
    let cookie =
        format!("{SESSION_COOKIE}={token}; Max-Age={max_age}; HttpOnly; SameSite=Strict; Path=/");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

fn with_cleared_cookie(mut response: HttpResponse) -> HttpResponse {
    let cookie = format!("{SESSION_COOKIE}=; Max-Age=0; HttpOnly; SameSite=Strict; Path=/");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
