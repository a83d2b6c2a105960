//! User account routes: registration, login and profile management.
//!
//! ```text
//! POST   /register   public  → 201 | 400 | 409
//! POST   /login      public  → 200 {"Token": ...} | 400 | 401
//! GET    /me         bearer  → 200 {id, username} | 404
//! GET    /{id}       bearer  → 200 {id, username} | 404
//! DELETE /{id}       bearer  → 204 | 403 | 404
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{bearer_token, AuthHandler, CredentialVerifier, UserRecord};
use crate::http::{read_json, response, BodyError};
use crate::routing::{with_state, HandlerResult, Params, Router};

/// Shared state for every user route.
pub struct UsersState {
    pub auth: Arc<AuthHandler>,
    pub max_body_size: usize,
}

/// Login and registration body. Field names are accepted in either case.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsDto {
    #[serde(default, alias = "Username")]
    pub username: Option<String>,
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
}

impl CredentialsDto {
    /// Both fields, if present and non-empty.
    fn into_parts(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

/// Public view of a user record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

/// Build the user router. Every protected route is checked against `auth`.
pub fn router(auth: Arc<AuthHandler>, max_body_size: usize) -> Router {
    let verifier: Arc<dyn CredentialVerifier> = auth.clone();
    let state = Arc::new(UsersState { auth, max_body_size });

    Router::builder("users", verifier)
        .route(Method::POST, "/register", with_state(state.clone(), register), false)
        .route(Method::POST, "/login", with_state(state.clone(), login), false)
        .route(Method::GET, "/me", with_state(state.clone(), me), true)
        .pattern(Method::GET, "/{id}", with_state(state.clone(), get_user), true)
        .pattern(Method::DELETE, "/{id}", with_state(state, delete_user), true)
        .build()
}

/// Read both credential fields, or the response to send instead.
async fn read_credentials(
    state: &UsersState,
    req: Request<Body>,
    invalid: &'static str,
) -> Result<(String, String), Response> {
    match read_json::<CredentialsDto>(req, state.max_body_size).await {
        Ok(dto) => dto
            .into_parts()
            .ok_or_else(|| response::text(StatusCode::BAD_REQUEST, invalid)),
        Err(e @ BodyError::TooLarge { .. }) => {
            tracing::debug!(error = %e, "Credentials body over limit");
            Err(response::text(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected credentials body");
            Err(response::text(StatusCode::BAD_REQUEST, invalid))
        }
    }
}

async fn register(state: Arc<UsersState>, req: Request<Body>, _params: Params) -> HandlerResult {
    let (username, password) =
        match read_credentials(&state, req, "Invalid registration data").await {
            Ok(credentials) => credentials,
            Err(response) => return Ok(response),
        };

    let auth = state.auth.clone();
    let created =
        tokio::task::spawn_blocking(move || auth.register(&username, &password)).await??;

    Ok(if created {
        response::text(StatusCode::CREATED, "User registered successfully")
    } else {
        response::text(StatusCode::CONFLICT, "Failed to create user")
    })
}

async fn login(state: Arc<UsersState>, req: Request<Body>, _params: Params) -> HandlerResult {
    let (username, password) =
        match read_credentials(&state, req, "Invalid authentication data").await {
            Ok(credentials) => credentials,
            Err(response) => return Ok(response),
        };

    let auth = state.auth.clone();
    let token =
        tokio::task::spawn_blocking(move || auth.authenticate(&username, &password)).await??;

    Ok(match token {
        Some(token) => response::json(StatusCode::OK, TokenResponse { token }),
        None => response::text(StatusCode::UNAUTHORIZED, "Authentication failed"),
    })
}

/// The caller's user id, taken from the already-verified bearer token.
fn caller_id(state: &UsersState, req: &Request<Body>) -> Option<Uuid> {
    let token = bearer_token(req.headers())?;
    let subject = state.auth.subject_of(token)?;
    Uuid::parse_str(&subject).ok()
}

fn path_id(params: &Params) -> Option<Uuid> {
    params.get("id").and_then(|id| Uuid::parse_str(id).ok())
}

fn not_found() -> Response {
    response::text(StatusCode::NOT_FOUND, "User not found")
}

async fn me(state: Arc<UsersState>, req: Request<Body>, _params: Params) -> HandlerResult {
    let user = caller_id(&state, &req).and_then(|id| state.auth.store().find_by_id(id));
    Ok(match user {
        Some(user) => response::json(StatusCode::OK, UserProfile::from(user)),
        None => not_found(),
    })
}

async fn get_user(state: Arc<UsersState>, _req: Request<Body>, params: Params) -> HandlerResult {
    let user = path_id(&params).and_then(|id| state.auth.store().find_by_id(id));
    Ok(match user {
        Some(user) => response::json(StatusCode::OK, UserProfile::from(user)),
        None => not_found(),
    })
}

async fn delete_user(state: Arc<UsersState>, req: Request<Body>, params: Params) -> HandlerResult {
    let Some(target) = path_id(&params) else {
        return Ok(not_found());
    };

    if caller_id(&state, &req) != Some(target) {
        tracing::debug!(target_id = %target, "Delete of another user refused");
        return Ok(response::text(StatusCode::FORBIDDEN, "Forbidden"));
    }

    Ok(if state.auth.store().delete(target) {
        tracing::info!(user_id = %target, "User deleted");
        response::empty(StatusCode::NO_CONTENT)
    } else {
        not_found()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryUserStore;
    use crate::config::AuthConfig;
    use axum::http::header;

    fn auth() -> Arc<AuthHandler> {
        let config = AuthConfig {
            secret: "users-router-test-secret".to_string(),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        Arc::new(AuthHandler::new(&config, Arc::new(InMemoryUserStore::new())))
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(router: &Router, req: Request<Body>) -> Response {
        router.route(req, "/users").await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const ALICE: &str = r#"{"username":"alice","password":"wonderland"}"#;

    #[tokio::test]
    async fn test_register_then_conflict() {
        let router = router(auth(), 1024);

        let created = send(&router, request(Method::POST, "/users/register", None, ALICE)).await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let again = send(&router, request(Method::POST, "/users/register", None, ALICE)).await;
        assert_eq!(again.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let router = router(auth(), 1024);
        let bodies = [
            r#"{"username":"bob"}"#,
            r#"{"username":"","password":"x"}"#,
            "not json",
        ];
        for body in bodies {
            let response =
                send(&router, request(Method::POST, "/users/register", None, body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let router = router(auth(), 16);
        let response = send(&router, request(Method::POST, "/users/register", None, ALICE)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = send(&router, request(Method::POST, "/users/login", None, ALICE)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_login_accepts_pascal_case_fields() {
        let router = router(auth(), 1024);
        send(&router, request(Method::POST, "/users/register", None, ALICE)).await;

        let body = r#"{"Username":"alice","Password":"wonderland"}"#;
        let response = send(&router, request(Method::POST, "/users/login", None, body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(json["Token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let router = router(auth(), 1024);
        send(&router, request(Method::POST, "/users/register", None, ALICE)).await;

        let body = r#"{"username":"alice","password":"nope"}"#;
        let response = send(&router, request(Method::POST, "/users/login", None, body)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_and_delete() {
        let auth = auth();
        let router = router(auth.clone(), 1024);
        assert!(auth.register("alice", "wonderland").unwrap());
        assert!(auth.register("bob", "builder").unwrap());
        let token = auth.authenticate("alice", "wonderland").unwrap().unwrap();
        let alice = auth.store().find_by_username("alice").unwrap();
        let bob = auth.store().find_by_username("bob").unwrap();

        let me = send(&router, request(Method::GET, "/users/me", Some(&token), "")).await;
        assert_eq!(me.status(), StatusCode::OK);
        let profile: UserProfile = serde_json::from_str(&body_string(me).await).unwrap();
        assert_eq!(profile, UserProfile::from(alice.clone()));

        let bob_uri = format!("/users/{}", bob.id);
        let alice_uri = format!("/users/{}", alice.id);

        let other = send(&router, request(Method::GET, &bob_uri, Some(&token), "")).await;
        assert_eq!(other.status(), StatusCode::OK);

        let forbidden = send(&router, request(Method::DELETE, &bob_uri, Some(&token), "")).await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let deleted = send(&router, request(Method::DELETE, &alice_uri, Some(&token), "")).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let gone = send(&router, request(Method::GET, &alice_uri, Some(&token), "")).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        let router = router(auth(), 1024);
        let response = send(&router, request(Method::GET, "/users/me", None, "")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&router, request(Method::GET, "/users/me", Some("garbage"), "")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
