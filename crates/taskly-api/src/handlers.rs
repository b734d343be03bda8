use axum::Json;
use taskly_auth::{hash_password, placeholder_hash, verify_password, JwtError, PasswordError};
use taskly_store::{NewUser, StoreError, User, UserFilter};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::*;
use crate::AppState;

/// Message returned for every failed sign-in, whatever the cause
pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";

/// A user together with a freshly issued session token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl From<AuthSession> for AuthUser {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => ApiError::EmailAlreadyRegistered,
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            ApiError::Store(_) | ApiError::Token(_) | ApiError::Password(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the cause stays server-side
    pub fn is_internal(&self) -> bool {
        self.code() == "INTERNAL_ERROR"
    }
}

/// Register a new user and sign them in
pub async fn sign_up(state: &AppState, input: SignUpInput) -> Result<AuthSession, ApiError> {
    debug!("Sign-up attempt");

    let existing = state
        .store
        .find_one(&UserFilter::Email(input.email.clone()))
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::from(e)
        })?;
    if existing.is_some() {
        debug!("Sign-up rejected: email already registered");
        return Err(ApiError::EmailAlreadyRegistered);
    }

    let password_hash = hash_password(&input.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::from(e)
    })?;

    let new_user =
        NewUser::new(input.name, input.email, password_hash).with_avatar(input.avatar);
    let user = state.store.insert_one(new_user).await.map_err(|e| {
        if !matches!(e, StoreError::DuplicateEmail(_)) {
            error!("Failed to insert user: {}", e);
        }
        ApiError::from(e)
    })?;

    let token = issue_token(state, &user)?;
    info!("Registered user {}", user.id);

    Ok(AuthSession { user, token })
}

/// Check credentials and issue a session token
///
/// An unknown email and a wrong password fail identically.
pub async fn sign_in(state: &AppState, input: SignInInput) -> Result<AuthSession, ApiError> {
    let user = state
        .store
        .find_one(&UserFilter::Email(input.email))
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::from(e)
        })?;

    let verified = match user {
        Some(user) => verify_password(&input.password, &user.password_hash).then_some(user),
        None => {
            // Same Argon2 cost as a wrong password
            verify_password(&input.password, placeholder_hash());
            None
        }
    };
    let Some(user) = verified else {
        debug!("Sign-in rejected");
        return Err(ApiError::InvalidCredentials);
    };

    let token = issue_token(state, &user)?;
    info!("User {} signed in", user.id);

    Ok(AuthSession { user, token })
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    state.codec.issue(&user.id).map_err(|e| {
        error!("Failed to issue session token for {}: {}", user.id, e);
        ApiError::from(e)
    })
}

/// Task lists of the current user; nothing is persisted yet
pub async fn my_task_lists(_user: Option<&User>) -> Vec<TaskList> {
    Vec::new()
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
