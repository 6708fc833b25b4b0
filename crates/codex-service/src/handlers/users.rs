//! User sync and admin handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use codex_core::{ProgressionEvent, Role, User, UserId};
use codex_store::Store;

use crate::auth::{require_admin, AuthUser};
use crate::error::ApiError;
use crate::progression::MutationResponse;
use crate::state::AppState;

/// One user in a response.
#[derive(Debug, Serialize)]
pub struct UserDto {
    /// User id.
    pub id: String,
    /// Display handle.
    pub handle: String,
    /// Access role.
    pub role: String,
    /// First-seen timestamp (RFC 3339).
    pub created_at: String,
    /// Last-seen timestamp (RFC 3339).
    pub last_seen_at: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            handle: user.handle.clone(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
            last_seen_at: user.last_seen_at.to_rfc3339(),
        }
    }
}

/// Session sync request.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// Display handle from the identity provider, when available.
    pub handle: Option<String>,
}

/// Session sync response.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// Whether the sync succeeded.
    pub success: bool,
    /// The stored user.
    pub user: UserDto,
    /// Whether this sync created the user.
    pub created: bool,
}

/// Upsert the logged-in user from the session.
///
/// Creates the user with the default role on first login and refreshes
/// `last_seen_at` (and the handle, when supplied) on every later login.
pub async fn sync_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let handle = body
        .handle
        .as_deref()
        .map(str::trim)
        .filter(|handle| !handle.is_empty());

    let (user, created) = match state.store.get_user(&auth.user_id)? {
        Some(mut user) => {
            user.last_seen_at = chrono::Utc::now();
            if let Some(handle) = handle {
                user.handle = handle.to_string();
            }
            (user, false)
        }
        None => {
            let handle = handle
                .map(ToString::to_string)
                .unwrap_or_else(|| default_handle(&auth.user_id));
            (User::new(auth.user_id, handle), true)
        }
    };

    state.store.put_user(&user)?;

    if created {
        tracing::info!(user_id = %user.id, handle = %user.handle, "User created on first sync");
    }

    Ok(Json(SyncResponse {
        success: true,
        user: UserDto::from(&user),
        created,
    }))
}

/// User listing response (admin).
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    /// Whether the caller was allowed to list users.
    pub success: bool,
    /// All users with their roles. Empty when the caller is not an admin.
    pub users: Vec<UserDto>,
}

/// List all users with their roles (admin only).
///
/// A non-admin caller receives 403 with an empty user list, never a
/// partial one.
pub async fn list_users(State(state): State<Arc<AppState>>, auth: AuthUser) -> Response {
    if let Err(err) = require_admin(&state, &auth) {
        return match err {
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(ListUsersResponse {
                    success: false,
                    users: Vec::new(),
                }),
            )
                .into_response(),
            other => other.into_response(),
        };
    }

    match state.store.list_users() {
        Ok(users) => {
            let users = users.iter().map(UserDto::from).collect();
            Json(ListUsersResponse {
                success: true,
                users,
            })
            .into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Role change request (admin).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    /// Target user id.
    pub user_id: Option<String>,
    /// New role (`user` or `admin`).
    pub role: Option<String>,
}

/// Role change response.
#[derive(Debug, Serialize)]
pub struct SetRoleResponse {
    /// Whether the role was changed.
    pub success: bool,
    /// The updated user.
    pub user: UserDto,
}

/// Change a user's role (admin only).
pub async fn set_role(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<SetRoleResponse>, ApiError> {
    let admin = require_admin(&state, &auth)?;

    let user_id: UserId = body
        .user_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing userId".into()))?
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid userId".into()))?;
    let role: Role = body
        .role
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing role".into()))?
        .parse()?;

    let mut user = state
        .store
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {user_id}")))?;

    user.role = role;
    state.store.put_user(&user)?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user.id,
        role = %role,
        "User role changed"
    );

    Ok(Json(SetRoleResponse {
        success: true,
        user: UserDto::from(&user),
    }))
}

/// Admin wallet grant request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    /// Target user id.
    pub user_id: Option<String>,
    /// Coins to credit (default: 0).
    pub coins: Option<i64>,
    /// Diamonds to credit (default: 0).
    pub diamonds: Option<i64>,
    /// Reason recorded as the ledger row's reference id.
    pub reason: Option<String>,
}

/// Credit coins/diamonds to a user's wallet (admin only).
pub async fn admin_grant(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<GrantRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let admin = require_admin(&state, &auth)?;

    let user_id: UserId = body
        .user_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing userId".into()))?
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid userId".into()))?;
    let coins = body.coins.unwrap_or(0);
    let diamonds = body.diamonds.unwrap_or(0);
    if coins < 0 || diamonds < 0 {
        return Err(ApiError::BadRequest("grants must be non-negative".into()));
    }
    if coins == 0 && diamonds == 0 {
        return Err(ApiError::BadRequest("nothing to grant".into()));
    }

    let event = ProgressionEvent::admin_grant(user_id, coins, diamonds, body.reason);
    let (progression, wallet) = state.store.apply_event(&event)?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user_id,
        coins = %coins,
        diamonds = %diamonds,
        "Wallet grant applied"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// Fallback handle for users whose provider profile carries none.
fn default_handle(user_id: &UserId) -> String {
    let id = user_id.to_string();
    format!("player-{}", &id[..8])
}
