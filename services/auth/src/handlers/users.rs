use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use ringpass_auth_types::bearer::BearerIdentity;
use ringpass_domain::id::UserId;
use ringpass_domain::pagination::PageRequest;

use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::user::{GetUserUseCase, ListUsersInput, ListUsersUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub phone: String,
    #[serde(serialize_with = "ringpass_core::serde::to_rfc3339_ms")]
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            phone: u.phone,
            registered_at: u.registered_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub data: Vec<UserResponse>,
}

// ── Query params ─────────────────────────────────────────────────────────────

/// Raw strings so malformed numbers fall back to defaults instead of a 400.
#[derive(Deserialize, Default)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>, AuthServiceError> {
    let page = PageRequest::from_query(query.page.as_deref(), query.size.as_deref());
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let result = usecase
        .execute(ListUsersInput {
            search: query.search.unwrap_or_default(),
            page,
        })
        .await?;
    Ok(Json(UserListResponse {
        total: result.total,
        page: page.page,
        size: page.size,
        data: result.items.into_iter().map(UserResponse::from).collect(),
    }))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AuthServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    _identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AuthServiceError> {
    let id: UserId = id.parse().map_err(|_| AuthServiceError::InvalidRequest)?;
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(id).await?;
    Ok(Json(user.into()))
}
