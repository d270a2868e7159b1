use ringpass_domain::id::UserId;
use ringpass_domain::pagination::PageRequest;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserPage};
use crate::error::AuthServiceError;

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, id: UserId) -> Result<User, AuthServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersInput {
    pub search: String,
    pub page: PageRequest,
}

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, input: ListUsersInput) -> Result<UserPage, AuthServiceError> {
        self.users
            .list(&input.search, input.page.offset(), input.page.limit())
            .await
    }
}
