use std::time::Duration;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use ringpass_auth_schema::users;
use ringpass_domain::id::UserId;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserPage};
use crate::error::AuthServiceError;
use crate::infra::bounded;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
    pub deadline: Duration,
}

fn to_user(m: users::Model) -> User {
    User {
        id: UserId(m.id),
        phone: m.phone,
        registered_at: m.registered_at,
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AuthServiceError> {
        let model = bounded(
            self.deadline,
            "find user by phone",
            users::Entity::find()
                .filter(users::Column::Phone.eq(phone))
                .one(&self.db),
        )
        .await?
        .context("find user by phone")?;
        Ok(model.map(to_user))
    }

    async fn create(&self, phone: &str) -> Result<User, AuthServiceError> {
        // id and registered_at come from column defaults via RETURNING.
        let model = users::ActiveModel {
            phone: Set(phone.to_owned()),
            ..Default::default()
        };
        match bounded(self.deadline, "create user", model.insert(&self.db)).await? {
            Ok(m) => Ok(to_user(m)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthServiceError::PhoneTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError> {
        let model = bounded(
            self.deadline,
            "find user by id",
            users::Entity::find_by_id(id.as_i64()).one(&self.db),
        )
        .await?
        .context("find user by id")?;
        Ok(model.map(to_user))
    }

    async fn list(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> Result<UserPage, AuthServiceError> {
        let mut query = users::Entity::find();
        if !search.is_empty() {
            query = query.filter(users::Column::Phone.contains(search));
        }

        let total = bounded(self.deadline, "count users", query.clone().count(&self.db))
            .await?
            .context("count users")?;

        let models = bounded(
            self.deadline,
            "list users",
            query
                .order_by_asc(users::Column::Id)
                .offset(offset)
                .limit(limit)
                .all(&self.db),
        )
        .await?
        .context("list users")?;

        Ok(UserPage {
            items: models.into_iter().map(to_user).collect(),
            total,
        })
    }
}
