//! User repository for database operations.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use thbfx_core::auth::Role;
use tracing::info;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, transactions, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found")]
    NotFound,

    /// Email already registered.
    #[error("Email is already in use")]
    EmailTaken,

    /// User still owns records.
    #[error("User owns {0} transaction(s) and cannot be deleted")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Partial update of a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New role.
    pub role: Option<Role>,
}

/// A user with the number of transactions they created.
#[derive(Debug, Clone)]
pub struct UserWithTransactionCount {
    /// The user.
    pub user: users::Model,
    /// Transactions created by the user.
    pub transaction_count: u64,
}

fn map_unique(err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::EmailTaken,
        _ => UserError::Database(err),
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` on a duplicate email.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<users::Model, UserError> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            role: Set(role.into()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = user.insert(&self.db).await.map_err(map_unique)?;
        info!(user_id = %user.id, role = %role, "User created");
        Ok(user)
    }

    /// Lists users, newest first, with their transaction counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_with_transaction_counts(
        &self,
    ) -> Result<Vec<UserWithTransactionCount>, DbErr> {
        let users = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let counts: HashMap<Uuid, i64> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::CreatedBy)
            .column_as(transactions::Column::Id.count(), "count")
            .group_by(transactions::Column::CreatedBy)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let transaction_count = counts
                    .get(&user.id)
                    .map_or(0, |&n| u64::try_from(n).unwrap_or(0));
                UserWithTransactionCount {
                    user,
                    transaction_count,
                }
            })
            .collect())
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist and
    /// `UserError::EmailTaken` if the new email belongs to someone else.
    pub async fn update(&self, id: Uuid, update: UserUpdate) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(role) = update.role {
            active.role = Set(UserRole::from(role));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let user = active.update(&self.db).await.map_err(map_unique)?;
        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Counts transactions created by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_transactions(&self, id: Uuid) -> Result<u64, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::CreatedBy.eq(id))
            .count(&self.db)
            .await
    }

    /// Deletes a user who owns no transactions.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist and
    /// `UserError::HasTransactions` if they still own records.
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound);
        }

        let owned = self.count_transactions(id).await?;
        if owned > 0 {
            return Err(UserError::HasTransactions(owned));
        }

        // A record created since the count still trips the foreign key.
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => UserError::HasTransactions(1),
                _ => UserError::Database(err),
            })?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound);
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
