//! Transaction repository: storage for declaration/invoice currency records.

use std::collections::HashMap;

use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use thbfx_core::transaction::{NormalizedTransaction, TransactionQuery};
use tracing::info;
use uuid::Uuid;

use crate::entities::{currencies, transactions, users};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction {0} not found")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A transaction with its creator and currency.
#[derive(Debug, Clone)]
pub struct TransactionWithRelations {
    /// The record.
    pub transaction: transactions::Model,
    /// Creator, if still present.
    pub user: Option<users::Model>,
    /// Currency reference row.
    pub currency: Option<currencies::Model>,
}

/// Escapes `%`, `_` and `\` so user text matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn apply_filters(
    mut select: Select<transactions::Entity>,
    query: &TransactionQuery,
) -> Select<transactions::Entity> {
    if let Some(owner) = query.owner() {
        select = select.filter(transactions::Column::CreatedBy.eq(owner.into_inner()));
    }

    if let Some(search) = query.search() {
        let pattern = like_pattern(search);
        let contains = |column: transactions::Column| {
            Expr::expr(Func::lower(Expr::col((transactions::Entity, column))))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };
        select = select.filter(
            Condition::any()
                .add(contains(transactions::Column::DeclarationNumber))
                .add(contains(transactions::Column::InvoiceNumber)),
        );
    }

    if let Some(currency) = query.currency() {
        select = select.filter(transactions::Column::CurrencyCode.eq(currency));
    }
    if let Some(from) = query.date_from() {
        select = select.filter(transactions::Column::DeclarationDate.gte(from));
    }
    if let Some(to) = query.date_to() {
        select = select.filter(transactions::Column::DeclarationDate.lte(to));
    }

    select
}

fn active_from(record: &NormalizedTransaction) -> transactions::ActiveModel {
    transactions::ActiveModel {
        declaration_number: Set(record.declaration_number.clone()),
        declaration_date: Set(record.declaration_date),
        invoice_number: Set(record.invoice_number.clone()),
        invoice_date: Set(record.invoice_date),
        currency_code: Set(record.currency_code.clone()),
        foreign_amount: Set(record.foreign_amount),
        exchange_rate: Set(record.exchange_rate),
        thb_amount: Set(record.thb_amount),
        rate_date: Set(record.rate_date),
        rate_source: Set(record.rate_source.into()),
        notes: Set(record.notes.clone()),
        ..Default::default()
    }
}

/// Transaction repository for CRUD and listing.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a transaction by ID with its creator and currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_relations(
        &self,
        id: i32,
    ) -> Result<Option<TransactionWithRelations>, DbErr> {
        let Some((transaction, user)) = transactions::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let currency = currencies::Entity::find_by_id(transaction.currency_code.clone())
            .one(&self.db)
            .await?;

        Ok(Some(TransactionWithRelations {
            transaction,
            user,
            currency,
        }))
    }

    /// Lists transactions matching `query`, newest first, and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        query: &TransactionQuery,
    ) -> Result<(Vec<TransactionWithRelations>, u64), DbErr> {
        let total = apply_filters(transactions::Entity::find(), query)
            .count(&self.db)
            .await?;

        let page = query.page();
        let rows = apply_filters(transactions::Entity::find(), query)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;

        let mut codes: Vec<String> = rows
            .iter()
            .map(|(t, _)| t.currency_code.clone())
            .collect();
        codes.sort_unstable();
        codes.dedup();

        let currencies: HashMap<String, currencies::Model> = if codes.is_empty() {
            HashMap::new()
        } else {
            currencies::Entity::find()
                .filter(currencies::Column::Code.is_in(codes))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.code.clone(), c))
                .collect()
        };

        let items = rows
            .into_iter()
            .map(|(transaction, user)| {
                let currency = currencies.get(&transaction.currency_code).cloned();
                TransactionWithRelations {
                    transaction,
                    user,
                    currency,
                }
            })
            .collect();

        Ok((items, total))
    }

    /// Stores a new transaction owned by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        record: &NormalizedTransaction,
        created_by: Uuid,
    ) -> Result<transactions::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let mut active = active_from(record);
        active.created_by = Set(created_by);
        active.created_at = Set(now);
        active.updated_at = Set(now);

        let created = active.insert(&self.db).await?;
        info!(
            transaction_id = created.id,
            user_id = %created_by,
            currency = %created.currency_code,
            thb_amount = %created.thb_amount,
            "Transaction created"
        );
        Ok(created)
    }

    /// Replaces every editable field of a transaction.
    ///
    /// `created_by` and `created_at` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the row is gone.
    pub async fn update(
        &self,
        id: i32,
        record: &NormalizedTransaction,
    ) -> Result<transactions::Model, TransactionError> {
        let mut active = active_from(record);
        active.id = sea_orm::ActiveValue::Unchanged(id);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => TransactionError::NotFound(id),
            other => TransactionError::Database(other),
        })?;

        info!(
            transaction_id = id,
            thb_amount = %updated.thb_amount,
            "Transaction updated"
        );
        Ok(updated)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if no row was deleted.
    pub async fn delete(&self, id: i32) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(id));
        }

        info!(transaction_id = id, "Transaction deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("INV-001"), "%inv-001%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
