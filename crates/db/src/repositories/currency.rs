//! Currency reference data.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};

use crate::entities::currencies;

/// A row of seed data for the currencies table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencySeed {
    /// ISO code.
    pub code: &'static str,
    /// Thai display name.
    pub name_th: &'static str,
    /// English display name.
    pub name_en: &'static str,
    /// Symbol.
    pub symbol: &'static str,
}

/// Currencies installed by the seeder.
pub const DEFAULT_CURRENCIES: [CurrencySeed; 7] = [
    CurrencySeed { code: "CNY", name_th: "จีน : หยวน เรนมินบิ", name_en: "CHINA : YUAN RENMINBI", symbol: "¥" },
    CurrencySeed { code: "USD", name_th: "สหรัฐอเมริกา : ดอลลาร์", name_en: "USA : US DOLLAR", symbol: "$" },
    CurrencySeed { code: "THB", name_th: "ไทย : บาท", name_en: "THAILAND : BAHT", symbol: "฿" },
    CurrencySeed { code: "EUR", name_th: "ยูโรโซน : ยูโร", name_en: "EUROZONE : EURO", symbol: "€" },
    CurrencySeed { code: "JPY", name_th: "ญี่ปุ่น : เยน", name_en: "JAPAN : YEN", symbol: "¥" },
    CurrencySeed { code: "GBP", name_th: "อังกฤษ : ปอนด์", name_en: "GREAT BRITAIN : POUND", symbol: "£" },
    CurrencySeed { code: "KRW", name_th: "เกาหลีใต้ : วอน", name_en: "SOUTH KOREA : WON", symbol: "₩" },
];

/// Currency repository. Read-only at runtime apart from seeding.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all currencies ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<currencies::Model>, DbErr> {
        currencies::Entity::find()
            .order_by_asc(currencies::Column::Code)
            .all(&self.db)
            .await
    }

    /// Returns all known codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn codes(&self) -> Result<Vec<String>, DbErr> {
        currencies::Entity::find()
            .select_only()
            .column(currencies::Column::Code)
            .order_by_asc(currencies::Column::Code)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Finds a currency by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<currencies::Model>, DbErr> {
        currencies::Entity::find()
            .filter(currencies::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Inserts or refreshes the given currencies.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn upsert(&self, seeds: &[CurrencySeed]) -> Result<(), DbErr> {
        if seeds.is_empty() {
            return Ok(());
        }

        let rows = seeds.iter().map(|seed| currencies::ActiveModel {
            code: Set(seed.code.to_string()),
            name_th: Set(seed.name_th.to_string()),
            name_en: Set(seed.name_en.to_string()),
            symbol: Set(seed.symbol.to_string()),
        });

        currencies::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::column(currencies::Column::Code)
                    .update_columns([
                        currencies::Column::NameTh,
                        currencies::Column::NameEn,
                        currencies::Column::Symbol,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_currencies() {
        let codes: Vec<&str> = DEFAULT_CURRENCIES.iter().map(|c| c.code).collect();
        assert_eq!(codes, ["CNY", "USD", "THB", "EUR", "JPY", "GBP", "KRW"]);
        assert!(
            DEFAULT_CURRENCIES
                .iter()
                .all(|c| c.code.len() == 3 && c.code.bytes().all(|b| b.is_ascii_uppercase()))
        );
    }
}
