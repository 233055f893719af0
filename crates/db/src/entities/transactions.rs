//! `SeaORM` Entity for transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RateSource;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub declaration_number: String,
    pub declaration_date: Date,
    pub invoice_number: String,
    pub invoice_date: Date,
    pub currency_code: String,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub foreign_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub exchange_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub thb_amount: Decimal,
    pub rate_date: Date,
    pub rate_source: RateSource,
    pub created_by: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyCode",
        to = "super::currencies::Column::Code",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Currencies,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::currencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currencies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
