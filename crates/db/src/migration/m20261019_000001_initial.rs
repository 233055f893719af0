//! Initial database migration.
//!
//! Creates the enums, the users, currencies and transactions tables, and the
//! `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CURRENCIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('user', 'admin');
CREATE TYPE rate_source AS ENUM ('BOT', 'MANUAL', 'SYSTEM');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id              UUID PRIMARY KEY,
    name            VARCHAR(255) NOT NULL,
    email           VARCHAR(255) NOT NULL,
    role            user_role NOT NULL DEFAULT 'user',
    password_hash   TEXT NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_users_email UNIQUE (email)
);
";

const CURRENCIES_SQL: &str = r"
CREATE TABLE currencies (
    code        VARCHAR(3) PRIMARY KEY,
    name_th     VARCHAR(100) NOT NULL,
    name_en     VARCHAR(100) NOT NULL,
    symbol      VARCHAR(10) NOT NULL,

    CONSTRAINT chk_currency_code CHECK (code ~ '^[A-Z]{3}$')
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id                  SERIAL PRIMARY KEY,
    declaration_number  VARCHAR(100) NOT NULL,
    declaration_date    DATE NOT NULL,
    invoice_number      VARCHAR(100) NOT NULL,
    invoice_date        DATE NOT NULL,
    currency_code       VARCHAR(3) NOT NULL REFERENCES currencies(code) ON UPDATE CASCADE ON DELETE RESTRICT,
    foreign_amount      NUMERIC(18, 4) NOT NULL,
    exchange_rate       NUMERIC(18, 6) NOT NULL,
    thb_amount          NUMERIC(18, 2) NOT NULL,
    rate_date           DATE NOT NULL,
    rate_source         rate_source NOT NULL DEFAULT 'BOT',
    created_by          UUID NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    notes               TEXT,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_thb_rate_is_system CHECK (
        currency_code <> 'THB' OR (exchange_rate = 1 AND rate_source = 'SYSTEM')
    )
);

CREATE INDEX idx_transactions_created_by ON transactions(created_by);
CREATE INDEX idx_transactions_currency_code ON transactions(currency_code);
CREATE INDEX idx_transactions_declaration_date ON transactions(declaration_date);
CREATE INDEX idx_transactions_created_at ON transactions(created_at DESC, id DESC);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_transactions_updated_at
    BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS currencies;
DROP TABLE IF EXISTS users;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS rate_source;
DROP TYPE IF EXISTS user_role;
";
