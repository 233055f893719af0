//! `SeaORM` active enums for Postgres enum types, and their mapping to the
//! domain enums in `thbfx-core`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thbfx_core::auth::Role;
use thbfx_core::currency::RateSource as DomainRateSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "rate_source")]
#[serde(rename_all = "UPPERCASE")]
pub enum RateSource {
    #[sea_orm(string_value = "BOT")]
    Bot,
    #[sea_orm(string_value = "MANUAL")]
    Manual,
    #[sea_orm(string_value = "SYSTEM")]
    System,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::StandardUser => Self::User,
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::StandardUser,
        }
    }
}

impl From<DomainRateSource> for RateSource {
    fn from(source: DomainRateSource) -> Self {
        match source {
            DomainRateSource::Bot => Self::Bot,
            DomainRateSource::Manual => Self::Manual,
            DomainRateSource::System => Self::System,
        }
    }
}

impl From<RateSource> for DomainRateSource {
    fn from(source: RateSource) -> Self {
        match source {
            RateSource::Bot => Self::Bot,
            RateSource::Manual => Self::Manual,
            RateSource::System => Self::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        assert_eq!(UserRole::from(Role::Admin), UserRole::Admin);
        assert_eq!(Role::from(UserRole::User), Role::StandardUser);
    }

    #[test]
    fn test_rate_source_mapping() {
        for source in [DomainRateSource::Bot, DomainRateSource::Manual, DomainRateSource::System] {
            assert_eq!(DomainRateSource::from(RateSource::from(source)), source);
        }
    }
}
