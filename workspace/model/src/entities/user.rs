use sea_orm::entity::prelude::*;

/// Represents a registered user of the journal.
/// All other rows hang off this one through their owner column.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    /// Deactivated users keep their rows but can no longer authenticate.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user can own multiple accounts, plans, and daily book entries.
    #[sea_orm(has_many = "super::account::Entity")]
    Account,
    #[sea_orm(has_many = "super::trading_plan::Entity")]
    TradingPlan,
    #[sea_orm(has_many = "super::trading_daily_book::Entity")]
    TradingDailyBook,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::trading_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TradingPlan.def()
    }
}

impl Related<super::trading_daily_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TradingDailyBook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
