use super::user;
use sea_orm::entity::prelude::*;

/// Represents a brokerage account, e.g. a prop-firm challenge account or a
/// live account at a retail broker.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// What the account is used for, free text.
    pub purpose: String,
    /// The broker or prop firm holding the account, free text.
    pub broker: String,
    /// Mirrors the `ending_balance` of the most recently written daily book
    /// entry for this account, or the initial deposit while no entries exist.
    pub balance: f64,
    /// The user who owns this account.
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An account belongs to one owner.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Daily book entries are removed together with their account.
    #[sea_orm(has_many = "super::trading_daily_book::Entity")]
    TradingDailyBook,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::trading_daily_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TradingDailyBook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
