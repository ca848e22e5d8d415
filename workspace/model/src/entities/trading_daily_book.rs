use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account;

/// The overall outcome of a trading day.
/// Stored and serialized as the display strings shown in the UI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TradingResult {
    #[sea_orm(string_value = "Loss Overall")]
    #[serde(rename = "Loss Overall")]
    LossOverall,
    #[sea_orm(string_value = "Profit Overall")]
    #[serde(rename = "Profit Overall")]
    ProfitOverall,
    #[sea_orm(string_value = "Liquidated")]
    #[serde(rename = "Liquidated")]
    Liquidated,
    #[sea_orm(string_value = "Breakeven")]
    #[serde(rename = "Breakeven")]
    Breakeven,
    #[sea_orm(string_value = "No Trade")]
    #[serde(rename = "No Trade")]
    NoTrade,
    #[sea_orm(string_value = "No Result")]
    #[serde(rename = "No Result")]
    NoResult,
}

impl Default for TradingResult {
    fn default() -> Self {
        Self::NoResult
    }
}

/// Represents one day's realized result for one account.
///
/// `starting_balance` is stamped from the account's balance when the entry is
/// created and is never taken from the client. Writing an entry's
/// `ending_balance` overwrites the account's stored balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trading_daily_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: NaiveDate,
    pub starting_balance: f64,
    pub ending_balance: f64,
    /// Mood or market read for the day, free text.
    pub sentiment: Option<String>,
    pub withdraw: f64,
    pub summary: Option<String>,
    pub result: TradingResult,
    pub remarks: Option<String>,
    /// The account this entry settles against.
    pub account_id: i32,
    /// The user who owns this entry.
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
