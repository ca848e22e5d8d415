use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

/// Represents one day's trading intention: how much to risk, the lot sizing
/// that follows from it, and whether the plan was carried out.
///
/// Plans are purely a planning record; they do not reference an account.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trading_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Day label, e.g. "Monday" or "Day 3".
    pub day: String,
    /// Balance snapshot the sizing below was computed against.
    pub account_balance: f64,
    pub daily_target: f64,
    pub required_lots: f64,
    pub rounded_lots: f64,
    /// Risk in account currency.
    pub risk_amount: f64,
    /// Risk as a percentage of the balance snapshot.
    pub risk_percentage: f64,
    pub sl_pips: f64,
    pub tp_pips: f64,
    /// false = pending, true = done.
    #[sea_orm(default_value = "false")]
    pub status: bool,
    pub reason: Option<String>,
    pub plan_date: NaiveDate,
    /// The user who owns this plan.
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
