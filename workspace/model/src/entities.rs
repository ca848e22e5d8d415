//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the trading-journal application here.

pub mod account;
pub mod trading_daily_book;
pub mod trading_plan;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::trading_daily_book::Entity as TradingDailyBook;
    pub use super::trading_plan::Entity as TradingPlan;
    pub use super::user::Entity as User;
}
