pub mod accounts;
pub mod auth;
pub mod health;
pub mod trading_daily_books;
pub mod trading_plans;
pub mod users;
