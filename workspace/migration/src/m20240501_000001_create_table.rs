use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(boolean(Users::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Name))
                    .col(string(Accounts::Purpose))
                    .col(string(Accounts::Broker))
                    .col(double(Accounts::Balance))
                    .col(integer(Accounts::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_owner")
                            .from(Accounts::Table, Accounts::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trading_plans table
        manager
            .create_table(
                Table::create()
                    .table(TradingPlans::Table)
                    .if_not_exists()
                    .col(pk_auto(TradingPlans::Id))
                    .col(string(TradingPlans::Day))
                    .col(double(TradingPlans::AccountBalance))
                    .col(double(TradingPlans::DailyTarget))
                    .col(double(TradingPlans::RequiredLots))
                    .col(double(TradingPlans::RoundedLots))
                    .col(double(TradingPlans::RiskAmount))
                    .col(double(TradingPlans::RiskPercentage))
                    .col(double(TradingPlans::SlPips))
                    .col(double(TradingPlans::TpPips))
                    .col(boolean(TradingPlans::Status).default(false))
                    .col(string_null(TradingPlans::Reason))
                    .col(date(TradingPlans::PlanDate))
                    .col(integer(TradingPlans::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trading_plan_owner")
                            .from(TradingPlans::Table, TradingPlans::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trading_daily_books table
        manager
            .create_table(
                Table::create()
                    .table(TradingDailyBooks::Table)
                    .if_not_exists()
                    .col(pk_auto(TradingDailyBooks::Id))
                    .col(date(TradingDailyBooks::Date))
                    .col(double(TradingDailyBooks::StartingBalance))
                    .col(double(TradingDailyBooks::EndingBalance))
                    .col(string_null(TradingDailyBooks::Sentiment))
                    .col(double(TradingDailyBooks::Withdraw).default(0.0))
                    .col(string_null(TradingDailyBooks::Summary))
                    .col(string(TradingDailyBooks::Result).default("No Result"))
                    .col(string_null(TradingDailyBooks::Remarks))
                    .col(integer(TradingDailyBooks::AccountId))
                    .col(integer(TradingDailyBooks::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trading_daily_book_account")
                            .from(TradingDailyBooks::Table, TradingDailyBooks::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trading_daily_book_owner")
                            .from(TradingDailyBooks::Table, TradingDailyBooks::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(TradingDailyBooks::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TradingPlans::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsActive,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    Purpose,
    Broker,
    Balance,
    OwnerId,
}

#[derive(DeriveIden)]
enum TradingPlans {
    Table,
    Id,
    Day,
    AccountBalance,
    DailyTarget,
    RequiredLots,
    RoundedLots,
    RiskAmount,
    RiskPercentage,
    SlPips,
    TpPips,
    Status,
    Reason,
    PlanDate,
    OwnerId,
}

#[derive(DeriveIden)]
enum TradingDailyBooks {
    Table,
    Id,
    Date,
    StartingBalance,
    EndingBalance,
    Sentiment,
    Withdraw,
    Summary,
    Result,
    Remarks,
    AccountId,
    OwnerId,
}
