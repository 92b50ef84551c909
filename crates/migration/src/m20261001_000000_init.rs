//! Initial schema.
//!
//! - `wallets`: places that hold money, with a cached balance
//! - `wallet_balances`: append-only ledger of balance changes per wallet
//! - `contacts` and `telephones`: people and companies money moves to or from
//! - `movement_classes`: income and expense classes with an optional budget

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    Name,
    WalletType,
    Bank,
    Agency,
    Account,
    Description,
    Balance,
    Active,
    Version,
}

#[derive(Iden)]
enum WalletBalances {
    Table,
    Id,
    WalletId,
    OldBalance,
    ActualBalance,
    MovementValue,
    BalanceType,
    Reason,
    Observations,
    CreatedAt,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    Name,
    Email,
    Document,
    ContactType,
    Description,
    Active,
}

#[derive(Iden)]
enum Telephones {
    Table,
    Id,
    ContactId,
    Number,
    TelephoneType,
}

#[derive(Iden)]
enum MovementClasses {
    Table,
    Id,
    Name,
    ClassType,
    Budget,
    Description,
    Active,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wallets::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Wallets::Name).string().not_null())
                    .col(ColumnDef::new(Wallets::WalletType).string().not_null())
                    .col(ColumnDef::new(Wallets::Bank).string())
                    .col(ColumnDef::new(Wallets::Agency).string())
                    .col(ColumnDef::new(Wallets::Account).string())
                    .col(ColumnDef::new(Wallets::Description).string())
                    .col(ColumnDef::new(Wallets::Balance).big_integer().not_null())
                    .col(
                        ColumnDef::new(Wallets::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Wallets::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Wallet ledger
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WalletBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletBalances::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WalletBalances::WalletId).blob().not_null())
                    .col(
                        ColumnDef::new(WalletBalances::OldBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletBalances::ActualBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletBalances::MovementValue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletBalances::BalanceType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WalletBalances::Reason).string().not_null())
                    .col(ColumnDef::new(WalletBalances::Observations).string())
                    .col(
                        ColumnDef::new(WalletBalances::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallet_balances-wallet_id")
                            .from(WalletBalances::Table, WalletBalances::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallet_balances-wallet_id-created_at")
                    .table(WalletBalances::Table)
                    .col(WalletBalances::WalletId)
                    .col(WalletBalances::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Contacts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Contacts::Name).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string())
                    .col(ColumnDef::new(Contacts::Document).string())
                    .col(ColumnDef::new(Contacts::ContactType).string().not_null())
                    .col(ColumnDef::new(Contacts::Description).string())
                    .col(
                        ColumnDef::new(Contacts::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Telephones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Telephones::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Telephones::ContactId).blob().not_null())
                    .col(ColumnDef::new(Telephones::Number).string().not_null())
                    .col(
                        ColumnDef::new(Telephones::TelephoneType)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-telephones-contact_id")
                            .from(Telephones::Table, Telephones::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-telephones-contact_id")
                    .table(Telephones::Table)
                    .col(Telephones::ContactId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Movement classes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MovementClasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovementClasses::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MovementClasses::Name).string().not_null())
                    .col(
                        ColumnDef::new(MovementClasses::ClassType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MovementClasses::Budget).big_integer())
                    .col(ColumnDef::new(MovementClasses::Description).string())
                    .col(
                        ColumnDef::new(MovementClasses::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ledger and telephones reference their parents: drop them first.
        manager
            .drop_table(Table::drop().table(MovementClasses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Telephones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WalletBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        Ok(())
    }
}
