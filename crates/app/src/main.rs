use clap::Parser;
use engine::{Contact, Engine, EntryType, Money, MovementClass, Wallet, WalletBalance};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;

use cli::{
    Cli, Command, ContactCommand, FilterArgs, MovementClassCommand, WalletCommand,
    WalletUpdateArgs,
};

mod cli;
mod settings;

type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "webbudget={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database_url());
    let engine = connect(&url).await?;

    run(&engine, cli.command, cli.json).await
}

async fn connect(url: &str) -> AppResult<Engine> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::debug!("database ready at {url}");

    Ok(Engine::builder().database(database).build().await?)
}

async fn run(engine: &Engine, command: Command, json: bool) -> AppResult<()> {
    match command {
        Command::Wallet(wallet) => run_wallet(engine, wallet.command, json).await,
        Command::Contact(contact) => run_contact(engine, contact.command, json).await,
        Command::MovementClass(class) => run_movement_class(engine, class.command, json).await,
        Command::EntryTypes => emit(json, &EntryType::ALL, |types| {
            types
                .iter()
                .map(|kind| format!("{:<14}{}", kind.as_str(), kind.label_key()))
                .collect::<Vec<_>>()
                .join("\n")
        }),
    }
}

async fn run_wallet(engine: &Engine, command: WalletCommand, json: bool) -> AppResult<()> {
    match command {
        WalletCommand::Create(args) => {
            let mut wallet = Wallet::new(args.name, args.wallet_type, args.balance.cents());
            wallet.bank = args.bank;
            wallet.agency = args.agency;
            wallet.account = args.account;
            wallet.description = args.description;

            let wallet = engine.save_wallet(wallet).await?;
            emit(json, &wallet, wallet_line)
        }
        WalletCommand::List(FilterArgs { filter, active }) => {
            let wallets = engine.find_wallets(filter.as_deref(), active).await?;
            emit(json, &wallets, |wallets| lines(wallets, wallet_line))
        }
        WalletCommand::Show(args) => {
            let wallet = engine
                .wallet(args.id)
                .await?
                .ok_or_else(|| format!("wallet {} not found", args.id))?;
            emit(json, &wallet, wallet_line)
        }
        WalletCommand::Update(args) => {
            let wallet = engine
                .wallet(args.id)
                .await?
                .ok_or_else(|| format!("wallet {} not found", args.id))?;
            let wallet = engine.update_wallet(apply_update(wallet, args)).await?;
            emit(json, &wallet, wallet_line)
        }
        WalletCommand::Adjust(args) => {
            let row = engine
                .adjust_balance(args.id, args.amount.cents(), &args.observations)
                .await?;
            emit(json, &row, ledger_line)
        }
        WalletCommand::Transfer(args) => {
            let rows = engine
                .transfer_between_wallets(
                    args.source,
                    args.target,
                    args.amount.cents(),
                    &args.observations,
                )
                .await?;
            emit(json, &rows, |(debit, credit)| {
                format!("{}\n{}", ledger_line(debit), ledger_line(credit))
            })
        }
        WalletCommand::Delete(args) => {
            engine.delete_wallet(args.id).await?;
            emit(json, &args.id, |id| format!("deleted wallet {id}"))
        }
        WalletCommand::Recompute(args) => {
            let balance = Money::new(engine.recompute_wallet_balance(args.id).await?);
            emit(json, &balance, |balance| format!("balance {balance}"))
        }
        WalletCommand::Ledger(args) => {
            let rows = engine.wallet_balances(args.id).await?;
            emit(json, &rows, |rows| lines(rows, ledger_line))
        }
    }
}

async fn run_contact(engine: &Engine, command: ContactCommand, json: bool) -> AppResult<()> {
    match command {
        ContactCommand::Create(args) => {
            let mut contact = Contact::new(args.name, args.contact_type);
            contact.email = args.email;
            contact.document = args.document;
            contact.description = args.description;
            contact.telephones = args.telephones;

            let contact = engine.save_contact(contact).await?;
            emit(json, &contact, contact_line)
        }
        ContactCommand::List(FilterArgs { filter, active }) => {
            let contacts = engine.find_contacts(filter.as_deref(), active).await?;
            emit(json, &contacts, |contacts| lines(contacts, contact_line))
        }
        ContactCommand::Show(args) => {
            let contact = engine
                .contact(args.id)
                .await?
                .ok_or_else(|| format!("contact {} not found", args.id))?;
            emit(json, &contact, |contact| {
                let mut text = contact_line(contact);
                for telephone in &contact.telephones {
                    text.push_str(&format!(
                        "\n  {:<12}{}",
                        telephone.telephone_type.as_str(),
                        telephone.number
                    ));
                }
                text
            })
        }
        ContactCommand::Delete(args) => {
            engine.delete_contact(args.id).await?;
            emit(json, &args.id, |id| format!("deleted contact {id}"))
        }
    }
}

async fn run_movement_class(
    engine: &Engine,
    command: MovementClassCommand,
    json: bool,
) -> AppResult<()> {
    match command {
        MovementClassCommand::Create(args) => {
            let mut class = MovementClass::new(args.name, args.class_type);
            class.budget = args.budget.map(Money::cents);
            class.description = args.description;

            let class = engine.save_movement_class(class).await?;
            emit(json, &class, movement_class_line)
        }
        MovementClassCommand::List(FilterArgs { filter, active }) => {
            let classes = engine
                .find_movement_classes(filter.as_deref(), active)
                .await?;
            emit(json, &classes, |classes| lines(classes, movement_class_line))
        }
        MovementClassCommand::Delete(args) => {
            engine.delete_movement_class(args.id).await?;
            emit(json, &args.id, |id| format!("deleted movement class {id}"))
        }
    }
}

fn apply_update(mut wallet: Wallet, args: WalletUpdateArgs) -> Wallet {
    if let Some(name) = args.name {
        wallet.name = name;
    }
    if let Some(wallet_type) = args.wallet_type {
        wallet.wallet_type = wallet_type;
    }
    if let Some(bank) = args.bank {
        wallet.bank = Some(bank);
    }
    if let Some(agency) = args.agency {
        wallet.agency = Some(agency);
    }
    if let Some(account) = args.account {
        wallet.account = Some(account);
    }
    if let Some(description) = args.description {
        wallet.description = Some(description);
    }
    if let Some(active) = args.active {
        wallet.active = active;
    }
    wallet
}

/// Print `value` as JSON or as the text produced by `text`.
fn emit<T>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> AppResult<()>
where
    T: Serialize + ?Sized,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn lines<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

fn wallet_line(wallet: &Wallet) -> String {
    format!(
        "{}  {:<24}{:<14}{:>14}{}",
        wallet.id,
        wallet.name,
        wallet.wallet_type.as_str(),
        Money::new(wallet.balance),
        if wallet.active { "" } else { "  (inactive)" }
    )
}

fn ledger_line(row: &WalletBalance) -> String {
    format!(
        "{}  {:<13}{:>14}{:>14}  {}",
        row.created_at.format("%Y-%m-%d %H:%M:%S"),
        row.reason.as_str(),
        Money::new(row.movement_value),
        Money::new(row.actual_balance),
        row.observations.as_deref().unwrap_or_default()
    )
}

fn contact_line(contact: &Contact) -> String {
    format!(
        "{}  {:<24}{:<10}{}",
        contact.id,
        contact.name,
        contact.contact_type.as_str(),
        contact.email.as_deref().unwrap_or_default()
    )
}

fn movement_class_line(class: &MovementClass) -> String {
    let budget = class
        .budget
        .map(|budget| Money::new(budget).to_string())
        .unwrap_or_default();
    format!(
        "{}  {:<24}{:<9}{:>14}",
        class.id,
        class.name,
        class.class_type.as_str(),
        budget
    )
}

#[cfg(test)]
mod tests {
    use engine::WalletType;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn update_only_touches_given_fields() {
        let wallet = Wallet::new("Checking", WalletType::BankAccount, 10_000)
            .with_description("daily");
        let args = WalletUpdateArgs {
            id: wallet.id,
            name: Some("Main".to_string()),
            wallet_type: None,
            bank: None,
            agency: None,
            account: None,
            description: None,
            active: Some(false),
        };

        let updated = apply_update(wallet.clone(), args);
        assert_eq!(updated.name, "Main");
        assert!(!updated.active);
        assert_eq!(updated.description, wallet.description);
        assert_eq!(updated.balance, wallet.balance);
    }

    #[tokio::test]
    async fn memory_database_is_migrated() {
        let engine = connect("sqlite::memory:").await.unwrap();
        let wallet = engine
            .save_wallet(Wallet::new("Cash", WalletType::Personal, 500))
            .await
            .unwrap();
        assert_eq!(engine.wallet_balances(wallet.id).await.unwrap().len(), 1);
        assert!(engine.wallet(Uuid::new_v4()).await.unwrap().is_none());
    }
}
