use clap::{Args, Parser, Subcommand};
use engine::{ContactType, Money, MovementClassType, Telephone, TelephoneType, WalletType};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "webbudget")]
#[command(about = "Household budget: wallets, contacts and movement classes")]
pub struct Cli {
    /// Settings file, without extension.
    #[arg(long, default_value = "settings")]
    pub settings: String,

    /// Database connection string, overrides the settings file.
    #[arg(long, env = "WEBBUDGET_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Wallet(Wallet),
    Contact(Contact),
    #[command(name = "class")]
    MovementClass(MovementClass),
    /// List the entry types with their label keys.
    EntryTypes,
}

#[derive(Args, Debug)]
pub struct Wallet {
    #[command(subcommand)]
    pub command: WalletCommand,
}

#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    Create(WalletCreateArgs),
    List(FilterArgs),
    Show(IdArgs),
    Update(WalletUpdateArgs),
    Adjust(AdjustArgs),
    Transfer(TransferArgs),
    Delete(IdArgs),
    /// Rebuild the cached balance from the ledger.
    Recompute(IdArgs),
    /// Show the balance history of a wallet.
    Ledger(IdArgs),
}

#[derive(Args, Debug)]
pub struct WalletCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type", value_parser = parse_wallet_type, default_value = "personal")]
    pub wallet_type: WalletType,
    /// Opening balance, e.g. `100.00`.
    #[arg(long, value_parser = parse_money, default_value = "0", allow_hyphen_values = true)]
    pub balance: Money,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long)]
    pub agency: Option<String>,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct WalletUpdateArgs {
    pub id: Uuid,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "type", value_parser = parse_wallet_type)]
    pub wallet_type: Option<WalletType>,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long)]
    pub agency: Option<String>,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug)]
pub struct AdjustArgs {
    pub id: Uuid,
    /// Signed amount, e.g. `-30.00`.
    #[arg(value_parser = parse_money, allow_hyphen_values = true)]
    pub amount: Money,
    #[arg(long, default_value = "")]
    pub observations: String,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    pub source: Uuid,
    pub target: Uuid,
    #[arg(value_parser = parse_money)]
    pub amount: Money,
    #[arg(long, default_value = "")]
    pub observations: String,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    pub id: Uuid,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Case-insensitive text to search for.
    pub filter: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug)]
pub struct Contact {
    #[command(subcommand)]
    pub command: ContactCommand,
}

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    Create(ContactCreateArgs),
    List(FilterArgs),
    Show(IdArgs),
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct ContactCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type", value_parser = parse_contact_type, default_value = "personal")]
    pub contact_type: ContactType,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub document: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Telephone as `type:number`, e.g. `mobile:555-0101`. Repeatable.
    #[arg(long = "phone", value_parser = parse_telephone)]
    pub telephones: Vec<Telephone>,
}

#[derive(Args, Debug)]
pub struct MovementClass {
    #[command(subcommand)]
    pub command: MovementClassCommand,
}

#[derive(Subcommand, Debug)]
pub enum MovementClassCommand {
    Create(MovementClassCreateArgs),
    List(FilterArgs),
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct MovementClassCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type", value_parser = parse_movement_class_type)]
    pub class_type: MovementClassType,
    /// Monthly budget, e.g. `250.00`.
    #[arg(long, value_parser = parse_money)]
    pub budget: Option<Money>,
    #[arg(long)]
    pub description: Option<String>,
}

fn parse_money(value: &str) -> Result<Money, String> {
    value.parse::<Money>().map_err(|err| err.to_string())
}

fn parse_wallet_type(value: &str) -> Result<WalletType, String> {
    WalletType::try_from(value).map_err(|err| err.to_string())
}

fn parse_contact_type(value: &str) -> Result<ContactType, String> {
    ContactType::try_from(value).map_err(|err| err.to_string())
}

fn parse_movement_class_type(value: &str) -> Result<MovementClassType, String> {
    MovementClassType::try_from(value).map_err(|err| err.to_string())
}

fn parse_telephone(value: &str) -> Result<Telephone, String> {
    let (kind, number) = value
        .split_once(':')
        .ok_or_else(|| format!("expected type:number, got '{value}'"))?;
    let kind = TelephoneType::try_from(kind.trim()).map_err(|err| err.to_string())?;
    Ok(Telephone::new(number.trim(), kind))
}
