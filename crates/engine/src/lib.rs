//! Household budget engine.
//!
//! Wallets, contacts and movement classes are stored through sea-orm. The
//! balance of a wallet is backed by an append-only ledger
//! ([`WalletBalance`]); every change goes through
//! [`Engine::on_wallet_balance_change`].

pub use balance_builder::WalletBalanceBuilder;
pub use contacts::{Contact, ContactType};
pub use entry_type::EntryType;
pub use error::EngineError;
pub use money::Money;
pub use movement_classes::{MovementClass, MovementClassType};
pub use ops::{Engine, EngineBuilder};
pub use repository::DefaultRepository;
pub use telephones::{Telephone, TelephoneType};
pub use validators::{BusinessLogic, Phase, RuleSet, Rules};
pub use wallet_balances::{BalanceType, ReasonType, WalletBalance};
pub use wallets::{Wallet, WalletType};

mod balance_builder;
pub mod contacts;
mod entry_type;
mod error;
mod money;
pub mod movement_classes;
mod ops;
mod repository;
pub mod telephones;
mod util;
pub mod validators;
pub mod wallet_balances;
pub mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
