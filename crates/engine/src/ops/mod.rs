use sea_orm::DatabaseConnection;

use crate::{
    Contact, MovementClass, ResultEngine, Wallet,
    util::normalize_optional_text,
    validators::{BusinessLogic, Phase, Rules},
};

mod balances;
mod contacts;
mod movement_classes;
mod wallets;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every operation.
///
/// Each public method runs in its own database transaction: either all of
/// its writes land, or none does.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    rules: Rules,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Business rules run by the services.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

fn normalize_wallet(mut wallet: Wallet) -> Wallet {
    wallet.name = wallet.name.trim().to_string();
    wallet.bank = normalize_optional_text(wallet.bank.as_deref());
    wallet.agency = normalize_optional_text(wallet.agency.as_deref());
    wallet.account = normalize_optional_text(wallet.account.as_deref());
    wallet.description = normalize_optional_text(wallet.description.as_deref());
    wallet
}

fn normalize_contact(mut contact: Contact) -> Contact {
    contact.name = contact.name.trim().to_string();
    contact.email = normalize_optional_text(contact.email.as_deref());
    contact.document = normalize_optional_text(contact.document.as_deref());
    contact.description = normalize_optional_text(contact.description.as_deref());
    for telephone in &mut contact.telephones {
        telephone.number = telephone.number.trim().to_string();
    }
    contact.telephones.retain(|telephone| !telephone.number.is_empty());
    contact
}

fn normalize_movement_class(mut class: MovementClass) -> MovementClass {
    class.name = class.name.trim().to_string();
    class.description = normalize_optional_text(class.description.as_deref());
    class
}

/// The builder for `Engine`
///
/// Starts with the built-in [`Rules`]; extra rules are appended after them.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    rules: Rules,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Replace the whole rule registry.
    pub fn rules(mut self, rules: Rules) -> EngineBuilder {
        self.rules = rules;
        self
    }

    pub fn wallet_rule(
        mut self,
        phase: Phase,
        logic: impl BusinessLogic<Wallet> + 'static,
    ) -> EngineBuilder {
        self.rules.wallets.register(phase, logic);
        self
    }

    pub fn contact_rule(
        mut self,
        phase: Phase,
        logic: impl BusinessLogic<Contact> + 'static,
    ) -> EngineBuilder {
        self.rules.contacts.register(phase, logic);
        self
    }

    pub fn movement_class_rule(
        mut self,
        phase: Phase,
        logic: impl BusinessLogic<MovementClass> + 'static,
    ) -> EngineBuilder {
        self.rules.movement_classes.register(phase, logic);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        tracing::debug!(rules = ?self.rules, "engine built");
        Ok(Engine {
            database: self.database,
            rules: self.rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Telephone, TelephoneType, WalletType};

    use super::*;

    #[test]
    fn wallet_text_fields_are_trimmed() {
        let mut wallet = Wallet::new("  Checking ", WalletType::BankAccount, 0);
        wallet.bank = Some("   ".to_string());
        wallet.description = Some(" daily ".to_string());

        let wallet = normalize_wallet(wallet);
        assert_eq!(wallet.name, "Checking");
        assert_eq!(wallet.bank, None);
        assert_eq!(wallet.description.as_deref(), Some("daily"));
    }

    #[test]
    fn blank_telephones_are_dropped() {
        let contact = Contact::new("Ana", crate::ContactType::Personal)
            .with_telephone(Telephone::new(" ", TelephoneType::Mobile))
            .with_telephone(Telephone::new(" 555-0101 ", TelephoneType::Residential));

        let contact = normalize_contact(contact);
        assert_eq!(contact.telephones.len(), 1);
        assert_eq!(contact.telephones[0].number, "555-0101");
    }
}
