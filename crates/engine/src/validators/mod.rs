//! Pluggable business rules.
//!
//! A [`BusinessLogic`] is a check run against an entity before it is saved or
//! updated. Checks are grouped per entity in a [`RuleSet`], one ordered list
//! per [`Phase`]. The engine runs the list in registration order and stops at
//! the first failure, which aborts the surrounding transaction.
//!
//! New rules are added by registering them on the
//! [`EngineBuilder`](crate::EngineBuilder); the services never change.
//!
//! ```rust
//! use engine::{EngineError, Phase, Rules, Wallet, validators::check};
//!
//! let mut rules = Rules::default();
//! rules.wallets.register(
//!     Phase::Saving,
//!     check("no negative opening", |wallet: &Wallet| {
//!         if wallet.balance < 0 {
//!             return Err(EngineError::Validation("negative opening".to_string()));
//!         }
//!         Ok(())
//!     }),
//! );
//! assert_eq!(rules.wallets.names(Phase::Saving).last(), Some(&"no negative opening"));
//! ```

use std::fmt;

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::{Contact, EngineError, MovementClass, ResultEngine, Wallet};

mod contact;
mod movement_class;
mod wallet;

pub use contact::{UniqueContactDocument, ValidContactEmail};
pub use movement_class::{PositiveBudget, UniqueMovementClassName};
pub use wallet::UniqueWalletName;

/// Lifecycle moment a rule is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Saving,
    Updating,
}

/// A business rule for `T`.
///
/// `run` returns `Ok(())` to let the operation go on; any error aborts it.
#[async_trait]
pub trait BusinessLogic<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn run(&self, db: &DatabaseTransaction, value: &T) -> ResultEngine<()>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A rule built from a plain function, for checks that need no database.
pub struct FnLogic<F> {
    name: &'static str,
    check: F,
}

/// Wrap `check` into a [`BusinessLogic`].
pub fn check<T, F>(name: &'static str, check: F) -> FnLogic<F>
where
    F: Fn(&T) -> ResultEngine<()> + Send + Sync,
{
    FnLogic { name, check }
}

#[async_trait]
impl<T, F> BusinessLogic<T> for FnLogic<F>
where
    T: Send + Sync + 'static,
    F: Fn(&T) -> ResultEngine<()> + Send + Sync,
{
    async fn run(&self, _db: &DatabaseTransaction, value: &T) -> ResultEngine<()> {
        (self.check)(value)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Entities that carry a mandatory display name.
pub trait Named {
    const LABEL: &'static str;

    fn name(&self) -> &str;
}

impl Named for Wallet {
    const LABEL: &'static str = "wallet";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Contact {
    const LABEL: &'static str = "contact";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for MovementClass {
    const LABEL: &'static str = "movement class";

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rejects blank names.
#[derive(Clone, Copy, Debug)]
pub struct RequiredName;

#[async_trait]
impl<T> BusinessLogic<T> for RequiredName
where
    T: Named + Send + Sync + 'static,
{
    async fn run(&self, _db: &DatabaseTransaction, value: &T) -> ResultEngine<()> {
        if value.name().trim().is_empty() {
            return Err(EngineError::Validation(format!(
                "{} name must not be empty",
                T::LABEL
            )));
        }
        Ok(())
    }
}

/// Ordered rules of one entity, split by [`Phase`].
pub struct RuleSet<T>
where
    T: Send + Sync + 'static,
{
    saving: Vec<Box<dyn BusinessLogic<T>>>,
    updating: Vec<Box<dyn BusinessLogic<T>>>,
}

impl<T> Default for RuleSet<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            saving: Vec::new(),
            updating: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for RuleSet<T>
where
    T: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("saving", &self.names(Phase::Saving))
            .field("updating", &self.names(Phase::Updating))
            .finish()
    }
}

impl<T> RuleSet<T>
where
    T: Send + Sync + 'static,
{
    /// Append a rule to `phase`. It runs after the ones already registered.
    pub fn register(
        &mut self,
        phase: Phase,
        logic: impl BusinessLogic<T> + 'static,
    ) -> &mut Self {
        self.hooks_mut(phase).push(Box::new(logic));
        self
    }

    /// Register the same rule for both phases.
    pub fn register_always<L>(&mut self, logic: L) -> &mut Self
    where
        L: BusinessLogic<T> + Clone + 'static,
    {
        self.register(Phase::Saving, logic.clone());
        self.register(Phase::Updating, logic)
    }

    pub fn names(&self, phase: Phase) -> Vec<&'static str> {
        self.hooks(phase).iter().map(|hook| hook.name()).collect()
    }

    fn hooks(&self, phase: Phase) -> &[Box<dyn BusinessLogic<T>>] {
        match phase {
            Phase::Saving => &self.saving,
            Phase::Updating => &self.updating,
        }
    }

    fn hooks_mut(&mut self, phase: Phase) -> &mut Vec<Box<dyn BusinessLogic<T>>> {
        match phase {
            Phase::Saving => &mut self.saving,
            Phase::Updating => &mut self.updating,
        }
    }

    /// Run every rule of `phase`, stopping at the first failure.
    pub(crate) async fn run(
        &self,
        phase: Phase,
        db: &DatabaseTransaction,
        value: &T,
    ) -> ResultEngine<()> {
        for hook in self.hooks(phase) {
            if let Err(err) = hook.run(db, value).await {
                tracing::warn!(rule = hook.name(), ?phase, "business rule rejected: {err}");
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Every rule set known to the engine.
#[derive(Debug)]
pub struct Rules {
    pub wallets: RuleSet<Wallet>,
    pub contacts: RuleSet<Contact>,
    pub movement_classes: RuleSet<MovementClass>,
}

impl Rules {
    /// No rules at all.
    pub fn empty() -> Self {
        Self {
            wallets: RuleSet::default(),
            contacts: RuleSet::default(),
            movement_classes: RuleSet::default(),
        }
    }
}

impl Default for Rules {
    /// The built-in rules.
    fn default() -> Self {
        let mut rules = Self::empty();

        rules
            .wallets
            .register_always(RequiredName)
            .register_always(UniqueWalletName);

        rules
            .contacts
            .register_always(RequiredName)
            .register_always(ValidContactEmail)
            .register_always(UniqueContactDocument);

        rules
            .movement_classes
            .register_always(RequiredName)
            .register_always(PositiveBudget)
            .register_always(UniqueMovementClassName);

        rules
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use sea_orm::{Database, TransactionTrait};

    use crate::WalletType;

    use super::*;

    fn recording(
        name: &'static str,
        calls: &Arc<Mutex<Vec<&'static str>>>,
        reject: bool,
    ) -> impl BusinessLogic<Wallet> + 'static {
        let calls = Arc::clone(calls);
        check(name, move |_: &Wallet| {
            calls.lock().unwrap().push(name);
            if reject {
                return Err(EngineError::Validation(name.to_string()));
            }
            Ok(())
        })
    }

    #[tokio::test]
    async fn rules_run_in_order_and_stop_at_first_failure() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db_tx = db.begin().await.unwrap();
        let wallet = Wallet::new("Cash", WalletType::Personal, 0);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let mut rules = RuleSet::default();
        rules
            .register(Phase::Saving, recording("first", &calls, false))
            .register(Phase::Saving, recording("second", &calls, false))
            .register(Phase::Saving, recording("third", &calls, false));
        rules.run(Phase::Saving, &db_tx, &wallet).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);

        calls.lock().unwrap().clear();
        let mut rules = RuleSet::default();
        rules
            .register(Phase::Saving, recording("first", &calls, false))
            .register(Phase::Saving, recording("rejects", &calls, true))
            .register(Phase::Saving, recording("never", &calls, false));
        let err = rules.run(Phase::Saving, &db_tx, &wallet).await.unwrap_err();
        assert_eq!(err, EngineError::Validation("rejects".to_string()));
        assert_eq!(*calls.lock().unwrap(), vec!["first", "rejects"]);
    }

    #[tokio::test]
    async fn phases_are_independent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db_tx = db.begin().await.unwrap();
        let wallet = Wallet::new("Cash", WalletType::Personal, 0);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let mut rules = RuleSet::default();
        rules.register(Phase::Updating, recording("update only", &calls, true));

        rules.run(Phase::Saving, &db_tx, &wallet).await.unwrap();
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(rules.names(Phase::Updating), vec!["update only"]);
    }

    #[test]
    fn built_in_rules_come_first() {
        let rules = Rules::default();
        let names = rules.wallets.names(Phase::Saving);

        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("RequiredName"));
        assert!(names[1].ends_with("UniqueWalletName"));
        assert!(Rules::empty().contacts.names(Phase::Updating).is_empty());
    }
}
