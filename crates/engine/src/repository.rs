//! Filtered search shared by every registry entity.
//!
//! Each entity declares which fields a free-text filter is matched against,
//! which column carries its active state and how results are ordered. The
//! active state and the ordering run in SQL; the text match runs on the
//! loaded rows with [`normalize_key`], the same folding used by the
//! uniqueness rules, so accented and non-Latin text match ignoring case and
//! the filter is taken literally.

use sea_orm::{QueryFilter, QueryOrder, Select, prelude::*};

use crate::{contacts, movement_classes, util::normalize_key, wallets};

pub trait DefaultRepository: EntityTrait {
    /// Fields matched, case-insensitively, by the free-text filter.
    fn search_values(model: &Self::Model) -> Vec<Option<&str>>;

    /// Boolean column holding the active state.
    fn state_column() -> Self::Column;

    fn order_column() -> Self::Column;

    /// Select rows with the given active state (all when `None`), ordered.
    fn find_by_state(active: Option<bool>) -> Select<Self> {
        let mut query = Self::find();
        if let Some(active) = active {
            query = query.filter(Self::state_column().eq(active));
        }
        query.order_by_asc(Self::order_column())
    }

    /// Whether any search field of `model` contains `filter`, ignoring case.
    fn matches(model: &Self::Model, filter: &str) -> bool {
        let key = normalize_key(filter);
        Self::search_values(model)
            .into_iter()
            .flatten()
            .any(|value| normalize_key(value).contains(&key))
    }

    /// Keep the rows matching `filter`; a blank filter keeps everything.
    fn find_by_filter(models: Vec<Self::Model>, filter: Option<&str>) -> Vec<Self::Model> {
        match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(filter) => models
                .into_iter()
                .filter(|model| Self::matches(model, filter))
                .collect(),
            None => models,
        }
    }
}

impl DefaultRepository for wallets::Entity {
    fn search_values(model: &Self::Model) -> Vec<Option<&str>> {
        vec![
            Some(model.name.as_str()),
            model.bank.as_deref(),
            model.description.as_deref(),
        ]
    }

    fn state_column() -> Self::Column {
        wallets::Column::Active
    }

    fn order_column() -> Self::Column {
        wallets::Column::Name
    }
}

impl DefaultRepository for contacts::Entity {
    fn search_values(model: &Self::Model) -> Vec<Option<&str>> {
        vec![
            Some(model.name.as_str()),
            model.email.as_deref(),
            model.document.as_deref(),
        ]
    }

    fn state_column() -> Self::Column {
        contacts::Column::Active
    }

    fn order_column() -> Self::Column {
        contacts::Column::Name
    }
}

impl DefaultRepository for movement_classes::Entity {
    fn search_values(model: &Self::Model) -> Vec<Option<&str>> {
        vec![Some(model.name.as_str()), model.description.as_deref()]
    }

    fn state_column() -> Self::Column {
        movement_classes::Column::Active
    }

    fn order_column() -> Self::Column {
        movement_classes::Column::Name
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    fn wallet(name: &str, bank: Option<&str>) -> wallets::Model {
        wallets::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            wallet_type: "personal".to_string(),
            bank: bank.map(str::to_string),
            agency: None,
            account: None,
            description: None,
            balance: 0,
            active: true,
            version: 0,
        }
    }

    fn names(models: Vec<wallets::Model>) -> Vec<String> {
        models.into_iter().map(|model| model.name).collect()
    }

    #[test]
    fn state_filter_and_order_run_in_sql() {
        let sql = contacts::Entity::find_by_state(Some(true))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains(r#""contacts"."active" ="#));
        assert!(sql.contains(r#"ORDER BY "contacts"."name" ASC"#));
    }

    #[test]
    fn no_state_selects_everything() {
        let sql = wallets::Entity::find_by_state(None)
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn accented_text_matches_ignoring_case() {
        let models = vec![wallet("Água Conta", None), wallet("Cash", None)];

        for filter in ["Água", "ÁGUA", "água", "conta"] {
            let found = wallets::Entity::find_by_filter(models.clone(), Some(filter));
            assert_eq!(names(found), vec!["Água Conta"], "filter {filter:?}");
        }
    }

    #[test]
    fn wildcards_are_literal() {
        let models = vec![wallet("Cash", None), wallet("Fund_2024", None)];

        assert_eq!(
            names(wallets::Entity::find_by_filter(models.clone(), Some("_"))),
            vec!["Fund_2024"]
        );
        assert!(wallets::Entity::find_by_filter(models, Some("%")).is_empty());
    }

    #[test]
    fn optional_fields_are_searched() {
        let models = vec![wallet("Checking", Some("Banco São Paulo")), wallet("Cash", None)];

        let found = wallets::Entity::find_by_filter(models, Some("SÃO"));
        assert_eq!(names(found), vec!["Checking"]);
    }

    #[test]
    fn blank_filter_keeps_everything() {
        let models = vec![wallet("Cash", None), wallet("Savings", None)];

        assert_eq!(wallets::Entity::find_by_filter(models.clone(), Some("  ")).len(), 2);
        assert_eq!(wallets::Entity::find_by_filter(models, None).len(), 2);
    }
}
