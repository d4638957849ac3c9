// File: src/store.rs
// Purpose: Form-scoped rule storage with an active-scope pointer

use std::collections::HashMap;

use crate::rule::{RuleList, RuleToken};

/// Rules for every field of one form, keyed by field name.
pub type FieldRuleSet = HashMap<String, RuleList>;

/// Rule sets keyed by form scope, plus the pointer selecting which
/// scope subsequent reads target.
///
/// The pointer is the only call-order-dependent state in the engine.
/// Build one store per request/render cycle; a process-wide instance
/// would leak one request's open scope into another's reads.
#[derive(Debug, Default)]
pub struct FormRuleStore {
    scopes: HashMap<Option<String>, FieldRuleSet>,
    active: Option<String>,
}

impl FormRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store rules under a scope (`None` is the default scope). Passing
    /// `None` rules is a no-op, which keeps "no rules supplied" distinct
    /// from "clear rules".
    pub fn set(&mut self, rules: Option<FieldRuleSet>, scope: Option<&str>) {
        if let Some(rules) = rules {
            self.scopes.insert(scope.map(str::to_string), rules);
        }
    }

    /// Point subsequent `get`/`reset` calls at `scope`.
    pub fn set_active_scope(&mut self, scope: Option<&str>) {
        tracing::debug!(scope = scope.unwrap_or("<default>"), "switching active rule scope");
        self.active = scope.map(str::to_string);
    }

    pub fn active_scope(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The one scope visible to reads: the active scope when its entry
    /// exists, else the default scope. Scopes are never merged.
    fn visible(&self) -> Option<&FieldRuleSet> {
        self.scopes
            .get(&self.active)
            .or_else(|| self.scopes.get(&None))
    }

    /// Rules for one field in the visible scope. Absence of the field,
    /// the scope, or any rules at all degrades to an empty list.
    pub fn get(&self, field: &str) -> Vec<RuleToken> {
        self.visible()
            .and_then(|set| set.get(field))
            .map(RuleList::tokens)
            .unwrap_or_default()
    }

    pub fn has_rules_for(&self, field: &str) -> bool {
        self.visible().map(|set| set.contains_key(field)).unwrap_or(false)
    }

    /// Remove the active scope's entry; when the active scope has no
    /// entry, remove the default entry instead. Unrelated scopes are
    /// never touched.
    pub fn reset(&mut self) {
        if self.scopes.remove(&self.active).is_none() {
            self.scopes.remove(&None);
        }
    }
}
