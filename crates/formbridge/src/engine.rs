// File: src/engine.rs
// Purpose: Per-request conversion engine tying store, converters, and config

use std::collections::HashMap;

use crate::config::{FormbridgeConfig, TargetLibrary};
use crate::convert::{html5, jquery, ConversionContext, CustomRuleHandler, Directives, RuleConverter};
use crate::infer::{infer_value_class, ValueClass};
use crate::message::{MessageCatalog, MessageConverter};
use crate::rule::{RuleToken, ValidationRuleSpec};
use crate::store::{FieldRuleSet, FormRuleStore};
use crate::token::ParameterToken;

/// Rule names whose non-numeric conversion also caps input length.
const LENGTH_CAPPED_RULES: [&str; 2] = ["max", "between"];

/// The conversion engine for one request/render cycle.
///
/// Owns the rule store, both converters, and the configuration they
/// read. Build one per request and pass it explicitly; sharing an
/// instance across concurrent requests would leak one request's active
/// scope into another's reads.
pub struct FormBridge {
    config: FormbridgeConfig,
    store: FormRuleStore,
    rules: RuleConverter,
    messages: MessageConverter,
}

impl FormBridge {
    pub fn new(config: FormbridgeConfig) -> Self {
        Self::with_catalog(config, MessageCatalog::new())
    }

    /// Engine with a caller-supplied message catalog (e.g. another
    /// locale or per-field overrides).
    pub fn with_catalog(config: FormbridgeConfig, catalog: MessageCatalog) -> Self {
        let mapping = match config.target_library {
            TargetLibrary::Jquery => &*jquery::MAPPING,
            TargetLibrary::Html5 => &*html5::MAPPING,
        };

        Self {
            rules: RuleConverter::new(mapping),
            messages: MessageConverter::new(mapping, catalog, config.use_server_messages),
            store: FormRuleStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &FormbridgeConfig {
        &self.config
    }

    pub fn store(&self) -> &FormRuleStore {
        &self.store
    }

    /// Register validation rules for a scope. `None` rules are a no-op.
    pub fn set_validation(&mut self, rules: Option<FieldRuleSet>, scope: Option<&str>) {
        self.store.set(rules, scope);
    }

    /// Point conversion at a form's scope, as a form-open does. Passing
    /// `None` returns to the default scope.
    pub fn set_form_name(&mut self, name: Option<&str>) {
        self.store.set_active_scope(name);
    }

    /// Drop the active scope's rules, as a form-close does.
    pub fn reset_validation(&mut self) {
        self.store.reset();
    }

    /// A handler that takes precedence over the built-in rule table.
    pub fn register_rule_handler(&mut self, rule_name: impl Into<String>, handler: CustomRuleHandler) {
        self.rules.register(rule_name, handler);
    }

    /// A handler that takes precedence over the message catalog.
    pub fn register_message_handler(&mut self, rule_name: impl Into<String>, handler: CustomRuleHandler) {
        self.messages.register(rule_name, handler);
    }

    /// Convert every rule registered for `field` into client attributes,
    /// ready to be merged into the rendered control.
    ///
    /// The field's value class is inferred once over the whole rule set
    /// before any per-rule conversion. Rule directives accumulate first,
    /// then message directives; an attribute set by an earlier rule is
    /// never silently overwritten by a later one.
    pub fn convert(&self, field: &str) -> HashMap<String, String> {
        if !self.store.has_rules_for(field) {
            return HashMap::new();
        }

        let tokens = self.store.get(field);
        if tokens.is_empty() {
            return HashMap::new();
        }

        let specs: Vec<ValidationRuleSpec> = tokens.iter().map(RuleToken::to_spec).collect();
        let class = infer_value_class(&specs);

        let mut directives = Directives::new();
        for spec in &specs {
            let ctx = ConversionContext {
                rule: spec,
                field,
                class,
            };

            let pairs = if self.rules.is_remote(&spec.name) && !self.rules.has_custom(&spec.name) {
                self.remote_directives(&ctx)
            } else {
                self.rules.convert(&ctx)
            };
            directives.extend_from(&spec.name, pairs);

            // max/between on a non-numeric field always yields a plain
            // length cap too: the generic bound and maxlength measure
            // different quantities.
            if LENGTH_CAPPED_RULES.contains(&spec.name.as_str()) && class != ValueClass::Numeric {
                if let Some(bound) = spec.parameters.last() {
                    directives.insert(&spec.name, "maxlength".to_string(), bound.clone());
                }
            }

            directives.extend_from(&spec.name, self.messages.convert(&ctx));
        }

        tracing::debug!(field, attributes = directives.len(), "converted field rules");
        directives.into_map()
    }

    /// Remote-mapped rules emit the endpoint URL carrying a signed
    /// parameter token instead of a local directive. The token is issued
    /// per render and only ever verified server-side.
    fn remote_directives(&self, ctx: &ConversionContext) -> Vec<(String, String)> {
        let token = ParameterToken::issue(&self.config.secret(), &ctx.rule.parameters);
        let url = format!(
            "{}/{}?params={}",
            self.config.route_prefix.trim_end_matches('/'),
            ctx.rule.name,
            urlencoding::encode(token.as_str()),
        );
        (self.rules.mapping().remote)(ctx, &url)
    }
}
