// File: src/convert/mod.rs
// Purpose: Rule-to-directive conversion with per-library mapping tables

pub mod html5;
pub mod jquery;

use std::collections::HashMap;

use crate::infer::ValueClass;
use crate::rule::ValidationRuleSpec;

/// Everything a handler needs to convert one rule on one field.
/// Built per rule during conversion, never persisted.
pub struct ConversionContext<'a> {
    pub rule: &'a ValidationRuleSpec,
    pub field: &'a str,
    pub class: ValueClass,
}

/// A built-in rule handler from a library mapping table.
pub type RuleHandler = fn(&ConversionContext) -> Vec<(String, String)>;

/// A caller-registered handler. Boxed so it may capture configuration.
pub type CustomRuleHandler = Box<dyn Fn(&ConversionContext) -> Vec<(String, String)> + Send + Sync>;

/// Emits the attributes that wire one rule to the remote validation
/// endpoint at `url`.
pub type RemoteHandler = fn(&ConversionContext, url: &str) -> Vec<(String, String)>;

/// Static mapping table for one target client library.
///
/// Handlers are plain function pointers in an enumerable table, with one
/// designated default entry, so the handler set can be inspected and
/// tested without probing for methods at runtime.
pub struct LibraryMapping {
    pub name: &'static str,
    pub rules: HashMap<&'static str, RuleHandler>,
    /// Rules whose enforcement must round-trip to the server.
    pub remote_rules: &'static [&'static str],
    /// Wires a remote rule to the endpoint URL.
    pub remote: RemoteHandler,
    /// Fallback for rule names the table does not know. Emitting a
    /// generic directive keeps unmapped rules forward-compatible.
    pub default: RuleHandler,
    /// Attribute key that carries the message for a rule, e.g.
    /// `data-msg-required`.
    pub message_key: fn(&ConversionContext) -> String,
}

impl LibraryMapping {
    pub fn is_remote(&self, rule_name: &str) -> bool {
        self.remote_rules.contains(&rule_name)
    }
}

/// Accumulated client directives for one field.
///
/// Later rules may add attributes but never silently overwrite one that
/// a different rule already produced; only the same rule name replaces
/// its own attribute.
#[derive(Debug, Default)]
pub struct Directives {
    attrs: HashMap<String, String>,
    owners: HashMap<String, String>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one attribute on behalf of `rule_name`.
    pub fn insert(&mut self, rule_name: &str, key: String, value: String) {
        match self.owners.get(&key) {
            Some(owner) if owner != rule_name => {
                tracing::debug!(
                    attribute = %key,
                    kept = %owner,
                    dropped = %rule_name,
                    "directive already owned by an earlier rule"
                );
            }
            _ => {
                self.owners.insert(key.clone(), rule_name.to_string());
                self.attrs.insert(key, value);
            }
        }
    }

    /// Insert a batch of attributes produced by one rule.
    pub fn extend_from(&mut self, rule_name: &str, pairs: Vec<(String, String)>) {
        for (key, value) in pairs {
            self.insert(rule_name, key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.attrs
    }
}

/// Converts parsed rules into client directives for the active target
/// library.
///
/// Dispatch order: caller-registered custom handler, then the library's
/// built-in handler, then the library's generic default. Conversion is a
/// pure transform of the context; no state is read beyond the tables.
pub struct RuleConverter {
    mapping: &'static LibraryMapping,
    custom: HashMap<String, CustomRuleHandler>,
}

impl RuleConverter {
    pub fn new(mapping: &'static LibraryMapping) -> Self {
        Self {
            mapping,
            custom: HashMap::new(),
        }
    }

    pub fn mapping(&self) -> &'static LibraryMapping {
        self.mapping
    }

    /// Register a handler that takes precedence over the built-in table
    /// for `rule_name`.
    pub fn register(&mut self, rule_name: impl Into<String>, handler: CustomRuleHandler) {
        self.custom.insert(rule_name.into(), handler);
    }

    pub fn has_custom(&self, rule_name: &str) -> bool {
        self.custom.contains_key(rule_name)
    }

    /// True when the rule must round-trip to the server and no custom
    /// handler overrides it.
    pub fn is_remote(&self, rule_name: &str) -> bool {
        self.mapping.is_remote(rule_name)
    }

    pub fn convert(&self, ctx: &ConversionContext) -> Vec<(String, String)> {
        if let Some(handler) = self.custom.get(&ctx.rule.name) {
            return handler(ctx);
        }
        if let Some(handler) = self.mapping.rules.get(ctx.rule.name.as_str()) {
            return handler(ctx);
        }
        (self.mapping.default)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx_specs(token: &str) -> ValidationRuleSpec {
        ValidationRuleSpec::parse(token)
    }

    #[test]
    fn test_dispatch_prefers_custom_handler() {
        let mut converter = RuleConverter::new(&jquery::MAPPING);
        converter.register(
            "required",
            Box::new(|_ctx| vec![("data-custom".to_string(), "yes".to_string())]),
        );

        let spec = ctx_specs("required");
        let ctx = ConversionContext {
            rule: &spec,
            field: "name",
            class: ValueClass::Text,
        };
        assert_eq!(
            converter.convert(&ctx),
            vec![("data-custom".to_string(), "yes".to_string())]
        );
    }

    #[test]
    fn test_dispatch_falls_back_to_builtin() {
        let converter = RuleConverter::new(&jquery::MAPPING);
        let spec = ctx_specs("email");
        let ctx = ConversionContext {
            rule: &spec,
            field: "email",
            class: ValueClass::Text,
        };
        assert_eq!(
            converter.convert(&ctx),
            vec![("data-rule-email".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_unknown_rule_uses_default_handler() {
        let converter = RuleConverter::new(&jquery::MAPPING);
        let spec = ctx_specs("starts_with:foo,bar");
        let ctx = ConversionContext {
            rule: &spec,
            field: "slug",
            class: ValueClass::Text,
        };
        // Never an error: unmapped rules emit a generic directive.
        assert_eq!(
            converter.convert(&ctx),
            vec![("data-rule-starts_with".to_string(), "foo,bar".to_string())]
        );
    }

    #[test]
    fn test_directives_do_not_overwrite_across_rules() {
        let mut directives = Directives::new();
        directives.insert("max", "maxlength".to_string(), "20".to_string());
        directives.insert("size", "maxlength".to_string(), "5".to_string());
        assert_eq!(directives.get("maxlength"), Some("20"));
    }

    #[test]
    fn test_directives_same_rule_replaces_its_own_attribute() {
        let mut directives = Directives::new();
        directives.insert("max", "maxlength".to_string(), "20".to_string());
        directives.insert("max", "maxlength".to_string(), "10".to_string());
        assert_eq!(directives.get("maxlength"), Some("10"));
    }
}
