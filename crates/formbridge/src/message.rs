// File: src/message.rs
// Purpose: Localized message directives with catalog fallback

use std::collections::HashMap;

use crate::convert::{ConversionContext, CustomRuleHandler, LibraryMapping};
use crate::infer::ValueClass;

/// Message templates, keyed three ways with falling precedence:
/// `"field.rule"` for a field-specific override, `"rule.<class>"` for a
/// value-class variant, then `"rule"` for the generic template.
///
/// Bound rules carry numeric/string variants because the client
/// validators measure different quantities for each class.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCatalog {
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        for (key, template) in DEFAULT_TEMPLATES {
            templates.insert(key.to_string(), template.to_string());
        }
        Self { templates }
    }

    /// Catalog with caller templates layered over the defaults.
    pub fn with_templates(overrides: HashMap<String, String>) -> Self {
        let mut catalog = Self::new();
        catalog.templates.extend(overrides);
        catalog
    }

    /// Add or replace one template. Keys follow the lookup scheme above.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    fn lookup(&self, field: &str, rule: &str, class: ValueClass) -> Option<&String> {
        let variant = match class {
            ValueClass::Numeric => "numeric",
            ValueClass::Array => "array",
            ValueClass::Text => "string",
        };
        self.templates
            .get(&format!("{}.{}", field, rule))
            .or_else(|| self.templates.get(&format!("{}.{}", rule, variant)))
            .or_else(|| self.templates.get(rule))
    }

    /// Resolved, substituted message for one rule on one field, or
    /// `None` when the catalog has no matching template.
    pub fn message(&self, ctx: &ConversionContext) -> Option<String> {
        self.lookup(ctx.field, &ctx.rule.name, ctx.class)
            .map(|template| substitute(template, ctx))
    }
}

/// Human-readable field label: `user_name` becomes `user name`.
pub fn humanize(field: &str) -> String {
    field.replace(['_', '-'], " ")
}

fn substitute(template: &str, ctx: &ConversionContext) -> String {
    let mut out = template.replace(":attribute", &humanize(ctx.field));

    match ctx.rule.name.as_str() {
        "min" => out = out.replace(":min", ctx.rule.param(0)),
        "max" => out = out.replace(":max", ctx.rule.param(0)),
        "between" => {
            out = out
                .replace(":min", ctx.rule.param(0))
                .replace(":max", ctx.rule.param(1));
        }
        "size" => out = out.replace(":size", ctx.rule.param(0)),
        "same" | "different" => out = out.replace(":other", &humanize(ctx.rule.param(0))),
        _ => {}
    }

    if out.contains(":values") {
        out = out.replace(":values", &ctx.rule.parameters.join(", "));
    }

    out
}

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("required", "The :attribute field is required."),
    ("email", "The :attribute must be a valid email address."),
    ("url", "The :attribute format is invalid."),
    ("integer", "The :attribute must be an integer."),
    ("numeric", "The :attribute must be a number."),
    ("date", "The :attribute is not a valid date."),
    ("ip", "The :attribute must be a valid IP address."),
    ("alpha", "The :attribute may only contain letters."),
    ("alpha_num", "The :attribute may only contain letters and numbers."),
    ("regex", "The :attribute format is invalid."),
    ("same", "The :attribute and :other must match."),
    ("different", "The :attribute and :other must be different."),
    ("unique", "The :attribute has already been taken."),
    ("exists", "The selected :attribute is invalid."),
    ("active_url", "The :attribute is not a valid URL."),
    ("image", "The :attribute must be an image."),
    ("mimes", "The :attribute must be a file of type: :values."),
    ("array", "The :attribute must be an array."),
    ("min.numeric", "The :attribute must be at least :min."),
    ("min.string", "The :attribute must be at least :min characters."),
    ("min.array", "The :attribute must have at least :min items."),
    ("max.numeric", "The :attribute may not be greater than :max."),
    ("max.string", "The :attribute may not be greater than :max characters."),
    ("max.array", "The :attribute may not have more than :max items."),
    ("between.numeric", "The :attribute must be between :min and :max."),
    ("between.string", "The :attribute must be between :min and :max characters."),
    ("between.array", "The :attribute must have between :min and :max items."),
    ("size.numeric", "The :attribute must be :size."),
    ("size.string", "The :attribute must be :size characters."),
    ("size.array", "The :attribute must contain :size items."),
];

/// Produces the message directive for each converted rule.
///
/// Same dispatch shape as the rule converter: a caller-registered custom
/// handler wins, then the catalog supplies the text keyed by the
/// library's message attribute. No template means no directive; a
/// missing message is not an error.
pub struct MessageConverter {
    mapping: &'static LibraryMapping,
    catalog: MessageCatalog,
    custom: HashMap<String, CustomRuleHandler>,
    enabled: bool,
}

impl MessageConverter {
    pub fn new(mapping: &'static LibraryMapping, catalog: MessageCatalog, enabled: bool) -> Self {
        Self {
            mapping,
            catalog,
            custom: HashMap::new(),
            enabled,
        }
    }

    pub fn register(&mut self, rule_name: impl Into<String>, handler: CustomRuleHandler) {
        self.custom.insert(rule_name.into(), handler);
    }

    pub fn catalog_mut(&mut self) -> &mut MessageCatalog {
        &mut self.catalog
    }

    pub fn convert(&self, ctx: &ConversionContext) -> Vec<(String, String)> {
        if !self.enabled {
            return Vec::new();
        }
        if let Some(handler) = self.custom.get(&ctx.rule.name) {
            return handler(ctx);
        }
        match self.catalog.message(ctx) {
            Some(text) => vec![((self.mapping.message_key)(ctx), text)],
            None => Vec::new(),
        }
    }
}
