// File: src/convert/jquery.rs
// Purpose: jQuery Validation plugin mapping (data-rule-* / data-msg-*)

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{ConversionContext, LibraryMapping, RuleHandler};
use crate::infer::ValueClass;

/// Mapping table for the jQuery Validation plugin. Rule directives land
/// in `data-rule-*` attributes, messages in `data-msg-*`, both picked up
/// by the plugin's data-attribute discovery.
pub static MAPPING: Lazy<LibraryMapping> = Lazy::new(|| {
    let mut rules: HashMap<&'static str, RuleHandler> = HashMap::new();
    rules.insert("required", required);
    rules.insert("email", email);
    rules.insert("url", url);
    rules.insert("integer", integer);
    rules.insert("numeric", numeric);
    rules.insert("ip", ip);
    rules.insert("date", date);
    rules.insert("same", same);
    rules.insert("different", different);
    rules.insert("regex", regex);
    rules.insert("alpha", alpha);
    rules.insert("alpha_num", alpha_num);
    rules.insert("image", image);
    rules.insert("mimes", mimes);
    rules.insert("min", min);
    rules.insert("max", max);
    rules.insert("between", between);
    rules.insert("size", size);

    LibraryMapping {
        name: "jquery",
        rules,
        remote_rules: &["unique", "exists", "active_url"],
        remote,
        default: default_directive,
        message_key,
    }
});

fn one(key: impl Into<String>, value: impl Into<String>) -> Vec<(String, String)> {
    vec![(key.into(), value.into())]
}

fn required(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-required", "true")
}

fn email(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-email", "true")
}

fn url(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-url", "true")
}

fn integer(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-integer", "true")
}

fn numeric(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-number", "true")
}

fn ip(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-ipv4", "true")
}

fn date(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-date", "true")
}

fn same(ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-equalto", format!("[name='{}']", ctx.rule.param(0)))
}

fn different(ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-notequalto", format!("[name='{}']", ctx.rule.param(0)))
}

/// The pattern travels as a delimiter-wrapped literal (`/pat/flags`);
/// the client runtime compiles it into a native RegExp.
fn regex(ctx: &ConversionContext) -> Vec<(String, String)> {
    let raw = ctx.rule.param(0);
    let literal = if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{}/", raw)
    };
    one("data-rule-regex", literal)
}

fn alpha(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-regex", "/^[A-Za-z _.-]+$/")
}

fn alpha_num(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("data-rule-regex", "/^[A-Za-z0-9 _.-]+$/")
}

fn image(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("accept", "image/*")
}

fn mimes(ctx: &ConversionContext) -> Vec<(String, String)> {
    let accept = ctx
        .rule
        .parameters
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");
    one("accept", accept)
}

fn min(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => one("data-rule-min", ctx.rule.param(0)),
        _ => one("data-rule-minlength", ctx.rule.param(0)),
    }
}

fn max(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => one("data-rule-max", ctx.rule.param(0)),
        _ => one("data-rule-maxlength", ctx.rule.param(0)),
    }
}

fn between(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => vec![
            ("data-rule-min".to_string(), ctx.rule.param(0).to_string()),
            ("data-rule-max".to_string(), ctx.rule.param(1).to_string()),
        ],
        _ => vec![
            ("data-rule-minlength".to_string(), ctx.rule.param(0).to_string()),
            ("data-rule-maxlength".to_string(), ctx.rule.param(1).to_string()),
        ],
    }
}

fn size(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => vec![
            ("data-rule-min".to_string(), ctx.rule.param(0).to_string()),
            ("data-rule-max".to_string(), ctx.rule.param(0).to_string()),
        ],
        _ => vec![
            ("data-rule-minlength".to_string(), ctx.rule.param(0).to_string()),
            ("data-rule-maxlength".to_string(), ctx.rule.param(0).to_string()),
        ],
    }
}

fn remote(_ctx: &ConversionContext, url: &str) -> Vec<(String, String)> {
    one("data-rule-remote", url)
}

fn default_directive(ctx: &ConversionContext) -> Vec<(String, String)> {
    let value = if ctx.rule.parameters.is_empty() {
        "true".to_string()
    } else {
        ctx.rule.parameters.join(",")
    };
    one(format!("data-rule-{}", ctx.rule.name), value)
}

/// The message attribute must be keyed by the *client* rule name, which
/// sometimes differs from the server rule name.
fn message_key(ctx: &ConversionContext) -> String {
    let client_rule = match ctx.rule.name.as_str() {
        "numeric" => "number",
        "ip" => "ipv4",
        "same" => "equalto",
        "different" => "notequalto",
        "alpha" | "alpha_num" => "regex",
        "unique" | "exists" | "active_url" => "remote",
        "min" if ctx.class != ValueClass::Numeric => "minlength",
        "max" if ctx.class != ValueClass::Numeric => "maxlength",
        other => other,
    };
    format!("data-msg-{}", client_rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ValidationRuleSpec;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn convert(token: &str, class: ValueClass) -> Vec<(String, String)> {
        let spec = ValidationRuleSpec::parse(token);
        let ctx = ConversionContext {
            rule: &spec,
            field: "field",
            class,
        };
        match MAPPING.rules.get(spec.name.as_str()) {
            Some(handler) => handler(&ctx),
            None => (MAPPING.default)(&ctx),
        }
    }

    #[rstest]
    #[case("min:3", ValueClass::Numeric, "data-rule-min", "3")]
    #[case("min:3", ValueClass::Text, "data-rule-minlength", "3")]
    #[case("max:10", ValueClass::Numeric, "data-rule-max", "10")]
    #[case("max:10", ValueClass::Text, "data-rule-maxlength", "10")]
    #[case("max:10", ValueClass::Array, "data-rule-maxlength", "10")]
    fn test_bound_rules_split_on_value_class(
        #[case] token: &str,
        #[case] class: ValueClass,
        #[case] key: &str,
        #[case] value: &str,
    ) {
        assert_eq!(convert(token, class), vec![(key.to_string(), value.to_string())]);
    }

    #[test]
    fn test_between_emits_both_bounds() {
        assert_eq!(
            convert("between:2,8", ValueClass::Text),
            vec![
                ("data-rule-minlength".to_string(), "2".to_string()),
                ("data-rule-maxlength".to_string(), "8".to_string()),
            ]
        );
    }

    #[test]
    fn test_regex_literal_passes_through() {
        assert_eq!(
            convert("regex:/^[a-z]+$/i", ValueClass::Text),
            vec![("data-rule-regex".to_string(), "/^[a-z]+$/i".to_string())]
        );
    }

    #[test]
    fn test_bare_regex_gets_wrapped() {
        assert_eq!(
            convert("regex:^[a-z]+$", ValueClass::Text),
            vec![("data-rule-regex".to_string(), "/^[a-z]+$/".to_string())]
        );
    }

    #[test]
    fn test_same_targets_other_field_by_name() {
        assert_eq!(
            convert("same:password", ValueClass::Text),
            vec![("data-rule-equalto".to_string(), "[name='password']".to_string())]
        );
    }

    #[test]
    fn test_mimes_builds_accept_list() {
        assert_eq!(
            convert("mimes:png,jpg", ValueClass::Text),
            vec![("accept".to_string(), ".png,.jpg".to_string())]
        );
    }

    #[test]
    fn test_remote_rules_are_flagged() {
        assert!(MAPPING.is_remote("unique"));
        assert!(MAPPING.is_remote("exists"));
        assert!(!MAPPING.is_remote("required"));
    }

    #[test]
    fn test_message_key_uses_client_rule_name() {
        let spec = ValidationRuleSpec::parse("numeric");
        let ctx = ConversionContext {
            rule: &spec,
            field: "age",
            class: ValueClass::Numeric,
        };
        assert_eq!((MAPPING.message_key)(&ctx), "data-msg-number");

        let spec = ValidationRuleSpec::parse("max:20");
        let ctx = ConversionContext {
            rule: &spec,
            field: "name",
            class: ValueClass::Text,
        };
        assert_eq!((MAPPING.message_key)(&ctx), "data-msg-maxlength");
    }
}
