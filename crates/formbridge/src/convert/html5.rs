// File: src/convert/html5.rs
// Purpose: Native HTML5 constraint-attribute mapping

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{ConversionContext, LibraryMapping, RuleHandler};
use crate::infer::ValueClass;

/// Mapping table for browsers' built-in constraint validation. No
/// plugin required; directives are the native `required`, `type`,
/// `min`/`max`/`maxlength` and `pattern` attributes.
pub static MAPPING: Lazy<LibraryMapping> = Lazy::new(|| {
    let mut rules: HashMap<&'static str, RuleHandler> = HashMap::new();
    rules.insert("required", required);
    rules.insert("email", email);
    rules.insert("url", url);
    rules.insert("integer", integer);
    rules.insert("numeric", numeric);
    rules.insert("date", date);
    rules.insert("regex", regex);
    rules.insert("image", image);
    rules.insert("mimes", mimes);
    rules.insert("min", min);
    rules.insert("max", max);
    rules.insert("between", between);
    rules.insert("size", size);

    LibraryMapping {
        name: "html5",
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
    one("required", "required")
}

fn email(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("type", "email")
}

fn url(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("type", "url")
}

fn integer(_ctx: &ConversionContext) -> Vec<(String, String)> {
    vec![
        ("type".to_string(), "number".to_string()),
        ("step".to_string(), "1".to_string()),
    ]
}

fn numeric(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("type", "number")
}

fn date(_ctx: &ConversionContext) -> Vec<(String, String)> {
    one("type", "date")
}

/// HTML5 `pattern` takes a bare regular expression, so a
/// delimiter-wrapped literal is unwrapped and its flags dropped.
fn regex(ctx: &ConversionContext) -> Vec<(String, String)> {
    one("pattern", strip_delimiters(ctx.rule.param(0)))
}

fn strip_delimiters(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            return rest[..end].to_string();
        }
    }
    raw.to_string()
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
        ValueClass::Numeric => one("min", ctx.rule.param(0)),
        _ => one("minlength", ctx.rule.param(0)),
    }
}

fn max(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => one("max", ctx.rule.param(0)),
        _ => one("maxlength", ctx.rule.param(0)),
    }
}

fn between(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => vec![
            ("min".to_string(), ctx.rule.param(0).to_string()),
            ("max".to_string(), ctx.rule.param(1).to_string()),
        ],
        _ => vec![
            ("minlength".to_string(), ctx.rule.param(0).to_string()),
            ("maxlength".to_string(), ctx.rule.param(1).to_string()),
        ],
    }
}

fn size(ctx: &ConversionContext) -> Vec<(String, String)> {
    match ctx.class {
        ValueClass::Numeric => vec![
            ("min".to_string(), ctx.rule.param(0).to_string()),
            ("max".to_string(), ctx.rule.param(0).to_string()),
        ],
        _ => vec![
            ("minlength".to_string(), ctx.rule.param(0).to_string()),
            ("maxlength".to_string(), ctx.rule.param(0).to_string()),
        ],
    }
}

fn remote(_ctx: &ConversionContext, url: &str) -> Vec<(String, String)> {
    one("data-remote", url)
}

fn default_directive(ctx: &ConversionContext) -> Vec<(String, String)> {
    let value = if ctx.rule.parameters.is_empty() {
        "true".to_string()
    } else {
        ctx.rule.parameters.join(",")
    };
    one(format!("data-{}", ctx.rule.name), value)
}

fn message_key(ctx: &ConversionContext) -> String {
    format!("data-msg-{}", ctx.rule.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ValidationRuleSpec;
    use pretty_assertions::assert_eq;

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

    #[test]
    fn test_email_maps_to_input_type() {
        assert_eq!(convert("email", ValueClass::Text), vec![("type".to_string(), "email".to_string())]);
    }

    #[test]
    fn test_integer_constrains_step() {
        assert_eq!(
            convert("integer", ValueClass::Numeric),
            vec![
                ("type".to_string(), "number".to_string()),
                ("step".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_pattern_strips_delimiters_and_flags() {
        assert_eq!(
            convert("regex:/^[a-z]+$/i", ValueClass::Text),
            vec![("pattern".to_string(), "^[a-z]+$".to_string())]
        );
        assert_eq!(
            convert("regex:^[0-9]+$", ValueClass::Text),
            vec![("pattern".to_string(), "^[0-9]+$".to_string())]
        );
    }

    #[test]
    fn test_unknown_rule_gets_data_attribute() {
        assert_eq!(
            convert("accepted", ValueClass::Text),
            vec![("data-accepted".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_max_on_text_is_maxlength() {
        assert_eq!(
            convert("max:20", ValueClass::Text),
            vec![("maxlength".to_string(), "20".to_string())]
        );
        assert_eq!(
            convert("max:20", ValueClass::Numeric),
            vec![("max".to_string(), "20".to_string())]
        );
    }
}
