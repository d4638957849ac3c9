// File: src/rule.rs
// Purpose: Parsing raw validation rule tokens into structured specs

use serde::{Deserialize, Serialize};

/// One parsed validation rule: a name plus its ordered parameters.
///
/// Parsing never rejects a rule. Unknown names are structured just like
/// known ones; semantics are resolved later by the converters, so new
/// server-side rules flow through without a parser change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRuleSpec {
    pub name: String,
    pub parameters: Vec<String>,
}

impl ValidationRuleSpec {
    pub fn new(name: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Parse a colon-delimited rule token, e.g. `"between:1,10"`.
    /// No colon means no parameters.
    pub fn parse(token: &str) -> Self {
        match token.split_once(':') {
            Some((name, params)) => Self {
                name: name.to_string(),
                parameters: params.split(',').map(str::to_string).collect(),
            },
            None => Self {
                name: token.to_string(),
                parameters: Vec::new(),
            },
        }
    }

    /// Parameter at `index`, or `""` when the rule was given fewer.
    pub fn param(&self, index: usize) -> &str {
        self.parameters.get(index).map(String::as_str).unwrap_or("")
    }

    /// Rebuild the canonical `name:p1,p2` form.
    pub fn to_rule_line(&self) -> String {
        if self.parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.name, self.parameters.join(","))
        }
    }
}

/// A raw rule token as supplied by the host application: either an
/// unparsed string or an already-structured spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleToken {
    Raw(String),
    Spec(ValidationRuleSpec),
}

impl RuleToken {
    pub fn to_spec(&self) -> ValidationRuleSpec {
        match self {
            RuleToken::Raw(token) => ValidationRuleSpec::parse(token),
            RuleToken::Spec(spec) => spec.clone(),
        }
    }
}

impl From<&str> for RuleToken {
    fn from(token: &str) -> Self {
        RuleToken::Raw(token.to_string())
    }
}

impl From<String> for RuleToken {
    fn from(token: String) -> Self {
        RuleToken::Raw(token)
    }
}

impl From<ValidationRuleSpec> for RuleToken {
    fn from(spec: ValidationRuleSpec) -> Self {
        RuleToken::Spec(spec)
    }
}

/// Rules for one field, as registered by the host application: either a
/// pipe-delimited line (`"required|max:20"`) or explicit tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleList {
    Line(String),
    Tokens(Vec<RuleToken>),
}

impl RuleList {
    /// Expand into individual tokens, preserving order. Empty segments
    /// from stray pipes are dropped.
    pub fn tokens(&self) -> Vec<RuleToken> {
        match self {
            RuleList::Line(line) => line
                .split('|')
                .filter(|segment| !segment.is_empty())
                .map(RuleToken::from)
                .collect(),
            RuleList::Tokens(tokens) => tokens.clone(),
        }
    }
}

impl From<&str> for RuleList {
    fn from(line: &str) -> Self {
        RuleList::Line(line.to_string())
    }
}

impl From<String> for RuleList {
    fn from(line: String) -> Self {
        RuleList::Line(line)
    }
}

impl From<Vec<RuleToken>> for RuleList {
    fn from(tokens: Vec<RuleToken>) -> Self {
        RuleList::Tokens(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_with_parameters() {
        let spec = ValidationRuleSpec::parse("between:1,10");
        assert_eq!(spec.name, "between");
        assert_eq!(spec.parameters, vec!["1".to_string(), "10".to_string()]);
    }

    #[test]
    fn test_parse_without_parameters() {
        let spec = ValidationRuleSpec::parse("required");
        assert_eq!(spec.name, "required");
        assert!(spec.parameters.is_empty());
    }

    #[test]
    fn test_parse_keeps_colons_inside_parameters() {
        let spec = ValidationRuleSpec::parse("regex:/^\\d+:\\d+$/");
        assert_eq!(spec.name, "regex");
        assert_eq!(spec.parameters, vec!["/^\\d+:\\d+$/".to_string()]);
    }

    #[test]
    fn test_parse_unknown_rule_name_succeeds() {
        let spec = ValidationRuleSpec::parse("no_such_rule:a,b");
        assert_eq!(spec.name, "no_such_rule");
        assert_eq!(spec.parameters.len(), 2);
    }

    #[test]
    fn test_to_rule_line_round_trip() {
        let spec = ValidationRuleSpec::parse("unique:users,email");
        assert_eq!(spec.to_rule_line(), "unique:users,email");
        assert_eq!(ValidationRuleSpec::parse("required").to_rule_line(), "required");
    }

    #[test]
    fn test_rule_list_line_expansion() {
        let list = RuleList::from("required|max:20");
        let tokens = list.tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].to_spec().name, "required");
        assert_eq!(tokens[1].to_spec().name, "max");
        assert_eq!(tokens[1].to_spec().parameters, vec!["20".to_string()]);
    }

    #[test]
    fn test_rule_list_structured_tokens_pass_through() {
        let spec = ValidationRuleSpec::new("min", vec!["3".to_string()]);
        let list = RuleList::from(vec![RuleToken::from(spec.clone())]);
        assert_eq!(list.tokens()[0].to_spec(), spec);
    }

    #[test]
    fn test_rule_list_drops_empty_segments() {
        let list = RuleList::from("required||email|");
        assert_eq!(list.tokens().len(), 2);
    }
}
