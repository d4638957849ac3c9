// File: src/infer.rs
// Purpose: Deriving a field's value class from its full rule set

use crate::rule::ValidationRuleSpec;

/// Value class a rule set implies for a field. Decides whether bound
/// rules (min/max/between/size) constrain magnitude or length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueClass {
    Numeric,
    Array,
    #[default]
    Text,
}

/// Rule names that mark a field as numeric.
const NUMERIC_RULES: [&str; 2] = ["integer", "numeric"];

/// First-match classifier over the parsed rules, in original order.
///
/// The first rule that qualifies for a class wins; later rules cannot
/// change the answer. Runs once per field, before any per-rule
/// conversion — never per rule.
pub fn infer_value_class(rules: &[ValidationRuleSpec]) -> ValueClass {
    for rule in rules {
        if NUMERIC_RULES.contains(&rule.name.as_str()) {
            return ValueClass::Numeric;
        }
        if rule.name == "array" {
            return ValueClass::Array;
        }
    }

    ValueClass::Text
}
