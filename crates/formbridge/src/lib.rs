// Formbridge - authoritative validation rules, enforced client-side
// Converts server-side rule sets into client validation attributes and
// brokers remote re-validation through a signed parameter token.

pub mod bridge;
pub mod config;
pub mod convert;
pub mod engine;
pub mod infer;
pub mod message;
pub mod rule;
pub mod store;
pub mod token;

// Re-export the conversion engine and its building blocks
pub use engine::FormBridge;
pub use config::{FormbridgeConfig, TargetLibrary};
pub use rule::{RuleList, RuleToken, ValidationRuleSpec};
pub use infer::{infer_value_class, ValueClass};
pub use convert::{ConversionContext, CustomRuleHandler, Directives, LibraryMapping, RuleConverter};
pub use message::{humanize, MessageCatalog, MessageConverter};
pub use store::{FieldRuleSet, FormRuleStore};

// Re-export the remote validation surface
pub use bridge::{
    AuthoritativeValidator, BridgeError, RemoteOutcome, RemoteRequest, RemoteValidationBridge,
    Verdict,
};
pub use token::{ParameterToken, TokenError, TokenSecret};
