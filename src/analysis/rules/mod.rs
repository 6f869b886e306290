pub mod boolean_naming;

pub use boolean_naming::BooleanNamingRule;
