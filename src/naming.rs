//! Naming strategies for serialized property and enum member names.
//!
//! A naming strategy is any pure `Fn(&str) -> String`. The translator never
//! holds state between calls, so the same raw name always maps to the same
//! serialized name within one traversal.
//!
//! [`NamingConvention`] covers the conventions serde's `rename_all` accepts and
//! doubles as the CLI's `--naming` value.

use clap::ValueEnum;
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};

/// Function from a declared name to its serialized name
pub type NamingStrategy = dyn Fn(&str) -> String + Send + Sync;

/// Built-in naming conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum NamingConvention {
    /// Keep names as declared
    #[default]
    #[value(name = "none")]
    Identity,
    /// camelCase
    #[value(name = "camel")]
    CamelCase,
    /// PascalCase
    #[value(name = "pascal")]
    PascalCase,
    /// snake_case
    #[value(name = "snake")]
    SnakeCase,
    /// SCREAMING_SNAKE_CASE
    #[value(name = "screaming-snake")]
    ScreamingSnakeCase,
    /// kebab-case
    #[value(name = "kebab")]
    KebabCase,
    /// SCREAMING-KEBAB-CASE
    #[value(name = "screaming-kebab")]
    ScreamingKebabCase,
    /// lowercase
    #[value(name = "lower")]
    Lowercase,
    /// UPPERCASE
    #[value(name = "upper")]
    Uppercase,
}

impl NamingConvention {
    /// Maps a serde `rename_all` value to its convention.
    pub fn from_serde(value: &str) -> Option<Self> {
        match value {
            "lowercase" => Some(Self::Lowercase),
            "UPPERCASE" => Some(Self::Uppercase),
            "PascalCase" => Some(Self::PascalCase),
            "camelCase" => Some(Self::CamelCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebabCase),
            _ => None,
        }
    }

    /// Applies the convention to a single name.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Identity => name.to_string(),
            Self::CamelCase => name.to_lower_camel_case(),
            Self::PascalCase => name.to_upper_camel_case(),
            Self::SnakeCase => name.to_snake_case(),
            Self::ScreamingSnakeCase => name.to_shouty_snake_case(),
            Self::KebabCase => name.to_kebab_case(),
            Self::ScreamingKebabCase => name.to_shouty_kebab_case(),
            Self::Lowercase => name.to_lowercase(),
            Self::Uppercase => name.to_uppercase(),
        }
    }

    /// Returns the convention as a boxed naming strategy.
    pub fn strategy(self) -> Box<NamingStrategy> {
        Box::new(move |name: &str| self.apply(name))
    }
}

/// Identity naming strategy
pub fn identity(name: &str) -> String {
    name.to_string()
}

/// camelCase naming strategy
pub fn camel_case(name: &str) -> String {
    NamingConvention::CamelCase.apply(name)
}
