//! Utility-class candidates: parse class strings such as
//! `hover:bg-red-500/50` into structured candidates, print them back in
//! canonical form, and resolve them against a theme and a registry of
//! utility and variant generators to produce CSS.

pub mod candidate;
pub mod config;
pub mod css;
pub mod defaults;
pub mod design_system;
pub mod error;
pub mod infer;
pub mod migrate;
pub mod printer;
pub mod theme;
pub mod utilities;
pub mod variants;

pub use candidate::{
    Candidate, CandidateKind, CandidateValue, Modifier, Variant, VariantValue, parse_candidate,
    parse_variant, segment,
};
pub use classforge_core::ValueAstNode;
pub use css::{CssNode, Declaration};
pub use design_system::{DesignSystem, DesignSystemBuilder, HandlerOutcome};
pub use error::{ConfigError, RegistrationError};
pub use infer::DataType;
pub use migrate::{RawCandidate, ThemeContext};
pub use printer::{print_candidate, print_variant};
pub use theme::Theme;
pub use utilities::{FunctionalUtility, ModifierPolicy, StaticUtility};
pub use variants::VariantStep;
