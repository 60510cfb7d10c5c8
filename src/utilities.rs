//! Registry of utility generators.
//!
//! A root may carry several records. They are tried in registration order
//! until one of them produces CSS or rejects the candidate definitively.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::css::CssNode;
use crate::error::RegistrationError;
use crate::infer::DataType;

pub type StaticEmit = Arc<dyn Fn() -> Vec<CssNode> + Send + Sync>;
/// Called with the resolved value and the resolved modifier, if any.
pub type FunctionalEmit = Arc<dyn Fn(&str, Option<&str>) -> Vec<CssNode> + Send + Sync>;
pub type BareValue = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;
pub type FractionValue = Arc<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

/// What a `/modifier` may resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierPolicy {
    None,
    Any,
    Lookup(Vec<(String, String)>),
    /// Named modifiers resolve through these theme namespaces, then the
    /// record's bare-modifier handler. Arbitrary ones are used verbatim.
    Theme(Vec<String>),
}

#[derive(Clone)]
pub struct StaticUtility {
    emit: StaticEmit,
}

impl StaticUtility {
    pub fn new<F>(emit: F) -> Self
    where
        F: Fn() -> Vec<CssNode> + Send + Sync + 'static,
    {
        Self {
            emit: Arc::new(emit),
        }
    }

    pub fn emit(&self) -> Vec<CssNode> {
        (self.emit)()
    }
}

#[derive(Clone)]
pub struct FunctionalUtility {
    pub types: Vec<DataType>,
    pub supports_negative: bool,
    /// Explicit `name → value` table, consulted before the theme.
    pub values: Vec<(String, String)>,
    /// Theme namespaces a named value is looked up in, e.g. `--color`.
    pub theme_keys: Vec<String>,
    /// `None` means no policy was declared.
    pub modifiers: Option<ModifierPolicy>,
    bare: Option<BareValue>,
    bare_modifier: Option<BareValue>,
    fraction: Option<FractionValue>,
    emit: FunctionalEmit,
}

impl FunctionalUtility {
    pub fn new<F>(emit: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> Vec<CssNode> + Send + Sync + 'static,
    {
        Self {
            types: vec![DataType::Any],
            supports_negative: false,
            values: Vec::new(),
            theme_keys: Vec::new(),
            modifiers: None,
            bare: None,
            bare_modifier: None,
            fraction: None,
            emit: Arc::new(emit),
        }
    }

    pub fn types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = DataType>,
    {
        self.types = types.into_iter().collect();
        if self.types.is_empty() {
            self.types.push(DataType::Any);
        }
        self
    }

    pub fn supports_negative(mut self, supported: bool) -> Self {
        self.supports_negative = supported;
        self
    }

    pub fn values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self
    }

    pub fn theme_keys<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.theme_keys = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn modifiers(mut self, policy: ModifierPolicy) -> Self {
        self.modifiers = Some(policy);
        self
    }

    /// Turns a named value that is not in any table into a CSS value.
    pub fn bare<F>(mut self, bare: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.bare = Some(Arc::new(bare));
        self
    }

    /// Turns a named modifier that no theme namespace knows into a CSS value.
    pub fn bare_modifier<F>(mut self, bare: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.bare_modifier = Some(Arc::new(bare));
        self
    }

    /// Turns `value/modifier` into a single CSS value, consuming the modifier.
    pub fn fraction<F>(mut self, fraction: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.fraction = Some(Arc::new(fraction));
        self
    }

    pub fn accepts(&self, data_type: DataType) -> bool {
        self.types.contains(&data_type)
    }

    pub fn is_color(&self) -> bool {
        self.accepts(DataType::Color)
    }

    /// Whether this record accepts every value through `any` alone.
    pub fn accepts_only_any(&self) -> bool {
        self.types.iter().all(|data_type| *data_type == DataType::Any)
    }

    pub fn bare_value(&self, value: &str) -> Option<String> {
        self.bare.as_ref().and_then(|bare| bare(value))
    }

    pub fn bare_modifier_value(&self, modifier: &str) -> Option<String> {
        self.bare_modifier
            .as_ref()
            .and_then(|bare| bare(modifier))
    }

    pub fn fraction_value(&self, numerator: &str, denominator: &str) -> Option<String> {
        self.fraction
            .as_ref()
            .and_then(|fraction| fraction(numerator, denominator))
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn emit(&self, value: &str, modifier: Option<&str>) -> Vec<CssNode> {
        (self.emit)(value, modifier)
    }
}

impl fmt::Debug for FunctionalUtility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionalUtility")
            .field("types", &self.types)
            .field("supports_negative", &self.supports_negative)
            .field("values", &self.values.len())
            .field("theme_keys", &self.theme_keys)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for StaticUtility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticUtility").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum UtilityRecord {
    Static(StaticUtility),
    Functional(FunctionalUtility),
}

#[derive(Debug, Clone, Default)]
pub struct Utilities {
    records: HashMap<String, Vec<UtilityRecord>>,
}

impl Utilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_static(
        &mut self,
        name: &str,
        utility: StaticUtility,
    ) -> Result<(), RegistrationError> {
        validate_utility_name(name)?;
        self.push(name, UtilityRecord::Static(utility));
        Ok(())
    }

    pub fn register_functional(
        &mut self,
        name: &str,
        utility: FunctionalUtility,
    ) -> Result<(), RegistrationError> {
        validate_utility_name(name)?;
        self.push(name, UtilityRecord::Functional(utility));
        Ok(())
    }

    fn push(&mut self, name: &str, record: UtilityRecord) {
        self.records
            .entry(name.to_string())
            .or_default()
            .push(record);
    }

    pub fn has(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn statics(&self, name: &str) -> Vec<&StaticUtility> {
        self.records
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|record| match record {
                UtilityRecord::Static(utility) => Some(utility),
                UtilityRecord::Functional(_) => None,
            })
            .collect()
    }

    pub fn functionals(&self, name: &str) -> Vec<&FunctionalUtility> {
        self.records
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|record| match record {
                UtilityRecord::Functional(utility) => Some(utility),
                UtilityRecord::Static(_) => None,
            })
            .collect()
    }
}

/// `^[a-z][a-zA-Z0-9/%._-]*$`
pub fn validate_utility_name(name: &str) -> Result<(), RegistrationError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some('a'..='z'))
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | '%' | '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(RegistrationError::InvalidUtilityName {
            name: name.to_string(),
        })
    }
}
