//! The design system: theme tokens plus the utility and variant registries,
//! and the engine that resolves parsed candidates against them.

use log::{debug, trace, warn};

use crate::candidate::{
    Candidate, CandidateKind, CandidateValue, Modifier, VariantValue, parse_candidate,
};
use crate::css::{CssNode, decl};
use crate::defaults;
use crate::error::RegistrationError;
use crate::infer::{DataType, infer_data_type};
use crate::printer::print_candidate;
use crate::theme::{DEFAULT_KEY, Theme};
use crate::utilities::{FunctionalUtility, ModifierPolicy, StaticUtility, Utilities};
use crate::variants::{VariantStep, Variants};

/// Result of offering a candidate to one generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Matched(Vec<CssNode>),
    /// With `retry` the next generator for the same root gets a chance;
    /// without it resolution stops and the candidate produces nothing.
    Rejected { retry: bool },
}

#[derive(Debug, Clone)]
pub struct DesignSystem {
    prefix: Option<String>,
    theme: Theme,
    utilities: Utilities,
    variants: Variants,
}

#[derive(Debug, Clone)]
pub struct DesignSystemBuilder {
    prefix: Option<String>,
    theme: Theme,
    utilities: Utilities,
    variants: Variants,
    breakpoints: bool,
}

impl DesignSystemBuilder {
    /// A builder with empty registries.
    pub fn new(theme: Theme) -> Self {
        Self {
            prefix: None,
            theme,
            utilities: Utilities::new(),
            variants: Variants::new(),
            breakpoints: false,
        }
    }

    /// A builder with the built-in utilities and variants registered.
    /// Breakpoint variants are derived from the theme when the system is built.
    pub fn with_defaults(theme: Theme) -> Result<Self, RegistrationError> {
        let mut builder = Self::new(theme);
        defaults::register_utilities(&mut builder.utilities)?;
        defaults::register_variants(&mut builder.variants)?;
        builder.breakpoints = true;
        Ok(builder)
    }

    pub fn prefix(mut self, prefix: &str) -> Result<Self, RegistrationError> {
        if prefix.is_empty() || !prefix.chars().all(|ch| ch.is_ascii_lowercase()) {
            return Err(RegistrationError::InvalidPrefix {
                prefix: prefix.to_string(),
            });
        }
        self.prefix = Some(prefix.to_string());
        Ok(self)
    }

    pub fn static_utility<F>(&mut self, name: &str, emit: F) -> Result<&mut Self, RegistrationError>
    where
        F: Fn() -> Vec<CssNode> + Send + Sync + 'static,
    {
        self.utilities
            .register_static(name, StaticUtility::new(emit))?;
        Ok(self)
    }

    pub fn functional_utility(
        &mut self,
        name: &str,
        utility: FunctionalUtility,
    ) -> Result<&mut Self, RegistrationError> {
        self.utilities.register_functional(name, utility)?;
        Ok(self)
    }

    pub fn static_variant<I, S>(&mut self, name: &str, templates: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variants.register_static(name, templates)?;
        Ok(self)
    }

    pub fn functional_variant<F>(&mut self, name: &str, handler: F) -> Result<&mut Self, RegistrationError>
    where
        F: Fn(Option<&VariantValue>, Option<&Modifier>, &Theme) -> Option<Vec<VariantStep>>
            + Send
            + Sync
            + 'static,
    {
        self.variants.register_functional(name, handler)?;
        Ok(self)
    }

    pub fn compound_variant<F>(&mut self, name: &str, handler: F) -> Result<&mut Self, RegistrationError>
    where
        F: Fn(&[VariantStep], Option<&Modifier>) -> Option<Vec<VariantStep>> + Send + Sync + 'static,
    {
        self.variants.register_compound(name, handler)?;
        Ok(self)
    }

    pub fn build(mut self) -> DesignSystem {
        if self.breakpoints {
            for (name, value) in self.theme.namespace("--breakpoint") {
                if self.variants.has(&name) {
                    continue;
                }
                let template = format!("@media (width >= {value})");
                if let Err(err) = self.variants.register_static(&name, [template]) {
                    warn!("skipping breakpoint: {err}");
                }
            }
        }

        DesignSystem {
            prefix: self.prefix,
            theme: self.theme,
            utilities: self.utilities,
            variants: self.variants,
        }
    }
}

impl DesignSystem {
    /// The default theme with the built-in utilities and variants.
    pub fn with_defaults() -> Result<Self, RegistrationError> {
        Ok(DesignSystemBuilder::with_defaults(Theme::with_defaults())?.build())
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn utilities(&self) -> &Utilities {
        &self.utilities
    }

    pub fn variants(&self) -> &Variants {
        &self.variants
    }

    pub fn parse_candidate(&self, raw: &str) -> Option<Candidate> {
        parse_candidate(raw, self.prefix())
    }

    pub fn print_candidate(&self, candidate: &Candidate) -> String {
        print_candidate(self.prefix(), candidate)
    }

    /// Declarations for the candidate's base utility, without variants.
    pub fn resolve(&self, candidate: &Candidate) -> Option<Vec<CssNode>> {
        let nodes = match &candidate.kind {
            CandidateKind::Static { root, negative } => self.resolve_static(root, *negative),
            CandidateKind::Functional {
                root,
                value,
                modifier,
                negative,
            } => self.resolve_functional(root, value.as_ref(), modifier.as_ref(), *negative),
            CandidateKind::Arbitrary {
                property,
                value,
                modifier,
            } => resolve_arbitrary_property(property, value, modifier.as_ref()),
        };

        let Some(mut nodes) = nodes else {
            debug!("`{}` matched no utility", self.print_candidate(candidate));
            return None;
        };
        if candidate.important {
            nodes.iter_mut().for_each(CssNode::mark_important);
        }
        Some(nodes)
    }

    /// Full CSS for a raw class string, variants applied.
    pub fn compile(&self, raw: &str) -> Option<Vec<CssNode>> {
        let candidate = self.parse_candidate(raw)?;
        let nodes = self.resolve(&candidate)?;
        let compiled = self
            .variants
            .apply(&candidate.variants, raw, nodes, &self.theme);
        if compiled.is_none() {
            debug!("`{raw}` uses an unknown variant");
        }
        compiled
    }

    /// One stylesheet fragment per input, `None` where the input produces no CSS.
    pub fn candidates_to_css(&self, raws: &[&str]) -> Vec<Option<String>> {
        raws.iter()
            .map(|raw| {
                self.compile(raw).map(|nodes| {
                    nodes
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            })
            .collect()
    }

    fn resolve_static(&self, root: &str, negative: bool) -> Option<Vec<CssNode>> {
        if !negative {
            if let Some(utility) = self.utilities.statics(root).first() {
                return Some(utility.emit());
            }
        }
        self.resolve_functional(root, None, None, negative)
    }

    fn resolve_functional(
        &self,
        root: &str,
        value: Option<&CandidateValue>,
        modifier: Option<&Modifier>,
        negative: bool,
    ) -> Option<Vec<CssNode>> {
        let Some(CandidateValue::Named(named)) = value else {
            return match self.run_handlers(root, value, modifier, negative) {
                HandlerOutcome::Matched(nodes) => Some(nodes),
                HandlerOutcome::Rejected { .. } => None,
            };
        };

        let full = format!("{root}-{named}");
        if !negative {
            let static_name = match modifier {
                None => Some(full.clone()),
                Some(Modifier::Named(modifier)) => Some(format!("{full}/{modifier}")),
                Some(Modifier::Arbitrary(_)) => None,
            };
            if let Some(utility) = static_name
                .and_then(|name| self.utilities.statics(&name).first().copied())
            {
                return Some(utility.emit());
            }
        }

        // `bg-red-500` parses as `bg-red` + `500`; try the longest registered root first.
        for (idx, _) in full.match_indices('-').rev() {
            let root = &full[..idx];
            if !self.utilities.has(root) {
                continue;
            }
            let value = CandidateValue::Named(full[idx + 1..].to_string());
            match self.run_handlers(root, Some(&value), modifier, negative) {
                HandlerOutcome::Matched(nodes) => return Some(nodes),
                HandlerOutcome::Rejected { retry: true } => continue,
                HandlerOutcome::Rejected { retry: false } => return None,
            }
        }
        None
    }

    /// Offers the candidate to every functional generator of `root` in turn.
    fn run_handlers(
        &self,
        root: &str,
        value: Option<&CandidateValue>,
        modifier: Option<&Modifier>,
        negative: bool,
    ) -> HandlerOutcome {
        let mut handlers = self.utilities.functionals(root);

        // Generators that accept an untyped arbitrary value through a concrete
        // type go before the ones that only take it through `any`.
        if let Some(CandidateValue::Arbitrary {
            value,
            data_type: None,
        }) = value
        {
            handlers.sort_by_key(|handler| {
                let concrete = handler
                    .types
                    .iter()
                    .copied()
                    .filter(|data_type| *data_type != DataType::Any)
                    .collect::<Vec<_>>();
                infer_data_type(value, &concrete).is_none()
            });
        }

        for (idx, handler) in handlers.iter().enumerate() {
            trace!("offering `{root}` to generator {idx}");
            match self.run_handler(handler, value, modifier, negative) {
                HandlerOutcome::Matched(nodes) => return HandlerOutcome::Matched(nodes),
                HandlerOutcome::Rejected { retry: true } => continue,
                HandlerOutcome::Rejected { retry: false } => {
                    debug!("`{root}` generator {idx} rejected the candidate definitively");
                    return HandlerOutcome::Rejected { retry: false };
                }
            }
        }
        HandlerOutcome::Rejected { retry: true }
    }

    fn run_handler(
        &self,
        handler: &FunctionalUtility,
        value: Option<&CandidateValue>,
        modifier: Option<&Modifier>,
        negative: bool,
    ) -> HandlerOutcome {
        const RETRY: HandlerOutcome = HandlerOutcome::Rejected { retry: true };

        if negative && !handler.supports_negative {
            return RETRY;
        }

        let mut modifier = modifier;
        let (mut resolved, data_type) = match value {
            None => match self.lookup_named(handler, None) {
                Some(resolved) => (resolved, None),
                None => return RETRY,
            },
            Some(CandidateValue::Named(named)) => {
                let fraction = match modifier {
                    Some(Modifier::Named(denominator)) => handler.fraction_value(named, denominator),
                    _ => None,
                };
                match fraction {
                    Some(resolved) => {
                        modifier = None;
                        (resolved, None)
                    }
                    None => match self.lookup_named(handler, Some(named)) {
                        Some(resolved) => (resolved, None),
                        None => return RETRY,
                    },
                }
            }
            Some(CandidateValue::Arbitrary {
                value,
                data_type: Some(hint),
            }) => {
                let data_type = match hint.parse::<DataType>() {
                    Ok(data_type) if handler.accepts(data_type) => data_type,
                    _ if handler.accepts_only_any() => DataType::Any,
                    _ => return RETRY,
                };
                (value.clone(), Some(data_type))
            }
            Some(CandidateValue::Arbitrary {
                value,
                data_type: None,
            }) => match infer_data_type(value, &handler.types) {
                Some(data_type) => (value.clone(), Some(data_type)),
                None => return RETRY,
            },
        };

        let is_color = match data_type {
            Some(data_type) => data_type == DataType::Color,
            None => handler.is_color(),
        };

        let resolved_modifier = match modifier {
            None => None,
            Some(modifier) => match resolve_modifier(&self.theme, handler, modifier, is_color) {
                Some(resolved) => Some(resolved),
                None => {
                    let value_is_arbitrary =
                        matches!(value, Some(CandidateValue::Arbitrary { .. }));
                    debug!(
                        "modifier `{}` is not accepted here{}",
                        modifier.value(),
                        if value_is_arbitrary { ", giving up" } else { "" }
                    );
                    return HandlerOutcome::Rejected {
                        retry: !value_is_arbitrary,
                    };
                }
            },
        };

        if is_color {
            if let Some(alpha) = &resolved_modifier {
                resolved = with_alpha(&resolved, alpha);
            }
        }
        if negative {
            resolved = with_negative(&resolved);
        }

        let nodes = handler.emit(&resolved, resolved_modifier.as_deref());
        if nodes.is_empty() {
            return RETRY;
        }
        HandlerOutcome::Matched(nodes)
    }

    /// Named value chain: the generator's own table, color keywords, the
    /// theme namespaces, then the bare-value handler.
    fn lookup_named(&self, handler: &FunctionalUtility, key: Option<&str>) -> Option<String> {
        if let Some(resolved) = handler.lookup(key.unwrap_or(DEFAULT_KEY)) {
            return Some(resolved.to_string());
        }
        if handler.is_color() {
            match key {
                Some("inherit") => return Some("inherit".to_string()),
                Some("transparent") => return Some("transparent".to_string()),
                Some("current") => return Some("currentColor".to_string()),
                _ => {}
            }
        }

        let namespaces = handler
            .theme_keys
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        if let Some(resolved) = self.theme.resolve(key, &namespaces) {
            return Some(resolved);
        }

        key.and_then(|key| handler.bare_value(key))
    }
}

fn resolve_modifier(
    theme: &Theme,
    handler: &FunctionalUtility,
    modifier: &Modifier,
    is_color: bool,
) -> Option<String> {
    let policy = match &handler.modifiers {
        Some(policy) => policy.clone(),
        None if is_color => ModifierPolicy::Lookup(Vec::new()),
        None => ModifierPolicy::None,
    };

    match (policy, modifier) {
        (ModifierPolicy::None, _) => None,
        (ModifierPolicy::Any, modifier) => Some(modifier.value().to_string()),
        (ModifierPolicy::Lookup(_), Modifier::Arbitrary(value)) => Some(value.clone()),
        (ModifierPolicy::Lookup(table), Modifier::Named(value)) => table
            .iter()
            .find(|(name, _)| name == value)
            .map(|(_, resolved)| resolved.clone())
            .or_else(|| {
                (is_color && value.parse::<f64>().is_ok()).then(|| format!("{value}%"))
            }),
        (ModifierPolicy::Theme(_), Modifier::Arbitrary(value)) => Some(value.clone()),
        (ModifierPolicy::Theme(namespaces), Modifier::Named(value)) => {
            let namespaces = namespaces.iter().map(String::as_str).collect::<Vec<_>>();
            theme
                .resolve(Some(value.as_str()), &namespaces)
                .or_else(|| handler.bare_modifier_value(value))
        }
    }
}

fn resolve_arbitrary_property(
    property: &str,
    value: &str,
    modifier: Option<&Modifier>,
) -> Option<Vec<CssNode>> {
    let value = match modifier {
        None => value.to_string(),
        Some(Modifier::Arbitrary(alpha)) => with_alpha(value, alpha),
        Some(Modifier::Named(alpha)) if alpha.parse::<f64>().is_ok() => {
            with_alpha(value, &format!("{alpha}%"))
        }
        Some(Modifier::Named(_)) => return None,
    };
    Some(vec![decl(property, value)])
}

/// Mixes `color` with transparency. Numeric alphas up to 1 are fractions,
/// larger ones percentages.
pub fn with_alpha(color: &str, alpha: &str) -> String {
    let alpha = match alpha.trim().parse::<f64>() {
        Ok(fraction) if fraction <= 1.0 => {
            format!("{}%", (fraction * 100.0 * 10_000.0).round() / 10_000.0)
        }
        Ok(_) => format!("{}%", alpha.trim()),
        Err(_) => alpha.trim().to_string(),
    };
    if alpha == "100%" {
        return color.to_string();
    }
    format!("color-mix(in oklab, {color} {alpha}, transparent)")
}

/// Flips the sign of a resolved value.
pub fn with_negative(value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        return match value.strip_prefix('-') {
            Some(positive) => positive.to_string(),
            None => format!("-{value}"),
        };
    }
    if let Some(inner) = value
        .strip_prefix("calc(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        if let Some((lhs, factor)) = inner.rsplit_once(" * ") {
            if factor.parse::<f64>().is_ok() && !factor.starts_with('-') {
                return format!("calc({lhs} * -{factor})");
            }
        }
    }
    format!("calc({value} * -1)")
}

#[cfg(test)]
mod tests {
    use super::{DesignSystem, DesignSystemBuilder, HandlerOutcome, with_alpha, with_negative};
    use crate::css::{CssNode, decl, to_css};
    use crate::error::RegistrationError;
    use crate::infer::DataType;
    use crate::theme::Theme;
    use crate::utilities::{FunctionalUtility, ModifierPolicy};
    use pretty_assertions::assert_eq;

    fn system() -> DesignSystem {
        DesignSystem::with_defaults().expect("defaults register")
    }

    fn resolve(system: &DesignSystem, raw: &str) -> Option<String> {
        let candidate = system.parse_candidate(raw)?;
        system.resolve(&candidate).map(|nodes| to_css(&nodes, true))
    }

    fn scrollbar_system() -> DesignSystem {
        let mut theme = Theme::new();
        theme.add("--color-black", "black");
        let mut builder = DesignSystemBuilder::new(theme);
        builder
            .functional_utility(
                "scrollbar",
                FunctionalUtility::new(|value, _| vec![decl("scrollbar-color", value)])
                    .types([DataType::Color])
                    .theme_keys(["--color"]),
            )
            .expect("color generator");
        builder
            .functional_utility(
                "scrollbar",
                FunctionalUtility::new(|value, _| vec![decl("scrollbar-width", value)])
                    .types([DataType::Length])
                    .values([("2", "2px"), ("4", "4px")]),
            )
            .expect("width generator");
        builder.build()
    }

    #[test]
    fn same_root_generators_split_by_type() {
        let system = scrollbar_system();
        assert_eq!(
            resolve(&system, "scrollbar-[2px]"),
            Some("scrollbar-width:2px".to_string())
        );
        assert_eq!(
            resolve(&system, "scrollbar-2"),
            Some("scrollbar-width:2px".to_string())
        );
        assert_eq!(
            resolve(&system, "scrollbar-black/50"),
            Some("scrollbar-color:color-mix(in oklab, var(--color-black) 50%, transparent)".to_string())
        );
        assert_eq!(
            resolve(&system, "scrollbar-[var(--my-color)]"),
            Some("scrollbar-color:var(--my-color)".to_string())
        );
        assert_eq!(
            resolve(&system, "scrollbar-[length:var(--my-width)]"),
            Some("scrollbar-width:var(--my-width)".to_string())
        );
    }

    #[test]
    fn unresolved_modifiers_reject_the_candidate() {
        let system = scrollbar_system();
        assert_eq!(resolve(&system, "scrollbar-[2px]/50"), None);
        assert_eq!(resolve(&system, "scrollbar-[length:var(--my-width)]/50"), None);
        assert_eq!(resolve(&system, "scrollbar-2/50"), None);
    }

    #[test]
    fn arbitrary_values_with_bad_modifiers_stop_resolution() {
        let mut builder = DesignSystemBuilder::new(Theme::new());
        builder
            .functional_utility(
                "tab",
                FunctionalUtility::new(|value, _| vec![decl("tab-size", value)])
                    .types([DataType::Integer])
                    .values([("4", "4")]),
            )
            .expect("first");
        builder
            .functional_utility(
                "tab",
                FunctionalUtility::new(|value, modifier| {
                    vec![decl("tab-size", format!("{value} {}", modifier.unwrap_or("")))]
                })
                .values([("4", "4")])
                .modifiers(ModifierPolicy::Any),
            )
            .expect("second");
        let system = builder.build();

        assert_eq!(resolve(&system, "tab-4/wide"), Some("tab-size:4 wide".to_string()));
        assert_eq!(resolve(&system, "tab-[4]/wide"), None);
    }

    #[test]
    fn negative_values_need_support() {
        let system = system();
        assert_eq!(
            resolve(&system, "-mt-2"),
            Some("margin-top:calc(var(--spacing) * -2)".to_string())
        );
        assert_eq!(resolve(&system, "-p-2"), None);
        assert_eq!(resolve(&system, "-z-10"), Some("z-index:-10".to_string()));
        assert_eq!(
            resolve(&system, "-top-[5px]"),
            Some("top:calc(5px * -1)".to_string())
        );
    }

    #[test]
    fn resolves_theme_values_and_keywords() {
        let system = system();
        assert_eq!(
            resolve(&system, "bg-red-500"),
            Some("background-color:var(--color-red-500)".to_string())
        );
        assert_eq!(
            resolve(&system, "bg-current"),
            Some("background-color:currentColor".to_string())
        );
        assert_eq!(
            resolve(&system, "bg-red-500/[0.25]"),
            Some(
                "background-color:color-mix(in oklab, var(--color-red-500) 25%, transparent)"
                    .to_string()
            )
        );
        assert_eq!(
            resolve(&system, "bg-[#0088cc]"),
            Some("background-color:#0088cc".to_string())
        );
        assert_eq!(
            resolve(&system, "bg-[url(/img.png)]"),
            Some("background-image:url(/img.png)".to_string())
        );
        assert_eq!(resolve(&system, "bg-nope"), None);
    }

    #[test]
    fn resolves_static_and_arbitrary_candidates() {
        let system = system();
        assert_eq!(resolve(&system, "flex!"), Some("display:flex!important".to_string()));
        assert_eq!(
            resolve(&system, "[mask-type:luminance]"),
            Some("mask-type:luminance".to_string())
        );
        assert_eq!(
            resolve(&system, "[color:red]/50"),
            Some("color:color-mix(in oklab, red 50%, transparent)".to_string())
        );
        assert_eq!(resolve(&system, "[color:red]/half"), None);
        assert_eq!(resolve(&system, "nope"), None);
    }

    #[test]
    fn compiles_candidates_with_variants() {
        let system = system();
        let css = system.candidates_to_css(&["md:hover:flex", "group-hover:underline", "unknown:flex"]);
        assert_eq!(
            css,
            vec![
                Some(
                    "@media (width >= 48rem) {\n  @media (hover: hover) {\n    .md\\:hover\\:flex:hover {\n      display: flex;\n    }\n  }\n}"
                        .to_string()
                ),
                Some(
                    "@media (hover: hover) {\n  .group-hover\\:underline:is(:where(.group):hover *) {\n    text-decoration-line: underline;\n  }\n}"
                        .to_string()
                ),
                None,
            ]
        );
    }

    #[test]
    fn prefixes_are_validated() {
        assert!(matches!(
            DesignSystemBuilder::new(Theme::new()).prefix("Tw"),
            Err(RegistrationError::InvalidPrefix { .. })
        ));
        let system = DesignSystemBuilder::with_defaults(Theme::with_defaults())
            .expect("defaults")
            .prefix("tw")
            .expect("prefix")
            .build();
        assert_eq!(resolve(&system, "flex"), None);
        assert_eq!(resolve(&system, "tw:flex"), Some("display:flex".to_string()));
        let candidate = system.parse_candidate("tw:hover:flex").expect("candidate");
        assert_eq!(system.print_candidate(&candidate), "tw:hover:flex");
    }

    #[test]
    fn empty_output_counts_as_a_miss() {
        let mut builder = DesignSystemBuilder::new(Theme::new());
        builder
            .functional_utility("x", FunctionalUtility::new(|_, _| Vec::<CssNode>::new()))
            .expect("empty");
        builder
            .functional_utility("x", FunctionalUtility::new(|value, _| vec![decl("x", value)]))
            .expect("fallback");
        let system = builder.build();
        assert_eq!(resolve(&system, "x-[1]"), Some("x:1".to_string()));
    }

    #[test]
    fn composes_alpha_and_sign() {
        assert_eq!(with_alpha("red", "0.5"), "color-mix(in oklab, red 50%, transparent)");
        assert_eq!(with_alpha("red", "75"), "color-mix(in oklab, red 75%, transparent)");
        assert_eq!(with_alpha("red", "var(--a)"), "color-mix(in oklab, red var(--a), transparent)");
        assert_eq!(with_alpha("red", "100%"), "red");
        assert_eq!(with_negative("4"), "-4");
        assert_eq!(with_negative("calc(var(--spacing) * 4)"), "calc(var(--spacing) * -4)");
        assert_eq!(with_negative("var(--x)"), "calc(var(--x) * -1)");
    }

    #[test]
    fn outcome_is_comparable() {
        assert_ne!(
            HandlerOutcome::Rejected { retry: true },
            HandlerOutcome::Rejected { retry: false }
        );
    }
}
