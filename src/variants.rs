//! Registry of variants and their application to a generated rule.
//!
//! Every variant resolves to a list of steps. Selector steps are templates in
//! which `&` stands for the selector built so far; at-rule steps wrap the
//! finished rule, the first one outermost.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::candidate::{Modifier, Variant, VariantValue, segment};
use crate::css::{CssNode, at_rule, escape_selector, rule};
use crate::error::RegistrationError;
use crate::printer::print_variant;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantStep {
    Selector(String),
    AtRule { name: String, params: String },
}

impl VariantStep {
    /// `@media print` is an at-rule step, anything else a selector template.
    pub fn parse(template: &str) -> Self {
        let template = template.trim();
        let Some(rest) = template.strip_prefix('@') else {
            return Self::Selector(template.to_string());
        };
        let name_len = rest
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-'))
            .unwrap_or(rest.len());
        Self::AtRule {
            name: rest[..name_len].to_string(),
            params: rest[name_len..].trim().to_string(),
        }
    }

    pub fn selector(template: impl Into<String>) -> Self {
        Self::Selector(template.into())
    }

    pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self::AtRule {
            name: name.into(),
            params: params.into(),
        }
    }
}

pub type FunctionalVariantFn = Arc<
    dyn Fn(Option<&VariantValue>, Option<&Modifier>, &Theme) -> Option<Vec<VariantStep>>
        + Send
        + Sync,
>;
pub type CompoundVariantFn =
    Arc<dyn Fn(&[VariantStep], Option<&Modifier>) -> Option<Vec<VariantStep>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Variants {
    statics: HashMap<String, Vec<VariantStep>>,
    functionals: HashMap<String, FunctionalVariantFn>,
    compounds: HashMap<String, CompoundVariantFn>,
}

impl fmt::Debug for Variants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variants")
            .field("statics", &self.statics.len())
            .field("functionals", &self.functionals.len())
            .field("compounds", &self.compounds.len())
            .finish()
    }
}

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variant from selector (`&:hover`) and at-rule
    /// (`@media (hover: hover)`) templates.
    pub fn register_static<I, S>(&mut self, name: &str, templates: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_variant_name(name)?;
        let steps = templates
            .into_iter()
            .map(|template| VariantStep::parse(template.as_ref()))
            .collect();
        self.statics.insert(name.to_string(), steps);
        Ok(())
    }

    pub fn register_functional<F>(&mut self, name: &str, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(Option<&VariantValue>, Option<&Modifier>, &Theme) -> Option<Vec<VariantStep>>
            + Send
            + Sync
            + 'static,
    {
        validate_variant_name(name)?;
        self.functionals.insert(name.to_string(), Arc::new(handler));
        Ok(())
    }

    pub fn register_compound<F>(&mut self, name: &str, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(&[VariantStep], Option<&Modifier>) -> Option<Vec<VariantStep>> + Send + Sync + 'static,
    {
        validate_variant_name(name)?;
        self.compounds.insert(name.to_string(), Arc::new(handler));
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.statics.contains_key(name)
            || self.functionals.contains_key(name)
            || self.compounds.contains_key(name)
    }

    /// Steps of a single variant, `None` when nothing registered matches.
    pub fn steps(&self, variant: &Variant, theme: &Theme) -> Option<Vec<VariantStep>> {
        match variant {
            Variant::Static { root } => self
                .statics
                .get(root)
                .cloned()
                .or_else(|| self.functionals.get(root)?(None, None, theme)),
            Variant::Functional {
                root,
                value: Some(VariantValue::Named(value)),
                modifier,
            } => {
                let full = format!("{root}-{value}");
                if modifier.is_none() {
                    if let Some(steps) = self.statics.get(&full) {
                        return Some(steps.clone());
                    }
                }
                // `aria-read-only` may be `aria` + `read-only` or `aria-read` + `only`.
                full.match_indices('-').rev().find_map(|(idx, _)| {
                    let handler = self.functionals.get(&full[..idx])?;
                    let value = VariantValue::Named(full[idx + 1..].to_string());
                    handler(Some(&value), modifier.as_ref(), theme)
                })
            }
            Variant::Functional {
                root,
                value,
                modifier,
            } => self.functionals.get(root)?(value.as_ref(), modifier.as_ref(), theme),
            Variant::Arbitrary { selector } => Some(vec![VariantStep::parse(selector)]),
            Variant::Compound {
                root,
                modifier,
                variant,
            } => {
                if modifier.is_none() {
                    let full = format!("{root}-{}", print_variant(variant));
                    if let Some(steps) = self.statics.get(&full) {
                        return Some(steps.clone());
                    }
                }
                let nested = self.steps(variant, theme)?;
                self.compounds.get(root)?(&nested, modifier.as_ref())
            }
        }
    }

    /// Wraps `nodes` in a rule for `class_name` and applies `variants`,
    /// outermost first.
    pub fn apply(
        &self,
        variants: &[Variant],
        class_name: &str,
        nodes: Vec<CssNode>,
        theme: &Theme,
    ) -> Option<Vec<CssNode>> {
        let mut steps = Vec::new();
        for variant in variants {
            steps.extend(self.steps(variant, theme)?);
        }

        let (selector, at_rules) = fold_steps(&steps);
        let selector = selector.replace('&', &format!(".{}", escape_selector(class_name)));

        let mut out = wrap_in_rule(&selector, nodes);
        for (name, params) in at_rules.into_iter().rev() {
            out = vec![at_rule(name, params, out)];
        }
        Some(out)
    }
}

/// Composes selector steps into one template and collects at-rules in order.
/// Selector lists distribute, so a later step applies to every branch.
pub fn fold_steps(steps: &[VariantStep]) -> (String, Vec<(String, String)>) {
    let mut selector = String::from("&");
    let mut at_rules = Vec::new();
    for step in steps {
        match step {
            VariantStep::Selector(template) => selector = substitute(template, &selector),
            VariantStep::AtRule { name, params } => at_rules.push((name.clone(), params.clone())),
        }
    }
    (selector, at_rules)
}

fn substitute(template: &str, selector: &str) -> String {
    let branches = segment(template, ',');
    segment(selector, ',')
        .into_iter()
        .flat_map(|outer| {
            branches
                .iter()
                .map(move |branch| branch.trim().replace('&', outer.trim()))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Declarations go into one rule. Nested rules get `&` replaced by the
/// selector and nested at-rules are hoisted around it.
fn wrap_in_rule(selector: &str, nodes: Vec<CssNode>) -> Vec<CssNode> {
    let mut declarations = Vec::new();
    let mut trailing = Vec::new();
    for node in nodes {
        match node {
            CssNode::Declaration(_) => declarations.push(node),
            CssNode::Rule {
                selector: nested,
                nodes,
            } => trailing.extend(wrap_in_rule(&nested.replace('&', selector), nodes)),
            CssNode::AtRule {
                name,
                params,
                nodes,
            } => trailing.push(at_rule(name, params, wrap_in_rule(selector, nodes))),
        }
    }

    let mut out = Vec::with_capacity(trailing.len() + 1);
    if !declarations.is_empty() {
        out.push(rule(selector, declarations));
    }
    out.extend(trailing);
    out
}

/// `^[a-z0-9@][a-zA-Z0-9_-]*$`
pub fn validate_variant_name(name: &str) -> Result<(), RegistrationError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some('a'..='z' | '0'..='9' | '@'))
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(RegistrationError::InvalidVariantName {
            name: name.to_string(),
        })
    }
}

/// Marker class of a `group`/`peer` relation, named by the modifier if any.
fn relation_marker(class: &str, modifier: Option<&Modifier>) -> String {
    match modifier {
        Some(modifier) => format!(
            ":where(.{})",
            escape_selector(&format!("{class}/{}", modifier.value()))
        ),
        None => format!(":where(.{class})"),
    }
}

/// Compound handler shared by `group` and `peer`: the nested selector is
/// matched against the marked ancestor or preceding sibling.
pub fn relation_variant(
    class: &'static str,
    combinator: &'static str,
) -> impl Fn(&[VariantStep], Option<&Modifier>) -> Option<Vec<VariantStep>> + Send + Sync + 'static
{
    move |nested, modifier| {
        let marker = relation_marker(class, modifier);
        rewrite_selector(nested, |selector| {
            format!("&:is({}{combinator}*)", selector.replace('&', &marker))
        })
    }
}

/// Arbitrary form of `group`/`peer`, as in `group-[.is-open]`.
pub fn relation_arbitrary_variant(
    class: &'static str,
    combinator: &'static str,
) -> impl Fn(Option<&VariantValue>, Option<&Modifier>, &Theme) -> Option<Vec<VariantStep>>
+ Send
+ Sync
+ 'static {
    move |value, modifier, _| {
        let Some(VariantValue::Arbitrary(value)) = value else {
            return None;
        };
        let marker = relation_marker(class, modifier);
        let target = if value.contains('&') {
            value.replace('&', &marker)
        } else {
            format!("{marker}{value}")
        };
        Some(vec![VariantStep::Selector(format!(
            "&:is({target}{combinator}*)"
        ))])
    }
}

/// Replaces the selector part of `nested` with `wrap(selector)`, keeping its
/// at-rules. `None` when `nested` has no selector to rewrite.
pub fn rewrite_selector<F>(nested: &[VariantStep], wrap: F) -> Option<Vec<VariantStep>>
where
    F: Fn(&str) -> String,
{
    if !nested
        .iter()
        .any(|step| matches!(step, VariantStep::Selector(_)))
    {
        return None;
    }
    let (selector, at_rules) = fold_steps(nested);
    let mut steps = at_rules
        .into_iter()
        .map(|(name, params)| VariantStep::AtRule { name, params })
        .collect::<Vec<_>>();
    steps.push(VariantStep::Selector(wrap(&selector)));
    Some(steps)
}

/// `not-*`: negates the selector, or the at-rule when there is no selector.
pub fn negate(nested: &[VariantStep]) -> Option<Vec<VariantStep>> {
    let (selector, at_rules) = fold_steps(nested);
    if selector != "&" {
        return Some(vec![VariantStep::Selector(format!(
            "&:not({})",
            selector.replace('&', "*")
        ))]);
    }
    match at_rules.as_slice() {
        [(name, params)] if name == "media" => Some(vec![VariantStep::at_rule(
            "media",
            format!("not all and {params}"),
        )]),
        [(name, params)] if name == "supports" => Some(vec![VariantStep::at_rule(
            "supports",
            format!("not {params}"),
        )]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{VariantStep, Variants, fold_steps, relation_variant, validate_variant_name};
    use crate::candidate::{Variant, VariantValue, parse_variant};
    use crate::css::{decl, to_css};
    use crate::error::RegistrationError;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;

    fn registry() -> Variants {
        let mut variants = Variants::new();
        variants
            .register_static("hover", ["@media (hover: hover)", "&:hover"])
            .expect("hover");
        variants.register_static("focus", ["&:focus"]).expect("focus");
        variants
            .register_static("focus-within", ["&:focus-within"])
            .expect("focus-within");
        variants
            .register_functional("data", |value, _, _| {
                Some(vec![VariantStep::selector(format!("&[data-{}]", value?.value()))])
            })
            .expect("data");
        variants
            .register_compound("group", relation_variant("group", " "))
            .expect("group");
        variants
    }

    fn steps(input: &str) -> Option<Vec<VariantStep>> {
        registry().steps(&parse_variant(input)?, &Theme::new())
    }

    #[test]
    fn parses_step_templates() {
        assert_eq!(
            VariantStep::parse("@media (hover: hover)"),
            VariantStep::at_rule("media", "(hover: hover)")
        );
        assert_eq!(
            VariantStep::parse("@media(pointer:fine)"),
            VariantStep::at_rule("media", "(pointer:fine)")
        );
        assert_eq!(
            VariantStep::parse("@starting-style"),
            VariantStep::at_rule("starting-style", "")
        );
        assert_eq!(VariantStep::parse("&:hover"), VariantStep::selector("&:hover"));
    }

    #[test]
    fn resolves_static_names_split_by_the_parser() {
        assert_eq!(steps("focus-within"), Some(vec![VariantStep::selector("&:focus-within")]));
    }

    #[test]
    fn functional_values_are_resplit() {
        assert_eq!(
            steps("data-foo-bar"),
            Some(vec![VariantStep::selector("&[data-foo-bar]")])
        );
        assert_eq!(
            registry().steps(
                &Variant::Functional {
                    root: "data".to_string(),
                    value: Some(VariantValue::Arbitrary("state=open".to_string())),
                    modifier: None,
                },
                &Theme::new()
            ),
            Some(vec![VariantStep::selector("&[data-state=open]")])
        );
    }

    #[test]
    fn compounds_keep_nested_at_rules() {
        assert_eq!(
            steps("group-hover/sidebar"),
            Some(vec![
                VariantStep::at_rule("media", "(hover: hover)"),
                VariantStep::selector("&:is(:where(.group\\/sidebar):hover *)"),
            ])
        );
        assert_eq!(
            steps("group-data-[selected]"),
            Some(vec![VariantStep::selector("&:is(:where(.group)[data-selected] *)")])
        );
    }

    #[test]
    fn unknown_variants_do_not_resolve() {
        assert_eq!(steps("nope"), None);
        assert_eq!(steps("peer-hover"), None);
        assert_eq!(steps("group-nope"), None);
    }

    #[test]
    fn folds_selectors_outermost_first() {
        let (selector, at_rules) = fold_steps(&[
            VariantStep::selector("& p"),
            VariantStep::at_rule("media", "print"),
            VariantStep::selector("&:hover"),
        ]);
        assert_eq!(selector, "& p:hover");
        assert_eq!(at_rules, vec![("media".to_string(), "print".to_string())]);
    }

    #[test]
    fn later_steps_apply_to_every_branch_of_a_list() {
        let (selector, _) = fold_steps(&[
            VariantStep::selector("& *::marker, &::marker"),
            VariantStep::selector("&:hover"),
        ]);
        assert_eq!(selector, "& *::marker:hover, &::marker:hover");

        let (selector, _) = fold_steps(&[
            VariantStep::selector("&:is(.a, .b)"),
            VariantStep::selector("& *::selection, &::selection"),
        ]);
        assert_eq!(
            selector,
            "&:is(.a, .b) *::selection, &:is(.a, .b)::selection"
        );
    }

    #[test]
    fn applies_variants_around_a_rule() {
        let variants = vec![
            parse_variant("hover").expect("hover"),
            parse_variant("[&_p]").expect("arbitrary"),
        ];
        let nodes = registry()
            .apply(&variants, "hover:[&_p]:flex", vec![decl("display", "flex")], &Theme::new())
            .expect("nodes");
        assert_eq!(
            to_css(&nodes, true),
            "@media (hover: hover){.hover\\:\\[\\&_p\\]\\:flex:hover p{display:flex}}"
        );
    }

    #[test]
    fn hoists_nested_rules_and_at_rules() {
        let nodes = registry()
            .apply(
                &[],
                "x",
                vec![
                    decl("color", "red"),
                    crate::css::rule("&::placeholder", vec![decl("color", "blue")]),
                    crate::css::at_rule("supports", "(color: lab(0 0 0))", vec![decl("color", "lab(0 0 0)")]),
                ],
                &Theme::new(),
            )
            .expect("nodes");
        assert_eq!(
            to_css(&nodes, true),
            ".x{color:red}.x::placeholder{color:blue}@supports (color: lab(0 0 0)){.x{color:lab(0 0 0)}}"
        );
    }

    #[test]
    fn validates_variant_names() {
        assert_eq!(validate_variant_name("2xl"), Ok(()));
        assert_eq!(validate_variant_name("@container"), Ok(()));
        assert_eq!(
            validate_variant_name("Hover"),
            Err(RegistrationError::InvalidVariantName {
                name: "Hover".to_string()
            })
        );
        assert!(validate_variant_name("a:b").is_err());
        let err = validate_variant_name("_x").expect_err("leading underscore");
        assert!(err.to_string().contains("a lowercase letter, a digit or `@`"));
    }
}
