//! Built-in utilities and variants registered on every default design system.

use crate::candidate::VariantValue;
use crate::css::{CssNode, decl};
use crate::error::RegistrationError;
use crate::infer::DataType;
use crate::theme::Theme;
use crate::utilities::{FunctionalUtility, ModifierPolicy, StaticUtility, Utilities};
use crate::variants::{
    VariantStep, Variants, negate, relation_arbitrary_variant, relation_variant, rewrite_selector,
};

const STATIC_UTILITIES: [(&str, &str, &str); 22] = [
    ("block", "display", "block"),
    ("inline", "display", "inline"),
    ("inline-block", "display", "inline-block"),
    ("flex", "display", "flex"),
    ("inline-flex", "display", "inline-flex"),
    ("grid", "display", "grid"),
    ("contents", "display", "contents"),
    ("hidden", "display", "none"),
    ("static", "position", "static"),
    ("relative", "position", "relative"),
    ("absolute", "position", "absolute"),
    ("fixed", "position", "fixed"),
    ("sticky", "position", "sticky"),
    ("flex-row", "flex-direction", "row"),
    ("flex-col", "flex-direction", "column"),
    ("items-center", "align-items", "center"),
    ("justify-center", "justify-content", "center"),
    ("underline", "text-decoration-line", "underline"),
    ("line-through", "text-decoration-line", "line-through"),
    ("no-underline", "text-decoration-line", "none"),
    ("italic", "font-style", "italic"),
    ("not-italic", "font-style", "normal"),
];

const SPACING_UTILITIES: [(&str, &[&str], bool); 21] = [
    ("p", &["padding"], false),
    ("px", &["padding-inline"], false),
    ("py", &["padding-block"], false),
    ("pt", &["padding-top"], false),
    ("pr", &["padding-right"], false),
    ("pb", &["padding-bottom"], false),
    ("pl", &["padding-left"], false),
    ("m", &["margin"], true),
    ("mx", &["margin-inline"], true),
    ("my", &["margin-block"], true),
    ("mt", &["margin-top"], true),
    ("mr", &["margin-right"], true),
    ("mb", &["margin-bottom"], true),
    ("ml", &["margin-left"], true),
    ("inset", &["inset"], true),
    ("top", &["top"], true),
    ("right", &["right"], true),
    ("bottom", &["bottom"], true),
    ("left", &["left"], true),
    ("gap", &["gap"], false),
    ("size", &["width", "height"], false),
];

const SIMPLE_VARIANTS: [(&str, &str); 44] = [
    ("focus", "&:focus"),
    ("focus-within", "&:focus-within"),
    ("focus-visible", "&:focus-visible"),
    ("active", "&:active"),
    ("visited", "&:visited"),
    ("target", "&:target"),
    ("first", "&:first-child"),
    ("last", "&:last-child"),
    ("only", "&:only-child"),
    ("odd", "&:nth-child(odd)"),
    ("even", "&:nth-child(even)"),
    ("first-of-type", "&:first-of-type"),
    ("last-of-type", "&:last-of-type"),
    ("only-of-type", "&:only-of-type"),
    ("empty", "&:empty"),
    ("disabled", "&:disabled"),
    ("enabled", "&:enabled"),
    ("checked", "&:checked"),
    ("indeterminate", "&:indeterminate"),
    ("default", "&:default"),
    ("optional", "&:optional"),
    ("required", "&:required"),
    ("valid", "&:valid"),
    ("invalid", "&:invalid"),
    ("user-valid", "&:user-valid"),
    ("user-invalid", "&:user-invalid"),
    ("in-range", "&:in-range"),
    ("out-of-range", "&:out-of-range"),
    ("placeholder-shown", "&:placeholder-shown"),
    ("autofill", "&:autofill"),
    ("read-only", "&:read-only"),
    ("open", "&:is([open], :popover-open, :open)"),
    ("inert", "&:is([inert], [inert] *)"),
    ("rtl", "&:where(:dir(rtl), [dir=\"rtl\"], [dir=\"rtl\"] *)"),
    ("ltr", "&:where(:dir(ltr), [dir=\"ltr\"], [dir=\"ltr\"] *)"),
    ("before", "&::before"),
    ("after", "&::after"),
    ("first-letter", "&::first-letter"),
    ("first-line", "&::first-line"),
    ("marker", "& *::marker, &::marker"),
    ("selection", "& *::selection, &::selection"),
    ("file", "&::file-selector-button"),
    ("backdrop", "&::backdrop"),
    ("placeholder", "&::placeholder"),
];

const MEDIA_VARIANTS: [(&str, &str); 9] = [
    ("dark", "(prefers-color-scheme: dark)"),
    ("print", "print"),
    ("motion-safe", "(prefers-reduced-motion: no-preference)"),
    ("motion-reduce", "(prefers-reduced-motion: reduce)"),
    ("contrast-more", "(prefers-contrast: more)"),
    ("contrast-less", "(prefers-contrast: less)"),
    ("portrait", "(orientation: portrait)"),
    ("landscape", "(orientation: landscape)"),
    ("noscript", "(scripting: none)"),
];

pub fn register_utilities(utilities: &mut Utilities) -> Result<(), RegistrationError> {
    for (name, property, value) in STATIC_UTILITIES {
        utilities.register_static(name, StaticUtility::new(move || vec![decl(property, value)]))?;
    }
    utilities.register_static(
        "truncate",
        StaticUtility::new(|| {
            vec![
                decl("overflow", "hidden"),
                decl("text-overflow", "ellipsis"),
                decl("white-space", "nowrap"),
            ]
        }),
    )?;

    register_color_utilities(utilities)?;

    for (name, properties, negative) in SPACING_UTILITIES {
        let mut utility = FunctionalUtility::new(move |value, _| declarations(properties, value))
            .types([DataType::Length, DataType::Percentage])
            .supports_negative(negative)
            .values([("px", "1px"), ("auto", "auto")])
            .bare(spacing_multiple);
        if matches!(name, "inset" | "top" | "right" | "bottom" | "left" | "size") {
            utility = utility.fraction(percentage_fraction);
        }
        utilities.register_functional(name, utility)?;
    }

    for (name, property, screen) in [("w", "width", "100vw"), ("h", "height", "100vh")] {
        utilities.register_functional(
            name,
            FunctionalUtility::new(move |value, _| vec![decl(property, value)])
                .types([DataType::Length, DataType::Percentage])
                .values([
                    ("auto", "auto"),
                    ("px", "1px"),
                    ("full", "100%"),
                    ("screen", screen),
                    ("min", "min-content"),
                    ("max", "max-content"),
                    ("fit", "fit-content"),
                ])
                .bare(spacing_multiple)
                .fraction(percentage_fraction),
        )?;
    }

    utilities.register_functional(
        "opacity",
        FunctionalUtility::new(|value, _| vec![decl("opacity", value)])
            .types([DataType::Percentage, DataType::Number])
            .bare(|value| is_integer(value).then(|| format!("{value}%"))),
    )?;

    utilities.register_functional(
        "rounded",
        FunctionalUtility::new(|value, _| vec![decl("border-radius", value)])
            .types([DataType::Length, DataType::Percentage])
            .values([("none", "0")])
            .theme_keys(["--radius"]),
    )?;

    utilities.register_functional(
        "border",
        FunctionalUtility::new(|value, _| {
            vec![decl("border-style", "var(--tw-border-style)"), decl("border-width", value)]
        })
        .types([DataType::Length, DataType::LineWidth])
        .values([("DEFAULT", "1px")])
        .bare(|value| is_integer(value).then(|| format!("{value}px"))),
    )?;
    utilities.register_functional(
        "border",
        color_utility("border-color", &["--border-color", "--color"]),
    )?;

    utilities.register_functional(
        "aspect",
        FunctionalUtility::new(|value, _| vec![decl("aspect-ratio", value)])
            .types([DataType::Ratio])
            .values([("auto", "auto"), ("square", "1 / 1")])
            .theme_keys(["--aspect"])
            .fraction(|numerator, denominator| {
                (is_integer(numerator) && is_integer(denominator))
                    .then(|| format!("{numerator}/{denominator}"))
            }),
    )?;

    register_grid_utilities(utilities)?;

    utilities.register_functional(
        "flex",
        FunctionalUtility::new(|value, _| vec![decl("flex", value)])
            .types([DataType::Number])
            .values([("auto", "1 1 auto"), ("initial", "0 1 auto"), ("none", "none")])
            .bare(|value| is_integer(value).then(|| value.to_string())),
    )?;

    utilities.register_functional(
        "font-stretch",
        FunctionalUtility::new(|value, _| vec![decl("font-stretch", value)])
            .types([DataType::Percentage])
            .values([
                ("ultra-condensed", "ultra-condensed"),
                ("extra-condensed", "extra-condensed"),
                ("condensed", "condensed"),
                ("semi-condensed", "semi-condensed"),
                ("normal", "normal"),
                ("semi-expanded", "semi-expanded"),
                ("expanded", "expanded"),
                ("extra-expanded", "extra-expanded"),
                ("ultra-expanded", "ultra-expanded"),
            ])
            .bare(|value| {
                let percent = value.strip_suffix('%')?;
                let percent = percent.parse::<u32>().ok()?;
                (50..=200).contains(&percent).then(|| value.to_string())
            }),
    )?;

    utilities.register_functional(
        "font",
        FunctionalUtility::new(|value, _| vec![decl("font-family", value)])
            .types([DataType::FamilyName])
            .theme_keys(["--font"]),
    )?;
    utilities.register_functional(
        "font",
        FunctionalUtility::new(|value, _| vec![decl("font-weight", value)])
            .types([DataType::Number])
            .theme_keys(["--font-weight"]),
    )?;

    utilities.register_functional(
        "z",
        FunctionalUtility::new(|value, _| vec![decl("z-index", value)])
            .types([DataType::Integer])
            .supports_negative(true)
            .values([("auto", "auto")])
            .bare(|value| is_integer(value).then(|| value.to_string())),
    )?;

    utilities.register_functional(
        "shadow",
        FunctionalUtility::new(|value, _| vec![decl("box-shadow", value)])
            .values([("none", "0 0 #0000")])
            .theme_keys(["--shadow"]),
    )?;

    utilities.register_functional(
        "leading",
        FunctionalUtility::new(|value, _| vec![decl("line-height", value)])
            .types([DataType::Length, DataType::Number, DataType::Percentage])
            .values([("none", "1")])
            .theme_keys(["--leading"])
            .bare(spacing_multiple),
    )?;

    utilities.register_functional(
        "tracking",
        FunctionalUtility::new(|value, _| vec![decl("letter-spacing", value)])
            .types([DataType::Length])
            .supports_negative(true)
            .theme_keys(["--tracking"]),
    )?;

    Ok(())
}

fn register_color_utilities(utilities: &mut Utilities) -> Result<(), RegistrationError> {
    utilities.register_functional(
        "bg",
        color_utility("background-color", &["--background-color", "--color"]),
    )?;
    utilities.register_functional(
        "bg",
        FunctionalUtility::new(|value, _| vec![decl("background-image", value)])
            .types([DataType::Image, DataType::Url])
            .values([("none", "none")]),
    )?;

    utilities.register_functional(
        "text",
        color_utility("color", &["--text-color", "--color"]),
    )?;
    utilities.register_functional(
        "text",
        FunctionalUtility::new(|value, line_height| {
            let mut nodes = vec![decl("font-size", value)];
            if let Some(line_height) = line_height {
                nodes.push(decl("line-height", line_height));
            }
            nodes
        })
        .types([DataType::Length, DataType::Percentage])
        .theme_keys(["--text"])
        .modifiers(ModifierPolicy::Theme(vec!["--leading".to_string()]))
        .bare_modifier(spacing_multiple),
    )?;

    for (name, property) in [
        ("accent", "accent-color"),
        ("caret", "caret-color"),
        ("fill", "fill"),
        ("stroke", "stroke"),
        ("decoration", "text-decoration-color"),
        ("outline", "outline-color"),
    ] {
        utilities.register_functional(name, color_utility(property, &["--color"]))?;
    }
    Ok(())
}

fn register_grid_utilities(utilities: &mut Utilities) -> Result<(), RegistrationError> {
    for (name, property) in [
        ("col-start", "grid-column-start"),
        ("col-end", "grid-column-end"),
        ("row-start", "grid-row-start"),
        ("row-end", "grid-row-end"),
    ] {
        utilities.register_functional(
            name,
            FunctionalUtility::new(move |value, _| vec![decl(property, value)])
                .types([DataType::Integer])
                .values([("auto", "auto")])
                .bare(|value| is_integer(value).then(|| value.to_string())),
        )?;
    }

    for (name, property) in [("col-span", "grid-column"), ("row-span", "grid-row")] {
        utilities.register_functional(
            name,
            FunctionalUtility::new(move |value, _| vec![decl(property, value)])
                .types([DataType::Integer])
                .values([("full", "1 / -1")])
                .bare(|value| is_integer(value).then(|| format!("span {value} / span {value}"))),
        )?;
    }

    for (name, property) in [
        ("grid-cols", "grid-template-columns"),
        ("grid-rows", "grid-template-rows"),
    ] {
        utilities.register_functional(
            name,
            FunctionalUtility::new(move |value, _| vec![decl(property, value)])
                .values([("none", "none"), ("subgrid", "subgrid")])
                .bare(|value| {
                    is_integer(value).then(|| format!("repeat({value}, minmax(0, 1fr))"))
                }),
        )?;
    }
    Ok(())
}

fn color_utility(property: &'static str, namespaces: &[&str]) -> FunctionalUtility {
    FunctionalUtility::new(move |value, _| vec![decl(property, value)])
        .types([DataType::Color])
        .theme_keys(namespaces.iter().copied())
}

fn declarations(properties: &[&str], value: &str) -> Vec<CssNode> {
    properties
        .iter()
        .map(|property| decl(*property, value))
        .collect()
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Non-negative multiples of a quarter step scale the `--spacing` unit.
fn spacing_multiple(value: &str) -> Option<String> {
    if value.starts_with(['+', '-']) {
        return None;
    }
    let number = value.parse::<f64>().ok()?;
    (number.is_finite() && (number * 4.0).fract() == 0.0)
        .then(|| format!("calc(var(--spacing) * {value})"))
}

fn percentage_fraction(numerator: &str, denominator: &str) -> Option<String> {
    (is_integer(numerator) && is_integer(denominator) && denominator != "0")
        .then(|| format!("calc({numerator}/{denominator} * 100%)"))
}

pub fn register_variants(variants: &mut Variants) -> Result<(), RegistrationError> {
    variants.register_static("hover", ["@media (hover: hover)", "&:hover"])?;
    for (name, template) in SIMPLE_VARIANTS {
        variants.register_static(name, [template])?;
    }
    for (name, query) in MEDIA_VARIANTS {
        variants.register_static(name, [format!("@media {query}")])?;
    }
    variants.register_static("starting", ["@starting-style"])?;

    variants.register_functional("data", |value, _, _| {
        Some(vec![VariantStep::selector(format!("&[data-{}]", value?.value()))])
    })?;
    variants.register_functional("aria", |value, _, _| {
        let selector = match value? {
            VariantValue::Named(key) => format!("&[aria-{key}=\"true\"]"),
            VariantValue::Arbitrary(condition) => format!("&[aria-{condition}]"),
        };
        Some(vec![VariantStep::selector(selector)])
    })?;
    variants.register_functional("supports", |value, _, _| {
        Some(vec![VariantStep::at_rule("supports", supports_query(value?))])
    })?;

    variants.register_functional("min", |value, _, theme| {
        let width = breakpoint_width(value?, theme)?;
        Some(vec![VariantStep::at_rule("media", format!("(width >= {width})"))])
    })?;
    variants.register_functional("max", |value, _, theme| {
        let width = breakpoint_width(value?, theme)?;
        Some(vec![VariantStep::at_rule("media", format!("(width < {width})"))])
    })?;

    for (name, pseudo) in [
        ("nth", "nth-child"),
        ("nth-last", "nth-last-child"),
        ("nth-of-type", "nth-of-type"),
        ("nth-last-of-type", "nth-last-of-type"),
    ] {
        variants.register_functional(name, move |value, _, _| {
            let argument = match value? {
                VariantValue::Named(value) if is_integer(value) => value.clone(),
                VariantValue::Named(_) => return None,
                VariantValue::Arbitrary(value) => value.clone(),
            };
            Some(vec![VariantStep::selector(format!("&:{pseudo}({argument})"))])
        })?;
    }

    variants.register_functional("group", relation_arbitrary_variant("group", " "))?;
    variants.register_functional("peer", relation_arbitrary_variant("peer", " ~ "))?;
    variants.register_functional("has", |value, _, _| match value? {
        VariantValue::Arbitrary(selector) => {
            Some(vec![VariantStep::selector(format!("&:has({selector})"))])
        }
        VariantValue::Named(_) => None,
    })?;
    variants.register_functional("not", |value, _, _| match value? {
        VariantValue::Arbitrary(selector) => {
            Some(vec![VariantStep::selector(format!("&:not({selector})"))])
        }
        VariantValue::Named(_) => None,
    })?;
    variants.register_functional("in", |value, _, _| match value? {
        VariantValue::Arbitrary(selector) => {
            Some(vec![VariantStep::selector(format!(":where({selector}) &"))])
        }
        VariantValue::Named(_) => None,
    })?;

    variants.register_compound("group", relation_variant("group", " "))?;
    variants.register_compound("peer", relation_variant("peer", " ~ "))?;
    variants.register_compound("has", |nested, _| {
        rewrite_selector(nested, |selector| format!("&:has({})", selector.replace('&', "*")))
    })?;
    variants.register_compound("not", |nested, _| negate(nested))?;
    variants.register_compound("in", |nested, _| {
        rewrite_selector(nested, |selector| format!(":where({}) &", selector.replace('&', "*")))
    })?;

    Ok(())
}

/// A bare property tests for support of that property; anything else is
/// taken as a condition, parenthesized unless it already is.
fn supports_query(value: &VariantValue) -> String {
    let query = value.value().trim();
    let is_property = query
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
    if is_property && !query.is_empty() {
        return format!("({query}: var(--tw))");
    }
    if (query.starts_with('(') && query.ends_with(')'))
        || query.starts_with("not ")
        || query.starts_with("selector(")
        || query.starts_with("font-")
    {
        return query.to_string();
    }
    format!("({query})")
}

fn breakpoint_width(value: &VariantValue, theme: &Theme) -> Option<String> {
    match value {
        VariantValue::Named(key) => theme
            .resolve_value(Some(key.as_str()), &["--breakpoint"])
            .map(str::to_string),
        VariantValue::Arbitrary(width) => Some(width.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::{percentage_fraction, spacing_multiple, supports_query};
    use crate::candidate::VariantValue;
    use crate::design_system::DesignSystem;
    use crate::css::CssNode;
    use pretty_assertions::assert_eq;

    fn compile(raw: &str) -> Option<String> {
        let system = DesignSystem::with_defaults().expect("defaults register");
        system.compile(raw).map(|nodes| {
            nodes
                .iter()
                .map(CssNode::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    #[test]
    fn computes_spacing_values() {
        assert_eq!(spacing_multiple("4"), Some("calc(var(--spacing) * 4)".to_string()));
        assert_eq!(spacing_multiple("2.5"), Some("calc(var(--spacing) * 2.5)".to_string()));
        assert_eq!(spacing_multiple("2.3"), None);
        assert_eq!(spacing_multiple("-1"), None);
        assert_eq!(spacing_multiple("big"), None);
        assert_eq!(percentage_fraction("1", "2"), Some("calc(1/2 * 100%)".to_string()));
        assert_eq!(percentage_fraction("1", "0"), None);
    }

    #[test]
    fn builds_supports_queries() {
        let query = |value: &str| supports_query(&VariantValue::Arbitrary(value.to_string()));
        assert_eq!(query("grid"), "(grid: var(--tw))");
        assert_eq!(query("display:grid"), "(display:grid)");
        assert_eq!(query("(display: grid)"), "(display: grid)");
        assert_eq!(query("not (display: grid)"), "not (display: grid)");
    }

    #[test]
    fn generates_utilities() {
        assert_eq!(
            compile("w-1/2"),
            Some(".w-1\\/2 {\n  width: calc(1/2 * 100%);\n}".to_string())
        );
        assert_eq!(
            compile("aspect-video"),
            Some(".aspect-video {\n  aspect-ratio: var(--aspect-video);\n}".to_string())
        );
        assert_eq!(
            compile("col-span-3"),
            Some(".col-span-3 {\n  grid-column: span 3 / span 3;\n}".to_string())
        );
        assert_eq!(
            compile("text-sm/6"),
            Some(
                ".text-sm\\/6 {\n  font-size: var(--text-sm);\n  line-height: calc(var(--spacing) * 6);\n}"
                    .to_string()
            )
        );
        assert_eq!(
            compile("text-sm/tight"),
            Some(
                ".text-sm\\/tight {\n  font-size: var(--text-sm);\n  line-height: var(--leading-tight);\n}"
                    .to_string()
            )
        );
        assert_eq!(
            compile("text-sm/[1.5]"),
            Some(
                ".text-sm\\/\\[1\\.5\\] {\n  font-size: var(--text-sm);\n  line-height: 1.5;\n}"
                    .to_string()
            )
        );
        assert_eq!(compile("text-sm/unknown"), None);
        assert_eq!(
            compile("font-bold"),
            Some(".font-bold {\n  font-weight: var(--font-weight-bold);\n}".to_string())
        );
        assert_eq!(
            compile("font-stretch-50%"),
            Some(".font-stretch-50\\% {\n  font-stretch: 50%;\n}".to_string())
        );
        assert_eq!(compile("font-stretch-201%"), None);
        assert_eq!(compile("rounded"), Some(".rounded {\n  border-radius: var(--radius);\n}".to_string()));
        assert_eq!(compile("opacity-50"), Some(".opacity-50 {\n  opacity: 50%;\n}".to_string()));
    }

    #[test]
    fn generates_functional_variants() {
        assert_eq!(
            compile("data-[state=open]:flex"),
            Some(".data-\\[state\\=open\\]\\:flex[data-state=open] {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("aria-checked:flex"),
            Some(".aria-checked\\:flex[aria-checked=\"true\"] {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("supports-grid:grid"),
            Some("@supports (grid: var(--tw)) {\n  .supports-grid\\:grid {\n    display: grid;\n  }\n}".to_string())
        );
        assert_eq!(
            compile("max-md:flex"),
            Some("@media (width < 48rem) {\n  .max-md\\:flex {\n    display: flex;\n  }\n}".to_string())
        );
        assert_eq!(
            compile("min-[600px]:flex"),
            Some("@media (width >= 600px) {\n  .min-\\[600px\\]\\:flex {\n    display: flex;\n  }\n}".to_string())
        );
        assert_eq!(
            compile("nth-3:flex"),
            Some(".nth-3\\:flex:nth-child(3) {\n  display: flex;\n}".to_string())
        );
        assert_eq!(compile("nth-x:flex"), None);
    }

    #[test]
    fn generates_compound_variants() {
        assert_eq!(
            compile("peer-checked:flex"),
            Some(".peer-checked\\:flex:is(:where(.peer):checked ~ *) {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("has-checked:flex"),
            Some(".has-checked\\:flex:has(*:checked) {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("not-first:flex"),
            Some(".not-first\\:flex:not(*:first-child) {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("not-dark:flex"),
            Some(
                "@media not all and (prefers-color-scheme: dark) {\n  .not-dark\\:flex {\n    display: flex;\n  }\n}"
                    .to_string()
            )
        );
        assert_eq!(
            compile("in-focus:flex"),
            Some(":where(*:focus) .in-focus\\:flex {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("group-[.is-open]:flex"),
            Some(".group-\\[\\.is-open\\]\\:flex:is(:where(.group).is-open *) {\n  display: flex;\n}".to_string())
        );
        assert_eq!(
            compile("in-range:flex"),
            Some(".in-range\\:flex:in-range {\n  display: flex;\n}".to_string())
        );
        assert_eq!(compile("group-dark:flex"), None);
    }
}
