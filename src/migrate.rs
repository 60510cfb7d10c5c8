//! Canonicalization passes built on the parser and printer: bare-value
//! promotion, `theme(…)` to token references, and rewriting candidates in
//! place inside source text.

use classforge_core::{ValueAstNode, WalkAction, parse, to_css, walk};
use log::debug;

use crate::candidate::{Candidate, CandidateKind, CandidateValue, Variant, VariantValue};
use crate::design_system::DesignSystem;
use crate::printer::print_variant;
use crate::theme::Theme;

/// Legacy dotted theme roots and the token namespaces they became.
const THEME_PATHS: [(&str, &str); 17] = [
    ("colors", "--color"),
    ("spacing", "--spacing"),
    ("fontSize", "--text"),
    ("fontFamily", "--font"),
    ("fontWeight", "--font-weight"),
    ("letterSpacing", "--tracking"),
    ("lineHeight", "--leading"),
    ("borderRadius", "--radius"),
    ("boxShadow", "--shadow"),
    ("screens", "--breakpoint"),
    ("aspectRatio", "--aspect"),
    ("backgroundColor", "--background-color"),
    ("textColor", "--text-color"),
    ("borderColor", "--border-color"),
    ("blur", "--blur"),
    ("animation", "--animate"),
    ("transitionTimingFunction", "--ease"),
];

/// Where a `theme(…)` call appears. A `var()` reference is only valid in
/// declaration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeContext {
    Declaration,
    AtRuleParams,
}

/// Substring of some source text the scanner reported as a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl RawCandidate {
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self { text, start, end }
    }
}

/// Full canonicalization of one raw class string. Input that is not a
/// candidate comes back unchanged.
pub fn migrate_candidate(system: &DesignSystem, raw: &str) -> String {
    let Some(mut candidate) = system.parse_candidate(raw) else {
        return raw.to_string();
    };
    migrate_arbitrary_theme_calls(system.theme(), &mut candidate);
    promote_candidate(system, &mut candidate);
    system.print_candidate(&candidate)
}

/// Replaces arbitrary values and variant values with equivalent named ones
/// where that does not change the generated CSS.
pub fn arbitrary_value_to_bare_value(system: &DesignSystem, raw: &str) -> String {
    let Some(mut candidate) = system.parse_candidate(raw) else {
        return raw.to_string();
    };
    promote_candidate(system, &mut candidate);
    system.print_candidate(&candidate)
}

fn promote_candidate(system: &DesignSystem, candidate: &mut Candidate) {
    candidate.variants.iter_mut().for_each(promote_variant);
    if let Some(promoted) = promote_value(system, candidate) {
        *candidate = promoted;
    }
}

fn promote_value(system: &DesignSystem, candidate: &Candidate) -> Option<Candidate> {
    let CandidateKind::Functional {
        root,
        value: Some(CandidateValue::Arbitrary {
            value,
            data_type: None,
        }),
        modifier,
        negative,
    } = &candidate.kind
    else {
        return None;
    };
    let is_bare = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '%' | '/' | '-'));
    if value.is_empty() || !is_bare {
        return None;
    }

    let named = Candidate {
        kind: CandidateKind::Functional {
            root: root.clone(),
            value: Some(CandidateValue::Named(value.clone())),
            modifier: modifier.clone(),
            negative: *negative,
        },
        variants: candidate.variants.clone(),
        important: candidate.important,
    };
    let reparsed = system.parse_candidate(&system.print_candidate(&named))?;
    let same_variants = reparsed.variants.len() == candidate.variants.len()
        && reparsed
            .variants
            .iter()
            .zip(&candidate.variants)
            .all(|(a, b)| print_variant(a) == print_variant(b));
    if !same_variants || reparsed.important != candidate.important {
        return None;
    }

    let original = system.resolve(candidate)?;
    (system.resolve(&reparsed).as_ref() == Some(&original)).then_some(reparsed)
}

fn promote_variant(variant: &mut Variant) {
    match variant {
        Variant::Compound { variant, .. } => promote_variant(variant),
        Variant::Functional {
            root,
            value: Some(value @ VariantValue::Arbitrary(_)),
            modifier: None,
        } => {
            if let Some(named) = bare_variant_value(root, value.value()) {
                *value = VariantValue::Named(named);
            }
        }
        _ => {}
    }
}

fn bare_variant_value(root: &str, value: &str) -> Option<String> {
    let is_key = |key: &str| {
        !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
    };
    match root {
        "data" => is_key(value).then(|| value.to_string()),
        // Only the `="true"` form is what the named `aria-*` variant produces.
        "aria" => {
            let (key, expected) = value.split_once('=')?;
            let expected = expected.trim_matches('"');
            (is_key(key) && expected == "true").then(|| key.to_string())
        }
        "supports" => {
            let mut chars = value.chars();
            let valid = matches!(chars.next(), Some('a'..='z' | '-'))
                && chars.all(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '-'));
            valid.then(|| value.to_string())
        }
        _ => None,
    }
}

fn migrate_arbitrary_theme_calls(theme: &Theme, candidate: &mut Candidate) {
    match &mut candidate.kind {
        CandidateKind::Functional {
            value: Some(CandidateValue::Arbitrary { value, .. }),
            ..
        }
        | CandidateKind::Arbitrary { value, .. } => {
            *value = migrate_theme_to_var(theme, value, ThemeContext::Declaration);
        }
        _ => {}
    }
}

/// Rewrites every `theme(dotted.path)` call in `value` whose path names an
/// existing token.
pub fn migrate_theme_to_var(theme: &Theme, value: &str, context: ThemeContext) -> String {
    if !value.contains("theme(") {
        return value.to_string();
    }

    let mut ast = parse(value);
    walk(&mut ast, |node, _| {
        let ValueAstNode::Function { name, nodes } = node else {
            return WalkAction::Continue;
        };
        if name != "theme" {
            return WalkAction::Continue;
        }
        match theme_call_replacement(theme, &to_css(nodes), context) {
            Some(replacement) => WalkAction::Replace(vec![replacement]),
            None => WalkAction::Skip,
        }
    });
    to_css(&ast)
}

fn theme_call_replacement(
    theme: &Theme,
    arguments: &str,
    context: ThemeContext,
) -> Option<ValueAstNode> {
    let arguments = arguments.trim();
    let (token, modifier) = match theme_token(theme, arguments) {
        Some(token) => (token, None),
        None => {
            let (path, modifier) = arguments.rsplit_once('/')?;
            let modifier = modifier.split_whitespace().collect::<String>();
            if modifier.is_empty() {
                return None;
            }
            (theme_token(theme, path.trim())?, Some(modifier))
        }
    };

    Some(match (context, modifier) {
        (ThemeContext::Declaration, None) => {
            ValueAstNode::function("var", vec![ValueAstNode::word(token)])
        }
        (_, Some(modifier)) => ValueAstNode::function(
            "theme",
            vec![ValueAstNode::word(format!("{token} / {modifier}"))],
        ),
        (ThemeContext::AtRuleParams, None) => {
            ValueAstNode::function("theme", vec![ValueAstNode::word(token)])
        }
    })
}

/// `colors.red.500` → `--color-red-500`, when the theme has that token.
fn theme_token(theme: &Theme, path: &str) -> Option<String> {
    if path.starts_with("--") {
        return None;
    }
    let path = path.replace('[', ".").replace(']', "");
    let mut segments = path.split('.').filter(|segment| !segment.is_empty());
    let root = segments.next()?;
    let (_, namespace) = THEME_PATHS.iter().find(|(legacy, _)| *legacy == root)?;

    let mut token = namespace.to_string();
    for segment in segments.filter(|segment| *segment != "DEFAULT") {
        token.push('-');
        token.push_str(segment);
    }
    if theme.contains(&token) {
        Some(token)
    } else {
        debug!("`theme({path})` has no matching token");
        None
    }
}

/// Rewrites `theme(…)` calls in stylesheet text: at-rule preludes keep the
/// function form, declaration values get `var(…)`.
pub fn migrate_stylesheet(theme: &Theme, css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote = None;

    for (idx, ch) in css.char_indices() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '{' | '}' | ';' if depth == 0 => {
                out.push_str(&migrate_statement(theme, &css[start..idx], ch));
                out.push(ch);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    out.push_str(&migrate_statement(theme, &css[start..], ';'));
    out
}

fn migrate_statement(theme: &Theme, statement: &str, terminator: char) -> String {
    if !statement.contains("theme(") {
        return statement.to_string();
    }

    let body = statement.trim_start();
    let lead = statement.len() - body.len();
    if let Some(rest) = body.strip_prefix('@') {
        let name_len = rest
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-'))
            .unwrap_or(rest.len());
        let split = lead + 1 + name_len;
        return format!(
            "{}{}",
            &statement[..split],
            migrate_theme_to_var(theme, &statement[split..], ThemeContext::AtRuleParams)
        );
    }

    // Selectors are left alone.
    if terminator == '{' {
        return statement.to_string();
    }
    match statement.find(':') {
        Some(colon) => format!(
            "{}{}",
            &statement[..=colon],
            migrate_theme_to_var(theme, &statement[colon + 1..], ThemeContext::Declaration)
        ),
        None => statement.to_string(),
    }
}

/// Applies `rewrite` to every candidate and splices the results into
/// `content`, back to front so earlier offsets stay valid. Candidates whose
/// offsets do not match `content` or overlap an applied one are skipped.
pub fn rewrite_candidates<F>(content: &str, candidates: &[RawCandidate], mut rewrite: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut ordered = candidates.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut out = content.to_string();
    let mut boundary = content.len();
    for candidate in ordered {
        let matches = content.get(candidate.start..candidate.end) == Some(candidate.text.as_str());
        if candidate.end > boundary || !matches {
            debug!(
                "skipping `{}` at {}..{}",
                candidate.text, candidate.start, candidate.end
            );
            continue;
        }
        let replacement = rewrite(&candidate.text);
        if replacement != candidate.text {
            out.replace_range(candidate.start..candidate.end, &replacement);
        }
        boundary = candidate.start;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        RawCandidate, ThemeContext, arbitrary_value_to_bare_value, bare_variant_value,
        migrate_candidate, migrate_stylesheet, migrate_theme_to_var, rewrite_candidates,
    };
    use crate::design_system::{DesignSystem, DesignSystemBuilder};
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;

    fn system() -> DesignSystem {
        let mut theme = Theme::with_defaults();
        theme.add("--spacing-4", "1rem");
        DesignSystemBuilder::with_defaults(theme)
            .expect("defaults register")
            .build()
    }

    #[test]
    fn promotes_variant_values() {
        assert_eq!(bare_variant_value("data", "selected"), Some("selected".to_string()));
        assert_eq!(bare_variant_value("data", "state=open"), None);
        assert_eq!(bare_variant_value("aria", "selected=\"true\""), Some("selected".to_string()));
        assert_eq!(bare_variant_value("aria", "selected=true"), Some("selected".to_string()));
        assert_eq!(bare_variant_value("aria", "selected*=\"true\""), None);
        assert_eq!(bare_variant_value("aria", "selected=\"false\""), None);
        assert_eq!(bare_variant_value("aria", "selected"), None);
        assert_eq!(bare_variant_value("supports", "gap"), Some("gap".to_string()));
        assert_eq!(bare_variant_value("supports", "display:grid"), None);
        assert_eq!(bare_variant_value("nth", "3"), None);
    }

    #[test]
    fn promotes_values_only_when_css_is_unchanged() {
        let system = system();
        for (input, expected) in [
            ("col-start-[7]", "col-start-7"),
            ("aspect-[12/34]", "aspect-12/34"),
            ("aspect-[1.2/34]", "aspect-[1.2/34]"),
            ("text-[1/2]", "text-[1/2]"),
            ("bg-[color:red]", "bg-[color:red]"),
            ("hover:data-[selected]:flex!", "hover:data-selected:flex!"),
            ("not a candidate", "not a candidate"),
        ] {
            assert_eq!(arbitrary_value_to_bare_value(&system, input), expected, "input: {input}");
        }
    }

    #[test]
    fn rewrites_theme_calls_by_context() {
        let theme = system().theme().clone();
        assert_eq!(
            migrate_theme_to_var(&theme, "theme(colors.red.900)", ThemeContext::Declaration),
            "var(--color-red-900)"
        );
        assert_eq!(
            migrate_theme_to_var(&theme, "theme(spacing.4)", ThemeContext::AtRuleParams),
            "theme(--spacing-4)"
        );
        assert_eq!(
            migrate_theme_to_var(&theme, "1px solid theme(colors.red.200/75%)", ThemeContext::Declaration),
            "1px solid theme(--color-red-200 / 75%)"
        );
        assert_eq!(
            migrate_theme_to_var(&theme, "theme(colors.nope.900)", ThemeContext::Declaration),
            "theme(colors.nope.900)"
        );
        assert_eq!(
            migrate_theme_to_var(&theme, "theme(borderRadius.DEFAULT)", ThemeContext::Declaration),
            "var(--radius)"
        );
    }

    #[test]
    fn migrates_stylesheets() {
        let theme = system().theme().clone();
        let css = "@media theme(spacing.4) {\n  .a { color: theme(colors.red.900 / 75%); }\n}";
        assert_eq!(
            migrate_stylesheet(&theme, css),
            "@media theme(--spacing-4) {\n  .a { color: theme(--color-red-900 / 75%); }\n}"
        );
    }

    #[test]
    fn migrates_theme_calls_inside_candidates() {
        let system = system();
        assert_eq!(
            migrate_candidate(&system, "w-[theme(spacing.4)]"),
            "w-[var(--spacing-4)]"
        );
        assert_eq!(migrate_candidate(&system, "!flex"), "flex!");
    }

    #[test]
    fn rewrites_candidates_back_to_front() {
        let content = r#"<div class="flex! hover:data-[open]:p-4 x">"#;
        let candidates = vec![
            RawCandidate::new("flex!", 12),
            RawCandidate::new("hover:data-[open]:p-4", 18),
            RawCandidate::new("wrong", 0),
        ];
        let rewritten = rewrite_candidates(content, &candidates, |raw| {
            raw.replace("data-[open]", "data-open")
        });
        assert_eq!(rewritten, r#"<div class="flex! hover:data-open:p-4 x">"#);
    }
}
