use classforge::migrate::{
    RawCandidate, ThemeContext, arbitrary_value_to_bare_value, migrate_candidate,
    migrate_stylesheet, migrate_theme_to_var, rewrite_candidates,
};
use classforge::{DesignSystem, DesignSystemBuilder, Theme};
use pretty_assertions::assert_eq;

fn system() -> DesignSystem {
    let mut theme = Theme::with_defaults();
    theme.add("--spacing-4", "1rem");
    DesignSystemBuilder::with_defaults(theme)
        .expect("defaults register")
        .build()
}

#[test]
fn arbitrary_values_become_bare_values() {
    let system = system();
    let cases = [
        ("aspect-[12/34]", "aspect-12/34"),
        ("aspect-[1.2/34]", "aspect-[1.2/34]"),
        ("col-start-[7]", "col-start-7"),
        ("flex-[2]", "flex-2"),
        ("font-stretch-[50%]", "font-stretch-50%"),
        ("font-stretch-[201%]", "font-stretch-[201%]"),
        ("font-stretch-[49%]", "font-stretch-[49%]"),
        ("font-stretch-[1/2]", "font-stretch-[1/2]"),
        ("text-[1/2]", "text-[1/2]"),
        ("data-[selected]:flex", "data-selected:flex"),
        ("data-[foo=bar]:flex", "data-[foo=bar]:flex"),
        ("supports-[gap]:flex", "supports-gap:flex"),
        ("supports-[display:grid]:flex", "supports-[display:grid]:flex"),
        ("aria-[selected=\"true\"]:flex", "aria-selected:flex"),
        ("aria-[selected='true']:flex", "aria-[selected='true']:flex"),
        ("aria-[selected*=\"true\"]:flex", "aria-[selected*=\"true\"]:flex"),
        ("group-data-[selected]:flex", "group-data-selected:flex"),
        ("group-aria-[selected]:flex", "group-aria-[selected]:flex"),
        ("group-has-aria-[selected]:flex", "group-has-aria-[selected]:flex"),
        ("max-lg:hover:data-[selected]:flex!", "max-lg:hover:data-selected:flex!"),
        (
            "data-[selected]:aria-[selected=\"true\"]:aspect-[12/34]",
            "data-selected:aria-selected:aspect-12/34",
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(arbitrary_value_to_bare_value(&system, input), expected, "input: {input}");
    }
}

#[test]
fn promoted_candidates_generate_the_same_declarations() {
    let system = system();
    for input in ["aspect-[12/34]", "col-start-[7]", "flex-[2]", "font-stretch-[50%]"] {
        let promoted = arbitrary_value_to_bare_value(&system, input);
        assert_ne!(promoted, input);
        let resolve = |raw: &str| {
            system
                .parse_candidate(raw)
                .and_then(|candidate| system.resolve(&candidate))
        };
        assert_eq!(resolve(&promoted), resolve(input), "input: {input}");
    }
}

#[test]
fn theme_calls_become_token_references() {
    let system = system();
    let theme = system.theme();

    assert_eq!(
        migrate_theme_to_var(theme, "theme(spacing.4)", ThemeContext::AtRuleParams),
        "theme(--spacing-4)"
    );
    assert_eq!(
        migrate_theme_to_var(theme, "theme(colors.red.900)", ThemeContext::Declaration),
        "var(--color-red-900)"
    );
    assert_eq!(
        migrate_theme_to_var(theme, "theme(colors.red.900 / 75%)", ThemeContext::Declaration),
        "theme(--color-red-900 / 75%)"
    );
    assert_eq!(
        migrate_theme_to_var(theme, "theme(colors.red.200/75%)", ThemeContext::Declaration),
        "theme(--color-red-200 / 75%)"
    );
    assert_eq!(
        migrate_theme_to_var(theme, "theme(--color-red-200)", ThemeContext::Declaration),
        "theme(--color-red-200)"
    );
}

#[test]
fn stylesheets_are_migrated_by_context() {
    let system = system();
    let css = r#"@media theme(spacing.4) {
  .foo {
    background-color: theme(colors.red.900);
    color: theme(colors.red.900 / 75%);
    border-color: theme(colors.red.200/75%);
  }
}"#;
    assert_eq!(
        migrate_stylesheet(system.theme(), css),
        r#"@media theme(--spacing-4) {
  .foo {
    background-color: var(--color-red-900);
    color: theme(--color-red-900 / 75%);
    border-color: theme(--color-red-200 / 75%);
  }
}"#
    );
}

#[test]
fn templates_are_rewritten_in_place() {
    let system = system();
    let content = "<div class=\"!flex data-[open]:col-start-[7] text-[1/2]\"></div>";
    let candidates = ["!flex", "data-[open]:col-start-[7]", "text-[1/2]"]
        .iter()
        .map(|text| RawCandidate::new(*text, content.find(text).expect("present")))
        .collect::<Vec<_>>();

    let rewritten = rewrite_candidates(content, &candidates, |raw| migrate_candidate(&system, raw));
    assert_eq!(rewritten, "<div class=\"flex! data-open:col-start-7 text-[1/2]\"></div>");
}
