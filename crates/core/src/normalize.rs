use std::collections::BTreeSet;

use crate::{ValueAstNode, WalkAction, parse, to_css, walk};

const OPERATORS: [&str; 4] = ["+", "-", "*", "/"];

/// Removes the single spaces around binary operators (`calc(1 + 2)` becomes
/// `calc(1+2)`) and any purely-whitespace separator at the start or end of a
/// sequence. Operators surrounded by anything other than exactly one space on
/// both sides are left alone.
pub fn trim_whitespace(input: &str) -> String {
    let mut ast = parse(input);
    let mut drop = BTreeSet::<Vec<usize>>::new();

    walk(&mut ast, |node, ctx| {
        match node {
            ValueAstNode::Word(word) if OPERATORS.contains(&word.as_str()) => {
                let single_space =
                    |node: Option<&ValueAstNode>| node.is_some_and(|node| node.is_separator(" "));
                if single_space(ctx.previous()) && single_space(ctx.next()) {
                    drop.insert(ctx.sibling_path(ctx.index - 1));
                    drop.insert(ctx.sibling_path(ctx.index + 1));
                }
            }
            ValueAstNode::Separator(_) if node.is_whitespace_separator() => {
                if ctx.is_first() || ctx.is_last() {
                    drop.insert(ctx.path.to_vec());
                }
            }
            _ => {}
        }
        WalkAction::Continue
    });

    if !drop.is_empty() {
        walk(&mut ast, |_, ctx| {
            if drop.contains(ctx.path) {
                WalkAction::Replace(Vec::new())
            } else {
                WalkAction::Continue
            }
        });
    }

    to_css(&ast)
}

/// `&:is(X)` becomes `X`. Every other selector is returned unchanged.
pub fn simplify_arbitrary_variant(input: &str) -> String {
    let ast = parse(input);
    match ast.as_slice() {
        [amp, colon, ValueAstNode::Function { name, nodes }]
            if amp.is_word("&") && colon.is_separator(":") && name == "is" =>
        {
            to_css(nodes)
        }
        _ => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{simplify_arbitrary_variant, trim_whitespace};
    use pretty_assertions::assert_eq;

    #[test]
    fn compresses_single_spaces_around_operators() {
        assert_eq!(trim_whitespace("calc(1 + 2)"), "calc(1+2)");
        assert_eq!(trim_whitespace("calc(100% - 1rem)"), "calc(100%-1rem)");
        assert_eq!(trim_whitespace("calc(2 * var(--x) / 3)"), "calc(2*var(--x)/3)");
    }

    #[test]
    fn leaves_other_operator_spacing_alone() {
        assert_eq!(trim_whitespace("calc(1+2)"), "calc(1+2)");
        assert_eq!(trim_whitespace("calc(1  +  2)"), "calc(1  +  2)");
        assert_eq!(trim_whitespace("calc(1 +  2)"), "calc(1 +  2)");
    }

    #[test]
    fn strips_leading_and_trailing_whitespace() {
        assert_eq!(trim_whitespace(" red "), "red");
        assert_eq!(trim_whitespace("var( --x )"), "var(--x)");
        assert_eq!(trim_whitespace("1px solid red"), "1px solid red");
    }

    #[test]
    fn leading_punctuation_separators_are_kept() {
        assert_eq!(trim_whitespace(":hover"), ":hover");
    }

    #[test]
    fn simplifies_is_selector() {
        assert_eq!(simplify_arbitrary_variant("&:is(.foo)"), ".foo");
        assert_eq!(
            simplify_arbitrary_variant("&:is(:where(.a) > *)"),
            ":where(.a) > *"
        );
    }

    #[test]
    fn other_selectors_are_not_simplified() {
        assert_eq!(simplify_arbitrary_variant("&:hover"), "&:hover");
        assert_eq!(simplify_arbitrary_variant("&:is(.a) .b"), "&:is(.a) .b");
        assert_eq!(simplify_arbitrary_variant(".a:is(.b)"), ".a:is(.b)");
    }
}
