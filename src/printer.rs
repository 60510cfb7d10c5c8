//! Canonical text form of parsed candidates.

use classforge_core::{simplify_arbitrary_variant, trim_whitespace};

use crate::candidate::{
    Candidate, CandidateKind, CandidateValue, Modifier, Variant, VariantValue,
    normalize_arbitrary_selector, split_data_type,
};

pub fn print_candidate(prefix: Option<&str>, candidate: &Candidate) -> String {
    let mut parts = Vec::with_capacity(candidate.variants.len() + 2);

    if let Some(prefix) = prefix.filter(|prefix| !prefix.is_empty()) {
        parts.push(prefix.to_string());
    }
    parts.extend(candidate.variants.iter().map(print_variant));

    let mut base = String::new();
    if candidate.negative() {
        base.push('-');
    }

    match &candidate.kind {
        CandidateKind::Static { root, .. } => base.push_str(root),
        CandidateKind::Functional {
            root,
            value,
            modifier,
            ..
        } => {
            base.push_str(root);
            match value {
                Some(CandidateValue::Named(value)) => {
                    base.push('-');
                    base.push_str(value);
                }
                Some(CandidateValue::Arbitrary { value, data_type }) => {
                    base.push_str("-[");
                    match data_type {
                        Some(data_type) => {
                            base.push_str(data_type);
                            base.push(':');
                            base.push_str(&print_arbitrary(value));
                        }
                        None => base.push_str(&print_unhinted_arbitrary(value)),
                    }
                    base.push(']');
                }
                None => {}
            }
            push_modifier(&mut base, modifier.as_ref());
        }
        CandidateKind::Arbitrary {
            property,
            value,
            modifier,
        } => {
            base.push('[');
            base.push_str(property);
            base.push(':');
            base.push_str(&print_arbitrary(value));
            base.push(']');
            push_modifier(&mut base, modifier.as_ref());
        }
    }

    if candidate.important {
        base.push('!');
    }

    parts.push(base);
    parts.join(":")
}

pub fn print_variant(variant: &Variant) -> String {
    match variant {
        Variant::Static { root } => root.clone(),
        Variant::Arbitrary { selector } => {
            format!("[{}]", print_arbitrary(&simplify_selector(selector)))
        }
        Variant::Functional {
            root,
            value,
            modifier,
        } => {
            let mut out = root.clone();
            match value {
                Some(VariantValue::Named(value)) => {
                    out.push('-');
                    out.push_str(value);
                }
                Some(VariantValue::Arbitrary(value)) => {
                    out.push_str("-[");
                    out.push_str(&print_arbitrary(value));
                    out.push(']');
                }
                None => {}
            }
            push_modifier(&mut out, modifier.as_ref());
            out
        }
        Variant::Compound {
            root,
            modifier,
            variant,
        } => {
            let mut out = format!("{root}-{}", print_variant(variant));
            push_modifier(&mut out, modifier.as_ref());
            out
        }
    }
}

/// Literal underscores become `\_`, then spaces become `_`.
pub fn escape_arbitrary(input: &str) -> String {
    input.replace('_', "\\_").replace(' ', "_")
}

fn print_arbitrary(value: &str) -> String {
    escape_arbitrary(&trim_whitespace(value))
}

/// Compressing operator spacing must not make an unhinted value start with
/// something that reads back as a `type:` hint (`a - b:c` into `a-b:c`).
fn print_unhinted_arbitrary(value: &str) -> String {
    let trimmed = trim_whitespace(value);
    if split_data_type(&trimmed).0.is_some() {
        escape_arbitrary(value.trim())
    } else {
        escape_arbitrary(&trimmed)
    }
}

fn push_modifier(out: &mut String, modifier: Option<&Modifier>) {
    match modifier {
        Some(Modifier::Named(value)) => {
            out.push('/');
            out.push_str(value);
        }
        Some(Modifier::Arbitrary(value)) => {
            out.push_str("/[");
            out.push_str(&print_arbitrary(value));
            out.push(']');
        }
        None => {}
    }
}

/// `&:is(X)` prints as `X` only when parsing `X` back yields `&:is(X)` again.
fn simplify_selector(selector: &str) -> String {
    let simplified = simplify_arbitrary_variant(selector);
    if simplified != selector && normalize_arbitrary_selector(&simplified) == selector {
        simplified
    } else {
        selector.to_string()
    }
}
