//! Structured form of a utility class string and the parser that produces it.
//!
//! Parsing is purely syntactic: no theme or registry is consulted, so
//! `bg-red-500` is split on its last dash into root `bg-red` and value `500`.
//! The resolution engine re-splits named values when it looks up generators.

/// Variant roots that can prefix another variant, as in `group-hover` or
/// `group-has-data-[state=open]`.
pub const COMPOUND_ROOTS: [&str; 5] = ["group", "peer", "has", "not", "in"];

const MATH_FUNCTIONS: [&str; 19] = [
    "calc", "min", "max", "clamp", "mod", "rem", "round", "sin", "cos", "tan", "asin", "acos",
    "atan", "atan2", "pow", "sqrt", "hypot", "log", "exp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    /// Outermost first, in the order they were written.
    pub variants: Vec<Variant>,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    Static {
        root: String,
        negative: bool,
    },
    Functional {
        root: String,
        value: Option<CandidateValue>,
        modifier: Option<Modifier>,
        negative: bool,
    },
    /// `[property:value]`
    Arbitrary {
        property: String,
        value: String,
        modifier: Option<Modifier>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateValue {
    Named(String),
    Arbitrary {
        value: String,
        /// Explicit hint such as `color` in `bg-[color:var(--brand)]`.
        data_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Named(String),
    Arbitrary(String),
}

impl Modifier {
    pub fn value(&self) -> &str {
        match self {
            Self::Named(value) | Self::Arbitrary(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    Static {
        root: String,
    },
    Functional {
        root: String,
        value: Option<VariantValue>,
        modifier: Option<Modifier>,
    },
    Arbitrary {
        selector: String,
    },
    Compound {
        root: String,
        modifier: Option<Modifier>,
        variant: Box<Variant>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantValue {
    Named(String),
    Arbitrary(String),
}

impl VariantValue {
    pub fn value(&self) -> &str {
        match self {
            Self::Named(value) | Self::Arbitrary(value) => value,
        }
    }
}

impl Candidate {
    pub fn negative(&self) -> bool {
        match &self.kind {
            CandidateKind::Static { negative, .. } | CandidateKind::Functional { negative, .. } => {
                *negative
            }
            CandidateKind::Arbitrary { .. } => false,
        }
    }
}

/// Splits `input` on `separator` wherever it is not nested inside brackets,
/// parentheses, braces or quotes and not escaped.
pub fn segment(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut closers = Vec::<char>::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0usize;

    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => closers.push(')'),
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ')' | ']' | '}' => {
                if closers.last() == Some(&ch) {
                    closers.pop();
                }
            }
            _ if ch == separator && closers.is_empty() => {
                parts.push(&input[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&input[start..]);
    parts
}

fn has_balanced_brackets(input: &str) -> bool {
    let mut closers = Vec::<char>::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in input.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => closers.push(')'),
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ')' | ']' | '}' => {
                if closers.pop() != Some(ch) {
                    return false;
                }
            }
            _ => {}
        }
    }

    closers.is_empty() && quote.is_none()
}

/// For input ending in `]`, returns the text before the matching `[` and the
/// text between the brackets.
fn split_trailing_arbitrary(input: &str) -> Option<(&str, &str)> {
    let last = input.len().checked_sub(1)?;
    if !input.ends_with(']') {
        return None;
    }

    let mut opens = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' => opens.push(idx),
            ']' => {
                let open = opens.pop()?;
                if idx == last {
                    return Some((&input[..open], &input[open + 1..last]));
                }
            }
            _ => {}
        }
    }
    None
}

pub fn parse_candidate(input: &str, prefix: Option<&str>) -> Option<Candidate> {
    if input.is_empty() || !has_balanced_brackets(input) {
        return None;
    }

    let mut parts = segment(input, ':');
    let base = parts.pop()?;

    if let Some(prefix) = prefix.filter(|prefix| !prefix.is_empty()) {
        if parts.first().copied() != Some(prefix) {
            return None;
        }
        parts.remove(0);
    }

    let (base, important) = strip_important(base)?;
    let variants = parts
        .into_iter()
        .map(parse_variant)
        .collect::<Option<Vec<_>>>()?;
    let kind = parse_base(base)?;

    Some(Candidate {
        kind,
        variants,
        important,
    })
}

fn strip_important(base: &str) -> Option<(&str, bool)> {
    match (base.strip_prefix('!'), base.strip_suffix('!')) {
        (Some(_), Some(_)) => None,
        (Some(rest), None) | (None, Some(rest)) => Some((rest, true)),
        (None, None) => Some((base, false)),
    }
}

fn parse_base(base: &str) -> Option<CandidateKind> {
    let mut parts = segment(base, '/');
    if parts.len() > 2 {
        return None;
    }
    let modifier = match parts.len() {
        2 => Some(parse_modifier(parts.pop()?)?),
        _ => None,
    };
    let main = parts.pop()?;

    if main.starts_with('[') {
        let (before, inner) = split_trailing_arbitrary(main)?;
        if !before.is_empty() {
            return None;
        }
        let (property, raw_value) = inner.split_once(':')?;
        if !is_valid_property(property) {
            return None;
        }
        return Some(CandidateKind::Arbitrary {
            property: property.to_string(),
            value: decode_trimmed(raw_value)?,
            modifier,
        });
    }

    let (main, negative) = match main.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (main, false),
    };

    if main.ends_with(']') {
        let (before, raw) = split_trailing_arbitrary(main)?;
        let root = before.strip_suffix('-')?;
        if !is_valid_utility_root(root) {
            return None;
        }
        let decoded = decode_trimmed(raw)?;
        let (data_type, value) = split_data_type(&decoded);
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        return Some(CandidateKind::Functional {
            root: root.to_string(),
            value: Some(CandidateValue::Arbitrary {
                value: value.to_string(),
                data_type: data_type.map(str::to_string),
            }),
            modifier,
            negative,
        });
    }

    if let Some((root, value)) = main.rsplit_once('-') {
        if !is_valid_utility_root(root) || !is_valid_named_value(value) {
            return None;
        }
        return Some(CandidateKind::Functional {
            root: root.to_string(),
            value: Some(CandidateValue::Named(value.to_string())),
            modifier,
            negative,
        });
    }

    if !is_valid_utility_root(main) {
        return None;
    }
    Some(match modifier {
        Some(modifier) => CandidateKind::Functional {
            root: main.to_string(),
            value: None,
            modifier: Some(modifier),
            negative,
        },
        None => CandidateKind::Static {
            root: main.to_string(),
            negative,
        },
    })
}

fn parse_modifier(raw: &str) -> Option<Modifier> {
    if raw.starts_with('[') {
        let (before, inner) = split_trailing_arbitrary(raw)?;
        if !before.is_empty() {
            return None;
        }
        return decode_trimmed(inner).map(Modifier::Arbitrary);
    }
    is_valid_named_modifier(raw).then(|| Modifier::Named(raw.to_string()))
}

/// Decoded bracket content without surrounding whitespace, or `None` when
/// nothing is left.
fn decode_trimmed(raw: &str) -> Option<String> {
    let decoded = decode_arbitrary_value(raw);
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Leading `[a-z-]+:` inside an arbitrary value is a data-type hint.
pub(crate) fn split_data_type(raw: &str) -> (Option<&str>, &str) {
    for (idx, ch) in raw.char_indices() {
        match ch {
            ':' if idx > 0 => return (Some(&raw[..idx]), &raw[idx + 1..]),
            'a'..='z' => {}
            '-' if idx > 0 => {}
            _ => break,
        }
    }
    (None, raw)
}

pub fn parse_variant(input: &str) -> Option<Variant> {
    if input.is_empty() {
        return None;
    }

    if input.starts_with('[') {
        let (before, inner) = split_trailing_arbitrary(input)?;
        if !before.is_empty() {
            return None;
        }
        let selector = decode_arbitrary_value(inner);
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        return Some(Variant::Arbitrary {
            selector: normalize_arbitrary_selector(selector),
        });
    }

    let mut parts = segment(input, '/');
    if parts.len() > 2 {
        return None;
    }
    let modifier = match parts.len() {
        2 => Some(parse_modifier(parts.pop()?)?),
        _ => None,
    };
    parse_variant_base(parts.pop()?, modifier)
}

fn parse_variant_base(base: &str, modifier: Option<Modifier>) -> Option<Variant> {
    for root in COMPOUND_ROOTS {
        let Some(rest) = base.strip_prefix(root).and_then(|rest| rest.strip_prefix('-')) else {
            continue;
        };
        if rest.is_empty() || rest.starts_with('[') {
            continue;
        }
        let nested = parse_variant_base(rest, None)?;
        return Some(Variant::Compound {
            root: root.to_string(),
            modifier,
            variant: Box::new(nested),
        });
    }

    if base.ends_with(']') {
        let (before, raw) = split_trailing_arbitrary(base)?;
        let root = before.strip_suffix('-')?;
        if !is_valid_variant_root(root) {
            return None;
        }
        return Some(Variant::Functional {
            root: root.to_string(),
            value: Some(VariantValue::Arbitrary(decode_trimmed(raw)?)),
            modifier,
        });
    }

    if let Some((root, value)) = base.rsplit_once('-') {
        if !is_valid_variant_root(root) || !is_valid_named_value(value) {
            return None;
        }
        return Some(Variant::Functional {
            root: root.to_string(),
            value: Some(VariantValue::Named(value.to_string())),
            modifier,
        });
    }

    if !is_valid_variant_root(base) {
        return None;
    }
    Some(match modifier {
        Some(modifier) => Variant::Functional {
            root: base.to_string(),
            value: None,
            modifier: Some(modifier),
        },
        None => Variant::Static {
            root: base.to_string(),
        },
    })
}

/// Selectors without a nesting `&` match the element itself; ones starting
/// with a combinator are relative to it.
pub(crate) fn normalize_arbitrary_selector(selector: &str) -> String {
    if selector.starts_with('@') || selector.contains('&') {
        selector.to_string()
    } else if selector.starts_with(['>', '+', '~']) {
        format!("& {selector}")
    } else {
        format!("&:is({selector})")
    }
}

fn is_valid_property(property: &str) -> bool {
    let mut chars = property.chars();
    matches!(chars.next(), Some('-' | 'a'..='z'))
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn is_valid_utility_root(root: &str) -> bool {
    let mut chars = root.chars();
    matches!(chars.next(), Some('a'..='z'))
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}

fn is_valid_variant_root(root: &str) -> bool {
    let mut chars = root.chars();
    matches!(chars.next(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '@')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
}

fn is_valid_named_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '%' | '_'))
}

fn is_valid_named_modifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '%' | '_' | '-'))
}

/// Decodes bracketed text: `_` becomes a space, `\_` a literal underscore.
/// Underscores inside `url(…)` are kept, and missing spaces around binary
/// operators inside math functions are inserted.
pub fn decode_arbitrary_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut idx = 0usize;
    let mut quote: Option<char> = None;
    let mut paren_depth = 0usize;
    let mut url_depth: Option<usize> = None;

    while idx < raw.len() {
        if quote.is_none() && starts_with_url_function(raw, idx) {
            out.push_str(&raw[idx..idx + "url(".len()]);
            idx += "url(".len();
            paren_depth += 1;
            url_depth = Some(paren_depth);
            continue;
        }

        let Some(ch) = raw[idx..].chars().next() else {
            break;
        };
        let size = ch.len_utf8();

        if ch == '\\' {
            let next_idx = idx + size;
            if let Some(next) = raw[next_idx..].chars().next() {
                if next == '_' {
                    out.push('_');
                } else {
                    out.push('\\');
                    out.push(next);
                }
                idx = next_idx + next.len_utf8();
                continue;
            }
            out.push('\\');
            idx += size;
            continue;
        }

        if quote.is_none() {
            match ch {
                '\'' | '"' => quote = Some(ch),
                '(' => paren_depth += 1,
                ')' => {
                    if url_depth == Some(paren_depth) {
                        url_depth = None;
                    }
                    paren_depth = paren_depth.saturating_sub(1);
                }
                _ => {}
            }
        } else if quote == Some(ch) {
            quote = None;
        }

        if ch == '_' && url_depth.is_none() {
            out.push(' ');
        } else {
            out.push(ch);
        }
        idx += size;
    }

    add_math_operator_spacing(&out)
}

fn starts_with_url_function(raw: &str, idx: usize) -> bool {
    raw[idx..]
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("url("))
}

fn add_math_operator_spacing(value: &str) -> String {
    if !value.contains('(') {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 8);
    // One entry per open parenthesis: whether it opens a math context.
    let mut math_stack = Vec::<bool>::new();
    let mut quote: Option<char> = None;

    for (idx, &ch) in chars.iter().enumerate() {
        if let Some(open) = quote {
            out.push(ch);
            if ch == open {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                out.push(ch);
            }
            '(' => {
                let name = trailing_identifier(&out).to_ascii_lowercase();
                let in_math = math_stack.last().copied().unwrap_or(false);
                math_stack.push(
                    MATH_FUNCTIONS.contains(&name.as_str()) || (name.is_empty() && in_math),
                );
                out.push(ch);
            }
            ')' => {
                math_stack.pop();
                out.push(ch);
            }
            '+' | '-' | '*' | '/' if math_stack.last() == Some(&true) => {
                let prev = out.chars().rev().find(|ch| !ch.is_whitespace());
                let next = chars.get(idx + 1).copied();
                let binary = match ch {
                    '+' | '-' => match prev {
                        Some(')') => true,
                        Some(prev) if prev.is_ascii_alphanumeric() || matches!(prev, '%' | '.') => {
                            // `1rem-2px` is a subtraction, `max-content` is one identifier.
                            trailing_operand(out.trim_end()).starts_with(|ch: char| ch.is_ascii_digit() || ch == '.')
                        }
                        _ => false,
                    },
                    _ => prev.is_some_and(|prev| !matches!(prev, '(' | '+' | '-' | '*' | '/' | ',')),
                };
                if !binary || next.is_none_or(|next| next == ')') {
                    out.push(ch);
                    continue;
                }
                if !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push(ch);
                if next.is_some_and(|next| !next.is_whitespace()) {
                    out.push(' ');
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

fn trailing_operand(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '%'))
        .last()
        .map_or(text.len(), |(idx, _)| idx);
    &text[start..]
}

fn trailing_identifier(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_alphanumeric() || *ch == '-')
        .last()
        .map_or(text.len(), |(idx, _)| idx);
    &text[start..]
}
