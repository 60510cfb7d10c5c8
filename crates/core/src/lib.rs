//! Tokenizer and printer for CSS-value-like fragments.
//!
//! A value is split into a flat sequence of words, separators and function
//! calls whose arguments are nested sequences. Parsing never fails: anything
//! that is not a separator or a parenthesis ends up inside a word, and an
//! unbalanced `(` degrades to plain text so that [`to_css`] reproduces the
//! input byte for byte.

mod normalize;
mod walk;

use std::fmt;

pub use normalize::{simplify_arbitrary_variant, trim_whitespace};
pub use walk::{WalkAction, WalkContext, walk};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueAstNode {
    Word(String),
    /// Whitespace and punctuation between siblings, kept verbatim.
    Separator(String),
    Function {
        name: String,
        nodes: Vec<ValueAstNode>,
    },
}

impl ValueAstNode {
    pub fn word(value: impl Into<String>) -> Self {
        Self::Word(value.into())
    }

    pub fn separator(value: impl Into<String>) -> Self {
        Self::Separator(value.into())
    }

    pub fn function(name: impl Into<String>, nodes: Vec<ValueAstNode>) -> Self {
        Self::Function {
            name: name.into(),
            nodes,
        }
    }

    pub fn is_word(&self, value: &str) -> bool {
        matches!(self, Self::Word(word) if word == value)
    }

    pub fn is_separator(&self, value: &str) -> bool {
        matches!(self, Self::Separator(separator) if separator == value)
    }

    pub fn is_whitespace_separator(&self) -> bool {
        matches!(self, Self::Separator(separator) if !separator.is_empty() && separator.trim().is_empty())
    }
}

impl fmt::Display for ValueAstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(value) | Self::Separator(value) => f.write_str(value),
            Self::Function { name, nodes } => {
                f.write_str(name)?;
                f.write_str("(")?;
                for node in nodes {
                    write!(f, "{node}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn is_separator_char(ch: char) -> bool {
    matches!(ch, ',' | ':') || ch.is_whitespace()
}

pub fn parse(input: &str) -> Vec<ValueAstNode> {
    let mut root = Vec::new();
    let mut stack: Vec<(String, Vec<ValueAstNode>)> = Vec::new();
    let mut buffer = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                buffer.push(ch);
                if let Some(next) = chars.next() {
                    buffer.push(next);
                }
            }
            '"' | '\'' => {
                buffer.push(ch);
                let mut escaped = false;
                for next in chars.by_ref() {
                    buffer.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == ch {
                        break;
                    }
                }
            }
            '(' => {
                stack.push((std::mem::take(&mut buffer), Vec::new()));
            }
            ')' if !stack.is_empty() => {
                if let Some((name, mut nodes)) = stack.pop() {
                    flush_word(&mut buffer, &mut nodes);
                    current(&mut stack, &mut root).push(ValueAstNode::Function { name, nodes });
                }
            }
            ch if is_separator_char(ch) => {
                let target = current(&mut stack, &mut root);
                flush_word(&mut buffer, target);
                let mut separator = String::from(ch);
                while let Some(&next) = chars.peek() {
                    if !is_separator_char(next) {
                        break;
                    }
                    separator.push(next);
                    chars.next();
                }
                target.push(ValueAstNode::Separator(separator));
            }
            _ => buffer.push(ch),
        }
    }

    flush_word(&mut buffer, current(&mut stack, &mut root));

    // Unclosed functions become plain text again.
    while let Some((name, nodes)) = stack.pop() {
        let target = current(&mut stack, &mut root);
        target.push(ValueAstNode::Word(format!("{name}(")));
        target.extend(nodes);
    }

    root
}

fn current<'a>(
    stack: &'a mut [(String, Vec<ValueAstNode>)],
    root: &'a mut Vec<ValueAstNode>,
) -> &'a mut Vec<ValueAstNode> {
    match stack.last_mut() {
        Some((_, nodes)) => nodes,
        None => root,
    }
}

fn flush_word(buffer: &mut String, target: &mut Vec<ValueAstNode>) {
    if !buffer.is_empty() {
        target.push(ValueAstNode::Word(std::mem::take(buffer)));
    }
}

pub fn to_css(ast: &[ValueAstNode]) -> String {
    let mut out = String::new();
    for node in ast {
        out.push_str(&node.to_string());
    }
    out
}
