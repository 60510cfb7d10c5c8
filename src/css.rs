//! Minimal CSS tree produced by utilities and wrapped by variants.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssNode {
    Declaration(Declaration),
    Rule {
        selector: String,
        nodes: Vec<CssNode>,
    },
    AtRule {
        name: String,
        params: String,
        nodes: Vec<CssNode>,
    },
}

pub fn decl(property: impl Into<String>, value: impl Into<String>) -> CssNode {
    CssNode::Declaration(Declaration {
        property: property.into(),
        value: value.into(),
        important: false,
    })
}

pub fn rule(selector: impl Into<String>, nodes: Vec<CssNode>) -> CssNode {
    CssNode::Rule {
        selector: selector.into(),
        nodes,
    }
}

pub fn at_rule(name: impl Into<String>, params: impl Into<String>, nodes: Vec<CssNode>) -> CssNode {
    CssNode::AtRule {
        name: name.into(),
        params: params.into(),
        nodes,
    }
}

impl CssNode {
    /// Flags every declaration in the subtree `!important`.
    pub fn mark_important(&mut self) {
        match self {
            Self::Declaration(declaration) => declaration.important = true,
            Self::Rule { nodes, .. } | Self::AtRule { nodes, .. } => {
                nodes.iter_mut().for_each(Self::mark_important);
            }
        }
    }

    fn write(&self, out: &mut String, depth: usize, minify: bool) {
        let indent = if minify { String::new() } else { "  ".repeat(depth) };
        match self {
            Self::Declaration(Declaration {
                property,
                value,
                important,
            }) => {
                let important = if *important { " !important" } else { "" };
                if minify {
                    out.push_str(&format!("{property}:{value}{};", important.trim_start()));
                } else {
                    out.push_str(&format!("{indent}{property}: {value}{important};\n"));
                }
            }
            Self::Rule { selector, nodes } => write_block(out, &indent, selector, nodes, depth, minify),
            Self::AtRule {
                name,
                params,
                nodes,
            } => {
                let header = if params.is_empty() {
                    format!("@{name}")
                } else {
                    format!("@{name} {params}")
                };
                if nodes.is_empty() {
                    out.push_str(&format!("{indent}{header};"));
                    if !minify {
                        out.push('\n');
                    }
                } else {
                    write_block(out, &indent, &header, nodes, depth, minify);
                }
            }
        }
    }
}

fn write_block(
    out: &mut String,
    indent: &str,
    header: &str,
    nodes: &[CssNode],
    depth: usize,
    minify: bool,
) {
    if minify {
        out.push_str(header);
        out.push('{');
        for node in nodes {
            node.write(out, depth + 1, minify);
        }
        if out.ends_with(';') {
            out.pop();
        }
        out.push('}');
        return;
    }

    out.push_str(&format!("{indent}{header} {{\n"));
    for node in nodes {
        node.write(out, depth + 1, minify);
    }
    out.push_str(&format!("{indent}}}\n"));
}

/// Renders `nodes` as a stylesheet. Minified output has no whitespace
/// between tokens and no trailing semicolons.
pub fn to_css(nodes: &[CssNode], minify: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write(&mut out, 0, minify);
    }
    if minify && out.ends_with(';') {
        out.pop();
    }
    out
}

impl fmt::Display for CssNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write(&mut out, 0, false);
        f.write_str(out.trim_end())
    }
}

/// Escapes a raw class name for use after `.` in a selector.
pub fn escape_selector(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() * 2);

    for (idx, ch) in class.chars().enumerate() {
        match ch {
            '0'..='9' if idx == 0 => escaped.push_str(&format!("\\3{ch} ")),
            '\\' | ':' | '/' | '[' | ']' | '(' | ')' | '{' | '}' | '&' | '>' | '+' | '~' | ','
            | '%' | '=' | '!' | '*' | '@' | '#' | '\'' | '"' | '.' | '$' | '^' | '|' | '?' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' ' => escaped.push_str("\\ "),
            _ => escaped.push(ch),
        }
    }

    escaped
}
