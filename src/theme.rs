//! Design tokens keyed by CSS custom-property name.
//!
//! A namespace such as `--color` groups every token whose name starts with
//! `--color-`. The token named exactly after the namespace (`--radius`) is
//! its `DEFAULT` entry.

use std::collections::HashMap;

const DEFAULT_THEME_CSS: &str = include_str!("default_theme.css");

pub const DEFAULT_KEY: &str = "DEFAULT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in palette, spacing scale, breakpoints and type scale.
    pub fn with_defaults() -> Self {
        Self::from_css(DEFAULT_THEME_CSS)
    }

    /// Reads every top-level `@theme { … }` block of `css`.
    pub fn from_css(css: &str) -> Self {
        let mut theme = Self::new();
        theme.apply_css(css);
        theme
    }

    pub fn apply_css(&mut self, css: &str) {
        for body in extract_theme_blocks(css) {
            for (name, value) in extract_theme_variable_declarations(&strip_comments(body)) {
                self.add(&name, &value);
            }
        }
    }

    /// Adds or replaces a token. `initial` removes it instead; on a
    /// `--ns-*` name it clears the whole namespace and on `--*` the theme.
    pub fn add(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value == "initial" {
            if name == "--*" {
                self.entries.clear();
                self.index.clear();
            } else if let Some(namespace) = name.strip_suffix("-*") {
                self.remove_namespace(namespace);
            } else {
                self.remove(name);
            }
            return;
        }

        match self.index.get(name) {
            Some(&idx) => self.entries[idx].1 = value.to_string(),
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Tokens of `namespace` in declaration order, keyed by the part of the
    /// name after the namespace. The namespace token itself is `DEFAULT`.
    pub fn namespace(&self, namespace: &str) -> Vec<(String, String)> {
        let prefix = format!("{namespace}-");
        self.entries
            .iter()
            .filter_map(|(name, value)| {
                if name == namespace {
                    Some((DEFAULT_KEY.to_string(), value.clone()))
                } else {
                    name.strip_prefix(&prefix)
                        .filter(|key| !key.is_empty())
                        .map(|key| (key.to_string(), value.clone()))
                }
            })
            .collect()
    }

    /// Name of the first token found for `key` across `namespaces`; a missing
    /// key or `DEFAULT` looks up the namespace token itself.
    pub fn lookup(&self, key: Option<&str>, namespaces: &[&str]) -> Option<String> {
        namespaces.iter().find_map(|namespace| {
            let name = match key {
                None | Some(DEFAULT_KEY) => namespace.to_string(),
                Some(key) => format!("{namespace}-{}", escape_key(key)),
            };
            self.contains(&name).then_some(name)
        })
    }

    /// `var(--token)` reference for `key`.
    pub fn resolve(&self, key: Option<&str>, namespaces: &[&str]) -> Option<String> {
        self.lookup(key, namespaces)
            .map(|name| format!("var({name})"))
    }

    /// The raw stored value for `key`.
    pub fn resolve_value(&self, key: Option<&str>, namespaces: &[&str]) -> Option<&str> {
        self.lookup(key, namespaces)
            .and_then(|name| self.get(&name))
    }

    pub fn remove(&mut self, name: &str) {
        self.retain(|entry| entry != name);
    }

    pub fn remove_namespace(&mut self, namespace: &str) {
        let prefix = format!("{namespace}-");
        self.retain(|name| name != namespace && !name.starts_with(&prefix));
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|(name, _)| keep(name));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| (name.clone(), idx))
            .collect();
    }
}

/// `2.5` is stored as `2_5`.
fn escape_key(key: &str) -> String {
    key.replace('.', "_")
}

fn extract_theme_blocks(css: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut cursor = 0usize;

    while let Some(rel_start) = css[cursor..].find("@theme") {
        let theme_idx = cursor + rel_start;
        if !is_top_level_position(css, theme_idx) {
            cursor = theme_idx + "@theme".len();
            continue;
        }
        let Some(open_rel) = css[theme_idx..].find('{') else {
            break;
        };
        let open_idx = theme_idx + open_rel;
        let Some(close_idx) = find_matching_brace(css, open_idx) else {
            break;
        };
        blocks.push(&css[open_idx + 1..close_idx]);
        cursor = close_idx + 1;
    }

    blocks
}

fn is_top_level_position(css: &str, target_idx: usize) -> bool {
    let mut depth = 0usize;
    let mut in_comment = false;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut chars = css.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if idx >= target_idx {
            break;
        }

        if in_comment {
            if ch == '*' && matches!(chars.peek(), Some((_, '/'))) {
                chars.next();
                in_comment = false;
            }
            continue;
        }

        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                in_comment = true;
            }
            '"' | '\'' => in_string = Some(ch),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    depth == 0 && !in_comment && in_string.is_none()
}

fn find_matching_brace(css: &str, open_idx: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_comment = false;
    let mut chars = css[open_idx..].char_indices().peekable();

    while let Some((rel_idx, ch)) = chars.next() {
        if in_comment {
            if ch == '*' && matches!(chars.peek(), Some((_, '/'))) {
                chars.next();
                in_comment = false;
            }
            continue;
        }

        match ch {
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                in_comment = true;
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open_idx + rel_idx);
                }
            }
            _ => {}
        }
    }

    None
}

fn strip_comments(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn extract_theme_variable_declarations(body: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut segment_start = 0usize;

    for (idx, ch) in body.char_indices() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '{' | '(' => depth += 1,
            '}' | ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                if let Some(declaration) = split_declaration(&body[segment_start..idx]) {
                    declarations.push(declaration);
                }
                segment_start = idx + 1;
            }
            _ => {}
        }
    }
    if let Some(declaration) = split_declaration(&body[segment_start..]) {
        declarations.push(declaration);
    }

    declarations
}

fn split_declaration(segment: &str) -> Option<(String, String)> {
    let (name, value) = segment.trim().split_once(':')?;
    let name = name.trim();
    let value = value.trim();
    if !name.starts_with("--") || value.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}
