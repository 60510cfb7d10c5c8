//! Data types of arbitrary values, used to pick between generators that share
//! a root.

use std::fmt;
use std::str::FromStr;

use classforge_core::{ValueAstNode, parse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Any,
    Color,
    Length,
    Percentage,
    Number,
    Integer,
    Ratio,
    Angle,
    Url,
    Image,
    LineWidth,
    Position,
    FamilyName,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Color => "color",
            Self::Length => "length",
            Self::Percentage => "percentage",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Ratio => "ratio",
            Self::Angle => "angle",
            Self::Url => "url",
            Self::Image => "image",
            Self::LineWidth => "line-width",
            Self::Position => "position",
            Self::FamilyName => "family-name",
        }
    }

    /// Whether `value` is syntactically a value of this type.
    pub fn matches(self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        if self == Self::Any || is_var_reference(value) {
            return true;
        }
        match self {
            Self::Any => true,
            Self::Color => is_color(value),
            Self::Length => is_length(value),
            Self::Percentage => is_percentage(value) || is_math_function(value),
            Self::Number => is_number(value) || is_math_function(value),
            Self::Integer => is_integer(value),
            Self::Ratio => is_ratio(value),
            Self::Angle => is_angle(value),
            Self::Url => function_name(value).is_some_and(|name| name == "url"),
            Self::Image => is_image(value),
            Self::LineWidth => matches!(value, "thin" | "medium" | "thick") || is_length(value),
            Self::Position => is_position(value),
            Self::FamilyName => is_family_name(value),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "any" => Self::Any,
            "color" => Self::Color,
            "length" => Self::Length,
            "percentage" => Self::Percentage,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "ratio" => Self::Ratio,
            "angle" => Self::Angle,
            "url" => Self::Url,
            "image" => Self::Image,
            "line-width" => Self::LineWidth,
            "position" => Self::Position,
            "family-name" => Self::FamilyName,
            other => return Err(format!("unknown data type `{other}`")),
        })
    }
}

/// First of `types` that `value` is a valid instance of.
pub fn infer_data_type(value: &str, types: &[DataType]) -> Option<DataType> {
    types.iter().copied().find(|data_type| data_type.matches(value))
}

const LENGTH_UNITS: [&str; 31] = [
    "px", "rem", "em", "ex", "ch", "cap", "ic", "lh", "rlh", "vw", "vh", "vi", "vb", "vmin",
    "vmax", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "cqw", "cqh", "cqi", "cqb", "cqmin",
    "cqmax", "cm", "mm", "in", "pt",
];

const ANGLE_UNITS: [&str; 4] = ["deg", "rad", "grad", "turn"];

const COLOR_FUNCTIONS: [&str; 12] = [
    "rgb",
    "rgba",
    "hsl",
    "hsla",
    "hwb",
    "lab",
    "lch",
    "oklab",
    "oklch",
    "color",
    "color-mix",
    "light-dark",
];

const IMAGE_FUNCTIONS: [&str; 10] = [
    "url",
    "image",
    "image-set",
    "cross-fade",
    "element",
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
];

const MATH_FUNCTIONS: [&str; 5] = ["calc", "min", "max", "clamp", "round"];

const POSITION_KEYWORDS: [&str; 5] = ["left", "right", "top", "bottom", "center"];

const NAMED_COLORS: [&str; 150] = [
    "transparent", "currentcolor", "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure",
    "beige", "bisque", "black", "blanchedalmond", "blue", "blueviolet", "brown", "burlywood",
    "cadetblue", "chartreuse", "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson",
    "cyan", "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey",
    "darkkhaki", "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred",
    "darksalmon", "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey",
    "darkturquoise", "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey",
    "dodgerblue", "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro",
    "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow", "grey", "honeydew",
    "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender", "lavenderblush",
    "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink",
    "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey",
    "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon",
    "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise", "mediumvioletred",
    "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite", "navy", "oldlace",
    "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod", "palegreen",
    "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum",
    "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue", "saddlebrown",
    "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver", "skyblue",
    "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan", "teal",
    "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow",
    "yellowgreen",
];

/// Name of the function when the whole value is a single function call.
fn function_name(value: &str) -> Option<String> {
    match parse(value).as_slice() {
        [ValueAstNode::Function { name, .. }] => Some(name.to_ascii_lowercase()),
        _ => None,
    }
}

fn is_var_reference(value: &str) -> bool {
    function_name(value).is_some_and(|name| name == "var")
}

fn is_math_function(value: &str) -> bool {
    function_name(value).is_some_and(|name| MATH_FUNCTIONS.contains(&name.as_str()))
}

fn is_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|ch| ch.is_ascii_hexdigit());
    }
    if let Some(name) = function_name(value) {
        return COLOR_FUNCTIONS.contains(&name.as_str());
    }
    NAMED_COLORS.contains(&value.to_ascii_lowercase().as_str())
}

/// Splits a numeric literal from its unit, as in `1.5rem` → (`1.5`, `rem`).
fn split_number(value: &str) -> Option<(&str, &str)> {
    let bytes = value.as_bytes();
    let mut idx = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }
    let digits_start = idx;
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(idx) {
        match byte {
            b'0'..=b'9' => idx += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                idx += 1;
            }
            _ => break,
        }
    }
    let number = &value[..idx];
    if !number[digits_start..].bytes().any(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some((number, &value[idx..]))
}

fn is_number(value: &str) -> bool {
    split_number(value).is_some_and(|(_, unit)| unit.is_empty())
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

fn is_percentage(value: &str) -> bool {
    split_number(value).is_some_and(|(_, unit)| unit == "%")
}

fn is_length(value: &str) -> bool {
    if is_math_function(value) {
        return true;
    }
    match split_number(value) {
        Some((number, "")) => number.trim_start_matches(['+', '-']).trim_matches(['0', '.']).is_empty(),
        Some((_, unit)) => LENGTH_UNITS.contains(&unit.to_ascii_lowercase().as_str()),
        None => false,
    }
}

fn is_angle(value: &str) -> bool {
    is_math_function(value)
        || split_number(value)
            .is_some_and(|(_, unit)| ANGLE_UNITS.contains(&unit.to_ascii_lowercase().as_str()))
}

fn is_ratio(value: &str) -> bool {
    let Some((numerator, denominator)) = value.split_once('/') else {
        return false;
    };
    is_number(numerator.trim()) && is_number(denominator.trim())
}

fn is_image(value: &str) -> bool {
    function_name(value).is_some_and(|name| IMAGE_FUNCTIONS.contains(&name.as_str()))
}

fn is_position(value: &str) -> bool {
    value.split_whitespace().all(|part| {
        POSITION_KEYWORDS.contains(&part) || is_length(part) || is_percentage(part)
    })
}

fn is_family_name(value: &str) -> bool {
    value.split(',').all(|family| {
        let family = family.trim();
        if family.is_empty() || family.starts_with(|ch: char| ch.is_ascii_digit()) {
            return false;
        }
        let quoted = (family.starts_with('"') && family.ends_with('"'))
            || (family.starts_with('\'') && family.ends_with('\''));
        quoted
            || family
                .chars()
                .all(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | ' '))
    })
}
