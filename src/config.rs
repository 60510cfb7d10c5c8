use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::design_system::{DesignSystem, DesignSystemBuilder};
use crate::error::ConfigError;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeConfig {
    /// `default` starts from the built-in tokens, `empty` from nothing.
    #[serde(default = "default_theme_name")]
    pub name: String,
    /// family → shade → value, registered as `--color-{family}-{shade}`.
    #[serde(default)]
    pub colors: BTreeMap<String, BTreeMap<String, String>>,
    /// Raw `--token` → value pairs.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Stylesheet source whose `@theme` blocks are applied last.
    #[serde(default)]
    pub css: Option<String>,
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigError {
        message: format!("failed to read config {}: {}", path.display(), err),
    })?;
    toml::from_str(&text).map_err(|err| ConfigError {
        message: format!("failed to parse config {}: {}", path.display(), err),
    })
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError {
            message: format!("failed to parse config: {err}"),
        })
    }

    pub fn resolve_theme(&self) -> Theme {
        let mut theme = match self.theme.name.as_str() {
            "empty" => Theme::new(),
            "default" => Theme::with_defaults(),
            other => {
                warn!("unknown base theme `{other}`, using the default theme");
                Theme::with_defaults()
            }
        };

        for (family, shades) in &self.theme.colors {
            for (shade, value) in shades {
                let name = if shade == "DEFAULT" {
                    format!("--color-{family}")
                } else {
                    format!("--color-{family}-{shade}")
                };
                theme.add(&name, value);
            }
        }

        for (name, value) in &self.theme.variables {
            if name.starts_with("--") {
                theme.add(name, value);
            } else {
                warn!("ignoring theme variable `{name}`: names start with `--`");
            }
        }

        if let Some(css) = &self.theme.css {
            theme.apply_css(css);
        }
        theme
    }

    pub fn design_system(&self) -> Result<DesignSystem, ConfigError> {
        let mut builder = DesignSystemBuilder::with_defaults(self.resolve_theme())?;
        if let Some(prefix) = &self.prefix {
            builder = builder.prefix(prefix)?;
        }
        Ok(builder.build())
    }
}

fn default_theme_name() -> String {
    "default".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: BTreeMap::new(),
            variables: BTreeMap::new(),
            css: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, load};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn loads_toml_config() {
        let path = temp_path("classforge_config");
        let _ = fs::write(&path, "prefix = \"tw\"\ntheme = { name = \"empty\" }");
        let config = load(&path).expect("config should parse");
        assert_eq!(config.prefix.as_deref(), Some("tw"));
        assert_eq!(config.theme.name, "empty");
        assert!(config.resolve_theme().is_empty());
    }

    #[test]
    fn defaults_when_missing_theme() {
        let path = temp_path("classforge_config_default");
        let _ = fs::write(&path, "");
        let config = load(&path).expect("config should parse");
        assert_eq!(config.theme.name, "default");
        assert!(config.theme.colors.is_empty());
        assert_eq!(config, Config::default());
        assert_eq!(config.resolve_theme().get("--spacing"), Some("0.25rem"));
    }

    #[test]
    fn reports_missing_files() {
        let path = temp_path("classforge_config_missing");
        let err = load(&path).expect_err("missing file");
        assert!(err.message.starts_with("failed to read config"));
    }

    #[test]
    fn loads_theme_tokens() {
        let config = Config::from_toml_str(
            r##"
[theme.colors.brand]
DEFAULT = "#0088cc"
500 = "#0077b3"

[theme.variables]
"--spacing-4" = "1rem"
spacing = "ignored"

[theme]
css = "@theme { --radius-pill: 9999px; }"
"##,
        )
        .expect("config should parse");
        let theme = config.resolve_theme();
        assert_eq!(theme.get("--color-brand"), Some("#0088cc"));
        assert_eq!(theme.get("--color-brand-500"), Some("#0077b3"));
        assert_eq!(theme.get("--spacing-4"), Some("1rem"));
        assert_eq!(theme.get("spacing"), None);
        assert_eq!(theme.get("--radius-pill"), Some("9999px"));
    }

    #[test]
    fn builds_a_design_system() {
        let config = Config::from_toml_str(
            "prefix = \"tw\"\n[theme.colors.brand]\n500 = \"#0077b3\"\n",
        )
        .expect("config should parse");
        let system = config.design_system().expect("design system");
        let candidate = system.parse_candidate("tw:bg-brand-500").expect("candidate");
        assert_eq!(
            system.resolve(&candidate).map(|nodes| nodes[0].to_string()),
            Some("background-color: var(--color-brand-500);".to_string())
        );

        let invalid = Config::from_toml_str("prefix = \"TW\"").expect("config should parse");
        assert!(invalid.design_system().is_err());
    }

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}.toml", prefix, nanos))
    }
}
