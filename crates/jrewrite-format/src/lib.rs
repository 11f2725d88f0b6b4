//! Formatting support for jrewrite: configuration, a Wadler-style document printer, and the
//! printer used for freshly built syntax nodes.

use std::path::Path;

use jrewrite_core::IndentUnit;
use jrewrite_syntax::NodeKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod doc;
mod printer;

pub use printer::{print_node, NoHooks, Placement, PrintHooks, Reused};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub indent_width: usize,
    pub indent_style: IndentStyle,
    /// Extra indentation for wrapped argument lists.
    pub continuation_indent: usize,
    pub max_line_length: usize,
    pub blank_lines_after_class_header: usize,
    pub blank_lines_before_methods: usize,
    pub blank_lines_before_fields: usize,
    pub blank_lines_before_classes: usize,
    pub space_before_brace: bool,
    /// Put `else`, `catch` and `finally` on their own line after `}`.
    pub else_on_new_line: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            indent_style: IndentStyle::Spaces,
            continuation_indent: 8,
            max_line_length: 100,
            blank_lines_after_class_header: 1,
            blank_lines_before_methods: 1,
            blank_lines_before_fields: 0,
            blank_lines_before_classes: 1,
            space_before_brace: true,
            else_on_new_line: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("{kind:?} is missing its required `{slot}` child")]
    MissingChild { kind: NodeKind, slot: &'static str },
    #[error("{kind:?} cannot be printed here")]
    Unprintable { kind: NodeKind },
}

impl FormatConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn indent_unit(&self) -> IndentUnit {
        IndentUnit {
            width: self.indent_width,
            use_tabs: self.indent_style == IndentStyle::Tabs,
        }
    }

    /// This configuration with its indentation written in `unit`'s style.
    pub fn with_indent_unit(&self, unit: IndentUnit) -> Self {
        Self {
            indent_width: unit.width,
            indent_style: if unit.use_tabs {
                IndentStyle::Tabs
            } else {
                IndentStyle::Spaces
            },
            ..self.clone()
        }
    }

    pub fn print_config(&self) -> doc::PrintConfig {
        doc::PrintConfig {
            max_width: self.max_line_length,
            indent: self.indent_unit(),
            newline: "\n",
        }
    }

    /// Blank lines to put before `item` in a line list of kind `list`, given the kind of the
    /// element written just before it.
    pub fn blank_lines_before(&self, list: NodeKind, prev: Option<NodeKind>, item: NodeKind) -> usize {
        match list {
            NodeKind::MemberList | NodeKind::BodyDeclList => {
                let Some(prev) = prev else {
                    return self.blank_lines_after_class_header;
                };
                match item {
                    NodeKind::ClassDecl => self.blank_lines_before_classes,
                    NodeKind::Variable if prev == NodeKind::Variable => self.blank_lines_before_fields,
                    NodeKind::EmptyDecl => 0,
                    _ => self.blank_lines_before_methods,
                }
            }
            NodeKind::TypeDeclList if prev.is_some() => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let config = FormatConfig::from_toml_str("indent_width = 2\nindent_style = \"tabs\"\n").unwrap();
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.indent_style, IndentStyle::Tabs);
        assert_eq!(config.max_line_length, 100);
        assert!(config.indent_unit().use_tabs);
    }

    #[test]
    fn toml_errors_are_reported() {
        let err = FormatConfig::from_toml_str("indent_width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("format.toml");
        std::fs::write(&path, "blank_lines_before_methods = 2\n").unwrap();
        let config = FormatConfig::load_from_path(&path).unwrap();
        assert_eq!(config.blank_lines_before_methods, 2);

        let missing = FormatConfig::load_from_path(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn member_spacing() {
        let config = FormatConfig::default();
        let members = NodeKind::MemberList;
        assert_eq!(config.blank_lines_before(members, None, NodeKind::Variable), 1);
        assert_eq!(
            config.blank_lines_before(members, Some(NodeKind::Variable), NodeKind::Variable),
            0
        );
        assert_eq!(
            config.blank_lines_before(members, Some(NodeKind::Variable), NodeKind::MethodDecl),
            1
        );
        assert_eq!(config.blank_lines_before(NodeKind::Block, None, NodeKind::Return), 0);
    }
}
