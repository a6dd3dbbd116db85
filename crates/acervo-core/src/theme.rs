//! Static theme directory.
//!
//! Maps an owner identifier to a descriptive theme record. The directory is
//! loaded once at startup (built-in table or JSON file) and never mutated;
//! handlers share it read-only.

use crate::error::{AcervoError, AcervoResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading a theme directory.
#[derive(Error, Debug)]
pub enum ThemeLoadError {
    /// The theme file could not be read.
    #[error("failed to read theme file: {0}")]
    Io(#[from] std::io::Error),

    /// The theme file is not a valid JSON array of theme records.
    #[error("failed to parse theme file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An empty directory would leave every lookup undefined.
    #[error("theme directory must contain at least one theme")]
    Empty,

    /// The configured strategy name is not recognized.
    #[error("unknown theme strategy '{0}', expected 'modulo' or 'membership'")]
    UnknownStrategy(String),
}

/// How an owner identifier selects a theme.
///
/// One strategy is active per deployment, chosen by configuration. Requests
/// never switch strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeStrategy {
    /// `identifier mod list-length` indexes the theme list. Every parseable
    /// identifier resolves; `rmList` entries are ignored.
    Modulo,
    /// First theme whose `rmList` contains the identifier. Unlisted
    /// identifiers are not found. This is the production behavior.
    #[default]
    Membership,
}

impl FromStr for ThemeStrategy {
    type Err = ThemeLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "modulo" => Ok(Self::Modulo),
            "membership" => Ok(Self::Membership),
            other => Err(ThemeLoadError::UnknownStrategy(other.to_string())),
        }
    }
}

/// One entry of the theme directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    /// Theme name.
    pub tema: String,
    /// Short human-readable description.
    pub description: String,
    /// Suggested item fields for projects under this theme.
    pub fields: Vec<String>,
    /// Owner identifiers assigned to this theme. Only consulted by the
    /// membership strategy; optional in theme files meant for modulo use.
    #[serde(rename = "rmList", default)]
    pub rm_list: Vec<u64>,
}

/// A successful lookup: the identifier plus the theme it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTheme {
    /// The parsed owner identifier.
    pub rm: u64,
    /// Theme name.
    pub tema: String,
    /// Short human-readable description.
    pub description: String,
    /// Suggested item fields.
    pub fields: Vec<String>,
}

/// Read-only directory resolving owner identifiers to themes.
///
/// # Example
///
/// ```
/// use acervo_core::{ThemeDirectory, ThemeStrategy};
///
/// let directory = ThemeDirectory::builtin(ThemeStrategy::Modulo);
/// let resolved = directory.resolve("2023005").unwrap();
/// assert_eq!(resolved.rm, 2023005);
/// ```
#[derive(Debug, Clone)]
pub struct ThemeDirectory {
    strategy: ThemeStrategy,
    themes: Vec<ThemeRecord>,
}

impl ThemeDirectory {
    /// Builds a directory from explicit records.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeLoadError::Empty`] when `themes` is empty; a zero
    /// length list would make the modulo strategy divide by zero.
    pub fn new(strategy: ThemeStrategy, themes: Vec<ThemeRecord>) -> Result<Self, ThemeLoadError> {
        if themes.is_empty() {
            return Err(ThemeLoadError::Empty);
        }
        Ok(Self { strategy, themes })
    }

    /// The compiled-in default directory.
    #[must_use]
    pub fn builtin(strategy: ThemeStrategy) -> Self {
        Self {
            strategy,
            themes: builtin_themes(),
        }
    }

    /// Parses a directory from a JSON array of theme records.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeLoadError::Parse`] on malformed JSON and
    /// [`ThemeLoadError::Empty`] on an empty array.
    pub fn from_json_str(strategy: ThemeStrategy, json: &str) -> Result<Self, ThemeLoadError> {
        let themes: Vec<ThemeRecord> = serde_json::from_str(json)?;
        Self::new(strategy, themes)
    }

    /// Loads a directory from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeLoadError::Io`] when the file cannot be read, plus the
    /// conditions of [`from_json_str`](Self::from_json_str).
    pub fn from_path(strategy: ThemeStrategy, path: impl AsRef<Path>) -> Result<Self, ThemeLoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(strategy, &json)
    }

    /// Returns the active resolution strategy.
    #[must_use]
    pub const fn strategy(&self) -> ThemeStrategy {
        self.strategy
    }

    /// Returns the directory's records in order.
    #[must_use]
    pub fn themes(&self) -> &[ThemeRecord] {
        &self.themes
    }

    /// Resolves a raw owner identifier to its theme.
    ///
    /// # Errors
    ///
    /// Returns [`AcervoError::InvalidIdentifier`] when `raw` is not an
    /// unsigned integer, and [`AcervoError::NotFound`] when the membership
    /// strategy finds the identifier in no `rmList`. The modulo strategy
    /// never fails on a parseable identifier.
    pub fn resolve(&self, raw: &str) -> AcervoResult<ResolvedTheme> {
        let rm: u64 = raw
            .parse()
            .map_err(|_| AcervoError::invalid_identifier("RM inválido"))?;

        let record = match self.strategy {
            ThemeStrategy::Modulo => {
                #[allow(clippy::cast_possible_truncation)] // remainder is below themes.len()
                let index = (rm % self.themes.len() as u64) as usize;
                &self.themes[index]
            }
            ThemeStrategy::Membership => self
                .themes
                .iter()
                .find(|theme| theme.rm_list.contains(&rm))
                .ok_or_else(|| AcervoError::not_found("Tema não encontrado"))?,
        };

        Ok(ResolvedTheme {
            rm,
            tema: record.tema.clone(),
            description: record.description.clone(),
            fields: record.fields.clone(),
        })
    }
}

impl Default for ThemeDirectory {
    fn default() -> Self {
        Self::builtin(ThemeStrategy::default())
    }
}

fn builtin_themes() -> Vec<ThemeRecord> {
    vec![
        ThemeRecord {
            tema: "Sustentabilidade".to_string(),
            description: "Projetos sobre consumo consciente e meio ambiente".to_string(),
            fields: vec!["titulo".to_string(), "resumo".to_string(), "impacto".to_string()],
            rm_list: vec![2_023_001, 2_023_002, 2_023_003],
        },
        ThemeRecord {
            tema: "Saúde".to_string(),
            description: "Projetos de bem-estar e saúde pública".to_string(),
            fields: vec!["titulo".to_string(), "resumo".to_string(), "publico".to_string()],
            rm_list: vec![2_023_004, 2_023_005],
        },
        ThemeRecord {
            tema: "Educação".to_string(),
            description: "Projetos de apoio ao ensino e à aprendizagem".to_string(),
            fields: vec!["titulo".to_string(), "resumo".to_string(), "serie".to_string()],
            rm_list: vec![2_023_006, 2_023_007, 2_023_008],
        },
        ThemeRecord {
            tema: "Tecnologia".to_string(),
            description: "Projetos de automação, aplicativos e robótica".to_string(),
            fields: vec!["titulo".to_string(), "resumo".to_string(), "stack".to_string()],
            rm_list: vec![2_023_009, 2_023_010],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "modulo".parse::<ThemeStrategy>().expect("modulo parses"),
            ThemeStrategy::Modulo
        );
        assert_eq!(
            "MEMBERSHIP".parse::<ThemeStrategy>().expect("case-insensitive"),
            ThemeStrategy::Membership
        );
        assert!(matches!(
            "round-robin".parse::<ThemeStrategy>(),
            Err(ThemeLoadError::UnknownStrategy(value)) if value == "round-robin"
        ));
    }

    #[test]
    fn test_non_numeric_identifier_rejected_by_both_strategies() {
        for strategy in [ThemeStrategy::Modulo, ThemeStrategy::Membership] {
            let directory = ThemeDirectory::builtin(strategy);
            let err = directory.resolve("abc").expect_err("non-numeric must fail");
            assert_eq!(err, AcervoError::invalid_identifier("RM inválido"));
        }
    }

    #[test]
    fn test_modulo_indexes_by_remainder() {
        let directory = ThemeDirectory::builtin(ThemeStrategy::Modulo);
        let themes = directory.themes().to_vec();

        // 4 built-in themes: rm 5 lands on index 1, rm 8 wraps to index 0.
        assert_eq!(directory.resolve("5").expect("resolves").tema, themes[1].tema);
        assert_eq!(directory.resolve("8").expect("resolves").tema, themes[0].tema);

        // Every parseable identifier resolves under modulo.
        for rm in ["0", "1", "999999", "18446744073709551615"] {
            assert!(directory.resolve(rm).is_ok(), "rm {rm} should resolve");
        }
    }

    #[test]
    fn test_membership_finds_listed_identifier() {
        let directory = ThemeDirectory::builtin(ThemeStrategy::Membership);
        let resolved = directory.resolve("2023004").expect("listed rm resolves");

        assert_eq!(resolved.rm, 2_023_004);
        assert_eq!(resolved.tema, "Saúde");
        assert!(!resolved.description.is_empty());
        assert!(!resolved.fields.is_empty());
    }

    #[test]
    fn test_membership_unlisted_identifier_not_found() {
        let directory = ThemeDirectory::builtin(ThemeStrategy::Membership);
        let err = directory.resolve("999").expect_err("unlisted rm must fail");
        assert_eq!(err, AcervoError::not_found("Tema não encontrado"));
    }

    #[test]
    fn test_resolved_theme_wire_shape() {
        let directory = ThemeDirectory::builtin(ThemeStrategy::Membership);
        let resolved = directory.resolve("2023001").expect("listed rm resolves");

        let json = serde_json::to_value(&resolved).expect("serialization should work");
        assert_eq!(json["rm"], 2_023_001);
        assert_eq!(json["tema"], "Sustentabilidade");
        assert!(json["description"].is_string());
        assert!(json["fields"].is_array());
        // rmList is directory data, never part of the response.
        assert!(json.get("rmList").is_none());
    }

    #[test]
    fn test_empty_directory_rejected() {
        assert!(matches!(
            ThemeDirectory::new(ThemeStrategy::Modulo, Vec::new()),
            Err(ThemeLoadError::Empty)
        ));
        assert!(matches!(
            ThemeDirectory::from_json_str(ThemeStrategy::Membership, "[]"),
            Err(ThemeLoadError::Empty)
        ));
    }

    #[test]
    fn test_rm_list_optional_in_theme_files() {
        let json = r#"[{"tema": "Livre", "description": "Tema único", "fields": ["titulo"]}]"#;
        let directory = ThemeDirectory::from_json_str(ThemeStrategy::Modulo, json)
            .expect("rmList should default to empty");
        assert_eq!(directory.themes()[0].rm_list, Vec::<u64>::new());
        assert_eq!(directory.resolve("12").expect("resolves").tema, "Livre");
    }

    #[test]
    fn test_from_path_loads_json_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(
            file.path(),
            r#"[
                {"tema": "Robótica", "description": "Oficinas de robôs", "fields": ["kit"], "rmList": [10, 11]},
                {"tema": "Horta", "description": "Cultivo na escola", "fields": ["canteiro"], "rmList": [12]}
            ]"#,
        )
        .expect("write temp file");

        let directory = ThemeDirectory::from_path(ThemeStrategy::Membership, file.path())
            .expect("file should load");
        assert_eq!(directory.themes().len(), 2);
        assert_eq!(directory.resolve("12").expect("resolves").tema, "Horta");
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let err = ThemeDirectory::from_path(ThemeStrategy::Membership, "/nonexistent/temas.json")
            .expect_err("missing file must fail");
        assert!(matches!(err, ThemeLoadError::Io(_)));
    }
}
