//! Configuração do transdesk carregada a partir de `transdesk.toml`.
//!
//! A struct [`DeskConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `TRANSDESK_DATA_FILE` tem precedência sobre o arquivo.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::DeskError;
use crate::lifecycle::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};

pub const CONFIG_FILE: &str = "transdesk.toml";
pub const DATA_FILE_ENV: &str = "TRANSDESK_DATA_FILE";

/// Configuração de nível superior carregada de `transdesk.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Arquivo JSON onde as obras são persistidas.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Cadastro de tradutores. Se o arquivo não existir, a atribuição
    /// aceita qualquer id.
    #[serde(default = "default_translators_file")]
    pub translators_file: PathBuf,

    /// Nível de log padrão quando `RUST_LOG` não está definido.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Idioma de origem para novas obras sem idioma explícito.
    #[serde(default = "default_source_language")]
    pub default_source_language: String,

    /// Idioma de destino para novas obras sem idioma explícito.
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
}

// Valor padrão para o arquivo de dados: "transdesk-works.json".
fn default_data_file() -> PathBuf {
    PathBuf::from("transdesk-works.json")
}

fn default_translators_file() -> PathBuf {
    PathBuf::from("transdesk-translators.json")
}

// Valor padrão para o nível de log: "info".
fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_language() -> String {
    DEFAULT_SOURCE_LANGUAGE.to_string()
}

fn default_target_language() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            translators_file: default_translators_file(),
            log_level: default_log_level(),
            default_source_language: default_source_language(),
            default_target_language: default_target_language(),
        }
    }
}

impl DeskConfig {
    /// Carrega a configuração de `transdesk.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, DeskError> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;

        // Variável de ambiente tem precedência sobre o arquivo de configuração.
        if let Ok(path) = std::env::var(DATA_FILE_ENV)
            && !path.is_empty()
        {
            config.data_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Lê um arquivo específico, sem consultar o ambiente.
    pub fn load_from(path: &Path) -> Result<Self, DeskError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DeskError::Config(format!("{}: {e}", path.display())))?;
        Ok(toml::from_str::<DeskConfig>(&contents)?)
    }
}
