//! Runtime configuration: a JSON file for the parsing surface (teacher
//! list, labels, grid bounds) and the environment for the database URL.
//! A `.env` file is honored when present.

use std::path::PathBuf;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file; defaults to `timegrid.json`.
pub const CONFIG_PATH_VAR: &str = "TIMEGRID_CONFIG";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Recognized teacher names; a cell names a teacher when one of these
    /// is a substring of the cell text.
    pub teachers: Vec<String>,

    #[serde(default = "default_teacher_column_label")]
    pub teacher_column_label: String,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Directory scanned for `.xlsx` workbooks.
    #[serde(default = "default_xlsx_dir")]
    pub xlsx_dir: PathBuf,

    #[serde(default = "default_db_schema")]
    pub db_schema: String,

    /// First data row, 0-based (the rows above hold group codes and the
    /// column headers).
    #[serde(default = "default_first_data_row")]
    pub first_data_row: u32,

    /// Last week of the semester; the parity universes stride it by two.
    #[serde(default = "default_max_week")]
    pub max_week: u8,
}

fn default_teacher_column_label() -> String {
    crate::parser::DEFAULT_TEACHER_COLUMN_LABEL.to_string()
}

fn default_sheet_name() -> String {
    "Лист1".to_string()
}

fn default_xlsx_dir() -> PathBuf {
    PathBuf::from("xlsx")
}

fn default_db_schema() -> String {
    "timetable".to_string()
}

fn default_first_data_row() -> u32 {
    3
}

fn default_max_week() -> u8 {
    16
}

impl Config {
    /// Load the config file named by `TIMEGRID_CONFIG`, falling back to
    /// `timegrid.json` in the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();

        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "timegrid.json".to_string());
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;

        Ok(serde_json::from_str(&raw)?)
    }

    pub fn database_url() -> Result<String, ConfigError> {
        let _ = dotenv::dotenv();

        env::var(DATABASE_URL_VAR).map_err(|_| ConfigError::MissingDatabaseUrl)
    }
}
