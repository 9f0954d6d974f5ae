//! Runtime configuration, read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! | variable | default |
//! |---|---|
//! | `IMPORT_HOST` | `127.0.0.1` |
//! | `IMPORT_PORT` | `8080` |
//! | `IMPORT_DATABASE` | `imports.sqlite` |
//! | `IMPORT_DELIMITER` | `,` |
//! | `IMPORT_COMMENT_MARKER` | `#` |
//! | `IMPORT_PARALLEL` | `false` |

use common::import::rules::parse_flag;
use common::import::ImportOptions;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub import: ImportOptions,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = ImportOptions::default();

        let port = match lookup("IMPORT_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| format!("IMPORT_PORT must be a port number, got '{}'", port))?,
            None => 8080,
        };
        let parallel = match lookup("IMPORT_PARALLEL") {
            Some(flag) => parse_flag(&flag)
                .ok_or_else(|| format!("IMPORT_PARALLEL must be true or false, got '{}'", flag))?,
            None => defaults.parallel,
        };

        Ok(AppConfig {
            host: lookup("IMPORT_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_path: lookup("IMPORT_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("imports.sqlite")),
            import: ImportOptions {
                delimiter: single_char(&lookup, "IMPORT_DELIMITER", defaults.delimiter)?,
                comment_marker: single_char(
                    &lookup,
                    "IMPORT_COMMENT_MARKER",
                    defaults.comment_marker,
                )?,
                parallel,
            },
        })
    }
}

fn single_char(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: char,
) -> Result<char, String> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(format!("{} must be a single character, got '{}'", key, value)),
    }
}
