use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize config for {path}")]
    ConfigSerialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write config to {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config root in {path} must be a JSON object")]
    ConfigRoot { path: PathBuf },

    // ── Value shape ──
    #[error("invalid value for `{key}`: expected {expected}, found {found}")]
    InvalidValue {
        key: String,
        expected: &'static str,
        found: String,
    },
}

impl Error {
    pub(crate) fn invalid(key: &str, expected: &'static str, found: &serde_json::Value) -> Self {
        Self::InvalidValue {
            key: key.to_owned(),
            expected,
            found: describe(found),
        }
    }
}

fn describe(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {} item(s)", items.len()),
        Value::Object(map) => format!("object with {} key(s)", map.len()),
    }
}
