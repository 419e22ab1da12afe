use std::path::Path;

use super::Collector;
use crate::error::{Result, StatuslineError};

pub const NO_PYTHON_ENV: &str = "none";

/// Name of the active Python virtualenv, taken from the captured `VIRTUAL_ENV`.
pub struct PythonEnvCollector {
    virtual_env: Option<String>,
}

impl PythonEnvCollector {
    pub fn new(virtual_env: Option<&str>) -> Self {
        Self {
            virtual_env: virtual_env.map(str::to_string),
        }
    }
}

impl Collector for PythonEnvCollector {
    type Output = String;

    fn name(&self) -> &'static str {
        "python-env"
    }

    fn collect(&self) -> Result<String> {
        let raw = self
            .virtual_env
            .as_deref()
            .ok_or_else(|| StatuslineError::NotConfigured("VIRTUAL_ENV".into()))?;
        let path = Path::new(raw.trim_end_matches(['/', '\\']));

        // `.venv`/`venv` says nothing; the project directory above it does.
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(".venv") | Some("venv") | Some("env") => path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str()),
            other => other,
        };

        name.filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| StatuslineError::NotConfigured("VIRTUAL_ENV".into()))
    }

    fn sentinel(&self) -> String {
        NO_PYTHON_ENV.to_string()
    }
}
