use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactOptions;

/// Loaded from a YAML file; every field has a default so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory where workbooks are written before delivery.
    pub output_dir: PathBuf,
    pub outbox_dir: PathBuf,
    pub autofit: bool,
    pub bold_header: bool,
    pub mail: MailConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            outbox_dir: PathBuf::from("outbox"),
            autofit: true,
            bold_header: true,
            mail: MailConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).with_context(|| format!("Opening settings file {path:?}"))?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .with_context(|| format!("Reading settings file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing settings file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn artifact_options(&self) -> ArtifactOptions {
        ArtifactOptions {
            bold_header: self.bold_header,
            autofit: self.autofit,
        }
    }
}

/// Outgoing mail settings handed to the dispatcher.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub from: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub subject: String,
    /// HTML body.
    pub body: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: String::new(),
            host: "localhost".to_string(),
            port: 587,
            user: String::new(),
            password: String::new(),
            subject: "Relatório".to_string(),
            body: "Segue em anexo o relatório solicitado".to_string(),
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("from", &self.from)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}
