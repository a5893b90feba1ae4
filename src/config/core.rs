use super::HuskierConfig;
use anyhow::{Context, Result};
use figment::{
    Figment,
    error::Kind,
    providers::{Env, Format, Json, Toml},
};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const PACKAGE_JSON: &str = "package.json";
pub const TOML_CONFIG: &str = "huskier.toml";

const PACKAGE_KEY: &str = "huskier";
const ENV_PREFIX: &str = "HUSKIER_";

/// Where configuration is read from
///
/// Priority, lowest first: `package.json` (`huskier` key), `huskier.toml`,
/// `HUSKIER_*` environment variables. A custom config file replaces both
/// files but still sits under the environment.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    root: PathBuf,
    custom: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            custom: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Source rooted at the current directory
    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn with_custom_config<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.custom = path.map(|p| self.root.join(p.as_ref()));
        self
    }

    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    pub fn package_json(&self) -> PathBuf {
        self.root.join(PACKAGE_JSON)
    }

    /// Layered providers, not yet extracted
    pub fn figment(&self) -> Figment {
        let figment = match &self.custom {
            Some(path) if is_toml(path) => Figment::from(Toml::file(path)),
            Some(path) => Figment::from(Json::file(path)).focus(PACKAGE_KEY),
            None => Figment::from(Json::file(self.package_json()))
                .focus(PACKAGE_KEY)
                .merge(Toml::file(self.root.join(TOML_CONFIG))),
        };

        figment.merge(Env::prefixed(&self.env_prefix))
    }

    pub fn load(&self) -> Result<HuskierConfig> {
        tracing::trace!("CONFIG LOAD: root = {}", self.root.display());

        if self.custom.is_none()
            && !self.package_json().exists()
            && !self.root.join(TOML_CONFIG).exists()
        {
            anyhow::bail!("{} not found in {}", PACKAGE_JSON, self.root.display());
        }

        match self.figment().extract::<HuskierConfig>() {
            Ok(config) => {
                tracing::debug!(
                    "loaded hooks [{}], parallel = {}",
                    config.hook_names().collect::<Vec<_>>().join(", "),
                    config.parallel
                );
                Ok(config)
            }
            Err(e) if matches!(&e.kind, Kind::MissingField(field) if field == "hooks") => {
                if self.has_config_key() {
                    anyhow::bail!("{PACKAGE_KEY}.hooks is missing from {PACKAGE_JSON}")
                }
                anyhow::bail!("{PACKAGE_KEY} key is missing from {PACKAGE_JSON}")
            }
            Err(e) => Err(e).context("Failed to parse huskier configuration"),
        }
    }

    /// Whether any config file actually carries huskier settings
    fn has_config_key(&self) -> bool {
        match &self.custom {
            Some(path) if is_toml(path) => path.exists(),
            Some(path) => Figment::from(Json::file(path)).contains(PACKAGE_KEY),
            None => {
                Figment::from(Json::file(self.package_json())).contains(PACKAGE_KEY)
                    || self.root.join(TOML_CONFIG).exists()
            }
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Add an empty `huskier.hooks.pre-commit` list to `package.json`
///
/// Returns `false` when the key is already there. Key order of the existing
/// document is preserved.
pub fn ensure_package_key(package_json: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(package_json)
        .with_context(|| format!("Failed to read {}", package_json.display()))?;
    let mut document: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", package_json.display()))?;

    let Some(object) = document.as_object_mut() else {
        anyhow::bail!("{} is not a JSON object", package_json.display());
    };
    if object.contains_key(PACKAGE_KEY) {
        return Ok(false);
    }

    object.insert(PACKAGE_KEY.to_string(), json!({ "hooks": { "pre-commit": [] } }));

    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');
    std::fs::write(package_json, rendered)
        .with_context(|| format!("Failed to write {}", package_json.display()))?;

    Ok(true)
}
