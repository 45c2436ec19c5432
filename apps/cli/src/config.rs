//! CLI configuration file support.
//!
//! Configuration precedence:
//! 1. CLI arguments (handled by clap)
//! 2. Environment variables (`NIHONGO_DOJO_CACHE_DIR`, `NIHONGO_DOJO_REPO_URL`)
//! 3. Local config file (./.dojorc)
//! 4. Global config file (~/.nihongo-dojo/config.toml)
//! 5. Defaults

use dojo_datasets::{Catalog, HubConfig};
use dojo_rewards::{Delimiters, FrequencyPenaltyTable, ParticleCategoryTable, ParticleScorer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DojoConfig {
    #[serde(default)]
    pub log_level: Option<String>,

    /// Dataset cache root
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Base URL the catalog archive names are joined onto
    #[serde(default)]
    pub repo_url: Option<String>,

    /// Completion markers used by `dojo score`
    #[serde(default)]
    pub delimiters: Option<Delimiters>,

    /// Published sha256 per dataset name, replacing the built-in placeholders
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,

    /// Exact-match weights layered over the standard frequency table
    #[serde(default)]
    pub penalties: BTreeMap<String, f64>,
}

impl DojoConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read configuration file {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse configuration file {}: {}", path.display(), e))
    }

    pub fn default_global_path() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".nihongo-dojo").join("config.toml")
    }

    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".dojorc")
    }

    /// Global config, then local config on top. A missing file is skipped;
    /// an unparseable one is reported and skipped.
    pub fn discover_and_load() -> Self {
        let mut config = Self::default();
        for path in [Self::default_global_path(), Self::default_local_path()] {
            if !path.is_file() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(found) => config.merge(&found),
                Err(e) => tracing::warn!(error = %e, "ignoring configuration file"),
            }
        }
        config
    }

    /// Values set in `other` win.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
        if let Some(ref cache_dir) = other.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(ref repo_url) = other.repo_url {
            self.repo_url = Some(repo_url.clone());
        }
        if let Some(ref delimiters) = other.delimiters {
            self.delimiters = Some(delimiters.clone());
        }
        self.checksums.extend(other.checksums.clone());
        self.penalties.extend(other.penalties.clone());
    }

    /// Hub settings with environment variables and then CLI flags applied.
    pub fn hub_config(&self, cache_dir: Option<PathBuf>, repo_url: Option<String>) -> HubConfig {
        let mut hub = HubConfig::default();
        if let Some(ref dir) = self.cache_dir {
            hub.cache_dir = dir.clone();
        }
        if let Some(ref url) = self.repo_url {
            hub.repo_url = url.clone();
        }
        let mut hub = hub.with_env_overrides();
        if let Some(dir) = cache_dir {
            hub.cache_dir = dir;
        }
        if let Some(url) = repo_url {
            hub.repo_url = url;
        }
        hub
    }

    /// Built-in catalog with configured checksums applied.
    pub fn catalog(&self) -> Catalog {
        self.checksums
            .iter()
            .fold(Catalog::builtin(), |catalog, (name, checksum)| catalog.with_checksum(name, checksum))
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters.clone().unwrap_or_default()
    }

    /// Particle scorer with configured penalties over the standard ones.
    pub fn particle_scorer(&self) -> anyhow::Result<ParticleScorer> {
        let standard = FrequencyPenaltyTable::standard();
        let mut weights: BTreeMap<String, f64> = standard.iter().map(|(p, w)| (p.to_string(), w)).collect();
        weights.extend(self.penalties.clone());
        let penalties = FrequencyPenaltyTable::from_pairs(weights)
            .map_err(|e| anyhow::anyhow!("Invalid [penalties] configuration: {}", e))?;
        Ok(ParticleScorer::new(ParticleCategoryTable::standard(), penalties))
    }
}
