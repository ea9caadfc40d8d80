//! Service configuration
//!
//! All knobs are read once from the environment and threaded as an
//! immutable value into the orchestrator; nothing consults the
//! environment after startup.

use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Webhook HMAC secret. Required by the server, unused by the CLI.
    pub secret: Option<String>,

    /// GitHub API token. When absent, private repositories are rejected
    /// and snapshot URLs are built unauthenticated.
    pub api_key: Option<String>,

    /// Absolute base directory holding `builds/` and `served/`.
    pub base_dir: PathBuf,

    /// Bind address for the webhook server.
    pub listen_addr: String,

    /// Branches that may be built and published.
    pub allowed_branches: Vec<String>,
}

impl Config {
    /// Creates configuration from environment variables.
    ///
    /// Expected environment variables:
    /// - SITEWRIGHT_SECRET (required for the server)
    /// - SITEWRIGHT_API_KEY (optional)
    /// - SITEWRIGHT_BASE_DIR (optional, default: /var/www/sitewright)
    /// - SITEWRIGHT_LISTEN_ADDR (optional, default: 0.0.0.0:8000)
    /// - SITEWRIGHT_BRANCHES (optional, comma-separated, default: master)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("SITEWRIGHT_SECRET").ok();
        let api_key = std::env::var("SITEWRIGHT_API_KEY").ok();

        let base_dir = std::env::var("SITEWRIGHT_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/www/sitewright"));

        let listen_addr = std::env::var("SITEWRIGHT_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let allowed_branches = match std::env::var("SITEWRIGHT_BRANCHES") {
            Ok(raw) => raw
                .split(',')
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .collect(),
            Err(_) => vec!["master".to_string()],
        };

        let config = Self {
            secret,
            api_key,
            base_dir,
            listen_addr,
            allowed_branches,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.base_dir.is_absolute() {
            anyhow::bail!("SITEWRIGHT_BASE_DIR must be an absolute path");
        }

        if self.allowed_branches.is_empty() {
            anyhow::bail!("branch allow-list cannot be empty");
        }

        if self.listen_addr.is_empty() {
            anyhow::bail!("listen address cannot be empty");
        }

        Ok(())
    }

    /// Whether the given branch may be built and published.
    pub fn branch_allowed(&self, branch: &str) -> bool {
        self.allowed_branches.iter().any(|b| b == branch)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: None,
            api_key: None,
            base_dir: PathBuf::from("/var/www/sitewright"),
            listen_addr: "0.0.0.0:8000".to_string(),
            allowed_branches: vec!["master".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_dir, PathBuf::from("/var/www/sitewright"));
        assert_eq!(config.allowed_branches, vec!["master".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.base_dir = PathBuf::from("relative/path");
        assert!(config.validate().is_err());

        config.base_dir = PathBuf::from("/srv/sites");
        config.allowed_branches.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_branch_allowed() {
        let config = Config {
            allowed_branches: vec!["master".to_string(), "staging".to_string()],
            ..Config::default()
        };
        assert!(config.branch_allowed("master"));
        assert!(config.branch_allowed("staging"));
        assert!(!config.branch_allowed("feature"));
    }
}
