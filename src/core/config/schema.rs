//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$STRATA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/strata/config.toml`
//! 3. `~/.strata/config.toml` (canonical write location)
//!
//! # Repo Config
//!
//! Located at `.strata/config.toml` inside the working directory.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the default branch must be a valid branch name).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// [user]
/// name = "Ada Lovelace"
///
/// [init]
/// default_branch = "trunk"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Identity recorded on commits
    pub user: Option<UserConfig>,

    /// Repository creation defaults
    pub init: Option<InitConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(user) = &self.user {
            user.validate()?;
        }
        if let Some(branch) = self.init.as_ref().and_then(|i| i.default_branch.as_ref()) {
            BranchName::new(branch).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid init.default_branch: {}", e))
            })?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// [user]
/// name = "Build Bot"
///
/// [commit]
/// tree = "overlay"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Identity override for this repository
    pub user: Option<UserConfig>,

    /// Commit construction settings
    pub commit: Option<CommitConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }
}

/// Identity settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub name: Option<String>,
}

impl UserConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "user.name cannot be empty".to_string(),
                ));
            }
            if name.contains('\n') {
                return Err(ConfigError::InvalidValue(
                    "user.name cannot contain newlines".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Repository creation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InitConfig {
    pub default_branch: Option<String>,
}

/// Commit construction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommitConfig {
    pub tree: Option<TreeMode>,
}

/// How a new commit's tree is built.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TreeMode {
    /// Exactly the staged entries. Files not re-staged since the previous
    /// commit are absent from the new tree.
    #[default]
    Staged,
    /// The parent's tree with staged entries applied and removals dropped.
    Overlay,
}

impl fmt::Display for TreeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeMode::Staged => write!(f, "staged"),
            TreeMode::Overlay => write!(f, "overlay"),
        }
    }
}

impl FromStr for TreeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staged" => Ok(TreeMode::Staged),
            "overlay" => Ok(TreeMode::Overlay),
            other => Err(ConfigError::InvalidValue(format!(
                "commit.tree must be 'staged' or 'overlay', got '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_global() {
        let config: GlobalConfig = toml::from_str(
            r#"
            [user]
            name = "Ada"

            [init]
            default_branch = "trunk"
            "#,
        )
        .unwrap();
        assert_eq!(config.user.unwrap().name.as_deref(), Some("Ada"));
        assert_eq!(
            config.init.unwrap().default_branch.as_deref(),
            Some("trunk")
        );
    }

    #[test]
    fn parse_tree_mode() {
        let config: RepoConfig = toml::from_str("[commit]\ntree = \"overlay\"\n").unwrap();
        assert_eq!(config.commit.unwrap().tree, Some(TreeMode::Overlay));
    }

    #[test]
    fn unknown_tree_mode_rejected() {
        assert!(toml::from_str::<RepoConfig>("[commit]\ntree = \"full\"\n").is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<GlobalConfig>("color = true\n").is_err());
        assert!(toml::from_str::<RepoConfig>("[user]\nemail = \"a@b\"\n").is_err());
    }

    #[test]
    fn invalid_default_branch_rejected() {
        let config: GlobalConfig =
            toml::from_str("[init]\ndefault_branch = \"bad..name\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_user_name_rejected() {
        let config: RepoConfig = toml::from_str("[user]\nname = \"  \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_tree_mode_is_staged() {
        assert_eq!(TreeMode::default(), TreeMode::Staged);
        assert_eq!(TreeMode::Overlay.to_string(), "overlay");
    }

    #[test]
    fn tree_mode_from_str() {
        assert_eq!("overlay".parse::<TreeMode>().unwrap(), TreeMode::Overlay);
        assert_eq!("staged".parse::<TreeMode>().unwrap(), TreeMode::Staged);
        assert!("snapshot".parse::<TreeMode>().is_err());
    }
}
