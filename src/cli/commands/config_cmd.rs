//! config command - Get, set, or list configuration values
//!
//! Keys:
//! - `user.name` (global or repository)
//! - `init.default_branch` (global only)
//! - `commit.tree` (repository only: `staged` or `overlay`)

use crate::core::config::{
    CommitConfig, Config, GlobalConfig, InitConfig, RepoConfig, TreeMode, UserConfig,
};
use crate::core::paths::RepoPaths;
use crate::engine::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Load effective configuration, including the repository scope when the
/// working directory is inside a repository.
fn load(ctx: &Context) -> Result<(Config, Option<RepoPaths>)> {
    let cwd = ctx.cwd().context("Failed to determine working directory")?;
    let paths = RepoPaths::discover(&cwd);
    let loaded = Config::load(paths.as_ref()).context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(&warning.message, ctx.verbosity());
    }
    Ok((loaded.config, paths))
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let (config, _) = load(ctx)?;

    let value = match key {
        "user.name" => config.user_name().to_string(),
        "init.default_branch" => config.default_branch().to_string(),
        "commit.tree" => config.tree_mode().to_string(),
        _ => bail!("Unknown configuration key: {}", key),
    };

    println!("{}", value);
    Ok(())
}

/// Set a configuration value in the global or repository scope.
pub fn set(ctx: &Context, key: &str, value: &str, global: bool) -> Result<()> {
    let written = if global {
        let path = Config::global_config_path()?;
        let mut config: GlobalConfig = if path.exists() {
            Config::read_file(&path)?
        } else {
            GlobalConfig::default()
        };

        match key {
            "user.name" => {
                config.user.get_or_insert_with(UserConfig::default).name = Some(value.to_string())
            }
            "init.default_branch" => {
                config
                    .init
                    .get_or_insert_with(InitConfig::default)
                    .default_branch = Some(value.to_string())
            }
            "commit.tree" => bail!("commit.tree is a repository setting; omit --global"),
            _ => bail!("Unknown configuration key: {}", key),
        }

        Config::write_global(&config).context("Failed to write config")?
    } else {
        let (_, paths) = load(ctx)?;
        let Some(paths) = paths else {
            bail!("Not in an initialized strata directory.");
        };
        let path = paths.config_path();
        let mut config: RepoConfig = if path.exists() {
            Config::read_file(&path)?
        } else {
            RepoConfig::default()
        };

        match key {
            "user.name" => {
                config.user.get_or_insert_with(UserConfig::default).name = Some(value.to_string())
            }
            "commit.tree" => {
                let mode: TreeMode = value.parse()?;
                config.commit.get_or_insert_with(CommitConfig::default).tree = Some(mode)
            }
            "init.default_branch" => bail!("init.default_branch is a global setting; use --global"),
            _ => bail!("Unknown configuration key: {}", key),
        }

        Config::write_repo(&paths, &config).context("Failed to write config")?
    };

    output::debug(format!("wrote {}", written.display()), ctx.verbosity());
    output::print(format!("Set {} = {}", key, value), ctx.verbosity());
    Ok(())
}

/// List effective configuration values and where they came from.
pub fn list(ctx: &Context) -> Result<()> {
    let (config, _) = load(ctx)?;

    println!("# Effective Configuration");
    println!("user.name = {}", config.user_name());
    println!("init.default_branch = {}", config.default_branch());
    println!("commit.tree = {}", config.tree_mode());

    if let Some(path) = config.global_config_loaded_from() {
        println!("# global: {}", path.display());
    }
    if let Some(path) = config.repo_config_loaded_from() {
        println!("# repository: {}", path.display());
    }
    Ok(())
}
