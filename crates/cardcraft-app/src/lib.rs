//! CardCraft replay shell.
//!
//! Drives the core from a recorded gesture script and prints the resulting
//! render scene, standing in for the mobile composition screen.

pub mod script;

pub use script::{Replay, Script, ScriptError, Step};

use cardcraft_core::CardConfig;
use cardcraft_core::config::ConfigError;
use cardcraft_core::storage::{
    FileStorage, PreferenceStore, StorageError, has_viewed_onboarding, mark_onboarding_viewed,
};
use std::path::PathBuf;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("usage: cardcraft <script.json> [--config <config.json>]")]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub script: PathBuf,
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, AppError> {
        let mut script = None;
        let mut config = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config = Some(PathBuf::from(args.next().ok_or(AppError::Usage)?)),
                _ if script.is_none() => script = Some(PathBuf::from(arg)),
                _ => return Err(AppError::Usage),
            }
        }

        Ok(Self {
            script: script.ok_or(AppError::Usage)?,
            config,
        })
    }
}

/// Show onboarding on first launch only.
fn check_onboarding(store: &dyn PreferenceStore) -> Result<(), AppError> {
    if pollster::block_on(has_viewed_onboarding(store))? {
        log::debug!("Onboarding already viewed");
    } else {
        log::info!("First launch, showing onboarding");
        pollster::block_on(mark_onboarding_viewed(store))?;
    }
    Ok(())
}

/// Run the shell and return the scene as pretty JSON.
pub fn run(args: Args) -> Result<String, AppError> {
    let config = match &args.config {
        Some(path) => CardConfig::load(path)?,
        None => CardConfig::default(),
    };

    let storage = match &config.storage_dir {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    };
    check_onboarding(&storage)?;

    let json = std::fs::read_to_string(&args.script).map_err(|source| AppError::Io {
        path: args.script.clone(),
        source,
    })?;
    let script: Script = serde_json::from_str(&json)?;
    log::info!("Replaying {} step(s) on '{}'", script.steps.len(), script.background.template);

    let scene = Replay::new(script.background, &config).run(script.steps)?;
    Ok(serde_json::to_string_pretty(&scene)?)
}
