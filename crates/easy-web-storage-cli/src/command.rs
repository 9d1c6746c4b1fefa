use anyhow::Context;
use clap::Subcommand;
use easy_web_storage::{AreaKind, DirectoryAreas, StoreOptions, TypedStore};
use serde_json::Value;
use tracing::info;

use crate::config::ApplicationConfig;

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Prints the JSON value stored at KEY
    Get { key: String },
    /// Stores a JSON value at KEY
    Set { key: String, value: String },
    /// Removes the value stored at KEY
    Remove { key: String },
}

impl Command {
    /// Returns the text to print, if any.
    pub(crate) fn execute(&self, config: &ApplicationConfig) -> anyhow::Result<Option<String>> {
        let areas = DirectoryAreas::new(&config.data_dir);

        match self {
            Command::Get { key } => {
                let store = open(config, key, &areas)?;
                match store.try_get()? {
                    Some(value) => Ok(Some(serde_json::to_string_pretty(&value)?)),
                    None => Ok(None),
                }
            }
            Command::Set { key, value } => {
                let value: Value = serde_json::from_str(value).with_context(|| format!("`{value}` is not valid JSON"))?;
                let mut store = open(config, key, &areas)?;
                let key = key.clone();
                store.on_change(move |new_value, old_value| {
                    info!(key = %key, old = ?old_value, new = %new_value, "value changed");
                });
                store.try_set(&value)?;
                Ok(None)
            }
            Command::Remove { key } => {
                let mut store = open(config, key, &areas)?;
                store.on_remove(|key, old_value| {
                    info!(key = %key, old = ?old_value, "value removed");
                });
                store.try_remove()?;
                Ok(None)
            }
        }
    }
}

fn open(config: &ApplicationConfig, key: &str, areas: &DirectoryAreas) -> anyhow::Result<TypedStore<Value>> {
    if matches!(config.area.parse::<AreaKind>(), Ok(AreaKind::Session)) {
        anyhow::bail!("the session area does not outlive a single `ews` run; use `--area local`");
    }
    let store = TypedStore::open(StoreOptions::new(config.area.as_str(), key), areas);
    if store.is_inert() {
        anyhow::bail!("storage area `{}` is not available", config.area);
    }
    Ok(store)
}
