use std::{fmt, str::FromStr};

use crate::errors::{AreaError, StoreError};

pub mod file;
pub mod memory;

pub use file::{DirectoryAreas, FileStorage};
pub use memory::{MemoryAreas, MemoryStorage};

/// A host-provided key-value persistence domain. Areas are shared handles and mutate through `&self`.
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, AreaError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), AreaError>;
    fn remove_item(&self, key: &str) -> Result<(), AreaError>;
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AreaKind {
    /// Persists across sessions.
    Local,
    /// Lives for the browsing session, or the process on native hosts.
    Session,
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaKind::Local => write!(f, "local"),
            AreaKind::Session => write!(f, "session"),
        }
    }
}

impl FromStr for AreaKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" | "localStorage" => Ok(AreaKind::Local),
            "session" | "sessionStorage" => Ok(AreaKind::Session),
            other => Err(StoreError::UnsupportedArea(other.to_owned())),
        }
    }
}

/// Looks up the storage area for a kind when a store is opened.
pub trait AreaResolver {
    fn resolve(&self, kind: AreaKind) -> Result<Box<dyn StorageArea>, AreaError>;
}
