use std::{cell::RefCell, collections::HashMap, rc::Rc};

use tracing::debug;

use super::{AreaKind, AreaResolver, StorageArea};
use crate::errors::AreaError;

#[derive(Default, Debug)]
struct Inner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl Inner {
    fn used_without(&self, key: &str) -> usize {
        self.entries.iter().filter(|(k, _)| k.as_str() != key).map(|(k, v)| k.len() + v.len()).sum()
    }
}

/// In-memory storage area. Clones share the same entries.
#[derive(Clone, Default, Debug)]
pub struct MemoryStorage {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the total size of keys and values, in bytes.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStorage { inner: Rc::new(RefCell::new(Inner { entries: HashMap::new(), quota: Some(quota) })) }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AreaError> {
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AreaError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota {
            if inner.used_without(key) + key.len() + value.len() > quota {
                return Err(AreaError::QuotaExceeded { key: key.to_owned() });
            }
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AreaError> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}

/// Resolves both area kinds to in-memory areas.
#[derive(Clone, Default, Debug)]
pub struct MemoryAreas {
    local: MemoryStorage,
    session: MemoryStorage,
    local_disabled: bool,
    session_disabled: bool,
}

impl MemoryAreas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_areas(local: MemoryStorage, session: MemoryStorage) -> Self {
        MemoryAreas { local, session, ..Default::default() }
    }

    /// Makes `kind` fail to resolve, as a host policy that disables storage would.
    pub fn disable(mut self, kind: AreaKind) -> Self {
        match kind {
            AreaKind::Local => self.local_disabled = true,
            AreaKind::Session => self.session_disabled = true,
        }
        self
    }

    pub fn local(&self) -> &MemoryStorage {
        &self.local
    }

    pub fn session(&self) -> &MemoryStorage {
        &self.session
    }
}

impl AreaResolver for MemoryAreas {
    fn resolve(&self, kind: AreaKind) -> Result<Box<dyn StorageArea>, AreaError> {
        let (area, disabled) = match kind {
            AreaKind::Local => (&self.local, self.local_disabled),
            AreaKind::Session => (&self.session, self.session_disabled),
        };
        if disabled {
            return Err(AreaError::Unavailable(format!("{kind} storage is disabled")));
        }
        debug!(%kind, "resolved in-memory storage area");
        Ok(Box::new(area.clone()))
    }
}
