use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    area::{AreaKind, AreaResolver, StorageArea},
    errors::{Result, StoreError},
    observer::{ObserverHandle, Observers},
    reporter::{Reporter, TracingReporter},
};

/// Called with `(new_value, old_value)` before a write.
pub type ChangeObserver<T> = dyn Fn(&T, Option<&T>);
/// Called with `(key, old_value)` before a removal.
pub type RemoveObserver<T> = dyn Fn(&str, Option<&T>);

const NULL_LITERAL: &str = "null";
const UNDEFINED_LITERAL: &str = "\"undefined\"";

pub enum InitialValue<T> {
    Value(T),
    Factory(Box<dyn FnOnce() -> T>),
}

impl<T> InitialValue<T> {
    fn into_value(self) -> T {
        match self {
            InitialValue::Value(value) => value,
            InitialValue::Factory(factory) => factory(),
        }
    }
}

/// Configuration a [`TypedStore`] is opened with.
pub struct StoreOptions<T> {
    area: String,
    key: String,
    initial_value: Option<InitialValue<T>>,
    change_observers: Vec<Box<ChangeObserver<T>>>,
    removal_observers: Vec<Box<RemoveObserver<T>>>,
    reporter: Option<Rc<dyn Reporter>>,
}

impl<T> StoreOptions<T> {
    /// `area` names the storage area: `local`/`localStorage` or `session`/`sessionStorage`.
    pub fn new(area: impl Into<String>, key: impl Into<String>) -> Self {
        StoreOptions {
            area: area.into(),
            key: key.into(),
            initial_value: None,
            change_observers: vec![],
            removal_observers: vec![],
            reporter: None,
        }
    }

    pub fn initial_value(mut self, value: T) -> Self {
        self.initial_value = Some(InitialValue::Value(value));
        self
    }

    /// The factory only runs when the area resolves.
    pub fn initial_value_with<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        self.initial_value = Some(InitialValue::Factory(Box::new(factory)));
        self
    }

    /// Registers a change observer before the store exists, so it also sees the initial value.
    pub fn on_change<F>(mut self, observer: F) -> Self
    where
        F: Fn(&T, Option<&T>) + 'static,
    {
        self.change_observers.push(Box::new(observer));
        self
    }

    pub fn on_remove<F>(mut self, observer: F) -> Self
    where
        F: Fn(&str, Option<&T>) + 'static,
    {
        self.removal_observers.push(Box::new(observer));
        self
    }

    pub fn reporter<R: Reporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Some(Rc::new(reporter));
        self
    }

    pub fn shared_reporter(mut self, reporter: Rc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }
}

/// One key in one storage area, read and written as JSON-encoded `T`.
///
/// Every failure is handed to the store's [`Reporter`] and the operation degrades to a no-op: `get`
/// returns `None`, `set` and `remove` leave the area untouched. An old value that does not decode is
/// the exception: it is reported, observers see `None`, and the write goes ahead. A store whose area
/// could not be resolved is inert and never touches storage again. The `try_*` operations return the
/// same failures instead of reporting them.
///
/// `set` and `remove` read the current value for their observers and then write; nothing makes that
/// pair atomic against other writers of the same area.
pub struct TypedStore<T> {
    area: Option<Box<dyn StorageArea>>,
    key: String,
    reporter: Rc<dyn Reporter>,
    change_observers: Observers<ChangeObserver<T>>,
    removal_observers: Observers<RemoveObserver<T>>,
}

impl<T> TypedStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn open<R>(options: StoreOptions<T>, resolver: &R) -> Self
    where
        R: AreaResolver + ?Sized,
    {
        let StoreOptions { area, key, initial_value, change_observers, removal_observers, reporter } = options;
        let reporter = reporter.unwrap_or_else(|| Rc::new(TracingReporter) as Rc<dyn Reporter>);

        let area = match resolve_area(&area, resolver) {
            Ok(area) => Some(area),
            Err(e) => {
                reporter.report(&e);
                None
            }
        };

        let mut store = TypedStore {
            area,
            key,
            reporter,
            change_observers: Observers::default(),
            removal_observers: Observers::default(),
        };
        for observer in change_observers {
            store.change_observers.insert(observer);
        }
        for observer in removal_observers {
            store.removal_observers.insert(observer);
        }

        if !store.is_inert() {
            if let Some(initial_value) = initial_value {
                debug!(key = %store.key, "seeding initial value");
                store.set(&initial_value.into_value());
            }
        }

        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_inert(&self) -> bool {
        self.area.is_none()
    }

    /// Absent entries and JSON `null` both read as `None`.
    pub fn get(&self) -> Option<T> {
        if self.is_inert() {
            return None;
        }
        self.reported(self.try_get()).flatten()
    }

    pub fn set(&self, value: &T) {
        if self.is_inert() {
            return;
        }
        self.reported(self.write(value, true));
    }

    pub fn remove(&self) {
        if self.is_inert() {
            return;
        }
        self.reported(self.delete(true));
    }

    pub fn try_get(&self) -> Result<Option<T>> {
        let area = self.area()?;
        let raw = area.get_item(&self.key).map_err(|source| StoreError::Area { key: self.key.clone(), source })?;

        serde_json::from_str::<Option<T>>(raw.as_deref().unwrap_or(NULL_LITERAL))
            .map_err(|source| StoreError::Decode { key: self.key.clone(), source })
    }

    /// Notifies change observers with the value read just before the write. A value that encodes to
    /// `null` or to the string `"undefined"` is stored as `null`.
    ///
    /// An old value that does not decode is passed to observers as `None` and does not fail the write.
    pub fn try_set(&self, value: &T) -> Result<()> {
        self.write(value, false)
    }

    /// An old value that does not decode is passed to observers as `None` and does not fail the removal.
    pub fn try_remove(&self) -> Result<()> {
        self.delete(false)
    }

    pub fn on_change<F>(&mut self, observer: F) -> ObserverHandle
    where
        F: Fn(&T, Option<&T>) + 'static,
    {
        self.change_observers.insert(Box::new(observer))
    }

    pub fn on_remove<F>(&mut self, observer: F) -> ObserverHandle
    where
        F: Fn(&str, Option<&T>) + 'static,
    {
        self.removal_observers.insert(Box::new(observer))
    }

    pub fn off_change(&mut self, handle: ObserverHandle) -> bool {
        self.change_observers.remove(handle)
    }

    pub fn off_remove(&mut self, handle: ObserverHandle) -> bool {
        self.removal_observers.remove(handle)
    }

    pub fn change_observers(&self) -> usize {
        self.change_observers.len()
    }

    pub fn removal_observers(&self) -> usize {
        self.removal_observers.len()
    }

    fn write(&self, value: &T, report_stale: bool) -> Result<()> {
        let area = self.area()?;

        if !self.change_observers.is_empty() {
            let old_value = self.previous_value(report_stale)?;
            for observer in self.change_observers.iter() {
                observer(value, old_value.as_ref());
            }
        }

        let encoded = self.encode(value)?;
        area.set_item(&self.key, &encoded).map_err(|source| StoreError::Area { key: self.key.clone(), source })
    }

    fn delete(&self, report_stale: bool) -> Result<()> {
        let area = self.area()?;

        if !self.removal_observers.is_empty() {
            let old_value = self.previous_value(report_stale)?;
            for observer in self.removal_observers.iter() {
                observer(&self.key, old_value.as_ref());
            }
        }

        area.remove_item(&self.key).map_err(|source| StoreError::Area { key: self.key.clone(), source })
    }

    /// Undecodable text reads as `None`; it is only reported on the soft path. Area failures propagate.
    fn previous_value(&self, report_stale: bool) -> Result<Option<T>> {
        match self.try_get() {
            Err(e @ StoreError::Decode { .. }) => {
                if report_stale {
                    self.reporter.report(&e);
                }
                Ok(None)
            }
            other => other,
        }
    }

    fn area(&self) -> Result<&dyn StorageArea> {
        self.area.as_deref().ok_or(StoreError::Inert)
    }

    fn encode(&self, value: &T) -> Result<String> {
        let encoded =
            serde_json::to_string(value).map_err(|source| StoreError::Encode { key: self.key.clone(), source })?;
        if encoded == UNDEFINED_LITERAL {
            return Ok(NULL_LITERAL.to_owned());
        }
        Ok(encoded)
    }

    fn reported<V>(&self, result: Result<V>) -> Option<V> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.reporter.report(&e);
                None
            }
        }
    }
}

fn resolve_area<R>(area: &str, resolver: &R) -> Result<Box<dyn StorageArea>>
where
    R: AreaResolver + ?Sized,
{
    let kind: AreaKind = area.parse()?;
    resolver.resolve(kind).map_err(|source| StoreError::AreaUnavailable { kind, source })
}
