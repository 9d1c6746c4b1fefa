//! Typed access to one key of a key-value storage area, with JSON encoding, an initial-value seed and
//! change/removal observers.

pub mod area;
pub mod errors;
pub mod observer;
pub mod reporter;
pub mod store;

pub use area::{AreaKind, AreaResolver, DirectoryAreas, FileStorage, MemoryAreas, MemoryStorage, StorageArea};
pub use errors::{AreaError, StoreError};
pub use observer::ObserverHandle;
pub use reporter::{Reporter, TracingReporter};
pub use store::{ChangeObserver, InitialValue, RemoveObserver, StoreOptions, TypedStore};
