//! Custom item bags.
//!
//! Applications and requests carry a bag of arbitrary values that plugins
//! and controllers share. Items are keyed either by name or by their type.
//!
//! # Example
//!
//! ```rust
//! use vireo_core::CustomItems;
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let mut items = CustomItems::new();
//! items.insert(Arc::new(Database { url: "postgres://localhost/db".to_string() }));
//! items.set("greeting", "Hello");
//!
//! let db: Arc<Database> = items.resolve().unwrap();
//! assert_eq!(db.url, "postgres://localhost/db");
//! assert_eq!(items.get::<&str>("greeting").as_deref(), Some(&"Hello"));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Item = Arc<dyn Any + Send + Sync>;

/// A bag of shared values keyed by name or by type.
///
/// The bag is `Send + Sync`; values are stored behind `Arc` so reads hand
/// out cheap clones.
#[derive(Default, Clone)]
pub struct CustomItems {
    named: HashMap<String, Item>,
    typed: HashMap<TypeId, Item>,
}

impl CustomItems {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `name`, replacing any previous value.
    pub fn set<T: Send + Sync + 'static>(&mut self, name: impl Into<String>, value: T) {
        self.named.insert(name.into(), Arc::new(value));
    }

    /// Returns the value stored under `name` if it has type `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.named
            .get(name)
            .and_then(|item| Arc::clone(item).downcast::<T>().ok())
    }

    /// Removes the value stored under `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        self.named.remove(name).is_some()
    }

    /// Returns true if a value is stored under `name`.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Registers a value keyed by its type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: Arc<T>) {
        self.typed.insert(TypeId::of::<T>(), value);
    }

    /// Resolves a value by type.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.typed
            .get(&TypeId::of::<T>())
            .and_then(|item| Arc::clone(item).downcast::<T>().ok())
    }

    /// Returns true if a value of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.typed.contains_key(&TypeId::of::<T>())
    }

    /// Returns the total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + self.typed.len()
    }

    /// Returns `true` if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.typed.is_empty()
    }
}

impl fmt::Debug for CustomItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.named.keys().collect();
        names.sort();
        f.debug_struct("CustomItems")
            .field("names", &names)
            .field("typed_count", &self.typed.len())
            .finish()
    }
}
