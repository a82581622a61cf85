use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Well-known keys under which declarations are stored.
pub mod keys {
    /// Ordered per-method route declarations ([`RouteDeclarations`](crate::declaration::RouteDeclarations)).
    pub const ROUTES: &str = "trellis:routes";
    /// The controller-level [`GroupDeclaration`](crate::declaration::GroupDeclaration).
    pub const GROUP: &str = "trellis:group";
    /// Raw group middleware, appended independently of the group slot.
    pub const GROUP_MIDDLEWARE: &str = "trellis:group-middleware";
    /// The controller-level [`ResourceDeclaration`](crate::declaration::ResourceDeclaration).
    pub const RESOURCE: &str = "trellis:resource";
    /// Declaration errors recorded during the declaration pass.
    pub const CONFLICTS: &str = "trellis:conflicts";
}

/// An opaque key/value bag owned by exactly one controller type.
#[derive(Default)]
pub struct ControllerMetadata {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ControllerMetadata {
    /// Get a typed entry. Returns `None` if the key is unset or holds another type.
    pub fn get<V: Any + Send + Sync>(&self, key: &str) -> Option<&V> {
        self.entries.get(key).and_then(|boxed| boxed.downcast_ref::<V>())
    }
}

impl std::fmt::Debug for ControllerMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("ControllerMetadata").field("keys", &keys).finish()
    }
}

/// Per-controller metadata storage, keyed by the exact `TypeId` of the controller.
///
/// There is no inheritance walk: a type only ever sees what was written for
/// that type. Bags are created lazily on first write and live as long as the
/// store.
#[derive(Default, Debug)]
pub struct MetadataStore {
    inner: HashMap<TypeId, ControllerMetadata>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` under `key`, replacing whatever was there.
    pub fn set<V: Any + Send + Sync>(&mut self, target: TypeId, key: &str, value: V) {
        self.bag(target).entries.insert(key.to_string(), Box::new(value));
    }

    /// Append `value` to the list stored under `key`.
    ///
    /// A fresh `Vec` holding the prior entries plus the new one replaces the
    /// old list; a reference obtained before the call never observes the
    /// appended value.
    pub fn append<V: Any + Send + Sync + Clone>(&mut self, target: TypeId, key: &str, value: V) {
        let mut list: Vec<V> = self.get::<Vec<V>>(target, key).cloned().unwrap_or_default();
        list.push(value);
        self.set(target, key, list);
    }

    /// Read the typed value under `key`, or `None` if unset.
    pub fn get<V: Any + Send + Sync>(&self, target: TypeId, key: &str) -> Option<&V> {
        self.inner.get(&target).and_then(|bag| bag.get::<V>(key))
    }

    /// The metadata bag of `target`, if anything was ever written for it.
    pub fn metadata(&self, target: TypeId) -> Option<&ControllerMetadata> {
        self.inner.get(&target)
    }

    fn bag(&mut self, target: TypeId) -> &mut ControllerMetadata {
        self.inner.entry(target).or_default()
    }
}
