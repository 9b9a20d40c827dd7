use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use morph_api::descriptor::TypeDescriptor;
use morph_api::morpher::{IdentityMorpher, Morpher};

/// The shared identity fallback.
pub fn identity() -> Arc<dyn Morpher> {
    static IDENTITY: OnceLock<Arc<dyn Morpher>> = OnceLock::new();
    Arc::clone(IDENTITY.get_or_init(|| Arc::new(IdentityMorpher)))
}

/// Registry of morphers, keyed by the type they morph to.
///
/// Each type maps to an ordered list: insertion order is priority order and
/// structurally equal morphers are registered once. A type with nothing
/// registered resolves to the identity morpher.
///
/// Uses interior mutability so that morphers can be added and removed while
/// other threads dispatch. Every operation holds the lock for its own
/// duration only.
#[derive(Debug, Default)]
pub struct MorpherRegistry {
    morphers: RwLock<HashMap<TypeDescriptor, Vec<Arc<dyn Morpher>>>>,
}

impl MorpherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeDescriptor, Vec<Arc<dyn Morpher>>>> {
        match self.morphers.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("morpher registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeDescriptor, Vec<Arc<dyn Morpher>>>> {
        match self.morphers.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("morpher registry write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Register a morpher under `morpher.morphs_to()`.
    ///
    /// With `override_existing` the list for that type is replaced by this
    /// morpher alone; otherwise it is appended unless an equal morpher is
    /// already present.
    pub fn register(&self, morpher: Arc<dyn Morpher>, override_existing: bool) {
        insert(&mut self.write(), morpher, override_existing);
    }

    /// Swap the whole content for `morphers`, registered in order.
    ///
    /// The new lists are built before the write lock is taken, so concurrent
    /// lookups see either the old set or the new one, never an empty
    /// registry in between.
    pub fn replace_all(&self, morphers: impl IntoIterator<Item = Arc<dyn Morpher>>) {
        let mut next = HashMap::new();
        for morpher in morphers {
            insert(&mut next, morpher, false);
        }
        let types = next.len();
        *self.write() = next;
        tracing::debug!(types, "morpher registry replaced");
    }

    /// Remove a morpher (by equality). The entry for its type disappears
    /// with its last morpher.
    pub fn deregister(&self, morpher: &dyn Morpher) {
        let target = morpher.morphs_to();
        let mut guard = self.write();
        let Some(list) = guard.get_mut(&target) else {
            return;
        };
        list.retain(|m| !m.same_as(morpher));
        if list.is_empty() {
            guard.remove(&target);
        }
    }

    /// Remove every registered morpher.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Remove every morpher registered for `target`.
    pub fn clear_type(&self, target: &TypeDescriptor) {
        self.write().remove(target);
    }

    /// First morpher registered for `target`, or the identity morpher.
    pub fn lookup_one(&self, target: &TypeDescriptor) -> Arc<dyn Morpher> {
        self.read()
            .get(target)
            .and_then(|list| list.first().cloned())
            .unwrap_or_else(identity)
    }

    /// All morphers registered for `target` in registration order, or a
    /// single identity morpher.
    pub fn lookup_all(&self, target: &TypeDescriptor) -> Vec<Arc<dyn Morpher>> {
        match self.read().get(target) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![identity()],
        }
    }

    /// Types that have at least one morpher.
    pub fn registered_types(&self) -> Vec<TypeDescriptor> {
        self.read().keys().cloned().collect()
    }
}

fn insert(
    map: &mut HashMap<TypeDescriptor, Vec<Arc<dyn Morpher>>>,
    morpher: Arc<dyn Morpher>,
    override_existing: bool,
) {
    let target = morpher.morphs_to();
    match map.get_mut(&target) {
        Some(list) if !override_existing => {
            if list.iter().any(|m| m.same_as(morpher.as_ref())) {
                tracing::debug!(morphs_to = %target, "morpher already registered");
                return;
            }
            list.push(morpher);
        }
        _ => {
            map.insert(target, vec![morpher]);
        }
    }
}
