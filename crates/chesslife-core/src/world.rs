//! The entity runtime - identity, ownership and lookup on top of `hecs`.
//!
//! `hecs` already gives us generational entity ids (a stale id never resolves
//! to a new object), one-component-per-type attachment, and borrow-checked
//! access. This wrapper adds the rest of the runtime contract: a registration
//! table iterated in spawn order, name lookup, parent/child ownership with
//! cascading destruction, and the world-owned random source.

use hecs::{Component, DynamicBundle, Entity, Ref, RefMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{Children, Container, Name, Parent};

/// Failure of a lookup that expected exactly one entity.
#[derive(Debug)]
pub enum LookupError {
    /// No entity matched.
    Missing(String),
    /// More than one entity matched.
    Ambiguous { what: String, count: usize },
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Missing(what) => write!(f, "no entity matching {}", what),
            LookupError::Ambiguous { what, count } => {
                write!(f, "expected exactly one {}, found {}", what, count)
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// The simulation world: entity storage plus the runtime services every
/// system needs (registration order, names, ownership, randomness).
///
/// Constructed explicitly and passed around rather than living in a global,
/// so several worlds can run side by side in tests.
pub struct World {
    ecs: hecs::World,
    /// Live registered entities in spawn order. Released entities leave this
    /// table but keep their component storage until their owner is destroyed.
    registry: Vec<Entity>,
    rng: StdRng,
}

impl World {
    /// Create a world with an entropy-seeded random source.
    pub fn new() -> Self {
        Self {
            ecs: hecs::World::new(),
            registry: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a world with a fixed random seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            ecs: hecs::World::new(),
            registry: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // ── Creation ────────────────────────────────────────────────────────

    /// Spawn a new entity and register it.
    pub fn spawn(&mut self, bundle: impl DynamicBundle) -> Entity {
        let entity = self.ecs.spawn(bundle);
        self.registry.push(entity);
        entity
    }

    /// Spawn a new entity with a (non-unique) name.
    pub fn spawn_named(&mut self, name: impl Into<String>, bundle: impl DynamicBundle) -> Entity {
        let entity = self.spawn(bundle);
        let _ = self.ecs.insert_one(entity, Name::new(name));
        entity
    }

    /// Spawn a new entity owned by `parent`. Destroying the parent destroys
    /// the child.
    pub fn spawn_child(&mut self, parent: Entity, bundle: impl DynamicBundle) -> Entity {
        let entity = self.spawn(bundle);
        let _ = self.ecs.insert_one(entity, Parent(parent));
        let has_children = self.ecs.satisfies::<&Children>(parent).unwrap_or(false);
        if has_children {
            if let Ok(mut children) = self.ecs.get::<&mut Children>(parent) {
                children.0.push(entity);
            }
        } else {
            let _ = self.ecs.insert_one(parent, Children(vec![entity]));
        }
        entity
    }

    // ── Capability attachment and query ─────────────────────────────────

    /// Attach a component, replacing any existing one of the same type.
    /// Returns false if the entity is gone.
    pub fn attach<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        self.ecs.insert_one(entity, component).is_ok()
    }

    /// Detach and return a component, if present.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.ecs.remove_one::<T>(entity).ok()
    }

    /// View an entity as a capability. `None` if the entity does not carry
    /// the component or the id is stale.
    pub fn component<T: Component>(&self, entity: Entity) -> Option<Ref<'_, T>> {
        self.ecs.get::<&T>(entity).ok()
    }

    /// Mutable capability view. Borrow conflicts are checked at runtime by
    /// the underlying storage.
    pub fn component_mut<T: Component>(&self, entity: Entity) -> Option<RefMut<'_, T>> {
        self.ecs.get::<&mut T>(entity).ok()
    }

    /// Does this entity carry component `T`?
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.ecs.satisfies::<&T>(entity).unwrap_or(false)
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    /// All registered entities with exactly this name, registration order.
    pub fn find_by_name(&self, name: &str) -> Vec<Entity> {
        self.registry
            .iter()
            .copied()
            .filter(|&entity| {
                self.ecs
                    .get::<&Name>(entity)
                    .map(|n| n.as_str() == name)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// The to-single reduction over [`World::find_by_name`].
    pub fn single_by_name(&self, name: &str) -> Result<Entity, LookupError> {
        let matches = self.find_by_name(name);
        match matches.len() {
            0 => Err(LookupError::Missing(format!("named \"{}\"", name))),
            1 => Ok(matches[0]),
            count => Err(LookupError::Ambiguous {
                what: format!("entity named \"{}\"", name),
                count,
            }),
        }
    }

    /// First registered entity carrying component `T`, in registration order.
    pub fn first_with<T: Component>(&self) -> Option<Entity> {
        self.registry.iter().copied().find(|&entity| self.has::<T>(entity))
    }

    /// All registered entities carrying component `T`, registration order.
    pub fn all_with<T: Component>(&self) -> Vec<Entity> {
        self.registry
            .iter()
            .copied()
            .filter(|&entity| self.has::<T>(entity))
            .collect()
    }

    /// The to-single reduction over a component type.
    pub fn single_with<T: Component>(&self) -> Result<Entity, LookupError> {
        let matches = self.all_with::<T>();
        let what = std::any::type_name::<T>();
        match matches.len() {
            0 => Err(LookupError::Missing(what.to_string())),
            1 => Ok(matches[0]),
            count => Err(LookupError::Ambiguous {
                what: what.to_string(),
                count,
            }),
        }
    }

    // ── Iteration ───────────────────────────────────────────────────────

    /// Live registered entities in registration order. Each call produces a
    /// fresh cursor. Because it borrows the world shared, spawning or
    /// removing while a cursor is live will not compile; collect first, then
    /// mutate.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.iter().copied()
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no entity is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Is this entity still alive (registered or merely owned)?
    pub fn contains(&self, entity: Entity) -> bool {
        self.ecs.contains(entity)
    }

    /// Is this entity in the registration table?
    pub fn is_registered(&self, entity: Entity) -> bool {
        self.registry.contains(&entity)
    }

    // ── Removal ─────────────────────────────────────────────────────────

    /// Take an entity out of the registration table without destroying its
    /// storage. A released entity no longer shows up in iteration or lookup,
    /// but stays alive as long as some owner (a time-frame, say) holds it.
    pub fn release(&mut self, entity: Entity) -> bool {
        match self.registry.iter().position(|&e| e == entity) {
            Some(index) => {
                self.registry.remove(index);
                true
            }
            None => false,
        }
    }

    /// Destroy an entity: unregister it, unlink it from its parent, and
    /// despawn it together with everything it exclusively owns (children and
    /// container contents). Stale ids are a no-op.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.detach_from_parent(entity);
        self.release(entity);
        self.despawn_owned(entity);
    }

    /// Remove the `Parent` link and the corresponding entry in the parent's
    /// child list, leaving the entity alive and registered.
    pub fn detach_from_parent(&mut self, entity: Entity) {
        let parent = self.component::<Parent>(entity).map(|p| p.0);
        if let Some(parent) = parent {
            if let Ok(mut children) = self.ecs.get::<&mut Children>(parent) {
                children.0.retain(|&child| child != entity);
            }
            let _ = self.ecs.remove_one::<Parent>(entity);
        }
    }

    fn despawn_owned(&mut self, entity: Entity) {
        // Read pass first; despawning while a component borrow is live would
        // violate the storage borrow rules.
        let mut owned: Vec<Entity> = Vec::new();
        if let Some(children) = self.component::<Children>(entity) {
            owned.extend(children.0.iter().copied());
        }
        if let Some(container) = self.component::<Container>(entity) {
            owned.extend(container.items().iter().copied());
        }
        for item in owned {
            self.release(item);
            self.despawn_owned(item);
        }
        let _ = self.ecs.despawn(entity);
    }

    // ── Container operations ────────────────────────────────────────────

    /// Append an item to an entity's container, preserving insertion order.
    /// Returns false if the owner has no container.
    pub fn container_push(&mut self, owner: Entity, item: Entity) -> bool {
        match self.ecs.get::<&mut Container>(owner) {
            Ok(mut container) => {
                container.push(item);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove and destroy the oldest item of an entity's container. Returns
    /// the id of the destroyed item, which will no longer resolve.
    pub fn container_pop_front(&mut self, owner: Entity) -> Option<Entity> {
        let popped = match self.ecs.get::<&mut Container>(owner) {
            Ok(mut container) => container.pop_front(),
            Err(_) => None,
        };
        if let Some(item) = popped {
            self.release(item);
            self.despawn_owned(item);
        }
        popped
    }

    /// Number of items in an entity's container (0 if it has none).
    pub fn container_len(&self, owner: Entity) -> usize {
        self.component::<Container>(owner)
            .map(|container| container.len())
            .unwrap_or(0)
    }

    /// Stable ordered snapshot of an entity's container.
    pub fn container_items(&self, owner: Entity) -> Vec<Entity> {
        self.component::<Container>(owner)
            .map(|container| container.items().iter().copied().collect())
            .unwrap_or_default()
    }

    /// Most recently appended item, or `None` when empty.
    pub fn container_last(&self, owner: Entity) -> Option<Entity> {
        self.component::<Container>(owner)
            .and_then(|container| container.items().back().copied())
    }

    // ── Randomness ──────────────────────────────────────────────────────

    /// Uniform random integer in `lo..=hi`.
    pub fn random_int(&mut self, lo: i32, hi: i32) -> i32 {
        self.rng.gen_range(lo..=hi)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
