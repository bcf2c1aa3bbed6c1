//! Entity trait: records identified by id rather than by value.

/// A record with a stable identifier that survives edits.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// Position of the entity with `id` inside an ordered list.
pub fn position_of<E: Entity>(items: &[E], id: E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Mutable lookup by id inside an ordered list.
pub fn find_mut<E: Entity>(items: &mut [E], id: E::Id) -> Option<&mut E> {
    items.iter_mut().find(|item| item.id() == id)
}
