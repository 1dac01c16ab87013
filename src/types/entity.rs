use std::borrow::Cow;

use super::connection::Connection;

/// Name of the lump holding a level's default entities.
pub const DEFAULT_LUMP: &str = "default_ents";

/// Who owns the memory of a newly created entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationKind {
    /// Allocated by the host while building the level.
    #[default]
    Host,
    /// Created on behalf of a rule file.
    External,
}

/// A host-owned entity: named string attributes plus an ordered list of
/// connections.
///
/// Attribute names are looked up case-insensitively by the implementation.
pub trait EntityView {
    /// Current value of `name`, or `None` if the entity has no such attribute.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Create or overwrite `name`.
    fn set_attribute(&mut self, name: &str, value: &str);

    fn remove_attribute(&mut self, name: &str);

    fn connection_count(&self) -> usize;

    fn connection(&self, index: usize) -> Option<Connection>;

    fn add_connection(&mut self, connection: Connection);

    /// Remove the connection at `index`. Must be refused (returning `false`)
    /// while the entity is queued for spawn.
    fn remove_connection(&mut self, index: usize) -> bool;

    /// Whether the host has the entity in its transient queued-for-spawn state.
    fn is_queued_for_spawn(&self) -> bool {
        false
    }
}

/// A named, host-owned collection of entities.
pub trait Lump {
    type Entity: EntityView;

    fn name(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entity(&self, index: usize) -> Option<&Self::Entity>;

    fn entity_mut(&mut self, index: usize) -> Option<&mut Self::Entity>;

    /// Drop the entity at `index`; later entities shift down by one.
    fn remove_entity(&mut self, index: usize);

    /// Allocate a new, empty entity at the end of the lump.
    fn create_entity(&mut self, kind: AllocationKind) -> &mut Self::Entity;
}
