//! Plain in-memory entities and lumps.
//!
//! Hosts with their own entity storage implement [`EntityView`] and [`Lump`]
//! directly; these types back the tests, benches and demos, and suit tools
//! that edit entity lumps offline.

use std::borrow::Cow;

use crate::{AllocationKind, Connection, EntityView, Lump};

/// An entity stored as an ordered attribute list plus its connections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryEntity {
    attributes: Vec<(String, String)>,
    connections: Vec<Connection>,
    queued_for_spawn: bool,
    allocation: AllocationKind,
}

impl MemoryEntity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute (builder form).
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Look up an attribute, ignoring case in the name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[must_use]
    pub fn allocation(&self) -> AllocationKind {
        self.allocation
    }

    /// While set, connection removal is refused.
    pub fn set_queued_for_spawn(&mut self, queued: bool) {
        self.queued_for_spawn = queued;
    }
}

impl EntityView for MemoryEntity {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => value.clone_into(v),
            None => self.attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn connection(&self, index: usize) -> Option<Connection> {
        self.connections.get(index).cloned()
    }

    fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    fn remove_connection(&mut self, index: usize) -> bool {
        if self.queued_for_spawn || index >= self.connections.len() {
            return false;
        }
        self.connections.remove(index);
        true
    }

    fn is_queued_for_spawn(&self) -> bool {
        self.queued_for_spawn
    }
}

/// A named list of [`MemoryEntity`] values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryLump {
    name: String,
    entities: Vec<MemoryEntity>,
}

impl MemoryLump {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entity(mut self, entity: MemoryEntity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn push(&mut self, entity: MemoryEntity) {
        self.entities.push(entity);
    }

    #[must_use]
    pub fn entities(&self) -> &[MemoryEntity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First entity whose `name` attribute equals `value`, ignoring case.
    #[must_use]
    pub fn find(&self, name: &str, value: &str) -> Option<&MemoryEntity> {
        self.entities
            .iter()
            .find(|e| e.get(name).is_some_and(|v| v.eq_ignore_ascii_case(value)))
    }
}

impl Lump for MemoryLump {
    type Entity = MemoryEntity;

    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.entities.len()
    }

    fn entity(&self, index: usize) -> Option<&MemoryEntity> {
        self.entities.get(index)
    }

    fn entity_mut(&mut self, index: usize) -> Option<&mut MemoryEntity> {
        self.entities.get_mut(index)
    }

    fn remove_entity(&mut self, index: usize) {
        if index < self.entities.len() {
            self.entities.remove(index);
        }
    }

    fn create_entity(&mut self, kind: AllocationKind) -> &mut MemoryEntity {
        let index = self.entities.len();
        self.entities.push(MemoryEntity {
            allocation: kind,
            ..MemoryEntity::default()
        });
        &mut self.entities[index]
    }
}
