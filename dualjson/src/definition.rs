// SPDX-License-Identifier: Apache-2.0

//! A typed tree describing the expected shape of a document.
//!
//! Definitions are built by the caller and are independent of parsing.

use alloc::collections::btree_map::{self, BTreeMap};
use alloc::string::String;
use alloc::vec::Vec;

/// Type a definition node describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    String,
    Number,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueDefinition {
    /// A named leaf of kind `String` or `Number`
    Scalar { name: String, kind: DefinitionKind },
    Array(ArrayDefinition),
    Object(ObjectDefinition),
}

impl ValueDefinition {
    pub fn string(name: impl Into<String>) -> Self {
        ValueDefinition::Scalar {
            name: name.into(),
            kind: DefinitionKind::String,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        ValueDefinition::Scalar {
            name: name.into(),
            kind: DefinitionKind::Number,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ValueDefinition::Scalar { name, .. } => name,
            ValueDefinition::Array(array) => &array.name,
            ValueDefinition::Object(object) => &object.name,
        }
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            ValueDefinition::Scalar { kind, .. } => *kind,
            ValueDefinition::Array(_) => DefinitionKind::Array,
            ValueDefinition::Object(_) => DefinitionKind::Object,
        }
    }
}

impl From<ObjectDefinition> for ValueDefinition {
    fn from(v: ObjectDefinition) -> Self {
        ValueDefinition::Object(v)
    }
}

impl From<ArrayDefinition> for ValueDefinition {
    fn from(v: ArrayDefinition) -> Self {
        ValueDefinition::Array(v)
    }
}

/// Named members, each with its own definition. Member names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectDefinition {
    name: String,
    members: BTreeMap<String, ValueDefinition>,
}

impl ObjectDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ValueDefinition> {
        self.members.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ValueDefinition> {
        self.members.get_mut(name)
    }

    /// Adds a member; a name that is already taken hands the definition back.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: ValueDefinition,
    ) -> Result<(), ValueDefinition> {
        match self.members.entry(name.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(definition);
                Ok(())
            }
            btree_map::Entry::Occupied(_) => Err(definition),
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ValueDefinition> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// An ordered list of element definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayDefinition {
    name: String,
    elements: Vec<ValueDefinition>,
}

impl ArrayDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, definition: ValueDefinition) {
        self.elements.push(definition);
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ValueDefinition> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
