use std::any::Any;
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::property::{PropertyName, PropertyValue};

/// An immutable record of one value transition.
///
/// A `ChangeEvent` holds its values by value and keeps no reference to the
/// property or view model that produced it, so it can outlive both and be
/// serialized independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    new_value: T,
    old_value: T,
    name: Option<PropertyName>,
}

impl<T> ChangeEvent<T> {
    pub fn new(new_value: T, old_value: T, name: Option<PropertyName>) -> Self { Self { new_value, old_value, name } }

    pub fn new_value(&self) -> &T { &self.new_value }

    pub fn old_value(&self) -> &T { &self.old_value }

    /// The name of the property that produced this event, if it was given one
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    pub fn into_values(self) -> (T, T) { (self.new_value, self.old_value) }
}

/// Object safe view of a `ChangeEvent<T>` for any `T`
trait AnyChangeEvent: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_debug(&self) -> &dyn Debug;
    fn name(&self) -> Option<&str>;
    fn value_type_name(&self) -> &'static str;
}

impl<T: PropertyValue> AnyChangeEvent for ChangeEvent<T> {
    fn as_any(&self) -> &dyn Any { self }

    fn as_debug(&self) -> &dyn Debug { self }

    fn name(&self) -> Option<&str> { self.name.as_deref() }

    fn value_type_name(&self) -> &'static str { std::any::type_name::<T>() }
}

/// A type-erased [`ChangeEvent`], so that one batch can carry changes to properties of different value types.
///
/// Cloning a `Change` is a reference count bump; every clone points at the same immutable event.
#[derive(Clone)]
pub struct Change(Arc<dyn AnyChangeEvent>);

impl Change {
    pub fn new<T: PropertyValue>(event: ChangeEvent<T>) -> Self { Self(Arc::new(event)) }

    pub fn name(&self) -> Option<&str> { self.0.name() }

    /// Returns true if this change was produced by a property holding a `T`
    pub fn is<T: PropertyValue>(&self) -> bool { self.0.as_any().is::<ChangeEvent<T>>() }

    /// Borrow the typed event, or `None` if the value type is not `T`
    pub fn downcast_ref<T: PropertyValue>(&self) -> Option<&ChangeEvent<T>> { self.0.as_any().downcast_ref::<ChangeEvent<T>>() }

    pub fn new_value<T: PropertyValue>(&self) -> Option<&T> { self.downcast_ref::<T>().map(ChangeEvent::new_value) }

    pub fn old_value<T: PropertyValue>(&self) -> Option<&T> { self.downcast_ref::<T>().map(ChangeEvent::old_value) }

    /// The Rust type name of the changed value. Intended for diagnostics only
    pub fn value_type_name(&self) -> &'static str { self.0.value_type_name() }
}

impl Debug for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.as_debug().fmt(f) }
}

impl<T: PropertyValue> From<ChangeEvent<T>> for Change {
    fn from(event: ChangeEvent<T>) -> Self { Change::new(event) }
}

/// An ordered batch of changes, delivered to every listener in one call
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self { Self::default() }

    pub fn changes(&self) -> &[Change] { &self.changes }

    /// Property names present in this batch, in delivery order. Unnamed changes are skipped
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ { self.changes.iter().filter_map(Change::name) }

    /// Returns true if any change in the batch came from a property with the given name
    pub fn contains(&self, name: &str) -> bool { self.names().any(|n| n == name) }

    pub(crate) fn push(&mut self, change: Change) { self.changes.push(change) }

    pub(crate) fn append(&mut self, other: ChangeSet) { self.changes.extend(other.changes) }
}

impl Deref for ChangeSet {
    type Target = [Change];
    fn deref(&self) -> &Self::Target { &self.changes }
}

impl From<Change> for ChangeSet {
    fn from(change: Change) -> Self { Self { changes: vec![change] } }
}

impl<T: PropertyValue> From<ChangeEvent<T>> for ChangeSet {
    fn from(event: ChangeEvent<T>) -> Self { Change::new(event).into() }
}

impl From<Vec<Change>> for ChangeSet {
    fn from(changes: Vec<Change>) -> Self { Self { changes } }
}

impl FromIterator<Change> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self { Self { changes: iter.into_iter().collect() } }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;
    fn into_iter(self) -> Self::IntoIter { self.changes.into_iter() }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;
    fn into_iter(self) -> Self::IntoIter { self.changes.iter() }
}
