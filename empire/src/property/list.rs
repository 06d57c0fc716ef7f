use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use crate::error::PropertyError;
use crate::property::{Property, PropertyName, PropertyValue};
use crate::view_model::ViewModel;

/// A property holding an ordered list.
///
/// Structural mutations are reported as a replacement of the whole list: the emitted
/// event's old value is a snapshot taken before the mutation and its new value is the
/// list afterwards. This keeps list notifications identical in shape to scalar ones at
/// the cost of one copy of the list per notifying mutation.
///
/// Derefs to [`Property<Vec<T>>`], so `set`, `reset`, and equality work as for any property.
pub struct ListProperty<T>(Property<Vec<T>>);

impl<T: PropertyValue> ListProperty<T> {
    pub fn new(owner: &ViewModel, items: Vec<T>) -> Self { Self(Property::new(owner, items)) }

    pub fn named(owner: &ViewModel, name: impl Into<PropertyName>, items: Vec<T>) -> Self { Self(Property::named(owner, name, items)) }

    /// Append an item
    pub fn add(&mut self, item: T) { self.mutate(true, |items| items.push(item)) }

    pub fn add_silent(&mut self, item: T) { self.mutate(false, |items| items.push(item)) }

    /// Append every item, in order
    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) { self.mutate(true, |current| current.extend(items)) }

    pub fn add_all_silent(&mut self, items: impl IntoIterator<Item = T>) { self.mutate(false, |current| current.extend(items)) }

    /// Insert an item at `index`, shifting later items back. `index` may equal the length.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), PropertyError> { self.insert_inner(index, item, true) }

    pub fn insert_silent(&mut self, index: usize, item: T) -> Result<(), PropertyError> { self.insert_inner(index, item, false) }

    /// Remove the first item equal to `item`. Returns whether an item was removed.
    ///
    /// A change is emitted whether or not anything matched.
    pub fn remove(&mut self, item: &T) -> bool { self.remove_inner(item, true) }

    pub fn remove_silent(&mut self, item: &T) -> bool { self.remove_inner(item, false) }

    /// Remove and return the item at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<T, PropertyError> { self.remove_at_inner(index, true) }

    pub fn remove_at_silent(&mut self, index: usize) -> Result<T, PropertyError> { self.remove_at_inner(index, false) }

    /// Remove every item
    pub fn clear(&mut self) { self.mutate(true, Vec::clear) }

    pub fn clear_silent(&mut self) { self.mutate(false, Vec::clear) }

    pub fn contains(&self, item: &T) -> bool { self.0.value().contains(item) }

    pub fn index_of(&self, item: &T) -> Option<usize> { self.0.value().iter().position(|candidate| candidate == item) }

    /// Borrow the item at `index`
    pub fn at(&self, index: usize) -> Option<&T> { self.0.value().get(index) }

    pub fn first(&self) -> Option<&T> { self.0.value().first() }

    pub fn last(&self) -> Option<&T> { self.0.value().last() }

    pub fn len(&self) -> usize { self.0.value().len() }

    pub fn is_empty(&self) -> bool { self.0.value().is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, T> { self.0.value().iter() }

    pub fn map<R>(&self, f: impl FnMut(&T) -> R) -> Vec<R> { self.0.value().iter().map(f).collect() }

    pub fn for_each(&self, f: impl FnMut(&T)) { self.0.value().iter().for_each(f) }

    fn insert_inner(&mut self, index: usize, item: T, notify: bool) -> Result<(), PropertyError> {
        let len = self.len();
        if index > len {
            return Err(PropertyError::IndexOutOfRange { index, len });
        }
        self.mutate(notify, |items| items.insert(index, item));
        Ok(())
    }

    fn remove_inner(&mut self, item: &T, notify: bool) -> bool {
        self.mutate(notify, |items| match items.iter().position(|candidate| candidate == item) {
            Some(position) => {
                items.remove(position);
                true
            }
            None => false,
        })
    }

    fn remove_at_inner(&mut self, index: usize, notify: bool) -> Result<T, PropertyError> {
        let len = self.len();
        if index >= len {
            return Err(PropertyError::IndexOutOfRange { index, len });
        }
        Ok(self.mutate(notify, |items| items.remove(index)))
    }

    /// Apply a structural mutation, snapshotting the list first if a change will be emitted
    fn mutate<R>(&mut self, notify: bool, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let snapshot = notify.then(|| self.0.get());
        let result = f(self.0.value_mut());
        if let Some(old_value) = snapshot {
            self.0.emit(old_value);
        }
        result
    }
}

impl<T> Deref for ListProperty<T> {
    type Target = Property<Vec<T>>;
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<T> DerefMut for ListProperty<T> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<'a, T: PropertyValue> IntoIterator for &'a ListProperty<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.0.value().iter() }
}

impl<T: PartialEq> PartialEq for ListProperty<T> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl<T: PartialEq> PartialEq<Vec<T>> for ListProperty<T> {
    fn eq(&self, other: &Vec<T>) -> bool { self.0 == *other }
}

impl<T: Eq> Eq for ListProperty<T> {}

impl<T: Hash> Hash for ListProperty<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.0.hash(state) }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ListProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_tuple("ListProperty").field(&self.0).finish() }
}
