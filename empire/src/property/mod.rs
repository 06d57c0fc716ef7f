mod boolean;
mod list;

pub use boolean::{BoolProperty, NullableBoolProperty};
pub use list::ListProperty;

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::event::{Change, ChangeEvent};
use crate::view_model::{ViewModel, WeakViewModel};

pub type PropertyName = String;

/// Bounds shared by every value a [`Property`] can hold.
///
/// Values are cloned into each [`ChangeEvent`], compared for equality, and carried
/// across listener boundaries inside a type-erased [`Change`].
pub trait PropertyValue: Clone + PartialEq + Debug + Send + Sync + 'static {}
impl<T> PropertyValue for T where T: Clone + PartialEq + Debug + Send + Sync + 'static {}

/// A single observable value owned by a view model.
///
/// Every mutation goes through [`set`](Property::set) or [`reset`](Property::reset), which
/// report a [`ChangeEvent`] to the owning [`ViewModel`]. The property only keeps a weak
/// handle to its owner; if the view model is gone, mutations still apply and their
/// notifications are dropped.
///
/// Two properties compare equal when their current values are equal, regardless of name,
/// and a property compares equal to a raw `T` holding the same value.
pub struct Property<T> {
    value: T,
    original: T,
    name: Option<PropertyName>,
    owner: WeakViewModel,
}

impl<T: PropertyValue> Property<T> {
    pub fn new(owner: &ViewModel, value: T) -> Self { Self::build(owner, None, value) }

    pub fn named(owner: &ViewModel, name: impl Into<PropertyName>, value: T) -> Self { Self::build(owner, Some(name.into()), value) }

    fn build(owner: &ViewModel, name: Option<PropertyName>, value: T) -> Self {
        Self { original: value.clone(), value, name, owner: owner.downgrade() }
    }

    /// Borrow the current value
    pub fn value(&self) -> &T { &self.value }

    /// Returns a clone of the current value
    pub fn get(&self) -> T { self.value.clone() }

    /// The value this property was constructed with
    pub fn original(&self) -> &T { &self.original }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Returns true if the current value differs from the original value
    pub fn is_modified(&self) -> bool { self.value != self.original }

    /// The owning view model, if it is still alive
    pub fn view_model(&self) -> Option<ViewModel> { self.owner.upgrade() }

    /// Replace the value and notify the owning view model.
    ///
    /// Listeners are notified even if the new value equals the old one.
    /// Use [`set_if_changed`](Property::set_if_changed) to skip no-op writes.
    pub fn set(&mut self, value: T) { self.set_inner(value, true) }

    /// Replace the value without emitting a change
    pub fn set_silent(&mut self, value: T) { self.set_inner(value, false) }

    /// Replace the value and notify only if it differs from the current value.
    /// Returns whether a change was applied.
    pub fn set_if_changed(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.set_inner(value, true);
        true
    }

    /// Restore the original value and notify the owning view model
    pub fn reset(&mut self) { self.reset_inner(true) }

    /// Restore the original value without emitting a change
    pub fn reset_silent(&mut self) { self.reset_inner(false) }

    fn set_inner(&mut self, value: T, notify: bool) {
        let old_value = std::mem::replace(&mut self.value, value);
        if notify {
            self.emit(old_value);
        }
    }

    fn reset_inner(&mut self, notify: bool) {
        let original = self.original.clone();
        self.set_inner(original, notify);
    }

    /// Mutate the value in place. The caller supplies the pre-mutation snapshot when it wants a notification.
    pub(crate) fn value_mut(&mut self) -> &mut T { &mut self.value }

    /// Report a transition from `old_value` to the current value
    pub(crate) fn emit(&self, old_value: T) {
        let event = ChangeEvent::new(self.value.clone(), old_value, self.name.clone());
        trace!(name = ?self.name, ?event, "property changed");
        self.owner.notify(Change::new(event));
    }
}

impl<T: PartialEq> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool { self.value == other.value }
}

impl<T: PartialEq> PartialEq<T> for Property<T> {
    fn eq(&self, other: &T) -> bool { self.value == *other }
}

impl<T: Eq> Eq for Property<T> {}

impl<T: Hash> Hash for Property<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.value.hash(state) }
}

impl<T: Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property").field("name", &self.name).field("value", &self.value).field("original", &self.original).finish()
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { std::fmt::Display::fmt(&self.value, f) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::sync::{Arc, Mutex};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_set_then_reset() {
        let vm = ViewModel::new();
        let mut count = Property::new(&vm, 1);

        count.set(2);
        count.set(3);
        assert_eq!(*count.value(), 3);
        assert!(count.is_modified());

        count.reset();
        assert_eq!(count.get(), 1);
        assert_eq!(*count.original(), 1);
        assert!(!count.is_modified());
    }

    #[test]
    fn test_equality_ignores_name() {
        let vm = ViewModel::new();
        let a = Property::named(&vm, "a", "same".to_string());
        let b = Property::named(&vm, "b", "same".to_string());
        let c = Property::new(&vm, "other".to_string());

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "same".to_string());
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&a), hash_of(&"same".to_string()));
    }

    #[test]
    fn test_set_if_changed_skips_equal_values() {
        let vm = ViewModel::new();
        let seen = Arc::new(Mutex::new(0));
        let _guard = {
            let seen = seen.clone();
            vm.listen(move |_: &crate::ChangeSet| *seen.lock().unwrap() += 1)
        };

        let mut flag = Property::new(&vm, 5);
        assert!(!flag.set_if_changed(5));
        assert_eq!(*seen.lock().unwrap(), 0);

        assert!(flag.set_if_changed(6));
        assert_eq!(*seen.lock().unwrap(), 1);

        // plain set notifies even when unchanged
        flag.set(6);
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn test_mutation_after_view_model_dropped() {
        let vm = ViewModel::new();
        let mut name = Property::named(&vm, "name", "Buffy");
        drop(vm);

        assert!(name.view_model().is_none());
        name.set("Willow");
        assert_eq!(name, "Willow");
    }

    #[test]
    fn test_display_and_debug() {
        let vm = ViewModel::new();
        let mut age = Property::named(&vm, "age", 29u32);
        age.set_silent(30);

        assert_eq!(age.to_string(), "30");
        assert_eq!(format!("{age:?}"), r#"Property { name: Some("age"), value: 30, original: 29 }"#);
    }
}
