use std::ops::{Deref, DerefMut};

use crate::property::{Property, PropertyName};
use crate::view_model::ViewModel;

/// A `bool` property with predicate helpers
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BoolProperty(Property<bool>);

impl BoolProperty {
    pub fn new(owner: &ViewModel, value: bool) -> Self { Self(Property::new(owner, value)) }

    pub fn named(owner: &ViewModel, name: impl Into<PropertyName>, value: bool) -> Self { Self(Property::named(owner, name, value)) }

    pub fn is_true(&self) -> bool { *self.0.value() }

    pub fn is_false(&self) -> bool { !*self.0.value() }

    pub fn set_true(&mut self) { self.0.set(true) }

    pub fn set_false(&mut self) { self.0.set(false) }

    /// Flip the value and notify
    pub fn toggle(&mut self) {
        let flipped = !*self.0.value();
        self.0.set(flipped)
    }
}

impl Deref for BoolProperty {
    type Target = Property<bool>;
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl DerefMut for BoolProperty {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl PartialEq<bool> for BoolProperty {
    fn eq(&self, other: &bool) -> bool { self.0 == *other }
}

/// An `Option<bool>` property. `None` is neither true nor false.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct NullableBoolProperty(Property<Option<bool>>);

impl NullableBoolProperty {
    pub fn new(owner: &ViewModel, value: Option<bool>) -> Self { Self(Property::new(owner, value)) }

    pub fn named(owner: &ViewModel, name: impl Into<PropertyName>, value: Option<bool>) -> Self { Self(Property::named(owner, name, value)) }

    pub fn is_true(&self) -> bool { *self.0.value() == Some(true) }

    pub fn is_false(&self) -> bool { *self.0.value() == Some(false) }

    pub fn is_null(&self) -> bool { self.0.value().is_none() }

    pub fn set_true(&mut self) { self.0.set(Some(true)) }

    pub fn set_false(&mut self) { self.0.set(Some(false)) }

    pub fn set_null(&mut self) { self.0.set(None) }
}

impl Deref for NullableBoolProperty {
    type Target = Property<Option<bool>>;
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl DerefMut for NullableBoolProperty {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl PartialEq<Option<bool>> for NullableBoolProperty {
    fn eq(&self, other: &Option<bool>) -> bool { self.0 == *other }
}
