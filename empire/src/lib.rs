/*!
Reactive properties grouped under a view model.

A [`Property`] wraps one value and reports every mutation as a [`ChangeEvent`] to the
[`ViewModel`] that owns it. The view model hands each batch of changes to its listeners,
typically a UI layer that decides whether to re-render.

# Design requirements:
- A property keeps the value it was created with, so it can always be reset
- Properties compare (and hash) by current value only, never by name or identity
- Listeners always see a complete, ordered batch, never part of one
- Properties hold only a weak handle to their view model
- Nothing is asynchronous: every mutation and notification runs to completion before returning

# Basic usage

```rust
use empire::*;
use std::sync::{Arc, Mutex};

struct PersonViewModel {
    hub: ViewModel,
    name: Property<String>,
    age: Property<u32>,
}

impl PersonViewModel {
    fn new() -> Self {
        let hub = ViewModel::new();
        let name = hub.named_property("name", "Buffy".to_string());
        let age = hub.named_property("age", 29);
        Self { hub, name, age }
    }
}

let mut person = PersonViewModel::new();
let renders = Arc::new(Mutex::new(0));
let _guard = {
    let renders = renders.clone();
    person.hub.listen(move |changes: &ChangeSet| {
        // only re-render for age changes
        if changes.contains("age") {
            *renders.lock().unwrap() += 1;
        }
    })
};

person.name.set("Willow".to_string());
person.age.set(30);
assert_eq!(*renders.lock().unwrap(), 1);

// several mutations, one notification
person.hub.batch(|| {
    person.age.set(31);
    person.name.reset();
});
assert_eq!(*renders.lock().unwrap(), 2);
assert_eq!(person.name, "Buffy".to_string());
```
*/

mod error;
mod event;
mod listener;
mod property;
mod view_model;

pub use error::*;
pub use event::*;
pub use listener::*;
pub use property::*;
pub use view_model::*;
