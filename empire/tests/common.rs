use empire::{ChangeSet, PropertyValue};
use std::sync::{Arc, Mutex};

/// Install a test-writer tracing subscriber. Safe to call from every test.
#[allow(unused)]
pub fn init_tracing() { let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init(); }

/// Returns a listener that records every batch, and a closure that drains what was recorded so far
#[allow(unused)]
pub fn watcher() -> (impl Fn(&ChangeSet) + Send + Sync + 'static, impl Fn() -> Vec<ChangeSet>) {
    let batches = Arc::new(Mutex::new(Vec::new()));
    let listener = {
        let batches = batches.clone();
        move |changes: &ChangeSet| batches.lock().unwrap().push(changes.clone())
    };
    let check = move || batches.lock().unwrap().drain(..).collect::<Vec<_>>();
    (listener, check)
}

/// The `(old, new)` pairs of a batch whose changes all hold a `T`
#[allow(unused)]
pub fn transitions<T: PropertyValue>(changes: &ChangeSet) -> Vec<(T, T)> {
    changes
        .iter()
        .map(|change| {
            let event = change.downcast_ref::<T>().expect("change holds a different value type");
            (event.old_value().clone(), event.new_value().clone())
        })
        .collect()
}
