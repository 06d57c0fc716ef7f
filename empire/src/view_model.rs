use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use std::thread::ThreadId;

use tracing::{debug, trace, warn};

use crate::event::{Change, ChangeSet};
use crate::listener::{IntoListener, Listener, ListenerGuard, ListenerId};
use crate::property::{BoolProperty, ListProperty, NullableBoolProperty, Property, PropertyName, PropertyValue};

/// The notification hub that owns a group of properties.
///
/// A `ViewModel` fans each batch of changes out to its registered listeners. Cloning a
/// `ViewModel` yields another handle to the same hub; properties only hold a
/// [`WeakViewModel`], so they never keep the hub alive.
///
/// # Delivery
///
/// - [`notify_changes`](ViewModel::notify_changes) hands the whole batch, in order, to every
///   listener in registration order, and returns once they have all run.
/// - The listener set is snapshotted when a batch starts. Listeners added or removed by a
///   listener take effect from the next batch.
/// - A batch issued by a listener while its own thread is delivering is queued and delivered
///   as its own batch once the in-flight one completes. That nested call returns without waiting.
/// - Deliveries from different threads are serialized: a call from another thread blocks until
///   the in-flight delivery finishes, then delivers its own batch before returning. A listener
///   must not wait on another thread that notifies the same view model.
/// - Within a [`batch`](ViewModel::batch) scope, changes issued on the same thread accumulate and
///   are delivered as a single batch when that thread's outermost scope closes. Scopes on other
///   threads do not capture them.
///
/// Property mutation happens through `&mut` borrows and is therefore confined to whoever
/// owns the surrounding view model struct. The listener and dispatch locks are never held
/// while a listener runs.
#[derive(Clone)]
pub struct ViewModel(Arc<Inner>);

/// A non-owning handle to a [`ViewModel`]
#[derive(Clone)]
pub struct WeakViewModel(Weak<Inner>);

pub(crate) struct Inner {
    listeners: RwLock<BTreeMap<ListenerId, Listener>>,
    next_id: AtomicUsize,
    /// Held by the delivering thread for the whole drain of its queue
    delivery: Mutex<()>,
    dispatch: Mutex<Dispatch>,
}

#[derive(Default)]
struct Dispatch {
    /// The thread currently draining `queue`
    delivering: Option<ThreadId>,
    /// Batches issued re-entrantly by the delivering thread
    queue: VecDeque<ChangeSet>,
    /// Open batch scopes, per thread
    scopes: HashMap<ThreadId, BatchScope>,
}

#[derive(Default)]
struct BatchScope {
    depth: usize,
    pending: ChangeSet,
}

impl ViewModel {
    pub fn new() -> Self {
        Self(Arc::new(Inner {
            listeners: RwLock::new(BTreeMap::new()),
            next_id: AtomicUsize::new(0),
            delivery: Mutex::new(()),
            dispatch: Mutex::new(Dispatch::default()),
        }))
    }

    pub fn downgrade(&self) -> WeakViewModel { WeakViewModel(Arc::downgrade(&self.0)) }

    /// Register a listener. Registering the same callback twice makes it run twice per batch.
    pub fn add_listener<L: IntoListener>(&self, listener: L) -> ListenerId { self.0.add_listener(listener.into_listener()) }

    /// Unregister a listener. Returns false if the id was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool { self.0.remove_listener(id) }

    /// Register a listener for as long as the returned guard lives
    pub fn listen<L: IntoListener>(&self, listener: L) -> ListenerGuard {
        let id = self.0.add_listener(listener.into_listener());
        ListenerGuard { inner: Arc::downgrade(&self.0), id }
    }

    pub fn listener_count(&self) -> usize { self.0.listeners.read().expect("listeners lock is poisoned").len() }

    /// Deliver a batch of changes to every registered listener
    pub fn notify_changes(&self, changes: impl Into<ChangeSet>) { self.0.notify_changes(changes.into()) }

    /// Open a batch scope on the current thread. Changes are held until the thread's last open scope is dropped.
    pub fn begin_batch(&self) -> BatchGuard {
        let thread = std::thread::current().id();
        let mut dispatch = self.0.dispatch();
        let scope = dispatch.scopes.entry(thread).or_default();
        scope.depth += 1;
        trace!(depth = scope.depth, "batch scope opened");
        BatchGuard { inner: self.0.clone(), thread }
    }

    /// Run `f` inside a batch scope, delivering everything it changes as one batch
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        let _scope = self.begin_batch();
        f()
    }

    pub fn property<T: PropertyValue>(&self, value: T) -> Property<T> { Property::new(self, value) }

    pub fn named_property<T: PropertyValue>(&self, name: impl Into<PropertyName>, value: T) -> Property<T> { Property::named(self, name, value) }

    pub fn list_property<T: PropertyValue>(&self, items: Vec<T>) -> ListProperty<T> { ListProperty::new(self, items) }

    pub fn bool_property(&self, value: bool) -> BoolProperty { BoolProperty::new(self, value) }

    pub fn nullable_bool_property(&self, value: Option<bool>) -> NullableBoolProperty { NullableBoolProperty::new(self, value) }
}

impl Default for ViewModel {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("ViewModel").field("listeners", &self.listener_count()).finish() }
}

impl WeakViewModel {
    pub fn upgrade(&self) -> Option<ViewModel> { self.0.upgrade().map(ViewModel) }

    /// Route a single change to the view model, if it is still alive
    pub(crate) fn notify(&self, change: Change) {
        match self.0.upgrade() {
            Some(inner) => inner.notify_changes(change.into()),
            None => trace!(?change, "view model dropped, discarding change"),
        }
    }
}

impl std::fmt::Debug for WeakViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_tuple("WeakViewModel").field(&(self.0.strong_count() > 0)).finish() }
}

impl Inner {
    fn add_listener(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().expect("listeners lock is poisoned").insert(id, listener);
        debug!(%id, "listener added");
        id
    }

    pub(crate) fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.write().expect("listeners lock is poisoned").remove(&id).is_some();
        debug!(%id, removed, "listener removed");
        removed
    }

    fn dispatch(&self) -> MutexGuard<'_, Dispatch> { self.dispatch.lock().expect("dispatch lock is poisoned") }

    fn notify_changes(&self, changes: ChangeSet) {
        if changes.is_empty() {
            return;
        }

        let thread = std::thread::current().id();
        {
            let mut dispatch = self.dispatch();
            if let Some(scope) = dispatch.scopes.get_mut(&thread) {
                scope.pending.append(changes);
                return;
            }
            if dispatch.delivering == Some(thread) {
                dispatch.queue.push_back(changes);
                trace!(queued = dispatch.queue.len(), "re-entrant notification, batch queued");
                return;
            }
        }

        // A listener panic poisons this lock; the guard below has already reset the dispatch state
        let _serialized = self.delivery.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        {
            let mut dispatch = self.dispatch();
            dispatch.delivering = Some(thread);
            dispatch.queue.push_back(changes);
        }

        let mut delivery = Delivery { inner: self, drained: false };
        while let Some(changes) = self.next_queued() {
            self.deliver(&changes);
        }
        delivery.drained = true;
    }

    /// Pop the next queued batch, releasing the delivering thread under the same lock when the queue is empty
    fn next_queued(&self) -> Option<ChangeSet> {
        let mut dispatch = self.dispatch();
        let next = dispatch.queue.pop_front();
        if next.is_none() {
            dispatch.delivering = None;
        }
        next
    }

    fn deliver(&self, changes: &ChangeSet) {
        // Snapshot so listeners can register or unregister without deadlocking
        let listeners: Vec<Listener> = self.listeners.read().expect("listeners lock is poisoned").values().cloned().collect();
        trace!(changes = changes.len(), listeners = listeners.len(), "delivering batch");
        for listener in listeners {
            listener(changes);
        }
    }

    fn end_batch(&self, thread: ThreadId) {
        let pending = {
            let mut dispatch = self.dispatch.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let Some(scope) = dispatch.scopes.get_mut(&thread) else {
                return;
            };
            scope.depth -= 1;
            if scope.depth > 0 {
                return;
            }
            dispatch.scopes.remove(&thread).map(|scope| scope.pending).unwrap_or_default()
        };

        if std::thread::panicking() {
            if !pending.is_empty() {
                warn!(discarded = pending.len(), "batch scope unwound, discarding pending changes");
            }
            return;
        }
        debug!(changes = pending.len(), "flushing batch");
        self.notify_changes(pending);
    }
}

/// Releases the delivering thread if a listener unwinds out of delivery.
///
/// Declared after the serializing lock guard so it runs while that lock is still held.
struct Delivery<'a> {
    inner: &'a Inner,
    drained: bool,
}

impl Drop for Delivery<'_> {
    fn drop(&mut self) {
        if self.drained {
            return;
        }
        let mut dispatch = self.inner.dispatch.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        dispatch.delivering = None;
        let discarded = dispatch.queue.len();
        dispatch.queue.clear();
        warn!(discarded, "listener panicked during delivery, discarding queued batches");
    }
}

/// Keeps a batch scope open until dropped. See [`ViewModel::begin_batch`].
#[must_use = "the batch scope closes as soon as the guard is dropped"]
pub struct BatchGuard {
    inner: Arc<Inner>,
    thread: ThreadId,
}

impl Drop for BatchGuard {
    fn drop(&mut self) { self.inner.end_batch(self.thread) }
}
