use std::sync::{Arc, Weak};

use crate::event::ChangeSet;
use crate::view_model::Inner;

/// Identifies one registration with a [`ViewModel`](crate::ViewModel).
///
/// Ids increase monotonically, so ordering ids gives registration order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) usize);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A callback receiving each batch of changes
pub type Listener = Arc<dyn Fn(&ChangeSet) + Send + Sync + 'static>;

/// Trait for types that can be registered as change listeners
pub trait IntoListener {
    fn into_listener(self) -> Listener;
}

impl<F> IntoListener for F
where F: Fn(&ChangeSet) + Send + Sync + 'static
{
    fn into_listener(self) -> Listener { Arc::new(self) }
}

impl IntoListener for Listener {
    fn into_listener(self) -> Listener { self }
}

impl IntoListener for std::sync::mpsc::Sender<ChangeSet> {
    fn into_listener(self) -> Listener {
        Arc::new(move |changes: &ChangeSet| {
            // receiver may have hung up
            let _ = self.send(changes.clone());
        })
    }
}

#[cfg(feature = "tokio")]
impl IntoListener for tokio::sync::mpsc::UnboundedSender<ChangeSet> {
    fn into_listener(self) -> Listener {
        Arc::new(move |changes: &ChangeSet| {
            let _ = self.send(changes.clone());
        })
    }
}

/// Unregisters its listener when dropped.
///
/// The guard does not keep the view model alive.
#[must_use = "the listener is removed as soon as the guard is dropped"]
pub struct ListenerGuard {
    pub(crate) inner: Weak<Inner>,
    pub(crate) id: ListenerId,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId { self.id }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.remove_listener(self.id);
        }
    }
}
