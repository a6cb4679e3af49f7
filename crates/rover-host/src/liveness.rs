use std::cell::Cell;
use std::rc::Rc;

/// Mount status of the component that owns a host handle.
///
/// Clones share state. Once unmounted a token never becomes live again.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    live: Rc<Cell<bool>>,
}

impl LivenessToken {
    pub fn new() -> Self {
        Self {
            live: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Mark the owning view as torn down
    pub fn unmount(&self) {
        self.live.set(false);
    }
}

impl Default for LivenessToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap `callback` so it is dropped instead of invoked once `token` is stale
pub fn mount_safe<T: 'static>(
    token: &LivenessToken,
    callback: impl FnOnce(T) + 'static,
) -> Box<dyn FnOnce(T)> {
    let token = token.clone();
    Box::new(move |value| {
        if token.is_live() {
            callback(value);
        } else {
            tracing::trace!("Dropping callback for unmounted view");
        }
    })
}

/// `mount_safe` for callbacks without arguments
pub fn mount_safe_unit(
    token: &LivenessToken,
    callback: impl FnOnce() + 'static,
) -> Box<dyn FnOnce()> {
    let token = token.clone();
    Box::new(move || {
        if token.is_live() {
            callback();
        } else {
            tracing::trace!("Dropping callback for unmounted view");
        }
    })
}
