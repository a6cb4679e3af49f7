use crate::bridge::{FocusTracker, ViewManager};
use crate::config::HostConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::handle::HostHandle;
use crate::liveness::LivenessToken;
use crate::payload::{AttributePayload, PayloadBuilder};
use crate::tag::ViewTag;
use crate::view_config::ViewConfig;
use std::fmt;
use std::rc::Rc;

/// Capabilities injected into every host handle
#[derive(Clone)]
pub struct HostContext {
    view_manager: Rc<dyn ViewManager>,
    focus_tracker: Rc<dyn FocusTracker>,
    payload_builder: Rc<dyn PayloadBuilder>,
    diagnostics: Rc<dyn DiagnosticSink>,
    dev_mode: bool,
}

impl HostContext {
    pub fn new(view_manager: Rc<dyn ViewManager>, focus_tracker: Rc<dyn FocusTracker>) -> Self {
        Self {
            view_manager,
            focus_tracker,
            payload_builder: Rc::new(AttributePayload),
            diagnostics: Rc::new(TracingSink),
            dev_mode: HostConfig::default().dev_mode,
        }
    }

    pub fn with_payload_builder(mut self, payload_builder: Rc<dyn PayloadBuilder>) -> Self {
        self.payload_builder = payload_builder;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_config(mut self, config: &HostConfig) -> Self {
        self.dev_mode = config.dev_mode;
        self
    }

    /// Create the handle for a freshly mounted native view
    pub fn create_handle(&self, tag: ViewTag, view_config: Rc<ViewConfig>) -> HostHandle {
        HostHandle::new(tag, view_config, self.clone())
    }

    /// Create a handle whose callbacks follow the owning component's `liveness`
    pub fn create_handle_with_liveness(
        &self,
        tag: ViewTag,
        view_config: Rc<ViewConfig>,
        liveness: &LivenessToken,
    ) -> HostHandle {
        HostHandle::with_liveness(tag, view_config, self.clone(), liveness.clone())
    }

    pub fn view_manager(&self) -> &dyn ViewManager {
        self.view_manager.as_ref()
    }

    pub fn focus_tracker(&self) -> &dyn FocusTracker {
        self.focus_tracker.as_ref()
    }

    pub fn payload_builder(&self) -> &dyn PayloadBuilder {
        self.payload_builder.as_ref()
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Development-only warning; dropped in production
    pub(crate) fn warn(&self, message: &str) {
        if self.dev_mode {
            self.diagnostics.warn(message);
        }
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("dev_mode", &self.dev_mode)
            .finish_non_exhaustive()
    }
}
