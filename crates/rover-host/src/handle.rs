use crate::bridge::{LayoutMeasurement, Measurement, WindowMeasurement};
use crate::context::HostContext;
use crate::diagnostics::{MEASURE_LAYOUT_TARGET_WARNING, warn_for_style_props};
use crate::liveness::{LivenessToken, mount_safe, mount_safe_unit};
use crate::tag::ViewTag;
use crate::value::PropMap;
use crate::view_config::ViewConfig;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Child slot kept for the renderer's bookkeeping
#[derive(Debug, Clone)]
pub enum HostChild {
    Instance(Rc<HostHandle>),
    /// Raw text instance, known only by its tag
    Text(ViewTag),
}

impl HostChild {
    pub fn tag(&self) -> ViewTag {
        match self {
            HostChild::Instance(handle) => handle.tag(),
            HostChild::Text(tag) => *tag,
        }
    }
}

/// View that `measure_layout` reports relative to
#[derive(Debug, Clone, Copy)]
pub enum RelativeTarget<'a> {
    Tag(ViewTag),
    Handle(&'a HostHandle),
}

impl RelativeTarget<'_> {
    /// Raw tags are used verbatim; handles must carry a set tag
    pub fn resolve(&self) -> Option<ViewTag> {
        match *self {
            RelativeTarget::Tag(tag) => Some(tag),
            RelativeTarget::Handle(handle) => Some(handle.tag()).filter(|tag| tag.is_set()),
        }
    }
}

impl From<ViewTag> for RelativeTarget<'_> {
    fn from(tag: ViewTag) -> Self {
        RelativeTarget::Tag(tag)
    }
}

impl From<u32> for RelativeTarget<'_> {
    fn from(tag: u32) -> Self {
        RelativeTarget::Tag(ViewTag(tag))
    }
}

impl<'a> From<&'a HostHandle> for RelativeTarget<'a> {
    fn from(handle: &'a HostHandle) -> Self {
        RelativeTarget::Handle(handle)
    }
}

/// Imperative proxy for one mounted native view.
///
/// Created by the renderer at mount time. The renderer calls
/// `liveness().unmount()` at teardown; from then on any measurement callback
/// still in flight is dropped instead of delivered.
pub struct HostHandle {
    tag: ViewTag,
    view_config: Rc<ViewConfig>,
    children: SmallVec<[HostChild; 4]>,
    liveness: LivenessToken,
    context: HostContext,
}

impl HostHandle {
    pub fn new(tag: ViewTag, view_config: Rc<ViewConfig>, context: HostContext) -> Self {
        Self::with_liveness(tag, view_config, context, LivenessToken::new())
    }

    /// Create a handle tied to the owning component's mount status.
    /// Unmounting `liveness` silences every handle created with it.
    pub fn with_liveness(
        tag: ViewTag,
        view_config: Rc<ViewConfig>,
        context: HostContext,
        liveness: LivenessToken,
    ) -> Self {
        Self {
            tag,
            view_config,
            children: SmallVec::new(),
            liveness,
            context,
        }
    }

    pub fn tag(&self) -> ViewTag {
        self.tag
    }

    pub fn view_config(&self) -> &Rc<ViewConfig> {
        &self.view_config
    }

    pub fn liveness(&self) -> &LivenessToken {
        &self.liveness
    }

    pub fn children(&self) -> &[HostChild] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut SmallVec<[HostChild; 4]> {
        &mut self.children
    }

    pub fn focus(&self) {
        self.context.focus_tracker().focus_text_input(self.tag);
    }

    pub fn blur(&self) {
        self.context.focus_tracker().blur_text_input(self.tag);
    }

    pub fn measure(&self, callback: impl FnOnce(Measurement) + 'static) {
        debug!("measure view {}", self.tag);
        self.context
            .view_manager()
            .measure(self.tag, mount_safe(&self.liveness, callback));
    }

    pub fn measure_in_window(&self, callback: impl FnOnce(WindowMeasurement) + 'static) {
        debug!("measure_in_window view {}", self.tag);
        self.context
            .view_manager()
            .measure_in_window(self.tag, mount_safe(&self.liveness, callback));
    }

    /// Measure this view relative to `relative_to`.
    ///
    /// A handle without a tag is a caller error: it only produces a
    /// development warning and no native call is made.
    pub fn measure_layout<'a>(
        &self,
        relative_to: impl Into<RelativeTarget<'a>>,
        on_success: impl FnOnce(LayoutMeasurement) + 'static,
        on_fail: Option<Box<dyn FnOnce()>>,
    ) {
        let Some(relative) = relative_to.into().resolve() else {
            self.context.warn(MEASURE_LAYOUT_TARGET_WARNING);
            return;
        };

        debug!("measure_layout view {} relative to {}", self.tag, relative);
        let on_fail: Box<dyn FnOnce()> = match on_fail {
            Some(on_fail) => on_fail,
            None => Box::new(|| {}),
        };
        self.context.view_manager().measure_layout(
            self.tag,
            relative,
            mount_safe_unit(&self.liveness, on_fail),
            mount_safe(&self.liveness, on_success),
        );
    }

    /// Push `props` straight to the native view, skipping the render pipeline.
    /// Nothing is sent when the payload builder reports no change.
    pub fn set_native_props(&self, props: &PropMap) {
        let valid_attributes = self.view_config.valid_attributes();

        if self.context.is_dev_mode() {
            for warning in warn_for_style_props(props, valid_attributes) {
                self.context.warn(&warning);
            }
        }

        let Some(payload) = self.context.payload_builder().create(props, valid_attributes) else {
            return;
        };

        debug!(
            "update_view {} ({}) with {} attributes",
            self.tag,
            self.view_config.native_class_name(),
            payload.len()
        );
        self.context.view_manager().update_view(
            self.tag,
            self.view_config.native_class_name(),
            payload,
        );
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandle")
            .field("tag", &self.tag)
            .field("native_class_name", &self.view_config.native_class_name())
            .field("children", &self.children.len())
            .field("live", &self.liveness.is_live())
            .finish()
    }
}
