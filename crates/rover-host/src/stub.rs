use crate::bridge::{
    FailureCallback, FocusTracker, LayoutMeasurement, Measurement, MeasureCallback,
    MeasureInWindowCallback, MeasureLayoutCallback, ViewManager, WindowMeasurement,
};
use crate::diagnostics::DiagnosticSink;
use crate::payload::{AttributePayload, PayloadBuilder, UpdatePayload};
use crate::tag::ViewTag;
use crate::value::{PropMap, PropValue};
use crate::view_config::AttributeMap;
use smartstring::alias::String as SmartString;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Native call recorded by `StubViewManager`
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    Measure {
        tag: ViewTag,
    },
    MeasureInWindow {
        tag: ViewTag,
    },
    MeasureLayout {
        tag: ViewTag,
        relative_to: ViewTag,
    },
    UpdateView {
        tag: ViewTag,
        native_class_name: String,
        payload: UpdatePayload,
    },
}

enum PendingCallback {
    Measure(ViewTag, MeasureCallback),
    MeasureInWindow(ViewTag, MeasureInWindowCallback),
    MeasureLayout(ViewTag, FailureCallback, MeasureLayoutCallback),
}

impl PendingCallback {
    fn tag(&self) -> ViewTag {
        match self {
            PendingCallback::Measure(tag, _)
            | PendingCallback::MeasureInWindow(tag, _)
            | PendingCallback::MeasureLayout(tag, _, _) => *tag,
        }
    }
}

/// View manager that records calls and holds measurement callbacks until the
/// test completes them, in whatever order it chooses.
#[derive(Default)]
pub struct StubViewManager {
    calls: RefCell<Vec<NativeCall>>,
    pending: RefCell<Vec<PendingCallback>>,
}

impl StubViewManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<NativeCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn update_calls(&self) -> Vec<NativeCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, NativeCall::UpdateView { .. }))
            .cloned()
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    fn take_pending(&self, matches: impl Fn(&PendingCallback) -> bool) -> Option<PendingCallback> {
        let mut pending = self.pending.borrow_mut();
        let index = pending.iter().position(matches)?;
        Some(pending.remove(index))
    }

    /// Deliver the oldest outstanding `measure` for `tag`
    pub fn complete_measure(&self, tag: ViewTag, measurement: Measurement) -> bool {
        match self.take_pending(|p| matches!(p, PendingCallback::Measure(..)) && p.tag() == tag) {
            Some(PendingCallback::Measure(_, callback)) => {
                callback(measurement);
                true
            }
            _ => false,
        }
    }

    pub fn complete_measure_in_window(&self, tag: ViewTag, measurement: WindowMeasurement) -> bool {
        match self.take_pending(|p| {
            matches!(p, PendingCallback::MeasureInWindow(..)) && p.tag() == tag
        }) {
            Some(PendingCallback::MeasureInWindow(_, callback)) => {
                callback(measurement);
                true
            }
            _ => false,
        }
    }

    pub fn complete_measure_layout(&self, tag: ViewTag, measurement: LayoutMeasurement) -> bool {
        match self.take_pending(|p| {
            matches!(p, PendingCallback::MeasureLayout(..)) && p.tag() == tag
        }) {
            Some(PendingCallback::MeasureLayout(_, _, on_success)) => {
                on_success(measurement);
                true
            }
            _ => false,
        }
    }

    pub fn fail_measure_layout(&self, tag: ViewTag) -> bool {
        match self.take_pending(|p| {
            matches!(p, PendingCallback::MeasureLayout(..)) && p.tag() == tag
        }) {
            Some(PendingCallback::MeasureLayout(_, on_fail, _)) => {
                on_fail();
                true
            }
            _ => false,
        }
    }
}

impl ViewManager for StubViewManager {
    fn measure(&self, tag: ViewTag, callback: MeasureCallback) {
        self.calls.borrow_mut().push(NativeCall::Measure { tag });
        self.pending
            .borrow_mut()
            .push(PendingCallback::Measure(tag, callback));
    }

    fn measure_in_window(&self, tag: ViewTag, callback: MeasureInWindowCallback) {
        self.calls
            .borrow_mut()
            .push(NativeCall::MeasureInWindow { tag });
        self.pending
            .borrow_mut()
            .push(PendingCallback::MeasureInWindow(tag, callback));
    }

    fn measure_layout(
        &self,
        tag: ViewTag,
        relative_to: ViewTag,
        on_fail: FailureCallback,
        on_success: MeasureLayoutCallback,
    ) {
        self.calls
            .borrow_mut()
            .push(NativeCall::MeasureLayout { tag, relative_to });
        self.pending
            .borrow_mut()
            .push(PendingCallback::MeasureLayout(tag, on_fail, on_success));
    }

    fn update_view(&self, tag: ViewTag, native_class_name: &str, payload: UpdatePayload) {
        self.calls.borrow_mut().push(NativeCall::UpdateView {
            tag,
            native_class_name: native_class_name.to_string(),
            payload,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusCall {
    Focus(ViewTag),
    Blur(ViewTag),
}

#[derive(Debug, Default)]
pub struct StubFocusTracker {
    calls: RefCell<Vec<FocusCall>>,
}

impl StubFocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<FocusCall> {
        self.calls.borrow().clone()
    }
}

impl FocusTracker for StubFocusTracker {
    fn focus_text_input(&self, tag: ViewTag) {
        self.calls.borrow_mut().push(FocusCall::Focus(tag));
    }

    fn blur_text_input(&self, tag: ViewTag) {
        self.calls.borrow_mut().push(FocusCall::Blur(tag));
    }
}

/// Diagnostic sink that keeps every warning
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: RefCell<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Payload builder that remembers what it already emitted for a single view
/// and reports "no change" for values the view already has.
#[derive(Debug, Default)]
pub struct RetainedPayloadBuilder {
    applied: RefCell<BTreeMap<SmartString, PropValue>>,
    invocations: Cell<usize>,
}

impl RetainedPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> usize {
        self.invocations.get()
    }
}

impl PayloadBuilder for RetainedPayloadBuilder {
    fn create(&self, props: &PropMap, valid_attributes: &AttributeMap) -> Option<UpdatePayload> {
        self.invocations.set(self.invocations.get() + 1);
        let candidate = AttributePayload.create(props, valid_attributes)?;

        let mut applied = self.applied.borrow_mut();
        let mut payload = UpdatePayload::default();
        for (name, value) in candidate {
            if applied.get(&name).is_some_and(|prev| prev.eq_value(&value)) {
                continue;
            }
            applied.insert(name.clone(), value.clone());
            payload.insert(name, value);
        }

        (!payload.is_empty()).then_some(payload)
    }
}
