use crate::payload::UpdatePayload;
use crate::tag::ViewTag;
use serde::Serialize;

/// On-screen geometry reported by `measure`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Measurement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page_x: f64,
    pub page_y: f64,
}

/// Window-relative geometry reported by `measure_in_window`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WindowMeasurement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Geometry relative to another view, reported by `measure_layout`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LayoutMeasurement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

pub type MeasureCallback = Box<dyn FnOnce(Measurement)>;
pub type MeasureInWindowCallback = Box<dyn FnOnce(WindowMeasurement)>;
pub type MeasureLayoutCallback = Box<dyn FnOnce(LayoutMeasurement)>;
pub type FailureCallback = Box<dyn FnOnce()>;

/// Native view-management service.
///
/// Measurement callbacks are single shot and delivered asynchronously by the
/// native side, in any order, possibly never.
pub trait ViewManager {
    fn measure(&self, tag: ViewTag, callback: MeasureCallback);

    fn measure_in_window(&self, tag: ViewTag, callback: MeasureInWindowCallback);

    /// Note the native argument order: failure callback first.
    fn measure_layout(
        &self,
        tag: ViewTag,
        relative_to: ViewTag,
        on_fail: FailureCallback,
        on_success: MeasureLayoutCallback,
    );

    fn update_view(&self, tag: ViewTag, native_class_name: &str, payload: UpdatePayload);
}

/// Text input focus tracking
pub trait FocusTracker {
    fn focus_text_input(&self, tag: ViewTag);

    fn blur_text_input(&self, tag: ViewTag);
}
