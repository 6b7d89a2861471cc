//! Map surface and UI-context boundaries.

use crate::annotation::Annotation;
use crate::geo::GeoRegion;
use crate::route::RoutePolyline;

/// The map widget as seen by the controller.
///
/// Tile drawing, gestures and marker rendering belong to the widget;
/// the controller only issues set mutations against it.
pub trait MapSurface: Send {
    /// Adds the given annotations to the visible set.
    fn add_annotations(&mut self, annotations: &[Annotation]);

    /// Removes the given annotations from the visible set.
    fn remove_annotations(&mut self, annotations: &[Annotation]);

    /// Moves the viewport to the given region.
    fn set_region(&mut self, region: GeoRegion, animated: bool);

    /// Draws a route polyline above the base layer.
    fn add_overlay(&mut self, polyline: &RoutePolyline);

    /// Removes a previously added route polyline.
    fn remove_overlay(&mut self, polyline: &RoutePolyline);
}

/// Schedules work onto the UI execution context.
///
/// Location fixes and fetch completions arrive on background contexts.
/// Every map-surface mutation the controller performs is funneled through
/// one dispatcher call, so no completion callback can touch the surface
/// from the wrong context.
pub trait UiDispatcher: Send + Sync {
    /// Runs `task` on the UI context. Tasks run in submission order.
    fn dispatch(&self, task: Box<dyn FnOnce() + Send>);
}

/// Dispatcher that runs tasks inline on the calling context.
///
/// For single-threaded hosts and tests, where the calling context already
/// is the UI context.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl UiDispatcher for InlineDispatcher {
    fn dispatch(&self, task: Box<dyn FnOnce() + Send>) {
        task();
    }
}
