//! Map-annotation synchronization for a disaster-relief resource map.
//!
//! This crate keeps a map widget's visible marker set in sync with a mutable
//! list of relief resource requests, manages a single one-shot "my location"
//! marker, and plans a driving route overlay between two points. The map
//! widget itself, the remote fetch client, the directions provider and the
//! platform location service are external collaborators injected through the
//! traits in [`map`], [`controller`], [`location`] and [`route`].
//!
//! The core of the crate is [`annotation::reconcile`]: a pure function that
//! computes the minimal add/remove operations moving the currently displayed
//! annotation set to the desired one. [`controller::ScreenController`] wires
//! it to the collaborators and funnels every map mutation through a single
//! UI-context boundary ([`map::UiDispatcher`]).

pub mod annotation;
pub mod controller;
pub mod error;
pub mod geo;
pub mod location;
pub mod map;
pub mod route;
pub mod store;

pub use annotation::{reconcile, Annotation, AnnotationDiff, RequestRecord};
pub use controller::{ScreenController, ScreenControllerBuilder, ScreenState};
pub use error::{FetchError, LocationError, RouteError};
pub use geo::{GeoPoint, GeoRegion, GeoSpan};
