//! Driving route planning.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RouteError;
use crate::geo::{GeoPoint, GeoRegion};

/// Transport mode of a directions query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Driving directions.
    Automobile,
}

/// Line geometry of a route drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePolyline {
    /// Vertices ordered from source to destination.
    pub points: Vec<GeoPoint>,
}

impl RoutePolyline {
    /// Creates a polyline from its vertices.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

/// One route option returned by the directions provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    /// Geometry of this option.
    pub polyline: RoutePolyline,
}

/// External directions service.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Requests route candidates between two points.
    async fn route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        mode: TransportMode,
    ) -> Result<Vec<RouteCandidate>, RouteError>;
}

/// A planned route ready to be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Geometry to draw as the overlay.
    pub polyline: RoutePolyline,
    /// Viewport region that fits the whole route.
    pub bounding_region: GeoRegion,
}

/// Plans driving routes, discarding results of superseded requests.
pub struct RouteOverlayPlanner {
    provider: Arc<dyn DirectionsProvider>,
    generation: AtomicU64,
}

impl RouteOverlayPlanner {
    /// Creates a planner over the given directions provider.
    pub fn new(provider: Arc<dyn DirectionsProvider>) -> Self {
        Self {
            provider,
            generation: AtomicU64::new(0),
        }
    }

    /// Requests a driving route and returns the first candidate together
    /// with its bounding region.
    ///
    /// Issuing another `plan_route` while one is in flight invalidates the
    /// earlier call: its completion resolves to [`RouteError::Superseded`],
    /// so an older route can never overwrite a newer one on the map.
    pub async fn plan_route(&self, from: GeoPoint, to: GeoPoint) -> Result<RoutePlan, RouteError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::trace!("planning route {from:?} -> {to:?}");

        let result = self
            .provider
            .route(from, to, TransportMode::Automobile)
            .await;
        if self.generation.load(Ordering::SeqCst) != generation {
            log::trace!("route {from:?} -> {to:?} superseded, dropping result");
            return Err(RouteError::Superseded);
        }

        let candidates = result?;
        let first = candidates.into_iter().next().ok_or(RouteError::NoRouteFound)?;
        let bounding_region =
            GeoRegion::bounding(&first.polyline.points).ok_or(RouteError::NoRouteFound)?;

        Ok(RoutePlan {
            polyline: first.polyline,
            bounding_region,
        })
    }
}
