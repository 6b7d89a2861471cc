//! Screen orchestration: fetch, location, reconciliation, route display.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::annotation::{reconcile, Annotation, AnnotationDiff, RequestRecord};
use crate::error::{FetchError, RouteError};
use crate::geo::{GeoPoint, GeoRegion};
use crate::location::{LocationService, LocationTracker};
use crate::map::{InlineDispatcher, MapSurface, UiDispatcher};
use crate::route::{DirectionsProvider, RouteOverlayPlanner, RoutePolyline};
use crate::store::RequestStore;

/// Span used when recentering on a single point, in degrees.
const RECENTER_DELTA: f64 = 0.02;

/// Remote source of relief requests.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Fetches the current full list of resource requests.
    async fn fetch_resource_requests(&self) -> Result<Vec<RequestRecord>, FetchError>;
}

/// Blocking progress indicator shown while a fetch is in flight.
pub trait ProgressIndicator: Send + Sync {
    /// Shows the indicator.
    fn show(&self);
    /// Hides the indicator.
    fn hide(&self);
}

/// Non-blocking user notification for recoverable errors.
pub trait Notifier: Send + Sync {
    /// Presents `message` without blocking input.
    fn notify(&self, message: &str);
}

/// Pushes sibling screens on explicit user action.
pub trait Navigator: Send + Sync {
    /// Opens the list view of the same requests.
    fn push_list_screen(&self);
}

// Hosts typically hold these collaborators behind `Arc` so they can keep a
// handle for themselves after handing one to the builder.
impl<T: ProgressIndicator + ?Sized> ProgressIndicator for Arc<T> {
    fn show(&self) {
        (**self).show();
    }

    fn hide(&self) {
        (**self).hide();
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn push_list_screen(&self) {
        (**self).push_list_screen();
    }
}

/// Lifecycle state of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Not yet activated.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch has completed, successfully or not.
    Ready,
}

/// State mutated exclusively on the UI context.
struct SurfaceState {
    map: Box<dyn MapSurface>,
    store: RequestStore,
    visible: Vec<Annotation>,
    route_overlay: Option<RoutePolyline>,
    location_marker_placed: bool,
    screen_state: ScreenState,
}

impl SurfaceState {
    fn apply_diff(&mut self, diff: AnnotationDiff) {
        if diff.is_empty() {
            return;
        }
        self.map.remove_annotations(&diff.to_remove);
        self.map.add_annotations(&diff.to_add);
        self.visible.retain(|a| !diff.to_remove.contains(a));
        self.visible.extend(diff.to_add);
    }
}

/// Wires the map surface to the fetch, location and directions
/// collaborators.
///
/// All collaborators are injected at construction through
/// [`ScreenControllerBuilder`]; there are no globals. The controller is the
/// single writer of the request store and the visible annotation set, and
/// every mutation of either goes through the UI dispatcher.
pub struct ScreenController {
    ui: Arc<dyn UiDispatcher>,
    fetch_client: Arc<dyn FetchClient>,
    tracker: LocationTracker,
    planner: RouteOverlayPlanner,
    progress: Arc<dyn ProgressIndicator>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
    surface: Arc<Mutex<SurfaceState>>,
}

impl ScreenController {
    /// Activates the screen: acquires the device position and fetches the
    /// request list concurrently.
    ///
    /// The progress indicator wraps the fetch only; location acquisition
    /// runs without one.
    pub async fn activate(&self) {
        tokio::join!(self.acquire_location(), self.run_fetch());
    }

    /// Re-runs the request fetch. Does not re-request the device position.
    pub async fn refresh(&self) {
        self.run_fetch().await;
    }

    /// Plans and displays a driving route.
    ///
    /// On success the previous route overlay, if any, is removed before the
    /// new one is added and the viewport is fitted to the new route. On
    /// failure the map is left unchanged and the error is surfaced through
    /// the notifier. A superseded result is dropped silently.
    pub async fn show_route(&self, from: GeoPoint, to: GeoPoint) {
        match self.planner.plan_route(from, to).await {
            Ok(plan) => self.on_ui(move |state| {
                if let Some(previous) = state.route_overlay.take() {
                    state.map.remove_overlay(&previous);
                }
                state.map.add_overlay(&plan.polyline);
                state.map.set_region(plan.bounding_region, true);
                state.route_overlay = Some(plan.polyline);
            }),
            Err(RouteError::Superseded) => {}
            Err(err) => self.notifier.notify(&err.to_string()),
        }
    }

    /// Places a pin for an address picked in the search typeahead and
    /// recenters on it.
    pub fn on_address_selected(
        &self,
        coordinate: GeoPoint,
        title: Option<String>,
        subtitle: Option<String>,
    ) {
        self.on_ui(move |state| {
            let pin = Annotation::Address {
                coordinate,
                title,
                subtitle,
            };
            state.map.add_annotations(std::slice::from_ref(&pin));
            state
                .map
                .set_region(GeoRegion::centered(pin.coordinate(), RECENTER_DELTA), true);
            state.visible.push(pin);
        });
    }

    /// Hook for a tapped annotation callout.
    ///
    /// Currently does nothing; planning a route to the tapped request is
    /// the intended future use.
    pub fn on_annotation_selected(&self, annotation: &Annotation) {
        log::trace!("annotation selected: {annotation:?}");
    }

    /// Opens the list view of the same requests, if a navigator was
    /// provided.
    pub fn show_list_screen(&self) {
        if let Some(navigator) = &self.navigator {
            navigator.push_list_screen();
        }
    }

    /// Current lifecycle state.
    pub fn screen_state(&self) -> ScreenState {
        self.surface.lock().screen_state
    }

    /// Snapshot of the currently stored requests.
    pub fn requests(&self) -> Vec<RequestRecord> {
        self.surface.lock().store.requests().to_vec()
    }

    /// Snapshot of the annotations currently on the map.
    pub fn visible_annotations(&self) -> Vec<Annotation> {
        self.surface.lock().visible.clone()
    }

    async fn run_fetch(&self) {
        self.on_ui(|state| state.screen_state = ScreenState::Loading);
        self.progress.show();
        let result = self.fetch_client.fetch_resource_requests().await;
        self.progress.hide();

        match result {
            Ok(requests) => {
                log::info!("fetched {} resource requests", requests.len());
                self.on_ui(move |state| {
                    state.store.replace(requests);
                    let diff = reconcile(&state.visible, state.store.requests());
                    state.apply_diff(diff);
                    state.screen_state = ScreenState::Ready;
                });
            }
            Err(err) => {
                // Prior contents stay on the map; a later refresh recovers.
                log::warn!("request fetch failed: {err}");
                self.notifier.notify(&err.to_string());
                self.on_ui(|state| state.screen_state = ScreenState::Ready);
            }
        }
    }

    async fn acquire_location(&self) {
        match self.tracker.acquire().await {
            Ok(fix) => self.on_ui(move |state| {
                if state.location_marker_placed {
                    return;
                }
                state.location_marker_placed = true;
                let marker = Annotation::CurrentLocation(fix);
                state.map.add_annotations(std::slice::from_ref(&marker));
                state
                    .map
                    .set_region(GeoRegion::centered(marker.coordinate(), RECENTER_DELTA), true);
                state.visible.push(marker);
            }),
            Err(err) => self.notifier.notify(&err.to_string()),
        }
    }

    /// The single boundary through which the surface state is mutated.
    fn on_ui(&self, task: impl FnOnce(&mut SurfaceState) + Send + 'static) {
        let surface = Arc::clone(&self.surface);
        self.ui.dispatch(Box::new(move || {
            let mut state = surface.lock();
            task(&mut state);
        }));
    }
}

/// Builder for [`ScreenController`].
pub struct ScreenControllerBuilder {
    map: Box<dyn MapSurface>,
    fetch_client: Arc<dyn FetchClient>,
    location_service: Arc<dyn LocationService>,
    directions: Arc<dyn DirectionsProvider>,
    ui: Arc<dyn UiDispatcher>,
    progress: Arc<dyn ProgressIndicator>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ScreenControllerBuilder {
    /// Creates a builder with the required collaborators.
    ///
    /// Defaults: tasks dispatched inline, no progress indicator, errors
    /// notified to the log only, no navigator.
    pub fn new(
        map: impl MapSurface + 'static,
        fetch_client: impl FetchClient + 'static,
        location_service: impl LocationService + 'static,
        directions: impl DirectionsProvider + 'static,
    ) -> Self {
        Self {
            map: Box::new(map),
            fetch_client: Arc::new(fetch_client),
            location_service: Arc::new(location_service),
            directions: Arc::new(directions),
            ui: Arc::new(InlineDispatcher),
            progress: Arc::new(NoProgress),
            notifier: Arc::new(LogNotifier),
            navigator: None,
        }
    }

    /// Sets the UI-context dispatcher.
    pub fn with_dispatcher(mut self, ui: impl UiDispatcher + 'static) -> Self {
        self.ui = Arc::new(ui);
        self
    }

    /// Sets the progress indicator shown around fetches.
    pub fn with_progress_indicator(mut self, progress: impl ProgressIndicator + 'static) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    /// Sets the error notifier.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Sets the navigator used by [`ScreenController::show_list_screen`].
    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Arc::new(navigator));
        self
    }

    /// Builds the controller in the [`ScreenState::Idle`] state.
    pub fn build(self) -> ScreenController {
        ScreenController {
            ui: self.ui,
            fetch_client: self.fetch_client,
            tracker: LocationTracker::new(self.location_service),
            planner: RouteOverlayPlanner::new(self.directions),
            progress: self.progress,
            notifier: self.notifier,
            navigator: self.navigator,
            surface: Arc::new(Mutex::new(SurfaceState {
                map: self.map,
                store: RequestStore::new(),
                visible: Vec::new(),
                route_overlay: None,
                location_marker_placed: false,
                screen_state: ScreenState::Idle,
            })),
        }
    }
}

struct NoProgress;

impl ProgressIndicator for NoProgress {
    fn show(&self) {}
    fn hide(&self) {}
}

struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::warn!("{message}");
    }
}
