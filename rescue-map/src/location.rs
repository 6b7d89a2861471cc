//! Device location acquisition.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::LocationError;
use crate::geo::GeoPoint;

/// Authorization scope requested from the platform location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationScope {
    /// Permission to read the location at any time.
    Always,
    /// Permission to read the location while the app is in the foreground.
    WhenInUse,
}

/// Outcome of an authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The scope was granted.
    Granted,
    /// The scope was denied.
    Denied,
}

/// A single message from the platform location service.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A resolved position.
    Fix(GeoPoint),
    /// The service failed; no further events will arrive.
    Error(LocationError),
}

/// Platform location service as seen by the tracker.
///
/// `start_updates` hands back the channel the platform delivers fix and
/// error callbacks on; the events may originate on any execution context.
pub trait LocationService: Send + Sync {
    /// Whether location services are enabled at the platform level.
    fn services_enabled(&self) -> bool;

    /// Requests the given authorization scope.
    fn request_authorization(&self, scope: AuthorizationScope) -> AuthorizationStatus;

    /// Starts position updates and returns the event channel.
    fn start_updates(&self) -> mpsc::Receiver<LocationEvent>;

    /// Stops position updates.
    fn stop_updates(&self);
}

/// One-shot position acquisition over a [`LocationService`].
///
/// The tracker stops the underlying subscription after the first event.
/// The screen only needs to know where the user was when it opened, and
/// continuous tracking is not worth the battery cost, so one fix per
/// activation is the intended behavior.
pub struct LocationTracker {
    service: Arc<dyn LocationService>,
}

impl LocationTracker {
    /// Creates a tracker over the given platform service.
    pub fn new(service: Arc<dyn LocationService>) -> Self {
        Self { service }
    }

    /// Requests authorization and resolves the first available fix.
    ///
    /// Both authorization scopes are requested; either one being granted is
    /// sufficient. Errors are terminal for this call, no retry is attempted.
    pub async fn acquire(&self) -> Result<GeoPoint, LocationError> {
        if !self.service.services_enabled() {
            return Err(LocationError::ServicesDisabled);
        }

        let always = self.service.request_authorization(AuthorizationScope::Always);
        let when_in_use = self
            .service
            .request_authorization(AuthorizationScope::WhenInUse);
        if always == AuthorizationStatus::Denied && when_in_use == AuthorizationStatus::Denied {
            return Err(LocationError::PermissionDenied);
        }

        let mut events = self.service.start_updates();
        let result = match events.recv().await {
            Some(LocationEvent::Fix(point)) => Ok(point),
            Some(LocationEvent::Error(err)) => Err(err),
            // Sender dropped without delivering an event.
            None => Err(LocationError::PermissionDenied),
        };
        self.service.stop_updates();

        match &result {
            Ok(fix) => log::trace!("location fix acquired: {fix:?}"),
            Err(err) => log::warn!("location acquisition failed: {err}"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    struct StubService {
        enabled: bool,
        always: AuthorizationStatus,
        when_in_use: AuthorizationStatus,
        events: Mutex<Vec<LocationEvent>>,
        started: AtomicUsize,
        stopped: AtomicUsize,
    }

    impl StubService {
        fn with_events(events: Vec<LocationEvent>) -> Self {
            Self {
                enabled: true,
                always: AuthorizationStatus::Granted,
                when_in_use: AuthorizationStatus::Granted,
                events: Mutex::new(events),
                started: AtomicUsize::new(0),
                stopped: AtomicUsize::new(0),
            }
        }
    }

    impl LocationService for StubService {
        fn services_enabled(&self) -> bool {
            self.enabled
        }

        fn request_authorization(&self, scope: AuthorizationScope) -> AuthorizationStatus {
            match scope {
                AuthorizationScope::Always => self.always,
                AuthorizationScope::WhenInUse => self.when_in_use,
            }
        }

        fn start_updates(&self) -> mpsc::Receiver<LocationEvent> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = mpsc::channel(8);
            for event in self.events.lock().drain(..) {
                tx.try_send(event).expect("channel capacity");
            }
            rx
        }

        fn stop_updates(&self) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn first_fix_wins_and_updates_stop() {
        let first = GeoPoint::latlon(12.9, 77.6);
        let second = GeoPoint::latlon(13.0, 77.7);
        let service = Arc::new(StubService::with_events(vec![
            LocationEvent::Fix(first),
            LocationEvent::Fix(second),
        ]));
        let tracker = LocationTracker::new(service.clone());

        let fix = tracker.acquire().await.expect("fix");

        assert_eq!(fix, first);
        assert_eq!(service.started.load(Ordering::SeqCst), 1);
        assert_eq!(service.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_services_fail_without_starting() {
        let mut stub = StubService::with_events(vec![]);
        stub.enabled = false;
        let service = Arc::new(stub);
        let tracker = LocationTracker::new(service.clone());

        let err = tracker.acquire().await.expect_err("disabled");

        assert_eq!(err, LocationError::ServicesDisabled);
        assert_eq!(service.started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn either_scope_granted_is_enough() {
        let mut stub = StubService::with_events(vec![LocationEvent::Fix(GeoPoint::latlon(
            12.9, 77.6,
        ))]);
        stub.always = AuthorizationStatus::Denied;
        let tracker = LocationTracker::new(Arc::new(stub));

        assert!(tracker.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn both_scopes_denied_fail() {
        let mut stub = StubService::with_events(vec![]);
        stub.always = AuthorizationStatus::Denied;
        stub.when_in_use = AuthorizationStatus::Denied;
        let service = Arc::new(stub);
        let tracker = LocationTracker::new(service.clone());

        let err = tracker.acquire().await.expect_err("denied");

        assert_eq!(err, LocationError::PermissionDenied);
        assert_eq!(service.started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn service_error_is_propagated() {
        let service = Arc::new(StubService::with_events(vec![LocationEvent::Error(
            LocationError::PermissionDenied,
        )]));
        let tracker = LocationTracker::new(service.clone());

        let err = tracker.acquire().await.expect_err("error event");

        assert_eq!(err, LocationError::PermissionDenied);
        assert_eq!(service.stopped.load(Ordering::SeqCst), 1);
    }
}
