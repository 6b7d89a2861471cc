//! Error types of the crate.

use thiserror::Error;

/// Error that can occur when acquiring the device position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Location services are switched off at the platform level.
    #[error("location services are disabled")]
    ServicesDisabled,
    /// The user denied every requested authorization scope.
    #[error("location permission denied")]
    PermissionDenied,
}

/// Error that can occur when fetching the resource request list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Could not reach the remote server.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// The server responded with an error.
    #[error("server error: {0}")]
    ServerError(String),
    /// The response could not be decoded into request records.
    #[error("failed to decode response: {0}")]
    DecodeError(String),
}

/// Error that can occur when planning a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The directions provider returned no route candidates.
    #[error("no route found")]
    NoRouteFound,
    /// The directions provider failed.
    #[error("directions provider error: {0}")]
    ProviderError(String),
    /// A newer route request was issued while this one was in flight.
    /// The result must be discarded, not displayed.
    #[error("route request superseded by a newer one")]
    Superseded,
}
