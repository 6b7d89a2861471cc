//! Storage for the most recently fetched request list.

use crate::annotation::RequestRecord;

/// Holds the latest fetched relief requests.
///
/// The whole list is replaced on every successful refresh; partial updates
/// are not supported. A failed refresh leaves the previous contents intact.
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: Vec<RequestRecord>,
}

impl RequestStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored list with the result of a refresh.
    pub fn replace(&mut self, requests: Vec<RequestRecord>) {
        self.requests = requests;
    }

    /// Currently stored requests.
    pub fn requests(&self) -> &[RequestRecord] {
        &self.requests
    }

    /// Number of stored requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the store holds no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
