//! Host page-fetch seam.

use std::future::Future;

use lexlist_model::{FetchError, PageRequest};
use serde_json::Value;

/// Performs the network call for one page.
///
/// Implemented for any `Fn(&PageRequest) -> impl Future`, so hosts can pass
/// a closure. The request is borrowed only for the call; clone what the
/// future needs.
pub trait PageFetcher {
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<Value, FetchError>>;
}

impl<F, Fut> PageFetcher for F
where
    F: Fn(&PageRequest) -> Fut,
    Fut: Future<Output = Result<Value, FetchError>>,
{
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<Value, FetchError>> {
        self(request)
    }
}
