//! Request ID minting.
//!
//! Every request without an incoming `x-request-id` gets a fresh snowflake
//! id, so log lines and stored records share one id space.

use std::sync::Arc;

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

use crate::service::SharedGenerator;

/// [`MakeRequestId`] backed by the shared generator.
#[derive(Clone)]
pub struct SnowflakeRequestId {
    generator: Arc<SharedGenerator>,
}

impl SnowflakeRequestId {
    /// Mint request ids from `generator`.
    pub const fn new(generator: Arc<SharedGenerator>) -> Self {
        Self { generator }
    }
}

impl MakeRequestId for SnowflakeRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        // A regressed clock leaves the request untagged rather than failing it.
        let id = self.generator.next_id().ok()?;
        Some(RequestId::new(HeaderValue::from(id.as_i64())))
    }
}
