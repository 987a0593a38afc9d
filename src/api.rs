//! Typed API endpoints
//!
//! Thin, family-scoped wrappers over [`ClientHandle`](crate::client::ClientHandle). Each call
//! returns the decoded payload together with the body it came from, so raw output can echo
//! the server bytes unchanged.

pub mod cloud;
pub mod fastedge;

pub use cloud::CloudApi;
pub use fastedge::FastEdgeApi;
