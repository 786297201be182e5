//! Typed endpoint wrappers.
//!
//! Thin request libraries over the pipeline: each method knows its endpoint's
//! path, request body, and the status that means "found". Statuses outside
//! that contract resolve to `Ok(None)`; auth and scope failures surface from
//! the pipeline according to the access context's policy.

mod minecraft;
mod network;

pub use minecraft::MinecraftApi;
pub use network::NetworkApi;
