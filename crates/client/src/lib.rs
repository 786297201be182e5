//! # LCLPNetwork Client
//!
//! Async client for the LCLPNetwork HTTP API.
//!
//! This crate contains:
//! - The access context and request pipeline ([`ApiAccess`])
//! - The response envelope and its classification ([`ApiResponse`])
//! - The closed request failure taxonomy ([`ApiError`])
//! - Authenticated contexts with token probing ([`AuthApiAccess`])
//! - Typed endpoint wrappers ([`NetworkApi`], [`MinecraftApi`])
//!
//! ## Usage
//!
//! ```no_run
//! use lclpnetwork_client::{ApiAccess, MinecraftApi};
//!
//! # async fn run() -> lclpnetwork_client::Result<()> {
//! let api = MinecraftApi::new(ApiAccess::public()?);
//! let stats = api.get_stats("7357a549-fa3e-4342-91b2-63e5e73ed39a", None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every classified failure surfaces as an [`ApiError`] under the default
//! policy; the builder's `raise_*` switches opt legacy callers into sentinel
//! results instead.

pub mod access;
pub mod api;
pub mod auth;
pub mod error;
pub mod json;
pub mod response;

pub use access::{ApiAccess, ApiAccessBuilder, Method, DEFAULT_HOST};
pub use api::{MinecraftApi, NetworkApi};
pub use auth::AuthApiAccess;
pub use error::{ApiError, Result};
pub use response::{ApiResponse, FieldErrors, ValidationErrors};

pub use lclpnetwork_model as model;
