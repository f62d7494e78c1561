//
//  datamall
//  api/mod.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! # DataMall API Core
//!
//! The request/response pipeline shared by every endpoint façade:
//!
//! - [`client`]: the transport pipeline ([`DataMallClient`])
//! - [`params`]: the parameter builder
//! - [`sanitise`]: the response sanitiser and its [`Value`] tree
//! - [`cache`]: the TTL response cache
//! - [`common`]: the [`ApiError`] taxonomy

pub mod cache;
pub mod client;
pub mod common;
pub mod params;
pub mod sanitise;

pub use cache::ResponseCache;
pub use client::DataMallClient;
pub use common::ApiError;
pub use params::{build_params, ParamField, ParamKind, ParamSchema, ParamValue, Params, WireParams};
pub use sanitise::{sanitise, Value};
