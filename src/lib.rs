//
//  datamall
//  lib.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! # datamall
//!
//! Typed client for the Singapore Land Transport Authority's DataMall open
//! data API.
//!
//! # Overview
//!
//! The crate is split into endpoint façades and a shared pipeline:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`endpoints`] | One façade per DataMall domain: public transport, traffic, active mobility, electric vehicles, geospatial layers |
//! | [`api`] | The shared pipeline: client, parameter builder, response sanitiser, cache, error taxonomy |
//! | [`util`] | Timezone helpers for Singapore Time and temporal string parsing |
//! | [`constants`] | API location, page size, retry and cache tuning |
//!
//! Every façade method validates its arguments, consults a static endpoint
//! table and hands the request to [`DataMallClient`](api::DataMallClient),
//! which paginates over the server's `$skip` cursor, retries fault
//! responses, caches page bodies and sanitises the payload into a typed
//! [`Value`](api::Value) tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::{PublicTransport, Traffic};
//!
//! let transport = PublicTransport::new("your-account-key")?;
//! let arrivals = transport.bus_arrival("83139", None)?;
//!
//! let traffic = Traffic::new("your-account-key")?;
//! let incidents = traffic.traffic_incidents()?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```
//!
//! An account key is free to obtain from the LTA DataMall portal.

/// The request/response pipeline shared by every endpoint façade.
pub mod api;
/// Process-wide configuration values.
pub mod constants;
/// Endpoint façades, one per DataMall domain.
pub mod endpoints;
/// Timezone and temporal parsing helpers.
pub mod util;

pub use api::{ApiError, DataMallClient, Value};
pub use endpoints::{ActiveMobility, ElectricVehicle, Geospatial, PublicTransport, Traffic};

/// The version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
