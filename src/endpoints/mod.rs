//
//  datamall
//  endpoints/mod.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! # Endpoint Façades
//!
//! One module per DataMall domain, each a thin façade over the shared
//! [`DataMallClient`](crate::api::DataMallClient) pipeline:
//!
//! - [`public_transport`]: buses, taxis and trains
//! - [`traffic`]: road and traffic conditions
//! - [`active_mobility`]: cycling and walking infrastructure
//! - [`electric_vehicle`]: EV charging points
//! - [`geospatial`]: whole-island geospatial layer downloads
//!
//! Every endpoint is declared as a static [`Endpoint`] descriptor (URL
//! path, cache duration, sanitisation exemptions); the façade methods add
//! argument validation and hand the descriptor to the pipeline. Adding an
//! endpoint means adding a table entry and a method, never touching the
//! pipeline.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::public_transport::PublicTransport;
//!
//! let transport = PublicTransport::new("your-account-key")?;
//! let arrivals = transport.bus_arrival("83139", None)?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

pub mod active_mobility;
pub mod electric_vehicle;
pub mod geospatial;
pub mod public_transport;
pub mod traffic;

pub use active_mobility::ActiveMobility;
pub use electric_vehicle::ElectricVehicle;
pub use geospatial::Geospatial;
pub use public_transport::PublicTransport;
pub use traffic::Traffic;

/// Static description of one DataMall endpoint.
///
/// Declared per domain as plain data and never mutated at runtime. The
/// façade methods combine a descriptor with validated arguments and call
/// the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// URL path under the API root, e.g. `"/BusArrivalv2"`.
    pub path: &'static str,
    /// Seconds before a cached response expires; 0 disables caching for
    /// this endpoint.
    pub cache_duration: u64,
    /// Response key paths exempted from sanitisation.
    pub sanitise_ignore_keys: &'static [&'static str],
}
