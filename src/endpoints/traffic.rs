//
//  datamall
//  endpoints/traffic.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Traffic Endpoints
//!
//! Façade for the road condition endpoints: carpark availability, ERP
//! rates, travel time estimates, incidents, road works and openings,
//! camera images, speed bands and variable message signs. None of these
//! take arguments; each method is a descriptor plus a pipeline call.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::Traffic;
//!
//! let traffic = Traffic::new("your-account-key")?;
//! let incidents = traffic.traffic_incidents()?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

use crate::api::params::WireParams;
use crate::api::{ApiError, DataMallClient, Value};
use crate::constants::{CACHE_FIVE_MINUTES, CACHE_ONE_DAY, CACHE_ONE_MINUTE, CACHE_TWO_MINUTES};
use crate::endpoints::Endpoint;

const CARPARK_AVAILABILITY: Endpoint = Endpoint {
    path: "/CarParkAvailabilityv2",
    cache_duration: CACHE_ONE_MINUTE,
    sanitise_ignore_keys: &[],
};

const ERP_RATES: Endpoint = Endpoint {
    path: "/ERPRates",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

const ESTIMATED_TRAVEL_TIMES: Endpoint = Endpoint {
    path: "/EstTravelTimes",
    cache_duration: CACHE_FIVE_MINUTES,
    sanitise_ignore_keys: &[],
};

const FAULTY_TRAFFIC_LIGHTS: Endpoint = Endpoint {
    path: "/FaultyTrafficLights",
    cache_duration: CACHE_TWO_MINUTES,
    sanitise_ignore_keys: &[],
};

const ROAD_OPENINGS: Endpoint = Endpoint {
    path: "/RoadOpenings",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

const ROAD_WORKS: Endpoint = Endpoint {
    path: "/RoadWorks",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

const TRAFFIC_IMAGES: Endpoint = Endpoint {
    path: "/Traffic-Images",
    cache_duration: CACHE_FIVE_MINUTES,
    sanitise_ignore_keys: &[],
};

const TRAFFIC_INCIDENTS: Endpoint = Endpoint {
    path: "/TrafficIncidents",
    cache_duration: CACHE_TWO_MINUTES,
    sanitise_ignore_keys: &[],
};

const TRAFFIC_SPEED_BANDS: Endpoint = Endpoint {
    path: "/TrafficSpeedBandsv2",
    cache_duration: CACHE_FIVE_MINUTES,
    sanitise_ignore_keys: &[],
};

const VMS: Endpoint = Endpoint {
    path: "/VMS",
    cache_duration: CACHE_TWO_MINUTES,
    sanitise_ignore_keys: &[],
};

/// Façade for the traffic endpoints.
#[derive(Debug, Clone)]
pub struct Traffic {
    api: DataMallClient,
}

impl Traffic {
    /// Creates a façade with its own client for the given account key.
    pub fn new(account_key: &str) -> Result<Self, ApiError> {
        Ok(Self {
            api: DataMallClient::new(account_key)?,
        })
    }

    /// Creates a façade over an existing client.
    pub fn with_client(api: DataMallClient) -> Self {
        Self { api }
    }

    /// The underlying client.
    pub fn client(&self) -> &DataMallClient {
        &self.api
    }

    /// Available lots for HDB, LTA and URA carparks.
    pub fn carpark_availability(&self) -> Result<Value, ApiError> {
        self.send(&CARPARK_AVAILABILITY)
    }

    /// ERP gantry rates for all vehicle types across all time slots.
    pub fn erp_rates(&self) -> Result<Value, ApiError> {
        self.send(&ERP_RATES)
    }

    /// Estimated travel times on expressway segments.
    pub fn estimated_travel_times(&self) -> Result<Value, ApiError> {
        self.send(&ESTIMATED_TRAVEL_TIMES)
    }

    /// Alerts for currently faulty or under-maintenance traffic lights.
    pub fn faulty_traffic_lights(&self) -> Result<Value, ApiError> {
        self.send(&FAULTY_TRAFFIC_LIGHTS)
    }

    /// Planned road openings.
    pub fn road_openings(&self) -> Result<Value, ApiError> {
        self.send(&ROAD_OPENINGS)
    }

    /// Approved road works being or about to be carried out.
    pub fn road_works(&self) -> Result<Value, ApiError> {
        self.send(&ROAD_WORKS)
    }

    /// Links to images from traffic cameras on expressways and checkpoints.
    pub fn traffic_images(&self) -> Result<Value, ApiError> {
        self.send(&TRAFFIC_IMAGES)
    }

    /// Incidents currently happening on the roads: accidents, vehicle
    /// breakdowns, road blocks, traffic diversions.
    pub fn traffic_incidents(&self) -> Result<Value, ApiError> {
        self.send(&TRAFFIC_INCIDENTS)
    }

    /// Current traffic speed bands on road segments.
    pub fn traffic_speed_bands(&self) -> Result<Value, ApiError> {
        self.send(&TRAFFIC_SPEED_BANDS)
    }

    /// Messages currently shown on EMAS variable message signs.
    pub fn vms(&self) -> Result<Value, ApiError> {
        self.send(&VMS)
    }

    fn send(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        self.api.send_request(
            &self.api.endpoint_url(endpoint.path),
            WireParams::new(),
            endpoint.cache_duration,
            endpoint.sanitise_ignore_keys,
        )
    }
}
