//
//  datamall
//  endpoints/geospatial.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Geospatial Endpoints
//!
//! Façade for the whole-island geospatial layer download. The API publishes
//! a fixed catalogue of layers (lamp posts, cycling paths, bus stop
//! locations and so on); requesting one returns a pre-signed link to the
//! SHP file.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::Geospatial;
//!
//! let geospatial = Geospatial::new("your-account-key")?;
//! let link = geospatial.geospatial_whole_island("CyclingPath")?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

use crate::api::params::{build_params, ParamField, ParamKind, ParamSchema, ParamValue, Params};
use crate::api::{ApiError, DataMallClient};
use crate::constants::CACHE_FIVE_MINUTES;
use crate::endpoints::Endpoint;

/// The geospatial layers the API publishes.
///
/// Layer identifiers are case-sensitive and must be sent exactly as listed.
pub const GEOSPATIAL_LAYER_IDS: &[&str] = &[
    "ArrowMarking",
    "Bollard",
    "BusStopLocation",
    "ControlBox",
    "ConvexMirror",
    "CoveredLinkWay",
    "CyclingPath",
    "CyclingPathConstruction",
    "DetectorLoop",
    "EmergencyGate",
    "ERPGantry",
    "Footpath",
    "GuardRail",
    "KerbLine",
    "LampPost",
    "LaneMarking",
    "ParkingStandardsZone",
    "PassengerPickupBay",
    "PedestrainOverheadbridge_UnderPass",
    "RailConstruction",
    "Railing",
    "RetainingWall",
    "RoadConstruction",
    "RoadCrossing",
    "RoadHump",
    "RoadSectionLine",
    "SchoolZone",
    "SilverZone",
    "SpeedRegulatingStrip",
    "StreetPaint",
    "TaxiStand",
    "TrafficLight",
    "TrafficSign",
    "TrainStation",
    "TrainStationExit",
    "VehicularBridge_Flyover_Underpass",
    "WordMarking",
];

const GEOSPATIAL_WHOLE_ISLAND: Endpoint = Endpoint {
    path: "/GeospatialWholeIsland",
    cache_duration: CACHE_FIVE_MINUTES,
    sanitise_ignore_keys: &[],
};

static GEOSPATIAL_WHOLE_ISLAND_SCHEMA: ParamSchema = ParamSchema {
    fields: &[ParamField {
        name: "layer_id",
        kind: ParamKind::Str,
        required: true,
    }],
};

static GEOSPATIAL_WHOLE_ISLAND_KEY_MAP: &[(&str, &str)] = &[("layer_id", "ID")];

/// Façade for the geospatial endpoints.
#[derive(Debug, Clone)]
pub struct Geospatial {
    api: DataMallClient,
}

impl Geospatial {
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

    /// Pre-signed link to the SHP file of a whole-island geospatial layer.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] if `layer_id` is not one of
    /// [`GEOSPATIAL_LAYER_IDS`].
    pub fn geospatial_whole_island(&self, layer_id: &str) -> Result<String, ApiError> {
        if !GEOSPATIAL_LAYER_IDS.contains(&layer_id) {
            return Err(ApiError::Validation(format!(
                "layer_id \"{layer_id}\" is invalid"
            )));
        }

        let mut params = Params::new();
        params.insert("layer_id".to_string(), ParamValue::from(layer_id));
        let params = build_params(
            &GEOSPATIAL_WHOLE_ISLAND_SCHEMA,
            params,
            Params::new(),
            GEOSPATIAL_WHOLE_ISLAND_KEY_MAP,
        )?;

        self.api.send_download_request(
            &self.api.endpoint_url(GEOSPATIAL_WHOLE_ISLAND.path),
            params,
            GEOSPATIAL_WHOLE_ISLAND.cache_duration,
        )
    }
}
