//
//  datamall
//  endpoints/electric_vehicle.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Electric Vehicle Endpoints
//!
//! Façade for the EV charging point lookup. Charging point identifiers and
//! charging-speed labels come back as digit-heavy strings that must not be
//! coerced to numbers, so the endpoint declares sanitisation exemptions for
//! them.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::ElectricVehicle;
//!
//! let ev = ElectricVehicle::new("your-account-key")?;
//! let chargers = ev.ev_charging_points("120110")?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::params::{build_params, ParamField, ParamKind, ParamSchema, ParamValue, Params};
use crate::api::{ApiError, DataMallClient, Value};
use crate::constants::CACHE_FIVE_MINUTES;
use crate::endpoints::Endpoint;

/// Singapore postal codes are exactly 6 digits.
static POSTAL_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid pattern"));

const EV_CHARGING_POINTS: Endpoint = Endpoint {
    path: "/EVChargingPoints",
    cache_duration: CACHE_FIVE_MINUTES,
    sanitise_ignore_keys: &[
        "evLocationsData[].locationId",
        "evLocationsData[].chargingPoints[].plugTypes[].chargingSpeed",
    ],
};

static EV_CHARGING_POINTS_SCHEMA: ParamSchema = ParamSchema {
    fields: &[ParamField {
        name: "postal_code",
        kind: ParamKind::Str,
        required: true,
    }],
};

static EV_CHARGING_POINTS_KEY_MAP: &[(&str, &str)] = &[("postal_code", "PostalCode")];

/// Façade for the electric vehicle endpoints.
#[derive(Debug, Clone)]
pub struct ElectricVehicle {
    api: DataMallClient,
}

impl ElectricVehicle {
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

    /// EV charging points near a postal code, with their operators, plug
    /// types and charging speeds.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] if `postal_code` is not a 6-digit string.
    pub fn ev_charging_points(&self, postal_code: &str) -> Result<Value, ApiError> {
        if !POSTAL_CODE_PATTERN.is_match(postal_code) {
            return Err(ApiError::Validation(format!(
                "postal_code \"{postal_code}\" is invalid"
            )));
        }

        let mut params = Params::new();
        params.insert("postal_code".to_string(), ParamValue::from(postal_code));
        let params = build_params(
            &EV_CHARGING_POINTS_SCHEMA,
            params,
            Params::new(),
            EV_CHARGING_POINTS_KEY_MAP,
        )?;

        self.api.send_request(
            &self.api.endpoint_url(EV_CHARGING_POINTS.path),
            params,
            EV_CHARGING_POINTS.cache_duration,
            EV_CHARGING_POINTS.sanitise_ignore_keys,
        )
    }
}
