//
//  datamall
//  endpoints/active_mobility.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Active Mobility Endpoints
//!
//! Façade for the cycling and walking infrastructure endpoints. Currently
//! a single endpoint: bicycle parking locations around a point.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::ActiveMobility;
//!
//! let mobility = ActiveMobility::new("your-account-key")?;
//! let racks = mobility.bicycle_parking(1.364897, 103.766094, None)?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

use crate::api::params::{build_params, ParamField, ParamKind, ParamSchema, ParamValue, Params};
use crate::api::{ApiError, DataMallClient, Value};
use crate::constants::CACHE_ONE_DAY;
use crate::endpoints::Endpoint;

/// Search radius in kilometres when the caller does not supply one.
const DEFAULT_SEARCH_RADIUS_KM: f64 = 0.5;

const BICYCLE_PARKING: Endpoint = Endpoint {
    path: "/BicycleParkingv2",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

static LOCATION_SCHEMA: ParamSchema = ParamSchema {
    fields: &[
        ParamField {
            name: "latitude",
            kind: ParamKind::Float,
            required: true,
        },
        ParamField {
            name: "longitude",
            kind: ParamKind::Float,
            required: true,
        },
        ParamField {
            name: "distance",
            kind: ParamKind::Float,
            required: false,
        },
    ],
};

static LOCATION_KEY_MAP: &[(&str, &str)] = &[
    ("latitude", "Lat"),
    ("longitude", "Long"),
    ("distance", "Dist"),
];

/// Façade for the active mobility endpoints.
#[derive(Debug, Clone)]
pub struct ActiveMobility {
    api: DataMallClient,
}

impl ActiveMobility {
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

    /// Bicycle parking locations within `distance` kilometres of a point.
    ///
    /// # Parameters
    ///
    /// * `latitude` / `longitude` - Centre of the search, in decimal
    ///   degrees.
    /// * `distance` - Search radius in kilometres; defaults to 0.5.
    pub fn bicycle_parking(
        &self,
        latitude: f64,
        longitude: f64,
        distance: Option<f64>,
    ) -> Result<Value, ApiError> {
        let mut defaults = Params::new();
        defaults.insert(
            "distance".to_string(),
            ParamValue::from(DEFAULT_SEARCH_RADIUS_KM),
        );

        let mut params = Params::new();
        params.insert("latitude".to_string(), ParamValue::from(latitude));
        params.insert("longitude".to_string(), ParamValue::from(longitude));
        if let Some(distance) = distance {
            params.insert("distance".to_string(), ParamValue::from(distance));
        }
        let params = build_params(&LOCATION_SCHEMA, params, defaults, LOCATION_KEY_MAP)?;

        self.api.send_request(
            &self.api.endpoint_url(BICYCLE_PARKING.path),
            params,
            BICYCLE_PARKING.cache_duration,
            BICYCLE_PARKING.sanitise_ignore_keys,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn mobility_for(server: &mockito::ServerGuard) -> ActiveMobility {
        let api = DataMallClient::new("test-account-key")
            .unwrap()
            .with_base_url(server.url());
        ActiveMobility::with_client(api)
    }

    #[test]
    fn test_bicycle_parking_applies_default_radius() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BicycleParkingv2")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Lat".into(), "1.364897".into()),
                Matcher::UrlEncoded("Long".into(), "103.766094".into()),
                Matcher::UrlEncoded("Dist".into(), "0.5".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"value": [
                    {"Description": "BISHAN ST 12", "RackType": "Yellow Box",
                     "RackCount": 10, "ShelterIndicator": "Y"}
                ]}"#,
            )
            .create();

        let mobility = mobility_for(&server);
        let racks = mobility.bicycle_parking(1.364897, 103.766094, None).unwrap();

        mock.assert();
        assert_eq!(
            racks.as_array().unwrap()[0].get("RackCount"),
            Some(&Value::Integer(10))
        );
    }

    #[test]
    fn test_bicycle_parking_honours_explicit_radius() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BicycleParkingv2")
            .match_query(Matcher::UrlEncoded("Dist".into(), "1.2".into()))
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create();

        let mobility = mobility_for(&server);
        mobility
            .bicycle_parking(1.364897, 103.766094, Some(1.2))
            .unwrap();

        mock.assert();
    }
}
