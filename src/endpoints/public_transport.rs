//
//  datamall
//  endpoints/public_transport.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Public Transport Endpoints
//!
//! Façade for the bus, taxi and train endpoints: real-time bus arrivals,
//! service and route reference data, facilities maintenance downloads,
//! passenger volume downloads, taxi availability and train service alerts.
//!
//! # Example
//!
//! ```rust,no_run
//! use datamall::endpoints::PublicTransport;
//!
//! let transport = PublicTransport::new("your-account-key")?;
//!
//! // All bus services arriving at a stop
//! let arrivals = transport.bus_arrival("83139", None)?;
//!
//! // Only service 15
//! let service_15 = transport.bus_arrival("83139", Some("15"))?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::params::{
    build_params, ParamField, ParamKind, ParamSchema, ParamValue, Params, WireParams,
};
use crate::api::{ApiError, DataMallClient, Value};
use crate::constants::{
    CACHE_FIVE_MINUTES, CACHE_ONE_DAY, CACHE_ONE_HOUR, CACHE_ONE_MINUTE, CACHE_ONE_MONTH,
};
use crate::endpoints::Endpoint;
use crate::util::date_is_within_last_three_months;

/// All MRT station codes start with 2 uppercase letters, then 1-2 digits.
/// E.g. NS1, DT35.
static STATION_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]{1,2}$").expect("valid pattern"));

/// Day of the month when the passenger-volume window rolls over.
const PASSENGER_VOLUME_CUTOFF_DAY: u32 = 15;

const BUS_ARRIVAL: Endpoint = Endpoint {
    path: "/BusArrivalv2",
    cache_duration: CACHE_ONE_MINUTE,
    sanitise_ignore_keys: &[],
};

const BUS_SERVICES: Endpoint = Endpoint {
    path: "/BusServices",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

const BUS_ROUTES: Endpoint = Endpoint {
    path: "/BusRoutes",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

const BUS_STOPS: Endpoint = Endpoint {
    path: "/BusStops",
    cache_duration: CACHE_ONE_DAY,
    sanitise_ignore_keys: &[],
};

const FACILITIES_MAINTENANCE: Endpoint = Endpoint {
    path: "/FacilitiesMaintenance",
    cache_duration: CACHE_FIVE_MINUTES,
    sanitise_ignore_keys: &[],
};

const PASSENGER_VOLUME_BY_BUS_STOPS: Endpoint = Endpoint {
    path: "/PV/Bus",
    cache_duration: CACHE_ONE_MONTH,
    sanitise_ignore_keys: &[],
};

const PASSENGER_VOLUME_BY_ORIGIN_DESTINATION_BUS_STOPS: Endpoint = Endpoint {
    path: "/PV/ODBus",
    cache_duration: CACHE_ONE_MONTH,
    sanitise_ignore_keys: &[],
};

const PASSENGER_VOLUME_BY_ORIGIN_DESTINATION_TRAIN_STATIONS: Endpoint = Endpoint {
    path: "/PV/ODTrain",
    cache_duration: CACHE_ONE_MONTH,
    sanitise_ignore_keys: &[],
};

const PASSENGER_VOLUME_BY_TRAIN_STATIONS: Endpoint = Endpoint {
    path: "/PV/Train",
    cache_duration: CACHE_ONE_MONTH,
    sanitise_ignore_keys: &[],
};

const TAXI_AVAILABILITY: Endpoint = Endpoint {
    path: "/Taxi-Availability",
    cache_duration: CACHE_ONE_MINUTE,
    sanitise_ignore_keys: &[],
};

const TAXI_STANDS: Endpoint = Endpoint {
    path: "/TaxiStands",
    cache_duration: CACHE_ONE_MONTH,
    sanitise_ignore_keys: &[],
};

const TRAIN_SERVICE_ALERTS: Endpoint = Endpoint {
    path: "/TrainServiceAlerts",
    cache_duration: CACHE_ONE_HOUR,
    sanitise_ignore_keys: &[],
};

static BUS_ARRIVAL_SCHEMA: ParamSchema = ParamSchema {
    fields: &[
        ParamField {
            name: "bus_stop_code",
            kind: ParamKind::Str,
            required: true,
        },
        ParamField {
            name: "service_number",
            kind: ParamKind::Str,
            required: false,
        },
    ],
};

static BUS_ARRIVAL_KEY_MAP: &[(&str, &str)] = &[
    ("bus_stop_code", "BusStopCode"),
    ("service_number", "ServiceNo"),
];

static PASSENGER_VOLUME_SCHEMA: ParamSchema = ParamSchema {
    fields: &[ParamField {
        name: "date",
        kind: ParamKind::Date,
        required: false,
    }],
};

static PASSENGER_VOLUME_KEY_MAP: &[(&str, &str)] = &[("date", "Date")];

static FACILITIES_MAINTENANCE_SCHEMA: ParamSchema = ParamSchema {
    fields: &[ParamField {
        name: "station_code",
        kind: ParamKind::Str,
        required: true,
    }],
};

static FACILITIES_MAINTENANCE_KEY_MAP: &[(&str, &str)] = &[("station_code", "StationCode")];

/// Façade for the public transport endpoints.
///
/// Owns a [`DataMallClient`] by composition; several façades can share one
/// client (and its cache) via [`with_client`](Self::with_client).
#[derive(Debug, Clone)]
pub struct PublicTransport {
    api: DataMallClient,
}

impl PublicTransport {
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

    /// Real-time arrival information for bus services at a stop, including
    /// estimated arrival times, current locations and loads.
    ///
    /// # Parameters
    ///
    /// * `bus_stop_code` - 5-digit bus stop reference code.
    /// * `service_number` - Optional bus service number; omitting it returns
    ///   every service calling at the stop.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] if `bus_stop_code` is not a 5-character
    /// numeric string.
    pub fn bus_arrival(
        &self,
        bus_stop_code: &str,
        service_number: Option<&str>,
    ) -> Result<Value, ApiError> {
        if bus_stop_code.len() != 5 {
            return Err(ApiError::Validation(
                "bus_stop_code is not a 5-character string".into(),
            ));
        }
        if bus_stop_code.parse::<u32>().is_err() {
            return Err(ApiError::Validation(
                "bus_stop_code is not a valid number".into(),
            ));
        }

        let mut params = Params::new();
        params.insert(
            "bus_stop_code".to_string(),
            ParamValue::from(bus_stop_code),
        );
        if let Some(service_number) = service_number {
            params.insert(
                "service_number".to_string(),
                ParamValue::from(service_number),
            );
        }
        let params = build_params(
            &BUS_ARRIVAL_SCHEMA,
            params,
            Params::new(),
            BUS_ARRIVAL_KEY_MAP,
        )?;

        self.send(&BUS_ARRIVAL, params)
    }

    /// Service information for all buses in operation: first/last stop,
    /// peak and off-peak dispatch frequencies.
    pub fn bus_services(&self) -> Result<Value, ApiError> {
        self.send(&BUS_SERVICES, WireParams::new())
    }

    /// Route information for all services in operation: stops along each
    /// route with first/last bus timings.
    pub fn bus_routes(&self) -> Result<Value, ApiError> {
        self.send(&BUS_ROUTES, WireParams::new())
    }

    /// All bus stops currently serviced, with location coordinates.
    pub fn bus_stops(&self) -> Result<Value, ApiError> {
        self.send(&BUS_STOPS, WireParams::new())
    }

    /// Pre-signed link to a JSON file with the facilities maintenance
    /// schedule of a train station.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] if `station_code` does not match the
    /// station code pattern (two uppercase letters followed by 1-2 digits,
    /// e.g. `NS1`, `DT35`).
    pub fn facilities_maintenance(&self, station_code: &str) -> Result<String, ApiError> {
        if !STATION_CODE_PATTERN.is_match(station_code) {
            return Err(ApiError::Validation(format!(
                "station_code \"{station_code}\" is invalid"
            )));
        }

        let mut params = Params::new();
        params.insert("station_code".to_string(), ParamValue::from(station_code));
        let params = build_params(
            &FACILITIES_MAINTENANCE_SCHEMA,
            params,
            Params::new(),
            FACILITIES_MAINTENANCE_KEY_MAP,
        )?;

        self.download(&FACILITIES_MAINTENANCE, params)
    }

    /// Download link for tap-in/tap-out passenger volume per bus stop.
    ///
    /// `date` selects the month (only year and month are used); it must be
    /// within the last three months. `None` means the most recent month.
    pub fn passenger_volume_by_bus_stops(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<String, ApiError> {
        self.passenger_volume_link(&PASSENGER_VOLUME_BY_BUS_STOPS, date)
    }

    /// Download link for trip counts between origin and destination bus
    /// stops. Same date rules as
    /// [`passenger_volume_by_bus_stops`](Self::passenger_volume_by_bus_stops).
    pub fn passenger_volume_by_origin_destination_bus_stops(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<String, ApiError> {
        self.passenger_volume_link(&PASSENGER_VOLUME_BY_ORIGIN_DESTINATION_BUS_STOPS, date)
    }

    /// Download link for trip counts between origin and destination train
    /// stations. Same date rules as
    /// [`passenger_volume_by_bus_stops`](Self::passenger_volume_by_bus_stops).
    pub fn passenger_volume_by_origin_destination_train_stations(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<String, ApiError> {
        self.passenger_volume_link(&PASSENGER_VOLUME_BY_ORIGIN_DESTINATION_TRAIN_STATIONS, date)
    }

    /// Download link for tap-in/tap-out passenger volume per train station.
    /// Same date rules as
    /// [`passenger_volume_by_bus_stops`](Self::passenger_volume_by_bus_stops).
    pub fn passenger_volume_by_train_stations(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<String, ApiError> {
        self.passenger_volume_link(&PASSENGER_VOLUME_BY_TRAIN_STATIONS, date)
    }

    /// Location coordinates of all taxis currently available for hire
    /// (excludes hired and busy taxis).
    pub fn taxi_availability(&self) -> Result<Value, ApiError> {
        self.send(&TAXI_AVAILABILITY, WireParams::new())
    }

    /// Taxi stand locations and properties (barrier-free access, type).
    pub fn taxi_stands(&self) -> Result<Value, ApiError> {
        self.send(&TAXI_STANDS, WireParams::new())
    }

    /// Train service unavailability during scheduled operating hours:
    /// affected line, stations and shuttle information.
    ///
    /// This endpoint returns a singleton object rather than a record list.
    pub fn train_service_alerts(&self) -> Result<Value, ApiError> {
        self.send(&TRAIN_SERVICE_ALERTS, WireParams::new())
    }

    // private

    fn send(&self, endpoint: &Endpoint, params: WireParams) -> Result<Value, ApiError> {
        self.api.send_request(
            &self.api.endpoint_url(endpoint.path),
            params,
            endpoint.cache_duration,
            endpoint.sanitise_ignore_keys,
        )
    }

    fn download(&self, endpoint: &Endpoint, params: WireParams) -> Result<String, ApiError> {
        self.api.send_download_request(
            &self.api.endpoint_url(endpoint.path),
            params,
            endpoint.cache_duration,
        )
    }

    /// Shared handling for the four passenger-volume download endpoints.
    fn passenger_volume_link(
        &self,
        endpoint: &Endpoint,
        date: Option<NaiveDate>,
    ) -> Result<String, ApiError> {
        let mut params = Params::new();
        if let Some(date) = date {
            if !date_is_within_last_three_months(date, PASSENGER_VOLUME_CUTOFF_DAY)? {
                return Err(ApiError::Validation(
                    "date is not within the last 3 months".into(),
                ));
            }
            params.insert("date".to_string(), ParamValue::from(date));
        }
        let params = build_params(
            &PASSENGER_VOLUME_SCHEMA,
            params,
            Params::new(),
            PASSENGER_VOLUME_KEY_MAP,
        )?;

        self.download(endpoint, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use mockito::Matcher;

    use crate::util::today_sgt;

    fn transport_for(server: &mockito::ServerGuard) -> PublicTransport {
        let api = DataMallClient::new("test-account-key")
            .unwrap()
            .with_base_url(server.url());
        PublicTransport::with_client(api)
    }

    #[test]
    fn test_bus_arrival_rejects_short_code() {
        let transport = PublicTransport::new("test-account-key").unwrap();
        let result = transport.bus_arrival("831", None);
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_bus_arrival_rejects_non_numeric_code() {
        let transport = PublicTransport::new("test-account-key").unwrap();
        let result = transport.bus_arrival("eight", None);
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_bus_arrival_sends_wire_parameter_names() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BusArrivalv2")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("BusStopCode".into(), "83139".into()),
                Matcher::UrlEncoded("ServiceNo".into(), "15".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"BusStopCode": "83139", "Services": [
                    {"ServiceNo": "15", "NextBus": {
                        "EstimatedArrival": "2017-04-29T07:20:24+08:00", "Load": "SEA"
                    }}
                ]}"#,
            )
            .create();

        let transport = transport_for(&server);
        let arrivals = transport.bus_arrival("83139", Some("15")).unwrap();

        mock.assert();
        assert_eq!(arrivals.get("BusStopCode"), Some(&Value::Integer(83139)));
        let services = arrivals
            .get("Services")
            .and_then(Value::as_array)
            .expect("a service list");
        assert!(matches!(
            services[0].get("NextBus").and_then(|b| b.get("EstimatedArrival")),
            Some(Value::DateTime(_))
        ));
    }

    #[test]
    fn test_facilities_maintenance_rejects_bad_station_code() {
        let transport = PublicTransport::new("test-account-key").unwrap();
        for code in ["ns1", "N1", "NSX", "NS123"] {
            let result = transport.facilities_maintenance(code);
            assert!(
                matches!(result, Err(ApiError::Validation(_))),
                "{code} should be rejected"
            );
        }
    }

    #[test]
    fn test_facilities_maintenance_returns_link() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/FacilitiesMaintenance")
            .match_query(Matcher::UrlEncoded("StationCode".into(), "NS1".into()))
            .with_status(200)
            .with_body(r#"{"value": [{"Link": "https://dm-link.example/NS1.json"}]}"#)
            .create();

        let transport = transport_for(&server);
        let link = transport.facilities_maintenance("NS1").unwrap();
        assert_eq!(link, "https://dm-link.example/NS1.json");
    }

    #[test]
    fn test_passenger_volume_rejects_old_date() {
        let transport = PublicTransport::new("test-account-key").unwrap();
        let result = transport
            .passenger_volume_by_bus_stops(NaiveDate::from_ymd_opt(2000, 1, 1));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_passenger_volume_sends_year_month_parameter() {
        let mut server = mockito::Server::new();
        // ~70 days back is always inside the three-month window
        let date = today_sgt().checked_sub_days(Days::new(70)).unwrap();
        let mock = server
            .mock("GET", "/PV/Bus")
            .match_query(Matcher::UrlEncoded(
                "Date".into(),
                date.format("%Y%m").to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"value": [{"Link": "https://dm-link.example/pv-bus.zip"}]}"#)
            .create();

        let transport = transport_for(&server);
        let link = transport.passenger_volume_by_bus_stops(Some(date)).unwrap();

        mock.assert();
        assert_eq!(link, "https://dm-link.example/pv-bus.zip");
    }

    #[test]
    fn test_passenger_volume_accepts_missing_date() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/PV/Train")
            .match_query(Matcher::UrlEncoded("$skip".into(), "0".into()))
            .with_status(200)
            .with_body(r#"{"value": [{"Link": "https://dm-link.example/pv-train.zip"}]}"#)
            .create();

        let transport = transport_for(&server);
        let link = transport.passenger_volume_by_train_stations(None).unwrap();

        mock.assert();
        assert_eq!(link, "https://dm-link.example/pv-train.zip");
    }

    #[test]
    fn test_train_service_alerts_singleton_payload() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/TrainServiceAlerts")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"odata.metadata": "ltaodataservice/$metadata#TrainServiceAlerts",
                    "value": {"Status": 1, "AffectedSegments": [], "Message": []}}"#,
            )
            .create();

        let transport = transport_for(&server);
        let alerts = transport.train_service_alerts().unwrap();
        assert_eq!(alerts.get("Status"), Some(&Value::Integer(1)));
        assert_eq!(
            alerts.get("AffectedSegments"),
            Some(&Value::Array(Vec::new()))
        );
    }
}
