//
//  datamall
//  constants.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! # Shared Constants
//!
//! Process-wide configuration values for the DataMall client: the upstream
//! API location, the fixed server page size, cache sizing and the standard
//! cache durations used by the endpoint tables.
//!
//! The durations are plain seconds so that they can be passed straight into
//! [`send_request`](crate::api::DataMallClient::send_request) as
//! `cache_duration` values.

/// Scheme and host of the LTA DataMall API.
pub const BASE_API_DOMAIN: &str = "https://datamall2.mytransport.sg";

/// Root of all LTA DataMall OData endpoints.
pub const BASE_API_ENDPOINT: &str = "https://datamall2.mytransport.sg/ltaodataservice";

/// Number of records the server returns per page.
///
/// A response containing exactly this many records signals that more pages
/// may exist and the client should advance `$skip` to fetch them.
pub const PAGE_SIZE: usize = 500;

/// Number of skipped records between politeness pauses during pagination.
pub const THROTTLE_EVERY_RECORDS: usize = 1000;

/// Length of the politeness pause during long paginations, in seconds.
pub const THROTTLE_SECONDS: u64 = 1;

/// Total request attempts for a fault-classified failure (initial + retries).
pub const MAX_ATTEMPTS: u32 = 2;

/// Base delay for exponential backoff between retry attempts, in milliseconds.
pub const RETRY_BASE_DELAY_MS: u64 = 100;

/// Maximum number of entries held by the response cache.
pub const CACHE_MAXSIZE: usize = 1024;

/// Cache for one minute. Used by near-real-time endpoints.
pub const CACHE_ONE_MINUTE: u64 = 60;

/// Cache for two minutes.
pub const CACHE_TWO_MINUTES: u64 = CACHE_ONE_MINUTE * 2;

/// Cache for five minutes.
pub const CACHE_FIVE_MINUTES: u64 = CACHE_ONE_MINUTE * 5;

/// Cache for ten minutes.
pub const CACHE_TEN_MINUTES: u64 = CACHE_ONE_MINUTE * 10;

/// Cache for thirty minutes.
pub const CACHE_THIRTY_MINUTES: u64 = CACHE_ONE_MINUTE * 30;

/// Cache for one hour.
pub const CACHE_ONE_HOUR: u64 = CACHE_ONE_MINUTE * 60;

/// Cache for twelve hours.
pub const CACHE_TWELVE_HOURS: u64 = CACHE_ONE_HOUR * 12;

/// Cache for one day. Used by largely static reference data.
pub const CACHE_ONE_DAY: u64 = CACHE_ONE_HOUR * 24;

/// Cache for one month (30 days).
pub const CACHE_ONE_MONTH: u64 = CACHE_ONE_DAY * 30;

/// User-agent header sent with every request.
pub const USER_AGENT: &str = concat!("datamall-rs/", env!("CARGO_PKG_VERSION"));
