//
//  datamall
//  api/common/mod.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Common API Types for the DataMall Client
//!
//! This module provides the error taxonomy shared by the transport pipeline,
//! the parameter builder and the endpoint façades.
//!
//! # Overview
//!
//! Every fallible operation in this crate returns [`ApiError`]:
//!
//! - [`ApiError::Validation`] - an argument failed a pre-flight check
//! - [`ApiError::Http`] - the server answered with an unclassified non-2xx status
//! - [`ApiError::Fault`] - the server answered HTTP 500 with a structured fault envelope
//! - [`ApiError::MissingDownloadLink`] - a download endpoint returned no usable link
//! - [`ApiError::Network`] - the request never completed at the transport level
//!
//! # Example
//!
//! ```rust
//! use datamall::api::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Validation(reason)) => println!("Bad argument: {}", reason),
//!         Err(ApiError::Fault { message, .. }) => println!("Server fault: {}", message),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Only [`ApiError::Fault`] is retried by the pipeline; everything else
//!   propagates on the first occurrence.
//! - The `Network` variant converts automatically from `reqwest::Error`.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for all DataMall API operations.
///
/// `ApiError` covers the failure classes a caller can observe when issuing
/// a request through [`DataMallClient`](crate::api::DataMallClient) or one
/// of the endpoint façades. It implements the standard `Error` trait via
/// `thiserror` for ergonomic error handling.
///
/// # Variants
///
/// | Variant | Description | Retried |
/// |---------|-------------|---------|
/// | `Validation` | Argument failed a pre-flight check | No |
/// | `Http` | Non-2xx response without a fault envelope | No |
/// | `Fault` | HTTP 500 with a structured fault envelope | Yes, 2 attempts total |
/// | `MissingDownloadLink` | Download endpoint returned no usable link | No |
/// | `Network` | Transport-level failure (DNS, connect, timeout) | No |
///
/// # Notes
///
/// - `Validation` errors are raised synchronously before any network I/O.
/// - `Fault` carries the server's `faultstring` plus an enumeration of its
///   `detail` entries as `"key: value"` strings.
#[derive(Error, Debug)]
pub enum ApiError {
    /// An argument failed validation before any request was issued.
    ///
    /// Covers schema violations from
    /// [`build_params`](crate::api::params::build_params) as well as
    /// domain-specific constraints such as malformed bus stop codes or
    /// out-of-range dates.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// The server responded with a non-success status and no fault envelope.
    ///
    /// The status code is propagated verbatim. This class is never retried;
    /// a 404 on a mistyped endpoint fails immediately.
    #[error("HTTP error: {0}")]
    Http(StatusCode),

    /// The server responded with HTTP 500 and a structured fault envelope.
    ///
    /// This is the one recoverable failure class: the pipeline retries it
    /// with exponential backoff before surfacing it.
    #[error("API fault: {message}")]
    Fault {
        /// The server's `faultstring`.
        message: String,
        /// The entries of the fault's `detail` object, as `"key: value"` strings.
        details: Vec<String>,
    },

    /// A download-oriented endpoint returned zero results or a missing or
    /// blank `Link` field. Always a hard failure; never retried.
    #[error("No download link returned.")]
    MissingDownloadLink,

    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, timeouts, DNS resolution errors and
    /// other transport-layer issues from the underlying HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
