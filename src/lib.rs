//! Commission Engine library crate.
//!
//! This crate exposes the dealership commission engine and its API
//! components as reusable modules.  External applications may depend on
//! the `commission_engine` crate and call
//! `engine::generate_commission_reports` directly, go through
//! `service::ReportService` with their own data source, query the car-model
//! catalog through `catalog`, or embed the HTTP API via `api::build_router`.

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod rates;
pub mod service;
pub mod source;
pub mod telemetry;
