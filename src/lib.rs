//! Time-Aware Parking Cost & Ranking Engine for Singapore carparks.
//!
//! This crate prices a parking session against agency tariff rules (night
//! caps, central-area business-hour premiums, peak surcharges, free Sundays
//! and public holidays, mall rate bands), scores nearby facilities by cost,
//! distance and availability, and selects a recommendation banner for the
//! result set.

#![warn(missing_docs)]

pub mod api;
pub mod availability;
pub mod calculation;
pub mod calendar;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod models;
