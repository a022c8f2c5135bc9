//! HTTP surface for the dashboard frontend and the operator tooling.

pub mod dashboard;
pub mod params;
