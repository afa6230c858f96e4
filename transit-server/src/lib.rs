//! Transit route planner server.
//!
//! Answers "how do I get from this stop to that one?" over a static graph
//! of subway lines and walking transfers, estimates direct walks between
//! coordinates, and relays MBTA service alerts.

pub mod config;
pub mod direct;
pub mod mbta;
pub mod network;
pub mod planner;
pub mod remote;
pub mod web;
