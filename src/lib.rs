//! Weekly shift roster generation.
//!
//! Employees register a (primary, secondary) shift wish per day; the
//! [`schedule::AssignmentEngine`] turns a registry snapshot into a
//! [`schedule::Schedule`] with at most one shift per day, at most five days per
//! week, and two people per shift wherever the pool allows.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod parser;
pub mod schedule;
pub mod web;
