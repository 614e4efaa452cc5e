//! Bybit module - instrument rules from the Bybit v5 REST API

pub mod client;
pub mod messages;
pub mod rest;

pub use client::BybitClient;
