pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod page;
pub mod params;
pub mod price;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod validation;
