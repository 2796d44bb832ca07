//! Core library exports for the Sail Express catalog service.
//!
//! This crate exposes the multilingual product domain, the Diesel/SQLite
//! repository, the image asset store and the service layer used by the
//! HTTP application.

pub mod assets;
pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
pub mod services;
