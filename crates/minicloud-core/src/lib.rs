//! MiniCloud Core - Domain types, configuration and ports
//!
//! This crate contains the network-free core of the MiniCloud client:
//! - **Configuration** - YAML-backed [`config::Config`] and the runtime
//!   [`config::ConfigProvider`] handle shared by the gateway and the engine
//! - **Domain types** - remote listing entries, session uploads, merged
//!   gallery records, transform parameters
//! - **Pure helpers** - the transform URL builder and the list response normalizer
//! - **Port definitions** - [`ports::IImageBackend`], implemented by the HTTP adapter
//!
//! # Architecture
//!
//! The crate follows the hexagonal (ports & adapters) pattern. The domain
//! module has no I/O; adapters in `minicloud-client` implement the ports and
//! the reconciliation engine in `minicloud-sync` depends only on them.

pub mod config;
pub mod domain;
pub mod ports;
