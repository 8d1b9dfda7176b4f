// src/lib.rs

//! Course catalog harvester and TTL-cached snapshot stores.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod store;
pub mod utils;
