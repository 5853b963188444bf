//! pathfield - Plan cost-weighted routes across fields of painted polygon obstacles

pub mod config;
pub mod domain;
pub mod error;
pub mod field;
pub mod geometry;
pub mod map;
pub mod mesh;
pub mod render;
pub mod route;
pub mod search;
