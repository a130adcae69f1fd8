//! CLI command implementations.

pub mod common;
pub mod configure;
pub mod measure;
pub mod ports;
pub mod result;
pub mod serve;
pub mod status;
pub mod submit;
pub mod version;
pub mod wait;
