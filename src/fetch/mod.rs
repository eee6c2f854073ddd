//! HTTP acquisition: streaming downloads, release resolution, batch fetches.

pub mod batch;
pub mod http;
pub mod release;
