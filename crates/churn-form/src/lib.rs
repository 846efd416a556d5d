pub mod config;
pub mod dom;
pub mod error;
pub mod handler;
pub mod http_utils;
pub mod logging;
pub mod numeric;
pub mod payload;
pub mod render;
pub mod transport;

#[cfg(test)]
mod test_utils;

pub use handler::{ChurnFormHandler, SubmitOutcome};
