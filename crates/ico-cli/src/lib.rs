//! Library components of the `ico-harmonize` command.

pub mod logging;
pub mod pipeline;
pub mod types;
