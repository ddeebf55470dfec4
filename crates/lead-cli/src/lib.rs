//! Library side of the `lead-import` command.

pub mod logging;
pub mod pipeline;
