//! Library side of the `forms` command line: settings, logging, the data
//! file and text rendering shared by the commands.

pub mod config;
pub mod input;
pub mod logging;
pub mod render;
pub mod store;
