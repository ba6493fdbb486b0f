// Copydesk - reporter/editor refinement loop
// Library exports

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod providers;
pub mod refinement;
pub mod roles;
