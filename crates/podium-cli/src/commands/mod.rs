pub mod config;
pub mod profiles;
pub mod records;
pub mod timer;
