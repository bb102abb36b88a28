pub mod account;
pub mod events;
pub mod files;
pub mod logging;
pub mod uploads;
pub mod usage;
