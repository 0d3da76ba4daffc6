pub mod config;
pub mod driver;
pub mod i18n;
pub mod keyed;
pub mod rate_limit;
pub mod reconcile;
pub mod translation;
