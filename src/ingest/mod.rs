//! External data source clients.

pub mod open_meteo;

#[cfg(test)]
pub(crate) mod fixtures;
