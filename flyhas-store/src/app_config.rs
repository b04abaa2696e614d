use serde::Deserialize;
use std::env;

use flyhas_core::{FareSchedule, PassengerBounds};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub collaborator: CollaboratorConfig,
    pub auth: AuthConfig,
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Where the flight/reservation/payment REST API lives.
#[derive(Debug, Deserialize, Clone)]
pub struct CollaboratorConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    pub hold_seconds: u32,
    pub base_fare: u32,
    pub premium_seat_rate: u32,
    pub economy_seat_rate: u32,
    pub currency: String,
    #[serde(default = "default_seat_page_max")]
    pub seat_page_max_passengers: u8,
    #[serde(default = "default_search_max")]
    pub search_max_passengers: u8,
    pub session_idle_seconds: u64,
    #[serde(default = "default_reaper_interval")]
    pub reaper_interval_seconds: u64,
}

fn default_seat_page_max() -> u8 { 5 }
fn default_search_max() -> u8 { 10 }
fn default_reaper_interval() -> u64 { 60 }

impl BookingRules {
    pub fn fares(&self) -> FareSchedule {
        FareSchedule {
            base_fare: self.base_fare,
            premium_seat_rate: self.premium_seat_rate,
            economy_seat_rate: self.economy_seat_rate,
            currency: self.currency.clone(),
        }
    }

    pub fn seat_page_bounds(&self) -> PassengerBounds {
        PassengerBounds::new(1, self.seat_page_max_passengers)
    }

    pub fn search_bounds(&self) -> PassengerBounds {
        PassengerBounds::new(1, self.search_max_passengers)
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        let fares = FareSchedule::default();
        Self {
            hold_seconds: flyhas_core::hold::DEFAULT_HOLD_SECONDS,
            base_fare: fares.base_fare,
            premium_seat_rate: fares.premium_seat_rate,
            economy_seat_rate: fares.economy_seat_rate,
            currency: fares.currency,
            seat_page_max_passengers: default_seat_page_max(),
            search_max_passengers: default_search_max(),
            session_idle_seconds: 1800,
            reaper_interval_seconds: default_reaper_interval(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `FLYHAS_BOOKING__HOLD_SECONDS=300`
            .add_source(config::Environment::with_prefix("FLYHAS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &str = include_str!("../../config/default.toml");

    fn parse(extra: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .add_source(config::File::from_str(extra, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_file_matches_built_in_rules() {
        let config = parse("");
        assert_eq!(config.booking.hold_seconds, 600);
        assert_eq!(config.booking.fares(), FareSchedule::default());
        assert_eq!(config.booking.seat_page_bounds(), PassengerBounds::SEAT_PAGE);
        assert_eq!(config.booking.search_bounds(), PassengerBounds::SEARCH_FORM);
        assert_eq!(config.collaborator.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_overrides_replace_single_keys() {
        let config = parse("[booking]\nhold_seconds = 120\nbase_fare = 80\n");
        assert_eq!(config.booking.hold_seconds, 120);
        assert_eq!(config.booking.fares().base_fare, 80);
        assert_eq!(config.booking.premium_seat_rate, 25);
    }
}
