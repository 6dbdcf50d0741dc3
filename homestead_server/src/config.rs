use std::{env, time::Duration};

use hs_common::parse_boolean_flag;
use homestead_engine::traits::ProgressionSettings;
use log::*;

use crate::progression_worker::ProgressionWorkerConfig;

const DEFAULT_HS_HOST: &str = "127.0.0.1";
const DEFAULT_HS_PORT: u16 = 8420;
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 300;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Everything the order progression worker needs: the scan interval, whether it starts enabled, and the static
    /// lifecycle thresholds (which a runtime override can replace per scan).
    pub progression: ProgressionWorkerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HS_HOST.to_string(),
            port: DEFAULT_HS_PORT,
            database_url: String::default(),
            progression: ProgressionWorkerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("HS_HOST").ok().unwrap_or_else(|| DEFAULT_HS_HOST.into());
        let port = env::var("HS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for HS_PORT. {e} Using the default, {DEFAULT_HS_PORT}, instead.");
                    DEFAULT_HS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_HS_PORT);
        let database_url = env::var("HS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ HS_DATABASE_URL is not set. Please set it to the URL for the Homestead database.");
            String::default()
        });
        let progression = progression_config_from_env();
        Self { host, port, database_url, progression }
    }
}

fn progression_config_from_env() -> ProgressionWorkerConfig {
    let interval_secs = env_i64("HS_SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS as i64).max(1);
    let defaults = ProgressionSettings::default();
    let settings = ProgressionSettings {
        pending_to_production_days: env_i64("HS_PENDING_TO_PRODUCTION_DAYS", defaults.pending_to_production_days),
        production_to_shipped_days: env_i64("HS_PRODUCTION_TO_SHIPPED_DAYS", defaults.production_to_shipped_days),
        shipped_to_delivered_days: env_i64("HS_SHIPPED_TO_DELIVERED_DAYS", defaults.shipped_to_delivered_days),
        random_variation_days: env_i64("HS_RANDOM_VARIATION_DAYS", defaults.random_variation_days),
        block_progression_with_open_tickets: parse_boolean_flag(
            env::var("HS_BLOCK_ON_OPEN_TICKETS").ok(),
            defaults.block_progression_with_open_tickets,
        ),
    };
    let autostart = parse_boolean_flag(env::var("HS_PROGRESSION_AUTOSTART").ok(), true);
    ProgressionWorkerConfig { interval: Duration::from_secs(interval_secs as u64), autostart, settings }
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .map_err(|_| info!("🪛️ {name} is not set. Using the default value of {default}."))
        .and_then(|s| {
            s.parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for {name}. {e}"))
        })
        .ok()
        .unwrap_or(default)
}
