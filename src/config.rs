use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::solver::two_opt::RefineBudget;

pub mod constant {
    pub(crate) const EARTH_RADIUS_KM: f64 = 6371.0;
    pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
    pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
    pub const USER_AGENT: &str = "RouteOptimizer/1.0";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const GEOCODE_RESULT_LIMIT: usize = 5;
    pub const GEOCODE_CONCURRENCY: usize = 4;
    pub const REFINE_MAX_SWEEPS: usize = 1_000;
    pub const REFINE_TIME_LIMIT_MS: u64 = 2_000;
    pub(crate) const SEED: u64 = 64;
}

/// Regional bias applied to forward geocoding queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBias {
    pub country_code: String,
    pub country_name: String,
    /// `left,top,right,bottom` in degrees.
    pub viewbox: String,
}

impl RegionBias {
    pub fn india() -> Self {
        RegionBias {
            country_code: "in".to_string(),
            country_name: "India".to_string(),
            viewbox: "68.1766451354,37.6884782906,97.4025614766,6.4627436529".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub osrm_base_url: String,
    pub nominatim_base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub refine_budget: RefineBudget,
    pub geocode_concurrency: usize,
    pub region: Option<RegionBias>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            osrm_base_url: constant::DEFAULT_OSRM_BASE_URL.to_string(),
            nominatim_base_url: constant::DEFAULT_NOMINATIM_BASE_URL.to_string(),
            user_agent: constant::USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(constant::REQUEST_TIMEOUT_SECS),
            refine_budget: RefineBudget {
                max_sweeps: Some(constant::REFINE_MAX_SWEEPS),
                time_limit: Some(Duration::from_millis(constant::REFINE_TIME_LIMIT_MS)),
            },
            geocode_concurrency: constant::GEOCODE_CONCURRENCY,
            region: Some(RegionBias::india()),
        }
    }
}

impl Config {
    /// Reads `.env` and the process environment, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        let osrm_base_url = env::var("OSRM_BASE_URL").unwrap_or(defaults.osrm_base_url);
        let nominatim_base_url =
            env::var("NOMINATIM_BASE_URL").unwrap_or(defaults.nominatim_base_url);
        let user_agent = env::var("ROUTER_USER_AGENT").unwrap_or(defaults.user_agent);

        let request_timeout = parse_var::<u64>("PROVIDER_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_sweeps = match parse_var::<usize>("REFINE_MAX_SWEEPS")? {
            Some(0) => None,
            Some(n) => Some(n),
            None => defaults.refine_budget.max_sweeps,
        };
        let time_limit = match parse_var::<u64>("REFINE_TIME_LIMIT_MS")? {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.refine_budget.time_limit,
        };
        if max_sweeps.is_none() && time_limit.is_none() {
            warn!("Refine budget disabled, 2-opt runs until convergence");
        }

        let geocode_concurrency = match parse_var::<usize>("GEOCODE_CONCURRENCY")? {
            Some(0) => return Err(Error::config("GEOCODE_CONCURRENCY must be at least 1")),
            Some(n) => n,
            None => defaults.geocode_concurrency,
        };

        let region = match env::var("GEOCODE_COUNTRY") {
            Ok(code) if code.trim().is_empty() => None,
            Ok(code) if code.trim().eq_ignore_ascii_case("in") => Some(RegionBias::india()),
            Ok(code) => {
                return Err(Error::config(format!(
                    "GEOCODE_COUNTRY '{}' has no known viewbox (use 'in' or leave empty)",
                    code
                )))
            }
            Err(_) => defaults.region,
        };

        let config = Config {
            osrm_base_url,
            nominatim_base_url,
            user_agent,
            request_timeout,
            refine_budget: RefineBudget {
                max_sweeps,
                time_limit,
            },
            geocode_concurrency,
            region,
        };
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::config(format!("{} has unparsable value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}
