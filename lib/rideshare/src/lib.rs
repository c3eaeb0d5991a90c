use std::fmt;
use std::path::Path;
use fnv::{FnvHashMap, FnvHashSet};

pub mod data;
pub mod config;
pub mod travel;
pub mod route;
pub mod assign;
pub mod block;

pub use config::SolverConfig;
pub use block::{solve, Schedule};

pub type Map<K, V> = FnvHashMap<K, V>;
pub type Set<T> = FnvHashSet<T>;

use data::trips::{Demand, TripId};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidCapacity(Demand),
    InvalidTravelSpeed { pixel_per_km: f64, avg_speed_per_min: f64 },
    EmptyTripSet,
    DuplicateTrip(TripId),
    /// No vehicle route can make progress on the remaining trips of a block.
    UnsatisfiableBlock { block: usize, unserved: Vec<TripId> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(q) => write!(f, "vehicle capacity must be positive (got {})", q),
            Error::InvalidTravelSpeed { pixel_per_km, avg_speed_per_min } =>
                write!(f, "travel scale must be positive (pixel_per_km={}, avg_speed_per_min={})", pixel_per_km, avg_speed_per_min),
            Error::EmptyTripSet => f.write_str("no trip requests to schedule"),
            Error::DuplicateTrip(id) => write!(f, "trip id {} appears more than once", id),
            Error::UnsatisfiableBlock { block, unserved } =>
                write!(f, "block {} is unsatisfiable: no feasible route for trips {:?}", block, unserved),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;


mod logging_setup {
    use super::*;
    use tracing_subscriber::{EnvFilter, fmt, registry, prelude::*};
    use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
    use std::fs::OpenOptions;

    fn build_and_set_global_subscriber<P>(logfile: Option<P>, is_test : bool) -> std::io::Result<Option<WorkerGuard>> where
        P : AsRef<Path>
    {
        let stderr_log = fmt::layer().with_writer(std::io::stderr);
        let env_filter = EnvFilter::from_default_env();
        let r = registry().with(stderr_log).with(env_filter);

        let flush_guard = match logfile {
            Some(p) => {
                let logfile = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(p)?;
                let (writer, _guard) = non_blocking::NonBlockingBuilder::default()
                    .lossy(false)
                    .finish(logfile);
                let json = fmt::layer()
                    .json()
                    .with_span_list(true)
                    .with_current_span(false)
                    .with_writer(writer);

                let r = r.with(json);
                if is_test { r.try_init().ok(); }
                else { r.init(); }
                Some(_guard)
            },
            None => {
                if is_test { r.try_init().ok(); }
                else { r.init(); }
                None
            }
        };
        return Ok(flush_guard)
    }

    pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> std::io::Result<Option<WorkerGuard>> {
        return build_and_set_global_subscriber(logfile, false);
    }

    #[allow(dead_code)]
    pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
        return build_and_set_global_subscriber(logfile, true).ok().flatten();
    }
}
pub use logging_setup::*;
