//! Periodic logging jobs.

use chrono::Local;
use std::fmt;

use crate::stats::{yesterday, StatsError, StatsService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Persist the current mean energy yield.
    EnergyYield,
    /// Persist yesterday's performance, if the source has it.
    Performance,
}

impl Job {
    pub async fn run(self, service: &StatsService) -> Result<(), StatsError> {
        match self {
            Job::EnergyYield => service.record_mean_yield().await.map(|_| ()),
            Job::Performance => {
                let day = yesterday(Local::now().date_naive());
                service.log_performance(day, day).await
            }
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::EnergyYield => f.write_str("energy-yield"),
            Job::Performance => f.write_str("performance"),
        }
    }
}
