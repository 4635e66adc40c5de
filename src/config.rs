use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default sensor endpoint (the classroom data collector).
pub const DEFAULT_URL: &str = "https://evidencia-2-amt-ispc.onrender.com/data";

/// Terminal dashboard for a remote ultrasonic distance sensor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Sensor endpoint returning a JSON array of readings
    #[arg(short, long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Refresh interval in milliseconds
    #[arg(short, long, default_value = "15000")]
    pub interval: u64,

    /// Distance threshold (cm) at or above which the LED counts as on
    #[arg(short, long, default_value = "300")]
    pub threshold: f64,

    /// Rows per table page
    #[arg(short, long, default_value = "15")]
    pub page_size: usize,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Returns the refresh interval as a Duration, floored at one second
    /// so a typo can't hammer the endpoint.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.interval.max(1000))
    }

    /// Returns the page size, floored at one row.
    pub fn rows_per_page(&self) -> usize {
        self.page_size.max(1)
    }
}
