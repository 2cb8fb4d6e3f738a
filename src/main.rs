//! influx-daylight — writes sunrise/sunset markers for a fixed location.
//!
//! Reads settings from flags, the environment, or a `.env` file in the
//! working directory, then runs until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use influx_daylight::{
    Config, DEFAULT_ADDR, DEFAULT_DATABASE, DEFAULT_LOOKAHEAD_DAYS, LogWriter, ScheduleMode,
    Service, SinkKind, SinkSettings,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Records daily sunrise and sunset into InfluxDB or a Grafana-style annotation API.
#[derive(Parser, Debug)]
#[command(name = "influx-daylight", version, about)]
struct Cli {
    /// Base address of the sink.
    #[arg(long, env = "INFLUXDB_ADDR", default_value = DEFAULT_ADDR)]
    influxdb_addr: String,

    /// Basic-auth username (sent only together with a password).
    #[arg(long, env = "INFLUXDB_USERNAME")]
    influxdb_username: Option<String>,

    /// Basic-auth password (sent only together with a username).
    #[arg(long, env = "INFLUXDB_PASSWORD", hide_env_values = true)]
    influxdb_password: Option<String>,

    /// Target database for point writes.
    #[arg(long, env = "INFLUXDB_DATABASE", default_value = DEFAULT_DATABASE)]
    influxdb_database: String,

    /// Observer latitude in degrees, north positive.
    #[arg(long, env = "LATITUDE", allow_negative_numbers = true)]
    latitude: f64,

    /// Observer longitude in degrees, east positive.
    #[arg(long, env = "LONGITUDE", allow_negative_numbers = true)]
    longitude: f64,

    /// Wire shape of each write.
    #[arg(long, env = "DAYLIGHT_SINK", value_enum, default_value_t = SinkKind::Annotation)]
    sink: SinkKind,

    /// One event per wake-up, or the sunrise+sunset pair at sunrise.
    #[arg(long, env = "DAYLIGHT_SCHEDULE", value_enum, default_value_t = ScheduleMode::Single)]
    schedule: ScheduleMode,

    /// Pause after each pair dispatch, in seconds (0 disables).
    #[arg(long, env = "DAYLIGHT_COOLDOWN_SECS", default_value_t = 30)]
    cooldown_secs: u64,

    /// Wait before recomputing when no event could be scheduled, in seconds.
    #[arg(long, env = "DAYLIGHT_RETRY_SECS", default_value_t = 3600)]
    retry_secs: u64,

    /// Calendar days searched for the next event.
    #[arg(long, env = "DAYLIGHT_LOOKAHEAD_DAYS", default_value_t = DEFAULT_LOOKAHEAD_DAYS)]
    lookahead_days: u32,

    /// Upper bound for one sink request, in seconds.
    #[arg(long, env = "DAYLIGHT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            latitude: self.latitude,
            longitude: self.longitude,
            mode: self.schedule,
            sink: SinkSettings {
                kind: self.sink,
                addr: self.influxdb_addr,
                username: self.influxdb_username,
                password: self.influxdb_password,
                database: self.influxdb_database,
                timeout: Duration::from_secs(self.request_timeout_secs),
            },
            cooldown: Duration::from_secs(self.cooldown_secs),
            retry_interval: Duration::from_secs(self.retry_secs),
            lookahead_days: self.lookahead_days,
            ..Config::default()
        }
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = Cli::parse().into_config();
    info!(
        latitude = cfg.latitude,
        longitude = cfg.longitude,
        addr = %cfg.sink.addr,
        sink = ?cfg.sink.kind,
        schedule = ?cfg.mode,
        "influx-daylight starting"
    );

    let service = Service::builder(cfg)
        .with_subscribers(vec![Arc::new(LogWriter::new())])
        .build()
        .inspect_err(|e| error!(label = e.as_label(), error = %e, "invalid configuration"))?;

    service.run().await?;
    info!("influx-daylight exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches, error::ErrorKind};

    /// Parses `args` with every environment fallback removed.
    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let matches = Cli::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(args.iter().copied())?;
        Cli::from_arg_matches(&matches)
    }

    #[test]
    fn test_flags_map_onto_config() {
        let cli = parse(&[
            "influx-daylight",
            "--latitude",
            "-33.87",
            "--longitude",
            "151.21",
            "--influxdb-addr",
            "http://influx:8086",
            "--sink",
            "points",
            "--schedule",
            "pair",
            "--cooldown-secs",
            "0",
        ])
        .unwrap();
        let cfg = cli.into_config();

        assert_eq!(cfg.latitude, -33.87);
        assert_eq!(cfg.longitude, 151.21);
        assert_eq!(cfg.sink.kind, SinkKind::Points);
        assert_eq!(cfg.sink.addr, "http://influx:8086");
        assert_eq!(cfg.sink.database, DEFAULT_DATABASE);
        assert_eq!(cfg.sink.username, None);
        assert_eq!(cfg.mode, ScheduleMode::Pair);
        assert_eq!(cfg.effective_cooldown(), None);
    }

    #[test]
    fn test_defaults_without_environment() {
        let cfg = parse(&["influx-daylight", "--latitude", "1", "--longitude", "2"])
            .unwrap()
            .into_config();

        assert_eq!(cfg.sink.addr, DEFAULT_ADDR);
        assert_eq!(cfg.sink.kind, SinkKind::Annotation);
        assert_eq!(cfg.mode, ScheduleMode::Single);
        assert_eq!(cfg.lookahead_days, DEFAULT_LOOKAHEAD_DAYS);
        assert_eq!(cfg.retry_interval, Duration::from_secs(3600));
    }

    #[test]
    fn test_coordinates_are_required() {
        let err = parse(&["influx-daylight", "--longitude", "1"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["influx-daylight", "--latitude", "1"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
