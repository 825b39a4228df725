use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use time::{Time, Weekday};

use lineup_service::AvailabilityWindow;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub queue: QueueSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.storage.backend != "memory" {
            return Err(format!(
                "storage.backend '{}' is not supported (only 'memory')",
                self.storage.backend
            ));
        }
        if self.queue.appointment_duration_secs == 0 {
            return Err("queue.appointment_duration_secs must be > 0".into());
        }
        // Surface malformed windows at startup instead of per request.
        self.queue.availability_windows()?;
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_backend() -> String {
    "memory".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Queue behavior and clinic opening hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Fixed per-appointment duration used by the spot calculation.
    #[serde(default = "default_appointment_duration")]
    pub appointment_duration_secs: u32,
    /// One entry per practitioner per weekday.
    #[serde(default)]
    pub windows: Vec<WindowConfig>,
}

fn default_appointment_duration() -> u32 {
    420
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            appointment_duration_secs: default_appointment_duration(),
            windows: Vec::new(),
        }
    }
}

impl QueueSettings {
    pub fn availability_windows(&self) -> Result<Vec<AvailabilityWindow>, String> {
        self.windows.iter().map(WindowConfig::to_window).collect()
    }
}

/// A bookable window as written in the config file,
/// e.g. `{ weekday = "monday", start = "09:00", end = "17:30" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub weekday: String,
    pub start: String,
    pub end: String,
}

impl WindowConfig {
    pub fn to_window(&self) -> Result<AvailabilityWindow, String> {
        let weekday = parse_weekday(&self.weekday)?;
        let start = parse_time(&self.start)?;
        let end = parse_time(&self.end)?;
        if start >= end {
            return Err(format!(
                "window start {} must be before end {}",
                self.start, self.end
            ));
        }
        Ok(AvailabilityWindow::new(weekday, start, end))
    }
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    match s.to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        "sunday" | "sun" => Ok(Weekday::Sunday),
        other => Err(format!("unknown weekday: {other}")),
    }
}

fn parse_time(s: &str) -> Result<Time, String> {
    let format = time::macros::format_description!("[hour]:[minute]");
    Time::parse(s, &format).map_err(|e| format!("invalid time '{s}': {e}"))
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from("lineup.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., LINEUP__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("LINEUP")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, "memory");
        assert_eq!(cfg.queue.appointment_duration_secs, 420);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = "postgres".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_window_parsing() {
        let window = WindowConfig {
            weekday: "monday".into(),
            start: "09:00".into(),
            end: "17:30".into(),
        };
        let parsed = window.to_window().unwrap();
        assert_eq!(parsed.weekday, Weekday::Monday);

        let backwards = WindowConfig {
            weekday: "monday".into(),
            start: "18:00".into(),
            end: "09:00".into(),
        };
        assert!(backwards.to_window().is_err());

        let bad_day = WindowConfig {
            weekday: "someday".into(),
            start: "09:00".into(),
            end: "17:00".into(),
        };
        assert!(bad_day.to_window().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[queue]
appointment_duration_secs = 600

[[queue.windows]]
weekday = "monday"
start = "09:00"
end = "12:00"
"#
        )
        .unwrap();

        let cfg = loader::load_config(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.queue.appointment_duration_secs, 600);
        assert_eq!(cfg.queue.availability_windows().unwrap().len(), 1);
    }
}
