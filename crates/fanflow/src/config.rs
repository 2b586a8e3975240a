use anyhow::anyhow;
use clap::Parser;
use fanflow_core::{validate_probability, SportType};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{Read, Write},
    path::PathBuf,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::domain::{ANALYSIS_RESIDUAL_PROBABILITY, COMMERCIAL_BREAK_RESIDUAL_PROBABILITY};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding configuration options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level to run with the service (default: info)
    #[arg(short, long)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    pub config: Option<String>,
    pub level: Option<String>,
    pub api_settings: APISettings,
    pub ui_settings: UISettings,
    pub feed_settings: FeedSettings,
    pub oracle_settings: OracleSettings,
}

impl ConfigurableSettings for Settings {
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings) {
        if let Some(level) = &cli_settings.level {
            self.level = Some(level.clone());
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/local.toml")
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.feed_settings.validate()?;
        if self.oracle_settings.timeout_secs == 0 {
            return Err(anyhow!("oracle_settings.timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Seconds between simulated game events
    pub tick_interval_secs: u64,
    /// Whether the feed starts connected
    pub auto_sync: bool,
    /// Seed for the simulator RNG, random on every start when unset
    #[serde(default)]
    pub seed: Option<u64>,
    /// Chance an ordinary event is still flagged as a broadcast break
    pub commercial_break_probability: f64,
    /// Chance an ordinary event is sent to the oracle anyway
    pub analysis_probability: f64,
    /// Seconds the report acknowledgment banner stays visible
    pub acknowledgment_secs: u64,
    pub default_sport: SportType,
}

impl FeedSettings {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        validate_probability(
            "feed_settings.commercial_break_probability",
            self.commercial_break_probability,
        )?;
        validate_probability(
            "feed_settings.analysis_probability",
            self.analysis_probability,
        )?;
        if self.tick_interval_secs == 0 {
            return Err(anyhow!("feed_settings.tick_interval_secs must be greater than 0"));
        }
        Ok(())
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            tick_interval_secs: 8,
            auto_sync: true,
            seed: None,
            commercial_break_probability: COMMERCIAL_BREAK_RESIDUAL_PROBABILITY,
            analysis_probability: ANALYSIS_RESIDUAL_PROBABILITY,
            acknowledgment_secs: 3,
            default_sport: SportType::Football,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleSettings {
    /// Root url of the generateContent api
    pub base_url: String,
    pub model: String,
    /// File holding the api key, takes precedence over `api_key_env`
    #[serde(default)]
    pub api_key_file: Option<String>,
    /// Environment variable holding the api key
    pub api_key_env: String,
    /// Upper bound on a single prediction call, after which the fallback is shown
    pub timeout_secs: u64,
    /// Use the in-process mock oracle (debug builds or e2e-testing feature only)
    pub mock_enabled: bool,
}

impl Default for OracleSettings {
    fn default() -> Self {
        OracleSettings {
            base_url: String::from("https://generativelanguage.googleapis.com"),
            model: String::from("gemini-3-flash-preview"),
            api_key_file: None,
            api_key_env: String::from("API_KEY"),
            timeout_secs: 20,
            mock_enabled: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UISettings {
    pub remote_url: String,
    pub ui_dir: String,
}

impl Default for UISettings {
    fn default() -> Self {
        UISettings {
            remote_url: String::from("http://127.0.0.1:9990"),
            ui_dir: String::from("./crates/fanflow/ui"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct APISettings {
    pub domain: String,
    pub port: String,
    pub origins: Vec<String>,
}

impl Default for APISettings {
    fn default() -> Self {
        APISettings {
            domain: String::from("127.0.0.1"),
            port: String::from("9990"),
            origins: vec![String::from("http://localhost:9990")],
        }
    }
}

pub fn get_settings() -> Result<Settings, anyhow::Error> {
    get_settings_with_cli(Cli::parse().into())
}

pub struct CliSettings {
    pub config: Option<String>,
    pub level: Option<String>,
}

impl From<Cli> for CliSettings {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            level: cli.level,
        }
    }
}

pub trait ConfigurableSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Apply CLI settings after loading from file
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings);

    /// Get the default config file path
    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/settings.toml")
    }

    /// Get the config directory path
    fn config_directory() -> PathBuf {
        PathBuf::from("./config")
    }
}

pub fn get_settings_with_cli<T: ConfigurableSettings>(
    cli_settings: CliSettings,
) -> Result<T, anyhow::Error> {
    let mut settings = if let Some(config_path) = cli_settings.config.clone() {
        let path = PathBuf::from(config_path);

        let absolute_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()?.join(path)
        };

        match File::open(absolute_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| anyhow!("Failed to read config: {}", e))?;
                toml::from_str(&content)
                    .map_err(|e| anyhow!("Failed to map config to settings: {}", e))?
            }
            Err(err) => return Err(anyhow!("Failed to find file: {}", err)),
        }
    } else {
        let default_path = T::default_config_path();
        match File::open(&default_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| anyhow!("Failed to read default config: {}", e))?;
                toml::from_str(&content)
                    .map_err(|e| anyhow!("Failed to parse default config: {}", e))?
            }
            Err(_) => {
                let default_settings = T::default();

                fs::create_dir_all(T::config_directory())
                    .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;

                let toml_content = toml::to_string(&default_settings)
                    .map_err(|e| anyhow!("Failed to serialize default settings: {}", e))?;

                let mut file = fs::File::create(&default_path)
                    .map_err(|e| anyhow!("Failed to create config file: {}", e))?;
                file.write_all(toml_content.as_bytes())
                    .map_err(|e| anyhow!("Failed to write default config: {}", e))?;

                default_settings
            }
        }
    };

    settings.apply_cli_overrides(&cli_settings);

    Ok(settings)
}

pub fn setup_logger(
    level: Option<String>,
    filter_targets: Vec<String>,
) -> Result<(), fern::InitError> {
    let rust_log = get_log_level(level);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(rust_log)
        .filter(move |metadata| {
            !filter_targets
                .iter()
                .any(|filter| metadata.target().starts_with(filter))
        })
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

pub fn get_log_level(level: Option<String>) -> LevelFilter {
    let level = level.unwrap_or_else(|| env::var("RUST_LOG").unwrap_or_default());
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
