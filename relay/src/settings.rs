use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("RELAY_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

impl Settings {
    /// Reads `RELAY_HOST`/`RELAY_PORT`, honouring a `.env` file.
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();
        Self::from_vars(env::var("RELAY_HOST").ok(), env::var("RELAY_PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self, SettingsError> {
        let port = match port {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            application: ApplicationSettings {
                host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
        })
    }
}
