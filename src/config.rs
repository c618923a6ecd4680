use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub smtp_relay: String,
    pub smtp_port: u16,
    pub allowed_origin: String,
    pub port: i32,
}

// Secrets are read from the environment only, never from the config file.
#[derive(Debug, Clone)]
pub struct MailerCredentials {
    pub account_email: Option<String>,
    pub account_password: Option<String>,
}

impl MailerCredentials {
    pub fn is_configured(&self) -> bool {
        self.account_email.is_some() && self.account_password.is_some()
    }
}

pub fn load_credentials() -> MailerCredentials {
    MailerCredentials {
        account_email: env::var("EMAIL_USERNAME").ok().filter(|v| !v.is_empty()),
        account_password: env::var("EMAIL_PASSWORD").ok().filter(|v| !v.is_empty()),
    }
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let smtp_relay = env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string());

    let smtp_port = env::var("SMTP_PORT")
        .unwrap_or_else(|_| "465".to_string())
        .parse::<u16>()
        .map_err(|e| format!("Failed to parse SMTP_PORT: {}", e))?;

    let allowed_origin =
        env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let port = env::var("PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse::<i32>()
        .map_err(|e| format!("Failed to parse PORT: {}", e))?;

    Ok(Config {
        smtp_relay,
        smtp_port,
        allowed_origin,
        port,
    })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("CONTACT_SERVICE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        let contents = fs::read_to_string(&config_path)?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        let contents = fs::read_to_string("config.yaml")?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        let contents = fs::read_to_string("config.example.yaml")?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Successfully loaded configuration from environment variables");
            Ok(config)
        }
        Err(e) => Err(format!(
            "Config file not found and environment variables are invalid. \
             Tried: '{}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {}",
            config_path, e
        )
        .into()),
    }
}
