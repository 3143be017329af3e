use std::{net::SocketAddr, path::Path};

use serde::Deserialize;

/// Describing the server configuration.
#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub seed_admin: SeedAdmin,
    #[serde(default)]
    pub mail: Mail,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Config {
    /// Reads the configuration from a toml file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// Reads the configuration from a toml file, or the defaults if the file
    /// doesn't exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            seed_admin: SeedAdmin::default(),
            mail: Mail::default(),
        }
    }
}

#[inline]
fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// The admin account present at startup.
///
/// It holds every permission and must change its password before it can be
/// deleted.
#[derive(Deserialize, Clone, Debug)]
pub struct SeedAdmin {
    pub username: String,
    pub email: lettre::Address,
    pub password: String,
}

impl Default for SeedAdmin {
    fn default() -> Self {
        Self {
            username: "Admin".to_owned(),
            email: lettre::Address::new("admin", "mmpcs.net").expect("valid seed address"),
            password: "admin".to_owned(),
        }
    }
}

/// Describing how verification notices are composed.
#[derive(Deserialize, Clone, Debug)]
pub struct Mail {
    pub sender: lettre::Address,
    pub sender_name: String,
    /// Verification tokens are appended to this.
    pub verification_link_base: String,
}

impl Default for Mail {
    fn default() -> Self {
        Self {
            sender: lettre::Address::new("noreply", "mmpcs.net").expect("valid sender address"),
            sender_name: "Webster".to_owned(),
            verification_link_base: "http://localhost:8080/verify?token=".to_owned(),
        }
    }
}
