use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rounded {
    None,
    Sm,
    Md,
    #[default]
    Lg,
    Full,
}

/// Site-wide style settings.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SiteStyles {
    pub primary_color: PrimaryColor,
    pub font_family: FontFamily,
    pub rounded_corners: Rounded,
}

#[derive(Serialize, Deserialize)]
pub struct StylesEditDescriptor {
    pub variants: Vec<StyleEditVariant>,
}

#[derive(Serialize, Deserialize, Clone, Copy)]
pub enum StyleEditVariant {
    PrimaryColor(PrimaryColor),
    FontFamily(FontFamily),
    RoundedCorners(Rounded),
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Online,
    Offline,
    Maintenance,
}

#[derive(Serialize, Deserialize)]
pub struct StatusDescriptor {
    pub status: ServerStatus,
}

/// SMTP settings edited from the dashboard.
///
/// They are validated and kept, never used to deliver mail.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Blank when read back.
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct ContentQuery {
    pub page: Option<String>,
    pub lang: Option<String>,
}

/// Section texts of a page in one language.
#[derive(Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub page: String,
    pub lang: String,
    pub content: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ContentResult {
    pub content: BTreeMap<String, String>,
}
