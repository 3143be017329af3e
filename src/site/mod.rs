pub mod handle;

use std::collections::{BTreeMap, HashMap};

use lettre::{transport::smtp::authentication::Credentials, AsyncSmtpTransport, Tokio1Executor};
use webster_shared::site::*;

use crate::{
    permission::{self, Permission},
    Error, Store,
};

/// The page content is read from when no page is given.
pub const DEFAULT_PAGE: &str = "index";
/// The language content is read in when no language is given.
pub const DEFAULT_LANG: &str = "en";

/// Site-wide settings edited from the dashboard.
#[derive(Debug, Default)]
pub struct Site {
    pub styles: SiteStyles,
    pub status: ServerStatus,
    smtp: SmtpSettings,
    /// Section texts by page and language.
    content: HashMap<(String, String), BTreeMap<String, String>>,
}

impl Site {
    /// The SMTP settings with the password left blank.
    pub fn smtp(&self) -> SmtpSettings {
        SmtpSettings {
            password: String::new(),
            ..self.smtp.clone()
        }
    }

    pub fn content(&self, page: &str, lang: &str) -> BTreeMap<String, String> {
        self.content
            .get(&(page.to_owned(), lang.to_owned()))
            .cloned()
            .unwrap_or_default()
    }
}

impl Store {
    /// Applies style edits in order.
    ///
    /// Requires [`Permission::ManageStyles`].
    pub fn edit_styles(
        &mut self,
        actor: u64,
        variants: Vec<StyleEditVariant>,
    ) -> Result<SiteStyles, Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageStyles)?;
        let styles = &mut self.site.styles;
        for variant in variants {
            match variant {
                StyleEditVariant::PrimaryColor(c) => styles.primary_color = c,
                StyleEditVariant::FontFamily(f) => styles.font_family = f,
                StyleEditVariant::RoundedCorners(r) => styles.rounded_corners = r,
            }
        }
        Ok(*styles)
    }

    /// Requires [`Permission::ConfigureSystem`].
    pub fn set_status(&mut self, actor: u64, status: ServerStatus) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ConfigureSystem)?;
        self.site.status = status;
        tracing::info!("admin {actor} set server status to {status:?}");
        Ok(())
    }

    /// Requires [`Permission::ConfigureSystem`].
    pub fn smtp(&self, actor: u64) -> Result<SmtpSettings, Error> {
        permission::authorize(self.accounts.get(actor), Permission::ConfigureSystem)?;
        Ok(self.site.smtp())
    }

    /// Validates and keeps SMTP settings. A blank password keeps the
    /// current one.
    ///
    /// Requires [`Permission::ConfigureSystem`].
    pub fn save_smtp(&mut self, actor: u64, mut settings: SmtpSettings) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ConfigureSystem)?;
        settings.host = settings.host.trim().to_owned();
        if settings.host.is_empty() {
            return Err(Error::EmptyField("host"));
        }
        if settings.port == 0 {
            return Err(Error::EmptyField("port"));
        }
        if settings.password.is_empty() {
            settings.password = self.site.smtp.password.clone();
        }

        // Building the transport checks the relay, nothing is sent.
        let _ = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));

        tracing::info!(
            "admin {actor} saved smtp settings for {}:{}",
            settings.host,
            settings.port
        );
        self.site.smtp = settings;
        Ok(())
    }

    /// Merges section texts into a page.
    ///
    /// Requires [`Permission::ManageContent`].
    pub fn save_content(
        &mut self,
        actor: u64,
        page: &str,
        lang: &str,
        content: BTreeMap<String, String>,
    ) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageContent)?;
        let page = Some(page.trim()).filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PAGE);
        let lang = Some(lang.trim()).filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LANG);
        self.site
            .content
            .entry((page.to_owned(), lang.to_owned()))
            .or_default()
            .extend(content);
        Ok(())
    }
}
