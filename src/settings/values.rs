use serde::{Deserialize, Serialize};

use super::Setting;

/// Title and favicon shown in the browser tab and header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_title: String,
    #[serde(default)]
    pub favicon: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: "Untitled site".to_string(),
            favicon: None,
        }
    }
}

impl Setting for SiteSettings {
    const KEY: &'static str = "site_settings";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterSettings {
    pub text: String,
    #[serde(default)]
    pub links: Vec<FooterLink>,
    #[serde(default)]
    pub show_social: bool,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            text: String::new(),
            links: Vec::new(),
            show_social: true,
        }
    }
}

impl Setting for FooterSettings {
    const KEY: &'static str = "footer_settings";
}
