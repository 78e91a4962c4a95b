//! Blocks shared by more than one pipeline.

use serde::{Deserialize, Serialize};

use super::{EnumField, config_enum, is_hex_color};
use crate::domain::AppError;

config_enum! {
    /// Voice used for generated copy.
    pub enum Tone default Professional {
        Professional => "professional",
        Friendly => "friendly",
        Playful => "playful",
        Luxurious => "luxurious",
        Technical => "technical",
    }
}

config_enum! {
    /// Deployment target.
    pub enum HostingProvider default Vercel {
        Vercel => "vercel",
        Netlify => "netlify",
        Aws => "aws",
        Azure => "azure",
        Gcp => "gcp",
        SelfHosted => "self-hosted",
    }
}

/// Corporate identity assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CorporateIdentity {
    pub company_name: String,
    pub slogan: String,
    pub logo_url: String,
    /// Hex colours, primary first.
    pub brand_colors: Vec<String>,
    pub primary_font: String,
    pub secondary_font: String,
    pub tone: Tone,
}

impl Default for CorporateIdentity {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            slogan: String::new(),
            logo_url: String::new(),
            brand_colors: vec!["#1F2937".to_string(), "#3B82F6".to_string()],
            primary_font: "Inter".to_string(),
            secondary_font: "Georgia".to_string(),
            tone: Tone::default(),
        }
    }
}

impl CorporateIdentity {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(bad) = self.brand_colors.iter().find(|color| !is_hex_color(color)) {
            return Err(AppError::invalid_field(
                "corporateIdentity.brandColors",
                format!("'{}' is not a hex colour", bad),
            ));
        }
        Ok(())
    }

    /// Enum entry for the tone field at `path`.
    pub(crate) const fn tone_field(path: &'static [&'static str]) -> EnumField {
        EnumField { path, allowed: Tone::NAMES }
    }
}

/// Hosting target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Hosting {
    pub provider: HostingProvider,
    pub custom_domain: String,
    pub region: String,
}

impl Default for Hosting {
    fn default() -> Self {
        Self {
            provider: HostingProvider::default(),
            custom_domain: String::new(),
            region: "eu-central".to_string(),
        }
    }
}

impl Hosting {
    pub(crate) const PROVIDER_FIELD: EnumField =
        EnumField { path: &["hosting", "provider"], allowed: HostingProvider::NAMES };

    pub fn validate(&self) -> Result<(), AppError> {
        if self.custom_domain.contains(char::is_whitespace) {
            return Err(AppError::invalid_field("hosting.customDomain", "must not contain whitespace"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_brand_color() {
        let identity = CorporateIdentity {
            brand_colors: vec!["#zzzzzz".to_string()],
            ..Default::default()
        };
        let err = identity.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidField { path, message }
            if path == "corporateIdentity.brandColors" && message.contains("#zzzzzz")));
    }

    #[test]
    fn hosting_provider_uses_kebab_case() {
        let json = serde_json::to_value(HostingProvider::SelfHosted).unwrap();
        assert_eq!(json, "self-hosted");
    }

    #[test]
    fn rejects_domain_with_spaces() {
        let hosting = Hosting { custom_domain: "my site.com".to_string(), ..Default::default() };
        assert!(hosting.validate().is_err());
    }
}
