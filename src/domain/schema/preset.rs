//! App preset configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigSchema, CorporateIdentity, EnumField, Hosting, config_enum};
use crate::domain::migration::{LegacyField, LegacyMarker};
use crate::domain::steps::{StepGroup, StepPlan, WizardStep};
use crate::domain::{AppError, PipelineKind};

config_enum! {
    /// Kind of application the preset scaffolds.
    pub enum AppType default Saas {
        Saas => "saas",
        Crm => "crm",
        Erp => "erp",
        Marketplace => "marketplace",
        Dashboard => "dashboard",
        Booking => "booking",
        Social => "social",
        InternalTool => "internal-tool",
        Other => "other",
    }
}

config_enum! {
    /// Backing database.
    pub enum DatabaseProvider default Postgres {
        Disabled => "none",
        Postgres => "postgres",
        Mysql => "mysql",
        Sqlite => "sqlite",
        Mongodb => "mongodb",
        Supabase => "supabase",
        Firebase => "firebase",
    }
}

config_enum! {
    pub enum DesignStyle default Modern {
        Modern => "modern",
        Minimal => "minimal",
        Playful => "playful",
        Corporate => "corporate",
        Bold => "bold",
    }
}

config_enum! {
    pub enum UiLayout default Sidebar {
        Sidebar => "sidebar",
        TopNav => "top-nav",
        Dashboard => "dashboard",
    }
}

/// Root configuration produced by the preset wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PresetConfig {
    pub meta: PresetMeta,
    pub app: AppBlock,
    pub features: Features,
    pub auth: Auth,
    pub database: Database,
    pub ui: Ui,
    pub corporate_identity: CorporateIdentity,
    pub hosting: Hosting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PresetMeta {
    pub business_name: String,
    pub description: String,
    pub target_audience: String,
    pub industry: String,
    /// ISO 639-1 code.
    pub language: String,
}

impl Default for PresetMeta {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            description: String::new(),
            target_audience: String::new(),
            industry: String::new(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AppBlock {
    pub app_type: AppType,
    pub platforms: Vec<String>,
}

impl Default for AppBlock {
    fn default() -> Self {
        Self { app_type: AppType::default(), platforms: vec!["web".to_string()] }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Features {
    pub feature_ids: Vec<String>,
    pub custom_features: Vec<String>,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Auth {
    pub enabled: bool,
    pub providers: Vec<String>,
    pub mfa: bool,
    pub roles: Vec<String>,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            enabled: true,
            providers: vec!["email".to_string()],
            mfa: false,
            roles: vec!["admin".to_string(), "user".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Database {
    pub provider: DatabaseProvider,
    pub multi_tenant: bool,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Ui {
    pub design_style: DesignStyle,
    pub dark_mode: bool,
    pub layout: UiLayout,
}

/// Schema marker for [`PresetConfig`].
#[derive(Debug, Clone, Copy)]
pub struct PresetSchema;

impl ConfigSchema for PresetSchema {
    type Config = PresetConfig;

    const PIPELINE: PipelineKind = PipelineKind::Preset;

    const ENUM_FIELDS: &'static [EnumField] = &[
        EnumField { path: &["app", "appType"], allowed: AppType::NAMES },
        EnumField { path: &["database", "provider"], allowed: DatabaseProvider::NAMES },
        EnumField { path: &["ui", "designStyle"], allowed: DesignStyle::NAMES },
        EnumField { path: &["ui", "layout"], allowed: UiLayout::NAMES },
        CorporateIdentity::tone_field(&["corporateIdentity", "tone"]),
        Hosting::PROVIDER_FIELD,
    ];

    const LEGACY_MARKERS: &'static [LegacyMarker] = &[
        LegacyMarker::Field("businessName"),
        LegacyMarker::Field("appType"),
        LegacyMarker::ListInPlaceOfBlock("features"),
        LegacyMarker::MissingBlock("meta"),
    ];

    const LEGACY_FIELDS: &'static [LegacyField] = &[
        LegacyField::moved("businessName", &["meta", "businessName"]),
        LegacyField::moved("description", &["meta", "description"]),
        LegacyField::moved("targetUsers", &["meta", "targetAudience"]),
        LegacyField::moved("industry", &["meta", "industry"]),
        LegacyField::renamed(
            "appType",
            &["app", "appType"],
            &[
                ("internal", "internal-tool"),
                ("internal_tool", "internal-tool"),
                ("admin", "dashboard"),
                ("admin-panel", "dashboard"),
            ],
        ),
        LegacyField::moved("platforms", &["app", "platforms"]),
        LegacyField::moved("features", &["features", "featureIds"]),
        LegacyField::moved("customFeatures", &["features", "customFeatures"]),
        LegacyField::moved("authProviders", &["auth", "providers"]),
        LegacyField::flag("authProviders", &["auth", "enabled"]),
        LegacyField::renamed(
            "databaseType",
            &["database", "provider"],
            &[
                ("postgresql", "postgres"),
                ("pg", "postgres"),
                ("mongo", "mongodb"),
                ("mariadb", "mysql"),
                ("sqlite3", "sqlite"),
            ],
        ),
        LegacyField::moved("designStyle", &["ui", "designStyle"]),
        LegacyField::moved("darkMode", &["ui", "darkMode"]),
        LegacyField::appended("primaryColor", &["corporateIdentity", "brandColors"]),
        LegacyField::appended("secondaryColor", &["corporateIdentity", "brandColors"]),
        LegacyField::moved("logoUrl", &["corporateIdentity", "logoUrl"]),
        LegacyField::moved("companyName", &["corporateIdentity", "companyName"]),
        LegacyField::renamed(
            "hostingProvider",
            &["hosting", "provider"],
            &[("self", "self-hosted"), ("selfhosted", "self-hosted"), ("on-premise", "self-hosted")],
        ),
        LegacyField::moved("domain", &["hosting", "customDomain"]),
    ];

    fn steps() -> &'static StepPlan<PresetConfig> {
        &PRESET_STEPS
    }

    fn validate(config: &PresetConfig) -> Result<(), AppError> {
        let language = &config.meta.language;
        if language.len() != 2 || !language.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(AppError::invalid_field(
                "meta.language",
                format!("'{}' is not a two-letter code", language),
            ));
        }
        if config.auth.enabled && config.auth.providers.is_empty() {
            return Err(AppError::invalid_field(
                "auth.providers",
                "must list at least one provider when auth is enabled",
            ));
        }
        config.corporate_identity.validate()?;
        config.hosting.validate()?;
        Ok(())
    }
}

static PRESET_STEPS: StepPlan<PresetConfig> = StepPlan {
    steps: &[
        WizardStep {
            ordinal: 1,
            title: "Business basics",
            fields: &[
                "meta.businessName",
                "meta.description",
                "meta.targetAudience",
                "meta.industry",
                "meta.language",
            ],
        },
        WizardStep { ordinal: 2, title: "App type", fields: &["app.appType", "app.platforms"] },
        WizardStep {
            ordinal: 3,
            title: "Features",
            fields: &["features.featureIds", "features.customFeatures", "features.modules"],
        },
        WizardStep { ordinal: 4, title: "Authentication", fields: &["auth.enabled", "auth.mfa"] },
        WizardStep {
            ordinal: 5,
            title: "Auth providers & roles",
            fields: &["auth.providers", "auth.roles"],
        },
        WizardStep {
            ordinal: 6,
            title: "Database",
            fields: &["database.provider", "database.multiTenant"],
        },
        WizardStep { ordinal: 7, title: "Data models", fields: &["database.models"] },
        WizardStep {
            ordinal: 8,
            title: "Design",
            fields: &[
                "ui.designStyle",
                "ui.layout",
                "ui.darkMode",
                "corporateIdentity.companyName",
                "corporateIdentity.slogan",
                "corporateIdentity.logoUrl",
                "corporateIdentity.brandColors",
                "corporateIdentity.primaryFont",
                "corporateIdentity.secondaryFont",
                "corporateIdentity.tone",
            ],
        },
        WizardStep {
            ordinal: 9,
            title: "Hosting",
            fields: &["hosting.provider", "hosting.customDomain", "hosting.region"],
        },
        WizardStep { ordinal: 10, title: "Review", fields: &[] },
    ],
    groups: &[
        StepGroup {
            name: "auth-details",
            selector: "auth.enabled",
            ordinals: &[5],
            predicate: auth_enabled,
        },
        StepGroup {
            name: "data-models",
            selector: "database.provider",
            ordinals: &[7],
            predicate: has_database,
        },
    ],
};

fn auth_enabled(config: &PresetConfig) -> bool {
    config.auth.enabled
}

fn has_database(config: &PresetConfig) -> bool {
    config.database.provider != DatabaseProvider::Disabled
}
