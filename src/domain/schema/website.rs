//! Website configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigSchema, CorporateIdentity, EnumField, Hosting, Tone};
use crate::domain::migration::{LegacyField, LegacyMarker};
use crate::domain::steps::{StepGroup, StepPlan, WizardStep};
use crate::domain::{AppError, PipelineKind};

/// Website types that unlock the commerce steps.
pub const COMMERCE_TYPES: &[&str] = &["e-commerce", "ecommerce", "shop", "online-shop", "marketplace"];
/// Website types that unlock the blog step.
pub const BLOG_TYPES: &[&str] = &["blog", "magazine", "news"];
/// Website types that unlock the booking step.
pub const BOOKING_TYPES: &[&str] = &["booking", "services", "restaurant"];
/// Website types that unlock the portfolio step.
pub const PORTFOLIO_TYPES: &[&str] = &["portfolio", "agency", "photography"];

/// Root configuration produced by the website wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct WebsiteConfig {
    pub meta: WebsiteMeta,
    pub website_types: Vec<String>,
    pub corporate_identity: CorporateIdentity,
    pub audience: Audience,
    pub pages: Pages,
    pub content: Content,
    pub commerce: Commerce,
    pub blog: Blog,
    pub booking: Booking,
    pub portfolio: Portfolio,
    pub seo: Seo,
    pub hosting: Hosting,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            meta: WebsiteMeta::default(),
            website_types: vec!["business".to_string()],
            corporate_identity: CorporateIdentity::default(),
            audience: Audience::default(),
            pages: Pages::default(),
            content: Content::default(),
            commerce: Commerce::default(),
            blog: Blog::default(),
            booking: Booking::default(),
            portfolio: Portfolio::default(),
            seo: Seo::default(),
            hosting: Hosting::default(),
        }
    }
}

impl WebsiteConfig {
    /// Whether any selected website type is in `group`.
    pub fn has_type_in(&self, group: &[&str]) -> bool {
        self.website_types
            .iter()
            .any(|selected| group.iter().any(|candidate| selected.eq_ignore_ascii_case(candidate)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct WebsiteMeta {
    pub project_name: String,
    pub business_name: String,
    pub description: String,
    pub language: String,
}

impl Default for WebsiteMeta {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            business_name: String::new(),
            description: String::new(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Audience {
    pub primary_audience: String,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Pages {
    pub selected: Vec<String>,
    pub custom: Vec<String>,
}

impl Default for Pages {
    fn default() -> Self {
        Self {
            selected: vec!["home".to_string(), "about".to_string(), "contact".to_string()],
            custom: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Content {
    pub tone: Tone,
    pub languages: Vec<String>,
    pub copywriting: bool,
}

impl Default for Content {
    fn default() -> Self {
        Self { tone: Tone::Friendly, languages: vec!["en".to_string()], copywriting: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Commerce {
    /// ISO 4217 code.
    pub currency: String,
    pub product_categories: Vec<String>,
    pub payment_providers: Vec<String>,
    pub shipping_regions: Vec<String>,
    pub tax_included: bool,
}

impl Default for Commerce {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            product_categories: Vec::new(),
            payment_providers: vec!["stripe".to_string()],
            shipping_regions: Vec::new(),
            tax_included: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Blog {
    pub categories: Vec<String>,
    pub posts_per_page: u64,
    pub comments: bool,
}

impl Default for Blog {
    fn default() -> Self {
        Self { categories: Vec::new(), posts_per_page: 10, comments: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Booking {
    pub services: Vec<String>,
    pub slot_minutes: u64,
    pub confirmation_email: bool,
}

impl Default for Booking {
    fn default() -> Self {
        Self { services: Vec::new(), slot_minutes: 30, confirmation_email: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Portfolio {
    pub galleries: Vec<String>,
    pub show_clients: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub sitemap: bool,
}

impl Default for Seo {
    fn default() -> Self {
        Self {
            meta_title: String::new(),
            meta_description: String::new(),
            keywords: Vec::new(),
            sitemap: true,
        }
    }
}

/// Schema marker for [`WebsiteConfig`].
#[derive(Debug, Clone, Copy)]
pub struct WebsiteSchema;

impl ConfigSchema for WebsiteSchema {
    type Config = WebsiteConfig;

    const PIPELINE: PipelineKind = PipelineKind::Website;

    const ENUM_FIELDS: &'static [EnumField] = &[
        CorporateIdentity::tone_field(&["corporateIdentity", "tone"]),
        EnumField { path: &["content", "tone"], allowed: Tone::NAMES },
        Hosting::PROVIDER_FIELD,
    ];

    const LEGACY_MARKERS: &'static [LegacyMarker] = &[
        LegacyMarker::Field("businessName"),
        LegacyMarker::Field("websiteType"),
        LegacyMarker::Field("brandColors"),
        LegacyMarker::ListInPlaceOfBlock("pages"),
        LegacyMarker::MissingBlock("meta"),
    ];

    const LEGACY_FIELDS: &'static [LegacyField] = &[
        LegacyField::moved("businessName", &["meta", "businessName"]),
        LegacyField::moved("projectName", &["meta", "projectName"]),
        LegacyField::moved("description", &["meta", "description"]),
        LegacyField::appended("websiteType", &["websiteTypes"]),
        LegacyField::moved("brandColors", &["corporateIdentity", "brandColors"]),
        LegacyField::moved("logoUrl", &["corporateIdentity", "logoUrl"]),
        LegacyField::element("fonts", 0, &["corporateIdentity", "primaryFont"]),
        LegacyField::element("fonts", 1, &["corporateIdentity", "secondaryFont"]),
        LegacyField::moved("pages", &["pages", "selected"]),
        LegacyField::moved("productCategories", &["commerce", "productCategories"]),
        LegacyField::moved("paymentMethods", &["commerce", "paymentProviders"]),
        LegacyField::moved("blogCategories", &["blog", "categories"]),
        LegacyField::moved("services", &["booking", "services"]),
        LegacyField::moved("seoKeywords", &["seo", "keywords"]),
        LegacyField::moved("domain", &["hosting", "customDomain"]),
        LegacyField::renamed(
            "hostingProvider",
            &["hosting", "provider"],
            &[("self", "self-hosted"), ("selfhosted", "self-hosted"), ("on-premise", "self-hosted")],
        ),
    ];

    fn steps() -> &'static StepPlan<WebsiteConfig> {
        &WEBSITE_STEPS
    }

    fn validate(config: &WebsiteConfig) -> Result<(), AppError> {
        let currency = &config.commerce.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(AppError::invalid_field(
                "commerce.currency",
                format!("'{}' is not an ISO 4217 code", currency),
            ));
        }
        if config.blog.posts_per_page == 0 {
            return Err(AppError::invalid_field("blog.postsPerPage", "must be greater than 0"));
        }
        if config.booking.slot_minutes == 0 {
            return Err(AppError::invalid_field("booking.slotMinutes", "must be greater than 0"));
        }
        config.corporate_identity.validate()?;
        config.hosting.validate()?;
        Ok(())
    }
}

fn sells_online(config: &WebsiteConfig) -> bool {
    config.has_type_in(COMMERCE_TYPES)
}

fn publishes_posts(config: &WebsiteConfig) -> bool {
    config.has_type_in(BLOG_TYPES)
}

fn takes_bookings(config: &WebsiteConfig) -> bool {
    config.has_type_in(BOOKING_TYPES)
}

fn shows_portfolio(config: &WebsiteConfig) -> bool {
    config.has_type_in(PORTFOLIO_TYPES)
}

static WEBSITE_STEPS: StepPlan<WebsiteConfig> = StepPlan {
    steps: &[
        WizardStep {
            ordinal: 1,
            title: "Project",
            fields: &["meta.projectName", "meta.businessName", "meta.description", "meta.language"],
        },
        WizardStep { ordinal: 2, title: "Website types", fields: &["websiteTypes"] },
        WizardStep {
            ordinal: 3,
            title: "Corporate identity",
            fields: &[
                "corporateIdentity.companyName",
                "corporateIdentity.slogan",
                "corporateIdentity.logoUrl",
            ],
        },
        WizardStep {
            ordinal: 4,
            title: "Colors & fonts",
            fields: &[
                "corporateIdentity.brandColors",
                "corporateIdentity.primaryFont",
                "corporateIdentity.secondaryFont",
                "corporateIdentity.tone",
            ],
        },
        WizardStep {
            ordinal: 5,
            title: "Audience",
            fields: &["audience.primaryAudience", "audience.goals"],
        },
        WizardStep { ordinal: 6, title: "Pages", fields: &["pages.selected", "pages.custom"] },
        WizardStep {
            ordinal: 7,
            title: "Content",
            fields: &["content.tone", "content.languages", "content.copywriting"],
        },
        WizardStep { ordinal: 8, title: "Navigation", fields: &["pages.selected"] },
        WizardStep { ordinal: 9, title: "Media", fields: &["corporateIdentity.logoUrl"] },
        WizardStep { ordinal: 10, title: "Contact", fields: &["meta.businessName"] },
        WizardStep {
            ordinal: 11,
            title: "Products",
            fields: &["commerce.productCategories", "commerce.currency"],
        },
        WizardStep {
            ordinal: 12,
            title: "Payments",
            fields: &["commerce.paymentProviders", "commerce.taxIncluded"],
        },
        WizardStep { ordinal: 13, title: "Shipping", fields: &["commerce.shippingRegions"] },
        WizardStep {
            ordinal: 14,
            title: "Blog",
            fields: &["blog.categories", "blog.postsPerPage", "blog.comments"],
        },
        WizardStep {
            ordinal: 15,
            title: "Booking",
            fields: &["booking.services", "booking.slotMinutes", "booking.confirmationEmail"],
        },
        WizardStep {
            ordinal: 16,
            title: "Portfolio",
            fields: &["portfolio.galleries", "portfolio.showClients"],
        },
        WizardStep {
            ordinal: 17,
            title: "SEO",
            fields: &["seo.metaTitle", "seo.metaDescription", "seo.keywords", "seo.sitemap"],
        },
        WizardStep {
            ordinal: 18,
            title: "Hosting",
            fields: &["hosting.provider", "hosting.customDomain", "hosting.region"],
        },
        WizardStep { ordinal: 19, title: "Review", fields: &[] },
    ],
    groups: &[
        StepGroup {
            name: "commerce",
            selector: "websiteTypes",
            ordinals: &[11, 12, 13],
            predicate: sells_online,
        },
        StepGroup { name: "blog", selector: "websiteTypes", ordinals: &[14], predicate: publishes_posts },
        StepGroup {
            name: "booking",
            selector: "websiteTypes",
            ordinals: &[15],
            predicate: takes_bookings,
        },
        StepGroup {
            name: "portfolio",
            selector: "websiteTypes",
            ordinals: &[16],
            predicate: shows_portfolio,
        },
    ],
};
