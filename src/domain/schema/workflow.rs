//! Automation workflow configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigSchema, EnumField, config_enum};
use crate::domain::migration::{LegacyField, LegacyMarker};
use crate::domain::steps::{StepGroup, StepPlan, WizardStep};
use crate::domain::{AppError, PipelineKind};

config_enum! {
    /// What starts a workflow run.
    pub enum TriggerKind default Manual {
        Manual => "manual",
        Schedule => "schedule",
        Webhook => "webhook",
        Event => "event",
    }
}

config_enum! {
    /// Behaviour after retries are exhausted.
    pub enum FailurePolicy default Stop {
        Stop => "stop",
        Continue => "continue",
        Notify => "notify",
    }
}

/// Root configuration produced by the workflow wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct WorkflowConfig {
    pub meta: WorkflowMeta,
    pub trigger: Trigger,
    pub actions: Actions,
    pub notifications: Notifications,
    pub error_handling: ErrorHandling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct WorkflowMeta {
    pub name: String,
    pub description: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Trigger {
    pub kind: TriggerKind,
    /// Five-field cron expression, used when `kind` is `schedule`.
    pub cron: String,
    pub webhook_path: String,
    pub event: String,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            kind: TriggerKind::default(),
            cron: "0 9 * * 1".to_string(),
            webhook_path: "/hooks/workflow".to_string(),
            event: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Actions {
    pub steps: Vec<String>,
    pub integrations: Vec<String>,
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Notifications {
    pub enabled: bool,
    pub channels: Vec<String>,
    pub recipients: Vec<String>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self { enabled: false, channels: vec!["email".to_string()], recipients: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ErrorHandling {
    pub retries: u64,
    pub retry_delay_seconds: u64,
    pub on_failure: FailurePolicy,
}

impl Default for ErrorHandling {
    fn default() -> Self {
        Self { retries: 3, retry_delay_seconds: 60, on_failure: FailurePolicy::default() }
    }
}

const MAX_RETRIES: u64 = 10;

/// Schema marker for [`WorkflowConfig`].
#[derive(Debug, Clone, Copy)]
pub struct WorkflowSchema;

impl ConfigSchema for WorkflowSchema {
    type Config = WorkflowConfig;

    const PIPELINE: PipelineKind = PipelineKind::Workflow;

    const ENUM_FIELDS: &'static [EnumField] = &[
        EnumField { path: &["trigger", "kind"], allowed: TriggerKind::NAMES },
        EnumField { path: &["errorHandling", "onFailure"], allowed: FailurePolicy::NAMES },
    ];

    const LEGACY_MARKERS: &'static [LegacyMarker] = &[
        LegacyMarker::Field("workflowName"),
        LegacyMarker::Field("triggerType"),
        LegacyMarker::ScalarInPlaceOfBlock("trigger"),
        LegacyMarker::ListInPlaceOfBlock("notifications"),
        LegacyMarker::MissingBlock("meta"),
    ];

    const LEGACY_FIELDS: &'static [LegacyField] = &[
        LegacyField::moved("workflowName", &["meta", "name"]),
        LegacyField::moved("description", &["meta", "description"]),
        LegacyField::moved("owner", &["meta", "owner"]),
        LegacyField::renamed(
            "triggerType",
            &["trigger", "kind"],
            &[("cron", "schedule"), ("scheduled", "schedule"), ("http", "webhook"), ("hook", "webhook")],
        ),
        LegacyField::renamed(
            "trigger",
            &["trigger", "kind"],
            &[("cron", "schedule"), ("scheduled", "schedule"), ("http", "webhook"), ("hook", "webhook")],
        ),
        LegacyField::moved("schedule", &["trigger", "cron"]),
        LegacyField::moved("webhookUrl", &["trigger", "webhookPath"]),
        LegacyField::moved("steps", &["actions", "steps"]),
        LegacyField::moved("integrations", &["actions", "integrations"]),
        LegacyField::moved("notifications", &["notifications", "channels"]),
        LegacyField::flag("notifications", &["notifications", "enabled"]),
        LegacyField::appended("notifyEmail", &["notifications", "recipients"]),
        LegacyField::flag("notifyEmail", &["notifications", "enabled"]),
        LegacyField::moved("maxRetries", &["errorHandling", "retries"]),
    ];

    fn steps() -> &'static StepPlan<WorkflowConfig> {
        &WORKFLOW_STEPS
    }

    fn validate(config: &WorkflowConfig) -> Result<(), AppError> {
        let trigger = &config.trigger;
        if trigger.kind == TriggerKind::Schedule && trigger.cron.split_whitespace().count() != 5 {
            return Err(AppError::invalid_field(
                "trigger.cron",
                format!("'{}' must have five fields", trigger.cron),
            ));
        }
        if trigger.kind == TriggerKind::Webhook && !trigger.webhook_path.starts_with('/') {
            return Err(AppError::invalid_field("trigger.webhookPath", "must start with '/'"));
        }
        if config.error_handling.retries > MAX_RETRIES {
            return Err(AppError::invalid_field(
                "errorHandling.retries",
                format!("must be at most {}", MAX_RETRIES),
            ));
        }
        Ok(())
    }
}

fn is_scheduled(config: &WorkflowConfig) -> bool {
    config.trigger.kind == TriggerKind::Schedule
}

fn is_webhook(config: &WorkflowConfig) -> bool {
    config.trigger.kind == TriggerKind::Webhook
}

fn notifies(config: &WorkflowConfig) -> bool {
    config.notifications.enabled
}

static WORKFLOW_STEPS: StepPlan<WorkflowConfig> = StepPlan {
    steps: &[
        WizardStep {
            ordinal: 1,
            title: "Basics",
            fields: &["meta.name", "meta.description", "meta.owner"],
        },
        WizardStep { ordinal: 2, title: "Trigger", fields: &["trigger.kind"] },
        WizardStep { ordinal: 3, title: "Schedule", fields: &["trigger.cron"] },
        WizardStep { ordinal: 4, title: "Webhook", fields: &["trigger.webhookPath"] },
        WizardStep {
            ordinal: 5,
            title: "Actions",
            fields: &["actions.steps", "actions.integrations", "actions.parallel", "trigger.event"],
        },
        WizardStep {
            ordinal: 6,
            title: "Notifications",
            fields: &["notifications.enabled", "notifications.channels", "notifications.recipients"],
        },
        WizardStep {
            ordinal: 7,
            title: "Error handling",
            fields: &[
                "errorHandling.retries",
                "errorHandling.retryDelaySeconds",
                "errorHandling.onFailure",
            ],
        },
        WizardStep { ordinal: 8, title: "Review", fields: &[] },
    ],
    groups: &[
        StepGroup {
            name: "schedule",
            selector: "trigger.kind",
            ordinals: &[3],
            predicate: is_scheduled,
        },
        StepGroup { name: "webhook", selector: "trigger.kind", ordinals: &[4], predicate: is_webhook },
        StepGroup {
            name: "notifications",
            selector: "notifications.enabled",
            ordinals: &[6],
            predicate: notifies,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::describe;

    #[test]
    fn defaults_are_valid() {
        assert!(WorkflowSchema::validate(&WorkflowConfig::default()).is_ok());
    }

    #[test]
    fn schedule_requires_five_field_cron() {
        let mut config = WorkflowConfig::default();
        config.trigger.kind = TriggerKind::Schedule;
        config.trigger.cron = "every monday".to_string();
        let err = WorkflowSchema::validate(&config).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { path, .. } if path == "trigger.cron"));
    }

    #[test]
    fn retries_are_capped() {
        let mut config = WorkflowConfig::default();
        config.error_handling.retries = 11;
        assert!(WorkflowSchema::validate(&config).is_err());
    }

    #[test]
    fn manual_trigger_hides_schedule_and_webhook() {
        let config = WorkflowConfig::default();
        assert_eq!(WORKFLOW_STEPS.visible_steps(&config), vec![1, 2, 5, 7, 8]);
    }

    #[test]
    fn webhook_trigger_shows_webhook_step() {
        let mut config = WorkflowConfig::default();
        config.trigger.kind = TriggerKind::Webhook;
        config.notifications.enabled = true;
        assert_eq!(WORKFLOW_STEPS.visible_steps(&config), vec![1, 2, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn step_fields_exist_in_schema() {
        let descriptor = describe::<WorkflowSchema>();
        for step in WORKFLOW_STEPS.steps {
            for field in step.fields {
                let path: Vec<&str> = field.split('.').collect();
                assert!(descriptor.at(&path).is_some(), "unknown field {field}");
            }
        }
        assert!(WORKFLOW_STEPS.check().is_ok());
    }
}
