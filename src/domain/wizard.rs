//! Wizard state container.
//!
//! Owns the live configuration, the step pointer and the completion flag.
//! Views observe it through subscriber callbacks instead of sharing the
//! configuration.

use serde_json::{Map, Value};

use crate::domain::AppError;
use crate::domain::coerce::sanitize_against;
use crate::domain::migration::{IngestRoute, ingest};
use crate::domain::schema::{ConfigSchema, FieldDescriptor, describe, resolve_defaults};
use crate::domain::steps::WizardStep;

/// Behaviour switches for a wizard instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    /// Move off the current step when an edit hides it: to the nearest
    /// preceding visible step, or the following one if none precedes.
    pub relocate_hidden_step: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self { relocate_hidden_step: true }
    }
}

/// State change published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    ConfigChanged,
    StepChanged { from: u8, to: u8 },
    Imported { route: IngestRoute },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle for an import whose contents are still being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Applied(IngestRoute),
    /// A later import started (or finished) before this one.
    Superseded,
    /// Contents were not JSON; the wizard is unchanged.
    Unparsable,
}

type Subscriber = Box<dyn FnMut(&WizardEvent)>;

pub struct Wizard<S: ConfigSchema> {
    config: S::Config,
    step: u8,
    completed: bool,
    options: WizardOptions,
    descriptor: FieldDescriptor,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    import_generation: u64,
}

impl<S: ConfigSchema> Default for Wizard<S> {
    fn default() -> Self {
        Self::new(WizardOptions::default())
    }
}

impl<S: ConfigSchema> Wizard<S> {
    /// Fresh wizard on step 1 with the schema defaults.
    pub fn new(options: WizardOptions) -> Self {
        Self {
            config: resolve_defaults::<S>(),
            step: 1,
            completed: false,
            options,
            descriptor: describe::<S>(),
            subscribers: Vec::new(),
            next_subscription: 0,
            import_generation: 0,
        }
    }

    pub fn config(&self) -> &S::Config {
        &self.config
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn current_step(&self) -> Option<&'static WizardStep> {
        S::steps().step(self.step)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn options(&self) -> WizardOptions {
        self.options
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn visible_steps(&self) -> Vec<u8> {
        S::steps().visible_steps(&self.config)
    }

    /// Whether the pointer sits on the last visible step.
    pub fn is_on_last_step(&self) -> bool {
        S::steps().next_step(&self.config, self.step).is_none()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&WizardEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Merge a partial document into the configuration.
    ///
    /// Blocks merge one level deep, so `{"auth": {"mfa": true}}` keeps the
    /// other `auth` fields. The result is re-coerced with the current
    /// configuration as fallback: a value of the wrong kind leaves the field
    /// unchanged and unknown keys are dropped. Returns whether anything
    /// changed.
    pub fn update(&mut self, partial: &Value) -> bool {
        let Value::Object(patch) = partial else {
            tracing::warn!(pipeline = %S::PIPELINE, "ignoring non-object update");
            return false;
        };
        let current = match serde_json::to_value(&self.config) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(pipeline = %S::PIPELINE, "configuration is not serializable: {err}");
                return false;
            }
        };

        let mut merged = current.clone();
        if let Value::Object(target) = &mut merged {
            merge_blocks(target, patch);
        }
        let next = sanitize_against(Some(&merged), &current, &self.descriptor);
        match serde_json::from_value::<S::Config>(next) {
            Ok(config) => self.replace_config(config),
            Err(err) => {
                tracing::warn!(pipeline = %S::PIPELINE, "update rejected: {err}");
                false
            }
        }
    }

    /// Typed edit for Rust callers. Returns whether anything changed.
    pub fn edit<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut S::Config),
    {
        let mut config = self.config.clone();
        change(&mut config);
        self.replace_config(config)
    }

    /// Replace the configuration with the ingestion result of `raw`.
    ///
    /// Resets the step to 1 and clears completion. Any import still being
    /// read is superseded.
    pub fn import_config(&mut self, raw: &Value) -> IngestRoute {
        self.import_generation += 1;
        self.apply_import(raw)
    }

    /// Parse and import text. Unparsable JSON is a silent no-op returning `false`.
    pub fn import_text(&mut self, text: &str) -> bool {
        match serde_json::from_str::<Value>(text) {
            Ok(raw) => {
                self.import_config(&raw);
                true
            }
            Err(err) => {
                tracing::debug!(pipeline = %S::PIPELINE, "ignoring unparsable import: {err}");
                false
            }
        }
    }

    /// Start an import whose contents arrive later; only the latest ticket applies.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.import_generation += 1;
        ImportTicket(self.import_generation)
    }

    pub fn finish_import(&mut self, ticket: ImportTicket, text: &str) -> ImportOutcome {
        if ticket.0 != self.import_generation {
            tracing::debug!(pipeline = %S::PIPELINE, "dropping superseded import");
            return ImportOutcome::Superseded;
        }
        match serde_json::from_str::<Value>(text) {
            Ok(raw) => ImportOutcome::Applied(self.apply_import(&raw)),
            Err(err) => {
                tracing::debug!(pipeline = %S::PIPELINE, "ignoring unparsable import: {err}");
                ImportOutcome::Unparsable
            }
        }
    }

    /// Move the pointer. Unguarded: callers pass ordinals from [`Self::visible_steps`].
    pub fn set_step(&mut self, step: u8) {
        self.move_to(step);
    }

    pub fn next(&mut self) -> Option<u8> {
        let next = S::steps().next_step(&self.config, self.step)?;
        self.move_to(next);
        Some(next)
    }

    pub fn previous(&mut self) -> Option<u8> {
        let previous = S::steps().prev_step(&self.config, self.step)?;
        self.move_to(previous);
        Some(previous)
    }

    /// Mark the wizard complete and hand out an owned snapshot.
    pub fn complete(&mut self) -> S::Config {
        self.completed = true;
        self.emit(&WizardEvent::Completed);
        self.config.clone()
    }

    /// Back to defaults on step 1.
    pub fn reset(&mut self) {
        self.import_generation += 1;
        self.completed = false;
        self.replace_config(resolve_defaults::<S>());
        self.move_to(1);
    }

    /// Bare configuration JSON, as written by exports.
    pub fn export(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(&self.config)?)
    }

    fn apply_import(&mut self, raw: &Value) -> IngestRoute {
        let ingested = ingest::<S>(raw);
        self.config = ingested.config;
        self.completed = false;
        self.emit(&WizardEvent::Imported { route: ingested.route });
        self.move_to(1);
        ingested.route
    }

    fn replace_config(&mut self, config: S::Config) -> bool {
        if config == self.config {
            return false;
        }
        self.config = config;
        self.emit(&WizardEvent::ConfigChanged);
        self.relocate_if_hidden();
        true
    }

    fn relocate_if_hidden(&mut self) {
        let plan = S::steps();
        if !self.options.relocate_hidden_step || plan.is_visible(&self.config, self.step) {
            return;
        }
        let target = plan
            .prev_step(&self.config, self.step)
            .or_else(|| plan.next_step(&self.config, self.step));
        if let Some(target) = target {
            tracing::debug!(pipeline = %S::PIPELINE, from = self.step, to = target, "current step hidden, relocating");
            self.move_to(target);
        }
    }

    fn move_to(&mut self, to: u8) {
        let from = self.step;
        if from == to {
            return;
        }
        self.step = to;
        self.emit(&WizardEvent::StepChanged { from, to });
    }

    fn emit(&mut self, event: &WizardEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }
}

fn merge_blocks(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(Value::Object(block)), Value::Object(fields)) => {
                for (field, field_value) in fields {
                    block.insert(field.clone(), field_value.clone());
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
