//! Interactive wizard walk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use dialoguer::{Confirm, Error as DialoguerError, Input, Select};
use serde_json::{Map, Value};

use crate::app::api;
use crate::app::config::ToolConfig;
use crate::domain::coerce::value_at;
use crate::domain::{
    AppError, ConfigSchema, FieldDescriptor, FieldKind, PipelineKind, PresetSchema, WebsiteSchema,
    Wizard, WorkflowSchema,
};

pub fn run_wizard(
    pipeline: Option<PipelineKind>,
    from: Option<&Path>,
    config: &ToolConfig,
) -> Result<(), AppError> {
    let pipeline = pipeline.unwrap_or(config.wizard.default_pipeline);
    match pipeline {
        PipelineKind::Preset => walk::<PresetSchema>(from, config),
        PipelineKind::Workflow => walk::<WorkflowSchema>(from, config),
        PipelineKind::Website => walk::<WebsiteSchema>(from, config),
        PipelineKind::Game => Err(AppError::UnsupportedPipeline(pipeline.to_string())),
    }
}

enum Navigation {
    Next,
    Back,
    Finish,
    Cancel,
}

fn walk<S: ConfigSchema>(from: Option<&Path>, config: &ToolConfig) -> Result<(), AppError> {
    let mut wizard = Wizard::<S>::new(config.wizard_options());
    wizard.subscribe(|event| tracing::debug!(?event, "wizard event"));

    println!("{} wizard", S::PIPELINE.display_name());
    if let Some(path) = from {
        if load_from(&mut wizard, path)? {
            println!("Loaded {}", path.display());
        }
    }

    loop {
        let Some(step) = wizard.current_step() else {
            return Err(AppError::Validation(format!("Wizard step {} does not exist", wizard.step())));
        };
        let visible = wizard.visible_steps();
        let position = visible.iter().position(|ordinal| *ordinal == step.ordinal).map_or(0, |i| i + 1);
        println!("\n[{}/{}] {}", position, visible.len(), step.title);

        for path in step.fields {
            let Some(value) = prompt_field(&wizard, path)? else {
                println!("Cancelled");
                return Ok(());
            };
            wizard.update(&patch_for(path, value));
        }

        // Edits may hide the current step; the wizard has already moved on.
        if wizard.step() != step.ordinal {
            continue;
        }

        match prompt_navigation(&wizard, position > 1)? {
            Navigation::Next => {
                wizard.next();
            }
            Navigation::Back => {
                wizard.previous();
            }
            Navigation::Finish => {
                let done = wizard.complete();
                let outcome = api::save(S::PIPELINE, &serde_json::to_value(&done)?, None)?;
                println!("✅ Saved {} configuration as {}", S::PIPELINE, outcome.id);
                return Ok(());
            }
            Navigation::Cancel => {
                println!("Cancelled");
                return Ok(());
            }
        }
    }
}

/// Seed the wizard from a file. Text that is not JSON leaves the defaults in place.
fn load_from<S: ConfigSchema>(wizard: &mut Wizard<S>, path: &Path) -> Result<bool, AppError> {
    let text = fs::read_to_string(path)?;
    Ok(wizard.import_text(&text))
}

fn prompt_navigation<S: ConfigSchema>(
    wizard: &Wizard<S>,
    can_go_back: bool,
) -> Result<Navigation, AppError> {
    let mut choices = Vec::new();
    if wizard.is_on_last_step() {
        choices.push(("Finish and save", Navigation::Finish));
    } else {
        choices.push(("Next", Navigation::Next));
    }
    if can_go_back {
        choices.push(("Back", Navigation::Back));
    }
    choices.push(("Cancel", Navigation::Cancel));

    let items: Vec<&str> = choices.iter().map(|(label, _)| *label).collect();
    let selection = Select::new()
        .with_prompt("Continue")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Prompt(format!("Failed to select action: {}", err)))?;

    Ok(match selection {
        Some(index) => choices.swap_remove(index).1,
        None => Navigation::Cancel,
    })
}

/// Prompt for one dotted field path. `None` means the user cancelled.
fn prompt_field<S: ConfigSchema>(wizard: &Wizard<S>, path: &str) -> Result<Option<Value>, AppError> {
    let segments: Vec<&str> = path.split('.').collect();
    let current = wizard.export()?;
    let current = value_at(&current, &segments).cloned().unwrap_or(Value::Null);
    let Some(descriptor) = wizard.descriptor().at(&segments) else {
        return Err(AppError::Validation(format!("Unknown wizard field '{}'", path)));
    };
    prompt_value(path, descriptor, current)
}

fn prompt_value(
    label: &str,
    descriptor: &FieldDescriptor,
    current: Value,
) -> Result<Option<Value>, AppError> {
    match &descriptor.kind {
        FieldKind::Enum { allowed } => {
            let default = current
                .as_str()
                .and_then(|value| allowed.iter().position(|option| option == value))
                .unwrap_or(0);
            let selection = Select::new()
                .with_prompt(label)
                .items(allowed)
                .default(default)
                .interact_opt()
                .map_err(|err| AppError::Prompt(format!("Failed to select {}: {}", label, err)))?;
            Ok(selection.map(|index| Value::String(allowed[index].clone())))
        }
        FieldKind::Boolean => {
            let answer = Confirm::new()
                .with_prompt(label)
                .default(current.as_bool().unwrap_or(false))
                .interact_opt()
                .map_err(|err| AppError::Prompt(format!("Failed to read {}: {}", label, err)))?;
            Ok(answer.map(Value::Bool))
        }
        FieldKind::Number => {
            let input = Input::<u64>::new()
                .with_prompt(label)
                .default(current.as_u64().unwrap_or(0))
                .interact_text();
            interrupted_as_none(label, input.map(Value::from))
        }
        FieldKind::String => {
            let input = Input::<String>::new()
                .with_prompt(label)
                .default(current.as_str().unwrap_or_default().to_string())
                .allow_empty(true)
                .interact_text();
            interrupted_as_none(label, input.map(Value::String))
        }
        FieldKind::StringList => {
            let joined = current
                .as_array()
                .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            let input = Input::<String>::new()
                .with_prompt(format!("{} (comma separated)", label))
                .default(joined)
                .allow_empty(true)
                .interact_text();
            interrupted_as_none(label, input.map(|text| split_list(&text)))
        }
        FieldKind::Object { .. } => Ok(Some(current)),
    }
}

fn interrupted_as_none(
    label: &str,
    result: Result<Value, DialoguerError>,
) -> Result<Option<Value>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Prompt(format!("Failed to read {}: {}", label, err))),
    }
}

fn split_list(text: &str) -> Value {
    Value::Array(
        text.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    )
}

/// Nest `value` under a dotted path: `a.b` becomes `{"a": {"b": value}}`.
fn patch_for(path: &str, value: Value) -> Value {
    path.rsplit('.').fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.to_string(), inner);
        Value::Object(map)
    })
}
