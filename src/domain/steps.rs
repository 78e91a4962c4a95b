//! Step visibility: which wizard steps are reachable for a configuration.

use crate::domain::AppError;

/// One wizard screen.
#[derive(Debug, Clone, Copy)]
pub struct WizardStep {
    pub ordinal: u8,
    pub title: &'static str,
    /// Dotted field paths edited on this step.
    pub fields: &'static [&'static str],
}

/// Steps shown only while `predicate` holds for the configuration.
#[derive(Debug)]
pub struct StepGroup<C: 'static> {
    pub name: &'static str,
    /// Field the predicate reads.
    pub selector: &'static str,
    pub ordinals: &'static [u8],
    pub predicate: fn(&C) -> bool,
}

/// Canonical step sequence of a pipeline plus its conditional groups.
///
/// Steps not covered by any group are always visible. Visibility never
/// reorders steps; it only filters the canonical sequence.
#[derive(Debug)]
pub struct StepPlan<C: 'static> {
    pub steps: &'static [WizardStep],
    pub groups: &'static [StepGroup<C>],
}

impl<C> StepPlan<C> {
    /// Ordinal of the final step.
    pub fn last(&self) -> u8 {
        self.steps.last().map(|step| step.ordinal).unwrap_or(0)
    }

    pub fn step(&self, ordinal: u8) -> Option<&WizardStep> {
        self.steps.iter().find(|step| step.ordinal == ordinal)
    }

    /// Group controlling `ordinal`, if it is conditional.
    pub fn group_of(&self, ordinal: u8) -> Option<&StepGroup<C>> {
        self.groups.iter().find(|group| group.ordinals.contains(&ordinal))
    }

    pub fn is_visible(&self, config: &C, ordinal: u8) -> bool {
        if self.step(ordinal).is_none() {
            return false;
        }
        match self.group_of(ordinal) {
            Some(group) => (group.predicate)(config),
            None => true,
        }
    }

    /// Visible ordinals in canonical order.
    pub fn visible_steps(&self, config: &C) -> Vec<u8> {
        let hidden: Vec<u8> = self
            .groups
            .iter()
            .filter(|group| !(group.predicate)(config))
            .flat_map(|group| group.ordinals.iter().copied())
            .collect();
        self.steps
            .iter()
            .map(|step| step.ordinal)
            .filter(|ordinal| !hidden.contains(ordinal))
            .collect()
    }

    /// First visible step after `current`; `current` itself may be hidden.
    pub fn next_step(&self, config: &C, current: u8) -> Option<u8> {
        self.visible_steps(config).into_iter().find(|ordinal| *ordinal > current)
    }

    /// Last visible step before `current`; `current` itself may be hidden.
    pub fn prev_step(&self, config: &C, current: u8) -> Option<u8> {
        self.visible_steps(config).into_iter().rev().find(|ordinal| *ordinal < current)
    }

    /// Structural check: ordinals run 1..=N without gaps and every group
    /// references existing steps, with no step in two groups.
    pub fn check(&self) -> Result<(), AppError> {
        for (index, step) in self.steps.iter().enumerate() {
            if usize::from(step.ordinal) != index + 1 {
                return Err(AppError::validation(format!(
                    "step '{}' has ordinal {}, expected {}",
                    step.title,
                    step.ordinal,
                    index + 1
                )));
            }
        }
        let mut seen: Vec<u8> = Vec::new();
        for group in self.groups {
            for ordinal in group.ordinals {
                if self.step(*ordinal).is_none() {
                    return Err(AppError::validation(format!(
                        "group '{}' references unknown step {}",
                        group.name, ordinal
                    )));
                }
                if seen.contains(ordinal) {
                    return Err(AppError::validation(format!(
                        "step {} belongs to more than one group",
                        ordinal
                    )));
                }
                seen.push(*ordinal);
            }
        }
        Ok(())
    }
}
