//! Admission rules for steps and ingredient entries.
//!
//! Rules are checked in a fixed order and the first failure wins.

use crate::draft::{IngredientInput, StepDraft};
use crate::error::Rejection;
use crate::types::{
    ActionKind, ActionStep, DescriptionStep, IngredientEntry, IngredientStep, StepBody, StepType,
    Unit,
};

pub const MIN_SPEED: i32 = 0;
pub const MAX_SPEED: i32 = 10;

/// Check a typed step against the per-variant rules.
pub fn validate_step(body: &StepBody) -> Result<(), Rejection> {
    match body {
        StepBody::Action(action) => {
            if action.description.trim().is_empty() {
                return Err(Rejection::EmptyDescription);
            }
            if let Some(speed) = action.speed {
                check_speed(speed)?;
            }
            if action.duration_secs == Some(0) {
                return Err(Rejection::NonPositiveDuration);
            }
            validate_entries(&action.ingredients)
        }
        StepBody::Ingredient(step) => {
            if step.ingredients.is_empty() {
                return Err(Rejection::NoIngredients);
            }
            validate_entries(&step.ingredients)
        }
        StepBody::Description(step) => {
            if step.description.trim().is_empty() {
                return Err(Rejection::EmptyDescription);
            }
            Ok(())
        }
    }
}

/// Check one entry against the ingredient rule, including the
/// duplicate check against the other entries already in the same step.
pub fn validate_entry(entry: &IngredientEntry, siblings: &[IngredientEntry]) -> Result<(), Rejection> {
    let name = entry.name.trim();
    if name.is_empty() {
        return Err(Rejection::EmptyIngredientName);
    }
    check_amount(name, &entry.amount)?;
    if siblings.iter().any(|other| other.same_name(name)) {
        return Err(Rejection::DuplicateIngredient(name.to_string()));
    }
    Ok(())
}

fn validate_entries(entries: &[IngredientEntry]) -> Result<(), Rejection> {
    for (idx, entry) in entries.iter().enumerate() {
        validate_entry(entry, &entries[..idx])?;
    }
    Ok(())
}

/// Turn raw ingredient input into an entry, checked against `siblings`.
pub fn validate_ingredient_input(
    input: &IngredientInput,
    siblings: &[IngredientEntry],
) -> Result<IngredientEntry, Rejection> {
    admit_entry(input.name.trim(), input.amount.trim(), &input.unit, siblings)
}

/// Check raw entry fields in rule order: name, amount, unit, duplicates.
///
/// Name and amount text are kept exactly as given.
pub(crate) fn admit_entry(
    name: &str,
    amount: &str,
    unit: &str,
    siblings: &[IngredientEntry],
) -> Result<IngredientEntry, Rejection> {
    if name.trim().is_empty() {
        return Err(Rejection::EmptyIngredientName);
    }
    check_amount(name.trim(), amount)?;

    let unit_text = unit.trim();
    let unit = if unit_text.is_empty() {
        None
    } else {
        Some(Unit::from_symbol(unit_text).ok_or_else(|| Rejection::UnknownUnit(unit_text.to_string()))?)
    };

    let entry = IngredientEntry::new(name, amount, unit);
    validate_entry(&entry, siblings)?;
    Ok(entry)
}

/// Turn a draft into a typed step body, or report the first broken rule.
pub fn validate_draft(draft: &StepDraft) -> Result<StepBody, Rejection> {
    let body = match draft.step_type {
        StepType::Action => StepBody::Action(action_from_draft(draft)?),
        StepType::Ingredient => {
            let description = draft.description.trim();
            StepBody::Ingredient(IngredientStep {
                description: (!description.is_empty()).then(|| description.to_string()),
                ingredients: draft.ingredients.clone(),
            })
        }
        StepType::Description => StepBody::Description(DescriptionStep {
            description: draft.description.trim().to_string(),
        }),
    };

    validate_step(&body)?;
    Ok(body)
}

fn action_from_draft(draft: &StepDraft) -> Result<ActionStep, Rejection> {
    let kind = check_action_kind(&draft.action)?;
    check_description(&draft.description)?;

    let temperature =
        parse_optional::<i32>(&draft.temperature).map_err(|_| Rejection::InvalidTemperature)?;

    let speed = parse_optional::<i32>(&draft.speed).map_err(|_| Rejection::InvalidSpeed)?;
    if let Some(speed) = speed {
        check_speed(speed)?;
    }

    let duration_secs = match draft.duration_minutes.trim() {
        "" => None,
        minutes => Some(minutes_to_seconds(minutes)?),
    };

    Ok(ActionStep {
        kind,
        description: draft.description.trim().to_string(),
        temperature,
        speed,
        duration_secs,
        ingredients: draft.ingredients.clone(),
    })
}

pub(crate) fn check_action_kind(label: &str) -> Result<ActionKind, Rejection> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Rejection::MissingActionKind);
    }
    ActionKind::from_label(label).ok_or_else(|| Rejection::UnknownActionKind(label.to_string()))
}

pub(crate) fn check_description(description: &str) -> Result<(), Rejection> {
    if description.trim().is_empty() {
        Err(Rejection::EmptyDescription)
    } else {
        Ok(())
    }
}

/// Seconds as stored; zero or less is rejected.
pub(crate) fn check_duration_secs(seconds: i64) -> Result<u32, Rejection> {
    if seconds <= 0 {
        return Err(Rejection::NonPositiveDuration);
    }
    u32::try_from(seconds).map_err(|_| Rejection::InvalidDuration)
}

fn parse_optional<T: std::str::FromStr>(raw: &str) -> Result<Option<T>, T::Err> {
    match raw.trim() {
        "" => Ok(None),
        value => value.parse().map(Some),
    }
}

pub(crate) fn check_speed(speed: i32) -> Result<(), Rejection> {
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(())
    } else {
        Err(Rejection::SpeedOutOfRange)
    }
}

fn check_amount(name: &str, amount: &str) -> Result<(), Rejection> {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(Rejection::InvalidAmount {
            name: name.to_string(),
        }),
    }
}

/// Minutes as typed by the author, converted to whole seconds.
fn minutes_to_seconds(minutes: &str) -> Result<u32, Rejection> {
    let minutes: f64 = minutes.parse().map_err(|_| Rejection::InvalidDuration)?;
    if !minutes.is_finite() {
        return Err(Rejection::InvalidDuration);
    }
    if minutes <= 0.0 {
        return Err(Rejection::NonPositiveDuration);
    }

    let seconds = (minutes * 60.0).round();
    if seconds < 1.0 {
        return Err(Rejection::NonPositiveDuration);
    }
    if seconds > f64::from(u32::MAX) {
        return Err(Rejection::InvalidDuration);
    }
    Ok(seconds as u32)
}
