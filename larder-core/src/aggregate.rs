//! Consolidated ingredient list for a whole recipe.
//!
//! Entries are merged when they share a name (case-insensitive) and unit.
//! No unit conversion is attempted: 1 l of milk and 200 ml of milk stay
//! separate lines.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Step, Unit};

/// One line of the consolidated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    /// Name as first seen in the recipe.
    pub name: String,
    pub amount: f64,
    pub unit: Option<Unit>,
}

/// Sum ingredient amounts across all steps, in first-seen order.
///
/// Entries whose amount is not a number are skipped.
pub fn aggregate(steps: &[Step]) -> Vec<AggregatedEntry> {
    let mut totals: Vec<AggregatedEntry> = Vec::new();
    let mut index: HashMap<(String, Option<Unit>), usize> = HashMap::new();

    for step in steps {
        for entry in step.ingredients() {
            let Some(amount) = entry.amount_value() else {
                tracing::warn!(
                    step = step.order,
                    ingredient = %entry.name,
                    amount = %entry.amount,
                    "skipping non-numeric amount"
                );
                continue;
            };

            let key = (entry.name.trim().to_lowercase(), entry.unit);
            match index.get(&key) {
                Some(&pos) => totals[pos].amount += amount,
                None => {
                    index.insert(key, totals.len());
                    totals.push(AggregatedEntry {
                        name: entry.name.trim().to_string(),
                        amount,
                        unit: entry.unit,
                    });
                }
            }
        }
    }

    totals
}

/// Render an amount without a trailing ".0" for whole numbers.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ActionKind, ActionStep, DescriptionStep, IngredientEntry, IngredientStep, StepBody,
    };

    fn ingredient_step(order: u32, entries: Vec<IngredientEntry>) -> Step {
        Step::new(
            order,
            StepBody::Ingredient(IngredientStep {
                description: None,
                ingredients: entries,
            }),
        )
    }

    #[test]
    fn test_merges_case_insensitively() {
        let steps = vec![ingredient_step(
            1,
            vec![
                IngredientEntry::new("Egg", "2", None),
                IngredientEntry::new("egg", "1", None),
            ],
        )];

        let result = aggregate(&steps);
        assert_eq!(
            result,
            vec![AggregatedEntry {
                name: "Egg".to_string(),
                amount: 3.0,
                unit: None
            }]
        );
    }

    #[test]
    fn test_different_units_stay_separate() {
        let steps = vec![
            ingredient_step(1, vec![IngredientEntry::new("Milk", "1", Some(Unit::Liters))]),
            ingredient_step(2, vec![IngredientEntry::new("milk", "200", Some(Unit::Milliliters))]),
        ];
        let result = aggregate(&steps);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].unit, Some(Unit::Liters));
        assert_eq!(result[1].unit, Some(Unit::Milliliters));
    }

    #[test]
    fn test_first_seen_order_across_variants() {
        let steps = vec![
            Step::new(
                1,
                StepBody::Action(ActionStep {
                    kind: ActionKind::Chop,
                    description: "Chop".to_string(),
                    temperature: None,
                    speed: None,
                    duration_secs: None,
                    ingredients: vec![IngredientEntry::new("Onion", "1", Some(Unit::Pieces))],
                }),
            ),
            Step::new(
                2,
                StepBody::Description(DescriptionStep {
                    description: "Wait".to_string(),
                }),
            ),
            ingredient_step(
                3,
                vec![
                    IngredientEntry::new("Butter", "30", Some(Unit::Grams)),
                    IngredientEntry::new("onion", "2", Some(Unit::Pieces)),
                ],
            ),
        ];

        let result = aggregate(&steps);
        let names: Vec<_> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Onion", "Butter"]);
        assert_eq!(result[0].amount, 3.0);
    }

    #[test]
    fn test_skips_non_numeric_amounts() {
        let steps = vec![ingredient_step(
            1,
            vec![
                IngredientEntry::new("Salt", "a pinch", None),
                IngredientEntry::new("Pepper", "1", None),
            ],
        )];
        let result = aggregate(&steps);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Pepper");
    }

    #[test]
    fn test_is_idempotent() {
        let steps = vec![ingredient_step(
            1,
            vec![IngredientEntry::new("Flour", "250", Some(Unit::Grams))],
        )];
        assert_eq!(aggregate(&steps), aggregate(&steps));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(1.5), "1.5");
    }
}
