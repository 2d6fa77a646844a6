//! Ordered step sequence editing.
//!
//! [`StepEditor`] owns a recipe's steps and the draft being composed. Every
//! mutation leaves `order` equal to position + 1 across the whole sequence.

use crate::draft::{IngredientInput, StepDraft};
use crate::error::{EditorError, Rejection};
use crate::types::{renumber, IngredientEntry, Step};
use crate::validate::{validate_draft, validate_ingredient_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Where a step taken out by [`StepEditor::begin_edit`] goes when it is
/// appended again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReinsertPolicy {
    /// Edited steps land at the end of the sequence.
    #[default]
    MoveToEnd,
    /// Edited steps return to the position they were taken from.
    OriginalSlot,
}

#[derive(Debug, Clone)]
struct PendingEdit {
    index: usize,
    original: Step,
}

#[derive(Debug, Clone, Default)]
pub struct StepEditor {
    steps: Vec<Step>,
    draft: StepDraft,
    error: Option<Rejection>,
    policy: ReinsertPolicy,
    pending: Option<PendingEdit>,
}

impl StepEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReinsertPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Start from an existing sequence, e.g. a persisted recipe's steps.
    pub fn from_steps(mut steps: Vec<Step>) -> Self {
        renumber(&mut steps);
        Self {
            steps,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ReinsertPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ReinsertPolicy) {
        self.policy = policy;
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn draft(&self) -> &StepDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut StepDraft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: StepDraft) {
        self.draft = draft;
    }

    /// The reason the last rejected operation failed, if it has not been
    /// cleared by a later successful one.
    pub fn error(&self) -> Option<&Rejection> {
        self.error.as_ref()
    }

    /// True while a step taken out by `begin_edit` has not been re-appended.
    pub fn is_editing(&self) -> bool {
        self.pending.is_some()
    }

    /// Admit the draft as a new step.
    ///
    /// Returns the index the step landed at. On rejection the sequence and
    /// draft are left untouched and the reason becomes the current error.
    pub fn append(&mut self) -> Result<usize, Rejection> {
        let body = match validate_draft(&self.draft) {
            Ok(body) => body,
            Err(rejection) => {
                tracing::debug!(reason = %rejection, "step rejected");
                self.error = Some(rejection.clone());
                return Err(rejection);
            }
        };

        let index = match (self.policy, self.pending.take()) {
            (ReinsertPolicy::OriginalSlot, Some(edit)) => edit.index.min(self.steps.len()),
            _ => self.steps.len(),
        };

        self.steps.insert(index, Step::new(index as u32 + 1, body));
        renumber(&mut self.steps);
        self.draft = StepDraft::default();
        self.error = None;

        tracing::debug!(index, len = self.steps.len(), "step appended");
        Ok(index)
    }

    /// Remove the step at `index` and renumber the rest.
    pub fn remove_at(&mut self, index: usize) -> Result<Step, EditorError> {
        self.check_index(index)?;
        let removed = self.steps.remove(index);
        renumber(&mut self.steps);
        tracing::debug!(index, len = self.steps.len(), "step removed");
        Ok(removed)
    }

    /// Swap the step at `index` with its neighbour in `direction`.
    ///
    /// Returns `Ok(false)` without changing anything when there is no
    /// neighbour on that side.
    pub fn move_one_step(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<bool, EditorError> {
        self.check_index(index)?;

        let neighbour = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.steps.len() => index + 1,
            _ => return Ok(false),
        };

        self.steps.swap(index, neighbour);
        self.steps[index].order = index as u32 + 1;
        self.steps[neighbour].order = neighbour as u32 + 1;
        Ok(true)
    }

    /// Take the step at `index` out of the sequence and load it into the
    /// draft. Where it goes when re-appended depends on the policy.
    ///
    /// Any edit already in progress is cancelled first.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), EditorError> {
        self.check_index(index)?;
        let step = self.steps.remove(index);

        let mut slot = index;
        if let Some(previous) = self.pending.take() {
            let restore_at = previous.index.min(self.steps.len());
            if restore_at <= slot {
                slot += 1;
            }
            self.steps.insert(restore_at, previous.original);
        }
        renumber(&mut self.steps);

        self.draft = StepDraft::from_step(&step.body);
        self.error = None;
        self.pending = Some(PendingEdit {
            index: slot,
            original: step,
        });
        tracing::debug!(index, "editing step");
        Ok(())
    }

    /// Abandon an edit in progress, putting the untouched step back where
    /// it was and clearing the draft. Returns false if nothing was pending.
    pub fn cancel_edit(&mut self) -> bool {
        let Some(edit) = self.pending.take() else {
            return false;
        };
        let index = edit.index.min(self.steps.len());
        self.steps.insert(index, edit.original);
        renumber(&mut self.steps);
        self.draft = StepDraft::default();
        self.error = None;
        true
    }

    /// Validate an ingredient against the draft's pending list and add it.
    pub fn add_ingredient_to_draft(&mut self, input: &IngredientInput) -> Result<(), Rejection> {
        match validate_ingredient_input(input, &self.draft.ingredients) {
            Ok(entry) => {
                self.draft.ingredients.push(entry);
                self.error = None;
                Ok(())
            }
            Err(rejection) => {
                tracing::debug!(reason = %rejection, "ingredient rejected");
                self.error = Some(rejection.clone());
                Err(rejection)
            }
        }
    }

    pub fn remove_ingredient_from_draft(
        &mut self,
        index: usize,
    ) -> Result<IngredientEntry, EditorError> {
        let len = self.draft.ingredients.len();
        if index >= len {
            return Err(EditorError::IngredientIndexOutOfRange { index, len });
        }
        Ok(self.draft.ingredients.remove(index))
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.steps.len() {
            Ok(())
        } else {
            Err(EditorError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepBody;

    fn orders(editor: &StepEditor) -> Vec<u32> {
        editor.steps().iter().map(|s| s.order).collect()
    }

    fn descriptions(editor: &StepEditor) -> Vec<String> {
        editor
            .steps()
            .iter()
            .map(|s| s.body.description().to_string())
            .collect()
    }

    fn editor_with(names: &[&str]) -> StepEditor {
        let mut editor = StepEditor::new();
        for name in names {
            editor.set_draft(StepDraft::description(name));
            editor.append().unwrap();
        }
        editor
    }

    #[test]
    fn test_append_assigns_next_order_and_clears_draft() {
        let mut editor = StepEditor::new();
        editor.set_draft(StepDraft::action("chop", "Chop the onion"));
        assert_eq!(editor.append(), Ok(0));
        assert_eq!(orders(&editor), vec![1]);
        assert_eq!(editor.draft(), &StepDraft::default());
    }

    #[test]
    fn test_rejected_append_keeps_sequence_and_draft() {
        let mut editor = editor_with(&["one"]);
        let draft = StepDraft::action("mix", "Stir").with_speed("11");
        editor.set_draft(draft.clone());

        assert_eq!(editor.append(), Err(Rejection::SpeedOutOfRange));
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.draft(), &draft);
        assert_eq!(editor.error(), Some(&Rejection::SpeedOutOfRange));

        editor.draft_mut().speed = "10".to_string();
        editor.append().unwrap();
        assert_eq!(editor.error(), None);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut editor = editor_with(&["a", "b", "c", "d"]);
        let removed = editor.remove_at(1).unwrap();
        assert_eq!(removed.body.description(), "b");
        assert_eq!(descriptions(&editor), vec!["a", "c", "d"]);
        assert_eq!(orders(&editor), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut editor = editor_with(&["a"]);
        assert_eq!(
            editor.remove_at(1),
            Err(EditorError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_move_boundaries_are_noops() {
        let mut editor = editor_with(&["a", "b", "c"]);
        assert_eq!(editor.move_one_step(0, MoveDirection::Up), Ok(false));
        assert_eq!(editor.move_one_step(2, MoveDirection::Down), Ok(false));
        assert_eq!(descriptions(&editor), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_swaps_neighbours() {
        let mut editor = editor_with(&["a", "b", "c"]);
        assert_eq!(editor.move_one_step(0, MoveDirection::Down), Ok(true));
        assert_eq!(descriptions(&editor), vec!["b", "a", "c"]);
        assert_eq!(editor.move_one_step(2, MoveDirection::Up), Ok(true));
        assert_eq!(descriptions(&editor), vec!["b", "c", "a"]);
        assert_eq!(orders(&editor), vec![1, 2, 3]);
    }

    #[test]
    fn test_edit_moves_step_to_end() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.begin_edit(0).unwrap();
        assert_eq!(editor.draft().description, "a");
        assert_eq!(descriptions(&editor), vec!["b", "c"]);

        editor.draft_mut().description = "a, revised".to_string();
        assert_eq!(editor.append(), Ok(2));
        assert_eq!(descriptions(&editor), vec!["b", "c", "a, revised"]);
        assert_eq!(orders(&editor), vec![1, 2, 3]);
    }

    #[test]
    fn test_edit_with_original_slot_policy() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.set_policy(ReinsertPolicy::OriginalSlot);
        editor.begin_edit(1).unwrap();
        editor.draft_mut().description = "B".to_string();
        assert_eq!(editor.append(), Ok(1));
        assert_eq!(descriptions(&editor), vec!["a", "B", "c"]);
    }

    #[test]
    fn test_edit_restores_duration_in_minutes() {
        let mut editor = StepEditor::new();
        editor.set_draft(StepDraft::action("bake", "Bake").with_duration_minutes("20"));
        editor.append().unwrap();

        editor.begin_edit(0).unwrap();
        assert_eq!(editor.draft().duration_minutes, "20");
        editor.append().unwrap();
        match &editor.steps()[0].body {
            StepBody::Action(action) => assert_eq!(action.duration_secs, Some(1200)),
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_edit_puts_step_back() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.begin_edit(1).unwrap();
        assert!(editor.is_editing());
        assert!(editor.cancel_edit());
        assert_eq!(descriptions(&editor), vec!["a", "b", "c"]);
        assert!(!editor.cancel_edit());
    }

    #[test]
    fn test_second_begin_edit_cancels_first() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.begin_edit(0).unwrap();
        assert_eq!(descriptions(&editor), vec!["b", "c"]);

        editor.begin_edit(1).unwrap();
        assert_eq!(editor.draft().description, "c");
        assert_eq!(descriptions(&editor), vec!["a", "b"]);

        editor.set_policy(ReinsertPolicy::OriginalSlot);
        editor.append().unwrap();
        assert_eq!(descriptions(&editor), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_draft_ingredients() {
        let mut editor = StepEditor::new();
        editor.set_draft(StepDraft::ingredient("Add dairy"));
        editor
            .add_ingredient_to_draft(&IngredientInput::new("Milk", "200", "ml"))
            .unwrap();
        assert_eq!(
            editor.add_ingredient_to_draft(&IngredientInput::new("MILK", "1", "")),
            Err(Rejection::DuplicateIngredient("MILK".to_string()))
        );
        editor
            .add_ingredient_to_draft(&IngredientInput::new("Butter", "20", "g"))
            .unwrap();

        let removed = editor.remove_ingredient_from_draft(0).unwrap();
        assert_eq!(removed.name, "Milk");
        assert_eq!(
            editor.remove_ingredient_from_draft(5),
            Err(EditorError::IngredientIndexOutOfRange { index: 5, len: 1 })
        );

        editor.append().unwrap();
        assert_eq!(editor.steps()[0].ingredients()[0].name, "Butter");
    }

    #[test]
    fn test_from_steps_renumbers() {
        let editor = editor_with(&["a", "b"]);
        let mut steps = editor.into_steps();
        steps.reverse();
        let editor = StepEditor::from_steps(steps);
        assert_eq!(orders(&editor), vec![1, 2]);
        assert_eq!(descriptions(&editor), vec!["b", "a"]);
    }
}
