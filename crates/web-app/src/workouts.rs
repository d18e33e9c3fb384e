use std::{cell::RefCell, collections::HashSet};

use log::debug;
use treino_domain::{ExerciseID, Selection, WorkoutPlan, WorkoutService};

use crate::{Settings, notification::{self, Notification}};

/// Creates the initial plan for a category page, falling back to the configured start
/// category.
#[must_use]
pub fn initial_plan(category: Option<&str>, settings: &Settings) -> WorkoutPlan {
    let category = category.map_or_else(
        || settings.start_category().id().to_string(),
        ToString::to_string,
    );
    WorkoutPlan::new(Selection::new(&category, "", ""))
}

/// Which exercises show their weight history.
///
/// Exercises start expanded or collapsed as configured in the settings; toggling flips a single
/// exercise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryToggles {
    expanded_by_default: bool,
    toggled: HashSet<ExerciseID>,
}

impl HistoryToggles {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            expanded_by_default: settings.expand_history,
            toggled: HashSet::new(),
        }
    }

    #[must_use]
    pub fn is_expanded(&self, exercise_id: &ExerciseID) -> bool {
        self.expanded_by_default != self.toggled.contains(exercise_id)
    }

    pub fn toggle(&mut self, exercise_id: &ExerciseID) {
        if !self.toggled.remove(exercise_id) {
            self.toggled.insert(exercise_id.clone());
        }
    }
}

/// Fetches the workouts and applies them to `plan`.
///
/// The plan is not borrowed while the fetch is pending, so other fetches may be started in the
/// meantime. Only the result of the latest one is applied.
pub async fn refresh<S: WorkoutService>(
    service: &S,
    plan: &RefCell<WorkoutPlan>,
) -> Option<Notification> {
    let ticket = plan.borrow_mut().begin_fetch();
    let result = service.get_categories().await;
    match plan.borrow_mut().complete_fetch(ticket, result) {
        Ok(applied) => {
            if !applied {
                debug!("workouts changed while loading");
            }
            None
        }
        Err(err) => Some(notification::workouts_not_loaded(&err)),
    }
}
