use log::debug;

use crate::{Category, Day, ReadError, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Loading,
    Loaded,
    Failed,
}

/// Identifies one fetch of the workout data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// The loaded category trees together with the current selection.
///
/// Fetches may complete in any order. Only the completion of the most recently started fetch is
/// applied, older ones are discarded.
#[derive(Debug, Clone)]
pub struct WorkoutPlan {
    categories: Vec<Category>,
    selection: Selection,
    status: Status,
    latest_ticket: u64,
}

impl Default for WorkoutPlan {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

impl WorkoutPlan {
    #[must_use]
    pub fn new(selection: Selection) -> Self {
        Self {
            categories: vec![],
            selection,
            status: Status::Loading,
            latest_ticket: 0,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Loading has finished without yielding any workout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status != Status::Loading && self.categories.is_empty()
    }

    #[must_use]
    pub fn current_day(&self) -> Option<&Day> {
        self.selection.current_day(&self.categories)
    }

    pub fn select_category(&mut self, id: &str) {
        self.selection.set_category(id);
        self.selection.reconcile(&self.categories);
    }

    pub fn select_week(&mut self, id: &str) {
        self.selection.set_week(id);
        self.selection.reconcile(&self.categories);
    }

    pub fn select_day(&mut self, id: &str) {
        self.selection.set_day(id);
        self.selection.reconcile(&self.categories);
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.status = Status::Loading;
        FetchTicket(self.latest_ticket)
    }

    /// Applies the result of a fetch.
    ///
    /// Returns `Ok(false)` if a newer fetch has been started in the meantime and the result was
    /// discarded. A failed fetch clears the data and its error is passed on for reporting.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Category>, ReadError>,
    ) -> Result<bool, ReadError> {
        if ticket.0 != self.latest_ticket {
            debug!(
                "discarding stale workout data (fetch {} superseded by {})",
                ticket.0, self.latest_ticket
            );
            return Ok(false);
        }

        match result {
            Ok(categories) => {
                self.categories = categories;
                self.status = Status::Loaded;
                self.selection.reconcile(&self.categories);
                Ok(true)
            }
            Err(err) => {
                self.categories.clear();
                self.status = Status::Failed;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CategoryCode, StorageError, Week};

    fn week(id: &str, days: &[&str]) -> Week {
        Week {
            id: id.to_string(),
            name: id.to_string(),
            days: days
                .iter()
                .map(|day| Day {
                    id: (*day).to_string(),
                    name: (*day).to_string(),
                    exercises: vec![],
                })
                .collect(),
        }
    }

    fn categories(weeks: Vec<Week>) -> Vec<Category> {
        vec![Category {
            id: CategoryCode::Gym,
            name: "Academia".to_string(),
            weeks,
        }]
    }

    #[test]
    fn test_initial_state() {
        let plan = WorkoutPlan::default();

        assert!(plan.is_loading());
        assert!(!plan.is_empty());
        assert_eq!(plan.current_day(), None);
    }

    #[test]
    fn test_complete_fetch() {
        let mut plan = WorkoutPlan::new(Selection::new("gym", "", ""));

        let ticket = plan.begin_fetch();

        assert!(
            plan.complete_fetch(ticket, Ok(categories(vec![week("week1", &["day1", "day2"])])))
                .unwrap()
        );
        assert_eq!(plan.status(), Status::Loaded);
        assert_eq!(plan.selection(), &Selection::new("gym", "week1", "day1"));
        assert_eq!(plan.current_day().map(|d| d.id.as_str()), Some("day1"));
    }

    #[test]
    fn test_complete_fetch_without_data() {
        let mut plan = WorkoutPlan::default();

        let ticket = plan.begin_fetch();

        assert!(plan.complete_fetch(ticket, Ok(vec![])).unwrap());
        assert!(!plan.is_loading());
        assert!(plan.is_empty());
        assert_eq!(plan.current_day(), None);
    }

    #[test]
    fn test_complete_fetch_with_error() {
        let mut plan = WorkoutPlan::new(Selection::new("gym", "", ""));
        let ticket = plan.begin_fetch();
        plan.complete_fetch(ticket, Ok(categories(vec![week("week1", &["day1"])])))
            .unwrap();

        let ticket = plan.begin_fetch();

        assert!(matches!(
            plan.complete_fetch(ticket, Err(StorageError::NoConnection.into())),
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
        assert_eq!(plan.status(), Status::Failed);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut plan = WorkoutPlan::new(Selection::new("gym", "", ""));

        let first = plan.begin_fetch();
        let second = plan.begin_fetch();

        assert!(
            plan.complete_fetch(second, Ok(categories(vec![week("week2", &["day3"])])))
                .unwrap()
        );
        assert!(
            !plan
                .complete_fetch(first, Ok(categories(vec![week("week1", &["day1"])])))
                .unwrap()
        );
        assert!(
            !plan
                .complete_fetch(first, Err(StorageError::NoConnection.into()))
                .unwrap()
        );
        assert_eq!(plan.status(), Status::Loaded);
        assert_eq!(plan.current_day().map(|d| d.id.as_str()), Some("day3"));
    }

    #[test]
    fn test_stale_fetch_completing_first_is_discarded() {
        let mut plan = WorkoutPlan::new(Selection::new("gym", "", ""));

        let first = plan.begin_fetch();
        let second = plan.begin_fetch();

        assert!(
            !plan
                .complete_fetch(first, Ok(categories(vec![week("week1", &["day1"])])))
                .unwrap()
        );
        assert!(plan.is_loading());
        assert!(
            plan.complete_fetch(second, Ok(categories(vec![week("week2", &["day3"])])))
                .unwrap()
        );
        assert_eq!(plan.selection(), &Selection::new("gym", "week2", "day3"));
    }

    #[test]
    fn test_select() {
        let mut plan = WorkoutPlan::new(Selection::new("gym", "", ""));
        let ticket = plan.begin_fetch();
        plan.complete_fetch(
            ticket,
            Ok(categories(vec![
                week("week1", &["day1", "day2"]),
                week("week2", &["day3", "day4"]),
            ])),
        )
        .unwrap();

        plan.select_week("week2");
        assert_eq!(plan.selection(), &Selection::new("gym", "week2", "day3"));

        plan.select_day("day4");
        assert_eq!(plan.current_day().map(|d| d.id.as_str()), Some("day4"));

        plan.select_day("day9");
        assert_eq!(plan.selection(), &Selection::new("gym", "week2", "day3"));

        plan.select_week("week9");
        assert_eq!(plan.selection(), &Selection::new("gym", "week1", "day1"));

        plan.select_category("home");
        assert_eq!(plan.selection(), &Selection::new("home", "week1", "day1"));
        assert_eq!(plan.current_day(), None);
    }

    #[test]
    fn test_reload_keeps_valid_selection() {
        let mut plan = WorkoutPlan::new(Selection::new("gym", "week2", "day4"));

        let ticket = plan.begin_fetch();
        plan.complete_fetch(
            ticket,
            Ok(categories(vec![
                week("week1", &["day1"]),
                week("week2", &["day3", "day4"]),
            ])),
        )
        .unwrap();

        assert_eq!(plan.selection(), &Selection::new("gym", "week2", "day4"));
    }
}
