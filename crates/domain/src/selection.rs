use crate::{Category, Day, Week, workout};

/// The chosen category, week and day.
///
/// Identifiers are stored as given and only resolved against a category tree when read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    category: String,
    week: String,
    day: String,
}

impl Selection {
    #[must_use]
    pub fn new(category: &str, week: &str, day: &str) -> Self {
        Self {
            category: category.to_string(),
            week: week.to_string(),
            day: day.to_string(),
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn week(&self) -> &str {
        &self.week
    }

    #[must_use]
    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn set_category(&mut self, id: &str) {
        id.clone_into(&mut self.category);
    }

    pub fn set_week(&mut self, id: &str) {
        id.clone_into(&mut self.week);
    }

    pub fn set_day(&mut self, id: &str) {
        id.clone_into(&mut self.day);
    }

    #[must_use]
    pub fn current_category<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        workout::category(categories, &self.category)
    }

    #[must_use]
    pub fn current_week<'a>(&self, categories: &'a [Category]) -> Option<&'a Week> {
        self.current_category(categories)?.week(&self.week)
    }

    #[must_use]
    pub fn current_day<'a>(&self, categories: &'a [Category]) -> Option<&'a Day> {
        self.current_week(categories)?.day(&self.day)
    }

    /// Replaces identifiers that do not resolve against `categories` by the first available
    /// alternative, cascading from category to week to day.
    ///
    /// A selected category is only replaced when none is selected at all. Returns whether the
    /// selection changed.
    pub fn reconcile(&mut self, categories: &[Category]) -> bool {
        let previous = self.clone();

        if self.category.is_empty() {
            if let Some(first) = categories.first() {
                first.id.id().clone_into(&mut self.category);
            }
        }

        if let Some(category) = workout::category(categories, &self.category) {
            if category.week(&self.week).is_none() {
                if let Some(first) = category.weeks.first() {
                    self.week.clone_from(&first.id);
                }
            }

            if let Some(week) = category.week(&self.week) {
                if week.day(&self.day).is_none() {
                    if let Some(first) = week.days.first() {
                        self.day.clone_from(&first.id);
                    }
                }
            }
        }

        *self != previous
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::CategoryCode;

    fn day(id: &str) -> Day {
        Day {
            id: id.to_string(),
            name: id.to_uppercase(),
            exercises: vec![],
        }
    }

    fn week(id: &str, days: &[&str]) -> Week {
        Week {
            id: id.to_string(),
            name: id.to_uppercase(),
            days: days.iter().map(|d| day(d)).collect(),
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryCode::Gym,
                name: "Academia".to_string(),
                weeks: vec![
                    week("week1", &["day1", "day2"]),
                    week("week2", &["day3", "day4"]),
                    week("week3", &[]),
                ],
            },
            Category {
                id: CategoryCode::Home,
                name: "Em Casa".to_string(),
                weeks: vec![week("week5", &["day5"])],
            },
        ]
    }

    #[rstest]
    #[case::valid(Selection::new("gym", "week2", "day4"), Some("day4"))]
    #[case::unknown_category(Selection::new("park", "week2", "day4"), None)]
    #[case::unknown_week(Selection::new("gym", "week9", "day4"), None)]
    #[case::unknown_day(Selection::new("gym", "week2", "day1"), None)]
    #[case::empty(Selection::default(), None)]
    fn test_current_day(#[case] selection: Selection, #[case] expected: Option<&str>) {
        assert_eq!(
            selection
                .current_day(&categories())
                .map(|d| d.id.as_str()),
            expected
        );
    }

    #[test]
    fn test_current_day_is_resolved_on_every_call() {
        let mut categories = categories();
        let selection = Selection::new("gym", "week1", "day2");

        assert_eq!(
            selection.current_day(&categories).map(|d| d.name.as_str()),
            Some("DAY2")
        );

        categories[0].weeks[0].days[1].name = "Dia 2".to_string();

        assert_eq!(
            selection.current_day(&categories).map(|d| d.name.as_str()),
            Some("Dia 2")
        );
    }

    #[test]
    fn test_setters_accept_any_value() {
        let mut selection = Selection::default();
        selection.set_category("home");
        selection.set_week("nope");
        selection.set_day("");

        assert_eq!(selection, Selection::new("home", "nope", ""));
    }

    #[rstest]
    #[case::nothing_selected(Selection::default(), Selection::new("gym", "week1", "day1"), true)]
    #[case::valid(
        Selection::new("gym", "week2", "day4"),
        Selection::new("gym", "week2", "day4"),
        false
    )]
    #[case::unknown_week(
        Selection::new("gym", "week9", "day4"),
        Selection::new("gym", "week1", "day1"),
        true
    )]
    #[case::unknown_day(
        Selection::new("gym", "week2", "day9"),
        Selection::new("gym", "week2", "day3"),
        true
    )]
    #[case::category_switch(
        Selection::new("home", "week2", "day4"),
        Selection::new("home", "week5", "day5"),
        true
    )]
    #[case::week_without_days(
        Selection::new("gym", "week3", "day1"),
        Selection::new("gym", "week3", "day1"),
        false
    )]
    #[case::unknown_category(
        Selection::new("park", "week1", "day1"),
        Selection::new("park", "week1", "day1"),
        false
    )]
    fn test_reconcile(
        #[case] mut selection: Selection,
        #[case] expected: Selection,
        #[case] changed: bool,
    ) {
        assert_eq!(selection.reconcile(&categories()), changed);
        assert_eq!(selection, expected);
        assert!(!selection.reconcile(&categories()));
        assert_eq!(selection, expected);
    }

    #[test]
    fn test_reconcile_without_data() {
        let mut selection = Selection::new("gym", "week1", "day1");

        assert!(!selection.reconcile(&[]));
        assert!(!Selection::default().reconcile(&[]));
    }

    #[test]
    fn test_reconcile_after_reload() {
        let mut selection = Selection::new("gym", "week2", "day4");
        let mut categories = categories();
        categories[0].weeks.remove(1);

        assert!(selection.reconcile(&categories));
        assert_eq!(selection, Selection::new("gym", "week1", "day1"));
    }
}
