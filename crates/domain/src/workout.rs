use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};

use crate::{CreateError, DataError, Name, ReadError};

/// Label used when a repetition string carries no reps part.
pub const MAX_EFFORT: &str = "Até falhar";

const WEEK_PREFIX: &str = "week";

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workout_records(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    async fn create_workout_record(
        &self,
        category: CategoryCode,
        week: String,
        day: String,
        name: Name,
        exercises: Vec<ExerciseEntry>,
    ) -> Result<WorkoutRecord, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    /// Raw records, newest first.
    async fn get_workout_records(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    async fn create_workout_record(
        &self,
        category: CategoryCode,
        week: String,
        day: String,
        name: Name,
        exercises: Vec<ExerciseEntry>,
    ) -> Result<WorkoutRecord, CreateError>;

    async fn get_categories(&self) -> Result<Vec<Category>, ReadError> {
        Ok(normalize(&self.get_workout_records().await?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryCode {
    Gym,
    Home,
}

impl CategoryCode {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            CategoryCode::Gym => "gym",
            CategoryCode::Home => "home",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CategoryCode::Gym => "Academia",
            CategoryCode::Home => "Em Casa",
        }
    }
}

impl TryFrom<&str> for CategoryCode {
    type Error = DataError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "gym" => Ok(CategoryCode::Gym),
            "home" => Ok(CategoryCode::Home),
            _ => Err(DataError::UnknownCategory(value.to_string())),
        }
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutRecordID(String);

impl From<String> for WorkoutRecordID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkoutRecordID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One flat row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRecord {
    pub id: WorkoutRecordID,
    pub category: CategoryCode,
    pub week: String,
    pub day: String,
    pub name: String,
    pub exercises: Vec<ExerciseEntry>,
    pub created_at: Option<DateTime<Utc>>,
}

impl WorkoutRecord {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} • {} • Dia {}",
            self.category.name(),
            week_name(&self.week),
            self.day
        )
    }

    #[must_use]
    pub fn exercise_summary(&self) -> String {
        format!("{} exercícios cadastrados", self.exercises.len())
    }
}

/// An exercise as stored inside a workout record, before parsing its repetition string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseEntry {
    pub id: Option<String>,
    pub name: String,
    pub repetitions: String,
    pub notes: Option<String>,
    pub image: Option<String>,
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub notes: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    pub id: String,
    pub name: String,
    pub days: Vec<Day>,
}

impl Week {
    #[must_use]
    pub fn day(&self, id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryCode,
    pub name: String,
    pub weeks: Vec<Week>,
}

impl Category {
    #[must_use]
    pub fn week(&self, id: &str) -> Option<&Week> {
        self.weeks.iter().find(|w| w.id == id)
    }
}

#[must_use]
pub fn category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id.id() == id)
}

/// Groups flat records into category trees.
///
/// Records are visited in the given order, so categories, weeks and days appear in the order
/// in which they are first encountered. Records sharing the same category, week and day are not
/// merged; each one yields its own day.
#[must_use]
pub fn normalize(records: &[WorkoutRecord]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    let mut generated_ids = HashSet::new();

    for record in records {
        let category_idx = match categories.iter().position(|c| c.id == record.category) {
            Some(idx) => idx,
            None => {
                categories.push(Category {
                    id: record.category,
                    name: record.category.name().to_string(),
                    weeks: vec![],
                });
                categories.len() - 1
            }
        };
        let weeks = &mut categories[category_idx].weeks;

        let week_idx = match weeks.iter().position(|w| w.id == record.week) {
            Some(idx) => idx,
            None => {
                weeks.push(Week {
                    id: record.week.clone(),
                    name: week_name(&record.week),
                    days: vec![],
                });
                weeks.len() - 1
            }
        };

        weeks[week_idx].days.push(Day {
            id: record.day.clone(),
            name: record.name.clone(),
            exercises: exercises(record, &mut generated_ids),
        });
    }

    categories
}

/// Assigns exercise ids. A stored id is kept if it is unique within the day. Otherwise an id
/// `{category}-{week}-{day}-{n}` is derived, suffixed if it is already taken anywhere in the tree.
fn exercises(record: &WorkoutRecord, generated: &mut HashSet<String>) -> Vec<Exercise> {
    let mut ids: HashSet<String> = HashSet::new();

    record
        .exercises
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let id = match &entry.id {
                Some(id) if !id.is_empty() && !ids.contains(id.as_str()) => id.clone(),
                _ => {
                    let base = format!(
                        "{}-{}-{}-{}",
                        record.category.id(),
                        record.week,
                        record.day,
                        idx + 1
                    );
                    let free = (1..)
                        .map(|n| if n == 1 { base.clone() } else { format!("{base}-{n}") })
                        .find(|id| !ids.contains(id) && !generated.contains(id));
                    let id = free.unwrap_or(base);
                    generated.insert(id.clone());
                    id
                }
            };
            ids.insert(id.clone());
            let (sets, reps) = parse_repetitions(&entry.repetitions);
            Exercise {
                id: id.into(),
                name: entry.name.clone(),
                sets,
                reps,
                notes: entry.notes.clone().filter(|n| !n.trim().is_empty()),
                image: entry.image.clone().filter(|i| !i.trim().is_empty()),
            }
        })
        .collect()
}

/// Splits a combined "NxR" string into a sets count and a reps descriptor.
///
/// Never fails: an unparseable sets part yields 1 and a missing reps part yields
/// [`MAX_EFFORT`].
#[must_use]
pub fn parse_repetitions(repetitions: &str) -> (u32, String) {
    let (sets, reps) = match repetitions.split_once(['x', 'X']) {
        Some((sets, reps)) => (sets, Some(reps)),
        None => (repetitions, None),
    };

    let sets = sets.trim().parse::<u32>().unwrap_or(1);
    let reps = match reps.map(str::trim) {
        Some(reps) if !reps.is_empty() => reps.to_string(),
        _ => MAX_EFFORT.to_string(),
    };

    (sets, reps)
}

/// Derives a week's display name from its code ("week3" becomes "Semana 3").
#[must_use]
pub fn week_name(code: &str) -> String {
    match code.strip_prefix(WEEK_PREFIX) {
        Some(number) if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
            format!("Semana {number}")
        }
        _ => code.to_string(),
    }
}
