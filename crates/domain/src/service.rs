use log::{debug, error};

use crate::{
    CategoryCode, CreateError, Credentials, DeleteError, ExerciseEntry, MuscleGroup,
    MuscleGroupRepository, MuscleGroupService, Name, ReadError, SessionEvents, SessionRepository,
    SessionService, User, UserID, WorkoutRecord, WorkoutRepository, WorkoutService,
};

pub struct Service<R> {
    repository: R,
    session_events: SessionEvents,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            session_events: SessionEvents::default(),
        }
    }

    pub fn session_events(&self) -> &SessionEvents {
        &self.session_events
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError> {
        let user = log_on_error!(
            self.repository.request_session(credentials),
            ReadError,
            "request",
            "session"
        )?;
        self.session_events.publish(Some(&user));
        Ok(user)
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        let result = log_on_error!(
            self.repository.initialize_session(),
            ReadError,
            "get",
            "session"
        );
        match &result {
            Ok(user) => self.session_events.publish(Some(user)),
            Err(ReadError::Storage(crate::StorageError::NoSession)) => {
                self.session_events.publish(None);
            }
            Err(_) => {}
        }
        result
    }

    async fn delete_session(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_session(),
            DeleteError,
            "delete",
            "session"
        )?;
        self.session_events.publish(None);
        Ok(())
    }

    async fn is_admin(&self, user_id: UserID) -> Result<bool, ReadError> {
        log_on_error!(
            self.repository.read_admin_status(user_id),
            ReadError,
            "get",
            "admin status"
        )
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workout_records(&self) -> Result<Vec<WorkoutRecord>, ReadError> {
        log_on_error!(
            self.repository.read_workout_records(),
            ReadError,
            "get",
            "workouts"
        )
    }

    async fn create_workout_record(
        &self,
        category: CategoryCode,
        week: String,
        day: String,
        name: Name,
        exercises: Vec<ExerciseEntry>,
    ) -> Result<WorkoutRecord, CreateError> {
        log_on_error!(
            self.repository
                .create_workout_record(category, week, day, name, exercises),
            CreateError,
            "create",
            "workout"
        )
    }
}

impl<R: MuscleGroupRepository> MuscleGroupService for Service<R> {
    async fn get_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError> {
        let mut muscle_groups = log_on_error!(
            self.repository.read_muscle_groups(),
            ReadError,
            "get",
            "muscle groups"
        )?;
        muscle_groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(muscle_groups)
    }

    async fn create_muscle_group(&self, name: Name) -> Result<MuscleGroup, CreateError> {
        log_on_error!(
            self.repository.create_muscle_group(name),
            CreateError,
            "create",
            "muscle group"
        )
    }
}
