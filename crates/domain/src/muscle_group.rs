use derive_more::{Deref, Display};

use crate::{CreateError, Name, NameError, ReadError, ValidationError};

#[allow(async_fn_in_trait)]
pub trait MuscleGroupRepository {
    async fn read_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError>;
    async fn create_muscle_group(&self, name: Name) -> Result<MuscleGroup, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait MuscleGroupService {
    /// All muscle groups sorted by name.
    async fn get_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError>;
    async fn create_muscle_group(&self, name: Name) -> Result<MuscleGroup, CreateError>;

    async fn validate_muscle_group_name(&self, name: &str) -> Result<Name, ValidationError> {
        let name = match Name::new(name) {
            Ok(name) => name,
            Err(NameError::Empty) => return Err(ValidationError::Empty("name".to_string())),
            Err(err) => return Err(ValidationError::Other(err.into())),
        };
        let muscle_groups = self.get_muscle_groups().await?;
        if muscle_groups.iter().any(|m| m.name == name) {
            return Err(ValidationError::Conflict("name".to_string()));
        }
        Ok(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleGroup {
    pub id: MuscleGroupID,
    pub name: Name,
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MuscleGroupID(String);

impl From<String> for MuscleGroupID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MuscleGroupID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
