//! Short-lived user notifications for the outcome of user actions.

use treino_domain::{CreateError, LogEntry, MuscleGroup, ReadError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) | Notification::Error(message) => message,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

#[must_use]
pub fn workouts_not_loaded(_: &ReadError) -> Notification {
    Notification::Error("Erro ao carregar treinos".to_string())
}

#[must_use]
pub fn muscle_groups_not_loaded(_: &ReadError) -> Notification {
    Notification::Error("Erro ao carregar grupos musculares".to_string())
}

#[must_use]
pub fn muscle_group_added(result: &Result<MuscleGroup, CreateError>) -> Notification {
    match result {
        Ok(_) => Notification::Success("Grupo muscular adicionado".to_string()),
        Err(CreateError::Conflict) => {
            Notification::Error("Este grupo muscular já existe".to_string())
        }
        Err(_) => Notification::Error("Erro ao adicionar grupo muscular".to_string()),
    }
}

#[must_use]
pub fn muscle_group_name_invalid(err: &ValidationError) -> Notification {
    match err {
        ValidationError::Empty(_) => {
            Notification::Error("Digite o nome do grupo muscular".to_string())
        }
        ValidationError::Conflict(_) => {
            Notification::Error("Este grupo muscular já existe".to_string())
        }
        ValidationError::Other(err) => Notification::Error(err.to_string()),
    }
}

#[must_use]
pub fn weight_logged(result: &Result<LogEntry, ValidationError>) -> Notification {
    match result {
        Ok(_) => Notification::Success("Carga registrada com sucesso!".to_string()),
        Err(ValidationError::Empty(_)) => {
            Notification::Error("Informe a carga utilizada".to_string())
        }
        Err(_) => Notification::Error("Erro ao salvar a carga".to_string()),
    }
}
