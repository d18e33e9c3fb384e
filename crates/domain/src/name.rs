use derive_more::{AsRef, Display};

const MAX_LEN: usize = 64;

/// A trimmed, non-empty display name with a bounded length.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let name = name.trim();

        match name.chars().count() {
            0 => Err(NameError::Empty),
            len if len > MAX_LEN => Err(NameError::TooLong(len)),
            _ => Ok(Self(name.to_string())),
        }
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
