use derive_more::Deref;
use uuid::Uuid;

pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub email: String,
    pub role: String,
}

impl User {
    #[must_use]
    pub fn new(id: UserID, email: &str, role: Option<&str>) -> Self {
        Self {
            id,
            email: email.to_string(),
            role: role
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_ROLE)
                .to_string(),
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
