use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{DeleteError, ReadError, User, UserID, ValidationError};

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError>;
    async fn initialize_session(&self) -> Result<User, ReadError>;
    async fn delete_session(&self) -> Result<(), DeleteError>;
    async fn read_admin_status(&self, user_id: UserID) -> Result<bool, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError>;
    async fn get_session(&self) -> Result<User, ReadError>;
    async fn delete_session(&self) -> Result<(), DeleteError>;
    async fn is_admin(&self, user_id: UserID) -> Result<bool, ReadError>;

    /// Whether the user may access the admin area. A failed lookup denies access.
    async fn admin_status(&self, user_id: UserID) -> bool {
        self.is_admin(user_id).await.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        if email.trim().is_empty() {
            return Err(ValidationError::Empty("email".to_string()));
        }
        if password.trim().is_empty() {
            return Err(ValidationError::Empty("password".to_string()));
        }
        Ok(Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
    }
}

type Callback = Rc<dyn Fn(Option<&User>)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

/// Notifies subscribers about sign-ins and sign-outs.
#[derive(Clone, Default)]
pub struct SessionEvents {
    subscribers: Rc<RefCell<Subscribers>>,
}

impl SessionEvents {
    /// Registers a callback until the returned subscription is released.
    pub fn subscribe(&self, callback: impl Fn(Option<&User>) + 'static) -> Subscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.callbacks.push((id, Rc::new(callback)));
        Subscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn publish(&self, user: Option<&User>) {
        // Callbacks may subscribe or unsubscribe while being notified.
        let callbacks = self
            .subscribers
            .borrow()
            .callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect::<Vec<_>>();
        for callback in callbacks {
            callback(user);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().callbacks.len()
    }
}

#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<RefCell<Subscribers>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .borrow_mut()
                .callbacks
                .retain(|(id, _)| *id != self.id);
        }
    }
}
