#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod log_store;
mod muscle_group;
mod name;
mod plan;
mod selection;
mod service;
mod session;
mod user;
mod workout;

pub use error::*;
pub use log_store::*;
pub use muscle_group::*;
pub use name::*;
pub use plan::*;
pub use selection::*;
pub use service::*;
pub use session::*;
pub use user::*;
pub use workout::*;
