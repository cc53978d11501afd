//! Route modules, one per caller role.

pub mod admin;
pub mod caretaker;
pub mod health;
pub mod response;
pub mod whoami;
