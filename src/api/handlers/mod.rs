pub mod comics;
pub mod health;
pub mod users;
