pub mod color;
pub mod login;
pub mod schedule;
pub mod settings;
