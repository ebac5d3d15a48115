pub mod members;
pub mod tasks;
