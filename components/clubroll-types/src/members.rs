mod programme;
mod semester;

pub use self::{programme::Programme, semester::Semester};
