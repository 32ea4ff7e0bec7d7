pub mod month;
pub mod note;
pub mod notes;
pub mod tasks;
