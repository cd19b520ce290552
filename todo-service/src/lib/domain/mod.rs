pub mod field_update;
pub mod todo;
pub mod user;

pub use field_update::FieldUpdate;
