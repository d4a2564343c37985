pub mod api;
pub mod infrastructure;
