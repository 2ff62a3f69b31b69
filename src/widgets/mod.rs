pub mod controls;
pub mod debug;
pub mod field_input;
pub mod history;
