pub mod common;
pub mod generic;
pub mod get;
pub mod list;
pub mod path;
pub mod reset;
pub mod set;
