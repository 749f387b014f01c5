pub mod item;
pub mod program;
