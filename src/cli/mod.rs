pub mod args;
pub mod targets;
