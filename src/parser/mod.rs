// Chart DSL Parser Module

pub mod ast;
pub mod command;
pub mod lexer;
pub mod pipeline;

// Public API re-exports
pub use ast::{Command, WidgetSpec};
pub use pipeline::parse_widget_spec;
