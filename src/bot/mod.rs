/// Command definitions and their implementations
pub mod commands;
/// Update routing
pub mod handlers;
