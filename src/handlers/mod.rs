pub mod system_handler;
pub mod term_handler;
