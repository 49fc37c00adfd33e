pub mod configure_truncation;
pub mod execute_command;
pub mod execute_script;
pub mod list_directory;
