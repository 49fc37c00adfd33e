mod builtin;
mod error;
pub mod process;
mod registry;
mod sysinfo;
mod tool;

pub use builtin::{
    configure_truncation::ConfigureTruncationTool,
    execute_command::ExecuteCommandTool,
    execute_script::ExecuteScriptTool,
    list_directory::{format_file_size, ListDirectoryTool},
};
pub use error::ExecError;
pub use registry::{ToolRegistry, ToolSchema};
pub use sysinfo::system_info;
pub use tool::{Tool, ToolCall, ToolOutput};
