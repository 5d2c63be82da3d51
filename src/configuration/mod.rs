pub mod command_line;
pub mod constants;
pub mod server_info;
pub mod settings;
pub mod size;
