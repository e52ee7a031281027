mod import_cars;
mod init_config;
mod set_admin;

pub use import_cars::cmd_import_cars;
pub use init_config::cmd_init_config;
pub use set_admin::cmd_set_admin;
