pub mod boot;
pub mod replay;
pub mod routes;

pub use boot::{BootOptions, BootReport, boot_command};
pub use replay::{Step, replay, replay_command};
pub use routes::{breadcrumbs_command, routes_command};
