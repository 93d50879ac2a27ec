pub mod init;
pub mod models;
pub mod practice;
pub mod render;
pub mod roles;
pub mod validate;
