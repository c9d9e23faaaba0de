pub mod auth;
pub mod modules;
pub mod navigation;
pub mod rbac;
