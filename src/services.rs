pub mod access_service;
pub mod auth;
pub mod module_service;
pub mod navigation;
pub mod rbac_service;
