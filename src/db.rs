pub mod user_repo;
pub use user_repo::UserRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod module_repo;
pub use module_repo::ModuleRepository;
pub mod access_repo;
pub use access_repo::PgAccessRepository;
pub mod version_repo;
pub use version_repo::PgVersionRepository;
