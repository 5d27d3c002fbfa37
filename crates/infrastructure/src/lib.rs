//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_rbac_repository;
mod postgres_rbac_repository;
mod postgres_role_membership_directory;

pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use postgres_rbac_repository::PostgresRbacRepository;
pub use postgres_role_membership_directory::PostgresRoleMembershipDirectory;
