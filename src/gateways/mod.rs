//! One CRUD surface per entity type. Gateways are stateless: every method
//! is a single request/response through the shared [`ApiClient`], errors
//! propagate unmodified, and nothing is cached or optimistically mutated.

pub mod applications;
pub mod groups;
pub mod permissions;
pub mod roles;
pub mod users;

pub use applications::ApplicationsGateway;
pub use groups::GroupsGateway;
pub use permissions::PermissionsGateway;
pub use roles::RolesGateway;
pub use users::UsersGateway;
