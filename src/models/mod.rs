pub mod application;
pub mod group;
pub mod page;
pub mod permission;
pub mod role;
pub mod session;
pub mod user;

pub use application::{
    Application, ApplicationRef, ApplicationStatus, ApplicationUpdate, NewApplication,
};
pub use group::{Group, GroupRef, GroupUpdate, NewGroup};
pub use page::ListResponse;
pub use permission::{Permission, PermissionRef};
pub use role::{NewRole, Role, RoleRef, RoleUpdate};
pub use session::Session;
pub use user::{EntityStatus, NewUser, User, UserUpdate};
