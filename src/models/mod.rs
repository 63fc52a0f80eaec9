pub mod permission;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_role;

pub use permission::{HttpMethod, Permission};
pub use role::Role;
pub use role_permission::RolePermission;
pub use user::{SessionUser, User};
pub use user_role::UserRole;
