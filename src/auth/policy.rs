//! Allowed-role sets for route authorization.
//!
//! This is the single place role sets are defined; handlers pick a
//! constraint type and the `Auth` extractor enforces it. Roles have no
//! inherent ordering, only membership in these sets.

use crate::db::UserRole;

/// A named set of roles allowed to perform an operation.
pub trait RoleConstraint {
    const ALLOWED: &'static [UserRole];

    fn allows(role: UserRole) -> bool {
        Self::ALLOWED.contains(&role)
    }
}

/// Any authenticated user.
pub struct AnyRole;

impl RoleConstraint for AnyRole {
    const ALLOWED: &'static [UserRole] = &[
        UserRole::User,
        UserRole::Admin,
        UserRole::Student,
        UserRole::Teacher,
    ];
}

/// Content management: admins and teachers.
pub struct Staff;

impl RoleConstraint for Staff {
    const ALLOWED: &'static [UserRole] = &[UserRole::Admin, UserRole::Teacher];
}

/// Account administration, including role changes.
pub struct AdminOnly;

impl RoleConstraint for AdminOnly {
    const ALLOWED: &'static [UserRole] = &[UserRole::Admin];
}
