//! Authorization gate.
//!
//! Every protected operation receives a [`Caller`] resolved from the session.
//! Ownership decisions go through the methods here and nowhere else.

use super::{Error, UserId};

/// Role derived from the authenticated user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Unrestricted access, the only role allowed to delete or list all.
    Admin,
    /// Restricted to records whose owner is this mechanic.
    Mechanic(UserId),
}

impl From<UserId> for Role {
    fn from(id: UserId) -> Self {
        if id.is_admin() {
            Self::Admin
        } else {
            Self::Mechanic(id)
        }
    }
}

/// Authenticated identity making a request.
///
/// # Examples
/// ```
/// use repair_desk::domain::{Caller, UserId};
///
/// let mechanic = Caller::new(UserId::new(5).unwrap());
/// assert!(mechanic.require_owner(UserId::new(5).unwrap()).is_ok());
/// assert!(mechanic.require_owner(UserId::new(6).unwrap()).is_err());
/// assert!(Caller::new(UserId::ADMIN).require_admin().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    id: UserId,
    role: Role,
}

impl Caller {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            role: Role::from(id),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Allow only the admin.
    pub fn require_admin(&self) -> Result<(), Error> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Mechanic(_) => Err(Error::forbidden("admin access required")),
        }
    }

    /// Allow the admin or the mechanic who owns the resource.
    pub fn require_owner(&self, owner: UserId) -> Result<(), Error> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Mechanic(id) if id == owner => Ok(()),
            Role::Mechanic(_) => Err(Error::forbidden("record belongs to another mechanic")),
        }
    }

    /// Owner to store on a created or edited record.
    ///
    /// Mechanics always own what they write; the admin may assign anyone.
    pub fn effective_mechanic(&self, requested: UserId) -> UserId {
        match self.role {
            Role::Admin => requested,
            Role::Mechanic(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn id(raw: i32) -> UserId {
        UserId::new(raw).expect("valid id")
    }

    #[rstest]
    #[case(0, Role::Admin)]
    #[case(3, Role::Mechanic(UserId::new(3).expect("valid id")))]
    fn role_follows_the_reserved_id(#[case] raw: i32, #[case] expected: Role) {
        assert_eq!(Caller::new(id(raw)).role(), expected);
    }

    #[rstest]
    #[case(0, 7, true)]
    #[case(7, 7, true)]
    #[case(8, 7, false)]
    fn owner_policy(#[case] caller: i32, #[case] owner: i32, #[case] allowed: bool) {
        let result = Caller::new(id(caller)).require_owner(id(owner));
        match (allowed, result) {
            (true, Ok(())) => {}
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
            (_, other) => panic!("unexpected policy outcome: {other:?}"),
        }
    }

    #[rstest]
    fn only_admin_passes_admin_policy() {
        assert!(Caller::new(UserId::ADMIN).require_admin().is_ok());
        let err = Caller::new(id(2))
            .require_admin()
            .expect_err("mechanic is not admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(0, 9, 9)]
    #[case(5, 9, 5)]
    #[case(5, 5, 5)]
    fn mechanics_cannot_reassign(
        #[case] caller: i32,
        #[case] requested: i32,
        #[case] expected: i32,
    ) {
        let owner = Caller::new(id(caller)).effective_mechanic(id(requested));
        assert_eq!(owner, id(expected));
    }
}
