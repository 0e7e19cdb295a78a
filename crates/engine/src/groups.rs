//! Groups, memberships and query scopes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::EngineError;

/// Role of a user inside a group.
///
/// - `admin`: can manage members and delete the group.
/// - `member`: can record expenses and settlements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    /// Returns the canonical role string used by storage and transports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(EngineError::InvalidRole(format!(
                "invalid member role: {other}"
            ))),
        }
    }
}

/// A group member with their role and join timestamp.
#[derive(Clone, Debug)]
pub struct Member {
    pub user_id: String,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// A group of users sharing expenses.
#[derive(Clone, Debug)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_by: String,
    pub members: Vec<Member>,
}

impl Group {
    /// Creates a group, deduplicating members by user id (first entry wins)
    /// and guaranteeing the creator is present as an admin: a missing creator
    /// is appended, a listed one is promoted.
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
        members: Vec<Member>,
    ) -> Self {
        let created_by = created_by.into();
        let mut deduped: Vec<Member> = Vec::with_capacity(members.len() + 1);
        for member in members {
            if !deduped.iter().any(|m| m.user_id == member.user_id) {
                deduped.push(member);
            }
        }
        match deduped.iter_mut().find(|m| m.user_id == created_by) {
            Some(creator) => creator.role = MemberRole::Admin,
            None => deduped.push(Member {
                user_id: created_by.clone(),
                role: MemberRole::Admin,
                joined_at: created_at,
            }),
        }

        Self {
            id,
            name: name.into(),
            created_by,
            members: deduped,
        }
    }

    /// Returns `true` if `user_id` is a current member.
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.user_id.as_str())
    }
}

/// Which records a balance query covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Records tagged with this group id.
    Group(Uuid),
    /// Non-group records involving this user.
    Personal(String),
}

impl Scope {
    pub fn personal(user_id: impl Into<String>) -> Self {
        Self::Personal(user_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: &str, role: MemberRole) -> Member {
        Member {
            user_id: user_id.to_string(),
            role,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn creator_is_added_as_admin_when_missing() {
        let group = Group::new(
            Uuid::new_v4(),
            "Trip",
            "alice",
            Utc::now(),
            vec![member("bob", MemberRole::Member)],
        );
        assert!(group.is_member("alice"));
        let creator = group
            .members
            .iter()
            .find(|m| m.user_id == "alice")
            .unwrap();
        assert_eq!(creator.role, MemberRole::Admin);
    }

    #[test]
    fn creator_listed_as_plain_member_is_promoted_to_admin() {
        let group = Group::new(
            Uuid::new_v4(),
            "Trip",
            "alice",
            Utc::now(),
            vec![
                member("alice", MemberRole::Member),
                member("bob", MemberRole::Member),
            ],
        );
        let creator = group
            .members
            .iter()
            .find(|m| m.user_id == "alice")
            .unwrap();
        assert_eq!(creator.role, MemberRole::Admin);
        assert_eq!(group.members.len(), 2);
    }

    #[test]
    fn duplicate_members_keep_first_entry() {
        let group = Group::new(
            Uuid::new_v4(),
            "Trip",
            "alice",
            Utc::now(),
            vec![
                member("bob", MemberRole::Admin),
                member("bob", MemberRole::Member),
            ],
        );
        let bobs: Vec<_> = group.members.iter().filter(|m| m.user_id == "bob").collect();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].role, MemberRole::Admin);
    }

    #[test]
    fn role_parses_canonical_strings() {
        assert_eq!(MemberRole::try_from("admin").unwrap(), MemberRole::Admin);
        assert_eq!(MemberRole::try_from("member").unwrap(), MemberRole::Member);
        assert!(MemberRole::try_from("owner").is_err());
    }
}
