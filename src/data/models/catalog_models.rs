use serde::Serialize;

/// Role of a user inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberRole {
    Admin,
    Editor,
    Reader,
}

impl MemberRole {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(MemberRole::Admin),
            1 => Some(MemberRole::Editor),
            2 => Some(MemberRole::Reader),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            MemberRole::Admin => 0,
            MemberRole::Editor => 1,
            MemberRole::Reader => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberStatus {
    /// Invited but has not accepted yet.
    Pending,
    Active,
}

impl MemberStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(MemberStatus::Pending),
            1 => Some(MemberStatus::Active),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            MemberStatus::Pending => 0,
            MemberStatus::Active => 1,
        }
    }
}

/// A user's membership in the group that owns a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub role: MemberRole,
    pub status: MemberStatus,
}

impl Membership {
    /// Reader is the weakest role, so any accepted membership can read.
    pub fn grants_read(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Container for other nodes, holds no vocabulary of its own.
    Folder,
    /// Leaf unit with expressions attached.
    Slice,
}

impl NodeType {
    pub fn code(self) -> i32 {
        match self {
            NodeType::Folder => 0,
            NodeType::Slice => 1,
        }
    }
}
