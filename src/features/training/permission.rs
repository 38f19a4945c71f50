use std::sync::Arc;

use crate::data::models::{NodeId, UserId};

use super::contracts::MembershipSource;
use super::error::Result;

/// Decides whether a user may build a training over a set of nodes.
pub struct PermissionGate {
    memberships: Arc<dyn MembershipSource>,
}

impl PermissionGate {
    pub fn new(memberships: Arc<dyn MembershipSource>) -> Self {
        Self { memberships }
    }

    /// True iff `owner_id` can read the group of every node.
    ///
    /// A missing membership is a denial, not an error. An empty node list is
    /// never authorized.
    pub fn authorize(&self, owner_id: UserId, node_ids: &[NodeId]) -> Result<bool> {
        if node_ids.is_empty() {
            return Ok(false);
        }

        for &node_id in node_ids {
            let granted = self
                .memberships
                .membership(owner_id, node_id)?
                .is_some_and(|m| m.grants_read());

            if !granted {
                log::debug!("User {} has no read access to node {}", owner_id, node_id);
                return Ok(false);
            }
        }

        Ok(true)
    }
}
