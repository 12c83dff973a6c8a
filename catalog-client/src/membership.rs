//! Collection membership diffing
//!
//! Each candidate collection carries a `(has, had)` pair: `has` is what the
//! user wants, `had` is what the server last confirmed. Reconciliation only
//! ever touches entries where the two differ.

use std::collections::BTreeMap;

use shared::ChangeOrigin;
use shared::models::{Collection, Relationships};

/// Desired vs. last-synchronized membership of one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Membership {
    /// Desired state, bound to the editor checkbox
    pub has: bool,
    /// Baseline from the server, read-only for the UI
    pub had: bool,
}

impl Membership {
    /// Unchanged entry seeded from the server
    pub fn baseline(member: bool) -> Self {
        Self {
            has: member,
            had: member,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.has != self.had
    }

    /// Call needed to move the server to the desired state
    pub fn pending_action(&self) -> Option<MembershipAction> {
        match (self.has, self.had) {
            (true, false) => Some(MembershipAction::Add),
            (false, true) => Some(MembershipAction::Remove),
            _ => None,
        }
    }
}

/// Membership map keyed by collection slug
pub type Memberships = BTreeMap<String, Membership>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipAction {
    Add,
    Remove,
}

impl MembershipAction {
    /// Path segment of the collection verb
    pub fn verb(self) -> &'static str {
        match self {
            MembershipAction::Add => "addProduct",
            MembershipAction::Remove => "removeProduct",
        }
    }

    pub fn origin(self) -> ChangeOrigin {
        match self {
            MembershipAction::Add => ChangeOrigin::MembershipAdded,
            MembershipAction::Remove => ChangeOrigin::MembershipRemoved,
        }
    }
}

/// One add/remove call to issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipOp {
    pub collection: String,
    pub action: MembershipAction,
}

pub struct MembershipDiffer;

impl MembershipDiffer {
    /// Seed the membership map from a freshly fetched product.
    ///
    /// A candidate is a member when its `_href` appears among the product's
    /// collection relationships. `has` starts equal to `had`.
    pub fn seed(candidates: &[Collection], related: &Relationships) -> Memberships {
        candidates
            .iter()
            .map(|collection| {
                let member = related
                    .collections
                    .iter()
                    .any(|rel| rel.href == collection.href);
                (collection.slug.clone(), Membership::baseline(member))
            })
            .collect()
    }

    /// Minimal set of calls, in collection slug order
    pub fn plan(memberships: &Memberships) -> Vec<MembershipOp> {
        memberships
            .iter()
            .filter_map(|(slug, membership)| {
                membership.pending_action().map(|action| MembershipOp {
                    collection: slug.clone(),
                    action,
                })
            })
            .collect()
    }
}
