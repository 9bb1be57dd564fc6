//! Pure planning of table lookups (functional core).
//!
//! Each logical query maps to one concrete access path: an exact-key get, a
//! partition query with a sort-key prefix, or a lookup on the inverted
//! index. The owner identity always comes from the authenticated caller,
//! never from a client-controlled path parameter.

use crate::error::{Result, StoreError};
use crate::keys::{self, RecordKey, DEBT_PREFIX};

/// Inverted secondary index (sort key as partition). Only used to resolve a
/// debt's owner without trusting client-supplied data.
pub const SK_PK_INDEX: &str = "SK-PK-index";

/// A concrete lookup against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Exact primary-key match.
    PointGet { key: RecordKey },
    /// Partition-key equality plus sort-key prefix, e.g. all `DEBT#` items
    /// in one user's partition.
    PrefixQuery {
        partition: String,
        sort_prefix: String,
    },
    /// Partition-key equality on a secondary index.
    IndexLookup {
        index: &'static str,
        partition: String,
    },
}

/// Point read of a user's profile.
pub fn get_user(username: &str) -> Result<QueryPlan> {
    Ok(QueryPlan::PointGet {
        key: keys::user_profile_key(username)?,
    })
}

/// Point read of one debt under the caller's partition.
pub fn get_debt(owner: &str, debt_id: &str) -> Result<QueryPlan> {
    Ok(QueryPlan::PointGet {
        key: keys::debt_key(owner, debt_id)?,
    })
}

/// All debts owned by one user, as a single contiguous partition query.
pub fn list_debts(owner: &str) -> Result<QueryPlan> {
    Ok(QueryPlan::PrefixQuery {
        partition: keys::user_partition(owner)?,
        sort_prefix: DEBT_PREFIX.to_string(),
    })
}

/// Reverse lookup debt -> owning partition via the inverted index.
pub fn debt_owner_lookup(debt_id: &str) -> Result<QueryPlan> {
    Ok(QueryPlan::IndexLookup {
        index: SK_PK_INDEX,
        partition: keys::debt_sort_key(debt_id)?,
    })
}

/// Authorization invariant: a resolved record may only be returned to the
/// caller it belongs to.
pub fn check_owner(record_owner: &str, caller: &str) -> Result<()> {
    if record_owner == caller {
        Ok(())
    } else {
        Err(StoreError::Forbidden)
    }
}

/// Outcome of a debt point read that missed the caller's partition:
/// `Forbidden` if the debt lives under another owner, `NotFound` if it
/// does not exist at all.
pub fn missing_debt(debt_id: &str, exists_elsewhere: bool) -> StoreError {
    if exists_elsewhere {
        StoreError::Forbidden
    } else {
        StoreError::NotFound {
            kind: "debt",
            id: debt_id.to_string(),
        }
    }
}
