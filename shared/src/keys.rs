//! Composite-key composition for the single-table layout.
//!
//! Every item belonging to one user shares the partition `USER#{username}`;
//! the sort key disambiguates the record kind: `USER#INFO` for the profile,
//! `DEBT#{debt_id}` for each debt. This is what makes "list all debts for a
//! user" a single partition query instead of a scan.

use crate::error::{Result, StoreError};

/// Partition key attribute name.
pub const PK: &str = "PK";
/// Sort key attribute name.
pub const SK: &str = "SK";

/// Separator token inside composite keys. Identifiers may never contain it.
pub const KEY_SEPARATOR: char = '#';

pub const USER_PREFIX: &str = "USER#";
pub const DEBT_PREFIX: &str = "DEBT#";
/// Fixed sort key of the single profile record in each user partition.
pub const PROFILE_SK: &str = "USER#INFO";

/// The record kinds sharing the table, used as the `entity` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Debt,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "USER",
            EntityKind::Debt => "DEBT",
        }
    }
}

/// A composed (partition, sort) key pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub partition: String,
    pub sort: String,
}

fn validate(kind: &'static str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(StoreError::InvalidIdentifier(format!(
            "{kind} must not be empty"
        )));
    }
    if id.contains(KEY_SEPARATOR) {
        return Err(StoreError::InvalidIdentifier(format!(
            "{kind} must not contain '{KEY_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Partition key grouping all of one user's records.
pub fn user_partition(username: &str) -> Result<String> {
    validate("username", username)?;
    Ok(format!("{USER_PREFIX}{username}"))
}

/// Key of a user's profile record.
pub fn user_profile_key(username: &str) -> Result<RecordKey> {
    Ok(RecordKey {
        partition: user_partition(username)?,
        sort: PROFILE_SK.to_string(),
    })
}

/// Sort key of a debt record.
pub fn debt_sort_key(debt_id: &str) -> Result<String> {
    validate("debt_id", debt_id)?;
    Ok(format!("{DEBT_PREFIX}{debt_id}"))
}

/// Key of a debt record under its owner's partition.
pub fn debt_key(username: &str, debt_id: &str) -> Result<RecordKey> {
    Ok(RecordKey {
        partition: user_partition(username)?,
        sort: debt_sort_key(debt_id)?,
    })
}

/// Inverse of [`user_partition`], used when decoding stored items.
pub fn username_from_partition(pk: &str) -> Result<&str> {
    pk.strip_prefix(USER_PREFIX)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| StoreError::MalformedRecord(format!("unexpected partition key '{pk}'")))
}

/// Inverse of [`debt_sort_key`].
pub fn debt_id_from_sort(sk: &str) -> Result<&str> {
    sk.strip_prefix(DEBT_PREFIX)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| StoreError::MalformedRecord(format!("unexpected sort key '{sk}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_profile_and_debt_keys_in_one_partition() {
        let profile = user_profile_key("john").unwrap();
        assert_eq!(profile.partition, "USER#john");
        assert_eq!(profile.sort, "USER#INFO");

        let debt = debt_key("john", "d1").unwrap();
        assert_eq!(debt.partition, "USER#john");
        assert_eq!(debt.sort, "DEBT#d1");

        // Profile and debts share the partition, so a single partition
        // query returns everything the user owns.
        assert_eq!(profile.partition, debt.partition);
    }

    #[test]
    fn distinct_identifier_pairs_produce_distinct_keys() {
        let pairs = [("john", "d1"), ("john", "d2"), ("jane", "d1"), ("jane", "d2")];
        let keys: Vec<RecordKey> = pairs
            .iter()
            .map(|(user, debt)| debt_key(user, debt).unwrap())
            .collect();

        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn rejects_separator_in_identifier() {
        assert!(matches!(
            user_partition("jo#hn"),
            Err(StoreError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            debt_key("john", "d#1"),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn rejects_empty_identifier() {
        assert!(matches!(
            user_profile_key(""),
            Err(StoreError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            debt_sort_key(""),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn parses_identifiers_back_out_of_keys() {
        assert_eq!(username_from_partition("USER#john").unwrap(), "john");
        assert_eq!(debt_id_from_sort("DEBT#d1").unwrap(), "d1");

        assert!(matches!(
            username_from_partition("DEBT#d1"),
            Err(StoreError::MalformedRecord(_))
        ));
        assert!(matches!(
            debt_id_from_sort("USER#INFO"),
            Err(StoreError::MalformedRecord(_))
        ));
        assert!(matches!(
            username_from_partition("USER#"),
            Err(StoreError::MalformedRecord(_))
        ));
    }
}
