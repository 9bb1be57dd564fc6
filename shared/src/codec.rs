//! Conversion between typed domain records and stored table items.
//!
//! Encoding attaches the composed primary key plus an `entity` discriminator
//! so heterogeneous records sharing a partition can be told apart. Decoding
//! treats any schema violation as [`StoreError::MalformedRecord`].

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::{Result, StoreError};
use crate::keys::{self, EntityKind, PK, SK};
use crate::types::{Debt, PaymentFrequency, User};

/// The generic item shape stored by the table.
pub type Item = HashMap<String, AttributeValue>;

/// Discriminator attribute distinguishing record kinds within a partition.
pub const ENTITY_ATTR: &str = "entity";

pub fn encode_user(user: &User) -> Result<Item> {
    let key = keys::user_profile_key(&user.username)?;

    let mut item = Item::new();
    item.insert(PK.to_string(), AttributeValue::S(key.partition));
    item.insert(SK.to_string(), AttributeValue::S(key.sort));
    item.insert(
        ENTITY_ATTR.to_string(),
        AttributeValue::S(EntityKind::User.as_str().to_string()),
    );
    item.insert("email".to_string(), AttributeValue::S(user.email.clone()));
    item.insert(
        "full_name".to_string(),
        AttributeValue::S(user.full_name.clone()),
    );
    item.insert(
        "password".to_string(),
        AttributeValue::S(user.password_hash.clone()),
    );
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(user.created_at.clone()),
    );
    item.insert(
        "updated_at".to_string(),
        AttributeValue::S(user.updated_at.clone()),
    );
    Ok(item)
}

pub fn decode_user(item: &Item) -> Result<User> {
    require_kind(item, EntityKind::User)?;
    let username = keys::username_from_partition(require_s(item, PK)?)?;

    Ok(User {
        username: username.to_string(),
        email: require_s(item, "email")?.to_string(),
        full_name: require_s(item, "full_name")?.to_string(),
        password_hash: require_s(item, "password")?.to_string(),
        created_at: require_s(item, "created_at")?.to_string(),
        updated_at: require_s(item, "updated_at")?.to_string(),
    })
}

pub fn encode_debt(debt: &Debt) -> Result<Item> {
    let key = keys::debt_key(&debt.username, &debt.debt_id)?;

    let mut item = Item::new();
    item.insert(PK.to_string(), AttributeValue::S(key.partition));
    item.insert(SK.to_string(), AttributeValue::S(key.sort));
    item.insert(
        ENTITY_ATTR.to_string(),
        AttributeValue::S(EntityKind::Debt.as_str().to_string()),
    );
    item.insert(
        "debt_id".to_string(),
        AttributeValue::S(debt.debt_id.clone()),
    );
    item.insert(
        "debt_name".to_string(),
        AttributeValue::S(debt.debt_name.clone()),
    );
    item.insert(
        "principal".to_string(),
        AttributeValue::N(debt.principal.to_string()),
    );
    item.insert(
        "interest_rate".to_string(),
        AttributeValue::N(debt.interest_rate.to_string()),
    );
    item.insert(
        "start_date".to_string(),
        AttributeValue::S(debt.start_date.clone()),
    );
    if let Some(end_date) = &debt.end_date {
        item.insert("end_date".to_string(), AttributeValue::S(end_date.clone()));
    }
    if let Some(description) = &debt.description {
        item.insert(
            "description".to_string(),
            AttributeValue::S(description.clone()),
        );
    }
    if let Some(creditor) = &debt.creditor {
        item.insert("creditor".to_string(), AttributeValue::S(creditor.clone()));
    }
    item.insert(
        "payment_frequency".to_string(),
        AttributeValue::S(debt.payment_frequency.as_str().to_string()),
    );
    if let Some(amount) = debt.payment_amount {
        item.insert(
            "payment_amount".to_string(),
            AttributeValue::N(amount.to_string()),
        );
    }
    if let Some(minimum) = debt.minimum_payment {
        item.insert(
            "minimum_payment".to_string(),
            AttributeValue::N(minimum.to_string()),
        );
    }
    if let Some(balance) = debt.current_balance {
        item.insert(
            "current_balance".to_string(),
            AttributeValue::N(balance.to_string()),
        );
    }
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(debt.created_at.clone()),
    );
    item.insert(
        "updated_at".to_string(),
        AttributeValue::S(debt.updated_at.clone()),
    );
    Ok(item)
}

pub fn decode_debt(item: &Item) -> Result<Debt> {
    require_kind(item, EntityKind::Debt)?;
    let username = keys::username_from_partition(require_s(item, PK)?)?;
    let debt_id = keys::debt_id_from_sort(require_s(item, SK)?)?;

    let frequency_raw = require_s(item, "payment_frequency")?;
    let payment_frequency = PaymentFrequency::parse(frequency_raw).ok_or_else(|| {
        StoreError::MalformedRecord(format!("unknown payment_frequency '{frequency_raw}'"))
    })?;

    Ok(Debt {
        debt_id: debt_id.to_string(),
        username: username.to_string(),
        debt_name: require_s(item, "debt_name")?.to_string(),
        principal: require_n(item, "principal")?,
        interest_rate: require_n(item, "interest_rate")?,
        start_date: require_s(item, "start_date")?.to_string(),
        end_date: optional_s(item, "end_date"),
        description: optional_s(item, "description"),
        creditor: optional_s(item, "creditor"),
        payment_frequency,
        payment_amount: optional_n(item, "payment_amount")?,
        minimum_payment: optional_n(item, "minimum_payment")?,
        current_balance: optional_n(item, "current_balance")?,
        created_at: require_s(item, "created_at")?.to_string(),
        updated_at: require_s(item, "updated_at")?.to_string(),
    })
}

fn require_kind(item: &Item, kind: EntityKind) -> Result<()> {
    // Absent discriminator is tolerated for items written before the
    // attribute existed; a mismatching one is a schema violation.
    match item.get(ENTITY_ATTR) {
        None => Ok(()),
        Some(AttributeValue::S(s)) if s == kind.as_str() => Ok(()),
        Some(other) => Err(StoreError::MalformedRecord(format!(
            "expected {} entity, found {other:?}",
            kind.as_str()
        ))),
    }
}

fn require_s<'a>(item: &'a Item, attr: &str) -> Result<&'a str> {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.as_str())
        .ok_or_else(|| StoreError::MalformedRecord(format!("missing string attribute '{attr}'")))
}

fn optional_s(item: &Item, attr: &str) -> Option<String> {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

fn require_n(item: &Item, attr: &str) -> Result<f64> {
    let raw = item
        .get(attr)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| StoreError::MalformedRecord(format!("missing number attribute '{attr}'")))?;
    raw.parse().map_err(|_| {
        StoreError::MalformedRecord(format!("attribute '{attr}' is not numeric: '{raw}'"))
    })
}

fn optional_n(item: &Item, attr: &str) -> Result<Option<f64>> {
    match item.get(attr) {
        None => Ok(None),
        Some(value) => {
            let raw = value.as_n().map_err(|_| {
                StoreError::MalformedRecord(format!("attribute '{attr}' is not a number"))
            })?;
            let parsed = raw.parse().map_err(|_| {
                StoreError::MalformedRecord(format!("attribute '{attr}' is not numeric: '{raw}'"))
            })?;
            Ok(Some(parsed))
        }
    }
}
