//! High-level operations on the debt management table.
//!
//! One [`DebtTable`] is built at process start around the shared DynamoDB
//! client and passed into handlers explicitly; nothing here holds global
//! state. Reads and writes go through the access planner so every
//! operation uses the key pattern and index the layout guarantees.

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use tracing::info;

use crate::codec::{self, Item};
use crate::error::{Result, StoreError};
use crate::keys::{PK, SK};
use crate::plan::{self, QueryPlan};
use crate::types::{Debt, User};

const DEFAULT_TABLE_NAME: &str = "DebtManagementTable";

/// Encapsulates the single-table debt store.
pub struct DebtTable {
    client: DynamoClient,
    table_name: String,
}

impl DebtTable {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Table name from `TABLE_NAME`, falling back to the deployed default.
    pub fn from_env(client: DynamoClient) -> Self {
        let table_name =
            std::env::var("TABLE_NAME").unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());
        Self::new(client, table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    // --- Users ---

    /// Create a user profile. Fails with `AlreadyExists` when the username
    /// is taken.
    pub async fn put_user(&self, user: &User) -> Result<()> {
        let item = codec::encode_user(user)?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("User '{}' created in '{}'", user.username, self.table_name);
                Ok(())
            }
            Err(SdkError::ServiceError(context))
                if context.err().is_conditional_check_failed_exception() =>
            {
                Err(StoreError::AlreadyExists {
                    kind: "user",
                    id: user.username.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let lookup = plan::get_user(username)?;
        let mut items = self.find(&lookup).await?;
        match items.pop() {
            Some(item) => Ok(Some(codec::decode_user(&item)?)),
            None => Ok(None),
        }
    }

    // --- Debts ---

    /// Create a debt under its owner's partition. Fails with
    /// `AlreadyExists` on a debt-id collision.
    pub async fn put_debt(&self, debt: &Debt) -> Result<()> {
        let item = codec::encode_debt(debt)?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(
                    "Debt '{}' ({}) created for user '{}'",
                    debt.debt_name, debt.debt_id, debt.username
                );
                Ok(())
            }
            Err(SdkError::ServiceError(context))
                if context.err().is_conditional_check_failed_exception() =>
            {
                Err(StoreError::AlreadyExists {
                    kind: "debt",
                    id: debt.debt_id.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Overwrite an existing debt. Last writer wins, the storage engine's
    /// native put semantics.
    pub async fn update_debt(&self, debt: &Debt) -> Result<()> {
        let item = codec::encode_debt(debt)?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    /// Fetch one debt on behalf of the authenticated caller.
    ///
    /// The read is scoped to the caller's partition, so a hit is already
    /// owned by them. On a miss the inverted index tells a foreign debt
    /// (`Forbidden`) apart from a nonexistent one (`NotFound`).
    pub async fn get_debt(&self, caller: &str, debt_id: &str) -> Result<Debt> {
        let lookup = plan::get_debt(caller, debt_id)?;
        let mut items = self.find(&lookup).await?;
        if let Some(item) = items.pop() {
            let debt = codec::decode_debt(&item)?;
            plan::check_owner(&debt.username, caller)?;
            return Ok(debt);
        }

        let owner_lookup = plan::debt_owner_lookup(debt_id)?;
        let exists_elsewhere = !self.find(&owner_lookup).await?.is_empty();
        Err(plan::missing_debt(debt_id, exists_elsewhere))
    }

    /// All debts owned by the caller, from one contiguous partition query.
    pub async fn list_debts(&self, caller: &str) -> Result<Vec<Debt>> {
        let lookup = plan::list_debts(caller)?;
        self.find(&lookup)
            .await?
            .iter()
            .map(codec::decode_debt)
            .collect()
    }

    /// Delete a debt after verifying existence and ownership. Returns the
    /// deleted record.
    pub async fn delete_debt(&self, caller: &str, debt_id: &str) -> Result<Debt> {
        let debt = self.get_debt(caller, debt_id).await?;

        let key = crate::keys::debt_key(caller, debt_id)?;
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(key.partition))
            .key(SK, AttributeValue::S(key.sort))
            .send()
            .await?;

        info!("Debt '{}' deleted for user '{}'", debt_id, caller);
        Ok(debt)
    }

    /// Execute a query plan against the table.
    async fn find(&self, lookup: &QueryPlan) -> Result<Vec<Item>> {
        match lookup {
            QueryPlan::PointGet { key } => {
                let response = self
                    .client
                    .get_item()
                    .table_name(&self.table_name)
                    .key(PK, AttributeValue::S(key.partition.clone()))
                    .key(SK, AttributeValue::S(key.sort.clone()))
                    .send()
                    .await?;
                Ok(response.item.into_iter().collect())
            }
            QueryPlan::PrefixQuery {
                partition,
                sort_prefix,
            } => {
                // Drain the native result pages so callers always see the
                // whole partition.
                let mut items = Vec::new();
                let mut last_evaluated_key = None;
                loop {
                    let mut query = self
                        .client
                        .query()
                        .table_name(&self.table_name)
                        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                        .expression_attribute_values(":pk", AttributeValue::S(partition.clone()))
                        .expression_attribute_values(
                            ":sk_prefix",
                            AttributeValue::S(sort_prefix.clone()),
                        );
                    if let Some(key) = last_evaluated_key {
                        query = query.set_exclusive_start_key(Some(key));
                    }

                    let response = query.send().await?;
                    if let Some(batch) = response.items {
                        items.extend(batch);
                    }

                    last_evaluated_key = response.last_evaluated_key;
                    if last_evaluated_key.is_none() {
                        break;
                    }
                }
                Ok(items)
            }
            QueryPlan::IndexLookup { index, partition } => {
                let response = self
                    .client
                    .query()
                    .table_name(&self.table_name)
                    .index_name(*index)
                    .key_condition_expression("SK = :sk")
                    .expression_attribute_values(":sk", AttributeValue::S(partition.clone()))
                    .send()
                    .await?;
                Ok(response.items.unwrap_or_default())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};

    /// A table over a client that never reaches the network; only code
    /// paths that fail before sending may run against it.
    pub(crate) fn offline_table() -> DebtTable {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .build();
        DebtTable::new(DynamoClient::from_conf(config), DEFAULT_TABLE_NAME)
    }
}
