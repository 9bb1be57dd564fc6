use lambda_http::{http::StatusCode, Body, Error, Response};

use crate::responses;
use crate::store::DebtTable;
use crate::types::{CreateDebtRequest, Debt, ListDebtsResponse, UpdateDebtRequest};

/// Create a new debt for the authenticated caller. The owner comes from
/// the auth context, so users can only create debts for themselves; the
/// debt id is server-generated.
pub async fn create_debt(
    table: &DebtTable,
    caller: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateDebtRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!("Failed to parse debt body: {}", e);
            return responses::bad_request(&format!("Invalid request body: {e}"));
        }
    };

    if let Err(detail) = req.validate() {
        return responses::bad_request(&detail);
    }

    let now = chrono::Utc::now().to_rfc3339();
    let debt = Debt {
        debt_id: uuid::Uuid::new_v4().to_string(),
        username: caller.to_string(),
        debt_name: req.debt_name,
        principal: req.principal,
        interest_rate: req.interest_rate,
        start_date: req.start_date,
        end_date: req.end_date,
        description: req.description,
        creditor: req.creditor,
        payment_frequency: req.payment_frequency,
        payment_amount: req.payment_amount,
        minimum_payment: req.minimum_payment,
        current_balance: req.current_balance,
        created_at: now.clone(),
        updated_at: now,
    };

    match table.put_debt(&debt).await {
        Ok(()) => responses::json(
            StatusCode::CREATED,
            &serde_json::json!({
                "message": format!("Debt '{}' created successfully", debt.debt_name),
                "debt": debt,
            }),
        ),
        Err(err) => responses::store_error(&err),
    }
}

/// Get one debt by id.
pub async fn get_debt(
    table: &DebtTable,
    caller: &str,
    debt_id: &str,
) -> Result<Response<Body>, Error> {
    match table.get_debt(caller, debt_id).await {
        Ok(debt) => responses::json(StatusCode::OK, &debt),
        Err(err) => responses::store_error(&err),
    }
}

/// List all debts of the authenticated caller, with summary totals.
pub async fn list_debts(table: &DebtTable, caller: &str) -> Result<Response<Body>, Error> {
    match table.list_debts(caller).await {
        Ok(debts) => responses::json(StatusCode::OK, &ListDebtsResponse::new(debts)),
        Err(err) => responses::store_error(&err),
    }
}

/// Update an existing debt. Provided fields replace the stored ones;
/// debt id, owner, and creation timestamp are preserved.
pub async fn update_debt(
    table: &DebtTable,
    caller: &str,
    debt_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: UpdateDebtRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!("Failed to parse debt update body: {}", e);
            return responses::bad_request(&format!("Invalid request body: {e}"));
        }
    };

    if let Err(detail) = req.validate() {
        return responses::bad_request(&detail);
    }

    let existing = match table.get_debt(caller, debt_id).await {
        Ok(debt) => debt,
        Err(err) => return responses::store_error(&err),
    };

    let mut updated = existing;
    if let Some(debt_name) = req.debt_name {
        updated.debt_name = debt_name;
    }
    if let Some(principal) = req.principal {
        updated.principal = principal;
    }
    if let Some(interest_rate) = req.interest_rate {
        updated.interest_rate = interest_rate;
    }
    if let Some(start_date) = req.start_date {
        updated.start_date = start_date;
    }
    if let Some(end_date) = req.end_date {
        updated.end_date = Some(end_date);
    }
    if let Some(description) = req.description {
        updated.description = Some(description);
    }
    if let Some(creditor) = req.creditor {
        updated.creditor = Some(creditor);
    }
    if let Some(payment_frequency) = req.payment_frequency {
        updated.payment_frequency = payment_frequency;
    }
    if let Some(payment_amount) = req.payment_amount {
        updated.payment_amount = Some(payment_amount);
    }
    if let Some(minimum_payment) = req.minimum_payment {
        updated.minimum_payment = Some(minimum_payment);
    }
    if let Some(current_balance) = req.current_balance {
        updated.current_balance = Some(current_balance);
    }
    updated.updated_at = chrono::Utc::now().to_rfc3339();

    match table.update_debt(&updated).await {
        Ok(()) => responses::json(
            StatusCode::OK,
            &serde_json::json!({
                "message": format!("Debt '{}' updated successfully", updated.debt_name),
                "debt": updated,
            }),
        ),
        Err(err) => responses::store_error(&err),
    }
}

/// Delete a debt after the store verifies existence and ownership.
pub async fn delete_debt(
    table: &DebtTable,
    caller: &str,
    debt_id: &str,
) -> Result<Response<Body>, Error> {
    match table.delete_debt(caller, debt_id).await {
        Ok(debt) => responses::json(
            StatusCode::OK,
            &serde_json::json!({
                "message": format!("Debt '{}' deleted successfully", debt.debt_name),
                "debt_id": debt.debt_id,
                "debt_name": debt.debt_name,
                "username": debt.username,
            }),
        ),
        Err(err) => responses::store_error(&err),
    }
}
