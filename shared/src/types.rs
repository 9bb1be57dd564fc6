use serde::{Deserialize, Serialize};

use crate::keys::KEY_SEPARATOR;

// ========== USER ==========
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// base64(salt || PBKDF2 digest), never serialized to clients.
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Client-facing view without the credential material.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.len() < 3 || self.username.len() > 50 {
            return Err("username must be between 3 and 50 characters".to_string());
        }
        if self.username.contains(' ') {
            return Err("username must not contain spaces".to_string());
        }
        if self.username.contains(KEY_SEPARATOR) {
            return Err(format!("username must not contain '{KEY_SEPARATOR}'"));
        }
        if !self.email.contains('@') {
            return Err("email is not valid".to_string());
        }
        if self.full_name.len() < 3 || self.full_name.len() > 100 {
            return Err("full_name must be between 3 and 100 characters".to_string());
        }
        if self.password.len() < 8 {
            return Err("password must be at least 8 characters".to_string());
        }
        Ok(())
    }
}

// ========== DEBT ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Debt {
    pub debt_id: String,
    pub username: String,
    pub debt_name: String,
    pub principal: f64,
    pub interest_rate: f64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub creditor: Option<String>,
    pub payment_frequency: PaymentFrequency,
    pub payment_amount: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub current_balance: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annually,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Annually => "annually",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(PaymentFrequency::Weekly),
            "biweekly" => Some(PaymentFrequency::Biweekly),
            "monthly" => Some(PaymentFrequency::Monthly),
            "quarterly" => Some(PaymentFrequency::Quarterly),
            "annually" => Some(PaymentFrequency::Annually),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDebtRequest {
    pub debt_name: String,
    pub principal: f64,
    pub interest_rate: f64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub creditor: Option<String>,
    pub payment_frequency: PaymentFrequency,
    pub payment_amount: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub current_balance: Option<f64>,
}

impl CreateDebtRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.debt_name.is_empty() || self.debt_name.len() > 100 {
            return Err("debt_name must be between 1 and 100 characters".to_string());
        }
        if self.principal <= 0.0 {
            return Err("principal must be greater than zero".to_string());
        }
        if self.interest_rate < 0.0 {
            return Err("interest_rate must not be negative".to_string());
        }
        if self.start_date.is_empty() {
            return Err("start_date is required".to_string());
        }
        validate_amounts(
            self.payment_amount,
            self.minimum_payment,
            self.current_balance,
        )
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateDebtRequest {
    pub debt_name: Option<String>,
    pub principal: Option<f64>,
    pub interest_rate: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub creditor: Option<String>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub payment_amount: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub current_balance: Option<f64>,
}

impl UpdateDebtRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.debt_name {
            if name.is_empty() || name.len() > 100 {
                return Err("debt_name must be between 1 and 100 characters".to_string());
            }
        }
        if let Some(principal) = self.principal {
            if principal <= 0.0 {
                return Err("principal must be greater than zero".to_string());
            }
        }
        if let Some(rate) = self.interest_rate {
            if rate < 0.0 {
                return Err("interest_rate must not be negative".to_string());
            }
        }
        validate_amounts(
            self.payment_amount,
            self.minimum_payment,
            self.current_balance,
        )
    }
}

fn validate_amounts(
    payment_amount: Option<f64>,
    minimum_payment: Option<f64>,
    current_balance: Option<f64>,
) -> Result<(), String> {
    if let Some(amount) = payment_amount {
        if amount <= 0.0 {
            return Err("payment_amount must be greater than zero".to_string());
        }
    }
    if let Some(minimum) = minimum_payment {
        if minimum <= 0.0 {
            return Err("minimum_payment must be greater than zero".to_string());
        }
    }
    if let Some(balance) = current_balance {
        if balance < 0.0 {
            return Err("current_balance must not be negative".to_string());
        }
    }
    Ok(())
}

// ========== LIST RESPONSE ==========
#[derive(Debug, Serialize)]
pub struct DebtSummary {
    pub total_debts: usize,
    pub total_principal: f64,
    pub total_current_balance: f64,
}

#[derive(Debug, Serialize)]
pub struct ListDebtsResponse {
    pub debts: Vec<Debt>,
    pub summary: DebtSummary,
}

impl ListDebtsResponse {
    pub fn new(debts: Vec<Debt>) -> Self {
        let summary = DebtSummary {
            total_debts: debts.len(),
            total_principal: debts.iter().map(|d| d.principal).sum(),
            total_current_balance: debts.iter().filter_map(|d| d.current_balance).sum(),
        };
        Self { debts, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateDebtRequest {
        CreateDebtRequest {
            debt_name: "Car loan".to_string(),
            principal: 12_000.0,
            interest_rate: 4.5,
            start_date: "2026-01-01T00:00:00Z".to_string(),
            end_date: None,
            description: None,
            creditor: Some("First Bank".to_string()),
            payment_frequency: PaymentFrequency::Monthly,
            payment_amount: Some(350.0),
            minimum_payment: None,
            current_balance: Some(11_200.0),
        }
    }

    #[test]
    fn accepts_well_formed_debt_request() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_principal() {
        let mut req = create_request();
        req.principal = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_negative_balance() {
        let mut req = create_request();
        req.current_balance = Some(-1.0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn user_request_validation() {
        let req = CreateUserRequest {
            username: "john".to_string(),
            email: "john@example.com".to_string(),
            full_name: "John Doe".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(req.validate().is_ok());

        let bad_username = CreateUserRequest {
            username: "jo#hn".to_string(),
            email: req.email.clone(),
            full_name: req.full_name.clone(),
            password: req.password.clone(),
        };
        assert!(bad_username.validate().is_err());

        let short_password = CreateUserRequest {
            username: req.username.clone(),
            email: req.email.clone(),
            full_name: req.full_name.clone(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn payment_frequency_round_trips_through_str() {
        for freq in [
            PaymentFrequency::Weekly,
            PaymentFrequency::Biweekly,
            PaymentFrequency::Monthly,
            PaymentFrequency::Quarterly,
            PaymentFrequency::Annually,
        ] {
            assert_eq!(PaymentFrequency::parse(freq.as_str()), Some(freq));
        }
        assert_eq!(PaymentFrequency::parse("fortnightly"), None);
    }

    #[test]
    fn list_response_totals() {
        let debt = Debt {
            debt_id: "d1".to_string(),
            username: "john".to_string(),
            debt_name: "Car loan".to_string(),
            principal: 100.0,
            interest_rate: 1.0,
            start_date: "2026-01-01T00:00:00Z".to_string(),
            end_date: None,
            description: None,
            creditor: None,
            payment_frequency: PaymentFrequency::Monthly,
            payment_amount: None,
            minimum_payment: None,
            current_balance: Some(60.0),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let mut other = debt.clone();
        other.debt_id = "d2".to_string();
        other.principal = 50.0;
        other.current_balance = None;

        let resp = ListDebtsResponse::new(vec![debt, other]);
        assert_eq!(resp.summary.total_debts, 2);
        assert_eq!(resp.summary.total_principal, 150.0);
        assert_eq!(resp.summary.total_current_balance, 60.0);
    }
}
