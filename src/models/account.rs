#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Cash,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::CreditCard => "Credit Card",
            Self::Cash => "Cash",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "checking" => Self::Checking,
            "savings" => Self::Savings,
            "credit card" | "creditcard" | "credit" => Self::CreditCard,
            "cash" => Self::Cash,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Option<i64>,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub created_at: String,
}

impl Account {
    pub fn new(name: String, account_type: AccountType) -> Self {
        Self {
            id: None,
            name,
            account_type,
            currency: "USD".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
