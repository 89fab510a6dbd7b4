use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FoodDining,
    Groceries,
    Transportation,
    Entertainment,
    Utilities,
    Shopping,
    Healthcare,
    Education,
    Travel,
    Subscriptions,
    Housing,
    Insurance,
    Other,
}

impl Category {
    /// Storage key, as written in the persisted JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "food_dining",
            Self::Groceries => "groceries",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Shopping => "shopping",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Subscriptions => "subscriptions",
            Self::Housing => "housing",
            Self::Insurance => "insurance",
            Self::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FoodDining => "Food & Dining",
            Self::Groceries => "Groceries",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Shopping => "Shopping",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Subscriptions => "Subscriptions",
            Self::Housing => "Housing",
            Self::Insurance => "Insurance",
            Self::Other => "Other",
        }
    }

    /// Accepts either the storage key or the display name, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower || c.display_name().to_lowercase() == lower)
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::FoodDining,
            Self::Groceries,
            Self::Transportation,
            Self::Entertainment,
            Self::Utilities,
            Self::Shopping,
            Self::Healthcare,
            Self::Education,
            Self::Travel,
            Self::Subscriptions,
            Self::Housing,
            Self::Insurance,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Cash,
    BankTransfer,
    DigitalWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::DigitalWallet => "digital_wallet",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Cash => "Cash",
            Self::BankTransfer => "Bank Transfer",
            Self::DigitalWallet => "Digital Wallet",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "credit_card" | "credit card" | "credit" => Some(Self::CreditCard),
            "debit_card" | "debit card" | "debit" => Some(Self::DebitCard),
            "cash" => Some(Self::Cash),
            "bank_transfer" | "bank transfer" | "transfer" => Some(Self::BankTransfer),
            "digital_wallet" | "digital wallet" | "wallet" => Some(Self::DigitalWallet),
            _ => None,
        }
    }

    /// Exact storage key lookup, without the aliases `parse` accepts.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == key)
    }

    pub fn all() -> &'static [PaymentMethod] {
        &[
            Self::CreditCard,
            Self::DebitCard,
            Self::Cash,
            Self::BankTransfer,
            Self::DigitalWallet,
        ]
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
