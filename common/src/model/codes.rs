use serde::{Deserialize, Serialize};

pub const RISK_TIER_CODES: &[&str] = &["A", "B", "C"];
pub const CONTRACT_MODEL_CODES: &[&str] = &["PO", "LTA", "Subscription"];

/// Credit risk classification, `A` being the lowest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    A,
    B,
    C,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::A => "A",
            RiskTier::B => "B",
            RiskTier::C => "C",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(RiskTier::A),
            "B" => Some(RiskTier::B),
            "C" => Some(RiskTier::C),
            _ => None,
        }
    }
}

/// Commercial agreement a client buys under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractModel {
    /// Individual purchase orders.
    #[serde(rename = "PO")]
    PurchaseOrder,
    /// Long-term agreement.
    #[serde(rename = "LTA")]
    LongTermAgreement,
    Subscription,
}

impl ContractModel {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractModel::PurchaseOrder => "PO",
            ContractModel::LongTermAgreement => "LTA",
            ContractModel::Subscription => "Subscription",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PO" => Some(ContractModel::PurchaseOrder),
            "LTA" => Some(ContractModel::LongTermAgreement),
            "Subscription" => Some(ContractModel::Subscription),
            _ => None,
        }
    }
}
