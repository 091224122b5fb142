//! Ledger transaction model and the default transaction categories.

use serde::{Deserialize, Serialize};

use crate::{Category, CategorySet, Result, Rgbw};

/// Result code of a transaction that was applied successfully.
pub const SUCCESS_RESULT: &str = "tesSUCCESS";
/// Currency code of the ledger's native asset.
pub const NATIVE_CURRENCY: &str = "XRP";

pub const FAILED: &str = "failed";
pub const IOU_PAYMENTS: &str = "iou_payments";
pub const XRP_PAYMENTS: &str = "xrp_payments";
pub const OFFERS: &str = "offers";
pub const OTHERS: &str = "others";

/// Amount field of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Native amount expressed as a string of drops.
    Drops(String),
    /// Issued currency amount.
    Issued {
        currency: String,
        #[serde(default)]
        issuer: Option<String>,
        value: String,
    },
}

impl Amount {
    pub fn is_native(&self) -> bool {
        match self {
            Self::Drops(_) => true,
            Self::Issued { currency, .. } => currency == NATIVE_CURRENCY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMeta {
    #[serde(rename = "TransactionResult")]
    pub result: String,
}

/// The parts of an expanded ledger transaction the classifier looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "TransactionType")]
    pub kind: String,
    #[serde(rename = "Amount", default)]
    pub amount: Option<Amount>,
    /// Newer API versions report payment amounts here instead of `Amount`.
    #[serde(rename = "DeliverMax", default)]
    pub deliver_max: Option<Amount>,
    #[serde(rename = "metaData", alias = "meta")]
    pub meta: TransactionMeta,
}

impl Transaction {
    pub fn succeeded(&self) -> bool {
        self.meta.result == SUCCESS_RESULT
    }

    pub fn is_payment(&self) -> bool {
        self.kind == "Payment"
    }

    pub fn is_offer(&self) -> bool {
        matches!(self.kind.as_str(), "OfferCreate" | "OfferCancel")
    }

    /// Payment amount from whichever field the API version filled in.
    pub fn payment_amount(&self) -> Option<&Amount> {
        self.amount.as_ref().or(self.deliver_max.as_ref())
    }

    pub fn pays_native(&self) -> bool {
        self.payment_amount().is_some_and(Amount::is_native)
    }

    pub fn pays_issued(&self) -> bool {
        self.payment_amount().is_some_and(|amount| !amount.is_native())
    }
}

/// One closed ledger with its transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerBatch {
    #[serde(default)]
    pub ledger_index: Option<serde_json::Value>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerPayload {
    Response { ledger: LedgerBatch },
    Bare(LedgerBatch),
}

impl LedgerBatch {
    /// Accepts either a `ledger` command response or the bare ledger object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(match serde_json::from_str(json)? {
            LedgerPayload::Response { ledger } => ledger,
            LedgerPayload::Bare(ledger) => ledger,
        })
    }
}

/// Default transaction categories in match order.
///
/// Equal panel counts are painted offers first and failures last. Payments
/// whose amount is missing fall through to `others`.
pub fn categories() -> Result<CategorySet<Transaction>> {
    CategorySet::new(vec![
        Category::new(FAILED, Rgbw::new(255, 0, 0, 0), |tx: &Transaction| {
            !tx.succeeded()
        }),
        Category::new(IOU_PAYMENTS, Rgbw::new(251, 184, 41, 0), |tx: &Transaction| {
            tx.is_payment() && tx.pays_issued()
        }),
        Category::new(XRP_PAYMENTS, Rgbw::new(5, 218, 254, 0), |tx: &Transaction| {
            tx.is_payment() && tx.pays_native()
        }),
        Category::new(OFFERS, Rgbw::new(204, 255, 0, 0), |tx: &Transaction| {
            tx.is_offer()
        }),
        Category::catch_all(OTHERS, Rgbw::new(31, 68, 136, 0)),
    ])?
    .with_priority(&[OFFERS, IOU_PAYMENTS, XRP_PAYMENTS, OTHERS, FAILED])
}
