//! Tip notifications published on the tip bot channel.

use serde::{Deserialize, Serialize};

use crate::{Category, CategorySet, Result, Rgbw};

/// Message name the tip bot uses for tips.
pub const TIP_MESSAGE: &str = "tip";

pub const TIPS_RECEIVED: &str = "tips_received";
pub const TIPS_SENT: &str = "tips_sent";
pub const TIPS_OTHER: &str = "tips_other";
pub const NOTIFICATIONS: &str = "notifications";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipParty {
    pub user: String,
    #[serde(default)]
    pub network: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipData {
    pub to: TipParty,
    #[serde(default)]
    pub from: Option<TipParty>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// One message from the channel. Non-tip messages carry no tip data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipMessage {
    pub name: String,
    #[serde(default)]
    pub data: Option<TipData>,
}

impl TipMessage {
    fn tip(&self) -> Option<&TipData> {
        if self.name == TIP_MESSAGE {
            self.data.as_ref()
        } else {
            None
        }
    }

    pub fn is_tip(&self) -> bool {
        self.tip().is_some()
    }

    pub fn is_tip_to(&self, user: &str) -> bool {
        self.tip().is_some_and(|tip| tip.to.user == user)
    }

    pub fn is_tip_from(&self, user: &str) -> bool {
        self.tip()
            .and_then(|tip| tip.from.as_ref())
            .is_some_and(|from| from.user == user)
    }

    /// Reads a JSON array of messages.
    pub fn batch_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Tip categories for `user`, highest priority first.
///
/// Without a user only the generic tip and notification buckets match.
pub fn categories(user: Option<&str>) -> Result<CategorySet<TipMessage>> {
    let received = user.map(str::to_owned);
    let sent = received.clone();

    CategorySet::new(vec![
        Category::new(
            TIPS_RECEIVED,
            Rgbw::from_hsb(200.0, 100.0, 100.0),
            move |message: &TipMessage| {
                received
                    .as_deref()
                    .is_some_and(|user| message.is_tip_to(user))
            },
        ),
        Category::new(
            TIPS_SENT,
            Rgbw::from_hsb(0.0, 0.0, 100.0),
            move |message: &TipMessage| sent.as_deref().is_some_and(|user| message.is_tip_from(user)),
        ),
        Category::new(
            TIPS_OTHER,
            Rgbw::new(31, 68, 136, 0),
            |message: &TipMessage| message.is_tip(),
        ),
        Category::catch_all(NOTIFICATIONS, Rgbw::new(0, 0, 0, 16)),
    ])
}
