use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    /// Recipient.
    pub user: String,
    pub title: String,
    pub description: String,
    /// Client route opened when the notification is clicked.
    pub on_click: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
