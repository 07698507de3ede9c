pub mod meal_preferences;

pub use meal_preferences::*;

use serde::{Deserialize, Serialize};

/// The signed-in user, as kept in the local store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
