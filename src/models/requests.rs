use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Profile;

/// Request to score a candidate against a posting
///
/// Both sides are mandatory; a body missing either key is rejected before
/// any scoring happens.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CalculateMatchRequest {
    #[validate(nested)]
    #[serde(rename = "userData")]
    pub user_data: Profile,
    #[validate(nested)]
    #[serde(rename = "itemData")]
    pub item_data: Profile,
}
