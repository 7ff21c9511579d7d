use serde::{Deserialize, Serialize};

/// Email-keyed user identity. The password hash never leaves the store
/// layer; this struct is the read-side projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub two_fa_enabled: bool,
    pub date_joined: String,
}
