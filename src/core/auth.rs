// ─── Offline Identity ───

use uuid::Uuid;

/// Placeholder token handed to the game in offline mode.
pub const OFFLINE_ACCESS_TOKEN: &str = "0";

/// User type reported for offline accounts.
pub const OFFLINE_USER_TYPE: &str = "legacy";

/// An offline player identity. The UUID may be pinned by the caller;
/// otherwise a stable one is derived from the username.
#[derive(Debug, Clone)]
pub struct OfflineProfile {
    pub username: String,
    pub uuid: Option<Uuid>,
}

impl OfflineProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            uuid: None,
        }
    }

    /// The UUID used at launch. Derivation follows the vanilla server's
    /// offline scheme (name-based v3 over "OfflinePlayer:<name>"), so the
    /// same username always yields the same identity.
    pub fn effective_uuid(&self) -> Uuid {
        self.uuid.unwrap_or_else(|| {
            Uuid::new_v3(
                &Uuid::NAMESPACE_DNS,
                format!("OfflinePlayer:{}", self.username).as_bytes(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_uuid_is_deterministic() {
        let a = OfflineProfile::new("Steve").effective_uuid();
        let b = OfflineProfile::new("Steve").effective_uuid();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_names_get_distinct_uuids() {
        let a = OfflineProfile::new("Steve").effective_uuid();
        let b = OfflineProfile::new("Alex").effective_uuid();
        assert_ne!(a, b);
    }

    #[test]
    fn explicit_uuid_wins() {
        let pinned = Uuid::new_v3(&Uuid::NAMESPACE_DNS, b"pinned");
        let profile = OfflineProfile {
            username: "Steve".into(),
            uuid: Some(pinned),
        };
        assert_eq!(profile.effective_uuid(), pinned);
    }
}
