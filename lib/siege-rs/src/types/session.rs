use std::collections::HashMap;

/// A logged-in ubisoft session.
///
/// The ticket is only valid until `expiration`.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub ticket: String,
    pub session_id: String,
    pub expiration: String,
    pub profile_id: String,

    #[serde(default)]
    pub name_on_platform: Option<String>,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod test {
    use super::*;

    const SESSION: &str = include_str!("../../test_data/session.json");

    #[test]
    fn parse() {
        let session: Session = serde_json::from_str(SESSION).expect("failed to parse");
        assert_eq!(session.session_id, "5b1c8a2e-9f0e-4a2b-8c1f-0d2f1e3a4b5c");
        assert_eq!(session.name_on_platform.as_deref(), Some("JackalBot"));
        assert!(session.unknown.contains_key("spaceId"));
    }
}
