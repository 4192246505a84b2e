use crate::PlatformType;
use std::collections::HashMap;

/// The response of a profile search
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct ProfileList {
    pub profiles: Vec<Profile>,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

/// A ubisoft profile on one platform
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: String,
    pub user_id: String,
    pub platform_type: PlatformType,
    pub id_on_platform: String,
    pub name_on_platform: String,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod test {
    use super::*;

    const PROFILES: &str = include_str!("../../test_data/profiles.json");

    #[test]
    fn parse() {
        let list: ProfileList = serde_json::from_str(PROFILES).expect("failed to parse");
        assert_eq!(list.profiles.len(), 1);

        let profile = &list.profiles[0];
        assert_eq!(profile.name_on_platform, "Beaulo.TSM");
        assert_eq!(profile.platform_type, PlatformType::Uplay);
        assert!(profile.unknown.is_empty());
    }

    #[test]
    fn parse_empty() {
        let list: ProfileList =
            serde_json::from_str(r#"{"profiles":[]}"#).expect("failed to parse");
        assert!(list.profiles.is_empty());
    }
}
