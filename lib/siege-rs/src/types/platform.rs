/// The platform a profile lives on
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    Uplay,
    Xbl,
    Psn,
}

impl PlatformType {
    /// The name the api uses for this platform
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uplay => "uplay",
            Self::Xbl => "xbl",
            Self::Psn => "psn",
        }
    }

    /// The stats platform group this platform belongs to
    pub fn platform_group(self) -> &'static str {
        match self {
            Self::Uplay => "PC",
            Self::Xbl | Self::Psn => "CONSOLE",
        }
    }
}

impl Default for PlatformType {
    fn default() -> Self {
        Self::Uplay
    }
}
