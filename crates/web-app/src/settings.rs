use treino_domain::CategoryCode;

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;

    /// The stored settings, or the defaults if they cannot be read.
    async fn settings_or_default(&self) -> Settings {
        self.get_settings().await.unwrap_or_default()
    }
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub default_category: String,
    pub expand_history: bool,
}

impl Settings {
    /// The configured start category, or the gym category if the stored value is unknown.
    #[must_use]
    pub fn start_category(&self) -> CategoryCode {
        CategoryCode::try_from(self.default_category.as_str()).unwrap_or(CategoryCode::Gym)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_category: CategoryCode::Gym.id().to_string(),
            expand_history: false,
        }
    }
}
