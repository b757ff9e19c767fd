use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::forecast::DEFAULT_SPAN;
use crate::prices::PriceFormat;

pub const DEFAULT_MEALDB_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const DEFAULT_MAX_LISTINGS: usize = 20;

/// Settings for the recipe matcher.
///
/// Translation is only attempted when both `user_lang` and `lookup_lang` are
/// set and `translate_url` points at a translation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecipeSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_candidates: Option<usize>,
    pub max_results: usize,
    pub user_lang: Option<String>,
    pub lookup_lang: Option<String>,
    pub translate_url: Option<String>,
    pub translate_api_key: Option<String>,
}

impl Default for RecipeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MEALDB_URL.to_string(),
            timeout_secs: 10,
            max_candidates: None,
            max_results: 3,
            user_lang: None,
            lookup_lang: None,
            translate_url: None,
            translate_api_key: None,
        }
    }
}

/// Settings for the marketplace price tracker.
///
/// `search_url` must contain a `{query}` placeholder. Selectors are plain CSS
/// selectors; `name_selector`, `link_selector` and `price_selector` are
/// evaluated relative to each element matched by `item_selector`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerSettings {
    pub search_url: String,
    pub item_selector: String,
    pub name_selector: String,
    pub link_selector: String,
    pub price_selector: String,
    pub price_format: PriceFormat,
    pub max_listings: usize,
    pub span: usize,
    pub timeout_secs: u64,
    pub db_dir: String,
    pub table: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            search_url: "https://lista.mercadolivre.com.br/{query}".to_string(),
            item_selector: "li.ui-search-layout__item".to_string(),
            name_selector: "h2, h3".to_string(),
            link_selector: "a[href]".to_string(),
            price_selector: ".price".to_string(),
            price_format: PriceFormat::Brazilian,
            max_listings: DEFAULT_MAX_LISTINGS,
            span: DEFAULT_SPAN,
            timeout_secs: 10,
            db_dir: "~/.local/share/chef/prices".to_string(),
            table: "price_observations".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub recipes: RecipeSettings,
    pub tracker: TrackerSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.recipes.timeout_secs == 0 || self.tracker.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be positive".into()));
        }
        if self.recipes.max_results == 0 {
            return Err(Error::InvalidConfig("recipes.max_results must be positive".into()));
        }
        if self.recipes.max_candidates == Some(0) {
            return Err(Error::InvalidConfig("recipes.max_candidates must be positive when set".into()));
        }
        if self.tracker.span == 0 {
            return Err(Error::InvalidConfig("tracker.span must be at least 1".into()));
        }
        if !self.tracker.search_url.contains("{query}") {
            return Err(Error::InvalidConfig("tracker.search_url needs a {query} placeholder".into()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from_dir(Path::new("."), &env_name)
    }

    /// Merge `config.toml`, then `config.<env>.toml` from `dir`, then `APP_*`
    /// environment variables (`__` separates nested keys).
    pub fn load_from_dir(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    /// Build a config from an in-memory TOML document layered over the defaults.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if matches!(env, "prod" | "production") && settings.recipes.base_url.starts_with("http://") {
            return Err(Error::InvalidConfig("recipes.base_url must use https in production".into()).into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
