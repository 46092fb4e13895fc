//! Meal inspiration - a random dish from a public meal database

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::InspirationConfig;
use crate::core::entity::OTHER_CATEGORY;
use crate::core::lookup::LookupError;

/// A suggested dish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    /// Name as reported by the service
    pub name: String,

    /// Name shown to the user, translated when a translation is known
    pub display_name: String,

    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Source of random meals
#[async_trait]
pub trait InspirationSource: Send + Sync {
    async fn random_meal(&self) -> Result<Option<Meal>, LookupError>;
}

/// Translation table for dish names, falling back to the original name
#[derive(Debug, Clone, Default)]
pub struct DisplayNames {
    names: BTreeMap<String, String>,
}

impl DisplayNames {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    pub fn display<'a>(&'a self, name: &'a str) -> &'a str {
        self.names.get(name).map(String::as_str).unwrap_or(name)
    }
}

#[derive(Debug, Deserialize)]
struct MealResponse {
    #[serde(default)]
    meals: Option<Vec<MealRecord>>,
}

#[derive(Debug, Deserialize)]
struct MealRecord {
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
}

/// TheMealDB random-meal client
pub struct MealDb {
    url: String,
    names: DisplayNames,
    http_client: Client,
}

impl MealDb {
    pub fn new(config: &InspirationConfig) -> Result<Self, LookupError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: config.url.clone(),
            names: DisplayNames::new(config.translations.clone()),
            http_client,
        })
    }

    fn to_meal(&self, record: MealRecord) -> Option<Meal> {
        let name = record.name.filter(|n| !n.trim().is_empty())?;
        Some(Meal {
            display_name: self.names.display(&name).to_string(),
            category: record
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| OTHER_CATEGORY.to_string()),
            thumbnail: record.thumbnail.filter(|t| !t.is_empty()),
            name,
        })
    }
}

#[async_trait]
impl InspirationSource for MealDb {
    async fn random_meal(&self) -> Result<Option<Meal>, LookupError> {
        debug!(url = %self.url, "Fetching random meal");
        let response = self.http_client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: MealResponse = response.json().await?;
        Ok(body
            .meals
            .and_then(|meals| meals.into_iter().next())
            .and_then(|record| self.to_meal(record)))
    }
}

/// Fetch one meal, degrading every failure to `None`
pub async fn inspire(source: &dyn InspirationSource, timeout: Duration) -> Option<Meal> {
    let result = match tokio::time::timeout(timeout, source.random_meal()).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout(timeout)),
    };

    match result {
        Ok(meal) => meal,
        Err(e) => {
            warn!(error = %e, "Meal inspiration unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowSource;

    #[async_trait]
    impl InspirationSource for SlowSource {
        async fn random_meal(&self) -> Result<Option<Meal>, LookupError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(None)
        }
    }

    struct FixedSource(Meal);

    #[async_trait]
    impl InspirationSource for FixedSource {
        async fn random_meal(&self) -> Result<Option<Meal>, LookupError> {
            Ok(Some(self.0.clone()))
        }
    }

    fn mealdb(translations: &[(&str, &str)]) -> MealDb {
        let config = InspirationConfig {
            translations: translations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        };
        MealDb::new(&config).unwrap()
    }

    #[test]
    fn test_display_names_fall_back() {
        let names = DisplayNames::new(BTreeMap::from([(
            "Beef Stroganoff".to_string(),
            "Marhapörkölt".to_string(),
        )]));
        assert_eq!(names.display("Beef Stroganoff"), "Marhapörkölt");
        assert_eq!(names.display("Kedgeree"), "Kedgeree");
    }

    #[test]
    fn test_record_mapping() {
        let db = mealdb(&[("Kedgeree", "Kedgeree rizs")]);
        let body: MealResponse = serde_json::from_str(
            r#"{"meals":[{"strMeal":"Kedgeree","strCategory":"Seafood","strMealThumb":"https://img/k.jpg"}]}"#,
        )
        .unwrap();
        let record = body.meals.unwrap().into_iter().next().unwrap();
        let meal = db.to_meal(record).unwrap();
        assert_eq!(meal.name, "Kedgeree");
        assert_eq!(meal.display_name, "Kedgeree rizs");
        assert_eq!(meal.category, "Seafood");
        assert_eq!(meal.thumbnail.as_deref(), Some("https://img/k.jpg"));
    }

    #[test]
    fn test_record_without_name_is_dropped() {
        let db = mealdb(&[]);
        let body: MealResponse =
            serde_json::from_str(r#"{"meals":[{"strCategory":"Dessert"}]}"#).unwrap();
        let record = body.meals.unwrap().into_iter().next().unwrap();
        assert!(db.to_meal(record).is_none());

        let empty: MealResponse = serde_json::from_str(r#"{"meals":null}"#).unwrap();
        assert!(empty.meals.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_to_none() {
        assert!(inspire(&SlowSource, Duration::from_secs(3)).await.is_none());
    }

    #[tokio::test]
    async fn test_inspire_passes_meal_through() {
        let meal = Meal {
            name: "Soup".to_string(),
            display_name: "Soup".to_string(),
            category: "Starter".to_string(),
            thumbnail: None,
        };
        let got = inspire(&FixedSource(meal.clone()), Duration::from_secs(1)).await;
        assert_eq!(got, Some(meal));
    }
}
