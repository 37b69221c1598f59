use anyhow::{Context, Result, bail};

use mealweek_core::spoonacular::{SearchResponse, build_exclude_list};

const SEARCH_URL: &str = "https://api.spoonacular.com/recipes/complexSearch";

/// Environment variable holding the upstream credential.
pub const API_KEY_VAR: &str = "SPOONACULAR_KEY";

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub cuisine: String,
    pub number: u32,
    pub halal_approx: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            cuisine: String::new(),
            number: 12,
            halal_approx: false,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

pub struct SpoonacularClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl SpoonacularClient {
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty());
        Self::with_api_key(api_key)
    }

    #[must_use]
    pub fn with_api_key(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "mealweek-cli/{} (meal planner)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, api_key }
    }

    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_query(&self, key: &str, params: &SearchParams) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("apiKey", key.to_string()),
            ("query", params.query.clone()),
            ("cuisine", params.cuisine.clone()),
            ("number", params.number.to_string()),
            ("addRecipeInformation", "true".to_string()),
            ("addRecipeNutrition", "true".to_string()),
            ("instructionsRequired", "true".to_string()),
            ("sort", "healthiness".to_string()),
        ];
        let exclude = build_exclude_list(&params.exclude, params.halal_approx);
        if !exclude.is_empty() {
            query.push(("excludeIngredients", exclude.join(",")));
        }
        let include: Vec<&str> = params
            .include
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if !include.is_empty() {
            query.push(("includeIngredients", include.join(",")));
        }
        query
    }

    /// Searches the provider and parses the result list. An empty or
    /// partial payload parses to an empty result list rather than failing.
    pub async fn search_async(&self, params: &SearchParams) -> Result<SearchResponse> {
        let Some(key) = self.api_key.as_deref() else {
            bail!("Missing {API_KEY_VAR}");
        };
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&self.build_query(key, params))
            .send()
            .await
            .context("Failed to reach Spoonacular API")?;

        resp.json()
            .await
            .context("Failed to parse Spoonacular search response")
    }

    /// Searches the provider and passes the raw payload plus HTTP status
    /// through, for the proxy endpoint.
    pub async fn search_raw(&self, params: &SearchParams) -> Result<(u16, serde_json::Value)> {
        let Some(key) = self.api_key.as_deref() else {
            bail!("Missing {API_KEY_VAR}");
        };
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&self.build_query(key, params))
            .send()
            .await
            .context("Failed to reach Spoonacular API")?;

        let status = resp.status().as_u16();
        let body = resp
            .json()
            .await
            .context("Failed to parse Spoonacular response body")?;
        Ok((status, body))
    }
}

impl Default for SpoonacularClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_errors_before_network() {
        let client = SpoonacularClient::with_api_key(None);
        assert!(!client.has_key());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(client.search_async(&SearchParams::default()))
            .unwrap_err();
        assert!(err.to_string().contains("SPOONACULAR_KEY"));
    }

    #[test]
    fn test_build_query_fixed_parameters() {
        let client = SpoonacularClient::with_api_key(Some("k".to_string()));
        let params = SearchParams {
            query: "chicken rice".to_string(),
            number: 5,
            ..SearchParams::default()
        };
        let query = client.build_query("k", &params);

        let get = |name: &str| {
            query
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("apiKey").as_deref(), Some("k"));
        assert_eq!(get("query").as_deref(), Some("chicken rice"));
        assert_eq!(get("number").as_deref(), Some("5"));
        assert_eq!(get("addRecipeNutrition").as_deref(), Some("true"));
        assert_eq!(get("sort").as_deref(), Some("healthiness"));
        assert!(get("excludeIngredients").is_none());
        assert!(get("includeIngredients").is_none());
    }

    #[test]
    fn test_build_query_halal_expands_excludes() {
        let client = SpoonacularClient::with_api_key(Some("k".to_string()));
        let params = SearchParams {
            halal_approx: true,
            exclude: vec!["mushrooms".to_string()],
            include: vec!["chicken".to_string()],
            ..SearchParams::default()
        };
        let query = client.build_query("k", &params);

        let excludes = &query
            .iter()
            .find(|(k, _)| *k == "excludeIngredients")
            .unwrap()
            .1;
        assert!(excludes.starts_with("mushrooms,"));
        assert!(excludes.contains("pork"));
        assert!(excludes.contains("gelatin"));

        let includes = &query
            .iter()
            .find(|(k, _)| *k == "includeIngredients")
            .unwrap()
            .1;
        assert_eq!(includes, "chicken");
    }

    // --- Integration test (hits the real Spoonacular API) ---

    #[tokio::test]
    #[ignore = "hits Spoonacular API, needs SPOONACULAR_KEY"]
    async fn test_search_returns_results() {
        let client = SpoonacularClient::new();
        let resp = client
            .search_async(&SearchParams {
                query: "chicken".to_string(),
                number: 3,
                ..SearchParams::default()
            })
            .await
            .unwrap();
        assert!(!resp.results.is_empty());
        for r in &resp.results {
            assert!(!r.title.is_empty());
        }
    }
}
