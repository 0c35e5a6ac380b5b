//! Remote SIC reference tables.
//!
//! Sector derivation needs the SIC major-group and division tables published
//! in the upstream `sic4-list` repository. Fetches are cache-first: a cached
//! payload short-circuits the network entirely, so reruns work offline.

use crate::cache::SqliteCache;
use crate::error::Result;
use polars::prelude::*;
use std::io::Cursor;
use std::time::Duration;

/// Upstream CSV mapping two-digit SIC major groups to division letters.
pub const MAJOR_GROUPS_URL: &str =
    "https://raw.githubusercontent.com/saintsjd/sic4-list/master/major-groups.csv";

/// Upstream CSV mapping division letters to division names.
pub const DIVISIONS_URL: &str =
    "https://raw.githubusercontent.com/saintsjd/sic4-list/master/divisions.csv";

const USER_AGENT: &str = "Darwin-CreditPanel/0.1 (contact@example.com)";

/// Fetch behavior configuration.
#[derive(Debug, Clone, Copy)]
pub struct FetchConfig {
    /// Read from and write to the cache.
    pub use_cache: bool,
    /// Bypass cached payloads and re-fetch from upstream.
    pub force_refresh: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// The two fetched reference tables, parsed.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    /// `Major Group` to `Division` rows.
    pub major_groups: DataFrame,
    /// `Division` to `Description` rows.
    pub divisions: DataFrame,
}

/// Fetches reference tables, cache-first.
#[derive(Debug)]
pub struct ReferenceClient {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ReferenceClient {
    /// Create a client with default fetch behavior.
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a client with explicit fetch behavior.
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch both reference tables, driving the two requests concurrently.
    pub async fn fetch(&self, cache: Option<&SqliteCache>) -> Result<ReferenceTables> {
        let (major_groups, divisions) = futures::future::try_join(
            self.fetch_table(cache, "major_groups", MAJOR_GROUPS_URL),
            self.fetch_table(cache, "divisions", DIVISIONS_URL),
        )
        .await?;

        Ok(ReferenceTables {
            major_groups,
            divisions,
        })
    }

    async fn fetch_table(
        &self,
        cache: Option<&SqliteCache>,
        key: &str,
        url: &str,
    ) -> Result<DataFrame> {
        let payload = self.fetch_payload(cache, key, url).await?;
        parse_reference_csv(&payload)
    }

    async fn fetch_payload(
        &self,
        cache: Option<&SqliteCache>,
        key: &str,
        url: &str,
    ) -> Result<String> {
        if self.config.use_cache && !self.config.force_refresh {
            if let Some(cache) = cache {
                if let Some(payload) = cache.get_reference(key)? {
                    log::debug!("reference table '{}' served from cache", key);
                    return Ok(payload);
                }
            }
        }

        log::info!("fetching reference table '{}' from {}", key, url);
        let payload = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if self.config.use_cache {
            if let Some(cache) = cache {
                cache.put_reference(key, url, &payload)?;
            }
        }

        Ok(payload)
    }
}

fn parse_reference_csv(payload: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(payload))
        .finish()?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAJOR_GROUPS_CSV: &str = "Major Group,Description,Division\n\
        01,Agricultural Production Crops,A\n\
        35,\"Industrial And Commercial Machinery And Computer Equipment\",D\n\
        40,Railroad Transportation,E\n";

    const DIVISIONS_CSV: &str = "Division,Description\n\
        A,\"Agriculture, Forestry, And Fishing\"\n\
        D,Manufacturing\n\
        E,\"Transportation, Communications, Electric, Gas, And Sanitary Services\"\n";

    fn seeded_cache() -> SqliteCache {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .put_reference("major_groups", MAJOR_GROUPS_URL, MAJOR_GROUPS_CSV)
            .unwrap();
        cache
            .put_reference("divisions", DIVISIONS_URL, DIVISIONS_CSV)
            .unwrap();
        cache
    }

    #[tokio::test]
    async fn test_fetch_served_entirely_from_cache() {
        let cache = seeded_cache();
        let client = ReferenceClient::new().unwrap();

        let tables = client.fetch(Some(&cache)).await.unwrap();

        assert_eq!(tables.major_groups.height(), 3);
        assert_eq!(tables.divisions.height(), 3);
        assert!(
            tables
                .major_groups
                .column("Major Group")
                .is_ok()
        );
        assert!(tables.divisions.column("Description").is_ok());
    }

    #[test]
    fn test_reference_csv_reads_as_strings() {
        let df = parse_reference_csv(MAJOR_GROUPS_CSV).unwrap();

        assert_eq!(
            df.column("Major Group").unwrap().dtype(),
            &polars::prelude::DataType::String
        );
        let groups: Vec<Option<&str>> = df
            .column("Major Group")
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(groups, vec![Some("01"), Some("35"), Some("40")]);
    }

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert!(config.use_cache);
        assert!(!config.force_refresh);
    }
}
