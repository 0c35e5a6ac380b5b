//! Explicit data session over one snapshot directory.

use crate::cache::SqliteCache;
use crate::error::{DataError, Result};
use crate::store::{Dataset, SnapshotStore};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Configuration for opening a [`DataSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Directory holding the four snapshot CSVs.
    pub snapshot_dir: PathBuf,
    /// Location of the SQLite reference cache. `None` disables caching.
    pub cache_path: Option<PathBuf>,
    /// Discard rating events dated before this at load time.
    pub min_rating_date: Option<NaiveDate>,
}

/// Open handle over the snapshot tables.
///
/// Each table loads at most once per session; accessors hand out cheap
/// clones of the memoized frame. The session owns the reference cache
/// connection, released by [`DataSession::close`].
#[derive(Debug)]
pub struct DataSession {
    store: SnapshotStore,
    cache: Option<SqliteCache>,
    identity: Option<DataFrame>,
    ratings: Option<DataFrame>,
    financials: Option<DataFrame>,
    company: Option<DataFrame>,
}

impl DataSession {
    /// Open a session, validating the snapshot directory and opening the
    /// reference cache when configured.
    pub fn open(config: SessionConfig) -> Result<Self> {
        if !config.snapshot_dir.is_dir() {
            return Err(DataError::SnapshotDirNotFound(
                config.snapshot_dir.display().to_string(),
            ));
        }

        let mut store = SnapshotStore::new(&config.snapshot_dir);
        if let Some(floor) = config.min_rating_date {
            store = store.with_min_rating_date(floor);
        }

        let cache = match &config.cache_path {
            Some(path) => Some(SqliteCache::new(path)?),
            None => None,
        };

        log::debug!(
            "opened data session on {}",
            config.snapshot_dir.display()
        );
        Ok(Self {
            store,
            cache,
            identity: None,
            ratings: None,
            financials: None,
            company: None,
        })
    }

    /// Issuer identity map (`gvkey` to `companyid`).
    pub fn issuer_identity(&mut self) -> Result<DataFrame> {
        memoized(&self.store, &mut self.identity, Dataset::Identity)
    }

    /// Rating event stream, restricted to the known grade symbols.
    pub fn rating_events(&mut self) -> Result<DataFrame> {
        memoized(&self.store, &mut self.ratings, Dataset::Ratings)
    }

    /// Financial statement observations.
    pub fn statements(&mut self) -> Result<DataFrame> {
        memoized(&self.store, &mut self.financials, Dataset::Financials)
    }

    /// Company descriptors feeding sector derivation.
    pub fn company_info(&mut self) -> Result<DataFrame> {
        memoized(&self.store, &mut self.company, Dataset::Company)
    }

    /// The reference cache, when one was opened.
    pub fn cache(&self) -> Option<&SqliteCache> {
        self.cache.as_ref()
    }

    /// Close the session, releasing the cache connection.
    pub fn close(self) -> Result<()> {
        if let Some(cache) = self.cache {
            cache.close()?;
        }
        Ok(())
    }
}

fn memoized(
    store: &SnapshotStore,
    slot: &mut Option<DataFrame>,
    dataset: Dataset,
) -> Result<DataFrame> {
    match slot {
        Some(df) => Ok(df.clone()),
        None => {
            let df = store.load(dataset)?;
            *slot = Some(df.clone());
            Ok(df)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn seed_snapshot(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "darwin_session_{}_{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        write(
            &dir,
            "gvkey.csv",
            "gvkey,companyid,startdate,enddate\nG1,C1,2000-01-01,2020-12-31\n",
        );
        write(
            &dir,
            "ratings.csv",
            "companyid,entity_pname,ratingdate,ratingsymbol,ratingactionword,unsol\n\
             C1,ACME,2010-03-01,BBB,Affirmed,N\n",
        );
        write(
            &dir,
            "financials.csv",
            "gvkey,datadate,fyear,at\nG1,2011-01-01,2010,100.5\n",
        );
        write(
            &dir,
            "company.csv",
            "gvkey,conm,gsector,ggroup,sic\nG1,ACME CORP,20,2010,3541\n",
        );
        dir
    }

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_open_rejects_missing_directory() {
        let config = SessionConfig {
            snapshot_dir: PathBuf::from("/definitely/not/a/dir"),
            ..SessionConfig::default()
        };
        assert!(DataSession::open(config).is_err());
    }

    #[test]
    fn test_accessors_load_and_memoize() {
        let dir = seed_snapshot("memoize");
        let config = SessionConfig {
            snapshot_dir: dir.clone(),
            ..SessionConfig::default()
        };
        let mut session = DataSession::open(config).unwrap();

        let identity = session.issuer_identity().unwrap();
        assert_eq!(identity.height(), 1);

        // Removing the file proves the second call never re-reads it.
        fs::remove_file(dir.join("gvkey.csv")).unwrap();
        let again = session.issuer_identity().unwrap();
        assert_eq!(again.height(), 1);

        session.close().unwrap();
    }

    #[test]
    fn test_all_tables_accessible() {
        let dir = seed_snapshot("tables");
        let config = SessionConfig {
            snapshot_dir: dir,
            ..SessionConfig::default()
        };
        let mut session = DataSession::open(config).unwrap();

        assert_eq!(session.issuer_identity().unwrap().height(), 1);
        assert_eq!(session.rating_events().unwrap().height(), 1);
        assert_eq!(session.statements().unwrap().height(), 1);
        assert_eq!(session.company_info().unwrap().height(), 1);
        assert!(session.cache().is_none());

        session.close().unwrap();
    }

    #[test]
    fn test_session_opens_cache_when_configured() {
        let dir = seed_snapshot("cache");
        let cache_path = dir.join("reference.db");
        let config = SessionConfig {
            snapshot_dir: dir,
            cache_path: Some(cache_path),
            ..SessionConfig::default()
        };
        let session = DataSession::open(config).unwrap();

        assert!(session.cache().is_some());
        session.close().unwrap();
    }
}
