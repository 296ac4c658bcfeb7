// Property store - the snapshot every projection runs against
use crate::{
    models::{Owner, PropertyRecord, RegistrySnapshot, TransactionRecord},
    portfolio::is_progress_monotonic,
    search::{self, PropertyFilter},
    Error, Result,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Somewhere a registry snapshot can be fetched from
///
/// The file source is the only real one today; a chain indexer or HTTP
/// client would slot in behind the same trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Human-readable name for logs and errors
    fn name(&self) -> String;

    async fn fetch(&self) -> Result<RegistrySnapshot>;
}

/// Snapshot stored as a JSON document on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PropertySource for JsonFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<RegistrySnapshot> {
        debug!("Reading snapshot from {}", self.path.display());
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::SourceError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Snapshot already held in memory
pub struct StaticSource {
    snapshot: RegistrySnapshot,
}

impl StaticSource {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl PropertySource for StaticSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> Result<RegistrySnapshot> {
        Ok(self.snapshot.clone())
    }
}

/// Ordered, validated, read-only collection of property records
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    records: Vec<PropertyRecord>,
    transactions: Vec<TransactionRecord>,
    owners: Vec<Owner>,
    by_id: HashMap<String, usize>,
}

impl PropertyStore {
    /// Fetch every source concurrently and merge them in source order
    ///
    /// Any failing source fails the whole load; a store never holds a
    /// partial snapshot.
    pub async fn load(sources: &[Box<dyn PropertySource>]) -> Result<Self> {
        use futures::future::try_join_all;

        let snapshots = try_join_all(sources.iter().map(|source| async move {
            source.fetch().await.map_err(|e| {
                warn!("Source {} failed: {}", source.name(), e);
                e
            })
        }))
        .await?;

        let mut merged = RegistrySnapshot::default();
        for mut snapshot in snapshots {
            merged.properties.append(&mut snapshot.properties);
            merged.transactions.append(&mut snapshot.transactions);
            merged.owners.append(&mut snapshot.owners);
        }

        let store = Self::from_snapshot(merged)?;
        info!(
            "Loaded {} properties, {} transactions and {} owners from {} source(s)",
            store.len(),
            store.transactions.len(),
            store.owners.len(),
            sources.len()
        );
        Ok(store)
    }

    /// Build a store from a snapshot, validating every record
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(snapshot.properties.len());
        let mut internal_ids = HashSet::with_capacity(snapshot.properties.len());

        for (index, record) in snapshot.properties.iter().enumerate() {
            Self::validate(record)?;

            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(invalid(record, "duplicate id"));
            }
            // Lookups by internal id ignore case, so uniqueness must too
            if !internal_ids.insert(record.internal_id.to_ascii_lowercase()) {
                return Err(invalid(record, "duplicate internal id"));
            }
        }

        for tx in &snapshot.transactions {
            if !by_id.contains_key(&tx.property_id) {
                debug!("Transaction {} refers to unknown property {}", tx.id, tx.property_id);
            }
        }

        Ok(Self {
            records: snapshot.properties,
            transactions: snapshot.transactions,
            owners: snapshot.owners,
            by_id,
        })
    }

    /// Build a store from records alone, with no transaction history
    pub fn from_records(records: Vec<PropertyRecord>) -> Result<Self> {
        Self::from_snapshot(RegistrySnapshot {
            properties: records,
            ..Default::default()
        })
    }

    fn validate(record: &PropertyRecord) -> Result<()> {
        if record.last_modified_date < record.registration_date {
            return Err(invalid(record, "last modified before registration"));
        }

        if let Some(shares) = &record.fractional_shares {
            if shares.total_shares == 0 {
                return Err(invalid(record, "fractional shares total is zero"));
            }
            if shares.user_shares > shares.total_shares {
                return Err(invalid(record, "user shares exceed total shares"));
            }
        }

        if !is_progress_monotonic(record) {
            warn!(
                "Property {} has completed verification stages after open ones",
                record.internal_id
            );
        }

        Ok(())
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PropertyRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// Look up by jurisdiction code, ignoring case
    pub fn by_internal_id(&self, internal_id: &str) -> Option<&PropertyRecord> {
        self.records
            .iter()
            .find(|r| r.internal_id.eq_ignore_ascii_case(internal_id))
    }

    /// Resolve either an object id or a jurisdiction code
    pub fn resolve(&self, key: &str) -> Result<&PropertyRecord> {
        self.get(key)
            .or_else(|| self.by_internal_id(key))
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    /// Transactions for one property, in snapshot order
    pub fn history(&self, property_id: &str) -> Vec<&TransactionRecord> {
        self.transactions
            .iter()
            .filter(|tx| tx.property_id == property_id)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&PropertyRecord> {
        search::search(&self.records, query)
    }

    pub fn filter(&self, filter: &PropertyFilter) -> Vec<&PropertyRecord> {
        filter.apply(&self.records)
    }
}

fn invalid(record: &PropertyRecord, reason: &str) -> Error {
    Error::InvalidRecord {
        id: record.id.clone(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FractionalShares, OwnerVerification, PropertyStatus, TransactionKind, TransactionStatus,
    };
    use crate::test_support::{lagos_records, owner, record};
    use chrono::{Duration, TimeZone, Utc};

    fn transaction(id: &str, property_id: &str) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            property_id: property_id.to_string(),
            kind: TransactionKind::Registration,
            from_owner: None,
            to_owner: Some("0xabc".to_string()),
            date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            amount: None,
            tx_hash: format!("0xhash{}", id),
            status: TransactionStatus::Completed,
            description: "Initial registration".to_string(),
            previous_status: None,
            new_status: Some("Registered".to_string()),
        }
    }

    #[test]
    fn test_store_preserves_order_and_indexes() {
        let records = lagos_records();
        let store = PropertyStore::from_records(records.clone()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.records(), records.as_slice());
        assert_eq!(
            store.get(&records[1].id).map(|r| r.internal_id.as_str()),
            Some("Lagos/LKI/P-456")
        );
        assert!(store.by_internal_id("lagos/iky/p-789").is_some());
        assert!(store.get("0xmissing").is_none());
    }

    #[test]
    fn test_resolve_reports_not_found() {
        let store = PropertyStore::from_records(lagos_records()).unwrap();
        assert!(store.resolve("Lagos/IKJ/P-123").is_ok());
        assert!(matches!(
            store.resolve("Kano/X/P-1"),
            Err(Error::NotFound(key)) if key == "Kano/X/P-1"
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut records = lagos_records();
        records[1].id = records[0].id.clone();
        assert!(matches!(
            PropertyStore::from_records(records),
            Err(Error::InvalidRecord { .. })
        ));

        let mut records = lagos_records();
        records[1].internal_id = records[0].internal_id.clone();
        assert!(PropertyStore::from_records(records).is_err());
    }

    #[test]
    fn test_rejects_internal_id_differing_only_in_case() {
        let mut records = lagos_records();
        records[1].internal_id = records[0].internal_id.to_lowercase();
        assert!(matches!(
            PropertyStore::from_records(records),
            Err(Error::InvalidRecord { reason, .. }) if reason == "duplicate internal id"
        ));
    }

    #[test]
    fn test_rejects_time_travel() {
        let mut r = record("X/1", PropertyStatus::Registered, 1);
        r.last_modified_date = r.registration_date - Duration::days(1);
        assert!(PropertyStore::from_records(vec![r]).is_err());
    }

    #[test]
    fn test_rejects_bad_shares() {
        let mut r = record("X/1", PropertyStatus::Fractionalized, 1);
        r.fractional_shares = Some(FractionalShares {
            total_shares: 0,
            user_shares: 0,
        });
        assert!(PropertyStore::from_records(vec![r.clone()]).is_err());

        r.fractional_shares = Some(FractionalShares {
            total_shares: 10,
            user_shares: 11,
        });
        assert!(PropertyStore::from_records(vec![r]).is_err());
    }

    #[test]
    fn test_history_filters_by_property() {
        let records = lagos_records();
        let first = records[0].id.clone();
        let snapshot = RegistrySnapshot {
            properties: records,
            transactions: vec![
                transaction("t1", &first),
                transaction("t2", "0xother"),
                transaction("t3", &first),
            ],
            ..Default::default()
        };

        let store = PropertyStore::from_snapshot(snapshot).unwrap();
        let ids: Vec<_> = store.history(&first).iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert!(store.history("0xnothing").is_empty());
    }

    #[tokio::test]
    async fn test_load_merges_sources_in_order() {
        let records = lagos_records();
        let sources: Vec<Box<dyn PropertySource>> = vec![
            Box::new(StaticSource::new(RegistrySnapshot {
                properties: records[..1].to_vec(),
                owners: vec![owner("0xabc", OwnerVerification::Verified)],
                ..Default::default()
            })),
            Box::new(StaticSource::new(RegistrySnapshot {
                properties: records[1..].to_vec(),
                owners: vec![owner("0xdef", OwnerVerification::Pending)],
                ..Default::default()
            })),
        ];

        let store = PropertyStore::load(&sources).await.unwrap();
        assert_eq!(store.records(), records.as_slice());
        let wallets: Vec<_> = store.owners().iter().map(|o| o.wallet_address.as_str()).collect();
        assert_eq!(wallets, vec!["0xabc", "0xdef"]);
    }

    #[tokio::test]
    async fn test_load_short_circuits_on_failure() {
        let mut failing = MockPropertySource::new();
        failing
            .expect_fetch()
            .returning(|| Err(Error::SourceError("connection reset".to_string())));
        failing.expect_name().returning(|| "mock".to_string());

        let sources: Vec<Box<dyn PropertySource>> = vec![
            Box::new(StaticSource::new(RegistrySnapshot {
                properties: lagos_records(),
                ..Default::default()
            })),
            Box::new(failing),
        ];

        let result = PropertyStore::load(&sources).await;
        assert!(matches!(result, Err(Error::SourceError(_))));
    }

    #[tokio::test]
    async fn test_load_uses_mocked_source() {
        let mut source = MockPropertySource::new();
        source.expect_fetch().times(1).returning(|| {
            Ok(RegistrySnapshot {
                properties: lagos_records(),
                ..Default::default()
            })
        });
        source.expect_name().returning(|| "mock".to_string());

        let sources: Vec<Box<dyn PropertySource>> = vec![Box::new(source)];
        let store = PropertyStore::load(&sources).await.unwrap();
        assert_eq!(store.search("lekki").len(), 1);
    }
}
