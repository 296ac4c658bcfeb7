use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Property record - one registered land parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    /// On-chain object id, opaque and immutable
    pub id: String,
    /// Jurisdiction code, e.g. "Lagos/IKJ/P-123"
    #[serde(alias = "landIdInternal")]
    pub internal_id: String,
    pub address: String,
    /// Wallet address of the current owner
    #[serde(alias = "currentOwnerAddress")]
    pub owner_address: String,
    pub status: PropertyStatus,
    /// Estimated value in whole naira
    pub estimated_value: u64,
    pub registration_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fractional_shares: Option<FractionalShares>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_progress: Option<Vec<VerificationStage>>,
    /// Local Government Area tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lga: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, alias = "deedWalrusCid", skip_serializing_if = "Option::is_none")]
    pub deed_cid: Option<String>,
    #[serde(default, alias = "surveyWalrusCid", skip_serializing_if = "Option::is_none")]
    pub survey_cid: Option<String>,
    #[serde(default, alias = "otherDocsWalrusCids", skip_serializing_if = "Vec::is_empty")]
    pub document_cids: Vec<String>,
}

/// Registry status of a parcel
///
/// Closed set. Anything that doesn't parse into one of these is handled by
/// [`crate::status::classify_raw`], never by a catch-all variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyStatus {
    Registered,
    #[serde(rename = "Under Dispute")]
    UnderDispute,
    Mortgaged,
    #[serde(rename = "Government Acquired")]
    GovernmentAcquired,
    Transferred,
    Verified,
    Fractionalized,
    #[serde(rename = "Under Verification")]
    UnderVerification,
}

impl PropertyStatus {
    /// Display name, same text the snapshot files use
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Registered => "Registered",
            PropertyStatus::UnderDispute => "Under Dispute",
            PropertyStatus::Mortgaged => "Mortgaged",
            PropertyStatus::GovernmentAcquired => "Government Acquired",
            PropertyStatus::Transferred => "Transferred",
            PropertyStatus::Verified => "Verified",
            PropertyStatus::Fractionalized => "Fractionalized",
            PropertyStatus::UnderVerification => "Under Verification",
        }
    }

    /// Every status, in the order the analytics view lists them
    pub fn all() -> Vec<PropertyStatus> {
        vec![
            PropertyStatus::Verified,
            PropertyStatus::UnderVerification,
            PropertyStatus::UnderDispute,
            PropertyStatus::Fractionalized,
            PropertyStatus::Mortgaged,
            PropertyStatus::GovernmentAcquired,
            PropertyStatus::Registered,
            PropertyStatus::Transferred,
        ]
    }

    /// Lenient parse: "Under Dispute", "UnderDispute", "under_dispute" and
    /// "under-dispute" all resolve to the same status.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        Self::all()
            .into_iter()
            .find(|status| status.as_str().replace(' ', "").to_lowercase() == key)
    }
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fractional ownership of a parcel, from the viewing user's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FractionalShares {
    pub total_shares: u32,
    pub user_shares: u32,
}

/// One due-diligence step on the way to `Verified`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStage {
    #[serde(alias = "stage")]
    pub name: String,
    #[serde(alias = "status")]
    pub state: StageState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageState {
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Pending")]
    Pending,
}

impl StageState {
    pub fn label(&self) -> &'static str {
        match self {
            StageState::Completed => "completed",
            StageState::InProgress => "in progress",
            StageState::Pending => "pending",
        }
    }
}

/// Registry transaction touching a parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub property_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_owner: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub tx_hash: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: String,
    /// Raw status strings as recorded on chain; may be outside the known set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Registration,
    Transfer,
    Verification,
    Fractionalization,
    Sale,
    Inheritance,
    Gift,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransactionKind::Registration => "Registration",
            TransactionKind::Transfer => "Transfer",
            TransactionKind::Verification => "Verification",
            TransactionKind::Fractionalization => "Fractionalization",
            TransactionKind::Sale => "Sale",
            TransactionKind::Inheritance => "Inheritance",
            TransactionKind::Gift => "Gift",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Registered land owner, as kept by the registry office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Postal address
    pub address: String,
    #[serde(alias = "suiAddress")]
    pub wallet_address: String,
    pub date_created: NaiveDate,
    /// Internal ids of the parcels this owner holds
    #[serde(default)]
    pub properties_owned: Vec<String>,
    pub verification_status: OwnerVerification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerVerification {
    Verified,
    Pending,
    Rejected,
}

/// On-disk snapshot: everything a dashboard needs in one JSON document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub owners: Vec<Owner>,
}
