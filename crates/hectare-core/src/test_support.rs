// Shared fixtures for unit tests
use crate::models::{
    FractionalShares, Owner, OwnerVerification, PropertyRecord, PropertyStatus, StageState,
    VerificationStage,
};
use chrono::{NaiveDate, TimeZone, Utc};

pub fn record(internal_id: &str, status: PropertyStatus, value: u64) -> PropertyRecord {
    let registered = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    PropertyRecord {
        id: format!("0x{}", internal_id.to_lowercase().replace(['/', '-'], "")),
        internal_id: internal_id.to_string(),
        address: String::new(),
        owner_address: String::new(),
        status,
        estimated_value: value,
        registration_date: registered,
        last_modified_date: registered,
        fractional_shares: None,
        verification_progress: None,
        lga: None,
        size: None,
        features: Vec::new(),
        deed_cid: None,
        survey_cid: None,
        document_cids: Vec::new(),
    }
}

pub fn owner(wallet_address: &str, verification_status: OwnerVerification) -> Owner {
    Owner {
        id: wallet_address.trim_start_matches("0x").to_string(),
        name: String::new(),
        email: String::new(),
        phone: String::new(),
        address: String::new(),
        wallet_address: wallet_address.to_string(),
        date_created: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        properties_owned: Vec::new(),
        verification_status,
    }
}

pub fn stage(name: &str, state: StageState) -> VerificationStage {
    VerificationStage {
        name: name.to_string(),
        state,
        date: None,
    }
}

/// Three Lagos parcels; the first two are the canonical worked example
pub fn lagos_records() -> Vec<PropertyRecord> {
    let mut victoria = record("Lagos/IKJ/P-123", PropertyStatus::Verified, 45_000_000);
    victoria.address = "15 Victoria Island, Lagos".to_string();
    victoria.owner_address = "0xabc".to_string();
    victoria.lga = Some("Eti-Osa LGA".to_string());

    let mut lekki = record("Lagos/LKI/P-456", PropertyStatus::UnderVerification, 25_000_000);
    lekki.address = "25 Lekki Phase 1, Lagos".to_string();
    lekki.owner_address = "0xdef".to_string();
    lekki.lga = Some("Eti-Osa LGA".to_string());
    lekki.verification_progress = Some(vec![
        stage("Document Review", StageState::Completed),
        stage("Site Survey", StageState::InProgress),
        stage("Final Approval", StageState::Pending),
    ]);

    let mut ikoyi = record("Lagos/IKY/P-789", PropertyStatus::UnderDispute, 80_000_000);
    ikoyi.address = "10 Ikoyi Crescent, Lagos".to_string();
    ikoyi.owner_address = "0x789".to_string();
    ikoyi.lga = Some("Lagos Island LGA".to_string());
    ikoyi.fractional_shares = Some(FractionalShares {
        total_shares: 1000,
        user_shares: 250,
    });

    vec![victoria, lekki, ikoyi]
}
