use crate::models::PropertyStatus;
use serde::{Deserialize, Serialize};

/// How much a reader should trust a parcel's current state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrustLevel {
    Verified,
    Warning,
    Error,
    /// Status we don't recognise
    Neutral,
}

impl TrustLevel {
    pub fn label(&self) -> &'static str {
        match self {
            TrustLevel::Verified => "Verified",
            TrustLevel::Warning => "Warning",
            TrustLevel::Error => "Error",
            TrustLevel::Neutral => "Neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            TrustLevel::Verified => "✓",
            TrustLevel::Warning => "!",
            TrustLevel::Error => "✗",
            TrustLevel::Neutral => "○",
        }
    }
}

/// Color band a status badge is drawn in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColorBand {
    Emerald,
    Blue,
    Yellow,
    Orange,
    Red,
    Purple,
    Slate,
}

impl ColorBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBand::Emerald => "emerald",
            ColorBand::Blue => "blue",
            ColorBand::Yellow => "yellow",
            ColorBand::Orange => "orange",
            ColorBand::Red => "red",
            ColorBand::Purple => "purple",
            ColorBand::Slate => "slate",
        }
    }
}

/// Icon shown next to a status badge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IconKey {
    CheckCircle,
    Shield,
    AlertTriangle,
    Clock,
}

impl IconKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::CheckCircle => "check-circle",
            IconKey::Shield => "shield",
            IconKey::AlertTriangle => "alert-triangle",
            IconKey::Clock => "clock",
        }
    }
}

/// Display classification of a status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusClass {
    pub trust_level: TrustLevel,
    pub label: String,
    pub color: ColorBand,
    pub icon: IconKey,
}

impl StatusClass {
    fn new(trust_level: TrustLevel, label: &str, color: ColorBand, icon: IconKey) -> Self {
        Self {
            trust_level,
            label: label.to_string(),
            color,
            icon,
        }
    }

    /// Styling keys for plain-text output, e.g. `orange/clock`
    pub fn badge(&self) -> String {
        format!("{}/{}", self.color.as_str(), self.icon.as_str())
    }
}

/// Classify a known status
///
/// Exhaustive on purpose: adding a status variant won't compile until it
/// gets a row here.
pub fn classify(status: PropertyStatus) -> StatusClass {
    use ColorBand::*;
    use IconKey::*;

    match status {
        PropertyStatus::Verified => {
            StatusClass::new(TrustLevel::Verified, "Blockchain Verified", Emerald, CheckCircle)
        }
        PropertyStatus::Registered => {
            StatusClass::new(TrustLevel::Verified, "Registered", Emerald, Shield)
        }
        PropertyStatus::Transferred => {
            StatusClass::new(TrustLevel::Verified, "Transferred", Emerald, CheckCircle)
        }
        PropertyStatus::UnderDispute => {
            StatusClass::new(TrustLevel::Error, "Under Dispute", Red, AlertTriangle)
        }
        PropertyStatus::Mortgaged => {
            StatusClass::new(TrustLevel::Warning, "Mortgaged", Orange, Clock)
        }
        PropertyStatus::GovernmentAcquired => {
            StatusClass::new(TrustLevel::Warning, "Government Acquired", Purple, Shield)
        }
        PropertyStatus::UnderVerification => {
            StatusClass::new(TrustLevel::Warning, "Verification in progress", Yellow, Clock)
        }
        // Same trust as Verified, own color band
        PropertyStatus::Fractionalized => {
            StatusClass::new(TrustLevel::Verified, "Fractionalized", Blue, Shield)
        }
    }
}

/// Classify a status string that may not be in the known set
///
/// Transaction history carries statuses as raw strings, so this is the
/// entry point for anything that didn't come through a typed record.
/// Unknown input falls back to `Neutral` with the input as its label.
pub fn classify_raw(raw: &str) -> StatusClass {
    match PropertyStatus::parse(raw) {
        Some(status) => classify(status),
        None => StatusClass {
            trust_level: TrustLevel::Neutral,
            label: raw.to_string(),
            color: ColorBand::Slate,
            icon: IconKey::Clock,
        },
    }
}
