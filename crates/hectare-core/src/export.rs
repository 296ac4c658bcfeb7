use crate::{
    models::PropertyRecord,
    portfolio::{aggregate, ownership_percent, status_distribution, verification_progress_percent},
    status::classify,
    Error, Result,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }
}

/// Currency symbol used when config does not set one
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";

/// Renders a set of property records for sharing outside the dashboard
#[derive(Debug, Clone)]
pub struct Exporter {
    currency_symbol: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl Exporter {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Export to a file, picking the format from its extension
    pub fn export_to_file<P: AsRef<Path>>(
        &self,
        records: &[&PropertyRecord],
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ConfigError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        self.export_to_file_with_format(records, path, format)
    }

    pub fn export_to_file_with_format<P: AsRef<Path>>(
        &self,
        records: &[&PropertyRecord],
        path: P,
        format: ExportFormat,
    ) -> Result<()> {
        let content = match format {
            ExportFormat::Json => Self::to_json(records)?,
            ExportFormat::Csv => Self::to_csv(records),
            ExportFormat::Markdown => self.to_markdown(records),
        };

        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn to_json(records: &[&PropertyRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    pub fn to_csv(records: &[&PropertyRecord]) -> String {
        let mut output = String::new();

        output.push_str(
            "ID,Internal ID,Address,Owner,Status,Trust,Estimated Value,LGA,\
             Registered,Last Modified,Verification %,Ownership %\n",
        );

        for record in records {
            let class = classify(record.status);
            let ownership = record
                .fractional_shares
                .as_ref()
                .map(|s| format!("{:.1}", ownership_percent(s)))
                .unwrap_or_default();

            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{:.0},{}\n",
                Self::escape_csv(&record.id),
                Self::escape_csv(&record.internal_id),
                Self::escape_csv(&record.address),
                Self::escape_csv(&record.owner_address),
                record.status,
                class.trust_level.label(),
                record.estimated_value,
                Self::escape_csv(record.lga.as_deref().unwrap_or("")),
                record.registration_date.format("%Y-%m-%d"),
                record.last_modified_date.format("%Y-%m-%d"),
                verification_progress_percent(record),
                ownership,
            ));
        }

        output
    }

    pub fn to_markdown(&self, records: &[&PropertyRecord]) -> String {
        let mut output = String::new();

        output.push_str("# Property Search Results\n\n");
        output.push_str(&format!("Total properties: {}\n\n", records.len()));
        output.push_str("---\n\n");

        for record in records {
            let class = classify(record.status);

            output.push_str(&format!("## {}\n\n", record.internal_id));
            output.push_str(&format!(
                "**Status:** {} {} | **Trust:** {}\n\n",
                class.trust_level.emoji(),
                class.label,
                class.trust_level.label()
            ));
            output.push_str(&format!("{}\n\n", record.address));

            output.push_str("| Field | Value |\n");
            output.push_str("|-------|-------|\n");
            output.push_str(&format!("| Object ID | `{}` |\n", record.id));
            output.push_str(&format!("| Owner | `{}` |\n", record.owner_address));
            output.push_str(&format!(
                "| Estimated Value | {} |\n",
                self.money(record.estimated_value)
            ));
            if let Some(lga) = &record.lga {
                output.push_str(&format!("| LGA | {} |\n", lga));
            }
            if let Some(size) = &record.size {
                output.push_str(&format!("| Size | {} |\n", size));
            }
            output.push_str(&format!(
                "| Registered | {} |\n",
                record.registration_date.format("%Y-%m-%d")
            ));
            output.push_str(&format!(
                "| Last Modified | {} |\n",
                record.last_modified_date.format("%Y-%m-%d")
            ));
            if let Some(shares) = &record.fractional_shares {
                output.push_str(&format!(
                    "| Shares | {}/{} ({:.1}%) |\n",
                    shares.user_shares,
                    shares.total_shares,
                    ownership_percent(shares)
                ));
            }

            if let Some(stages) = &record.verification_progress {
                output.push_str(&format!(
                    "\n### Verification ({:.0}% complete)\n\n",
                    verification_progress_percent(record)
                ));
                for stage in stages {
                    output.push_str(&format!("- {}: {}\n", stage.name, stage.state.label()));
                }
            }

            output.push_str("\n---\n\n");
        }

        if !records.is_empty() {
            let metrics = aggregate(records.iter().copied());

            output.push_str("## Summary Statistics\n\n");
            output.push_str(&format!(
                "- Total Value: {}\n",
                self.money(metrics.total_value)
            ));
            output.push_str(&format!(
                "- Average Value: {}\n",
                self.money(metrics.average_value.round() as u64)
            ));
            if metrics.fractional_shares_held > 0 {
                output.push_str(&format!(
                    "- Fractional Shares Held: {}\n",
                    metrics.fractional_shares_held
                ));
            }

            output.push_str("\n### Status Distribution\n\n");
            for share in status_distribution(records.iter().copied()) {
                if share.count > 0 {
                    output.push_str(&format!(
                        "- {}: {} ({:.0}%)\n",
                        share.status, share.count, share.percent
                    ));
                }
            }
        }

        output
    }

    fn money(&self, amount: u64) -> String {
        format_amount(amount, &self.currency_symbol)
    }

    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Abbreviate an amount behind a currency symbol: ₦45.0M, ₦250.0k, ₦900
pub fn format_amount(amount: u64, symbol: &str) -> String {
    if amount >= 1_000_000_000 {
        format!("{}{:.1}B", symbol, amount as f64 / 1_000_000_000.0)
    } else if amount >= 1_000_000 {
        format!("{}{:.1}M", symbol, amount as f64 / 1_000_000.0)
    } else if amount >= 1_000 {
        format!("{}{:.1}k", symbol, amount as f64 / 1_000.0)
    } else {
        format!("{}{}", symbol, amount)
    }
}
