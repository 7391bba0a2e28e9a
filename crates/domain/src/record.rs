//! Record: one delivered heater with its installation, client and sale details.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{HearthbookError, ValidationError};
use crate::id::RecordId;
use crate::sales::OrderRecord;
use crate::time::Timestamp;

/// Prefix of every human-facing record reference.
pub const REFERENCE_PREFIX: &str = "RMZ-";

/// A stored service/sales record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub reference: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    pub delivered_on: NaiveDate,
    pub installed_on: Option<NaiveDate>,
    pub site_visit_at: Option<Timestamp>,
    pub site_visit_by: Option<String>,
    pub installed_by: Option<String>,
    pub commissioned_by: Option<String>,

    pub capacity_kw: Option<String>,
    pub heater: Option<String>,
    pub controller: Option<String>,
    pub card: Option<String>,
    pub body: Option<String>,

    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub zone: Option<String>,

    pub sale_price: Option<f64>,
    pub sold_by: Option<String>,
    pub lead_source: Option<String>,

    pub remarks: Option<String>,
}

impl Record {
    /// Materialise a draft into a record with identity and timestamps.
    #[must_use]
    pub fn from_draft(
        id: RecordId,
        reference: String,
        draft: RecordDraft,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            reference,
            created_at,
            updated_at: created_at,
            delivered_on: draft.delivered_on,
            installed_on: draft.installed_on,
            site_visit_at: draft.site_visit_at,
            site_visit_by: draft.site_visit_by,
            installed_by: draft.installed_by,
            commissioned_by: draft.commissioned_by,
            capacity_kw: draft.capacity_kw,
            heater: draft.heater,
            controller: draft.controller,
            card: draft.card,
            body: draft.body,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            client_address: draft.client_address,
            zone: draft.zone,
            sale_price: draft.sale_price,
            sold_by: draft.sold_by,
            lead_source: draft.lead_source,
            remarks: draft.remarks,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] when:
    /// - `client_name` is blank ([`ValidationError::EmptyClientName`])
    /// - `sale_price` is negative or not finite ([`ValidationError::InvalidPrice`])
    pub fn validate(&self) -> Result<(), HearthbookError> {
        if self.client_name.trim().is_empty() {
            return Err(ValidationError::EmptyClientName.into());
        }
        if let Some(price) = self.sale_price {
            if !price.is_finite() || price < 0.0 {
                return Err(ValidationError::InvalidPrice(price).into());
            }
        }
        Ok(())
    }

    /// Apply the fields present in `patch`, stamping `updated_at`.
    pub fn apply(&mut self, patch: RecordPatch, updated_at: Timestamp) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut self.delivered_on, patch.delivered_on);
        set(&mut self.installed_on, patch.installed_on);
        set(&mut self.site_visit_at, patch.site_visit_at);
        set(&mut self.site_visit_by, patch.site_visit_by);
        set(&mut self.installed_by, patch.installed_by);
        set(&mut self.commissioned_by, patch.commissioned_by);
        set(&mut self.capacity_kw, patch.capacity_kw);
        set(&mut self.heater, patch.heater);
        set(&mut self.controller, patch.controller);
        set(&mut self.card, patch.card);
        set(&mut self.body, patch.body);
        set(&mut self.client_name, patch.client_name);
        set(&mut self.client_phone, patch.client_phone);
        set(&mut self.client_address, patch.client_address);
        set(&mut self.zone, patch.zone);
        set(&mut self.sale_price, patch.sale_price);
        set(&mut self.sold_by, patch.sold_by);
        set(&mut self.lead_source, patch.lead_source);
        set(&mut self.remarks, patch.remarks);
        self.updated_at = updated_at;
    }

    /// Lowercased reference and client contact details, the text a search
    /// term is matched against.
    #[must_use]
    pub fn search_text(&self) -> String {
        [
            Some(self.reference.as_str()),
            Some(self.client_name.as_str()),
            self.client_phone.as_deref(),
            self.client_address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(SEARCH_TEXT_SEPARATOR)
    }
}

/// Keeps a search term from matching across two fields of [`Record::search_text`].
pub const SEARCH_TEXT_SEPARATOR: &str = "\u{1f}";

impl From<&Record> for OrderRecord {
    fn from(record: &Record) -> Self {
        Self {
            delivered_on: record.delivered_on,
            sale_price: record.sale_price,
            zone: record.zone.clone(),
            sold_by: record.sold_by.clone(),
            lead_source: record.lead_source.clone(),
        }
    }
}

/// The caller-supplied part of a new record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDraft {
    pub delivered_on: NaiveDate,
    #[serde(default)]
    pub installed_on: Option<NaiveDate>,
    #[serde(default)]
    pub site_visit_at: Option<Timestamp>,
    #[serde(default)]
    pub site_visit_by: Option<String>,
    #[serde(default)]
    pub installed_by: Option<String>,
    #[serde(default)]
    pub commissioned_by: Option<String>,
    #[serde(default)]
    pub capacity_kw: Option<String>,
    #[serde(default)]
    pub heater: Option<String>,
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub client_name: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub sold_by: Option<String>,
    #[serde(default)]
    pub lead_source: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl RecordDraft {
    /// Start a draft with the two mandatory fields.
    #[must_use]
    pub fn new(client_name: impl Into<String>, delivered_on: NaiveDate) -> Self {
        Self {
            client_name: client_name.into(),
            delivered_on,
            ..Self::default()
        }
    }
}

/// A partial update. Absent fields are left untouched; for optional
/// fields an explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordPatch {
    pub delivered_on: Option<NaiveDate>,
    #[serde(deserialize_with = "present")]
    pub installed_on: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "present")]
    pub site_visit_at: Option<Option<Timestamp>>,
    #[serde(deserialize_with = "present")]
    pub site_visit_by: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub installed_by: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub commissioned_by: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub capacity_kw: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub heater: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub controller: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub card: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub body: Option<Option<String>>,
    pub client_name: Option<String>,
    #[serde(deserialize_with = "present")]
    pub client_phone: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub client_address: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub zone: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub sale_price: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub sold_by: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub lead_source: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub remarks: Option<Option<String>>,
}

/// Marks a field as present, so `null` becomes `Some(None)` rather than `None`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Compute the reference following `last`.
///
/// Numbering restarts at 1 when there is no previous reference or when it
/// does not follow the `RMZ-<number>` format.
#[must_use]
pub fn next_reference(last: Option<&str>) -> String {
    let next = last
        .and_then(|reference| reference.strip_prefix(REFERENCE_PREFIX))
        .and_then(|number| number.parse::<u64>().ok())
        .map_or(1, |number| number + 1);
    format!("{REFERENCE_PREFIX}{next:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(draft: RecordDraft) -> Record {
        Record::from_draft(RecordId::new(), "RMZ-000001".to_string(), draft, now())
    }

    #[test]
    fn should_start_numbering_at_one_when_no_previous_reference() {
        assert_eq!(next_reference(None), "RMZ-000001");
    }

    #[test]
    fn should_increment_previous_reference() {
        assert_eq!(next_reference(Some("RMZ-000041")), "RMZ-000042");
    }

    #[test]
    fn should_restart_numbering_when_previous_reference_is_foreign() {
        assert_eq!(next_reference(Some("LEGACY-12")), "RMZ-000001");
        assert_eq!(next_reference(Some("RMZ-abc")), "RMZ-000001");
    }

    #[test]
    fn should_keep_growing_past_six_digits() {
        assert_eq!(next_reference(Some("RMZ-999999")), "RMZ-1000000");
    }

    #[test]
    fn should_validate_record_with_name_and_price() {
        let mut draft = RecordDraft::new("Asha Verma", date(2024, 1, 15));
        draft.sale_price = Some(45_000.0);
        assert!(record(draft).validate().is_ok());
    }

    #[test]
    fn should_reject_blank_client_name() {
        let result = record(RecordDraft::new("   ", date(2024, 1, 15))).validate();
        assert!(matches!(
            result,
            Err(HearthbookError::Validation(ValidationError::EmptyClientName))
        ));
    }

    #[test]
    fn should_reject_negative_price() {
        let mut draft = RecordDraft::new("Asha Verma", date(2024, 1, 15));
        draft.sale_price = Some(-1.0);
        assert!(matches!(
            record(draft).validate(),
            Err(HearthbookError::Validation(ValidationError::InvalidPrice(_)))
        ));
    }

    #[test]
    fn should_accept_zero_price() {
        let mut draft = RecordDraft::new("Asha Verma", date(2024, 1, 15));
        draft.sale_price = Some(0.0);
        assert!(record(draft).validate().is_ok());
    }

    #[test]
    fn should_apply_only_present_fields() {
        let mut draft = RecordDraft::new("Asha Verma", date(2024, 1, 15));
        draft.zone = Some("North".to_string());
        draft.sold_by = Some("Ravi".to_string());
        let mut rec = record(draft);
        let before = rec.updated_at;

        let patch: RecordPatch =
            serde_json::from_str(r#"{"zone": "South", "sold_by": null}"#).unwrap();
        let later = before + chrono::Duration::seconds(5);
        rec.apply(patch, later);

        assert_eq!(rec.zone.as_deref(), Some("South"));
        assert!(rec.sold_by.is_none());
        assert_eq!(rec.client_name, "Asha Verma");
        assert_eq!(rec.updated_at, later);
    }

    #[test]
    fn should_leave_record_untouched_when_patch_is_empty() {
        let mut draft = RecordDraft::new("Asha Verma", date(2024, 1, 15));
        draft.sale_price = Some(12.5);
        let mut rec = record(draft);
        let snapshot = rec.clone();

        let patch: RecordPatch = serde_json::from_str("{}").unwrap();
        rec.apply(patch, snapshot.updated_at);

        assert_eq!(rec, snapshot);
    }

    #[test]
    fn should_project_order_snapshot() {
        let mut draft = RecordDraft::new("Asha Verma", date(2024, 2, 3));
        draft.sale_price = Some(900.0);
        draft.zone = Some("East".to_string());
        draft.lead_source = Some("Referral".to_string());
        let rec = record(draft);

        let order = OrderRecord::from(&rec);
        assert_eq!(order.delivered_on, date(2024, 2, 3));
        assert_eq!(order.sale_price, Some(900.0));
        assert_eq!(order.zone.as_deref(), Some("East"));
        assert!(order.sold_by.is_none());
        assert_eq!(order.lead_source.as_deref(), Some("Referral"));
    }

    #[test]
    fn should_deserialize_draft_with_only_required_fields() {
        let draft: RecordDraft =
            serde_json::from_str(r#"{"client_name": "Asha", "delivered_on": "2024-05-01"}"#)
                .unwrap();
        assert_eq!(draft.delivered_on, date(2024, 5, 1));
        assert!(draft.sale_price.is_none());
    }
}
