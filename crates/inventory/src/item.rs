use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bizdesk_core::patch::clearable;
use bizdesk_core::validate::{require_non_negative, require_text};
use bizdesk_core::{AggregateRoot, DomainResult, Entity, RecordId, WasteType};

/// A collected waste batch held in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: RecordId,
    batch_id: String,
    collection_date: NaiveDate,
    source_location: String,
    /// Kilograms.
    total_weight: Decimal,
    waste_type: WasteType,
    quality_grade: String,
    processing_status: String,
    processing_method: String,
    #[serde(default)]
    notes: Option<String>,
}

/// Command: take a new batch into stock.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewInventoryItem {
    pub batch_id: String,
    pub collection_date: NaiveDate,
    pub source_location: String,
    pub total_weight: Decimal,
    pub waste_type: WasteType,
    #[serde(default)]
    pub quality_grade: String,
    #[serde(default)]
    pub processing_status: String,
    #[serde(default)]
    pub processing_method: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial edit of a batch; absent fields are left alone and `"notes": null` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InventoryPatch {
    pub batch_id: Option<String>,
    pub collection_date: Option<NaiveDate>,
    pub source_location: Option<String>,
    pub total_weight: Option<Decimal>,
    pub waste_type: Option<WasteType>,
    pub quality_grade: Option<String>,
    pub processing_status: Option<String>,
    pub processing_method: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub notes: Option<Option<String>>,
}

impl InventoryItem {
    pub fn create(id: RecordId, cmd: NewInventoryItem) -> DomainResult<Self> {
        require_text("batch_id", &cmd.batch_id)?;
        require_text("source_location", &cmd.source_location)?;
        require_non_negative("total_weight", cmd.total_weight)?;

        Ok(Self {
            id,
            batch_id: cmd.batch_id.trim().to_string(),
            collection_date: cmd.collection_date,
            source_location: cmd.source_location,
            total_weight: cmd.total_weight,
            waste_type: cmd.waste_type,
            quality_grade: cmd.quality_grade,
            processing_status: cmd.processing_status,
            processing_method: cmd.processing_method,
            notes: cmd.notes,
        })
    }

    /// Apply an edit. Validation runs before any field changes.
    pub fn apply_patch(&mut self, patch: InventoryPatch) -> DomainResult<()> {
        if let Some(batch_id) = &patch.batch_id {
            require_text("batch_id", batch_id)?;
        }
        if let Some(location) = &patch.source_location {
            require_text("source_location", location)?;
        }
        if let Some(weight) = patch.total_weight {
            require_non_negative("total_weight", weight)?;
        }

        if let Some(batch_id) = patch.batch_id {
            self.batch_id = batch_id.trim().to_string();
        }
        if let Some(date) = patch.collection_date {
            self.collection_date = date;
        }
        if let Some(location) = patch.source_location {
            self.source_location = location;
        }
        if let Some(weight) = patch.total_weight {
            self.total_weight = weight;
        }
        if let Some(waste_type) = patch.waste_type {
            self.waste_type = waste_type;
        }
        if let Some(grade) = patch.quality_grade {
            self.quality_grade = grade;
        }
        if let Some(status) = patch.processing_status {
            self.processing_status = status;
        }
        if let Some(method) = patch.processing_method {
            self.processing_method = method;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        Ok(())
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn collection_date(&self) -> NaiveDate {
        self.collection_date
    }

    pub fn source_location(&self) -> &str {
        &self.source_location
    }

    pub fn total_weight(&self) -> Decimal {
        self.total_weight
    }

    pub fn waste_type(&self) -> WasteType {
        self.waste_type
    }

    pub fn quality_grade(&self) -> &str {
        &self.quality_grade
    }

    pub fn processing_status(&self) -> &str {
        &self.processing_status
    }

    pub fn processing_method(&self) -> &str {
        &self.processing_method
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl Entity for InventoryItem {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl AggregateRoot for InventoryItem {
    const COLLECTION: &'static str = "inventory";

    fn document_id(&self) -> String {
        self.id.to_string()
    }
}
