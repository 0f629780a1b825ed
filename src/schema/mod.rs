//! Auction schemas.
//!
//! Each schema is a strategy object implementing [`AuctionSchema`]: it names its canonical
//! fields, the keywords that identify its header row, the synonym table for its columns, the
//! required-field check and the typed extraction of one row. The ingestion engine is generic
//! over this trait, so property and vehicle imports share one control flow.

pub mod property;
pub mod vehicle;

use std::fmt::Debug;

use serde::Serialize;

use crate::error::CellError;
use crate::ingestion::coerce::RowReader;
use crate::ingestion::columns::SynonymTable;

pub use property::{PropertyAuction, PropertyAuctionRecord};
pub use vehicle::{VehicleAuction, VehicleAuctionRecord};

/// Coercion applied to a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed text, empty when missing.
    Text,
    /// Number, `0` when missing.
    Number,
    /// Number, `null` when missing.
    OptionalNumber,
    /// Integer, `0` when missing.
    Int,
    /// ISO-8601 UTC date, `null` when missing.
    Date,
    /// `http(s)` URL, `null` when missing.
    Url,
    /// List of URLs, empty when missing.
    UrlList,
    /// Yes/no flag, `false` when missing.
    Bool,
}

/// One canonical field of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Schema descriptor driving the generic ingestion engine.
pub trait AuctionSchema {
    /// Typed record produced for each valid data row.
    type Record: Serialize + Clone + Debug + PartialEq + Send;

    /// Short schema name used in logs and diagnostics.
    const NAME: &'static str;

    /// Collection the records are stored under.
    const COLLECTION: &'static str;

    /// Every canonical field with its coercion.
    const FIELDS: &'static [FieldSpec];

    /// Lower-case phrases that identify the header row.
    const HEADER_KEYWORDS: &'static [&'static str];

    /// Header spelling lookup for this schema.
    fn synonyms() -> &'static SynonymTable;

    /// Returns `false` when the row lacks the fields a record cannot exist without.
    fn has_required_fields(row: &RowReader<'_>) -> Result<bool, CellError>;

    /// Extract every field of a row that passed [`Self::has_required_fields`].
    fn extract(row: &RowReader<'_>) -> Result<Self::Record, CellError>;
}

/// A record of either schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "schema", rename_all = "camelCase")]
pub enum DomainRecord {
    Property(PropertyAuctionRecord),
    Vehicle(VehicleAuctionRecord),
}

impl From<PropertyAuctionRecord> for DomainRecord {
    fn from(value: PropertyAuctionRecord) -> Self {
        DomainRecord::Property(value)
    }
}

impl From<VehicleAuctionRecord> for DomainRecord {
    fn from(value: VehicleAuctionRecord) -> Self {
        DomainRecord::Vehicle(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use serde_json::{Value, json};

    use super::*;
    use crate::types::{Cell, ColumnIndexMap};

    /// A cell every field of `kind` accepts, and the JSON it must come out as.
    fn sample(kind: FieldKind) -> (Cell, Value) {
        match kind {
            FieldKind::Text => (Cell::from(" x "), json!("x")),
            FieldKind::Number | FieldKind::OptionalNumber => (Cell::from("1,200.5"), json!(1200.5)),
            FieldKind::Int => (Cell::from("7"), json!(7)),
            FieldKind::Date => (Cell::from("15-01-2024"), json!("2024-01-15T00:00:00.000Z")),
            FieldKind::Url => (Cell::from("https://a.in/1"), json!("https://a.in/1")),
            FieldKind::UrlList => (Cell::from("https://a.in/1"), json!(["https://a.in/1"])),
            FieldKind::Bool => (Cell::from("Yes"), json!(true)),
        }
    }

    fn missing(kind: FieldKind) -> Value {
        match kind {
            FieldKind::Text => json!(""),
            FieldKind::Number => json!(0.0),
            FieldKind::Int => json!(0),
            FieldKind::OptionalNumber | FieldKind::Date | FieldKind::Url => Value::Null,
            FieldKind::UrlList => json!([]),
            FieldKind::Bool => json!(false),
        }
    }

    /// Every declared field is extracted with the coercion its [`FieldKind`] names.
    pub(crate) fn assert_fields_follow_their_kind<S: AuctionSchema>() {
        let columns: ColumnIndexMap = S::FIELDS.iter().enumerate().map(|(i, f)| (f.name, i)).collect();
        let (cells, expected): (Vec<Cell>, Vec<Value>) = S::FIELDS.iter().map(|f| sample(f.kind)).unzip();

        let row = RowReader::new(2, &cells, &columns);
        assert!(S::has_required_fields(&row).unwrap(), "{}", S::NAME);
        let json = serde_json::to_value(S::extract(&row).unwrap()).unwrap();
        for (f, want) in S::FIELDS.iter().zip(&expected) {
            assert_eq!(&json[f.name], want, "{}: {} as {:?}", S::NAME, f.name, f.kind);
        }

        let blank = RowReader::new(2, &[], &columns);
        let json = serde_json::to_value(S::extract(&blank).unwrap()).unwrap();
        for f in S::FIELDS {
            assert_eq!(json[f.name], missing(f.kind), "{}: empty {} as {:?}", S::NAME, f.name, f.kind);
        }
    }

    pub(crate) fn assert_schema_consistent<S: AuctionSchema>() {
        let fields: HashSet<&str> = S::FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(fields.len(), S::FIELDS.len(), "{}: duplicate field names", S::NAME);

        for (spelling, field) in S::synonyms().iter() {
            assert!(
                fields.contains(field),
                "{}: synonym '{spelling}' targets undeclared field '{field}'",
                S::NAME
            );
        }
        for f in S::FIELDS {
            assert_eq!(S::synonyms().lookup(f.name), Some(f.name), "{}: {}", S::NAME, f.name);
        }
        for k in S::HEADER_KEYWORDS {
            assert_eq!(*k, k.to_lowercase(), "{}: keyword '{k}' must be lower case", S::NAME);
        }
    }

    #[test]
    fn property_schema_is_consistent() {
        assert_schema_consistent::<PropertyAuction>();
    }

    #[test]
    fn vehicle_schema_is_consistent() {
        assert_schema_consistent::<VehicleAuction>();
    }

    #[test]
    fn property_fields_follow_their_kind() {
        assert_fields_follow_their_kind::<PropertyAuction>();
    }

    #[test]
    fn vehicle_fields_follow_their_kind() {
        assert_fields_follow_their_kind::<VehicleAuction>();
    }

    #[test]
    fn domain_record_is_tagged_by_schema() {
        let rec = DomainRecord::from(PropertyAuctionRecord::default());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["schema"], "property");
        assert_eq!(json["eventNo"], "");
    }
}
