//! Repossessed-vehicle auction listings (NBFC / bank yard stock).

use std::sync::LazyLock;

use serde::Serialize;

use super::{AuctionSchema, FieldKind, FieldSpec};
use crate::error::CellError;
use crate::ingestion::coerce::RowReader;
use crate::ingestion::columns::SynonymTable;

/// Canonical vehicle field names.
pub mod field {
    pub const CONTRACT_NO: &str = "contractNo";
    pub const RC_NO: &str = "rcNo";
    pub const MAKE: &str = "make";
    pub const MODEL: &str = "model";
    pub const VARIANT: &str = "variant";
    pub const MANUFACTURING_YEAR: &str = "manufacturingYear";
    pub const FUEL_TYPE: &str = "fuelType";
    pub const TRANSMISSION: &str = "transmission";
    pub const KMS_DRIVEN: &str = "kmsDriven";
    pub const OWNER_COUNT: &str = "ownerCount";
    pub const COLOR: &str = "color";
    pub const CHASSIS_NO: &str = "chassisNo";
    pub const ENGINE_NO: &str = "engineNo";
    pub const REGISTRATION_STATE: &str = "registrationState";
    pub const YARD_NAME: &str = "yardName";
    pub const YARD_LOCATION: &str = "yardLocation";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const RESERVE_PRICE: &str = "reservePrice";
    pub const EMD_AMOUNT: &str = "emdAmount";
    pub const BID_INCREMENT: &str = "bidIncrement";
    pub const AUCTION_START_DATE: &str = "auctionStartDate";
    pub const AUCTION_END_DATE: &str = "auctionEndDate";
    pub const INSPECTION_DATE: &str = "inspectionDate";
    pub const CONTACT_PERSON: &str = "contactPerson";
    pub const CONTACT_NUMBER: &str = "contactNumber";
    pub const RC_AVAILABLE: &str = "rcAvailable";
    pub const KEY_AVAILABLE: &str = "keyAvailable";
    pub const INSURANCE_VALID: &str = "insuranceValid";
    pub const VALUATION_REPORT_URL: &str = "valuationReportUrl";
    pub const IMAGE_URLS: &str = "imageUrls";
}

use field::*;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(CONTRACT_NO, FieldKind::Text),
    FieldSpec::new(RC_NO, FieldKind::Text),
    FieldSpec::new(MAKE, FieldKind::Text),
    FieldSpec::new(MODEL, FieldKind::Text),
    FieldSpec::new(VARIANT, FieldKind::Text),
    FieldSpec::new(MANUFACTURING_YEAR, FieldKind::Int),
    FieldSpec::new(FUEL_TYPE, FieldKind::Text),
    FieldSpec::new(TRANSMISSION, FieldKind::Text),
    FieldSpec::new(KMS_DRIVEN, FieldKind::Int),
    FieldSpec::new(OWNER_COUNT, FieldKind::Int),
    FieldSpec::new(COLOR, FieldKind::Text),
    FieldSpec::new(CHASSIS_NO, FieldKind::Text),
    FieldSpec::new(ENGINE_NO, FieldKind::Text),
    FieldSpec::new(REGISTRATION_STATE, FieldKind::Text),
    FieldSpec::new(YARD_NAME, FieldKind::Text),
    FieldSpec::new(YARD_LOCATION, FieldKind::Text),
    FieldSpec::new(CITY, FieldKind::Text),
    FieldSpec::new(STATE, FieldKind::Text),
    FieldSpec::new(RESERVE_PRICE, FieldKind::OptionalNumber),
    FieldSpec::new(EMD_AMOUNT, FieldKind::OptionalNumber),
    FieldSpec::new(BID_INCREMENT, FieldKind::OptionalNumber),
    FieldSpec::new(AUCTION_START_DATE, FieldKind::Date),
    FieldSpec::new(AUCTION_END_DATE, FieldKind::Date),
    FieldSpec::new(INSPECTION_DATE, FieldKind::Date),
    FieldSpec::new(CONTACT_PERSON, FieldKind::Text),
    FieldSpec::new(CONTACT_NUMBER, FieldKind::Text),
    FieldSpec::new(RC_AVAILABLE, FieldKind::Bool),
    FieldSpec::new(KEY_AVAILABLE, FieldKind::Bool),
    FieldSpec::new(INSURANCE_VALID, FieldKind::Bool),
    FieldSpec::new(VALUATION_REPORT_URL, FieldKind::Url),
    FieldSpec::new(IMAGE_URLS, FieldKind::UrlList),
];

const HEADER_KEYWORDS: &[&str] = &[
    "contract no",
    "rc no",
    "registration",
    "make",
    "model",
    "reserve price",
];

const SYNONYMS: &[(&str, &str)] = &[
    ("contract", CONTRACT_NO),
    ("contract number", CONTRACT_NO),
    ("agreement no", CONTRACT_NO),
    ("agreement number", CONTRACT_NO),
    ("loan no", CONTRACT_NO),
    ("loan number", CONTRACT_NO),
    ("loan account no", CONTRACT_NO),
    ("lan", CONTRACT_NO),
    ("rc number", RC_NO),
    ("registration no", RC_NO),
    ("registration number", RC_NO),
    ("reg no", RC_NO),
    ("regn no", RC_NO),
    ("vehicle no", RC_NO),
    ("vehicle number", RC_NO),
    ("vehicle registration no", RC_NO),
    ("manufacturer", MAKE),
    ("brand", MAKE),
    ("oem", MAKE),
    ("vehicle make", MAKE),
    ("vehicle model", MODEL),
    ("model name", MODEL),
    ("version", VARIANT),
    ("year", MANUFACTURING_YEAR),
    ("mfg year", MANUFACTURING_YEAR),
    ("mfg yr", MANUFACTURING_YEAR),
    ("year of manufacture", MANUFACTURING_YEAR),
    ("model year", MANUFACTURING_YEAR),
    ("yom", MANUFACTURING_YEAR),
    ("fuel", FUEL_TYPE),
    ("gear type", TRANSMISSION),
    ("gearbox", TRANSMISSION),
    ("kms", KMS_DRIVEN),
    ("km driven", KMS_DRIVEN),
    ("kms driven", KMS_DRIVEN),
    ("odometer", KMS_DRIVEN),
    ("odometer reading", KMS_DRIVEN),
    ("mileage", KMS_DRIVEN),
    ("owners", OWNER_COUNT),
    ("no of owners", OWNER_COUNT),
    ("ownership", OWNER_COUNT),
    ("owner serial", OWNER_COUNT),
    ("colour", COLOR),
    ("vehicle colour", COLOR),
    ("chassis", CHASSIS_NO),
    ("chassis number", CHASSIS_NO),
    ("engine", ENGINE_NO),
    ("engine number", ENGINE_NO),
    ("rto", REGISTRATION_STATE),
    ("rto state", REGISTRATION_STATE),
    ("reg state", REGISTRATION_STATE),
    ("yard", YARD_NAME),
    ("parking yard", YARD_NAME),
    ("stock yard", YARD_NAME),
    ("yard address", YARD_LOCATION),
    ("vehicle location", YARD_LOCATION),
    ("location", YARD_LOCATION),
    ("yard city", CITY),
    ("base price", RESERVE_PRICE),
    ("start price", RESERVE_PRICE),
    ("rp", RESERVE_PRICE),
    ("reserve price (rs)", RESERVE_PRICE),
    ("emd", EMD_AMOUNT),
    ("earnest money", EMD_AMOUNT),
    ("increment", BID_INCREMENT),
    ("increment amount", BID_INCREMENT),
    ("auction date", AUCTION_START_DATE),
    ("start date", AUCTION_START_DATE),
    ("auction start time", AUCTION_START_DATE),
    ("end date", AUCTION_END_DATE),
    ("auction end time", AUCTION_END_DATE),
    ("closing date", AUCTION_END_DATE),
    ("inspection", INSPECTION_DATE),
    ("contact name", CONTACT_PERSON),
    ("yard contact", CONTACT_PERSON),
    ("contact no", CONTACT_NUMBER),
    ("contact", CONTACT_NUMBER),
    ("phone", CONTACT_NUMBER),
    ("mobile", CONTACT_NUMBER),
    ("rc", RC_AVAILABLE),
    ("rc status", RC_AVAILABLE),
    ("rc book", RC_AVAILABLE),
    ("key", KEY_AVAILABLE),
    ("keys", KEY_AVAILABLE),
    ("key status", KEY_AVAILABLE),
    ("insurance", INSURANCE_VALID),
    ("insurance status", INSURANCE_VALID),
    ("valuation report", VALUATION_REPORT_URL),
    ("valuation", VALUATION_REPORT_URL),
    ("report", VALUATION_REPORT_URL),
    ("images", IMAGE_URLS),
    ("photos", IMAGE_URLS),
    ("vehicle images", IMAGE_URLS),
];

static VEHICLE_SYNONYMS: LazyLock<SynonymTable> = LazyLock::new(|| SynonymTable::new(FIELDS, SYNONYMS));

/// One vehicle auction listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAuctionRecord {
    pub contract_no: String,
    pub rc_no: String,
    pub make: String,
    pub model: String,
    pub variant: String,
    pub manufacturing_year: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub kms_driven: i64,
    pub owner_count: i64,
    pub color: String,
    pub chassis_no: String,
    pub engine_no: String,
    pub registration_state: String,
    pub yard_name: String,
    pub yard_location: String,
    pub city: String,
    pub state: String,
    pub reserve_price: Option<f64>,
    pub emd_amount: Option<f64>,
    pub bid_increment: Option<f64>,
    pub auction_start_date: Option<String>,
    pub auction_end_date: Option<String>,
    pub inspection_date: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub rc_available: bool,
    pub key_available: bool,
    pub insurance_valid: bool,
    pub valuation_report_url: Option<String>,
    pub image_urls: Vec<String>,
}

/// Vehicle auction schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleAuction;

impl AuctionSchema for VehicleAuction {
    type Record = VehicleAuctionRecord;

    const NAME: &'static str = "vehicle";
    const COLLECTION: &'static str = "vehicleAuctions";
    const FIELDS: &'static [FieldSpec] = FIELDS;
    const HEADER_KEYWORDS: &'static [&'static str] = HEADER_KEYWORDS;

    fn synonyms() -> &'static SynonymTable {
        &VEHICLE_SYNONYMS
    }

    /// A vehicle needs an identifier (contract or RC number) and a make.
    fn has_required_fields(row: &RowReader<'_>) -> Result<bool, CellError> {
        let identified = row.has_text(CONTRACT_NO)? || row.has_text(RC_NO)?;
        Ok(identified && row.has_text(MAKE)?)
    }

    fn extract(row: &RowReader<'_>) -> Result<VehicleAuctionRecord, CellError> {
        Ok(VehicleAuctionRecord {
            contract_no: row.text(CONTRACT_NO, "")?,
            rc_no: row.text(RC_NO, "")?,
            make: row.text(MAKE, "")?,
            model: row.text(MODEL, "")?,
            variant: row.text(VARIANT, "")?,
            manufacturing_year: row.int(MANUFACTURING_YEAR, 0)?,
            fuel_type: row.text(FUEL_TYPE, "")?,
            transmission: row.text(TRANSMISSION, "")?,
            kms_driven: row.int(KMS_DRIVEN, 0)?,
            owner_count: row.int(OWNER_COUNT, 0)?,
            color: row.text(COLOR, "")?,
            chassis_no: row.text(CHASSIS_NO, "")?,
            engine_no: row.text(ENGINE_NO, "")?,
            registration_state: row.text(REGISTRATION_STATE, "")?,
            yard_name: row.text(YARD_NAME, "")?,
            yard_location: row.text(YARD_LOCATION, "")?,
            city: row.text(CITY, "")?,
            state: row.text(STATE, "")?,
            reserve_price: row.number_opt(RESERVE_PRICE)?,
            emd_amount: row.number_opt(EMD_AMOUNT)?,
            bid_increment: row.number_opt(BID_INCREMENT)?,
            auction_start_date: row.date(AUCTION_START_DATE)?,
            auction_end_date: row.date(AUCTION_END_DATE)?,
            inspection_date: row.date(INSPECTION_DATE)?,
            contact_person: row.text(CONTACT_PERSON, "")?,
            contact_number: row.text(CONTACT_NUMBER, "")?,
            rc_available: row.flag(RC_AVAILABLE, false)?,
            key_available: row.flag(KEY_AVAILABLE, false)?,
            insurance_valid: row.flag(INSURANCE_VALID, false)?,
            valuation_report_url: row.url(VALUATION_REPORT_URL)?,
            image_urls: row.url_list(IMAGE_URLS)?,
        })
    }
}
