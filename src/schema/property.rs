//! Real-estate auction listings (bank e-auction sale notices).

use std::sync::LazyLock;

use serde::Serialize;

use super::{AuctionSchema, FieldKind, FieldSpec};
use crate::error::CellError;
use crate::ingestion::coerce::RowReader;
use crate::ingestion::columns::SynonymTable;

/// Canonical property field names.
pub mod field {
    pub const EVENT_NO: &str = "eventNo";
    pub const EVENT_TYPE: &str = "eventType";
    pub const BANK_NAME: &str = "bankName";
    pub const BRANCH_NAME: &str = "branchName";
    pub const PROPERTY_ID: &str = "propertyId";
    pub const PROPERTY_TYPE: &str = "propertyType";
    pub const PROPERTY_DESCRIPTION: &str = "propertyDescription";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const PINCODE: &str = "pincode";
    pub const BORROWER_NAME: &str = "borrowerName";
    pub const POSSESSION_TYPE: &str = "possessionType";
    pub const AREA: &str = "area";
    pub const AREA_UNIT: &str = "areaUnit";
    pub const RESERVE_PRICE: &str = "reservePrice";
    pub const EMD_AMOUNT: &str = "emdAmount";
    pub const BID_INCREMENT: &str = "bidIncrement";
    pub const AUCTION_START_DATE: &str = "auctionStartDate";
    pub const AUCTION_END_DATE: &str = "auctionEndDate";
    pub const EMD_LAST_DATE: &str = "emdLastDate";
    pub const INSPECTION_DATE: &str = "inspectionDate";
    pub const CONTACT_PERSON: &str = "contactPerson";
    pub const CONTACT_NUMBER: &str = "contactNumber";
    pub const CONTACT_EMAIL: &str = "contactEmail";
    pub const NOTICE_URL: &str = "noticeUrl";
    pub const IMAGE_URLS: &str = "imageUrls";
    pub const IS_SARFAESI: &str = "isSarfaesi";
}

use field::*;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(EVENT_NO, FieldKind::Text),
    FieldSpec::new(EVENT_TYPE, FieldKind::Text),
    FieldSpec::new(BANK_NAME, FieldKind::Text),
    FieldSpec::new(BRANCH_NAME, FieldKind::Text),
    FieldSpec::new(PROPERTY_ID, FieldKind::Text),
    FieldSpec::new(PROPERTY_TYPE, FieldKind::Text),
    FieldSpec::new(PROPERTY_DESCRIPTION, FieldKind::Text),
    FieldSpec::new(ADDRESS, FieldKind::Text),
    FieldSpec::new(CITY, FieldKind::Text),
    FieldSpec::new(STATE, FieldKind::Text),
    FieldSpec::new(PINCODE, FieldKind::Text),
    FieldSpec::new(BORROWER_NAME, FieldKind::Text),
    FieldSpec::new(POSSESSION_TYPE, FieldKind::Text),
    FieldSpec::new(AREA, FieldKind::Number),
    FieldSpec::new(AREA_UNIT, FieldKind::Text),
    FieldSpec::new(RESERVE_PRICE, FieldKind::OptionalNumber),
    FieldSpec::new(EMD_AMOUNT, FieldKind::OptionalNumber),
    FieldSpec::new(BID_INCREMENT, FieldKind::OptionalNumber),
    FieldSpec::new(AUCTION_START_DATE, FieldKind::Date),
    FieldSpec::new(AUCTION_END_DATE, FieldKind::Date),
    FieldSpec::new(EMD_LAST_DATE, FieldKind::Date),
    FieldSpec::new(INSPECTION_DATE, FieldKind::Date),
    FieldSpec::new(CONTACT_PERSON, FieldKind::Text),
    FieldSpec::new(CONTACT_NUMBER, FieldKind::Text),
    FieldSpec::new(CONTACT_EMAIL, FieldKind::Text),
    FieldSpec::new(NOTICE_URL, FieldKind::Url),
    FieldSpec::new(IMAGE_URLS, FieldKind::UrlList),
    FieldSpec::new(IS_SARFAESI, FieldKind::Bool),
];

const HEADER_KEYWORDS: &[&str] = &[
    "event no",
    "event type",
    "reserve price",
    "property type",
    "emd",
    "auction start",
];

const SYNONYMS: &[(&str, &str)] = &[
    ("event no", EVENT_NO),
    ("event number", EVENT_NO),
    ("event id", EVENT_NO),
    ("auction id", EVENT_NO),
    ("auction no", EVENT_NO),
    ("auction number", EVENT_NO),
    ("e-auction id", EVENT_NO),
    ("event type", EVENT_TYPE),
    ("auction type", EVENT_TYPE),
    ("sale type", EVENT_TYPE),
    ("type of auction", EVENT_TYPE),
    ("bank", BANK_NAME),
    ("name of bank", BANK_NAME),
    ("secured creditor", BANK_NAME),
    ("lender", BANK_NAME),
    ("institution", BANK_NAME),
    ("branch", BRANCH_NAME),
    ("branch office", BRANCH_NAME),
    ("asset id", PROPERTY_ID),
    ("property code", PROPERTY_ID),
    ("asset code", PROPERTY_ID),
    ("asset type", PROPERTY_TYPE),
    ("type of property", PROPERTY_TYPE),
    ("category", PROPERTY_TYPE),
    ("asset category", PROPERTY_TYPE),
    ("description", PROPERTY_DESCRIPTION),
    ("description of property", PROPERTY_DESCRIPTION),
    ("asset description", PROPERTY_DESCRIPTION),
    ("property details", PROPERTY_DESCRIPTION),
    ("details", PROPERTY_DESCRIPTION),
    ("property address", ADDRESS),
    ("asset address", ADDRESS),
    ("location", ADDRESS),
    ("town", CITY),
    ("district", CITY),
    ("pin code", PINCODE),
    ("pin", PINCODE),
    ("postal code", PINCODE),
    ("borrower", BORROWER_NAME),
    ("borrower(s)", BORROWER_NAME),
    ("name of borrower", BORROWER_NAME),
    ("possession", POSSESSION_TYPE),
    ("type of possession", POSSESSION_TYPE),
    ("possession status", POSSESSION_TYPE),
    ("carpet area", AREA),
    ("built up area", AREA),
    ("plot area", AREA),
    ("area (sq ft)", AREA),
    ("size", AREA),
    ("unit", AREA_UNIT),
    ("uom", AREA_UNIT),
    ("reserve price (rs)", RESERVE_PRICE),
    ("reserve price (inr)", RESERVE_PRICE),
    ("reserve price in rs", RESERVE_PRICE),
    ("base price", RESERVE_PRICE),
    ("rp", RESERVE_PRICE),
    ("emd", EMD_AMOUNT),
    ("emd (rs)", EMD_AMOUNT),
    ("earnest money", EMD_AMOUNT),
    ("earnest money deposit", EMD_AMOUNT),
    ("increment amount", BID_INCREMENT),
    ("incremental value", BID_INCREMENT),
    ("bid multiplier", BID_INCREMENT),
    ("minimum increment", BID_INCREMENT),
    ("auction date", AUCTION_START_DATE),
    ("date of auction", AUCTION_START_DATE),
    ("e-auction date", AUCTION_START_DATE),
    ("start date", AUCTION_START_DATE),
    ("auction start time", AUCTION_START_DATE),
    ("auction start date & time", AUCTION_START_DATE),
    ("end date", AUCTION_END_DATE),
    ("auction end time", AUCTION_END_DATE),
    ("auction end date & time", AUCTION_END_DATE),
    ("last date of emd", EMD_LAST_DATE),
    ("emd submission date", EMD_LAST_DATE),
    ("last date for emd submission", EMD_LAST_DATE),
    ("emd end date", EMD_LAST_DATE),
    ("date of inspection", INSPECTION_DATE),
    ("inspection", INSPECTION_DATE),
    ("authorised officer", CONTACT_PERSON),
    ("authorized officer", CONTACT_PERSON),
    ("contact name", CONTACT_PERSON),
    ("officer name", CONTACT_PERSON),
    ("contact no", CONTACT_NUMBER),
    ("contact", CONTACT_NUMBER),
    ("phone", CONTACT_NUMBER),
    ("mobile", CONTACT_NUMBER),
    ("mobile no", CONTACT_NUMBER),
    ("email", CONTACT_EMAIL),
    ("email id", CONTACT_EMAIL),
    ("notice", NOTICE_URL),
    ("sale notice", NOTICE_URL),
    ("auction notice", NOTICE_URL),
    ("notice link", NOTICE_URL),
    ("download notice", NOTICE_URL),
    ("images", IMAGE_URLS),
    ("photos", IMAGE_URLS),
    ("photo", IMAGE_URLS),
    ("image links", IMAGE_URLS),
    ("property images", IMAGE_URLS),
    ("sarfaesi", IS_SARFAESI),
    ("under sarfaesi", IS_SARFAESI),
    ("sarfaesi act", IS_SARFAESI),
];

static PROPERTY_SYNONYMS: LazyLock<SynonymTable> = LazyLock::new(|| SynonymTable::new(FIELDS, SYNONYMS));

/// One real-estate auction listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAuctionRecord {
    pub event_no: String,
    pub event_type: String,
    pub bank_name: String,
    pub branch_name: String,
    pub property_id: String,
    pub property_type: String,
    pub property_description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub borrower_name: String,
    pub possession_type: String,
    pub area: f64,
    pub area_unit: String,
    pub reserve_price: Option<f64>,
    pub emd_amount: Option<f64>,
    pub bid_increment: Option<f64>,
    pub auction_start_date: Option<String>,
    pub auction_end_date: Option<String>,
    pub emd_last_date: Option<String>,
    pub inspection_date: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub contact_email: String,
    pub notice_url: Option<String>,
    pub image_urls: Vec<String>,
    pub is_sarfaesi: bool,
}

/// Property auction schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAuction;

impl AuctionSchema for PropertyAuction {
    type Record = PropertyAuctionRecord;

    const NAME: &'static str = "property";
    const COLLECTION: &'static str = "propertyAuctions";
    const FIELDS: &'static [FieldSpec] = FIELDS;
    const HEADER_KEYWORDS: &'static [&'static str] = HEADER_KEYWORDS;

    fn synonyms() -> &'static SynonymTable {
        &PROPERTY_SYNONYMS
    }

    /// A listing needs an event number or an event type.
    fn has_required_fields(row: &RowReader<'_>) -> Result<bool, CellError> {
        Ok(row.has_text(EVENT_NO)? || row.has_text(EVENT_TYPE)?)
    }

    fn extract(row: &RowReader<'_>) -> Result<PropertyAuctionRecord, CellError> {
        Ok(PropertyAuctionRecord {
            event_no: row.text(EVENT_NO, "")?,
            event_type: row.text(EVENT_TYPE, "")?,
            bank_name: row.text(BANK_NAME, "")?,
            branch_name: row.text(BRANCH_NAME, "")?,
            property_id: row.text(PROPERTY_ID, "")?,
            property_type: row.text(PROPERTY_TYPE, "")?,
            property_description: row.text(PROPERTY_DESCRIPTION, "")?,
            address: row.text(ADDRESS, "")?,
            city: row.text(CITY, "")?,
            state: row.text(STATE, "")?,
            pincode: row.text(PINCODE, "")?,
            borrower_name: row.text(BORROWER_NAME, "")?,
            possession_type: row.text(POSSESSION_TYPE, "")?,
            area: row.number(AREA, 0.0)?,
            area_unit: row.text(AREA_UNIT, "")?,
            reserve_price: row.number_opt(RESERVE_PRICE)?,
            emd_amount: row.number_opt(EMD_AMOUNT)?,
            bid_increment: row.number_opt(BID_INCREMENT)?,
            auction_start_date: row.date(AUCTION_START_DATE)?,
            auction_end_date: row.date(AUCTION_END_DATE)?,
            emd_last_date: row.date(EMD_LAST_DATE)?,
            inspection_date: row.date(INSPECTION_DATE)?,
            contact_person: row.text(CONTACT_PERSON, "")?,
            contact_number: row.text(CONTACT_NUMBER, "")?,
            contact_email: row.text(CONTACT_EMAIL, "")?,
            notice_url: row.url(NOTICE_URL)?,
            image_urls: row.url_list(IMAGE_URLS)?,
            is_sarfaesi: row.flag(IS_SARFAESI, false)?,
        })
    }
}
