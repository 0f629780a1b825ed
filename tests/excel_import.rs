#![cfg(feature = "excel_test_writer")]

use auction_ingest::ingestion::convert::{ConversionResponse, convert_xls_base64, convert_xls_to_xlsx};
use auction_ingest::ingestion::excel::decode_excel;
use auction_ingest::ingestion::{
    ImportOptions, ImportRequest, ImportResponse, import_property_auctions, import_vehicle_auctions,
};
use auction_ingest::types::{Cell, MergedRange};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

fn property_workbook() -> Vec<u8> {
    let mut wb = Workbook::new();

    let cover = wb.add_worksheet();
    cover.set_name("Cover").unwrap();
    cover.write_string(0, 0, "Instructions for bidders").unwrap();

    let ws = wb.add_worksheet();
    ws.set_name("Lots").unwrap();
    ws.merge_range(0, 0, 0, 4, "Bank of Baroda - Mega E-Auction", &Format::new())
        .unwrap();

    for (col, h) in ["Event No", "Event Type", "Reserve Price", "Auction Date", "SARFAESI"]
        .iter()
        .enumerate()
    {
        ws.write_string(1, col as u16, *h).unwrap();
    }

    let date_format = Format::new().set_num_format("dd/mm/yyyy hh:mm");
    let auction = ExcelDateTime::from_ymd(2024, 3, 20).unwrap().and_hms(11, 0, 0).unwrap();

    ws.write_string(2, 0, "BOB-1").unwrap();
    ws.write_string(2, 1, "Sale").unwrap();
    ws.write_number(2, 2, 2_500_000).unwrap();
    ws.write_datetime_with_format(2, 3, &auction, &date_format).unwrap();
    ws.write_boolean(2, 4, true).unwrap();

    ws.write_number(3, 0, 1002).unwrap();
    ws.write_string(3, 1, "Sale").unwrap();
    ws.write_string(3, 2, "12,00,000").unwrap();
    ws.write_string(3, 3, "21-03-2024").unwrap();
    ws.write_string(3, 4, "No").unwrap();

    ws.write_string(5, 2, "Total lots: 2").unwrap();

    wb.save_to_buffer().unwrap()
}

#[test]
fn decoded_workbook_keeps_sheets_cells_and_merges() {
    let wb = decode_excel(&property_workbook()).unwrap();

    assert_eq!(wb.sheet_names(), vec!["Cover".to_string(), "Lots".to_string()]);
    let lots = &wb.sheets[1].grid;
    assert_eq!(lots[2][0], Cell::from("BOB-1"));
    assert_eq!(lots[2][2], Cell::Float(2_500_000.0));
    assert!(matches!(lots[2][3], Cell::DateTime(_)));
    assert_eq!(lots[2][4], Cell::Bool(true));
    assert!(
        wb.merged_ranges.contains(&MergedRange {
            sheet: "Lots".to_string(),
            start_row: 0,
            start_col: 0,
            end_row: 0,
            end_col: 4,
        }),
        "{:?}",
        wb.merged_ranges
    );
}

#[test]
fn property_workbook_imports_end_to_end() {
    let request = ImportRequest::new("mega-auction.xlsx", property_workbook());
    let res = import_property_auctions(&request, &ImportOptions::default()).unwrap();

    assert_eq!(res.diagnostics.selected_sheet.as_deref(), Some("Lots"));
    assert_eq!(res.diagnostics.header_row_index, Some(1));
    assert_eq!(res.total_rows, 4);
    assert_eq!(res.successful_rows(), 2);
    assert_eq!(res.diagnostics.empty_rows, 1);
    assert_eq!(res.diagnostics.rows_missing_required, 1);
    assert_eq!(res.diagnostics.merged_ranges.len(), 1);

    let first = &res.records[0];
    assert_eq!(first.event_no, "BOB-1");
    assert_eq!(first.reserve_price, Some(2_500_000.0));
    assert_eq!(first.auction_start_date.as_deref(), Some("2024-03-20T11:00:00.000Z"));
    assert!(first.is_sarfaesi);

    let second = &res.records[1];
    assert_eq!(second.event_no, "1002");
    assert_eq!(second.reserve_price, Some(1_200_000.0));
    assert_eq!(second.auction_start_date.as_deref(), Some("2024-03-21T00:00:00.000Z"));
    assert!(!second.is_sarfaesi);
}

#[test]
fn leading_blank_rows_keep_sheet_row_numbers() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (col, h) in ["Contract No", "Make", "Model"].iter().enumerate() {
        ws.write_string(2, col as u16, *h).unwrap();
    }
    ws.write_string(3, 0, "CN-1").unwrap();
    ws.write_string(3, 2, "Swift").unwrap();
    ws.write_string(4, 0, "CN-2").unwrap();
    ws.write_string(4, 1, "Tata").unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let request = ImportRequest::new("yard.xlsx", bytes);
    let res = import_vehicle_auctions(&request, &ImportOptions::default()).unwrap();

    assert_eq!(res.diagnostics.header_row_index, Some(2));
    assert_eq!(res.skipped()[0].row, 4);
    assert_eq!(res.records[0].contract_no, "CN-2");
}

#[test]
fn corrupt_upload_reports_invalid_format() {
    let request = ImportRequest::new("broken.xlsx", b"PK\x03\x04 not really a zip".to_vec());
    let result = import_property_auctions(&request, &ImportOptions::default());
    let json = serde_json::to_value(ImportResponse::from_result("broken.xlsx", result)).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(
        json["error"],
        "Invalid file format. Please upload a valid .xls, .xlsx or .csv file."
    );
}

#[test]
fn legacy_name_converts_to_xlsx_and_still_imports() {
    let original = property_workbook();
    let request = ImportRequest::new("Lots.XLS", original.clone());
    let converted = convert_xls_to_xlsx(&request).unwrap();

    assert_eq!(converted.file_name, "Lots.xlsx");
    assert_eq!(converted.original_size, original.len());
    assert_eq!(converted.converted_size, converted.bytes.len());

    let wb = decode_excel(&converted.bytes).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Cover".to_string(), "Lots".to_string()]);
    assert!(matches!(wb.sheets[1].grid[2][3], Cell::DateTime(_)));

    let reimport = ImportRequest::new(converted.file_name.clone(), converted.bytes);
    let res = import_property_auctions(&reimport, &ImportOptions::default()).unwrap();
    assert_eq!(res.successful_rows(), 2);
    assert_eq!(res.records[0].auction_start_date.as_deref(), Some("2024-03-20T11:00:00.000Z"));
}

#[test]
fn conversion_response_carries_base64_and_sizes() {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    let payload = STANDARD.encode(property_workbook());
    let response = ConversionResponse::from_result(convert_xls_base64(Some(" auction.xls "), Some(&payload)));
    assert!(response.is_success());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["fileName"], "auction.xlsx");
    let bytes = STANDARD.decode(json["xlsxBase64"].as_str().unwrap()).unwrap();
    assert_eq!(json["convertedSize"], bytes.len());
    assert!(json["originalSize"].as_u64().unwrap() > 0);

    let rejected = ConversionResponse::from_result(convert_xls_base64(Some("auction.csv"), Some(&payload)));
    let json = serde_json::to_value(&rejected).unwrap();
    assert_eq!(json["error"], "File must be a .xls file");
}
