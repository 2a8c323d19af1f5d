//! Spreadsheet export of the component library.
//!
//! One worksheet, one fixed column layout, one row per component. Absent
//! attributes are left blank except `Last Updated`, which reads `N/A`.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use stockroom_core::Component;

pub const EXPORT_SHEET_NAME: &str = "Components";
pub const EXPORT_FILE_NAME: &str = "Components_Library.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const EXPORT_HEADERS: [&str; 14] = [
    "SL No.",
    "Item Name",
    "Component Value",
    "Tolerance",
    "PPM",
    "Package",
    "Package Size",
    "Manuf. Part No",
    "Source Origin",
    "Vendor",
    "Unit Price (INR)",
    "Stock Qty",
    "Ordered Qty",
    "Last Updated",
];

enum Cell<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
}

fn row_cells(component: &Component) -> [Cell<'_>; 14] {
    let data = &component.data;
    let f = &data.fields;
    [
        Cell::Number(data.sl_no.map(|n| n as f64)),
        Cell::Text(f.item_name.as_deref()),
        Cell::Text(f.value.as_deref()),
        Cell::Text(f.tolerance.as_deref()),
        Cell::Text(f.ppm.as_deref()),
        Cell::Text(f.package.as_deref()),
        Cell::Text(f.package_size.as_deref()),
        Cell::Text(f.manufacturer_part.as_deref()),
        Cell::Text(f.source_origin.as_deref()),
        Cell::Text(f.vendor.as_deref()),
        Cell::Number(f.price_inr),
        Cell::Number(f.stock_quantity.map(|n| n as f64)),
        Cell::Number(f.ordered_quantity.map(|n| n as f64)),
        Cell::Text(Some(
            data.last_updated
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("N/A"),
        )),
    ]
}

fn write_row(sheet: &mut Worksheet, row: u32, cells: [Cell<'_>; 14]) -> Result<(), XlsxError> {
    for (col, cell) in (0u16..).zip(cells) {
        match cell {
            Cell::Text(Some(text)) => {
                sheet.write_string(row, col, text)?;
            }
            Cell::Number(Some(n)) => {
                sheet.write_number(row, col, n)?;
            }
            Cell::Text(None) | Cell::Number(None) => {}
        }
    }
    Ok(())
}

/// Render the components as an `.xlsx` workbook.
pub fn components_workbook(components: &[Component]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;
    for (col, title) in (0u16..).zip(EXPORT_HEADERS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }
    for (row, component) in (1u32..).zip(components) {
        write_row(sheet, row, row_cells(component))?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{ComponentFields, ComponentInput};

    fn part(last_updated: Option<&str>) -> Component {
        Component::create(ComponentInput {
            sl_no: Some(1),
            fields: ComponentFields {
                item_name: Some("Resistor".to_string()),
                price_inr: Some(1.5),
                ..Default::default()
            },
            last_updated: last_updated.map(str::to_string),
        })
    }

    #[test]
    fn test_workbook_is_zip_container() -> Result<(), XlsxError> {
        let bytes = components_workbook(&[part(None), part(Some("02/03/2024"))])?;
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
        Ok(())
    }

    #[test]
    fn test_empty_library_still_exports_headers() -> Result<(), XlsxError> {
        let bytes = components_workbook(&[])?;
        assert_eq!(&bytes[..2], b"PK");
        Ok(())
    }

    #[test]
    fn test_last_updated_falls_back_to_na() {
        let component = part(None);
        let cells = row_cells(&component);
        assert!(matches!(cells[13], Cell::Text(Some("N/A"))));

        let component = part(Some("02/03/2024"));
        let cells = row_cells(&component);
        assert!(matches!(cells[13], Cell::Text(Some("02/03/2024"))));
        assert!(matches!(cells[7], Cell::Text(None)));
    }
}
