//! Flat CSV export of company records, one row per company.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::Company;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub const CSV_HEADERS: [&str; 13] = [
    "Company Name",
    "Business Description",
    "Address",
    "Legal Structure",
    "Owner/Key Executive",
    "Role",
    "Contact Info",
    "LinkedIn",
    "Employee Count",
    "Estimated Revenue",
    "Growth Rate",
    "Recent Developments",
    "Tax Saving Potential",
];

/// Writes the header row and one row per company. The first executive is
/// reported as the key contact. Returns the number of data rows.
pub fn write_csv<W: Write>(companies: &[Company], writer: W) -> Result<usize, ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for company in companies {
        wtr.write_record(company_row(company))?;
    }
    wtr.flush()?;
    Ok(companies.len())
}

/// Creates (or truncates) `path` and writes the CSV export to it.
pub fn export_csv(companies: &[Company], path: impl AsRef<Path>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let rows = write_csv(companies, file)?;
    tracing::info!("Exported {} companies to {}", rows, path.display());
    Ok(rows)
}

fn company_row(company: &Company) -> [String; 13] {
    let executive = company.executives.first();
    let contact = executive
        .map(|e| {
            [e.contact_info.phone.as_deref(), e.contact_info.email.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" / ")
        })
        .unwrap_or_default();

    [
        company.name.clone(),
        company.description.clone().unwrap_or_default(),
        company
            .address
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_default(),
        company
            .legal_structure
            .map(|l| l.label().to_string())
            .unwrap_or_default(),
        executive.map(|e| e.name.clone()).unwrap_or_default(),
        executive.map(|e| e.role.clone()).unwrap_or_default(),
        contact,
        executive
            .and_then(|e| e.contact_info.linkedin_url.clone())
            .unwrap_or_default(),
        company
            .financials
            .employee_count
            .map(|c| c.to_string())
            .unwrap_or_default(),
        company
            .financials
            .estimated_revenue
            .map(|r| format!("{:.0}", r))
            .unwrap_or_default(),
        company
            .financials
            .growth_rate
            .map(|g| format!("{:.1}%", g))
            .unwrap_or_default(),
        company
            .tax_indicators
            .recent_developments
            .clone()
            .unwrap_or_default(),
        company.tax_indicators.tax_saving_potential.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, ContactInfo, Executive, Financials, LegalStructure};

    fn parse(bytes: &[u8]) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_reader(bytes);
        let headers = rdr.headers().expect("headers").clone();
        let rows = rdr.records().map(|r| r.expect("record")).collect();
        (headers, rows)
    }

    #[test]
    fn headers_in_report_order() {
        let mut buf = Vec::new();
        assert_eq!(write_csv(&[], &mut buf).unwrap(), 0);
        let (headers, rows) = parse(&buf);
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());
        assert!(rows.is_empty());
    }

    #[test]
    fn full_row() {
        let mut owner = Executive::new("Pat Acme", "Owner");
        owner.contact_info = ContactInfo {
            phone: Some("262-555-0100".into()),
            email: Some("pat@acme.test".into()),
            linkedin_url: Some("https://linkedin.com/in/patacme".into()),
        };
        let mut company = Company::new("acme", "Acme Steel, Inc.")
            .with_description("Steel fabrication")
            .with_address(Address::new("1 Main St", "Racine", "WI", "53403"))
            .with_legal_structure(LegalStructure::SCorp)
            .with_financials(Financials {
                employee_count: Some(120),
                estimated_revenue: Some(25_000_000.0),
                growth_rate: Some(7.5),
                ..Default::default()
            })
            .with_executive(owner);
        company.tax_indicators.recent_developments = Some("New plant".into());

        let mut buf = Vec::new();
        write_csv(&[company], &mut buf).unwrap();
        let (_, rows) = parse(&buf);
        let row: Vec<&str> = rows[0].iter().collect();
        assert_eq!(
            row,
            vec![
                "Acme Steel, Inc.",
                "Steel fabrication",
                "1 Main St, Racine, WI 53403",
                "S-Corp",
                "Pat Acme",
                "Owner",
                "262-555-0100 / pat@acme.test",
                "https://linkedin.com/in/patacme",
                "120",
                "25000000",
                "7.5%",
                "New plant",
                "LOW",
            ]
        );
    }

    #[test]
    fn missing_fields_are_blank() {
        let mut buf = Vec::new();
        write_csv(&[Company::new("x", "Bare Co")], &mut buf).unwrap();
        let (_, rows) = parse(&buf);
        assert_eq!(rows[0].get(0), Some("Bare Co"));
        assert!(rows[0].iter().skip(1).take(11).all(|f| f.is_empty()));
        assert_eq!(rows[0].get(12), Some("LOW"));
    }

    #[test]
    fn export_to_file() {
        let path = std::env::temp_dir().join(format!("bizscout-export-{}.csv", std::process::id()));
        let rows = export_csv(&[Company::new("a", "A"), Company::new("b", "B")], &path).unwrap();
        assert_eq!(rows, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Company Name,"));
        assert_eq!(text.lines().count(), 3);
        std::fs::remove_file(&path).ok();
    }
}
