use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{bail, Result};
use bizscout_lib::industry::{CodeMatch, IndustryClassification};
use bizscout_lib::logistics::ClusterLabel;
use bizscout_lib::{
    Company, CompanyReference, OutreachDay, Route, ScoredCompany, TaxAssessment,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => bail!("unknown output format '{}'. Valid formats: table, json, csv, markdown", other),
        }
    }
}

#[derive(Tabled, Serialize)]
struct CompanyRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    #[serde(rename = "City")]
    city: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "Industry")]
    #[serde(rename = "Industry")]
    industry: String,
    #[tabled(rename = "Employees")]
    #[serde(rename = "Employees")]
    employees: String,
    #[tabled(rename = "Revenue")]
    #[serde(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Structure")]
    #[serde(rename = "Structure")]
    legal_structure: String,
    #[tabled(rename = "Tax Potential")]
    #[serde(rename = "Tax Potential")]
    tax_potential: String,
}

#[derive(Tabled, Serialize)]
struct ScoredRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    #[serde(rename = "City")]
    city: String,
    #[tabled(rename = "Industry")]
    #[serde(rename = "Industry")]
    industry: String,
    #[tabled(rename = "Score")]
    #[serde(rename = "Score")]
    score: String,
}

#[derive(Tabled, Serialize)]
struct TaxRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Growth")]
    #[serde(rename = "Growth")]
    growth: String,
    #[tabled(rename = "Hiring")]
    #[serde(rename = "Hiring")]
    hiring: String,
    #[tabled(rename = "Equipment")]
    #[serde(rename = "Equipment")]
    equipment: String,
    #[tabled(rename = "Succession")]
    #[serde(rename = "Succession")]
    succession: String,
    #[tabled(rename = "Government")]
    #[serde(rename = "Government")]
    government: String,
    #[tabled(rename = "Weighted")]
    #[serde(rename = "Weighted")]
    weighted: String,
    #[tabled(rename = "Potential")]
    #[serde(rename = "Potential")]
    potential: String,
}

#[derive(Tabled, Serialize)]
struct CodeRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    code_type: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Parent")]
    #[serde(rename = "Parent")]
    parent: String,
}

#[derive(Tabled, Serialize)]
struct ClassificationRow {
    #[tabled(rename = "Input")]
    #[serde(rename = "Input")]
    input: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Subcategory")]
    #[serde(rename = "Subcategory")]
    subcategory: String,
}

#[derive(Tabled, Serialize)]
struct StopRow {
    #[tabled(rename = "Day")]
    #[serde(rename = "Day")]
    day: String,
    #[tabled(rename = "Stop")]
    #[serde(rename = "Stop")]
    stop: usize,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Address")]
    #[serde(rename = "Address")]
    address: String,
}

#[derive(Tabled, Serialize)]
struct ClusterRow {
    #[tabled(rename = "Cluster")]
    #[serde(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Companies")]
    #[serde(rename = "Companies")]
    count: usize,
    #[tabled(rename = "Members")]
    #[serde(rename = "Members")]
    members: String,
}

#[derive(Tabled, Serialize)]
struct DayScoreRow {
    #[tabled(rename = "Day")]
    #[serde(rename = "Day")]
    day: String,
    #[tabled(rename = "Score")]
    #[serde(rename = "Score")]
    score: String,
}

// -- Row builders --

fn build_company_rows(companies: &[Company]) -> Vec<CompanyRow> {
    companies
        .iter()
        .map(|c| {
            let address = c.address.as_ref();
            CompanyRow {
                id: c.id.clone(),
                name: c.name.clone(),
                city: address.map(|a| a.city.clone()).unwrap_or_default(),
                state: address.map(|a| a.state.clone()).unwrap_or_default(),
                industry: c
                    .industry
                    .as_ref()
                    .map(|i| i.primary.clone())
                    .unwrap_or_default(),
                employees: c
                    .financials
                    .employee_count
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                revenue: c
                    .financials
                    .estimated_revenue
                    .map(format_revenue)
                    .unwrap_or_default(),
                legal_structure: c
                    .legal_structure
                    .map(|l| l.label().to_string())
                    .unwrap_or_default(),
                tax_potential: c.tax_indicators.tax_saving_potential.to_string(),
            }
        })
        .collect()
}

fn build_scored_rows(scored: &[ScoredCompany]) -> Vec<ScoredRow> {
    scored
        .iter()
        .enumerate()
        .map(|(idx, s)| ScoredRow {
            rank: idx + 1,
            name: s.company.name.clone(),
            city: s.company.city().unwrap_or_default().to_string(),
            industry: s
                .company
                .industry
                .as_ref()
                .map(|i| i.primary.clone())
                .unwrap_or_default(),
            score: format!("{:.3}", s.score),
        })
        .collect()
}

fn build_tax_rows(assessed: &[(Company, TaxAssessment)]) -> Vec<TaxRow> {
    assessed
        .iter()
        .map(|(c, a)| TaxRow {
            name: c.name.clone(),
            growth: format!("{:.1}", a.growth),
            hiring: format!("{:.1}", a.hiring),
            equipment: format!("{:.1}", a.equipment),
            succession: format!("{:.1}", a.succession),
            government: format!("{:.1}", a.government_contracts),
            weighted: format!("{:.3}", a.weighted),
            potential: a.potential.to_string(),
        })
        .collect()
}

fn build_code_rows(codes: &[CodeMatch]) -> Vec<CodeRow> {
    codes
        .iter()
        .map(|c| CodeRow {
            code: c.code.clone(),
            code_type: c.code_type.to_string(),
            name: c.name.clone(),
            parent: c.parent_name.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_classification_rows(classified: &[IndustryClassification]) -> Vec<ClassificationRow> {
    classified
        .iter()
        .map(|c| ClassificationRow {
            input: c.primary.clone(),
            category: c.category.clone(),
            subcategory: c.subcategory.clone(),
        })
        .collect()
}

fn stop_rows_for(route: &Route) -> Vec<StopRow> {
    let stops: Vec<&CompanyReference> = if route.is_optimized() {
        route.ordered_companies()
    } else {
        route.companies().iter().collect()
    };
    stops
        .into_iter()
        .enumerate()
        .map(|(idx, stop)| StopRow {
            day: route.day().to_string(),
            stop: idx + 1,
            company: stop.name.clone(),
            address: stop.address.to_string(),
        })
        .collect()
}

fn build_stop_rows(routes: &[&Route]) -> Vec<StopRow> {
    routes.iter().flat_map(|r| stop_rows_for(r)).collect()
}

fn build_cluster_rows(clusters: &BTreeMap<ClusterLabel, Vec<Company>>) -> Vec<ClusterRow> {
    clusters
        .iter()
        .map(|(label, members)| ClusterRow {
            cluster: label.to_string(),
            count: members.len(),
            members: members
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

fn build_day_score_rows(scores: &BTreeMap<OutreachDay, f64>) -> Vec<DayScoreRow> {
    scores
        .iter()
        .map(|(day, score)| DayScoreRow {
            day: day.to_string(),
            score: format!("{:.2}", score),
        })
        .collect()
}

// -- Generic printers --

fn print_rows<R: Tabled + Serialize>(rows: Vec<R>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

// -- Per-type output. JSON prints the domain values themselves. --

pub fn print_companies(companies: &[Company], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&companies);
            Ok(())
        }
        _ => print_rows(build_company_rows(companies), format),
    }
}

pub fn print_scored(scored: &[ScoredCompany], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&scored);
            Ok(())
        }
        _ => print_rows(build_scored_rows(scored), format),
    }
}

pub fn print_tax(assessed: &[(Company, TaxAssessment)], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value: Vec<serde_json::Value> = assessed
                .iter()
                .map(|(c, a)| serde_json::json!({ "id": c.id, "name": c.name, "assessment": a }))
                .collect();
            print_json(&value);
            Ok(())
        }
        _ => print_rows(build_tax_rows(assessed), format),
    }
}

pub fn print_codes(codes: &[CodeMatch], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&codes);
            Ok(())
        }
        _ => print_rows(build_code_rows(codes), format),
    }
}

pub fn print_classifications(
    classified: &[IndustryClassification],
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&classified);
            Ok(())
        }
        _ => print_rows(build_classification_rows(classified), format),
    }
}

pub fn print_routes(routes: &[&Route], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&routes);
            Ok(())
        }
        _ => print_rows(build_stop_rows(routes), format),
    }
}

pub fn print_clusters(
    clusters: &BTreeMap<ClusterLabel, Vec<Company>>,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(clusters);
            Ok(())
        }
        _ => print_rows(build_cluster_rows(clusters), format),
    }
}

pub fn print_day_scores(scores: &BTreeMap<OutreachDay, f64>, format: &OutputFormat) -> Result<()> {
    print_rows(build_day_score_rows(scores), format)
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_revenue(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
