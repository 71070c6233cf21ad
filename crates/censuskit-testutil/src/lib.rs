use std::collections::BTreeSet;

use censuskit_core::category::Family;
use censuskit_core::error::{CensusKitError, Result};
use censuskit_core::query::{StaticProvider, TableProvider, TableRequest};
use censuskit_core::table::{Cell, JointDistributionTable};

/// Location descriptor attached to every fixture table.
pub fn alameda_location() -> serde_json::Value {
    serde_json::json!({
        "state_fips": "06",
        "county_fips": "001",
        "state_name": "California",
        "county_name": "Alameda County",
    })
}

/// Educational attainment by age, binned like ACS table B15001.
pub fn age_education_table() -> JointDistributionTable {
    let ages = [
        "18 to 24 years",
        "25 to 34 years",
        "35 to 44 years",
        "45 to 64 years",
        "65 years and over",
    ];
    let levels = [
        "Less than 9th grade",
        "9th to 12th grade, no diploma",
        "High school graduate (includes equivalency)",
        "Some college, no degree",
        "Associate's degree",
        "Bachelor's degree",
        "Graduate or professional degree",
    ];
    grid(Family::Age, Family::Education, &ages, &levels)
        .with_source("ACS 5-Year Estimates (2023), Table B15001")
}

/// Household income by age of householder, binned like ACS table B19037.
/// Ages are much coarser than the standard age vocabulary.
pub fn age_income_table() -> JointDistributionTable {
    let ages = [
        "Householder under 25 years",
        "Householder 25 to 44 years",
        "Householder 45 to 64 years",
        "Householder 65 years and over",
    ];
    let incomes = [
        "Less than $10,000",
        "$10,000 to $14,999",
        "$15,000 to $24,999",
        "$25,000 to $49,999",
        "$50,000 to $99,999",
        "$100,000 to $199,999",
        "$200,000 or more",
    ];
    grid(Family::Age, Family::Income, &ages, &incomes)
        .with_source("ACS 5-Year Estimates (2023), Table B19037")
}

/// Sex by age with the fine standard age brackets, like ACS table B01001.
/// Gender is axis A here, so the age axis is B.
pub fn gender_age_table() -> JointDistributionTable {
    let genders = ["Male", "Female"];
    let ages = [
        "Under 5 years",
        "5 to 9 years",
        "10 to 14 years",
        "15 to 17 years",
        "18 and 19 years",
        "20 years",
        "21 years",
        "22 to 24 years",
        "25 to 29 years",
        "30 to 34 years",
        "35 to 39 years",
        "40 to 44 years",
        "45 to 49 years",
        "50 to 54 years",
        "55 to 59 years",
        "60 and 61 years",
        "62 to 64 years",
        "65 and 66 years",
        "67 to 69 years",
        "70 to 74 years",
        "75 to 79 years",
        "80 to 84 years",
        "85 years and over",
    ];
    grid(Family::Gender, Family::Age, &genders, &ages)
        .with_source("ACS 5-Year Estimates (2023), Table B01001")
}

/// Race by age, with a suppressed (all-zero) oldest bracket.
pub fn age_race_table() -> JointDistributionTable {
    let ages = ["Under 18 years", "18 to 64 years", "65 years and over"];
    let races = [
        "White alone",
        "Black or African American alone",
        "Asian alone",
        "Hispanic or Latino",
    ];
    let mut cells = Vec::new();
    for (i, age) in ages.iter().enumerate() {
        for (j, race) in races.iter().enumerate() {
            let count = if i == 2 { 0 } else { count_for(i, j) };
            cells.push(Cell::new(*age, *race, count));
        }
    }
    table(Family::Age, Family::Race, cells)
        .with_source("ACS 5-Year Estimates (2023), Table B01001A-I")
}

/// A provider serving every fixture table under its conventional source id.
pub fn fixture_provider() -> StaticProvider {
    StaticProvider::new()
        .with_table("age_education", age_education_table())
        .with_table("age_income", age_income_table())
        .with_table("gender_age", gender_age_table())
        .with_table("age_race", age_race_table())
}

/// Wraps a provider and fails the configured source ids.
pub struct FailingProvider<P> {
    inner: P,
    failing: BTreeSet<String>,
}

impl<P: TableProvider> FailingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            failing: BTreeSet::new(),
        }
    }

    pub fn failing(mut self, source_id: impl Into<String>) -> Self {
        self.failing.insert(source_id.into());
        self
    }
}

impl<P: TableProvider> TableProvider for FailingProvider<P> {
    async fn fetch(&self, request: &TableRequest) -> Result<JointDistributionTable> {
        if self.failing.contains(&request.source_id) {
            return Err(CensusKitError::Provider {
                source_id: request.source_id.clone(),
                message: "injected failure".to_string(),
            });
        }
        self.inner.fetch(request).await
    }
}

fn grid(
    family_a: Family,
    family_b: Family,
    a_labels: &[&str],
    b_labels: &[&str],
) -> JointDistributionTable {
    let mut cells = Vec::with_capacity(a_labels.len() * b_labels.len());
    for (i, a) in a_labels.iter().enumerate() {
        for (j, b) in b_labels.iter().enumerate() {
            cells.push(Cell::new(*a, *b, count_for(i, j)));
        }
    }
    table(family_a, family_b, cells)
}

fn table(family_a: Family, family_b: Family, cells: Vec<Cell>) -> JointDistributionTable {
    JointDistributionTable::new(family_a, family_b, cells)
        .expect("fixture axes use distinct families")
        .with_location(alameda_location())
}

/// Deterministic, uneven counts so distributions are not uniform.
fn count_for(i: usize, j: usize) -> u64 {
    ((i as u64 + 1) * 1_000 + (j as u64 + 1) * 137) % 4_000 + 50
}
