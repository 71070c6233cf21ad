//! Static vocabularies: standard census labels, synonym tables mapping
//! surface forms to canonical tokens, and the fixed hierarchy of each
//! ordinal family.
//!
//! Synonym keys are written in cleaned form (lowercase, single spaces,
//! straight apostrophes, no trailing colon), matching `normalize::clean_label`.

// === Standard census vocabularies ===

pub static STANDARD_AGE_RANGES: &[&str] = &[
    "Under 5 years",
    "5 to 9 years",
    "10 to 14 years",
    "15 to 17 years",
    "18 and 19 years",
    "20 to 24 years",
    "25 to 29 years",
    "30 to 34 years",
    "35 to 44 years",
    "45 to 54 years",
    "55 to 64 years",
    "65 to 74 years",
    "75 to 84 years",
    "85 years and over",
];

pub static STANDARD_INCOME_RANGES: &[&str] = &[
    "$1 to $2,499 or loss",
    "$2,500 to $4,999",
    "$5,000 to $7,499",
    "$7,500 to $9,999",
    "$10,000 to $12,499",
    "$12,500 to $14,999",
    "$15,000 to $17,499",
    "$17,500 to $19,999",
    "$20,000 to $22,499",
    "$22,500 to $24,999",
    "$25,000 to $29,999",
    "$30,000 to $34,999",
    "$35,000 to $39,999",
    "$40,000 to $44,999",
    "$45,000 to $49,999",
    "$50,000 to $54,999",
    "$55,000 to $64,999",
    "$65,000 to $74,999",
    "$75,000 to $99,999",
    "$100,000 or more",
];

pub static STANDARD_EDUCATION_LEVELS: &[&str] = &[
    "Less than 9th grade",
    "9th to 12th grade, no diploma",
    "High school graduate",
    "Some college, no degree",
    "Associate's degree",
    "Bachelor's degree",
    "Graduate or professional degree",
];

pub static STANDARD_PROFESSIONS: &[&str] = &[
    "Management, business, science, and arts occupations",
    "Service occupations",
    "Sales and office occupations",
    "Natural resources, construction, and maintenance occupations",
    "Production, transportation, and material moving occupations",
];

pub static STANDARD_RACE_ETHNICITY: &[&str] = &[
    "White Alone",
    "Black or African American Alone",
    "American Indian and Alaska Native Alone",
    "Asian Alone",
    "Native Hawaiian and Other Pacific Islander Alone",
    "Some Other Race Alone",
    "Two or More Races",
    "Hispanic or Latino",
];

pub static STANDARD_GENDERS: &[&str] = &["Male", "Female"];

// === Hierarchies (canonical tokens, in order) ===

pub static EDUCATION_HIERARCHY: &[&str] = &[
    "less_than_hs",
    "high_school",
    "some_college",
    "associate",
    "bachelor",
    "graduate",
];

pub static PROFESSION_HIERARCHY: &[&str] = &[
    "management_business_science_arts",
    "management_business_financial",
    "management",
    "professional_scientific_technical",
    "computer_mathematical",
    "architecture_engineering",
    "healthcare_practitioners",
    "healthcare_support",
    "education_training_library",
    "legal",
    "arts_design_entertainment",
    "service",
    "food_service",
    "protective_service",
    "sales_office",
    "sales",
    "office_admin",
    "natural_resources_construction_maintenance",
    "farming_fishing_forestry",
    "construction_extraction",
    "installation_maintenance_repair",
    "production_transportation_material",
    "production",
    "transportation_material",
];

pub static RACE_HIERARCHY: &[&str] = &[
    "white",
    "white_non_hispanic",
    "black",
    "american_indian_alaska_native",
    "asian",
    "native_hawaiian_pacific_islander",
    "other_race",
    "two_or_more_races",
    "hispanic_latino",
];

pub static GENDER_HIERARCHY: &[&str] = &["male", "female"];

// === Synonym tables (cleaned surface form → canonical token) ===

pub static EDUCATION_SYNONYMS: &[(&str, &str)] = &[
    ("less than 9th grade", "less_than_hs"),
    ("9th to 12th grade, no diploma", "less_than_hs"),
    ("less than high school", "less_than_hs"),
    ("less than high school graduate", "less_than_hs"),
    ("no high school diploma", "less_than_hs"),
    ("no schooling completed", "less_than_hs"),
    ("high school graduate (includes equivalency)", "high_school"),
    ("high school graduate", "high_school"),
    ("high school graduate or equivalent", "high_school"),
    ("high school diploma", "high_school"),
    ("ged or alternative credential", "high_school"),
    ("some college, no degree", "some_college"),
    ("some college", "some_college"),
    ("associate's degree", "associate"),
    ("associate degree", "associate"),
    ("associates degree", "associate"),
    ("bachelor's degree", "bachelor"),
    ("bachelors degree", "bachelor"),
    ("bachelor degree", "bachelor"),
    ("graduate or professional degree", "graduate"),
    ("graduate degree", "graduate"),
    ("master's degree", "graduate"),
    ("professional school degree", "graduate"),
    ("doctorate degree", "graduate"),
];

pub static PROFESSION_SYNONYMS: &[(&str, &str)] = &[
    (
        "management, business, science, and arts occupations",
        "management_business_science_arts",
    ),
    (
        "management, business, and financial occupations",
        "management_business_financial",
    ),
    ("management occupations", "management"),
    ("service occupations", "service"),
    (
        "food preparation and serving related occupations",
        "food_service",
    ),
    ("healthcare support occupations", "healthcare_support"),
    ("protective service occupations", "protective_service"),
    ("sales and office occupations", "sales_office"),
    ("sales and related occupations", "sales"),
    (
        "office and administrative support occupations",
        "office_admin",
    ),
    (
        "natural resources, construction, and maintenance occupations",
        "natural_resources_construction_maintenance",
    ),
    (
        "farming, fishing, and forestry occupations",
        "farming_fishing_forestry",
    ),
    (
        "construction and extraction occupations",
        "construction_extraction",
    ),
    (
        "installation, maintenance, and repair occupations",
        "installation_maintenance_repair",
    ),
    (
        "production, transportation, and material moving occupations",
        "production_transportation_material",
    ),
    ("production occupations", "production"),
    (
        "transportation and material moving occupations",
        "transportation_material",
    ),
    (
        "professional, scientific, and technical services",
        "professional_scientific_technical",
    ),
    (
        "healthcare practitioners and technical occupations",
        "healthcare_practitioners",
    ),
    (
        "education, training, and library occupations",
        "education_training_library",
    ),
    (
        "educational instruction, and library occupations",
        "education_training_library",
    ),
    ("computer and mathematical occupations", "computer_mathematical"),
    (
        "architecture and engineering occupations",
        "architecture_engineering",
    ),
    ("legal occupations", "legal"),
    (
        "arts, design, entertainment, sports, and media occupations",
        "arts_design_entertainment",
    ),
];

pub static RACE_SYNONYMS: &[(&str, &str)] = &[
    ("white alone", "white"),
    ("white", "white"),
    ("white, not hispanic or latino", "white_non_hispanic"),
    ("white alone, not hispanic or latino", "white_non_hispanic"),
    ("black or african american alone", "black"),
    ("black or african american", "black"),
    ("black alone", "black"),
    ("black", "black"),
    ("african american", "black"),
    ("asian alone", "asian"),
    ("asian", "asian"),
    (
        "american indian and alaska native alone",
        "american_indian_alaska_native",
    ),
    (
        "american indian or alaska native alone",
        "american_indian_alaska_native",
    ),
    (
        "american indian and alaska native",
        "american_indian_alaska_native",
    ),
    ("native american", "american_indian_alaska_native"),
    (
        "native hawaiian and other pacific islander alone",
        "native_hawaiian_pacific_islander",
    ),
    (
        "native hawaiian or other pacific islander alone",
        "native_hawaiian_pacific_islander",
    ),
    ("pacific islander", "native_hawaiian_pacific_islander"),
    ("some other race alone", "other_race"),
    ("some other race", "other_race"),
    ("other race", "other_race"),
    ("two or more races", "two_or_more_races"),
    ("multiracial", "two_or_more_races"),
    ("mixed race", "two_or_more_races"),
    ("hispanic or latino", "hispanic_latino"),
    ("hispanic or latino origin", "hispanic_latino"),
    ("hispanic", "hispanic_latino"),
    ("latino", "hispanic_latino"),
    ("spanish", "hispanic_latino"),
];

pub static GENDER_SYNONYMS: &[(&str, &str)] = &[
    ("male", "male"),
    ("males", "male"),
    ("men", "male"),
    ("man", "male"),
    ("m", "male"),
    ("female", "female"),
    ("females", "female"),
    ("women", "female"),
    ("woman", "female"),
    ("f", "female"),
];

// === Token-overlap support ===

/// Words ignored when comparing labels token by token.
pub static STOP_WORDS: &[&str] = &["alone", "or", "and", "other", "not"];

/// A hand-curated hint: when any `target_terms` token appears in the target
/// and any `candidate_terms` token appears in the candidate, the pair scores
/// `score` regardless of raw token overlap.
#[derive(Debug, Clone, Copy)]
pub struct SynonymTrigger {
    pub target_terms: &'static [&'static str],
    pub candidate_terms: &'static [&'static str],
    pub score: f64,
    pub label: &'static str,
}

pub static RACE_TRIGGERS: &[SynonymTrigger] = &[
    SynonymTrigger {
        target_terms: &["hispanic", "latino", "spanish"],
        candidate_terms: &["hispanic", "latino"],
        score: 0.9,
        label: "Hispanic/Latino",
    },
    SynonymTrigger {
        target_terms: &["white"],
        candidate_terms: &["white"],
        score: 0.8,
        label: "White",
    },
    SynonymTrigger {
        target_terms: &["black", "african"],
        candidate_terms: &["black", "african"],
        score: 0.8,
        label: "Black/African American",
    },
    SynonymTrigger {
        target_terms: &["asian"],
        candidate_terms: &["asian"],
        score: 0.8,
        label: "Asian",
    },
];

pub static GENDER_TRIGGERS: &[SynonymTrigger] = &[
    SynonymTrigger {
        target_terms: &["female", "females", "women", "woman", "girls"],
        candidate_terms: &["female", "females", "women", "woman", "girls"],
        score: 0.9,
        label: "Female",
    },
    SynonymTrigger {
        target_terms: &["male", "males", "men", "man", "boys"],
        candidate_terms: &["male", "males", "men", "man", "boys"],
        score: 0.9,
        label: "Male",
    },
];
