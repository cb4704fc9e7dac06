use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Attribute – the three card attributes, in display order
// ---------------------------------------------------------------------------

/// Card attribute. The derived `Ord` is the display order inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Cute,
    Cool,
    Passion,
}

impl Attribute {
    /// Short code used in the source spreadsheet.
    pub fn code(self) -> &'static str {
        match self {
            Attribute::Cute => "Cu",
            Attribute::Cool => "Co",
            Attribute::Passion => "Pa",
        }
    }
}

impl FromStr for Attribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Cu" | "Cute" | "cute" => Ok(Attribute::Cute),
            "Co" | "Cool" | "cool" => Ok(Attribute::Cool),
            "Pa" | "Passion" | "passion" => Ok(Attribute::Passion),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// ProbabilityTier – skill activation probability
// ---------------------------------------------------------------------------

/// Activation probability tier, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProbabilityTier {
    Low,
    Medium,
    High,
}

impl ProbabilityTier {
    /// Single-character code, as written in the spreadsheet and in row keys.
    pub fn code(self) -> char {
        match self {
            ProbabilityTier::Low => '低',
            ProbabilityTier::Medium => '中',
            ProbabilityTier::High => '高',
        }
    }
}

impl FromStr for ProbabilityTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "低" | "low" | "Low" => Ok(ProbabilityTier::Low),
            "中" | "medium" | "Medium" => Ok(ProbabilityTier::Medium),
            "高" | "high" | "High" => Ok(ProbabilityTier::High),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ProbabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Idol – one row of the catalog
// ---------------------------------------------------------------------------

/// A single catalog entry, validated at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Idol {
    /// Display name; may contain `<br>` line-break markers.
    pub name: String,
    /// Image path or `file://` URI.
    pub image: String,
    pub skill: String,
    pub attribute: Attribute,
    pub specialty: String,
    /// Only meaningful for the extended-detail skills.
    pub sub_attribute: Option<String>,
    /// Only meaningful for the extended-detail skills.
    pub dominant: Option<String>,
    pub seconds: u32,
    pub probability: ProbabilityTier,
    pub center_effect: Option<String>,
    pub vocal: Option<u32>,
    pub dance: Option<u32>,
    pub visual: Option<u32>,
    pub memorial_gacha: Option<String>,
}

// ---------------------------------------------------------------------------
// Filterable fields and their values
// ---------------------------------------------------------------------------

/// Fields the user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Skill,
    Seconds,
    Attribute,
    Specialty,
    Probability,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Skill,
        FilterField::Seconds,
        FilterField::Attribute,
        FilterField::Specialty,
        FilterField::Probability,
    ];

    /// Heading used by the filter panel.
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Skill => "スキル",
            FilterField::Seconds => "秒数",
            FilterField::Attribute => "属性",
            FilterField::Specialty => "特化",
            FilterField::Probability => "確率",
        }
    }

    /// Read this field from a record.
    pub fn value_of(self, idol: &Idol) -> FieldValue {
        match self {
            FilterField::Skill => FieldValue::Text(idol.skill.clone()),
            FilterField::Seconds => FieldValue::Integer(idol.seconds),
            FilterField::Attribute => FieldValue::Attribute(idol.attribute),
            FilterField::Specialty => FieldValue::Text(idol.specialty.clone()),
            FilterField::Probability => FieldValue::Probability(idol.probability),
        }
    }

    /// Compare without allocating; used by the filter hot path.
    pub fn matches(self, idol: &Idol, value: &FieldValue) -> bool {
        match (self, value) {
            (FilterField::Skill, FieldValue::Text(s)) => idol.skill == *s,
            (FilterField::Specialty, FieldValue::Text(s)) => idol.specialty == *s,
            (FilterField::Seconds, FieldValue::Integer(n)) => idol.seconds == *n,
            (FilterField::Attribute, FieldValue::Attribute(a)) => idol.attribute == *a,
            (FilterField::Probability, FieldValue::Probability(p)) => idol.probability == *p,
            _ => false,
        }
    }
}

/// A typed value of a filterable field.
///
/// `Ord` is only used to keep values in `BTreeSet`s; presentation order comes
/// from [`CatalogDataset::distinct_values`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Attribute(Attribute),
    Probability(ProbabilityTier),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Attribute(a) => write!(f, "{a}"),
            FieldValue::Probability(p) => write!(f, "{p}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogDataset – the complete loaded catalog
// ---------------------------------------------------------------------------

/// The full parsed catalog with pre-computed filter options.
#[derive(Debug, Clone)]
pub struct CatalogDataset {
    /// All records, in file order.
    pub idols: Vec<Idol>,
    /// For each filter field, its distinct values in presentation order.
    distinct: BTreeMap<FilterField, Vec<FieldValue>>,
}

impl CatalogDataset {
    /// Build the filter option index from the loaded records.
    pub fn from_idols(idols: Vec<Idol>) -> Self {
        let mut distinct = BTreeMap::new();
        for field in FilterField::ALL {
            let mut seen: BTreeSet<FieldValue> = BTreeSet::new();
            let mut values: Vec<FieldValue> = Vec::new();
            for idol in &idols {
                let value = field.value_of(idol);
                if seen.insert(value.clone()) {
                    values.push(value);
                }
            }
            // Numeric and enum fields are listed in their natural order;
            // free text keeps first-appearance order.
            match field {
                FilterField::Seconds | FilterField::Attribute | FilterField::Probability => {
                    values.sort()
                }
                FilterField::Skill | FilterField::Specialty => {}
            }
            distinct.insert(field, values);
        }
        CatalogDataset { idols, distinct }
    }

    /// Distinct values of `field`, used to populate the filter controls.
    pub fn distinct_values(&self, field: FilterField) -> &[FieldValue] {
        self.distinct.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.idols.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.idols.is_empty()
    }
}
