use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Attribute, CatalogDataset, Idol, ProbabilityTier};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal load failures. Any of these stops the pipeline before rendering.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("catalog file is not valid {encoding}")]
    Decode { encoding: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: required column '{column}' is empty")]
    MissingField { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// How to read the catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// WHATWG encoding label, e.g. `shift_jis` or `utf-8`.
    pub encoding: String,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: "shift_jis".to_string(),
            delimiter: b',',
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the catalog from a delimited text file.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<CatalogDataset, CatalogError> {
    let bytes = std::fs::read(path).map_err(|source| CatalogError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes, &options.encoding)?;
    let dataset = parse_catalog(&text, options.delimiter)?;
    log::info!("Loaded {} idols from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Decode raw bytes with the given encoding label. A BOM overrides the label.
pub fn decode<'a>(bytes: &'a [u8], label: &str) -> Result<Cow<'a, str>, CatalogError> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CatalogError::UnknownEncoding(label.to_string()))?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CatalogError::Decode {
            encoding: used.name(),
        });
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// One row as it appears in the spreadsheet, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "アイドル名")]
    name: Option<String>,
    #[serde(rename = "画像パス")]
    image: Option<String>,
    #[serde(rename = "スキル")]
    skill: Option<String>,
    #[serde(rename = "属性")]
    attribute: Option<String>,
    #[serde(rename = "特化")]
    specialty: Option<String>,
    #[serde(rename = "秒数")]
    seconds: Option<String>,
    #[serde(rename = "確率")]
    probability: Option<String>,
    #[serde(rename = "センター効果")]
    center_effect: Option<String>,
    #[serde(rename = "Vo")]
    vocal: Option<String>,
    #[serde(rename = "Da")]
    dance: Option<String>,
    #[serde(rename = "Vi")]
    visual: Option<String>,
    #[serde(rename = "メモリアルガシャ", default)]
    memorial_gacha: Option<String>,
    #[serde(rename = "副属性", default)]
    sub_attribute: Option<String>,
    #[serde(rename = "ドミナント", default)]
    dominant: Option<String>,
}

/// Parse already-decoded catalog text.
pub fn parse_catalog(text: &str, delimiter: u8) -> Result<CatalogDataset, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut idols = Vec::new();
    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result?;
        idols.push(validate(raw, i + 1)?);
    }

    Ok(CatalogDataset::from_idols(idols))
}

fn validate(raw: RawRow, row: usize) -> Result<Idol, CatalogError> {
    let attribute = required(raw.attribute, row, "属性")?;
    let probability = required(raw.probability, row, "確率")?;

    Ok(Idol {
        name: required(raw.name, row, "アイドル名")?,
        image: required(raw.image, row, "画像パス")?,
        skill: required(raw.skill, row, "スキル")?,
        attribute: attribute
            .parse::<Attribute>()
            .map_err(|_| invalid(row, "属性", &attribute))?,
        specialty: required(raw.specialty, row, "特化")?,
        sub_attribute: optional(raw.sub_attribute),
        dominant: optional(raw.dominant),
        seconds: number(raw.seconds, row, "秒数")?,
        probability: probability
            .parse::<ProbabilityTier>()
            .map_err(|_| invalid(row, "確率", &probability))?,
        center_effect: optional(raw.center_effect),
        vocal: optional_number(raw.vocal, row, "Vo")?,
        dance: optional_number(raw.dance, row, "Da")?,
        visual: optional_number(raw.visual, row, "Vi")?,
        memorial_gacha: optional(raw.memorial_gacha),
    })
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(
    value: Option<String>,
    row: usize,
    column: &'static str,
) -> Result<String, CatalogError> {
    optional(value).ok_or(CatalogError::MissingField { row, column })
}

/// Integer column; tolerates the `6.0` form spreadsheet exports produce.
fn number(value: Option<String>, row: usize, column: &'static str) -> Result<u32, CatalogError> {
    let text = required(value, row, column)?;
    parse_number(&text, row, column)
}

/// Blank is `None`; a present value must still be an integer.
fn optional_number(
    value: Option<String>,
    row: usize,
    column: &'static str,
) -> Result<Option<u32>, CatalogError> {
    optional(value)
        .map(|text| parse_number(&text, row, column))
        .transpose()
}

fn parse_number(text: &str, row: usize, column: &'static str) -> Result<u32, CatalogError> {
    let trimmed = text.strip_suffix(".0").unwrap_or(text);
    trimmed.parse::<u32>().map_err(|_| invalid(row, column, text))
}

fn invalid(row: usize, column: &'static str, value: &str) -> CatalogError {
    CatalogError::InvalidField {
        row,
        column,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FilterField;
    use std::io::Write;

    const HEADER: &str = "アイドル名,画像パス,スキル,属性,特化,秒数,確率,センター効果,Vo,Da,Vi,メモリアルガシャ";

    fn csv_text(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn parses_rows_in_file_order() {
        let text = csv_text(&[
            "島村卯月,img/uzuki.png,スコアアップ,Cu,ボーカル,7,高,キュートアピール,7000,6000,5000,",
            "渋谷凛<br>（ニュージェネ）,img/rin.png,コンボボーナス,Co,ダンス,9,中,クールアピール,5000,7000,6000,2024年春",
        ]);
        let ds = parse_catalog(&text, b',').unwrap();

        assert_eq!(ds.len(), 2);
        let rin = &ds.idols[1];
        assert_eq!(rin.name, "渋谷凛<br>（ニュージェネ）");
        assert_eq!(rin.attribute, Attribute::Cool);
        assert_eq!(rin.probability, ProbabilityTier::Medium);
        assert_eq!(rin.seconds, 9);
        assert_eq!(rin.memorial_gacha.as_deref(), Some("2024年春"));
        assert_eq!(ds.idols[0].memorial_gacha, None);
        assert_eq!(ds.idols[0].sub_attribute, None);
        assert_eq!(ds.distinct_values(FilterField::Skill).len(), 2);
    }

    #[test]
    fn reads_extended_detail_columns() {
        let text = "アイドル名,画像パス,スキル,属性,特化,秒数,確率,センター効果,Vo,Da,Vi,メモリアルガシャ,副属性,ドミナント\n\
                    本田未央,img/mio.png,ドミナント・ハーモニー,Pa,ボーカル&ダンス,9,高,,6000,6000,5000,,Cu,ボーカル";
        let ds = parse_catalog(text, b',').unwrap();
        let mio = &ds.idols[0];
        assert_eq!(mio.sub_attribute.as_deref(), Some("Cu"));
        assert_eq!(mio.dominant.as_deref(), Some("ボーカル"));
        assert_eq!(mio.center_effect, None);
    }

    #[test]
    fn tolerates_float_formatted_integers() {
        let text = csv_text(&["a,a.png,スコアアップ,Pa,ダンス,11.0,低,,1,2,3,"]);
        let ds = parse_catalog(&text, b',').unwrap();
        assert_eq!(ds.idols[0].seconds, 11);
    }

    #[test]
    fn blank_stat_keeps_the_row_and_its_siblings() {
        let text = csv_text(&[
            "a,a.png,スコアアップ,Cu,ダンス,7,高,効果,7000,,5000,",
            "b,b.png,スコアアップ,Co,ダンス,7,高,効果,1,2,3,",
        ]);
        let ds = parse_catalog(&text, b',').unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.idols[0].vocal, Some(7000));
        assert_eq!(ds.idols[0].dance, None);
        assert_eq!(ds.idols[0].visual, Some(5000));
        assert_eq!(ds.idols[1].dance, Some(2));
    }

    #[test]
    fn non_numeric_stat_is_still_invalid() {
        let text = csv_text(&["a,a.png,スコアアップ,Cu,ダンス,7,高,,7000,たくさん,5000,"]);
        match parse_catalog(&text, b',').unwrap_err() {
            CatalogError::InvalidField { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Da");
                assert_eq!(value, "たくさん");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_required_field_is_fatal() {
        let text = csv_text(&["a,a.png,,Cu,ダンス,7,高,,1,2,3,"]);
        let err = parse_catalog(&text, b',').unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingField { row: 1, column: "スキル" }
        ));
    }

    #[test]
    fn invalid_tier_reports_row_and_value() {
        let text = csv_text(&[
            "a,a.png,スコアアップ,Cu,ダンス,7,高,,1,2,3,",
            "b,b.png,スコアアップ,Cu,ダンス,7,最高,,1,2,3,",
        ]);
        match parse_catalog(&text, b',').unwrap_err() {
            CatalogError::InvalidField { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "確率");
                assert_eq!(value, "最高");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable { .. }));
    }

    #[test]
    fn loads_shift_jis_file() {
        let text = csv_text(&["島村卯月,img/uzuki.png,スコアアップ,Cu,ボーカル,7,高,,7000,6000,5000,"]);
        let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(&text);
        assert!(!had_errors);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let ds = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.idols[0].name, "島村卯月");
        assert_eq!(ds.idols[0].skill, "スコアアップ");
    }

    #[test]
    fn utf8_bom_overrides_label() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("名前".as_bytes());
        assert_eq!(decode(&bytes, "shift_jis").unwrap(), "名前");
    }

    #[test]
    fn unknown_encoding_label() {
        assert!(matches!(
            decode(b"abc", "klingon"),
            Err(CatalogError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn custom_delimiter() {
        let text = csv_text(&["a,a.png,スコアアップ,Cu,ダンス,7,高,,1,2,3,"]).replace(',', "\t");
        let ds = parse_catalog(&text, b'\t').unwrap();
        assert_eq!(ds.len(), 1);
    }
}
