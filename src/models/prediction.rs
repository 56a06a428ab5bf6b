use serde::{Deserialize, Deserializer, Serialize};

use super::symptom::{Symptom, Vocabulary};

/// One candidate disease returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    /// Confidence in the range 0–100.
    pub match_percentage: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub precautions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub medications: Vec<String>,
}

impl Prediction {
    /// Match percentage with one decimal, exact ties rounded away from zero (`87.25` → `87.3`).
    pub fn match_label(&self) -> String {
        format_percentage(self.match_percentage)
    }
}

/// Format a percentage with one decimal place.
///
/// Rounds the exact binary value to the nearest tenth, so `1.45` (stored as
/// `1.4499…`) gives `"1.4"`. Only exact ties round away from zero. A tenth-tie
/// is representable only when `value * 4` is an odd integer (`x.25`, `x.75`).
pub fn format_percentage(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        let rounded = (value * 10.0).round() / 10.0;
        return format!("{rounded:.1}");
    }
    format!("{value:.1}")
}

/// One disease record from `GET /diseases`. Only the symptom list is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiseaseRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symptoms: Vec<String>,
}

/// Response body of `GET /diseases`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiseasesResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub diseases: Vec<DiseaseRecord>,
}

impl DiseasesResponse {
    /// Derive the vocabulary: sorted, de-duplicated union of every disease's symptoms.
    pub fn into_vocabulary(self) -> Vocabulary {
        Vocabulary::from_symptom_lists(self.diseases.into_iter().map(|d| d.symptoms))
    }
}

/// Request body of `POST /predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub symptoms: &'a [Symptom],
}

/// Response body of `POST /predict`. Absent or `null` predictions mean no match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub predictions: Vec<Prediction>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
