//! Structured job description, as returned by the LLM structuring call and
//! forwarded verbatim to the keyword-analysis backend.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobData {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub salary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tools: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub qualifications: Vec<String>,
}

/// LLM output sometimes carries `null` for fields it could not find.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl JobData {
    /// Company name, if the description named one.
    pub fn company_name(&self) -> Option<&str> {
        let company = self.company.trim();
        (!company.is_empty()).then_some(company)
    }
}
