use serde::{Deserialize, Serialize};
use theratrack_client::Resource;

/// A therapist as served by `/therapists`.
///
/// The backend spells the birth date `birthDate`; older records use
/// `birthdate`, which is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Therapist {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub gender: String,
    #[serde(alias = "birthdate")]
    pub birth_date: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Therapist {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

/// Payload for adding a therapist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistCreate {
    pub name: String,
    pub surname: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// Payload for editing a therapist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Resource for Therapist {
    type Id = i64;
    type Create = TherapistCreate;
    type Update = TherapistUpdate;
    const ENDPOINT: &'static str = "/therapists";
    const LABEL: &'static str = "therapist";
    const LABEL_PLURAL: &'static str = "therapists";

    fn id(&self) -> i64 {
        self.id
    }
}
