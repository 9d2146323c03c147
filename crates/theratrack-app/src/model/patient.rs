use serde::{Deserialize, Serialize};
use theratrack_client::Resource;

/// A patient record as served by `/patients`.
///
/// Fields the server leaves out decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub gender: String,
    pub birthdate: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

/// Payload for registering a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCreate {
    pub name: String,
    pub surname: String,
    pub gender: String,
    pub birthdate: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Default for PatientCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            surname: String::new(),
            gender: "Male".to_string(),
            birthdate: String::new(),
            address: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

/// Payload for editing a patient. `None` fields are not sent and stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Resource for Patient {
    type Id = i64;
    type Create = PatientCreate;
    type Update = PatientUpdate;
    const ENDPOINT: &'static str = "/patients";
    const LABEL: &'static str = "patient";
    const LABEL_PLURAL: &'static str = "patients";

    fn id(&self) -> i64 {
        self.id
    }
}
