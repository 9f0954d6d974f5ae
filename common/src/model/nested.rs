//! Sub-records embedded in a client or vendor row.

use crate::import::nested::{NestedRecord, SubRecord, SubRecordShape};
use serde::{Deserialize, Serialize};

pub const DEPARTMENT_SHAPE: SubRecordShape = SubRecordShape {
    name: "department",
    parts: &["type", "contactName", "contactEmail", "contactPhone"],
    required: 1,
};

pub const LOCATION_SHAPE: SubRecordShape = SubRecordShape {
    name: "location",
    parts: &["name", "address", "city", "country"],
    required: 2,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Department type, e.g. `finance` or `warehouse`.
    #[serde(rename = "type")]
    pub kind: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl NestedRecord for Department {
    const SHAPE: &'static SubRecordShape = &DEPARTMENT_SHAPE;

    fn from_sub_record(record: &SubRecord) -> Self {
        Department {
            kind: record.get("type").to_string(),
            contact_name: record.value("contactName"),
            contact_email: record.value("contactEmail"),
            contact_phone: record.value("contactPhone"),
        }
    }

    fn to_parts(&self) -> Vec<Option<String>> {
        vec![
            Some(self.kind.clone()),
            self.contact_name.clone(),
            self.contact_email.clone(),
            self.contact_phone.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl NestedRecord for Location {
    const SHAPE: &'static SubRecordShape = &LOCATION_SHAPE;

    fn from_sub_record(record: &SubRecord) -> Self {
        Location {
            name: record.get("name").to_string(),
            address: record.get("address").to_string(),
            city: record.value("city"),
            country: record.value("country"),
        }
    }

    fn to_parts(&self) -> Vec<Option<String>> {
        vec![
            Some(self.name.clone()),
            Some(self.address.clone()),
            self.city.clone(),
            self.country.clone(),
        ]
    }
}
