//! Vendor bulk-import rows.

use crate::import::ImportRecord;
use crate::import::nested::{NestedError, encode};
use crate::import::rules::{BOOLEAN_TOKENS, CaseMode, Pattern, Rule};
use crate::import::schema::{FieldKind, FieldSpec, Row, SchemaField};
use crate::model::codes::{RISK_TIER_CODES, RiskTier};
use crate::model::nested::{LOCATION_SHAPE, Location};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorField {
    Name,
    ContactEmail,
    ContactPhone,
    Category,
    RiskTier,
    LeadTimeDays,
    IsPreferred,
    Locations,
}

static VENDOR_FIELDS: [FieldSpec; 8] = [
    FieldSpec {
        name: "name",
        kind: FieldKind::Value,
        rules: &[Rule::Required],
        help: "vendor company name",
    },
    FieldSpec {
        name: "contactEmail",
        kind: FieldKind::Value,
        rules: &[Rule::Pattern(Pattern::Email)],
        help: "address purchase orders are sent to",
    },
    FieldSpec {
        name: "contactPhone",
        kind: FieldKind::Value,
        rules: &[],
        help: "sales contact phone",
    },
    FieldSpec {
        name: "category",
        kind: FieldKind::Value,
        rules: &[],
        help: "what the vendor supplies",
    },
    FieldSpec {
        name: "riskTier",
        kind: FieldKind::Value,
        rules: &[Rule::OneOf {
            allowed: RISK_TIER_CODES,
            case: CaseMode::Insensitive,
        }],
        help: "supply risk tier, A is lowest",
    },
    FieldSpec {
        name: "leadTimeDays",
        kind: FieldKind::Value,
        rules: &[Rule::Integer],
        help: "usual days from order to delivery",
    },
    FieldSpec {
        name: "isPreferred",
        kind: FieldKind::Value,
        rules: &[Rule::OneOf {
            allowed: BOOLEAN_TOKENS,
            case: CaseMode::Insensitive,
        }],
        help: "listed first when creating price offers",
    },
    FieldSpec {
        name: "locations",
        kind: FieldKind::Nested(&LOCATION_SHAPE),
        rules: &[],
        help: "warehouses and pick-up points",
    },
];

impl SchemaField for VendorField {
    const ALL: &'static [Self] = &[
        VendorField::Name,
        VendorField::ContactEmail,
        VendorField::ContactPhone,
        VendorField::Category,
        VendorField::RiskTier,
        VendorField::LeadTimeDays,
        VendorField::IsPreferred,
        VendorField::Locations,
    ];

    fn spec(self) -> &'static FieldSpec {
        &VENDOR_FIELDS[self as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub category: Option<String>,
    pub risk_tier: Option<RiskTier>,
    pub lead_time_days: Option<u32>,
    pub is_preferred: Option<bool>,
    pub locations: Option<Vec<Location>>,
}

impl ImportRecord for VendorRecord {
    type Field = VendorField;

    const ENTITY: &'static str = "vendor";

    fn from_row(row: &Row<'_, VendorField>) -> Self {
        VendorRecord {
            name: row.get(VendorField::Name).to_string(),
            contact_email: row.text(VendorField::ContactEmail),
            contact_phone: row.text(VendorField::ContactPhone),
            category: row.text(VendorField::Category),
            risk_tier: row.code(VendorField::RiskTier).and_then(RiskTier::from_code),
            lead_time_days: row.integer(VendorField::LeadTimeDays),
            is_preferred: row.flag(VendorField::IsPreferred),
            locations: row.nested(VendorField::Locations),
        }
    }

    fn to_cells(&self) -> Result<Vec<String>, NestedError> {
        Ok(vec![
            self.name.clone(),
            self.contact_email.clone().unwrap_or_default(),
            self.contact_phone.clone().unwrap_or_default(),
            self.category.clone().unwrap_or_default(),
            self.risk_tier.map(RiskTier::as_str).unwrap_or_default().to_string(),
            self.lead_time_days
                .map(|days| days.to_string())
                .unwrap_or_default(),
            self.is_preferred.map(|flag| flag.to_string()).unwrap_or_default(),
            self.locations.as_deref().map(encode).transpose()?.unwrap_or_default(),
        ])
    }

    fn example() -> Self {
        VendorRecord {
            name: "Northwind Supplies".to_string(),
            contact_email: Some("sales@northwind.example".to_string()),
            contact_phone: Some("+44 20 7946 0000".to_string()),
            category: Some("Packaging, pallets".to_string()),
            risk_tier: Some(RiskTier::A),
            lead_time_days: Some(14),
            is_preferred: Some(false),
            locations: Some(vec![
                Location {
                    name: "Main warehouse".to_string(),
                    address: "3 Harbour Way".to_string(),
                    city: Some("Leeds".to_string()),
                    country: Some("UK".to_string()),
                },
                Location {
                    name: "Pick-up point".to_string(),
                    address: "Unit 9, Ring Road".to_string(),
                    city: Some("York".to_string()),
                    country: None,
                },
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportOptions, run_import};

    #[test]
    fn field_table_matches_variant_order() {
        let names: Vec<&str> = VendorField::ALL.iter().map(|f| f.name()).collect();
        let table: Vec<&str> = VENDOR_FIELDS.iter().map(|spec| spec.name).collect();
        assert_eq!(names, table);
    }

    #[test]
    fn locations_need_name_and_address() {
        let text = "name,locations\nNorthwind,Main warehouse|3 Harbour Way||Annex\n";
        let result = run_import::<VendorRecord>(text, &ImportOptions::default());

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "locations");
        assert_eq!(result.errors[0].row, 2);
        assert!(result.records.is_empty());
    }

    #[test]
    fn json_locations_are_accepted() {
        let text = "name,locations\nNorthwind,\"[{\"\"name\"\":\"\"Dock\"\",\"\"address\"\":\"\"1 Pier\"\"}]\"\n";
        let result = run_import::<VendorRecord>(text, &ImportOptions::default());

        assert!(result.success, "{:?}", result.errors);
        let locations = result.records[0].locations.clone().unwrap();
        assert_eq!(locations[0].name, "Dock");
        assert_eq!(locations[0].address, "1 Pier");
        assert_eq!(locations[0].city, None);
    }
}
