//! Client bulk-onboarding rows.

use crate::import::ImportRecord;
use crate::import::nested::{NestedError, encode};
use crate::import::rules::{BOOLEAN_TOKENS, CaseMode, Pattern, Rule};
use crate::import::schema::{FieldKind, FieldSpec, Row, SchemaField};
use crate::model::codes::{CONTRACT_MODEL_CODES, ContractModel, RISK_TIER_CODES, RiskTier};
use crate::model::nested::{DEPARTMENT_SHAPE, Department, LOCATION_SHAPE, Location};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Username,
    Password,
    Email,
    Phone,
    RiskTier,
    ContractModel,
    PaymentTermsDays,
    IsActive,
    Departments,
    Locations,
}

static CLIENT_FIELDS: [FieldSpec; 11] = [
    FieldSpec {
        name: "name",
        kind: FieldKind::Value,
        rules: &[Rule::Required],
        help: "client company name",
    },
    FieldSpec {
        name: "username",
        kind: FieldKind::Value,
        rules: &[Rule::Required],
        help: "login name of the client's portal account",
    },
    FieldSpec {
        name: "password",
        kind: FieldKind::Value,
        rules: &[Rule::Required, Rule::MinLength(6)],
        help: "initial portal password",
    },
    FieldSpec {
        name: "email",
        kind: FieldKind::Value,
        rules: &[Rule::Pattern(Pattern::Email)],
        help: "main contact address",
    },
    FieldSpec {
        name: "phone",
        kind: FieldKind::Value,
        rules: &[],
        help: "main contact phone",
    },
    FieldSpec {
        name: "riskTier",
        kind: FieldKind::Value,
        rules: &[Rule::OneOf {
            allowed: RISK_TIER_CODES,
            case: CaseMode::Insensitive,
        }],
        help: "credit risk tier, A is lowest",
    },
    FieldSpec {
        name: "contractModel",
        kind: FieldKind::Value,
        rules: &[Rule::OneOf {
            allowed: CONTRACT_MODEL_CODES,
            case: CaseMode::Sensitive,
        }],
        help: "how the client buys, spelled exactly as listed",
    },
    FieldSpec {
        name: "paymentTermsDays",
        kind: FieldKind::Value,
        rules: &[Rule::Integer],
        help: "days until invoices are due",
    },
    FieldSpec {
        name: "isActive",
        kind: FieldKind::Value,
        rules: &[Rule::OneOf {
            allowed: BOOLEAN_TOKENS,
            case: CaseMode::Insensitive,
        }],
        help: "whether the account starts enabled",
    },
    FieldSpec {
        name: "departments",
        kind: FieldKind::Nested(&DEPARTMENT_SHAPE),
        rules: &[],
        help: "client departments and their contacts",
    },
    FieldSpec {
        name: "locations",
        kind: FieldKind::Nested(&LOCATION_SHAPE),
        rules: &[],
        help: "delivery and billing sites",
    },
];

impl SchemaField for ClientField {
    const ALL: &'static [Self] = &[
        ClientField::Name,
        ClientField::Username,
        ClientField::Password,
        ClientField::Email,
        ClientField::Phone,
        ClientField::RiskTier,
        ClientField::ContractModel,
        ClientField::PaymentTermsDays,
        ClientField::IsActive,
        ClientField::Departments,
        ClientField::Locations,
    ];

    fn spec(self) -> &'static FieldSpec {
        &CLIENT_FIELDS[self as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub name: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub risk_tier: Option<RiskTier>,
    pub contract_model: Option<ContractModel>,
    pub payment_terms_days: Option<u32>,
    pub is_active: Option<bool>,
    pub departments: Option<Vec<Department>>,
    pub locations: Option<Vec<Location>>,
}

impl ImportRecord for ClientRecord {
    type Field = ClientField;

    const ENTITY: &'static str = "client";

    fn from_row(row: &Row<'_, ClientField>) -> Self {
        ClientRecord {
            name: row.get(ClientField::Name).to_string(),
            username: row.get(ClientField::Username).to_string(),
            password: row.get(ClientField::Password).to_string(),
            email: row.text(ClientField::Email),
            phone: row.text(ClientField::Phone),
            risk_tier: row.code(ClientField::RiskTier).and_then(RiskTier::from_code),
            contract_model: row
                .code(ClientField::ContractModel)
                .and_then(ContractModel::from_code),
            payment_terms_days: row.integer(ClientField::PaymentTermsDays),
            is_active: row.flag(ClientField::IsActive),
            departments: row.nested(ClientField::Departments),
            locations: row.nested(ClientField::Locations),
        }
    }

    fn to_cells(&self) -> Result<Vec<String>, NestedError> {
        Ok(vec![
            self.name.clone(),
            self.username.clone(),
            self.password.clone(),
            self.email.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
            self.risk_tier.map(RiskTier::as_str).unwrap_or_default().to_string(),
            self.contract_model
                .map(ContractModel::as_str)
                .unwrap_or_default()
                .to_string(),
            self.payment_terms_days
                .map(|days| days.to_string())
                .unwrap_or_default(),
            self.is_active.map(|flag| flag.to_string()).unwrap_or_default(),
            self.departments.as_deref().map(encode).transpose()?.unwrap_or_default(),
            self.locations.as_deref().map(encode).transpose()?.unwrap_or_default(),
        ])
    }

    fn example() -> Self {
        ClientRecord {
            name: "Acme Industries, Inc.".to_string(),
            username: "acme.admin".to_string(),
            password: "changeMe42".to_string(),
            email: Some("purchasing@acme.example".to_string()),
            phone: Some("+1 555 0100".to_string()),
            risk_tier: Some(RiskTier::B),
            contract_model: Some(ContractModel::LongTermAgreement),
            payment_terms_days: Some(30),
            is_active: Some(true),
            departments: Some(vec![
                Department {
                    kind: "finance".to_string(),
                    contact_name: Some("John Doe".to_string()),
                    contact_email: Some("john@example.com".to_string()),
                    contact_phone: Some("+123456789".to_string()),
                },
                Department {
                    kind: "warehouse".to_string(),
                    contact_name: Some("Jane Roe".to_string()),
                    contact_email: Some("jane@example.com".to_string()),
                    contact_phone: Some("+000".to_string()),
                },
            ]),
            locations: Some(vec![
                Location {
                    name: "Headquarters".to_string(),
                    address: "12 Main St, Suite 4".to_string(),
                    city: Some("Springfield".to_string()),
                    country: Some("US".to_string()),
                },
                Location {
                    name: "Depot".to_string(),
                    address: "7 Dock Road".to_string(),
                    city: Some("Shelbyville".to_string()),
                    country: Some("US".to_string()),
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
        let names: Vec<&str> = ClientField::ALL.iter().map(|f| f.name()).collect();
        let table: Vec<&str> = CLIENT_FIELDS.iter().map(|spec| spec.name).collect();
        assert_eq!(names, table);
    }

    #[test]
    fn decodes_departments_from_the_nested_grammar() {
        let text = "name,username,password,departments\n\
                    Acme,acme,secret1,finance|John Doe|john@example.com|+123456789||warehouse|Jane|jane@x.com|+000\n";
        let result = run_import::<ClientRecord>(text, &ImportOptions::default());

        assert!(result.success, "{:?}", result.errors);
        let departments = result.records[0].departments.clone().unwrap();
        assert_eq!(
            departments,
            vec![
                Department {
                    kind: "finance".to_string(),
                    contact_name: Some("John Doe".to_string()),
                    contact_email: Some("john@example.com".to_string()),
                    contact_phone: Some("+123456789".to_string()),
                },
                Department {
                    kind: "warehouse".to_string(),
                    contact_name: Some("Jane".to_string()),
                    contact_email: Some("jane@x.com".to_string()),
                    contact_phone: Some("+000".to_string()),
                },
            ]
        );
        assert_eq!(result.records[0].locations, None);
    }

    #[test]
    fn password_is_not_serialized() {
        let json = serde_json::to_value(ClientRecord::example()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["riskTier"], "B");
        assert_eq!(json["contractModel"], "LTA");
        assert_eq!(json["departments"][0]["type"], "finance");
    }
}
