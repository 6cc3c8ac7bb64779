//! Calendar domain records as they are stored and exchanged over HTTP.

use serde::{Deserialize, Serialize};

use crate::document_store::{StoredDocument, Table};

/// An owner record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub id: String,
}

/// A calendar belonging to one owner entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    #[serde(default)]
    pub id: String,
    pub owner_id: String,
}

/// An availability window published on a calendar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default)]
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub ttl: i64,
}

/// A claimed sub-window of a period
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub period_id: String,
    // Cancellation bodies carry only the ids
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub ttl: i64,
}

impl StoredDocument for Entity {
    const TABLE: Table = Table::Entity;
}

impl StoredDocument for Calendar {
    const TABLE: Table = Table::Calendar;
}

impl StoredDocument for Period {
    const TABLE: Table = Table::Period;
}

impl StoredDocument for Reservation {
    const TABLE: Table = Table::Reservation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let reservation = Reservation {
            id: "r1".into(),
            period_id: "p1".into(),
            start_date: "2030-01-01 10:00".into(),
            end_date: "2030-01-01 11:00".into(),
            ttl: 5,
        };

        let value = serde_json::to_value(&reservation).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "r1",
                "periodId": "p1",
                "startDate": "2030-01-01 10:00",
                "endDate": "2030-01-01 11:00",
                "ttl": 5
            })
        );
    }

    #[test]
    fn test_server_assigned_fields_optional() {
        let period: Period = serde_json::from_value(json!({
            "startDate": "2030-01-01 10:00",
            "endDate": "2030-01-01 12:00"
        }))
        .unwrap();
        assert!(period.id.is_empty());
        assert_eq!(period.ttl, 0);

        let calendar: Calendar = serde_json::from_value(json!({"ownerId": "o1"})).unwrap();
        assert_eq!(calendar.owner_id, "o1");
    }
}
