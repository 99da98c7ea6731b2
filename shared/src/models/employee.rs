//! Employee Model
//!
//! Employees form a forest through `supervisor_id`. The row types here are
//! what the repositories read; the tree and detail types are assembled in
//! the server's hierarchy layer.

use crate::util::double_option;
use crate::validation::{MAX_EMAIL_LEN, MAX_NAME_LEN, validate_person_name};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employee entity as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub hire_date: NaiveDate,
    pub position_id: Option<i64>,
    pub supervisor_id: Option<i64>,
    /// Whether tree views expand this employee's subordinates
    pub show_subordinates: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Employee joined with position and supervisor names (list rows)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeView {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub hire_date: NaiveDate,
    pub position_id: Option<i64>,
    pub position_name: Option<String>,
    pub supervisor_id: Option<i64>,
    pub supervisor_name: Option<String>,
    pub show_subordinates: bool,
}

/// Flat record served by the data endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    pub id: i64,
    pub full_name: String,
    pub position_name: Option<String>,
    pub hire_date: NaiveDate,
    pub email: String,
    pub supervisor_name: Option<String>,
}

impl From<EmployeeView> for EmployeeData {
    fn from(v: EmployeeView) -> Self {
        Self {
            id: v.id,
            full_name: v.full_name,
            position_name: v.position_name,
            hire_date: v.hire_date,
            email: v.email,
            supervisor_name: v.supervisor_name,
        }
    }
}

/// Short reference to an employee (supervisor / direct report listings)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeSummary {
    pub id: i64,
    pub full_name: String,
    pub position_name: Option<String>,
}

/// Employee detail: the view plus supervisor and direct reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: EmployeeView,
    pub supervisor: Option<EmployeeSummary>,
    pub subordinates: Vec<EmployeeSummary>,
}

/// Node of the supervisor tree
///
/// A node whose employee has `show_subordinates = false` is `collapsed`:
/// its `children` are left empty while `subordinate_count` still reports
/// the number of direct reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: i64,
    pub full_name: String,
    pub position_name: Option<String>,
    pub subordinate_count: usize,
    pub collapsed: bool,
    pub children: Vec<TreeNode>,
}

fn default_true() -> bool {
    true
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeCreate {
    #[validate(
        length(min = 1, max = MAX_NAME_LEN),
        custom(function = "validate_person_name")
    )]
    pub full_name: String,
    #[validate(email, length(max = MAX_EMAIL_LEN))]
    pub email: String,
    pub hire_date: NaiveDate,
    pub position_id: Option<i64>,
    pub supervisor_id: Option<i64>,
    #[serde(default = "default_true")]
    pub show_subordinates: bool,
}

/// Update employee payload
///
/// For the nullable references an absent field leaves the value untouched
/// while an explicit `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmployeeUpdate {
    #[validate(
        length(min = 1, max = MAX_NAME_LEN),
        custom(function = "validate_person_name")
    )]
    pub full_name: Option<String>,
    #[validate(email, length(max = MAX_EMAIL_LEN))]
    pub email: Option<String>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub position_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub supervisor_id: Option<Option<i64>>,
    pub show_subordinates: Option<bool>,
}

/// Reparent one employee; `supervisor_id: null` makes it a root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorUpdate {
    pub employee_id: i64,
    pub supervisor_id: Option<i64>,
}

/// Move every direct report of the path employee under `new_supervisor_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignSubordinates {
    pub new_supervisor_id: Option<i64>,
}

/// Result of a bulk reassignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignResult {
    pub moved: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(full_name: &str, email: &str) -> EmployeeCreate {
        EmployeeCreate {
            full_name: full_name.into(),
            email: email.into(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            position_id: None,
            supervisor_id: None,
            show_subordinates: true,
        }
    }

    #[test]
    fn test_create_accepts_valid_payload() {
        assert!(create("Ada Lovelace", "ada@example.com").validate().is_ok());
    }

    #[test]
    fn test_create_rejects_non_letter_names() {
        let errors = create("Ada L0velace", "ada@example.com")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));

        let errors = create(&"a".repeat(51), "ada@example.com")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
    }

    #[test]
    fn test_create_rejects_bad_email() {
        let errors = create("Ada", "not-an-email").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_create_defaults_show_subordinates() {
        let payload: EmployeeCreate = serde_json::from_str(
            r#"{"full_name":"Ada","email":"ada@example.com","hire_date":"2021-03-04"}"#,
        )
        .unwrap();
        assert!(payload.show_subordinates);
        assert_eq!(payload.position_id, None);
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: EmployeeUpdate = serde_json::from_str(r#"{"full_name":"Bob"}"#).unwrap();
        assert_eq!(absent.supervisor_id, None);

        let cleared: EmployeeUpdate = serde_json::from_str(r#"{"supervisor_id":null}"#).unwrap();
        assert_eq!(cleared.supervisor_id, Some(None));

        let set: EmployeeUpdate = serde_json::from_str(r#"{"position_id":7}"#).unwrap();
        assert_eq!(set.position_id, Some(Some(7)));
    }

    #[test]
    fn test_update_validates_present_name() {
        let update = EmployeeUpdate {
            full_name: Some("Bob_99".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(EmployeeUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_detail_flattens_view() {
        let detail = EmployeeDetail {
            employee: EmployeeView {
                id: 1,
                full_name: "Ada".into(),
                email: "ada@example.com".into(),
                hire_date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
                position_id: None,
                position_name: None,
                supervisor_id: None,
                supervisor_name: None,
                show_subordinates: true,
            },
            supervisor: None,
            subordinates: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["full_name"], "Ada");
        assert_eq!(json["hire_date"], "2020-05-01");
        assert!(json["subordinates"].as_array().unwrap().is_empty());
    }
}
