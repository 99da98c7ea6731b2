//! Position Model

use crate::validation::{MAX_NAME_LEN, validate_not_blank};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Position entity (job title referenced by employees)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Position {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Position with the number of employees currently holding it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PositionWithCount {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub employee_count: i64,
}

/// Create position payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PositionCreate {
    #[validate(
        length(min = 1, max = MAX_NAME_LEN),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
}

/// Update position payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PositionUpdate {
    #[validate(
        length(min = 1, max = MAX_NAME_LEN),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_create_validation() {
        assert!(PositionCreate { name: "Engineer".into() }.validate().is_ok());
        assert!(PositionCreate { name: "  ".into() }.validate().is_err());
        assert!(
            PositionCreate {
                name: "x".repeat(MAX_NAME_LEN as usize + 1)
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_position_update_skips_absent_name() {
        assert!(PositionUpdate::default().validate().is_ok());
        assert!(
            PositionUpdate {
                name: Some(String::new())
            }
            .validate()
            .is_err()
        );
    }
}
