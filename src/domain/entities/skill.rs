use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

const MAX_NAME_LENGTH: u64 = 80;
const MAX_CATEGORY_LENGTH: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSkillRequest {
    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH, message = "name must be 1-80 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = MAX_CATEGORY_LENGTH, message = "category must be 1-60 characters"),
        custom(function = "validate_not_blank")
    )]
    pub category: String,
}

impl NewSkillRequest {
    pub fn normalized(self) -> Self {
        NewSkillRequest {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let req = NewSkillRequest { name: "   ".into(), category: "Language".into() };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn normalized_trims_both_fields() {
        let req = NewSkillRequest { name: " Rust ".into(), category: " Language".into() }.normalized();
        assert_eq!(req.name, "Rust");
        assert_eq!(req.category, "Language");
    }
}
