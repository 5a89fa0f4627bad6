//! Field-level rules checked before a record reaches the store.

use crate::config::{EntityDescriptor, FieldKind, FieldSpec, Record};
use crate::error::FieldErrors;
use crate::serializer::REQUIRED;
use regex::Regex;
use serde_json::Value;

pub struct RecordValidator;

impl RecordValidator {
    /// Check every declared field of a complete record. Relationship and uniqueness checks need
    /// the store and run in the gateway.
    pub fn validate(entity: &EntityDescriptor, record: &Record) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for spec in &entity.fields {
            if spec.auto_now_add {
                continue;
            }
            let val = record.get(spec.name).unwrap_or(&Value::Null);
            if val.is_null() {
                if spec.required {
                    errors.add(spec.name, REQUIRED);
                } else if !spec.nullable {
                    errors.add(spec.name, crate::serializer::NOT_NULL);
                }
                continue;
            }
            validate_field(spec, val, &mut errors);
        }
        if let Some(hook) = entity.validate {
            hook(record, &mut errors);
        }
        errors
    }
}

fn validate_field(spec: &FieldSpec, v: &Value, errors: &mut FieldErrors) {
    let col = spec.name;
    let rule = &spec.rules;
    if let Some(s) = v.as_str() {
        if spec.required && matches!(spec.kind, FieldKind::Text | FieldKind::Password) && s.trim().is_empty() {
            errors.add(col, REQUIRED);
            return;
        }
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                errors.add(col, format!("Ensure this field has no more than {} characters.", max));
            }
        }
        if let Some(pattern) = rule.pattern {
            match Regex::new(pattern) {
                Ok(re) if !re.is_match(s) => errors.add(col, "Enter a valid value."),
                Ok(_) => {}
                Err(_) => errors.add(col, format!("invalid pattern for {}", col)),
            }
        }
        if let Some(format) = rule.format {
            validate_format(col, s, format, errors);
        }
    }
    if let FieldKind::Choice(choices) = &spec.kind {
        let code = v.as_str().unwrap_or_default();
        if !choices.iter().any(|c| c.code == code) {
            errors.add(col, format!("\"{}\" is not a valid choice.", code));
        }
    }
    if let Some(min) = rule.minimum {
        if let Some(n) = v.as_i64() {
            if n < min {
                errors.add(col, format!("Ensure this value is greater than or equal to {}.", min));
            }
        }
    }
}

fn validate_format(col: &str, s: &str, format: &str, errors: &mut FieldErrors) {
    match format {
        "email" => {
            let valid = s
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
                .unwrap_or(false);
            if !valid {
                errors.add(col, "Enter a valid email address.");
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models;
    use serde_json::json;

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn title_length_is_bounded() {
        let post = models::post::descriptor();
        let long = "x".repeat(201);
        let errors = RecordValidator::validate(
            &post,
            &record(json!({"title": long, "body": "b", "number_of_likes": 0, "number_of_shares": 0,
                           "is_active": true, "is_deleted": false})),
        );
        assert_eq!(
            errors.get("title"),
            Some(&["Ensure this field has no more than 200 characters.".to_string()][..])
        );
    }

    #[test]
    fn likes_never_negative() {
        let post = models::post::descriptor();
        let errors = RecordValidator::validate(
            &post,
            &record(json!({"title": "t", "body": "b", "number_of_likes": -1, "number_of_shares": -5,
                           "is_active": true, "is_deleted": false})),
        );
        assert!(errors.contains("number_of_likes"));
        assert!(!errors.contains("number_of_shares"));
    }

    #[test]
    fn blank_and_missing_required_fields() {
        let classroom = models::classroom::descriptor();
        let blank = RecordValidator::validate(&classroom, &record(json!({"name": "  "})));
        assert_eq!(blank.get("name"), Some(&[REQUIRED.to_string()][..]));
        assert!(RecordValidator::validate(&classroom, &record(json!({}))).contains("name"));
        assert!(RecordValidator::validate(&classroom, &record(json!({"name": "A"}))).is_empty());
    }

    #[test]
    fn username_pattern_and_email_format() {
        let user = models::user::descriptor();
        let errors = RecordValidator::validate(
            &user,
            &record(json!({"username": "bad name", "password": "h", "first_name": "", "last_name": "",
                           "email": "nope", "is_staff": false, "is_active": true})),
        );
        assert!(errors.contains("username"));
        assert!(errors.contains("email"));
    }
}
