//! Shared validation helpers used by the request DTOs.

use std::borrow::Cow;

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::response::FieldError;

/// Cleans up a request body before its rules are checked (trims strings, etc.).
pub trait Normalize {
    fn normalize(&mut self);
}

pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub(crate) fn trim_option(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim_in_place(inner);
    }
}

/// Trim every tag and drop the ones left empty.
pub(crate) fn clean_tags(tags: &mut Vec<String>) {
    tags.iter_mut().for_each(trim_in_place);
    tags.retain(|tag| !tag.is_empty());
}

/// Rejects empty strings. The message is supplied by the field attribute.
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// A post title must be present and contain an ASCII letter or digit, so a slug can be derived.
pub fn post_title(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid("required", "Title is required"));
    }
    if !value.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("sluggable", "Title must contain a letter or digit"));
    }
    Ok(())
}

/// A category reference must be present and parse as an identifier.
pub fn category_ref(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid("required", "Category is required"));
    }
    if Uuid::parse_str(value).is_err() {
        return Err(invalid("reference_id", "Invalid category ID"));
    }
    Ok(())
}

/// Flatten validator output into `{field, message}` pairs, fields named as on the wire.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = to_camel_case(&field);
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(format!("Invalid value ({})", err.code)));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();

    // HashMap order is unspecified; keep responses stable.
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
