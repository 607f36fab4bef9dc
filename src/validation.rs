// Request validation support for `#[derive(validator::Validate)]`
//
// Custom rules return errors whose code is the wire tag. `first_tag` picks the
// single tag reported for a field when more than one of its rules failed.

use serde_json::Value;
use validator::ValidationError;

fn rule(ok: bool, code: &'static str) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

/// Non-empty. Whitespace-only strings pass.
pub fn required(value: &str) -> Result<(), ValidationError> {
    rule(!value.is_empty(), "required")
}

/// Non-empty ASCII digits
pub fn digits(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    rule(value.chars().all(|c| c.is_ascii_digit()), "numeric")
}

fn rank(tag: &str) -> u8 {
    match tag {
        "required" => 0,
        "numeric" => 1,
        _ => 2,
    }
}

/// `length` errors are reported as `len`, `min` or `max` depending on which
/// bound was broken.
fn length_tag(error: &ValidationError) -> &'static str {
    let bound = |name: &str| error.params.get(name).and_then(Value::as_u64);
    if bound("equal").is_some() {
        return "len";
    }

    let count = error
        .params
        .get("value")
        .and_then(Value::as_str)
        .map(|value| value.chars().count() as u64);

    match (bound("min"), count) {
        (Some(min), Some(count)) if count < min => "min",
        (Some(_), None) => "min",
        _ => "max",
    }
}

fn tag(error: &ValidationError) -> String {
    match error.code.as_ref() {
        "length" => length_tag(error).to_string(),
        code => code.to_string(),
    }
}

/// `required` outranks every other tag and `numeric` outranks the length
/// tags; otherwise the first error recorded wins.
pub fn first_tag(errors: &[ValidationError]) -> Option<String> {
    errors.iter().map(tag).min_by_key(|tag| rank(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn length_error(value: &str, bounds: &[(&'static str, u64)]) -> ValidationError {
        let mut error = ValidationError::new("length");
        for (name, bound) in bounds {
            error.add_param(Cow::from(*name), bound);
        }
        error.add_param(Cow::from("value"), &value);
        error
    }

    #[test]
    fn digits_reports_emptiness_before_format() {
        assert_eq!(digits("").unwrap_err().code, "required");
        assert_eq!(digits("08-12").unwrap_err().code, "numeric");
        assert!(digits("081234567890").is_ok());
    }

    #[test]
    fn whitespace_passes_required() {
        assert!(required("   ").is_ok());
    }

    #[test]
    fn length_errors_name_the_broken_bound() {
        let short = length_error("0812", &[("min", 8), ("max", 15)]);
        let long = length_error("0812345678901234", &[("min", 8), ("max", 15)]);
        let exact = length_error("123", &[("equal", 16)]);

        assert_eq!(tag(&short), "min");
        assert_eq!(tag(&long), "max");
        assert_eq!(tag(&exact), "len");
    }

    #[test]
    fn required_outranks_later_rules() {
        let errors = vec![
            length_error("", &[("min", 6)]),
            ValidationError::new("required"),
        ];
        assert_eq!(first_tag(&errors).as_deref(), Some("required"));

        let errors = vec![length_error("12ab", &[("equal", 16)]), ValidationError::new("numeric")];
        assert_eq!(first_tag(&errors).as_deref(), Some("numeric"));
        assert_eq!(first_tag(&[]), None);
    }
}
