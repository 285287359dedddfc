//! Input validation for posts.
//!
//! Field rules live on the input types as `validator` attributes; this module
//! adds the prohibited-word rule, flattens `validator`'s nested error tree into
//! a list of [`FieldViolation`]s, and hands out [`Validated`] values, the only
//! form the store accepts.

use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::post::{PostCreate, PostUpdate};

/// Titles containing any of these (case-insensitive) are rejected.
pub const PROHIBITED_WORDS: &[&str] = &["spam", "scam", "clickbait", "gratis"];

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path, e.g. `title`, `author.email`, `tags[1].name`,
    /// `query.per_page`.
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { field: field.into(), code: code.into(), message: message.into() }
    }
}

/// Input rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(mut violations: Vec<FieldViolation>) -> Self {
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        Self { violations }
    }

    pub fn single(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, code, message)])
    }

    /// A request body that is not valid JSON for the expected shape.
    pub fn body(err: &serde_json::Error) -> Self {
        Self::single("body", "json_invalid", err.to_string())
    }

    /// A query string that does not deserialize into the expected parameters.
    pub fn query(err: &serde_urlencoded::de::Error) -> Self {
        Self::single("query", "query_invalid", err.to_string())
    }

    /// Flattens `errors` with every path placed under `scope`, e.g.
    /// `query.per_page`.
    pub fn scoped(scope: &str, errors: &ValidationErrors) -> Self {
        let mut out = Vec::new();
        flatten(scope, errors, &mut out);
        Self::new(out)
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations.iter()
        .map(|v| format!("{} ({})", v.field, v.code))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        Self::scoped("", &errors)
    }
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldViolation::new(&path, e.code.to_string(), describe(e))));
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn describe(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &*error.code {
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max} characters"),
            (Some(min), None) => format!("length must be at least {min} characters"),
            (None, Some(max)) => format!("length must be at most {max} characters"),
            (None, None) => "invalid length".to_owned(),
        },
        "range" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "out of range".to_owned(),
        },
        "email" => "must be a valid email address".to_owned(),
        code => code.replace('_', " "),
    }
}

/// Custom `validator` rule for titles.
pub fn reject_prohibited_words(title: &str) -> Result<(), validator::ValidationError> {
    let lowered = title.to_lowercase();
    match PROHIBITED_WORDS.iter().find(|word| lowered.contains(*word)) {
        Some(word) => Err(validator::ValidationError::new("prohibited_word")
            .with_message(Cow::Owned(format!("title must not contain \"{word}\"")))),
        None => Ok(()),
    }
}

/// A value that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

pub fn validate_create(input: PostCreate) -> Result<Validated<PostCreate>, ValidationError> {
    input.validate()?;
    Ok(Validated(input))
}

pub fn validate_update(input: PostUpdate) -> Result<Validated<PostUpdate>, ValidationError> {
    input.validate()?;
    Ok(Validated(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{Author, Tag};

    #[test]
    fn accepts_a_well_formed_post() {
        let input = PostCreate {
            tags: vec![Tag::new("rust")],
            author: Some(Author { name: "Ana".into(), email: Some("ana@example.com".into()) }),
            ..PostCreate::new("Un buen titulo", "Contenido suficientemente largo")
        };
        assert!(validate_create(input).is_ok());
    }

    #[test]
    fn title_length_bounds() {
        let short = validate_create(PostCreate::new("ab", "Contenido valido aqui")).unwrap_err();
        assert!(short.has_field("title"));
        assert_eq!(short.violations()[0].code, "length");

        let long = validate_create(PostCreate::new("x".repeat(101), "Contenido valido aqui")).unwrap_err();
        assert!(long.has_field("title"));

        assert!(validate_create(PostCreate::new("abc", "Contenido valido aqui")).is_ok());
        assert!(validate_create(PostCreate::new("x".repeat(100), "Contenido valido aqui")).is_ok());
    }

    #[test]
    fn prohibited_words_are_case_insensitive_substrings() {
        let err = validate_create(PostCreate::new("Oferta GRATIS hoy", "Contenido valido aqui")).unwrap_err();
        assert_eq!(err.violations()[0].field, "title");
        assert_eq!(err.violations()[0].code, "prohibited_word");
        assert!(reject_prohibited_words("Antispam tools").is_err());
        assert!(reject_prohibited_words("Segundo Post").is_ok());
    }

    #[test]
    fn content_is_optional_but_bounded() {
        let mut input = PostCreate::new("Titulo", "corto");
        assert!(validate_create(input.clone()).unwrap_err().has_field("content"));
        input.content = None;
        assert!(validate_create(input).is_ok());
    }

    #[test]
    fn nested_violations_carry_their_path() {
        let input = PostCreate {
            tags: vec![Tag::new("ok"), Tag::new("x")],
            author: Some(Author { name: "A".into(), email: Some("not-an-email".into()) }),
            ..PostCreate::new("Titulo valido", "Contenido valido aqui")
        };
        let err = validate_create(input).unwrap_err();
        assert!(err.has_field("tags[1].name"));
        assert!(err.has_field("author.name"));
        assert!(err.has_field("author.email"));
        assert!(!err.has_field("tags[0].name"));
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        assert!(validate_update(PostUpdate::default()).is_ok());

        let bad = PostUpdate { title: Some("Compra spam".into()), ..Default::default() };
        assert!(validate_update(bad).unwrap_err().has_field("title"));

        let bad_content = PostUpdate { content: Some("breve".into()), ..Default::default() };
        assert!(validate_update(bad_content).unwrap_err().has_field("content"));
    }

    #[test]
    fn violations_are_sorted_by_field() {
        let input = PostCreate {
            content: Some("corto".into()),
            ..PostCreate::new("a", "")
        };
        let err = validate_create(input).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["content", "title"]);
    }
}
