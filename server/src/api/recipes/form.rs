//! Multipart parsing shared by the create and update endpoints.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::Response;
use notebook_core::{Category, MAX_FILE_SIZE};

use crate::api::error_response;

/// Name of the file part carrying the photo.
pub const PHOTO_FIELD: &str = "photo";

/// Text fields and the optional photo from a recipe form submission.
#[derive(Debug, Default)]
pub struct RecipeFormData {
    fields: HashMap<String, String>,
    pub photo: Option<Vec<u8>>,
}

impl RecipeFormData {
    /// A text field, if it was submitted at all.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A text field that's treated as missing when blank.
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.field(name).filter(|v| !v.trim().is_empty())
    }

    /// Checkbox-style flag: "true", "1" or "on".
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.field(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("true" | "1" | "on")
        )
    }

    /// Parse the category field. `Ok(None)` when it wasn't submitted or is blank.
    pub fn category(&self) -> Result<Option<Category>, Response> {
        match self.non_blank("category") {
            None => Ok(None),
            Some(value) => Category::parse(value).map(Some).ok_or_else(|| {
                error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Unknown category: {}", value.trim()),
                )
            }),
        }
    }
}

fn multipart_error(context: &str, e: MultipartError) -> Response {
    tracing::warn!("{} error: {}", context, e);
    let error_msg = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!("File too large. Maximum size is {} bytes", MAX_FILE_SIZE)
    } else {
        format!("Failed to read multipart data: {}", e.body_text())
    };
    error_response(e.status(), error_msg)
}

/// Drain a multipart request into [`RecipeFormData`].
///
/// An empty photo part (a form submitted with no file chosen) counts as no photo.
pub async fn read_form(mut multipart: Multipart) -> Result<RecipeFormData, Response> {
    let mut form = RecipeFormData::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error("Multipart read", e)),
        };

        let name = field.name().unwrap_or_default().to_string();

        if name == PHOTO_FIELD {
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Photo read", e))?;
            if !data.is_empty() {
                form.photo = Some(data.to_vec());
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error("Field read", e))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> RecipeFormData {
        RecipeFormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            photo: None,
        }
    }

    #[test]
    fn test_non_blank() {
        let f = form(&[("name", "  "), ("body", "Mix")]);
        assert_eq!(f.field("name"), Some("  "));
        assert_eq!(f.non_blank("name"), None);
        assert_eq!(f.non_blank("body"), Some("Mix"));
        assert_eq!(f.non_blank("missing"), None);
    }

    #[test]
    fn test_flag() {
        assert!(form(&[("remove_photo", "true")]).flag("remove_photo"));
        assert!(form(&[("remove_photo", "ON")]).flag("remove_photo"));
        assert!(!form(&[("remove_photo", "no")]).flag("remove_photo"));
        assert!(!form(&[]).flag("remove_photo"));
    }

    #[test]
    fn test_category() {
        assert!(matches!(
            form(&[("category", "Sweet")]).category(),
            Ok(Some(Category::Sweet))
        ));
        assert!(matches!(form(&[]).category(), Ok(None)));
        assert!(form(&[("category", "dessert")]).category().is_err());
    }
}
