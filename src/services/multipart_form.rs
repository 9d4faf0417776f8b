//! Multipart form collection
//! 
//! Reads a whole `multipart/form-data` body into text fields and file parts
//! so handlers can validate the metadata before any file is written.

use axum::extract::Multipart;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::services::file_storage::UploadedFile;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_date;

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            match file_name {
                Some(file_name) if !file_name.trim().is_empty() => {
                    let bytes = field.bytes().await?;
                    form.files.push(UploadedFile {
                        field_name: name,
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                // Empty file inputs are sent with a blank file name.
                Some(_) => {
                    field.bytes().await?;
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn from_parts(fields: &[(&str, &str)], files: Vec<UploadedFile>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files,
        }
    }

    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, name: &'static str, message: &str) -> AppResult<String> {
        self.text(name).ok_or_else(|| validation_error(name, message))
    }

    pub fn integer(&self, name: &'static str) -> AppResult<Option<i64>> {
        self.text(name)
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| validation_error(name, format!("{} must be a whole number", name)))
            })
            .transpose()
    }

    pub fn date(&self, name: &'static str) -> AppResult<Option<NaiveDate>> {
        self.text(name)
            .map(|v| {
                validate_date(&v)
                    .map_err(|_| validation_error(name, format!("{} must be a date (YYYY-MM-DD)", name)))
            })
            .transpose()
    }

    /// Remove and return the first file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|f| f.field_name == name)?;
        Some(self.files.remove(index))
    }

    /// Remove and return every file sent under `name` or `name[]`.
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let array_name = format!("{}[]", name);
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field_name == name || f.field_name == array_name);
        self.files = rest;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn file(field: &str, name: &str) -> UploadedFile {
        UploadedFile {
            field_name: field.to_string(),
            file_name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[test]
    fn test_text_fields() {
        let form = MultipartForm::from_parts(&[("title", "  Franchise permit "), ("route_id", " ")], vec![]);
        assert_eq!(form.text("title").as_deref(), Some("Franchise permit"));
        assert_eq!(form.text("route_id"), None);
        assert_eq!(form.integer("route_id").unwrap(), None);
        assert!(form.required("document_type", "Document type is required").is_err());
    }

    #[test]
    fn test_typed_fields() {
        let form = MultipartForm::from_parts(&[("driver_id", "12"), ("valid_from", "2024-02-30")], vec![]);
        assert_eq!(form.integer("driver_id").unwrap(), Some(12));
        assert!(form.date("valid_from").is_err());
    }

    #[test]
    fn test_take_files() {
        let mut form = MultipartForm::from_parts(
            &[],
            vec![file("attachments[]", "a.pdf"), file("file", "main.pdf"), file("attachments", "b.pdf")],
        );
        assert_eq!(form.take_file("file").unwrap().file_name, "main.pdf");
        let attachments = form.take_files("attachments");
        assert_eq!(attachments.len(), 2);
        assert!(form.take_file("file").is_none());
    }
}
