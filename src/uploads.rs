//! Disk storage for uploaded photos and logos, plus the multipart form reader
//! shared by every upload route.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use axum::extract::Multipart;
use chrono::Utc;
use tokio::fs;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Write `bytes` under a fresh name derived from the client's filename and
    /// return the stored name, which is what rows reference.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let name = stored_file_name(Utc::now().timestamp_millis(), original_name);
        fs::write(self.dir.join(&name), bytes).await?;
        tracing::debug!(file = %name, size = bytes.len(), "upload stored");
        Ok(name)
    }

    /// Best-effort removal; a missing file is not an error worth surfacing.
    pub async fn remove(&self, name: &str) {
        if name.contains(['/', '\\']) {
            return;
        }
        if let Err(err) = fs::remove_file(self.dir.join(name)).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %err, file = %name, "failed to remove upload");
            }
        }
    }

    /// Drop a freshly stored file when the request that carried it failed.
    pub async fn discard_on_error<T>(&self, file: Option<&str>, result: AppResult<T>) -> AppResult<T> {
        if result.is_err() {
            if let Some(name) = file {
                self.remove(name).await;
            }
        }
        result
    }
}

/// `<unix-millis>-<name>`, where `name` keeps only the final path component of
/// the client filename and only `[A-Za-z0-9._-]` characters.
pub fn stored_file_name(millis: i64, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let mut clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = clean.trim_start_matches('.');
    if trimmed.is_empty() {
        clean = "upload".to_string();
    } else if trimmed.len() != clean.len() {
        clean = trimmed.to_string();
    }
    format!("{millis}-{clean}")
}

/// Text fields of a multipart form plus the stored name of its file part, if any.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<String>,
}

impl FormData {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            file: None,
        }
    }

    /// Trimmed value of a field; blank values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Like [`FormData::text`], but the value is kept exactly as sent.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.fields.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Drain a multipart body. The part named `file_field` is written to `store`
/// when it carries a filename and content; every other part is read as text.
pub async fn read_form(
    multipart: &mut Multipart,
    store: &UploadStore,
    file_field: &str,
) -> AppResult<FormData> {
    let mut form = FormData::default();
    let result = collect_parts(multipart, store, file_field, &mut form).await;
    let file = form.file.clone();
    store.discard_on_error(file.as_deref(), result).await?;
    Ok(form)
}

async fn collect_parts(
    multipart: &mut Multipart,
    store: &UploadStore,
    file_field: &str,
    form: &mut FormData,
) -> AppResult<()> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == file_field {
            let original = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            if let Some(original) = original.filter(|_| !bytes.is_empty()) {
                if let Some(previous) = form.file.take() {
                    store.remove(&previous).await;
                }
                form.file = Some(store.save(&original, &bytes).await?);
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        form.fields.insert(name, value);
    }
    Ok(())
}
