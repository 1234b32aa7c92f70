use anyhow::Context;
use axum::extract::Multipart;
use contracts::domain::a002_company::UploadedFile;
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::shared::api_error::{ApiError, ApiResult};
use crate::shared::format::{format_number, format_size};

/// URL-префикс, под которым раздаются загруженные файлы
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Хранилище загруженных файлов на диске
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn ensure_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create uploads dir {}", self.dir.display()))
    }

    /// Сохранить файл из поля `field_name` multipart-запроса
    pub async fn save_field(
        &self,
        mut multipart: Multipart,
        field_name: &str,
    ) -> ApiResult<UploadedFile> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Некорректный запрос: {}", e)))?
        {
            if field.name() != Some(field_name) {
                continue;
            }

            let original = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Не удалось прочитать файл: {}", e)))?;

            if bytes.is_empty() {
                return Err(ApiError::BadRequest("Файл пустой".into()));
            }
            if bytes.len() > self.max_bytes {
                return Err(ApiError::BadRequest(format!(
                    "Файл слишком большой: {}, допустимо не более {}",
                    format_size(bytes.len()),
                    format_size(self.max_bytes)
                )));
            }

            let millis = chrono::Utc::now().timestamp_millis();
            let random = rand::thread_rng().gen_range(0..1_000_000_000u32);
            let file_name = generate_file_name(&original, millis, random);
            let path = self.dir.join(&file_name);

            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))
                .map_err(|e| ApiError::internal("Не удалось сохранить файл", format!("{:#}", e)))?;

            tracing::info!(
                "Stored upload {} ({} bytes)",
                file_name,
                format_number(bytes.len())
            );

            return Ok(UploadedFile {
                url: format!("{}/{}", UPLOADS_URL_PREFIX, file_name),
                file_name,
                size: bytes.len(),
            });
        }

        Err(ApiError::BadRequest(format!(
            "В запросе нет файла в поле \"{}\"",
            field_name
        )))
    }
}

/// Имя файла `${epoch_millis}-${random}${ext}`
///
/// Расширение берётся из исходного имени в нижнем регистре и только если
/// оно из латиницы/цифр и не длиннее 8 символов.
pub fn generate_file_name(original: &str, millis: i64, random: u32) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}-{}{}", millis, random, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_file_name() {
        assert_eq!(
            generate_file_name("Фото.JPG", 1700000000000, 42),
            "1700000000000-42.jpg"
        );
        assert_eq!(generate_file_name("scan.pdf", 1, 2), "1-2.pdf");
    }

    #[test]
    fn test_generate_file_name_drops_odd_extensions() {
        assert_eq!(generate_file_name("noext", 5, 7), "5-7");
        assert_eq!(generate_file_name("a.verylongext", 5, 7), "5-7");
        assert_eq!(generate_file_name("a.p-g", 5, 7), "5-7");
        assert_eq!(generate_file_name("../../etc/passwd", 5, 7), "5-7");
    }
}
