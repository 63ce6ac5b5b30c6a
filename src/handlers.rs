// src/handlers.rs
use crate::{AppState, errors::AnalyzerError, models::*};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use log::{info, warn};
use std::time::Instant;

const UPLOAD_FIELD: &str = "file";
const DEFAULT_FILENAME: &str = "upload";

pub async fn analyze_crop(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let start = Instant::now();
    let max_bytes = data.config.max_file_size_bytes();
    let mut upload = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != UPLOAD_FIELD {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.essence_str().starts_with("image/"));
        if !is_image {
            return Err(AnalyzerError::Validation("File must be an image".to_string()).into());
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();

        // Stop reading as soon as the limit is crossed
        let mut image_data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if image_data.len() + chunk.len() > max_bytes {
                return Err(AnalyzerError::Validation(format!(
                    "File size must be less than {}MB",
                    data.config.max_file_size_mb
                ))
                .into());
            }
            image_data.extend_from_slice(&chunk);
        }

        if image_data.is_empty() {
            return Err(AnalyzerError::Validation("Uploaded file is empty".to_string()).into());
        }

        upload = Some((filename, image_data.freeze()));
        break;
    }

    let (filename, image_data) = upload
        .ok_or_else(|| AnalyzerError::Validation("No image file provided".to_string()))?;

    let diagnosis = data.analyzer.analyze(&image_data, &filename).await?;
    let response_time_ms = start.elapsed().as_millis() as u64;

    if diagnosis.is_fallback() {
        warn!("Returning fallback diagnosis for {}", filename);
    }
    info!(
        "Analyzed {} ({} bytes) in {}ms",
        filename,
        image_data.len(),
        response_time_ms
    );

    Ok(HttpResponse::Ok().json(AnalysisResponse {
        diagnosis,
        filename,
        response_time_ms,
    }))
}
