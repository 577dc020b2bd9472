//! Upload resource handlers: create (POST), query offset (HEAD), append (PATCH).

use crate::body::{finalize_digest, hasher_slot, request_body_stream, tee_digest};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::handlers::header_value;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hoist_core::checksum::UploadChecksum;
use hoist_core::extension::Extension;
use hoist_core::protocol;
use hoist_core::upload::{Upload, UploadId};
use time::OffsetDateTime;

/// POST /api/v3/files - create an upload resource of known total length.
#[tracing::instrument(skip(state, headers))]
pub async fn create_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    if let Some(defer) = headers.get(protocol::UPLOAD_DEFER_LENGTH) {
        if defer.to_str().ok() != Some("1") {
            return Err(ApiError::BadRequest(
                "invalid Upload-Defer-Length header".to_string(),
            ));
        }
        return Err(ApiError::NotImplemented(
            "deferred length creation is not implemented".to_string(),
        ));
    }

    let total_size: u64 = headers
        .get(protocol::UPLOAD_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ApiError::BadRequest("invalid Upload-Length header".to_string()))?;

    let max_size = state.config.protocol.max_size;
    if max_size > 0 && total_size > max_size {
        return Err(ApiError::PayloadTooLarge(
            "upload-Length exceeds the maximum size".to_string(),
        ));
    }

    let metadata = headers
        .get(protocol::UPLOAD_METADATA)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let expires_at = state
        .config
        .protocol
        .extensions
        .enabled(Extension::Expiration)
        .then(|| OffsetDateTime::now_utc() + state.config.protocol.upload_max_duration());

    let upload = Upload::new(total_size, metadata, expires_at);
    state.metadata.save(&upload).await?;

    tracing::info!(upload_id = %upload.id, total_size, "upload created");

    let mut response_headers = HeaderMap::new();
    response_headers.insert(LOCATION, header_value(&format!("/files/{}", upload.id))?);
    if let Some(expires) = upload.expires_at {
        response_headers.insert(
            protocol::UPLOAD_EXPIRES,
            header_value(&protocol::format_expires(expires)?)?,
        );
    }
    Ok((StatusCode::CREATED, response_headers).into_response())
}

/// HEAD /api/v3/files/{file_id} - report the current offset.
#[tracing::instrument(skip(state), fields(file_id = %file_id))]
pub async fn get_offset(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> ApiResult<Response> {
    let id = UploadId::parse(&file_id).map_err(|_| ApiError::NotFound)?;
    let Some(upload) = state.metadata.find(&id).await? else {
        tracing::debug!(%file_id, "file not found");
        return Err(ApiError::NotFound);
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        protocol::UPLOAD_OFFSET,
        header_value(&upload.uploaded_size.to_string())?,
    );
    headers.insert(
        protocol::UPLOAD_LENGTH,
        header_value(&upload.total_size.to_string())?,
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if !upload.metadata.is_empty() {
        headers.insert(protocol::UPLOAD_METADATA, header_value(&upload.metadata)?);
    }
    if let Some(expires) = upload.expires_at {
        headers.insert(
            protocol::UPLOAD_EXPIRES,
            header_value(&protocol::format_expires(expires)?)?,
        );
    }

    if upload.is_expired_at(OffsetDateTime::now_utc()) {
        tracing::debug!(%file_id, "file expired");
        return Ok((
            StatusCode::GONE,
            headers,
            Json(ErrorBody {
                message: "file expired".to_string(),
            }),
        )
            .into_response());
    }

    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// PATCH /api/v3/files/{file_id} - append bytes at the agreed offset.
#[tracing::instrument(skip(state, req), fields(file_id = %file_id))]
pub async fn patch_upload(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    req: Request,
) -> ApiResult<Response> {
    let headers = req.headers();

    let raw_offset = headers
        .get(protocol::UPLOAD_OFFSET)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::BadRequest("invalid Upload-Offset header: not a number".to_string())
        })?;
    let offset: i64 = raw_offset.parse().map_err(|_| {
        tracing::debug!(raw_offset, "invalid Upload-Offset header");
        ApiError::BadRequest("invalid Upload-Offset header: not a number".to_string())
    })?;
    if offset < 0 {
        return Err(ApiError::BadRequest(
            "invalid Upload-Offset header: negative value".to_string(),
        ));
    }
    let offset = offset as u64;

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    if content_type != Some(protocol::PATCH_CONTENT_TYPE) {
        tracing::debug!(?content_type, "invalid Content-Type");
        return Err(ApiError::UnsupportedMediaType);
    }

    let checksum_enabled = state
        .config
        .protocol
        .extensions
        .enabled(Extension::Checksum);
    let expected_checksum = match headers.get(protocol::UPLOAD_CHECKSUM) {
        Some(value) if checksum_enabled => {
            let value = value
                .to_str()
                .map_err(|_| hoist_core::Error::InvalidChecksumFormat)?;
            let checksum = UploadChecksum::parse(value)?;
            if !state.config.protocol.supports_algorithm(checksum.algorithm) {
                return Err(hoist_core::Error::UnsupportedChecksumAlgorithm.into());
            }
            Some(checksum)
        }
        _ => None,
    };

    let id = UploadId::parse(&file_id).map_err(|_| ApiError::NotFound)?;

    // Exclusive per-id section: from the lookup through the final save, so a
    // concurrent PATCH cannot pass the offset check against a stale record.
    let _guard = state.locks.acquire(&id).await;

    let Some(mut upload) = state.metadata.find(&id).await? else {
        tracing::debug!(%file_id, "file not found");
        return Err(ApiError::NotFound);
    };

    let expiration_enabled = state
        .config
        .protocol
        .extensions
        .enabled(Extension::Expiration);
    if expiration_enabled && upload.is_expired_at(OffsetDateTime::now_utc()) {
        tracing::debug!(%file_id, "file expired");
        return Err(ApiError::Gone);
    }

    if offset != upload.uploaded_size {
        tracing::warn!(
            requested = offset,
            current = upload.uploaded_size,
            "upload-Offset header does not match the current offset"
        );
        return Err(ApiError::OffsetConflict);
    }

    let pre_length = upload.uploaded_size;
    let slot = expected_checksum
        .as_ref()
        .map(|checksum| hasher_slot(checksum.algorithm.hasher()));

    // Bound the body at the declared remainder so a committed offset can
    // never pass total_size.
    let cap = state
        .config
        .server
        .max_patch_body_bytes
        .min(upload.remaining());
    let mut body = request_body_stream(
        req.into_body(),
        cap,
        state.config.server.body_read_timeout(),
    );
    if let Some(slot) = &slot {
        body = tee_digest(body, slot.clone());
    }

    let written = match state.blobs.append(&upload.blob_path, pre_length, body).await {
        Ok(written) => written,
        Err(err) => {
            // The partial byte count is durable; commit it before answering
            // so the client's next HEAD sees the authoritative offset.
            upload.uploaded_size = pre_length + err.written;
            commit(&state, &upload).await?;
            tracing::warn!(
                upload_id = %upload.id,
                written = err.written,
                error = %err.source,
                "partial append committed"
            );
            if err.source.is_timeout() {
                return Err(ApiError::RequestTimeout(
                    "network timeout while reading the request body".to_string(),
                ));
            }
            return Err(ApiError::Internal("error writing the file".to_string()));
        }
    };

    if let Some(expected) = &expected_checksum {
        let digest = slot.as_ref().and_then(finalize_digest).ok_or_else(|| {
            ApiError::Internal("checksum hasher disappeared mid-request".to_string())
        })?;
        if !expected.matches(&digest) {
            state.blobs.truncate(&upload.blob_path, pre_length).await?;
            tracing::warn!(
                upload_id = %upload.id,
                algorithm = %expected.algorithm,
                "checksum mismatch, rolled back to pre-patch length"
            );
            return Err(ApiError::ChecksumMismatch);
        }
    }

    upload.uploaded_size = pre_length + written;
    commit(&state, &upload).await?;

    tracing::debug!(
        upload_id = %upload.id,
        written,
        offset = upload.uploaded_size,
        "bytes appended"
    );

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        protocol::UPLOAD_OFFSET,
        header_value(&upload.uploaded_size.to_string())?,
    );
    if let Some(expires) = upload.expires_at {
        response_headers.insert(
            protocol::UPLOAD_EXPIRES,
            header_value(&protocol::format_expires(expires)?)?,
        );
    }
    Ok((StatusCode::NO_CONTENT, response_headers).into_response())
}

/// Persist an updated record on a detached task.
///
/// A client abort drops the handler future; the offset must still reach the
/// store, so the save runs where the abort cannot cancel it.
async fn commit(state: &AppState, upload: &Upload) -> ApiResult<()> {
    let store = state.metadata.clone();
    let upload = upload.clone();
    tokio::spawn(async move { store.save(&upload).await })
        .await
        .map_err(|e| ApiError::Internal(format!("offset commit task failed: {e}")))??;
    Ok(())
}
