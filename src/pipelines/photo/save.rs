// SPDX-License-Identifier: GPL-3.0-only

//! Filing a captured image into the photo library
//!
//! The image becomes a library asset, then lands in the named album: the
//! album is created around the asset when it does not exist yet, otherwise
//! the asset is added to it. The metadata record is logged only once all of
//! this succeeded.

use super::metadata::CaptureMetadataRecord;
use crate::backends::camera::ImageRef;
use crate::backends::media_library::{AlbumHandle, AssetHandle, MediaLibrary};
use crate::errors::AppError;
use tracing::{error, info};

/// Everything needed to save one capture
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub image: ImageRef,
    pub record: CaptureMetadataRecord,
}

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReceipt {
    /// The asset as stored in the album
    pub asset: AssetHandle,
    pub album: AlbumHandle,
    /// Whether the album was created by this save
    pub created_album: bool,
    pub record: CaptureMetadataRecord,
}

/// Save `request.image` into the album `album_name`
pub async fn store(
    library: &dyn MediaLibrary,
    request: SaveRequest,
    album_name: &str,
) -> Result<SaveReceipt, AppError> {
    let asset = library.create_asset(&request.image).await?;

    let (album, asset, created_album) = match library.get_album(album_name).await? {
        Some(album) => {
            let placed = library
                .add_assets_to_album(std::slice::from_ref(&asset), &album.id, false)
                .await?;
            let asset = placed.into_iter().next().unwrap_or(asset);
            (album, asset, false)
        }
        None => {
            let (album, asset) = library.create_album(album_name, &asset, false).await?;
            (album, asset, true)
        }
    };

    match request.record.to_json() {
        Ok(json) => info!(metadata = %json, album = %album.title, "Image saved with metadata"),
        Err(e) => error!(error = %e, record = ?request.record, "Failed to serialize metadata"),
    }

    Ok(SaveReceipt {
        asset,
        album,
        created_album,
        record: request.record,
    })
}
