// SPDX-License-Identifier: GPL-3.0-only

//! Photo library provider
//!
//! The filesystem library keeps assets as image files under a root
//! directory (the XDG pictures directory by default). Albums are direct
//! sub-directories named after the album; adding an asset to an album moves
//! it there unless a copy is requested.

use crate::backends::camera::ImageRef;
use crate::errors::LibraryError;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An image stored in the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle {
    /// File name of the asset, unique within its directory
    pub id: String,
    pub path: PathBuf,
}

/// A named album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumHandle {
    pub id: String,
    pub title: String,
    pub path: PathBuf,
}

/// Photo library operations used by the save flow
pub trait MediaLibrary: Send + Sync {
    /// Import the image file as a new library asset
    fn create_asset<'a>(
        &'a self,
        image: &'a ImageRef,
    ) -> BoxFuture<'a, Result<AssetHandle, LibraryError>>;

    /// Look up an album by name
    fn get_album<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<AlbumHandle>, LibraryError>>;

    /// Create an album holding `seed`, returning the album and the seed as
    /// stored in it
    fn create_album<'a>(
        &'a self,
        name: &'a str,
        seed: &'a AssetHandle,
        copy: bool,
    ) -> BoxFuture<'a, Result<(AlbumHandle, AssetHandle), LibraryError>>;

    /// Put `assets` into the album with id `album_id`
    ///
    /// Returns the handles of the assets as stored in the album, in order.
    fn add_assets_to_album<'a>(
        &'a self,
        assets: &'a [AssetHandle],
        album_id: &'a str,
        copy: bool,
    ) -> BoxFuture<'a, Result<Vec<AssetHandle>, LibraryError>>;
}

/// Directory-backed photo library
#[derive(Debug, Clone)]
pub struct FsMediaLibrary {
    root: PathBuf,
}

impl FsMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library rooted at the user's pictures directory (`~/Pictures`)
    pub fn default_root() -> PathBuf {
        dirs::picture_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Pictures")
        })
    }

    fn album_dir(&self, name: &str) -> Result<PathBuf, LibraryError> {
        validate_album_name(name)?;
        Ok(self.root.join(name))
    }

    async fn import(&self, image: &ImageRef) -> Result<AssetHandle, LibraryError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let extension = image
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let stem = format!("IMG_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        let dest = unique_path(&self.root, &stem, &extension).await;

        tokio::fs::copy(image.path(), &dest).await.map_err(|e| {
            LibraryError::AssetCreationFailed(format!("{}: {}", image.path().display(), e))
        })?;

        info!(path = %dest.display(), "Asset created");
        asset_at(dest)
    }

    async fn lookup_album(&self, name: &str) -> Result<Option<AlbumHandle>, LibraryError> {
        let dir = self.album_dir(name)?;
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(Some(album_at(name, dir))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn make_album(
        &self,
        name: &str,
        seed: &AssetHandle,
        copy: bool,
    ) -> Result<(AlbumHandle, AssetHandle), LibraryError> {
        let dir = self.album_dir(name)?;
        tokio::fs::create_dir_all(&dir).await?;
        let placed = place(seed, &dir, copy).await?;

        info!(album = %name, path = %dir.display(), "Album created");
        Ok((album_at(name, dir), placed))
    }

    async fn add_to_album(
        &self,
        assets: &[AssetHandle],
        album_id: &str,
        copy: bool,
    ) -> Result<Vec<AssetHandle>, LibraryError> {
        let dir = self.album_dir(album_id)?;
        if !tokio::fs::metadata(&dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(LibraryError::AlbumNotFound(album_id.to_string()));
        }

        let mut placed = Vec::with_capacity(assets.len());
        for asset in assets {
            placed.push(place(asset, &dir, copy).await?);
        }
        info!(album = %album_id, count = placed.len(), "Assets added to album");
        Ok(placed)
    }
}

impl MediaLibrary for FsMediaLibrary {
    fn create_asset<'a>(
        &'a self,
        image: &'a ImageRef,
    ) -> BoxFuture<'a, Result<AssetHandle, LibraryError>> {
        Box::pin(self.import(image))
    }

    fn get_album<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<AlbumHandle>, LibraryError>> {
        Box::pin(self.lookup_album(name))
    }

    fn create_album<'a>(
        &'a self,
        name: &'a str,
        seed: &'a AssetHandle,
        copy: bool,
    ) -> BoxFuture<'a, Result<(AlbumHandle, AssetHandle), LibraryError>> {
        Box::pin(self.make_album(name, seed, copy))
    }

    fn add_assets_to_album<'a>(
        &'a self,
        assets: &'a [AssetHandle],
        album_id: &'a str,
        copy: bool,
    ) -> BoxFuture<'a, Result<Vec<AssetHandle>, LibraryError>> {
        Box::pin(self.add_to_album(assets, album_id, copy))
    }
}

/// Album names become a single directory component
fn validate_album_name(name: &str) -> Result<(), LibraryError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(LibraryError::InvalidAlbumName(name.to_string()));
    }
    Ok(())
}

fn asset_at(path: PathBuf) -> Result<AssetHandle, LibraryError> {
    let id = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LibraryError::Io(format!("non UTF-8 asset path {}", path.display())))?
        .to_string();
    Ok(AssetHandle { id, path })
}

fn album_at(name: &str, path: PathBuf) -> AlbumHandle {
    AlbumHandle {
        id: name.to_string(),
        title: name.to_string(),
        path,
    }
}

/// Move (or copy) an asset into `dir`, keeping its file name when free
async fn place(asset: &AssetHandle, dir: &Path, copy: bool) -> Result<AssetHandle, LibraryError> {
    let name = Path::new(&asset.id);
    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or("IMG");
    let extension = name.extension().and_then(|e| e.to_str()).unwrap_or("jpg");
    let dest = unique_path(dir, stem, extension).await;

    if copy {
        tokio::fs::copy(&asset.path, &dest).await?;
    } else if let Err(e) = tokio::fs::rename(&asset.path, &dest).await {
        // rename fails across filesystems; fall back to copy + remove
        debug!(error = %e, "Rename failed, copying asset instead");
        tokio::fs::copy(&asset.path, &dest).await?;
        tokio::fs::remove_file(&asset.path).await?;
    }

    debug!(from = %asset.path.display(), to = %dest.display(), copy, "Asset placed");
    asset_at(dest)
}

/// `dir/stem.ext`, or `dir/stem_N.ext` with the first free N
async fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, extension));
    if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
        return candidate;
    }
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}.{}", stem, n, extension));
        if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn captured_file(dir: &Path) -> ImageRef {
        let path = dir.join("capture-test.jpg");
        tokio::fs::write(&path, b"not really a jpeg").await.unwrap();
        ImageRef::new(path)
    }

    #[tokio::test]
    async fn test_create_asset_copies_into_root() {
        let cache = tempfile::tempdir().unwrap();
        let pictures = tempfile::tempdir().unwrap();
        let library = FsMediaLibrary::new(pictures.path());
        let image = captured_file(cache.path()).await;

        let asset = library.create_asset(&image).await.unwrap();
        assert!(asset.path.starts_with(pictures.path()));
        assert!(asset.id.starts_with("IMG_"));
        assert!(asset.id.ends_with(".jpg"));
        // source is left in place
        assert!(image.path().exists());
    }

    #[tokio::test]
    async fn test_create_asset_missing_source_fails() {
        let pictures = tempfile::tempdir().unwrap();
        let library = FsMediaLibrary::new(pictures.path());
        let image = ImageRef::new(pictures.path().join("nope.jpg"));

        let result = library.create_asset(&image).await;
        assert!(matches!(result, Err(LibraryError::AssetCreationFailed(_))));
    }

    #[tokio::test]
    async fn test_album_lifecycle() {
        let cache = tempfile::tempdir().unwrap();
        let pictures = tempfile::tempdir().unwrap();
        let library = FsMediaLibrary::new(pictures.path());

        assert_eq!(library.get_album("Camera").await.unwrap(), None);

        let first = library
            .create_asset(&captured_file(cache.path()).await)
            .await
            .unwrap();
        let (album, stored) = library.create_album("Camera", &first, false).await.unwrap();
        assert_eq!(album.title, "Camera");
        assert!(!first.path.exists(), "seed asset is moved, not copied");
        assert_eq!(stored.path, album.path.join(&first.id));
        assert!(stored.path.exists());

        let found = library.get_album("Camera").await.unwrap();
        assert_eq!(found, Some(album.clone()));

        let second = library
            .create_asset(&captured_file(cache.path()).await)
            .await
            .unwrap();
        let added = library
            .add_assets_to_album(std::slice::from_ref(&second), &album.id, true)
            .await
            .unwrap();
        assert!(second.path.exists(), "copy keeps the original");
        assert_eq!(added.len(), 1);
        assert!(added[0].path.starts_with(&album.path));
        assert!(added[0].path.exists());

        let entries = std::fs::read_dir(&album.path).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[tokio::test]
    async fn test_add_to_missing_album_fails() {
        let pictures = tempfile::tempdir().unwrap();
        let library = FsMediaLibrary::new(pictures.path());
        let asset = AssetHandle {
            id: "IMG_1.jpg".into(),
            path: pictures.path().join("IMG_1.jpg"),
        };

        let result = library
            .add_assets_to_album(std::slice::from_ref(&asset), "Camera", false)
            .await;
        assert_eq!(result, Err(LibraryError::AlbumNotFound("Camera".into())));
    }

    #[test]
    fn test_album_name_validation() {
        assert!(validate_album_name("Camera").is_ok());
        assert!(validate_album_name("Road trip").is_ok());
        for bad in ["", " ", "..", ".", "a/b", " Camera"] {
            assert!(validate_album_name(bad).is_err(), "{:?} accepted", bad);
        }
    }
}
