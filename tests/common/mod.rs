// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles for the capability providers

#![allow(dead_code)]

use chrono::Utc;
use futures::future::BoxFuture;
use geocam::app::{CaptureStep, ScreenState};
use geocam::backends::Providers;
use geocam::backends::camera::{CameraProvider, ImageRef, PreviewFrame};
use geocam::Config;
use geocam::backends::location::{LocationOptions, LocationProvider, Position};
use geocam::backends::media_library::{AlbumHandle, AssetHandle, MediaLibrary};
use geocam::backends::types::PermissionResponse;
use geocam::errors::{AppError, CameraError, LibraryError, LocationError};
use geocam::pipelines::photo;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub fn test_frame() -> Arc<PreviewFrame> {
    Arc::new(PreviewFrame {
        width: 2,
        height: 2,
        data: Arc::from(vec![128u8; 16]),
        captured_at: Instant::now(),
    })
}

pub struct MockCamera {
    pub permission: Result<PermissionResponse, CameraError>,
    /// Results handed out by successive captures; the last one repeats
    pub captures: Mutex<Vec<Result<ImageRef, CameraError>>>,
    pub capture_calls: AtomicUsize,
    pub discarded: Mutex<Vec<ImageRef>>,
}

impl MockCamera {
    pub fn granted(image: &str) -> Self {
        Self {
            permission: Ok(PermissionResponse::Granted),
            captures: Mutex::new(vec![Ok(ImageRef::new(image))]),
            capture_calls: AtomicUsize::new(0),
            discarded: Mutex::new(Vec::new()),
        }
    }

    pub fn then_capture(self, result: Result<ImageRef, CameraError>) -> Self {
        self.captures.lock().unwrap().push(result);
        self
    }

    pub fn capture_calls(&self) -> usize {
        self.capture_calls.load(Ordering::SeqCst)
    }

    pub fn discarded(&self) -> Vec<ImageRef> {
        self.discarded.lock().unwrap().clone()
    }
}

impl CameraProvider for MockCamera {
    fn request_permission(&self) -> BoxFuture<'_, Result<PermissionResponse, CameraError>> {
        let result = self.permission.clone();
        Box::pin(async move { result })
    }

    fn capture_still(
        &self,
        _frame: Arc<PreviewFrame>,
    ) -> BoxFuture<'_, Result<ImageRef, CameraError>> {
        let call = self.capture_calls.fetch_add(1, Ordering::SeqCst);
        let captures = self.captures.lock().unwrap();
        let result = captures[call.min(captures.len() - 1)].clone();
        Box::pin(async move { result })
    }

    fn discard_still<'a>(&'a self, image: &'a ImageRef) -> BoxFuture<'a, Result<(), CameraError>> {
        self.discarded.lock().unwrap().push(image.clone());
        Box::pin(async { Ok(()) })
    }
}

pub struct MockLocation {
    pub permission: Result<PermissionResponse, LocationError>,
    pub position: Result<Position, LocationError>,
    /// Never answer position requests
    pub stalled: bool,
    pub position_calls: AtomicUsize,
}

impl MockLocation {
    pub fn granted(latitude: f64, longitude: f64) -> Self {
        Self {
            permission: Ok(PermissionResponse::Granted),
            position: Ok(Position::new(latitude, longitude)),
            stalled: false,
            position_calls: AtomicUsize::new(0),
        }
    }

    /// Granted, but no fix ever arrives
    pub fn stalled() -> Self {
        Self {
            stalled: true,
            ..Self::granted(0.0, 0.0)
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Ok(PermissionResponse::Denied),
            position: Err(LocationError::PermissionDenied),
            stalled: false,
            position_calls: AtomicUsize::new(0),
        }
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.load(Ordering::SeqCst)
    }
}

impl LocationProvider for MockLocation {
    fn request_foreground_permission(
        &self,
    ) -> BoxFuture<'_, Result<PermissionResponse, LocationError>> {
        let result = self.permission.clone();
        Box::pin(async move { result })
    }

    fn current_position(
        &self,
        _options: LocationOptions,
    ) -> BoxFuture<'_, Result<Position, LocationError>> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        if self.stalled {
            return Box::pin(futures::future::pending());
        }
        let result = self.position.clone();
        Box::pin(async move { result })
    }
}

/// In-memory library that counts every call
#[derive(Default)]
pub struct MockLibrary {
    pub albums: Mutex<Vec<String>>,
    pub fail_create_asset: bool,
    pub fail_get_album: bool,
    pub fail_create_album: bool,
    pub fail_add_assets: bool,
    pub create_asset_calls: AtomicUsize,
    pub get_album_calls: AtomicUsize,
    pub create_album_calls: AtomicUsize,
    pub add_assets_calls: AtomicUsize,
}

impl MockLibrary {
    pub fn with_album(name: &str) -> Self {
        Self {
            albums: Mutex::new(vec![name.to_string()]),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_create_asset: true,
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.create_asset_calls.load(Ordering::SeqCst)
            + self.get_album_calls.load(Ordering::SeqCst)
            + self.create_album_calls.load(Ordering::SeqCst)
            + self.add_assets_calls.load(Ordering::SeqCst)
    }
}

fn album(name: &str) -> AlbumHandle {
    AlbumHandle {
        id: name.to_string(),
        title: name.to_string(),
        path: PathBuf::from("/library").join(name),
    }
}

fn placed(asset: &AssetHandle, album: &AlbumHandle) -> AssetHandle {
    AssetHandle {
        id: asset.id.clone(),
        path: album.path.join(&asset.id),
    }
}

impl MediaLibrary for MockLibrary {
    fn create_asset<'a>(
        &'a self,
        image: &'a ImageRef,
    ) -> BoxFuture<'a, Result<AssetHandle, LibraryError>> {
        self.create_asset_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_create_asset {
            Err(LibraryError::AssetCreationFailed("disk full".into()))
        } else {
            let id = image
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(AssetHandle {
                path: PathBuf::from("/library").join(&id),
                id,
            })
        };
        Box::pin(async move { result })
    }

    fn get_album<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<AlbumHandle>, LibraryError>> {
        self.get_album_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_album {
            return Box::pin(async { Err(LibraryError::Io("library unavailable".into())) });
        }
        let found = self.albums.lock().unwrap().iter().any(|a| a == name);
        Box::pin(async move { Ok(found.then(|| album(name))) })
    }

    fn create_album<'a>(
        &'a self,
        name: &'a str,
        seed: &'a AssetHandle,
        _copy: bool,
    ) -> BoxFuture<'a, Result<(AlbumHandle, AssetHandle), LibraryError>> {
        self.create_album_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_album {
            return Box::pin(async { Err(LibraryError::Io("read-only library".into())) });
        }
        self.albums.lock().unwrap().push(name.to_string());
        let album = album(name);
        let stored = placed(seed, &album);
        Box::pin(async move { Ok((album, stored)) })
    }

    fn add_assets_to_album<'a>(
        &'a self,
        assets: &'a [AssetHandle],
        album_id: &'a str,
        _copy: bool,
    ) -> BoxFuture<'a, Result<Vec<AssetHandle>, LibraryError>> {
        self.add_assets_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_add_assets {
            let err = LibraryError::AlbumNotFound(album_id.to_string());
            return Box::pin(async move { Err(err) });
        }
        let album = album(album_id);
        let stored = assets.iter().map(|asset| placed(asset, &album)).collect();
        Box::pin(async move { Ok(stored) })
    }
}

pub struct Harness {
    pub camera: Arc<MockCamera>,
    pub location: Arc<MockLocation>,
    pub library: Arc<MockLibrary>,
}

impl Harness {
    pub fn new(camera: MockCamera, location: MockLocation, library: MockLibrary) -> Self {
        Self {
            camera: Arc::new(camera),
            location: Arc::new(location),
            library: Arc::new(library),
        }
    }

    pub fn providers(&self) -> Providers {
        Providers {
            camera: self.camera.clone(),
            location: self.location.clone(),
            library: self.library.clone(),
        }
    }

    /// Run both permission requests the way the screen does on mount
    pub async fn mount(&self, screen: &mut ScreenState) {
        screen.set_camera_permission(photo::request_camera_permission(self.camera.as_ref()).await);
        screen.set_location_permission(
            photo::request_location_permission(self.location.as_ref()).await,
        );
    }

    /// Press capture and run every follow-up step, like the capture handlers do
    ///
    /// Location options come from the default configuration. Returns `None`
    /// when the press was a no-op.
    pub async fn capture(&self, screen: &mut ScreenState) -> Option<Result<(), AppError>> {
        let frame = screen.begin_capture()?;
        let previous = screen.image().cloned();
        let result = photo::take_still(self.camera.as_ref(), frame).await;
        let step = screen.still_captured(result, Utc::now());
        if let Some(previous) = previous.filter(|p| screen.image() != Some(p)) {
            photo::discard_still(self.camera.as_ref(), previous).await;
        }
        let outcome = match step {
            CaptureStep::Locate => {
                let options = Config::default().location_options();
                let result = photo::locate(self.location.as_ref(), options).await;
                screen.located(result)
            }
            CaptureStep::Done => Ok(()),
            CaptureStep::Failed(e) => Err(e),
        };
        Some(outcome)
    }
}
