// SPDX-License-Identifier: GPL-3.0-only

//! Location capability provider backed by GeoClue2
//!
//! GeoClue authorizes clients by desktop ID through its agent, so the
//! permission request is a client start/stop round trip: a refusal surfaces
//! as `AccessDenied`.

use crate::backends::types::PermissionResponse;
use crate::errors::LocationError;
use futures::StreamExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use zbus::zvariant::OwnedObjectPath;

const GEOCLUE_DESTINATION: &str = "org.freedesktop.GeoClue2";
const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const MANAGER_INTERFACE: &str = "org.freedesktop.GeoClue2.Manager";
const CLIENT_INTERFACE: &str = "org.freedesktop.GeoClue2.Client";
const LOCATION_INTERFACE: &str = "org.freedesktop.GeoClue2.Location";

/// A resolved position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters
    pub accuracy: Option<f64>,
    /// Altitude in meters
    pub altitude: Option<f64>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            altitude: None,
        }
    }
}

/// Requested fix accuracy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationAccuracy {
    /// Roughly city level
    Lowest,
    /// Roughly neighborhood level
    Low,
    /// Roughly street level (default)
    #[default]
    Balanced,
    /// Best available
    High,
    /// Best available
    Highest,
}

impl LocationAccuracy {
    /// GeoClue `GClueAccuracyLevel` value
    pub fn geoclue_level(self) -> u32 {
        match self {
            LocationAccuracy::Lowest => 4,
            LocationAccuracy::Low => 5,
            LocationAccuracy::Balanced => 6,
            LocationAccuracy::High | LocationAccuracy::Highest => 8,
        }
    }
}

/// Options for a single position request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationOptions {
    pub accuracy: LocationAccuracy,
    /// `None` leaves the wait to the location service
    pub timeout: Option<Duration>,
}

/// Geolocation operations used by the capture screen
pub trait LocationProvider: Send + Sync {
    /// Ask for permission to read the location while the app is in use
    fn request_foreground_permission(
        &self,
    ) -> BoxFuture<'_, Result<PermissionResponse, LocationError>>;

    /// Resolve the current position
    fn current_position(
        &self,
        options: LocationOptions,
    ) -> BoxFuture<'_, Result<Position, LocationError>>;
}

/// GeoClue2 client on the system bus
#[derive(Debug, Clone)]
pub struct GeoClueLocation {
    desktop_id: String,
}

impl GeoClueLocation {
    pub fn new(desktop_id: impl Into<String>) -> Self {
        Self {
            desktop_id: desktop_id.into(),
        }
    }

    async fn client(
        &self,
        connection: &zbus::Connection,
        accuracy: LocationAccuracy,
    ) -> zbus::Result<zbus::Proxy<'static>> {
        let manager = zbus::Proxy::new(
            connection,
            GEOCLUE_DESTINATION,
            MANAGER_PATH,
            MANAGER_INTERFACE,
        )
        .await?;
        let client_path: OwnedObjectPath = manager.call("GetClient", &()).await?;
        debug!(client = %client_path, "GeoClue client");

        let client = zbus::Proxy::new(
            connection,
            GEOCLUE_DESTINATION,
            client_path.as_str().to_owned(),
            CLIENT_INTERFACE,
        )
        .await?;
        client
            .set_property("DesktopId", self.desktop_id.as_str())
            .await?;
        client
            .set_property("RequestedAccuracyLevel", accuracy.geoclue_level())
            .await?;
        Ok(client)
    }

    async fn probe_permission(&self) -> Result<PermissionResponse, LocationError> {
        let connection = zbus::Connection::system().await?;
        let client = self
            .client(&connection, LocationAccuracy::default())
            .await?;

        match call_unit(&client, "Start").await {
            Ok(()) => {
                if let Err(e) = call_unit(&client, "Stop").await {
                    debug!(error = %e, "Failed to stop GeoClue client");
                }
                info!("Location access granted");
                Ok(PermissionResponse::Granted)
            }
            Err(err) if is_access_denied(&err) => {
                info!("Location access denied");
                Ok(PermissionResponse::Denied)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn locate(&self, options: LocationOptions) -> Result<Position, LocationError> {
        let connection = zbus::Connection::system().await?;
        let client = self.client(&connection, options.accuracy).await?;
        let mut updates = client.receive_signal("LocationUpdated").await?;

        call_unit(&client, "Start").await.map_err(|err| {
            if is_access_denied(&err) {
                LocationError::PermissionDenied
            } else {
                err.into()
            }
        })?;

        let result = async {
            // A running client may already hold a fix
            let current: OwnedObjectPath = client.get_property("Location").await?;
            let location_path = if current.as_str() != "/" {
                current
            } else {
                let message = updates.next().await.ok_or_else(|| {
                    LocationError::Failed("GeoClue closed the update stream".to_string())
                })?;
                let (_old, new): (OwnedObjectPath, OwnedObjectPath) =
                    message.body().deserialize()?;
                new
            };
            read_position(&connection, location_path).await
        }
        .await;

        if let Err(e) = call_unit(&client, "Stop").await {
            warn!(error = %e, "Failed to stop GeoClue client");
        }
        result
    }
}

impl LocationProvider for GeoClueLocation {
    fn request_foreground_permission(
        &self,
    ) -> BoxFuture<'_, Result<PermissionResponse, LocationError>> {
        Box::pin(self.probe_permission())
    }

    fn current_position(
        &self,
        options: LocationOptions,
    ) -> BoxFuture<'_, Result<Position, LocationError>> {
        Box::pin(self.locate(options))
    }
}

async fn read_position(
    connection: &zbus::Connection,
    path: OwnedObjectPath,
) -> Result<Position, LocationError> {
    let location =
        zbus::Proxy::new(connection, GEOCLUE_DESTINATION, path.as_str(), LOCATION_INTERFACE)
            .await?;

    let latitude: f64 = location.get_property("Latitude").await?;
    let longitude: f64 = location.get_property("Longitude").await?;
    let accuracy: Option<f64> = location.get_property("Accuracy").await.ok();
    // GeoClue reports -1.7976931348623157e+308 when altitude is unknown
    let altitude: Option<f64> = location
        .get_property::<f64>("Altitude")
        .await
        .ok()
        .filter(|a| *a > f64::MIN);

    info!(latitude, longitude, ?accuracy, "Location resolved");
    Ok(Position {
        latitude,
        longitude,
        accuracy,
        altitude,
    })
}

/// Call a method that takes and returns nothing
async fn call_unit(proxy: &zbus::Proxy<'_>, method: &str) -> zbus::Result<()> {
    proxy.call_method(method, &()).await.map(|_| ())
}

fn is_access_denied(err: &zbus::Error) -> bool {
    match err {
        zbus::Error::MethodError(name, _, _) => {
            name.as_str() == "org.freedesktop.DBus.Error.AccessDenied"
        }
        zbus::Error::FDO(fdo) => matches!(**fdo, zbus::fdo::Error::AccessDenied(_)),
        _ => false,
    }
}

impl From<zbus::fdo::Error> for LocationError {
    fn from(err: zbus::fdo::Error) -> Self {
        match err {
            zbus::fdo::Error::AccessDenied(_) => LocationError::PermissionDenied,
            other => LocationError::Failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_levels_are_monotonic() {
        let levels = [
            LocationAccuracy::Lowest,
            LocationAccuracy::Low,
            LocationAccuracy::Balanced,
            LocationAccuracy::High,
            LocationAccuracy::Highest,
        ]
        .map(LocationAccuracy::geoclue_level);
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(LocationAccuracy::default().geoclue_level(), 6);
    }

    #[test]
    fn test_default_options_have_no_timeout() {
        assert_eq!(LocationOptions::default().timeout, None);
    }

    #[test]
    fn test_access_denied_detection() {
        let err = zbus::Error::FDO(Box::new(zbus::fdo::Error::AccessDenied(
            "agent refused".into(),
        )));
        assert!(is_access_denied(&err));
        assert!(!is_access_denied(&zbus::Error::Failure("x".into())));
    }
}
