// SPDX-License-Identifier: GPL-3.0-only

//! Camera access through xdg-desktop-portal
//!
//! `AccessCamera` answers asynchronously on a `Request` object; the response
//! signal is subscribed to before the call so it cannot be missed.

use crate::backends::types::PermissionResponse;
use crate::errors::CameraError;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Ask the portal for camera access
///
/// When no portal implements the Camera interface, unsandboxed processes are
/// granted (they open devices directly) and sandboxed ones are denied.
pub async fn request_camera_access() -> Result<PermissionResponse, CameraError> {
    let connection = zbus::Connection::session().await?;

    match access_camera(&connection).await {
        Ok(response) => Ok(response),
        Err(err) if is_portal_missing(&err) => {
            let response = if is_sandboxed() {
                PermissionResponse::Denied
            } else {
                PermissionResponse::Granted
            };
            warn!(error = %err, ?response, "Camera portal not available");
            Ok(response)
        }
        Err(err) => Err(err.into()),
    }
}

async fn access_camera(connection: &zbus::Connection) -> zbus::Result<PermissionResponse> {
    let camera = zbus::Proxy::new(connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE)
        .await?;

    match camera.get_property::<bool>("IsCameraPresent").await {
        Ok(present) => debug!(present, "Portal camera presence"),
        Err(err) => debug!(error = %err, "Could not read IsCameraPresent"),
    }

    let token = format!("geocam_{}", uuid::Uuid::new_v4().simple());
    let request_path = request_object_path(connection, &token)?;

    let request = zbus::Proxy::new(
        connection,
        PORTAL_DESTINATION,
        request_path.as_str(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    if handle.as_str() != request_path {
        // Old portals ignore handle_token; the returned handle is authoritative
        debug!(expected = %request_path, actual = %handle, "Portal returned a different request handle");
        let request = zbus::Proxy::new(
            connection,
            PORTAL_DESTINATION,
            handle.as_str(),
            REQUEST_INTERFACE,
        )
        .await?;
        responses = request.receive_signal("Response").await?;
    }

    let Some(message) = responses.next().await else {
        return Err(zbus::Error::Failure(
            "portal closed the request without answering".to_string(),
        ));
    };
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;
    info!(code, "Camera portal responded");

    Ok(response_from_code(code))
}

/// `/org/freedesktop/portal/desktop/request/SENDER/TOKEN`, with the unique
/// bus name stripped of its leading `:` and dots replaced by underscores
fn request_object_path(connection: &zbus::Connection, token: &str) -> zbus::Result<String> {
    let unique_name = connection
        .unique_name()
        .ok_or_else(|| zbus::Error::Failure("connection has no unique name".to_string()))?;
    Ok(format!(
        "{}/request/{}/{}",
        PORTAL_PATH,
        sender_component(unique_name.as_str()),
        token
    ))
}

fn sender_component(unique_name: &str) -> String {
    unique_name.trim_start_matches(':').replace('.', "_")
}

/// Portal response codes: 0 success, 1 cancelled by the user, 2 other
fn response_from_code(code: u32) -> PermissionResponse {
    if code == 0 {
        PermissionResponse::Granted
    } else {
        PermissionResponse::Denied
    }
}

fn is_portal_missing(err: &zbus::Error) -> bool {
    match err {
        zbus::Error::MethodError(name, _, _) => matches!(
            name.as_str(),
            "org.freedesktop.DBus.Error.ServiceUnknown"
                | "org.freedesktop.DBus.Error.UnknownInterface"
                | "org.freedesktop.DBus.Error.UnknownMethod"
                | "org.freedesktop.DBus.Error.UnknownObject"
        ),
        zbus::Error::FDO(fdo) => matches!(
            **fdo,
            zbus::fdo::Error::ServiceUnknown(_)
                | zbus::fdo::Error::UnknownInterface(_)
                | zbus::fdo::Error::UnknownMethod(_)
                | zbus::fdo::Error::UnknownObject(_)
        ),
        _ => false,
    }
}

fn is_sandboxed() -> bool {
    std::path::Path::new("/.flatpak-info").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_component() {
        assert_eq!(sender_component(":1.42"), "1_42");
        assert_eq!(sender_component(":1.1337.2"), "1_1337_2");
    }

    #[test]
    fn test_response_codes() {
        assert_eq!(response_from_code(0), PermissionResponse::Granted);
        assert_eq!(response_from_code(1), PermissionResponse::Denied);
        assert_eq!(response_from_code(2), PermissionResponse::Denied);
    }
}
