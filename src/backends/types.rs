// SPDX-License-Identifier: GPL-3.0-only

//! Types shared by all capability providers

/// Answer of a single permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
}

/// Permission as tracked by the UI
///
/// `Unknown` is the state before the request has resolved and is rendered
/// differently from an explicit denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }

    pub fn is_resolved(self) -> bool {
        self != PermissionState::Unknown
    }
}

impl From<PermissionResponse> for PermissionState {
    fn from(response: PermissionResponse) -> Self {
        match response {
            PermissionResponse::Granted => PermissionState::Granted,
            PermissionResponse::Denied => PermissionState::Denied,
        }
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionState::Unknown => write!(f, "unknown"),
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_state_from_response() {
        assert_eq!(
            PermissionState::from(PermissionResponse::Granted),
            PermissionState::Granted
        );
        assert_eq!(
            PermissionState::from(PermissionResponse::Denied),
            PermissionState::Denied
        );
        assert!(!PermissionState::default().is_resolved());
    }
}
