use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
}

impl PermissionState {
    #[must_use]
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::Authorized | Self::Provisional)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum PushOperation {
    RequestPermission,
    GetToken,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PushError {
    #[error("push notifications not available on this platform")]
    NotAvailable,

    #[error("permission denied by user")]
    PermissionDenied,

    #[error("no device token issued")]
    NoToken,

    #[error("registration failed: {reason}")]
    RegistrationFailed { reason: String },

    #[error("unknown error: {message}")]
    Unknown { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum PushOutput {
    PermissionStatus(PermissionState),
    Token(Option<String>),
    Failed(PushError),
}

impl PushOutput {
    pub fn into_permission(self) -> PushResult<PermissionState> {
        match self {
            Self::PermissionStatus(state) => Ok(state),
            Self::Failed(e) => Err(e),
            Self::Token(_) => Err(PushError::Unknown {
                message: "expected permission status".into(),
            }),
        }
    }

    pub fn into_token(self) -> PushResult<String> {
        match self {
            Self::Token(Some(token)) if !token.is_empty() => Ok(token),
            Self::Token(_) => Err(PushError::NoToken),
            Self::Failed(e) => Err(e),
            Self::PermissionStatus(_) => Err(PushError::Unknown {
                message: "expected device token".into(),
            }),
        }
    }
}

impl Operation for PushOperation {
    type Output = PushOutput;
}

pub type PushResult<T> = Result<T, PushError>;

pub struct Push<Ev> {
    context: CapabilityContext<PushOperation, Ev>,
}

impl<Ev> Clone for Push<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Push<Ev> {
    type Operation = PushOperation;
    type MappedSelf<MappedEv> = Push<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Push::new(self.context.map_event(f))
    }
}

impl<Ev> Push<Ev> {
    pub fn new(context: CapabilityContext<PushOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Push<Ev>
where
    Ev: 'static,
{
    pub fn request_permission<F>(&self, make_event: F)
    where
        F: FnOnce(PushResult<PermissionState>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(PushOperation::RequestPermission).await;
            ctx.update_app(make_event(output.into_permission()));
        });
    }

    pub fn get_token<F>(&self, make_event: F)
    where
        F: FnOnce(PushResult<String>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(PushOperation::GetToken).await;
            ctx.update_app(make_event(output.into_token()));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_state_checks() {
        assert!(PermissionState::Authorized.is_authorized());
        assert!(PermissionState::Provisional.is_authorized());
        assert!(!PermissionState::Denied.is_authorized());
        assert!(!PermissionState::NotDetermined.is_authorized());
    }

    #[test]
    fn test_token_extraction() {
        assert_eq!(
            PushOutput::Token(Some("ExponentPushToken[abc]".into())).into_token(),
            Ok("ExponentPushToken[abc]".to_string())
        );
        assert_eq!(PushOutput::Token(None).into_token(), Err(PushError::NoToken));
        assert_eq!(PushOutput::Token(Some(String::new())).into_token(), Err(PushError::NoToken));
        assert_eq!(
            PushOutput::Failed(PushError::NotAvailable).into_token(),
            Err(PushError::NotAvailable)
        );
    }

    #[test]
    fn test_permission_extraction() {
        assert_eq!(
            PushOutput::PermissionStatus(PermissionState::Denied).into_permission(),
            Ok(PermissionState::Denied)
        );
        assert!(PushOutput::Token(None).into_permission().is_err());
    }

    #[test]
    fn test_push_output_serialization() {
        let output = PushOutput::PermissionStatus(PermissionState::Authorized);
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"type":"PermissionStatus","data":"Authorized"}"#);
        let back: PushOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }
}
