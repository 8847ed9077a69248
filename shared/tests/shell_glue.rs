use assert_matches::assert_matches;
use crux_core::testing::AppTester;

use shared::attachments::{AttachmentKind, AttachmentState};
use shared::capabilities::{
    BackendError, BackendOperation, FileCacheOperation, PermissionState, PushError,
};
use shared::model::{PushRegistrationState, UserId};
use shared::{App, Effect, Event, Model};

const PDF_URL: &str = "https://storage.example.com/reports/42/summary.pdf";

fn signed_in(app: &AppTester<App, Effect>) -> Model {
    let mut model = Model::default();
    app.update(
        Event::SessionStarted {
            user_id: UserId::new("u-1"),
        },
        &mut model,
    );
    model
}

fn file_ops(effects: &[Effect]) -> Vec<FileCacheOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::FileCache(req) => Some(req.operation.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn cached_attachment_is_ready_without_download() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::AttachmentRequested {
            url: PDF_URL.into(),
        },
        &mut model,
    );
    let ops = file_ops(&update.effects);
    let path = match ops.as_slice() {
        [FileCacheOperation::Exists { path }] => path.clone(),
        other => panic!("expected one existence check, got {other:?}"),
    };
    assert!(path.starts_with("attachments/pdf/"));
    assert_eq!(model.attachments.get(PDF_URL), Some(&AttachmentState::Checking));

    let update = app.update(
        Event::AttachmentChecked {
            url: PDF_URL.into(),
            path: path.clone(),
            kind: AttachmentKind::Pdf,
            exists: true,
        },
        &mut model,
    );
    assert!(file_ops(&update.effects).is_empty());
    assert_eq!(
        model.attachments.get(PDF_URL),
        Some(&AttachmentState::Ready {
            path,
            kind: AttachmentKind::Pdf
        })
    );
}

#[test]
fn cache_miss_downloads_then_reports_outcome() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(
        Event::AttachmentRequested {
            url: PDF_URL.into(),
        },
        &mut model,
    );

    let update = app.update(
        Event::AttachmentChecked {
            url: PDF_URL.into(),
            path: "attachments/pdf/abc.pdf".into(),
            kind: AttachmentKind::Pdf,
            exists: false,
        },
        &mut model,
    );
    assert_eq!(
        file_ops(&update.effects),
        vec![FileCacheOperation::Download {
            url: PDF_URL.into(),
            path: "attachments/pdf/abc.pdf".into(),
        }]
    );
    assert!(model.attachments.is_pending(PDF_URL));

    // A second request while downloading is ignored.
    let update = app.update(
        Event::AttachmentRequested {
            url: PDF_URL.into(),
        },
        &mut model,
    );
    assert!(update.effects.is_empty());

    app.update(
        Event::AttachmentDownloaded {
            url: PDF_URL.into(),
            path: "attachments/pdf/abc.pdf".into(),
            kind: AttachmentKind::Pdf,
            result: Err("HTTP 404".into()),
        },
        &mut model,
    );
    assert_matches!(
        model.attachments.get(PDF_URL),
        Some(AttachmentState::Failed { reason }) if reason == "HTTP 404"
    );
}

#[test]
fn unsupported_attachment_fails_immediately() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let url = "https://storage.example.com/photo.jpg";

    let update = app.update(Event::AttachmentRequested { url: url.into() }, &mut model);
    assert!(file_ops(&update.effects).is_empty());
    assert_matches!(model.attachments.get(url), Some(AttachmentState::Failed { .. }));
    assert_eq!(app.view(&model).attachments.len(), 1);
}

#[test]
fn push_registration_happy_path() {
    let app = AppTester::<App, Effect>::default();
    let mut model = signed_in(&app);

    let update = app.update(Event::PushRegistrationRequested, &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Push(_))));
    assert_eq!(model.push_registration, PushRegistrationState::RequestingPermission);

    let update = app.update(
        Event::PushPermissionResolved {
            result: Ok(PermissionState::Authorized),
        },
        &mut model,
    );
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Push(_))));

    let update = app.update(
        Event::PushTokenReceived {
            result: Ok("ExponentPushToken[xyz]".into()),
        },
        &mut model,
    );
    assert!(update.effects.iter().any(|e| matches!(
        e,
        Effect::Backend(req) if req.operation == BackendOperation::RegisterPushToken {
            user_id: UserId::new("u-1"),
            token: "ExponentPushToken[xyz]".into(),
        }
    )));

    app.update(Event::PushTokenRegistered { result: Ok(()) }, &mut model);
    assert_eq!(app.view(&model).push_registration, PushRegistrationState::Registered);
}

#[test]
fn push_denial_and_failures_are_not_fatal() {
    let app = AppTester::<App, Effect>::default();
    let mut model = signed_in(&app);

    app.update(Event::PushRegistrationRequested, &mut model);
    let update = app.update(
        Event::PushPermissionResolved {
            result: Ok(PermissionState::Denied),
        },
        &mut model,
    );
    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Push(_))));
    assert_eq!(model.push_registration, PushRegistrationState::Denied);

    app.update(Event::PushRegistrationRequested, &mut model);
    app.update(
        Event::PushPermissionResolved {
            result: Ok(PermissionState::Authorized),
        },
        &mut model,
    );
    app.update(
        Event::PushTokenReceived {
            result: Err(PushError::NoToken),
        },
        &mut model,
    );
    assert_eq!(model.push_registration, PushRegistrationState::Failed);

    app.update(Event::PushRegistrationRequested, &mut model);
    app.update(
        Event::PushPermissionResolved {
            result: Ok(PermissionState::Authorized),
        },
        &mut model,
    );
    app.update(
        Event::PushTokenReceived {
            result: Ok("tok".into()),
        },
        &mut model,
    );
    app.update(
        Event::PushTokenRegistered {
            result: Err(BackendError::Unauthorized),
        },
        &mut model,
    );
    assert_eq!(model.push_registration, PushRegistrationState::Failed);
}

#[test]
fn push_registration_needs_a_session() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::PushRegistrationRequested, &mut model);
    assert!(update.effects.is_empty());
    assert_eq!(model.push_registration, PushRegistrationState::Idle);
}

#[test]
fn incoming_push_refreshes_a_mounted_list() {
    let app = AppTester::<App, Effect>::default();
    let mut model = signed_in(&app);

    let update = app.update(Event::PushReceived, &mut model);
    assert!(update.effects.is_empty());

    app.update(Event::ScreenMounted, &mut model);
    let epoch = model.screen.epoch();
    app.update(
        Event::NotificationsFetched {
            epoch,
            request: model.fetches.latest(),
            result: Box::new(Ok(vec![])),
        },
        &mut model,
    );

    let update = app.update(Event::PushReceived, &mut model);
    assert!(update.effects.iter().any(|e| matches!(
        e,
        Effect::Backend(req) if matches!(req.operation, BackendOperation::FetchNotifications { .. })
    )));
}
