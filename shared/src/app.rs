use crate::alert::Alert;
use crate::attachments::{cache_location, AttachmentState};
use crate::capabilities::Capabilities;
use crate::event::{Event, ReachabilityPurpose};
use crate::flag_store::{self, FlagKind};
use crate::guard::{self, GuardOutcome, GuardStep};
use crate::model::{Model, NotificationId, PushRegistrationState, ReportId};
use crate::swipe::SwipeGeometry;
use crate::view::ViewModel;

const FETCH_FAILED_MESSAGE: &str = "Could not load notifications. Pull to refresh or tap retry.";

#[derive(Default)]
pub struct App;

impl App {
    fn load_flags(model: &Model, caps: &Capabilities) {
        let epoch = model.screen.epoch();
        for kind in FlagKind::ALL {
            let key = kind.storage_key(&model.config).to_string();
            caps.key_value.get(key, move |result| Event::FlagsLoaded {
                kind,
                epoch,
                result: result.map_err(|e| e.to_string()),
            });
        }
    }

    fn persist_flags(kind: FlagKind, model: &Model, caps: &Capabilities) {
        let set = match kind {
            FlagKind::Tapped => &model.tapped,
            FlagKind::Read => &model.read,
        };
        let key = kind.storage_key(&model.config).to_string();
        match flag_store::encode(set) {
            Ok(bytes) => caps.key_value.set(key, bytes, move |result| Event::FlagsSaved {
                kind,
                result: result.map(|_| ()).map_err(|e| e.to_string()),
            }),
            Err(e) => tracing::warn!(?kind, error = %e, "flag set not persisted"),
        }
    }

    /// Enters the loading state: polls reachability, arms the watchdog and
    /// issues the fetch, all tagged with the current epoch.
    fn start_loading(model: &mut Model, caps: &Capabilities) {
        if !model.screen.is_mounted() {
            return;
        }
        let Some(user_id) = model.user_id.clone() else {
            tracing::debug!("no signed-in officer, list stays empty");
            model.is_loading = false;
            return;
        };

        model.is_loading = true;
        model.fetch_error = None;
        let epoch = model.screen.epoch();

        caps.reachability.check(move |status| Event::ReachabilityChecked {
            epoch,
            purpose: ReachabilityPurpose::Loading,
            status,
        });

        model.watchdog.disarm();
        let token = model.watchdog.arm();
        caps.timer
            .start(token, model.config.watchdog_timeout_ms, move || Event::WatchdogFired {
                token,
            });

        let request = model.fetches.next();
        caps.backend.fetch_notifications(user_id, move |result| Event::NotificationsFetched {
            epoch,
            request,
            result: Box::new(result),
        });
    }

    fn finish_loading(model: &mut Model) {
        model.is_loading = false;
        model.watchdog.disarm();
    }

    fn show_alert(model: &mut Model, alert: Alert) {
        if !model.alerts.show(alert) {
            tracing::debug!("alert dropped");
        }
    }

    fn open_report(model: &mut Model, caps: &Capabilities, id: &NotificationId) {
        let Some(record) = model.find_notification(id) else {
            tracing::debug!(%id, "tap on unknown notification");
            return;
        };
        let report_id = guard::extract_report_id(record.title.as_deref(), &record.body);

        if flag_store::mark(&mut model.tapped, id) {
            Self::persist_flags(FlagKind::Tapped, model, caps);
        }

        let Some(report_id) = report_id else {
            tracing::debug!(%id, "notification has no report reference");
            return;
        };

        let token = model.guard.begin(report_id.clone());
        caps.backend
            .report_status(report_id.clone(), move |result| Event::ReportStatusFetched {
                token,
                report_id,
                result: Box::new(result),
            });
    }

    fn navigate_to_report(model: &Model, caps: &Capabilities, report_id: &ReportId) {
        let route = format!("{}{report_id}", model.config.report_route_prefix);
        tracing::info!(%route, "navigating to report");
        caps.navigator.push(route);
    }

    fn delete_one(model: &mut Model, caps: &Capabilities, id: NotificationId) {
        if model.find_notification(&id).is_none() {
            tracing::debug!(%id, "delete of absent notification ignored");
            model.swipes.close(&id);
            return;
        }
        let epoch = model.screen.epoch();
        caps.backend
            .delete_notification(id.clone(), move |result| Event::NotificationDeleted {
                epoch,
                id,
                result,
            });
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        model.update_timestamp();

        let event_name = event.name();
        tracing::debug!(event = event_name, "update");
        if event.is_user_initiated() {
            tracing::info!(event = event_name, "user action");
        }

        match event {
            Event::Configure(config) => {
                match config.validate() {
                    Ok(()) => model.config = *config,
                    Err(e) => tracing::warn!(error = %e, "rejected configuration, keeping previous"),
                }
                caps.render.render();
            }

            Event::SessionStarted { user_id } => {
                if model.user_id.as_ref() != Some(&user_id) {
                    model.clear_session();
                    model.user_id = Some(user_id);
                }
                if model.screen.is_mounted() {
                    Self::load_flags(model, caps);
                    Self::start_loading(model, caps);
                }
                caps.render.render();
            }

            Event::SessionEnded => {
                model.clear_session();
                caps.render.render();
            }

            // --- Screen lifecycle ---
            Event::ScreenMounted => {
                model.screen.mount();
                Self::load_flags(model, caps);
                Self::start_loading(model, caps);
                caps.render.render();
            }

            Event::ScreenFocused => {
                if model.screen.is_mounted() {
                    Self::load_flags(model, caps);
                }
            }

            Event::ScreenUnmounted => {
                model.screen.unmount();
                Self::finish_loading(model);
                model.guard.cancel();
                model.swipes.clear();
                model.selection.cancel();
            }

            Event::AlertHostMounted => {
                model.alerts.register();
            }

            Event::AlertHostUnmounted => {
                model.alerts.unregister();
                caps.render.render();
            }

            Event::AlertDismissed => {
                model.alerts.dismiss();
                caps.render.render();
            }

            // --- Local flags ---
            Event::FlagsLoaded {
                kind,
                epoch,
                result,
            } => {
                if !model.screen.accepts(epoch) {
                    tracing::debug!(?kind, "stale flag load dropped");
                    return;
                }
                let set = flag_store::decode_or_empty(kind.storage_key(&model.config), result);
                match kind {
                    FlagKind::Tapped => model.tapped = set,
                    FlagKind::Read => model.read = set,
                }
                caps.render.render();
            }

            Event::FlagsSaved { kind, result } => {
                if let Err(e) = result {
                    tracing::warn!(?kind, error = %e, "flag set write failed");
                }
            }

            // --- List loading ---
            Event::RefreshRequested => {
                if !model.is_loading {
                    Self::start_loading(model, caps);
                    caps.render.render();
                }
            }

            Event::NotificationsFetched {
                epoch,
                request,
                result,
            } => {
                if !model.screen.accepts(epoch) || !model.fetches.is_latest(request) {
                    tracing::debug!(request, "stale notification fetch dropped");
                    return;
                }
                Self::finish_loading(model);
                match *result {
                    Ok(rows) => {
                        tracing::info!(count = rows.len(), "notifications loaded");
                        model.notifications = rows;
                        model.fetch_error = None;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "notification fetch failed");
                        model.fetch_error = Some(e.into_app_error(FETCH_FAILED_MESSAGE));
                    }
                }
                caps.render.render();
            }

            Event::ReachabilityChecked {
                epoch,
                purpose,
                status,
            } => {
                if !model.screen.accepts(epoch) {
                    return;
                }
                let reachable = status.is_reachable();
                model.watchdog.record_reachability(reachable);
                if purpose == ReachabilityPurpose::Retry {
                    if reachable {
                        Self::start_loading(model, caps);
                    } else {
                        tracing::info!("retry while offline, keeping connectivity message");
                    }
                    caps.render.render();
                }
            }

            Event::WatchdogFired { token } => {
                if !model.screen.is_mounted() {
                    return;
                }
                if model
                    .watchdog
                    .fire(token, model.is_loading, model.fetch_error.is_some())
                {
                    tracing::info!("loading stalled, showing connectivity message");
                    caps.render.render();
                }
            }

            Event::RetryRequested => {
                if model.watchdog.message().is_some() {
                    let epoch = model.screen.epoch();
                    caps.reachability.check(move |status| Event::ReachabilityChecked {
                        epoch,
                        purpose: ReachabilityPurpose::Retry,
                        status,
                    });
                } else {
                    Self::start_loading(model, caps);
                    caps.render.render();
                }
            }

            // --- Row interaction ---
            Event::NotificationTapped { id } => {
                if model.selection.is_active() {
                    model.selection.toggle(&id);
                } else {
                    Self::open_report(model, caps, &id);
                }
                caps.render.render();
            }

            Event::ToggleReadRequested { id } => {
                let now_read = flag_store::toggle(&mut model.read, &id);
                tracing::debug!(%id, now_read, "read flag toggled");
                Self::persist_flags(FlagKind::Read, model, caps);
            }

            Event::SwipeMoved { id, dx } => {
                if model.selection.is_active() {
                    return;
                }
                let geometry = SwipeGeometry::from_config(&model.config);
                if model.swipes.drag(&id, dx, geometry) {
                    caps.render.render();
                }
            }

            Event::SwipeReleased { id, dx } => {
                if model.selection.is_active() {
                    return;
                }
                let geometry = SwipeGeometry::from_config(&model.config);
                let phase = model.swipes.release(&id, dx, geometry);
                tracing::debug!(%id, ?phase, "swipe released");
                caps.render.render();
            }

            Event::DeleteRequested { id } => {
                if model.selection.is_active() {
                    return;
                }
                Self::delete_one(model, caps, id);
                caps.render.render();
            }

            Event::NotificationDeleted { epoch, id, result } => {
                if !model.screen.accepts(epoch) {
                    return;
                }
                match result {
                    Ok(()) => {
                        model.remove_notification(&id);
                    }
                    Err(e) if model.find_notification(&id).is_none() => {
                        tracing::debug!(%id, error = %e, "delete failed for a row already gone");
                    }
                    Err(e) => {
                        tracing::warn!(%id, error = %e, "delete failed");
                        model.swipes.close(&id);
                        Self::show_alert(
                            model,
                            Alert::error(
                                "Delete Failed",
                                "Could not delete the notification. Please try again.",
                            ),
                        );
                    }
                }
                caps.render.render();
            }

            // --- Selection ---
            Event::SelectionModeEntered => {
                model.selection.enter();
                model.swipes.clear();
                caps.render.render();
            }

            Event::SelectionCancelled => {
                model.selection.cancel();
                caps.render.render();
            }

            Event::SelectAllToggled => {
                let visible = model.visible_ids();
                model.selection.toggle_all(&visible);
                caps.render.render();
            }

            Event::BulkDeleteRequested => {
                let visible = model.visible_ids();
                if let Some(ids) = model.selection.begin_bulk_delete(&visible) {
                    tracing::info!(count = ids.len(), "bulk delete started");
                    let epoch = model.screen.epoch();
                    caps.backend
                        .delete_notifications(ids, move |outcomes| Event::BulkDeleteFinished {
                            epoch,
                            outcomes,
                        });
                    caps.render.render();
                }
            }

            Event::BulkDeleteFinished { epoch, outcomes } => {
                if !model.screen.accepts(epoch) {
                    return;
                }
                let mut failed = 0usize;
                for outcome in outcomes {
                    match outcome.result {
                        Ok(()) => {
                            model.remove_notification(&outcome.id);
                        }
                        Err(e) => {
                            failed += 1;
                            tracing::warn!(id = %outcome.id, error = %e, "bulk delete item failed");
                        }
                    }
                }
                tracing::info!(failed, "bulk delete finished");
                model.selection.finish_bulk_delete();
                caps.render.render();
            }

            // --- Navigation guard ---
            Event::ReportStatusFetched {
                token,
                report_id,
                result,
            } => {
                if !model.guard.is_current(token) || !model.screen.is_mounted() {
                    tracing::debug!(token, "stale report status dropped");
                    return;
                }
                match guard::after_status(&report_id, &result) {
                    GuardStep::ShowResolved {
                        report_id,
                        resolved_at,
                    } => {
                        model.guard.finish(token);
                        let outcome = GuardOutcome::Resolved {
                            report_id,
                            resolved_at,
                        };
                        if let Some(alert) = outcome.alert() {
                            Self::show_alert(model, alert);
                        }
                        caps.render.render();
                    }
                    GuardStep::CheckAssignment => {
                        if let Some(user_id) = model.user_id.clone() {
                            caps.backend.officer_assignment(user_id, move |result| {
                                Event::AssignmentFetched {
                                    token,
                                    report_id,
                                    result: Box::new(result),
                                }
                            });
                        } else {
                            model.guard.finish(token);
                            Self::navigate_to_report(model, caps, &report_id);
                        }
                    }
                }
            }

            Event::AssignmentFetched {
                token,
                report_id,
                result,
            } => {
                if !model.screen.is_mounted() || model.guard.finish(token).is_none() {
                    tracing::debug!(token, "stale assignment lookup dropped");
                    return;
                }
                let outcome = guard::after_assignment(&report_id, &result);
                match outcome.alert() {
                    None => Self::navigate_to_report(model, caps, &report_id),
                    Some(alert) => {
                        Self::show_alert(model, alert);
                        caps.render.render();
                    }
                }
            }

            Event::BackRequested => {
                caps.navigator.back();
            }

            // --- Attachments ---
            Event::AttachmentRequested { url } => {
                if model.attachments.is_pending(&url) {
                    return;
                }
                match cache_location(&url, &model.config.attachment_cache_dir) {
                    Ok(location) => {
                        model.attachments.set(&url, AttachmentState::Checking);
                        let path = location.path.clone();
                        let kind = location.kind;
                        caps.file_cache.exists(location.path, move |exists| {
                            Event::AttachmentChecked {
                                url,
                                path,
                                kind,
                                exists,
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "attachment rejected");
                        model.attachments.set(
                            &url,
                            AttachmentState::Failed {
                                reason: e.to_string(),
                            },
                        );
                    }
                }
                caps.render.render();
            }

            Event::AttachmentChecked {
                url,
                path,
                kind,
                exists,
            } => {
                if exists {
                    tracing::debug!(%path, "attachment cache hit");
                    model.attachments.set(&url, AttachmentState::Ready { path, kind });
                } else {
                    model.attachments.set(&url, AttachmentState::Downloading);
                    caps.file_cache
                        .download(url.clone(), path.clone(), move |result| {
                            Event::AttachmentDownloaded {
                                url,
                                path,
                                kind,
                                result,
                            }
                        });
                }
                caps.render.render();
            }

            Event::AttachmentDownloaded {
                url,
                path,
                kind,
                result,
            } => {
                let state = match result {
                    Ok(()) => AttachmentState::Ready { path, kind },
                    Err(reason) => {
                        tracing::warn!(%url, %reason, "attachment download failed");
                        AttachmentState::Failed { reason }
                    }
                };
                model.attachments.set(&url, state);
                caps.render.render();
            }

            // --- Push registration ---
            Event::PushRegistrationRequested => {
                if !model.is_authenticated() {
                    tracing::warn!("push registration requested without a session");
                    return;
                }
                if matches!(
                    model.push_registration,
                    PushRegistrationState::RequestingPermission
                        | PushRegistrationState::FetchingToken
                        | PushRegistrationState::Registering
                ) {
                    return;
                }
                model.push_registration = PushRegistrationState::RequestingPermission;
                caps.push
                    .request_permission(|result| Event::PushPermissionResolved { result });
                caps.render.render();
            }

            Event::PushPermissionResolved { result } => {
                match result {
                    Ok(permission) if permission.is_authorized() => {
                        model.push_registration = PushRegistrationState::FetchingToken;
                        caps.push.get_token(|result| Event::PushTokenReceived { result });
                    }
                    Ok(permission) => {
                        tracing::info!(?permission, "push permission not granted");
                        model.push_registration = PushRegistrationState::Denied;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "push permission request failed");
                        model.push_registration = PushRegistrationState::Failed;
                    }
                }
                caps.render.render();
            }

            Event::PushTokenReceived { result } => {
                match (result, model.user_id.clone()) {
                    (Ok(token), Some(user_id)) => {
                        model.push_registration = PushRegistrationState::Registering;
                        caps.backend.register_push_token(user_id, token, |result| {
                            Event::PushTokenRegistered { result }
                        });
                    }
                    (Ok(_), None) => {
                        tracing::warn!("push token arrived after sign-out");
                        model.push_registration = PushRegistrationState::Idle;
                    }
                    (Err(e), _) => {
                        tracing::warn!(error = %e, "push token unavailable");
                        model.push_registration = PushRegistrationState::Failed;
                    }
                }
                caps.render.render();
            }

            Event::PushTokenRegistered { result } => {
                model.push_registration = match result {
                    Ok(()) => PushRegistrationState::Registered,
                    Err(e) => {
                        tracing::warn!(error = %e, "push token registration failed");
                        PushRegistrationState::Failed
                    }
                };
                caps.render.render();
            }

            Event::PushReceived => {
                if model.screen.is_mounted() && !model.is_loading {
                    Self::start_loading(model, caps);
                    caps.render.render();
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}
