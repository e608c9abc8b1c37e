//! Handlers for every user trigger and for finished requests.
//!
//! Network-backed handlers follow one sequence: validate, queue the request,
//! and on completion either {badge, reload, reset form} or {alert only}. Nothing
//! in here performs I/O; requests land in `AppState::outbox`.
//!
use tracing::{debug, info, warn};

use crate::api::transport::Completion;
use crate::app::{ActionKind, AppState, FormMode, ModalState};
use crate::validate::validate_form;

pub const SAVED_BADGE: &str = "Employee saved";
pub const UPDATED_BADGE: &str = "Employee updated";

/// Create the record described by the form (Create mode only).
pub fn save(app: &mut AppState) {
    debug!("save triggered");
    if app.form_mode != FormMode::Create {
        return;
    }
    if app.is_busy(ActionKind::Create) {
        debug!("save ignored, previous save still in flight");
        return;
    }
    let employee = match validate_form(&app.form) {
        Ok(e) => e,
        Err(err) => {
            app.alert(err.to_string());
            return;
        }
    };
    match app.client.build_create(&employee) {
        Ok(req) => {
            app.enqueue(ActionKind::Create, req);
        }
        Err(err) => app.alert(format!("Error saving employee: {err}")),
    }
}

/// Send name, department and salary for the record being edited (Edit mode only).
pub fn update(app: &mut AppState) {
    debug!("update triggered");
    if app.form_mode != FormMode::Edit {
        return;
    }
    if app.is_busy(ActionKind::Update) {
        debug!("update ignored, previous update still in flight");
        return;
    }
    let employee = match validate_form(&app.form) {
        Ok(e) => e,
        Err(err) => {
            app.alert(err.to_string());
            return;
        }
    };
    match app.client.build_update(&employee) {
        Ok(req) => {
            app.enqueue(ActionKind::Update, req);
        }
        Err(err) => app.alert(format!("Error updating employee: {err}")),
    }
}

/// Clear the form and force Create mode. No request.
pub fn reset(app: &mut AppState) {
    debug!("reset triggered");
    app.reset_form();
}

pub fn view_all(app: &mut AppState) {
    debug!("view all triggered");
    load(app, "");
}

/// Reload filtered by the trimmed search box; blank means unfiltered.
pub fn search(app: &mut AppState) {
    let term = app.search_query.trim().to_string();
    debug!(term = %term, "search triggered");
    load(app, &term);
}

fn load(app: &mut AppState, term: &str) {
    if app.is_busy(ActionKind::Load) {
        debug!("load ignored, previous load still in flight");
        return;
    }
    let req = app.client.build_list(term);
    app.enqueue(ActionKind::Load, req);
}

/// Follow-up reload after a successful write; never refused.
fn reload(app: &mut AppState) {
    let req = app.client.build_list("");
    app.enqueue(ActionKind::Load, req);
}

/// Enter Edit mode seeded from the record with this id.
pub fn edit_row(app: &mut AppState, employeeid: &str) {
    debug!(employeeid, "edit triggered");
    let Some(record) = app.record(employeeid).cloned() else {
        warn!(employeeid, "edit requested for a row that is no longer loaded");
        return;
    };
    app.form = crate::validate::EmployeeForm::from_employee(&record);
    app.form_mode = FormMode::Edit;
    app.focus_form();
}

/// Ask for confirmation before deleting the record with this id.
pub fn request_delete(app: &mut AppState, employeeid: &str) {
    debug!(employeeid, "delete triggered");
    if app.record(employeeid).is_none() {
        warn!(employeeid, "delete requested for a row that is no longer loaded");
        return;
    }
    app.open_modal(ModalState::ConfirmDelete {
        employeeid: employeeid.to_string(),
        yes_selected: false,
    });
}

pub fn confirm_delete(app: &mut AppState) {
    let Some(ModalState::ConfirmDelete { employeeid, .. }) = app.modal.clone() else {
        return;
    };
    app.close_modal();
    if app.is_busy(ActionKind::Delete) {
        debug!(employeeid = %employeeid, "delete ignored, previous delete still in flight");
        return;
    }
    let req = app.client.build_delete(&employeeid);
    app.enqueue(ActionKind::Delete, req);
}

/// Declined confirmation: silently drop the delete.
pub fn cancel_delete(app: &mut AppState) {
    if let Some(ModalState::ConfirmDelete { employeeid, .. }) = &app.modal {
        debug!(employeeid = %employeeid, "delete cancelled");
        app.close_modal();
    }
}

/// Apply a finished request to the state.
pub fn complete(app: &mut AppState, completion: Completion) {
    let Some(kind) = app.pending.remove(&completion.ticket) else {
        warn!(ticket = completion.ticket, "completion for an unknown request");
        return;
    };
    let outcome = completion.result.and_then(|resp| app.client.decode(resp));
    match (kind, outcome) {
        (ActionKind::Load, Ok(payload)) => {
            let records = payload.records();
            info!(rows = records.len(), "employees loaded");
            app.set_records(records);
        }
        (ActionKind::Load, Err(err)) => {
            warn!(error = %err, "load failed");
            app.alert(format!("Error retrieving employees: {err}"));
        }
        (ActionKind::Create, Ok(_)) => {
            info!("employee created");
            app.show_badge(SAVED_BADGE);
            reload(app);
            app.reset_form();
        }
        (ActionKind::Create, Err(err)) => {
            warn!(error = %err, "create failed");
            app.alert(format!("Error saving employee: {err}"));
        }
        (ActionKind::Update, Ok(_)) => {
            info!("employee updated");
            app.show_badge(UPDATED_BADGE);
            reload(app);
            app.reset_form();
        }
        (ActionKind::Update, Err(err)) => {
            warn!(error = %err, "update failed");
            app.alert(format!("Error updating employee: {err}"));
        }
        (ActionKind::Delete, Ok(_)) => {
            info!("employee deleted");
            reload(app);
        }
        (ActionKind::Delete, Err(err)) => {
            warn!(error = %err, "delete failed");
            app.alert(format!("Error deleting employee: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EmployeeClient, HttpMethod, HttpResponse};
    use crate::app::InputMode;
    use crate::error::ApiError;

    const BASE: &str = "https://api.example.test/employeeapi";

    fn app() -> AppState {
        AppState::with_client(EmployeeClient::new(BASE).unwrap())
    }

    fn json(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("content-type".into(), "application/json".into())],
            body: body.into(),
        }
    }

    fn finish(app: &mut AppState, result: Result<HttpResponse, ApiError>) {
        let mut out = app.take_outbox();
        assert_eq!(out.len(), 1, "expected exactly one queued request");
        let ticket = out.remove(0).ticket;
        complete(app, Completion { ticket, result });
    }

    fn loaded(app: &mut AppState) {
        view_all(app);
        finish(
            app,
            Ok(json(200, r#"[{"employeeid":"E1","name":"Alice","department":"Eng","salary":"50000"}]"#)),
        );
    }

    fn fill(app: &mut AppState, id: &str, name: &str, dept: &str, salary: &str) {
        app.form.employeeid = id.into();
        app.form.name = name.into();
        app.form.department = dept.into();
        app.form.salary = salary.into();
    }

    #[test]
    fn invalid_form_alerts_without_request() {
        let mut a = app();
        fill(&mut a, "E1", "", "Eng", "1");
        save(&mut a);
        assert!(a.outbox.is_empty());
        assert_eq!(
            a.modal,
            Some(ModalState::Alert { message: "Please fill all required fields.".into() })
        );
        assert_eq!(a.form.employeeid, "E1", "form keeps its values");
    }

    #[test]
    fn save_success_badges_reloads_and_resets() {
        let mut a = app();
        fill(&mut a, "E2", "Bob", "Ops", "42");
        save(&mut a);
        assert_eq!(a.outbox[0].request.method, HttpMethod::Post);
        finish(&mut a, Ok(json(201, r#"{"message":"Employee created."}"#)));

        assert_eq!(a.badge.as_ref().map(|b| b.message.as_str()), Some(SAVED_BADGE));
        assert_eq!(a.form_mode, FormMode::Create);
        assert!(a.form.employeeid.is_empty());
        assert_eq!(a.outbox.len(), 1);
        assert_eq!(a.outbox[0].request.url, format!("{BASE}/employees"));
    }

    #[test]
    fn save_failure_alerts_and_keeps_form() {
        let mut a = app();
        fill(&mut a, "E1", "Alice", "Eng", "1");
        save(&mut a);
        finish(
            &mut a,
            Ok(json(409, r#"{"error":"Employee already exists."}"#)),
        );
        assert_eq!(
            a.modal,
            Some(ModalState::Alert {
                message: r#"Error saving employee: HTTP 409: {"error":"Employee already exists."}"#.into()
            })
        );
        assert!(a.outbox.is_empty());
        assert_eq!(a.form.name, "Alice");
        assert!(a.badge.is_none());
    }

    #[test]
    fn second_save_is_refused_while_first_in_flight() {
        let mut a = app();
        fill(&mut a, "E2", "Bob", "Ops", "42");
        save(&mut a);
        save(&mut a);
        assert_eq!(a.outbox.len(), 1);
    }

    #[test]
    fn edit_seeds_form_from_loaded_record() {
        let mut a = app();
        loaded(&mut a);
        edit_row(&mut a, "E1");
        assert_eq!(a.form_mode, FormMode::Edit);
        assert_eq!(a.form.employeeid, "E1");
        assert_eq!(a.form.name, "Alice");
        assert_eq!(a.form.department, "Eng");
        assert_eq!(a.form.salary, "50000");
        assert!(!a.field_enabled(crate::app::FormField::EmployeeId));
        assert_eq!(a.input_mode, InputMode::Form);
    }

    #[test]
    fn update_puts_without_id_then_returns_to_create() {
        let mut a = app();
        loaded(&mut a);
        edit_row(&mut a, "E1");
        a.form.salary = "60000".into();
        update(&mut a);
        let req = &a.outbox[0].request;
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, format!("{BASE}/employees/E1"));
        assert!(!req.body.as_deref().unwrap().contains("employeeid"));
        finish(&mut a, Ok(json(200, r#"{"message":"Employee updated."}"#)));
        assert_eq!(a.badge.as_ref().map(|b| b.message.as_str()), Some(UPDATED_BADGE));
        assert_eq!(a.form_mode, FormMode::Create);
        assert_eq!(a.outbox.len(), 1, "reload queued");
    }

    #[test]
    fn save_is_unavailable_in_edit_mode() {
        let mut a = app();
        loaded(&mut a);
        edit_row(&mut a, "E1");
        save(&mut a);
        assert!(a.outbox.is_empty());
    }

    #[test]
    fn reset_leaves_edit_mode() {
        let mut a = app();
        loaded(&mut a);
        edit_row(&mut a, "E1");
        reset(&mut a);
        assert_eq!(a.form_mode, FormMode::Create);
        assert_eq!(a.form, crate::validate::EmployeeForm::default());
        assert!(a.field_enabled(crate::app::FormField::EmployeeId));
        assert!(a.outbox.is_empty());
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut a = app();
        loaded(&mut a);
        request_delete(&mut a, "E1");
        cancel_delete(&mut a);
        assert!(a.modal.is_none());
        assert!(a.outbox.is_empty());
        assert_eq!(a.records.len(), 1);

        request_delete(&mut a, "E1");
        confirm_delete(&mut a);
        let req = &a.outbox[0].request;
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, format!("{BASE}/employees/E1"));
        finish(&mut a, Ok(json(200, r#"{"message":"Employee deleted."}"#)));
        assert!(a.badge.is_none());
        assert_eq!(a.outbox[0].request.method, HttpMethod::Get);
    }

    #[test]
    fn search_trims_term_and_empty_result_is_not_an_error() {
        let mut a = app();
        loaded(&mut a);
        a.search_query = "  Eng ".into();
        search(&mut a);
        assert_eq!(a.outbox[0].request.url, format!("{BASE}/employees?search=Eng"));
        finish(&mut a, Ok(json(200, "[]")));
        assert!(a.records.is_empty());
        assert!(a.modal.is_none());
    }

    #[test]
    fn load_failure_leaves_table_untouched() {
        let mut a = app();
        loaded(&mut a);
        view_all(&mut a);
        finish(&mut a, Err(ApiError::Transport("connection refused".into())));
        assert_eq!(a.records.len(), 1);
        assert_eq!(
            a.modal,
            Some(ModalState::Alert { message: "Error retrieving employees: connection refused".into() })
        );
    }

    #[test]
    fn back_to_back_failures_are_all_shown() {
        let mut a = app();
        view_all(&mut a);
        fill(&mut a, "E1", "Alice", "Eng", "1");
        save(&mut a);
        let out = a.take_outbox();
        assert_eq!(out.len(), 2);
        for p in out {
            complete(&mut a, Completion { ticket: p.ticket, result: Err(ApiError::Transport("boom".into())) });
        }

        assert_eq!(
            a.modal,
            Some(ModalState::Alert { message: "Error retrieving employees: boom".into() })
        );
        a.close_modal();
        assert_eq!(
            a.modal,
            Some(ModalState::Alert { message: "Error saving employee: boom".into() })
        );
        a.close_modal();
        assert!(a.modal.is_none());
    }

    #[test]
    fn load_failure_keeps_pending_delete_prompt() {
        let mut a = app();
        loaded(&mut a);
        view_all(&mut a);
        let ticket = a.take_outbox().remove(0).ticket;
        request_delete(&mut a, "E1");
        complete(&mut a, Completion { ticket, result: Ok(json(500, "err")) });

        assert!(matches!(a.modal, Some(ModalState::ConfirmDelete { .. })));
        confirm_delete(&mut a);
        assert_eq!(a.outbox.len(), 1);
        assert_eq!(a.outbox[0].request.method, HttpMethod::Delete);
        assert_eq!(
            a.modal,
            Some(ModalState::Alert { message: "Error retrieving employees: HTTP 500: err".into() })
        );
    }

    #[test]
    fn blank_field_sends_nothing_in_either_mode() {
        let values = ["E1", "Alice", "Eng", "50000"];
        for mode in [FormMode::Create, FormMode::Edit] {
            for blank in 0..values.len() {
                let mut a = app();
                loaded(&mut a);
                if mode == FormMode::Edit {
                    edit_row(&mut a, "E1");
                }
                let mut v = values.map(String::from);
                v[blank] = " ".into();
                fill(&mut a, &v[0], &v[1], &v[2], &v[3]);
                match mode {
                    FormMode::Create => save(&mut a),
                    FormMode::Edit => update(&mut a),
                }
                assert!(a.outbox.is_empty(), "{mode:?} with field {blank} blank");
                assert_eq!(
                    a.modal,
                    Some(ModalState::Alert { message: "Please fill all required fields.".into() })
                );
            }
        }
    }

    #[test]
    fn update_validation_failure_stays_in_edit_mode() {
        let mut a = app();
        loaded(&mut a);
        edit_row(&mut a, "E1");
        a.form.salary = "lots".into();
        update(&mut a);
        assert!(a.outbox.is_empty());
        assert_eq!(a.modal, Some(ModalState::Alert { message: "Salary must be a number.".into() }));
        assert_eq!(a.form_mode, FormMode::Edit);
        assert_eq!(a.form.employeeid, "E1");
        assert_eq!(a.form.name, "Alice");
        assert_eq!(a.form.salary, "lots");
    }

    #[test]
    fn update_failure_alerts_and_keeps_edit_mode() {
        for result in [
            Ok(json(404, r#"{"error":"Employee not found."}"#)),
            Err(ApiError::Transport("connection reset".into())),
        ] {
            let mut a = app();
            loaded(&mut a);
            edit_row(&mut a, "E1");
            a.form.name = "Alicia".into();
            update(&mut a);
            finish(&mut a, result);

            let Some(ModalState::Alert { message }) = &a.modal else {
                panic!("expected an alert, got {:?}", a.modal);
            };
            assert!(message.starts_with("Error updating employee: "), "{message}");
            assert_eq!(a.form_mode, FormMode::Edit);
            assert_eq!(a.form.name, "Alicia");
            assert!(a.outbox.is_empty(), "no reload after a failed update");
            assert!(a.badge.is_none());
        }
    }

    #[test]
    fn text_payload_renders_empty_table() {
        let mut a = app();
        loaded(&mut a);
        view_all(&mut a);
        finish(
            &mut a,
            Ok(HttpResponse { status: 200, headers: vec![], body: "[]".into() }),
        );
        assert!(a.records.is_empty());
    }
}
