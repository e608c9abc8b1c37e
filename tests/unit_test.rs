// Unit tests for employee-tui
// These tests work with the public API only

#[cfg(test)]
mod validation_tests {
    use employee_tui::error::ValidationError;
    use employee_tui::validate::{EmployeeForm, is_numeric, validate_form};

    fn form(id: &str, name: &str, dept: &str, salary: &str) -> EmployeeForm {
        EmployeeForm {
            employeeid: id.into(),
            name: name.into(),
            department: dept.into(),
            salary: salary.into(),
        }
    }

    #[test]
    fn test_any_blank_field_is_missing() {
        let full = ["E1", "Alice", "Eng", "50000"];
        for blank in 0..4 {
            let mut f = full.map(String::from);
            f[blank] = "   ".into();
            let err = validate_form(&form(&f[0], &f[1], &f[2], &f[3])).unwrap_err();
            assert_eq!(err, ValidationError::MissingField);
            assert_eq!(err.to_string(), "Please fill all required fields.");
        }
    }

    #[test]
    fn test_missing_takes_precedence_over_numeric() {
        let err = validate_form(&form("", "Alice", "Eng", "abc")).unwrap_err();
        assert_eq!(err, ValidationError::MissingField);
    }

    #[test]
    fn test_non_numeric_salary() {
        let err = validate_form(&form("E1", "Alice", "Eng", "12k")).unwrap_err();
        assert_eq!(err.to_string(), "Salary must be a number.");
    }

    #[test]
    fn test_values_are_trimmed() {
        let e = validate_form(&form(" E1 ", " Alice ", "Eng ", " 1e3 ")).unwrap();
        assert_eq!(e.employeeid, "E1");
        assert_eq!(e.name, "Alice");
        assert_eq!(e.department, "Eng");
        // salary keeps its typed form
        assert_eq!(e.salary, "1e3");
    }

    #[test]
    fn test_numeric_literals() {
        for ok in ["0", "-3.5", ".5", "5.", "+7", "1e-2", "0x1F", "0b101", "0o17", "Infinity", "-Infinity"] {
            assert!(is_numeric(ok), "{ok} should be numeric");
        }
        for bad in ["abc", "1,000", "1.2.3", "e5", "0x", "--1", "NaN", "infinity", "-0x1"] {
            assert!(!is_numeric(bad), "{bad} should be rejected");
        }
    }
}

#[cfg(test)]
mod client_tests {
    use employee_tui::api::{ApiPayload, EmployeeClient, HttpMethod, HttpResponse};
    use employee_tui::error::ApiError;

    fn client() -> EmployeeClient {
        EmployeeClient::new("https://api.example.test/employeeapi/").unwrap()
    }

    #[test]
    fn test_list_with_and_without_search() {
        let c = client();
        assert_eq!(c.build_list("").url, "https://api.example.test/employeeapi/employees");
        let req = c.build_list("Eng Ops");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.example.test/employeeapi/employees?search=Eng%20Ops");
    }

    #[test]
    fn test_non_json_success_is_text() {
        let resp = HttpResponse {
            status: 201,
            headers: vec![("Content-Type".into(), "text/plain".into())],
            body: "created".into(),
        };
        let payload = client().decode(resp).unwrap();
        assert_eq!(payload, ApiPayload::Text("created".into()));
        assert!(payload.records().is_empty());
    }

    #[test]
    fn test_error_status_carries_body() {
        let resp = HttpResponse {
            status: 404,
            headers: vec![("content-type".into(), "application/json".into())],
            body: "{\"error\":\"Employee not found\"}".into(),
        };
        let err = client().decode(resp).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http { status: 404, body: "{\"error\":\"Employee not found\"}".into() }
        );
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        assert!(EmployeeClient::new("not a url").is_err());
        assert!(EmployeeClient::new("mailto:x@example.test").is_err());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use employee_tui::error::{Context, SimpleError, simple_error};

    #[test]
    fn test_context_error_chaining() {
        let base_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<(), std::io::Error> = Err(base_error);

        let err = result.with_ctx(|| "open log file".to_string()).unwrap_err();
        let err_string = err.to_string();
        assert!(err_string.contains("open log file"));
        assert!(err_string.contains("file not found"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_simple_error() {
        assert_eq!(simple_error("Custom error message").to_string(), "Custom error message");
        assert_eq!(SimpleError::new("Another error").to_string(), "Another error");
    }
}

#[cfg(test)]
mod render_tests {
    use employee_tui::api::{Employee, EmployeeClient};
    use employee_tui::app::{AppState, Button, FormMode, actions};
    use employee_tui::ui::render;
    use ratatui::{Terminal, backend::TestBackend};

    fn app() -> AppState {
        let mut app = AppState::with_client(EmployeeClient::new("http://localhost:3000").unwrap());
        app.set_records(vec![
            Employee { employeeid: "E1".into(), name: "Alice".into(), department: "Eng".into(), salary: "50000".into() },
            Employee { employeeid: "E2".into(), name: "Bob".into(), department: "Ops".into(), salary: "42000".into() },
        ]);
        app
    }

    fn draw(app: &mut AppState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).expect("create terminal");
        terminal.draw(|f| render(f, app)).expect("render frame");
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_rows_and_controls_are_drawn() {
        let mut app = app();
        let screen = draw(&mut app);
        assert!(screen.contains("Alice"));
        assert!(screen.contains("E2"));
        assert!(screen.contains("[Edit] [Delete]"));
        assert!(screen.contains("Employees (2)"));
    }

    #[test]
    fn test_create_mode_shows_save_only() {
        let mut app = app();
        let screen = draw(&mut app);
        assert!(screen.contains("[Save]"));
        assert!(!screen.contains("[Update]"));
        assert!(app.buttons.iter().any(|(_, b)| *b == Button::Save));
        assert!(app.buttons.iter().any(|(_, b)| *b == Button::ViewAll));
    }

    #[test]
    fn test_edit_mode_shows_update_and_locked_id() {
        let mut app = app();
        actions::edit_row(&mut app, "E2");
        assert_eq!(app.form_mode, FormMode::Edit);
        let screen = draw(&mut app);
        assert!(screen.contains("[Update]"));
        assert!(!screen.contains("[Save]"));
        assert!(screen.contains("(locked)"));
        assert!(!app.buttons.iter().any(|(_, b)| *b == Button::Save));
    }

    #[test]
    fn test_render_with_empty_data_and_tiny_terminal() {
        let mut app = AppState::with_client(EmployeeClient::new("http://localhost:3000").unwrap());
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).expect("create terminal");
        terminal.draw(|f| render(f, &mut app)).expect("render frame with empty data");
    }

    #[test]
    fn test_delete_prompt_names_the_record() {
        let mut app = app();
        actions::request_delete(&mut app, "E1");
        let screen = draw(&mut app);
        assert!(screen.contains("Delete employee E1?"));
    }
}
