//! Client-side checks on the employee form.

use crate::api::Employee;
use crate::error::ValidationError;

/// Raw text of the four form inputs, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub employeeid: String,
    pub name: String,
    pub department: String,
    pub salary: String,
}

impl EmployeeForm {
    pub fn from_employee(e: &Employee) -> Self {
        Self {
            employeeid: e.employeeid.clone(),
            name: e.name.clone(),
            department: e.department.clone(),
            salary: e.salary.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Trim every field and check it. All four are required and the salary must
/// be accepted by [`is_numeric`].
pub fn validate_form(form: &EmployeeForm) -> Result<Employee, ValidationError> {
    let employee = Employee {
        employeeid: form.employeeid.trim().to_string(),
        name: form.name.trim().to_string(),
        department: form.department.trim().to_string(),
        salary: form.salary.trim().to_string(),
    };
    if employee.employeeid.is_empty()
        || employee.name.is_empty()
        || employee.department.is_empty()
        || employee.salary.is_empty()
    {
        return Err(ValidationError::MissingField);
    }
    if !is_numeric(&employee.salary) {
        return Err(ValidationError::NotANumber);
    }
    Ok(employee)
}

/// Numeric-literal check with the same acceptance as JavaScript's `Number()`
/// on trimmed input: signed decimals with optional fraction and exponent,
/// `Infinity`, and unsigned `0x`/`0o`/`0b` integers. Empty input counts as
/// numeric (`Number("")` is 0); callers reject it earlier.
pub fn is_numeric(input: &str) -> bool {
    let s = input.trim();
    if s.is_empty() {
        return true;
    }

    let radix_digits = |prefix_lower: &str, prefix_upper: &str, radix: u32| {
        s.strip_prefix(prefix_lower)
            .or_else(|| s.strip_prefix(prefix_upper))
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_digit(radix)))
    };
    for (lower, upper, radix) in [("0x", "0X", 16), ("0o", "0O", 8), ("0b", "0B", 2)] {
        if let Some(ok) = radix_digits(lower, upper, radix) {
            return ok;
        }
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned == "Infinity" {
        return true;
    }
    is_decimal_literal(unsigned)
}

/// `digits [. digits] [e [+-] digits]`, where one side of the dot may be empty.
fn is_decimal_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(at) => (&s[..at], Some(&s[at + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}
