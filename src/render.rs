//! Terminal rendering
//!
//! Read-only actions print one aligned table; mutations print a single
//! confirmation line from their handler. Display rows are separate from the
//! store records so the table shape can diverge from the query shape.

use tabled::{settings::Style, Table, Tabled};

use crate::store::{Department, EmployeeDetail, RoleDetail};

/// Render rows as an aligned table
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
pub struct DepartmentRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id,
            name: department.name.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct RoleRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Salary")]
    salary: String,
}

impl From<&RoleDetail> for RoleRow {
    fn from(role: &RoleDetail) -> Self {
        Self {
            id: role.id,
            title: role.title.clone(),
            department: role.department.clone(),
            salary: format_salary(role.salary),
        }
    }
}

#[derive(Tabled)]
pub struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "First Name")]
    first_name: String,
    #[tabled(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Manager")]
    manager: String,
}

impl From<&EmployeeDetail> for EmployeeRow {
    fn from(employee: &EmployeeDetail) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            title: employee.title.clone(),
            department: employee.department.clone(),
            salary: format_salary(employee.salary),
            manager: employee.manager.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Format a monetary amount with two decimal places
pub fn format_salary(salary: f64) -> String {
    format!("{salary:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(90_000.0), "90000.00");
        assert_eq!(format_salary(48_500.5), "48500.50");
    }

    #[test]
    fn test_department_table_contains_headers_and_values() {
        let departments = vec![
            Department { id: 1, name: "Engineering".to_string() },
            Department { id: 2, name: "Sales".to_string() },
        ];

        let rendered = table(departments.iter().map(DepartmentRow::from));
        assert!(rendered.contains("ID"));
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("Engineering"));
        assert!(rendered.contains("Sales"));
    }

    #[test]
    fn test_employee_row_without_manager_shows_dash() {
        let employee = EmployeeDetail {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: "Engineer".to_string(),
            department: "Engineering".to_string(),
            salary: 90_000.0,
            manager: None,
        };

        let rendered = table([EmployeeRow::from(&employee)]);
        assert!(rendered.contains("Ada"));
        assert!(rendered.contains("Lovelace"));
        assert!(rendered.contains("90000.00"));
        assert!(rendered.contains('-'));
    }

    #[test]
    fn test_role_table_shows_department_name() {
        let role = RoleDetail {
            id: 3,
            title: "Accountant".to_string(),
            salary: 65_000.0,
            department: "Finance".to_string(),
        };

        let rendered = table([RoleRow::from(&role)]);
        assert!(rendered.contains("Accountant"));
        assert!(rendered.contains("Finance"));
        assert!(rendered.contains("65000.00"));
    }
}
