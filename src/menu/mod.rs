//! Interaction Layer
//!
//! A single-threaded cooperative loop: present the fixed action menu, await
//! one selection, dispatch to the matching handler, then re-present the
//! menu. The loop is an explicit state machine — menu state, one state per
//! handler, terminated — and every handler transitions back to the menu on
//! completion or error. Quit is the only terminal transition.
//!
//! Handlers that need a foreign key gather the reference data first and
//! present it as a selectable list labeled by human-readable name; the user
//! never types a raw id. Salary input relies on the prompt layer's own
//! numeric parsing, nothing more.

use dialoguer::{Input, Select};
use tracing::error;

use crate::error::{CadreError, Result};
use crate::render::{self, DepartmentRow, EmployeeRow, RoleRow};
use crate::store::{Department, EmployeeDetail, RoleDetail, Store};

/// One entry in the fixed action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    ViewEmployeesByManager,
    ViewEmployeesByDepartment,
    ViewDepartmentBudget,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    DeleteDepartment,
    DeleteRole,
    DeleteEmployee,
    Quit,
}

impl Action {
    /// Menu order, Quit last
    pub const ALL: [Self; 15] = [
        Self::ViewDepartments,
        Self::ViewRoles,
        Self::ViewEmployees,
        Self::ViewEmployeesByManager,
        Self::ViewEmployeesByDepartment,
        Self::ViewDepartmentBudget,
        Self::AddDepartment,
        Self::AddRole,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::UpdateEmployeeManager,
        Self::DeleteDepartment,
        Self::DeleteRole,
        Self::DeleteEmployee,
        Self::Quit,
    ];

    /// Human label shown in the menu
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewDepartments => "View all departments",
            Self::ViewRoles => "View all roles",
            Self::ViewEmployees => "View all employees",
            Self::ViewEmployeesByManager => "View employees by manager",
            Self::ViewEmployeesByDepartment => "View employees by department",
            Self::ViewDepartmentBudget => "View department budget",
            Self::AddDepartment => "Add a department",
            Self::AddRole => "Add a role",
            Self::AddEmployee => "Add an employee",
            Self::UpdateEmployeeRole => "Update an employee's role",
            Self::UpdateEmployeeManager => "Update an employee's manager",
            Self::DeleteDepartment => "Delete a department",
            Self::DeleteRole => "Delete a role",
            Self::DeleteEmployee => "Delete an employee",
            Self::Quit => "Quit",
        }
    }
}

/// Run the menu loop until the user quits
///
/// Handler errors are logged and the menu is re-presented; only a failure of
/// the menu prompt itself (e.g. the terminal going away) ends the loop early.
pub async fn run(store: &Store) -> Result<()> {
    loop {
        let action = prompt_action()?;
        if action == Action::Quit {
            break;
        }
        if let Err(err) = dispatch(store, action).await {
            error!("{err}");
        }
    }
    Ok(())
}

async fn dispatch(store: &Store, action: Action) -> Result<()> {
    match action {
        Action::ViewDepartments => view_departments(store).await,
        Action::ViewRoles => view_roles(store).await,
        Action::ViewEmployees => view_employees(store).await,
        Action::ViewEmployeesByManager => view_employees_by_manager(store).await,
        Action::ViewEmployeesByDepartment => view_employees_by_department(store).await,
        Action::ViewDepartmentBudget => view_department_budget(store).await,
        Action::AddDepartment => add_department(store).await,
        Action::AddRole => add_role(store).await,
        Action::AddEmployee => add_employee(store).await,
        Action::UpdateEmployeeRole => update_employee_role(store).await,
        Action::UpdateEmployeeManager => update_employee_manager(store).await,
        Action::DeleteDepartment => delete_department(store).await,
        Action::DeleteRole => delete_role(store).await,
        Action::DeleteEmployee => delete_employee(store).await,
        // Handled by the loop before dispatch
        Action::Quit => Ok(()),
    }
}

// ============================================================================
// View handlers
// ============================================================================

async fn view_departments(store: &Store) -> Result<()> {
    let departments = store.departments().await?;
    print_departments(&departments);
    Ok(())
}

async fn view_roles(store: &Store) -> Result<()> {
    let roles = store.roles().await?;
    print_roles(&roles);
    Ok(())
}

async fn view_employees(store: &Store) -> Result<()> {
    let employees = store.employees().await?;
    print_employees(&employees);
    Ok(())
}

async fn view_employees_by_manager(store: &Store) -> Result<()> {
    let employees = store.employees().await?;
    if employees.is_empty() {
        println!("No employees yet.");
        return Ok(());
    }

    let idx = select("Select the manager", &employee_labels(&employees))?;
    let reports = store.employees_by_manager(employees[idx].id).await?;
    print_employees(&reports);
    Ok(())
}

async fn view_employees_by_department(store: &Store) -> Result<()> {
    let departments = store.departments().await?;
    if departments.is_empty() {
        println!("No departments yet.");
        return Ok(());
    }

    let idx = select("Select the department", &department_labels(&departments))?;
    let employees = store.employees_by_department(departments[idx].id).await?;
    print_employees(&employees);
    Ok(())
}

async fn view_department_budget(store: &Store) -> Result<()> {
    let departments = store.departments().await?;
    if departments.is_empty() {
        println!("No departments yet.");
        return Ok(());
    }

    let idx = select("Select the department", &department_labels(&departments))?;
    let department = &departments[idx];
    let budget = store.department_budget(department.id).await?;
    println!(
        "Total utilized budget for {}: {}",
        department.name,
        render::format_salary(budget)
    );
    Ok(())
}

// ============================================================================
// Add handlers
// ============================================================================

async fn add_department(store: &Store) -> Result<()> {
    let name = input_text("Enter the name of the department")?;
    let id = store.add_department(&name).await?;
    println!("Department '{name}' added (id {id}).");
    Ok(())
}

async fn add_role(store: &Store) -> Result<()> {
    let departments = store.departments().await?;
    if departments.is_empty() {
        println!("Add a department first.");
        return Ok(());
    }

    let title = input_text("Enter the title of the role")?;
    let salary = input_salary("Enter the salary for the role")?;
    let idx = select("Select the department for the role", &department_labels(&departments))?;

    let id = store.add_role(&title, salary, departments[idx].id).await?;
    println!("Role '{title}' added (id {id}).");
    Ok(())
}

async fn add_employee(store: &Store) -> Result<()> {
    let roles = store.roles().await?;
    if roles.is_empty() {
        println!("Add a role first.");
        return Ok(());
    }
    let employees = store.employees().await?;

    let first_name = input_text("Enter the first name of the employee")?;
    let last_name = input_text("Enter the last name of the employee")?;
    let role_idx = select("Select the role for the employee", &role_labels(&roles))?;
    let manager_idx = select("Select the manager for the employee", &manager_labels(&employees))?;
    let manager_id = manager_choice(&employees, manager_idx);

    let id = store
        .add_employee(&first_name, &last_name, roles[role_idx].id, manager_id)
        .await?;
    println!("Employee {first_name} {last_name} added (id {id}).");
    Ok(())
}

// ============================================================================
// Update handlers
// ============================================================================

async fn update_employee_role(store: &Store) -> Result<()> {
    let employees = store.employees().await?;
    if employees.is_empty() {
        println!("No employees yet.");
        return Ok(());
    }
    let roles = store.roles().await?;
    if roles.is_empty() {
        println!("Add a role first.");
        return Ok(());
    }

    let e_idx = select("Select the employee to update", &employee_labels(&employees))?;
    let r_idx = select("Select the new role for the employee", &role_labels(&roles))?;

    store.update_employee_role(employees[e_idx].id, roles[r_idx].id).await?;
    println!(
        "Updated {} {} to role '{}'.",
        employees[e_idx].first_name, employees[e_idx].last_name, roles[r_idx].title
    );
    Ok(())
}

async fn update_employee_manager(store: &Store) -> Result<()> {
    let employees = store.employees().await?;
    if employees.is_empty() {
        println!("No employees yet.");
        return Ok(());
    }

    let e_idx = select("Select the employee to update", &employee_labels(&employees))?;
    let m_idx = select("Select the new manager for the employee", &manager_labels(&employees))?;
    let manager_id = manager_choice(&employees, m_idx);

    store.update_employee_manager(employees[e_idx].id, manager_id).await?;
    println!(
        "Updated {} {}'s manager.",
        employees[e_idx].first_name, employees[e_idx].last_name
    );
    Ok(())
}

// ============================================================================
// Delete handlers
// ============================================================================

async fn delete_department(store: &Store) -> Result<()> {
    let departments = store.departments().await?;
    if departments.is_empty() {
        println!("No departments yet.");
        return Ok(());
    }

    let idx = select("Select the department to delete", &department_labels(&departments))?;
    store.delete_department(departments[idx].id).await?;
    println!("Department '{}' deleted.", departments[idx].name);
    Ok(())
}

async fn delete_role(store: &Store) -> Result<()> {
    let roles = store.roles().await?;
    if roles.is_empty() {
        println!("No roles yet.");
        return Ok(());
    }

    let idx = select("Select the role to delete", &role_labels(&roles))?;
    store.delete_role(roles[idx].id).await?;
    println!("Role '{}' deleted.", roles[idx].title);
    Ok(())
}

async fn delete_employee(store: &Store) -> Result<()> {
    let employees = store.employees().await?;
    if employees.is_empty() {
        println!("No employees yet.");
        return Ok(());
    }

    let idx = select("Select the employee to delete", &employee_labels(&employees))?;
    store.delete_employee(employees[idx].id).await?;
    println!(
        "Employee {} {} deleted.",
        employees[idx].first_name, employees[idx].last_name
    );
    Ok(())
}

// ============================================================================
// Rendering helpers
// ============================================================================

fn print_departments(departments: &[Department]) {
    if departments.is_empty() {
        println!("No departments found.");
    } else {
        println!("{}", render::table(departments.iter().map(DepartmentRow::from)));
    }
}

fn print_roles(roles: &[RoleDetail]) {
    if roles.is_empty() {
        println!("No roles found.");
    } else {
        println!("{}", render::table(roles.iter().map(RoleRow::from)));
    }
}

fn print_employees(employees: &[EmployeeDetail]) {
    if employees.is_empty() {
        println!("No employees found.");
    } else {
        println!("{}", render::table(employees.iter().map(EmployeeRow::from)));
    }
}

// ============================================================================
// Prompt helpers
// ============================================================================

fn prompt_action() -> Result<Action> {
    let labels: Vec<&str> = Action::ALL.iter().map(|action| action.label()).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| CadreError::prompt_failed(format!("Failed to read menu selection: {e}")))?;
    Ok(Action::ALL[idx])
}

fn select(prompt: &str, labels: &[String]) -> Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(labels)
        .default(0)
        .interact()
        .map_err(|e| CadreError::prompt_failed(format!("Failed to read selection: {e}")))
}

fn input_text(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| CadreError::prompt_failed(format!("Failed to read input: {e}")))
}

/// Numeric salary input; the prompt re-asks until the value parses
fn input_salary(prompt: &str) -> Result<f64> {
    Input::<f64>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| CadreError::prompt_failed(format!("Failed to read input: {e}")))
}

// ============================================================================
// Choice builders (label by name, value by surrogate id)
// ============================================================================

fn department_labels(departments: &[Department]) -> Vec<String> {
    departments.iter().map(|d| d.name.clone()).collect()
}

fn role_labels(roles: &[RoleDetail]) -> Vec<String> {
    roles.iter().map(|r| format!("{} ({})", r.title, r.department)).collect()
}

fn employee_labels(employees: &[EmployeeDetail]) -> Vec<String> {
    employees
        .iter()
        .map(|e| format!("{} {}", e.first_name, e.last_name))
        .collect()
}

/// Manager choices lead with "None"; the remaining entries are employees
fn manager_labels(employees: &[EmployeeDetail]) -> Vec<String> {
    std::iter::once("None".to_string())
        .chain(employee_labels(employees))
        .collect()
}

/// Map a manager selection index back to an employee id
const fn manager_index_to_id(idx: usize) -> Option<usize> {
    if idx == 0 {
        None
    } else {
        Some(idx - 1)
    }
}

fn manager_choice(employees: &[EmployeeDetail], idx: usize) -> Option<u32> {
    manager_index_to_id(idx).map(|i| employees[i].id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u32, first: &str, last: &str) -> EmployeeDetail {
        EmployeeDetail {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            title: "Engineer".to_string(),
            department: "Engineering".to_string(),
            salary: 90_000.0,
            manager: None,
        }
    }

    #[test]
    fn test_menu_has_quit_last() {
        assert_eq!(Action::ALL[Action::ALL.len() - 1], Action::Quit);
    }

    #[test]
    fn test_action_labels_are_unique() {
        let mut labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Action::ALL.len());
    }

    #[test]
    fn test_department_labels_use_names() {
        let departments = vec![
            Department { id: 7, name: "Engineering".to_string() },
            Department { id: 9, name: "Sales".to_string() },
        ];
        assert_eq!(department_labels(&departments), vec!["Engineering", "Sales"]);
    }

    #[test]
    fn test_role_labels_include_department() {
        let roles = vec![RoleDetail {
            id: 1,
            title: "Accountant".to_string(),
            salary: 65_000.0,
            department: "Finance".to_string(),
        }];
        assert_eq!(role_labels(&roles), vec!["Accountant (Finance)"]);
    }

    #[test]
    fn test_employee_labels_use_full_names() {
        let employees = vec![employee(1, "Ada", "Lovelace"), employee(2, "Grace", "Hopper")];
        assert_eq!(employee_labels(&employees), vec!["Ada Lovelace", "Grace Hopper"]);
    }

    #[test]
    fn test_manager_labels_lead_with_none() {
        let employees = vec![employee(1, "Ada", "Lovelace")];
        assert_eq!(manager_labels(&employees), vec!["None", "Ada Lovelace"]);
    }

    #[test]
    fn test_manager_choice_none() {
        let employees = vec![employee(4, "Ada", "Lovelace")];
        assert_eq!(manager_choice(&employees, 0), None);
    }

    #[test]
    fn test_manager_choice_maps_offset_index() {
        let employees = vec![employee(4, "Ada", "Lovelace"), employee(8, "Grace", "Hopper")];
        assert_eq!(manager_choice(&employees, 1), Some(4));
        assert_eq!(manager_choice(&employees, 2), Some(8));
    }
}
