//! Schema bootstrap DDL
//!
//! Singular table names, unique department names. `role` references
//! `department`, `employee` references `role` and (optionally) another
//! `employee` as manager.

/// Departments: surrogate key plus a unique display label
pub const CREATE_DEPARTMENT: &str = "CREATE TABLE IF NOT EXISTS department (
    id INT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(64) NOT NULL UNIQUE
)";

/// Roles: title, salary, owning department
pub const CREATE_ROLE: &str = "CREATE TABLE IF NOT EXISTS role (
    id INT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    title VARCHAR(64) NOT NULL,
    salary DECIMAL(10,2) NOT NULL,
    department_id INT UNSIGNED NOT NULL,
    FOREIGN KEY (department_id) REFERENCES department (id)
)";

/// Employees: name, role, nullable self-referential manager
pub const CREATE_EMPLOYEE: &str = "CREATE TABLE IF NOT EXISTS employee (
    id INT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    first_name VARCHAR(64) NOT NULL,
    last_name VARCHAR(64) NOT NULL,
    role_id INT UNSIGNED NOT NULL,
    manager_id INT UNSIGNED NULL,
    FOREIGN KEY (role_id) REFERENCES role (id),
    FOREIGN KEY (manager_id) REFERENCES employee (id)
)";

/// All statements in foreign-key order
pub const CREATE_TABLES: [&str; 3] = [CREATE_DEPARTMENT, CREATE_ROLE, CREATE_EMPLOYEE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        for ddl in CREATE_TABLES {
            assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_referenced_tables_come_first() {
        let position = |name: &str| {
            CREATE_TABLES
                .iter()
                .position(|ddl| ddl.contains(&format!("EXISTS {name} ")))
                .unwrap()
        };
        assert!(position("department") < position("role"));
        assert!(position("role") < position("employee"));
    }

    #[test]
    fn test_department_name_is_unique() {
        assert!(CREATE_DEPARTMENT.contains("UNIQUE"));
    }

    #[test]
    fn test_manager_is_nullable() {
        assert!(CREATE_EMPLOYEE.contains("manager_id INT UNSIGNED NULL"));
    }
}
