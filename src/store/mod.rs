//! Data Access Layer
//!
//! This module owns the bounded MySQL connection pool and exposes the fixed
//! set of named operations the menu dispatches to.
//!
//! # Design
//! - One generic row-returning primitive (`fetch`) and one mutation
//!   primitive (`execute`); every named operation is a single parameterized
//!   statement built on top of them.
//! - Each operation checks exactly one connection out of the pool and
//!   returns it when the checkout is dropped, on success or failure.
//! - Rows are mapped into explicit typed records, never untyped maps.
//! - Driver failures are mapped into [`CadreError`] with their message and
//!   propagated unchanged; no retry, no partial-result suppression.
//!
//! # Implementation Notes
//! - Uses `mysql_async` (async driver, requires tokio runtime)
//! - Statements use `?` placeholders with positional tuple params
//! - The "total utilized budget" aggregate fetches the department's roles
//!   and sums salaries client-side rather than in SQL

use mysql_async::{prelude::*, OptsBuilder, Params, Pool, PoolConstraints, PoolOpts, Row};

pub mod schema;

use crate::config::DbConfig;
use crate::error::{CadreError, Result};

/// A department row
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: u32,
    pub name: String,
}

/// A role row
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: u32,
    pub title: String,
    pub salary: f64,
    pub department_id: u32,
}

/// A role joined to its department name, for listing
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDetail {
    pub id: u32,
    pub title: String,
    pub salary: f64,
    pub department: String,
}

/// An employee row
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub role_id: u32,
    pub manager_id: Option<u32>,
}

/// Denormalized employee view: role title, department name, salary, and the
/// manager's full name via the aliased self-join
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDetail {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub department: String,
    pub salary: f64,
    pub manager: Option<String>,
}

/// Outcome of a mutation statement
struct ExecOutcome {
    last_insert_id: Option<u64>,
}

/// Bounded-pool handle to the MySQL store
///
/// Created once at startup with [`Store::connect`] and closed once at
/// process exit with [`Store::disconnect`].
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Build the connection pool from the resolved configuration
    ///
    /// Pool creation is lazy; no connection is opened until the first
    /// operation checks one out.
    pub fn connect(config: &DbConfig) -> Result<Self> {
        let constraints =
            PoolConstraints::new(config.pool_min, config.pool_max).ok_or_else(|| {
                CadreError::invalid_input(format!(
                    "Invalid pool bounds {}..{}",
                    config.pool_min, config.pool_max
                ))
            })?;

        let opts = OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()))
            .pool_opts(PoolOpts::default().with_constraints(constraints));

        Ok(Self { pool: Pool::new(opts) })
    }

    /// Create the tables if they do not exist yet
    ///
    /// Idempotent bootstrap, not migration tooling: plain
    /// `CREATE TABLE IF NOT EXISTS`, executed in foreign-key order.
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.pool.get_conn().await.map_err(|e| {
            CadreError::connection_failed(format!("Failed to check out a connection: {e}"))
        })?;

        for ddl in schema::CREATE_TABLES {
            conn.query_drop(ddl).await.map_err(|e| {
                CadreError::query_failed(format!("Failed to create schema: {e}"))
            })?;
        }

        Ok(())
    }

    /// Drain and close the pool
    pub async fn disconnect(self) -> Result<()> {
        self.pool
            .disconnect()
            .await
            .map_err(|e| CadreError::connection_failed(format!("Failed to close the pool: {e}")))
    }

    /// Execute a row-returning statement and map each row into a record
    ///
    /// The connection is returned to the pool when the checkout is dropped,
    /// whether execution succeeded or failed.
    async fn fetch<T, P, F>(&self, query: &str, params: P, map_row: F) -> Result<Vec<T>>
    where
        P: Into<Params> + Send,
        F: Fn(&Row) -> Result<T>,
    {
        let mut conn = self.pool.get_conn().await.map_err(|e| {
            CadreError::connection_failed(format!("Failed to check out a connection: {e}"))
        })?;

        let rows: Vec<Row> = conn.exec(query, params).await.map_err(|e| {
            CadreError::query_failed(format!("Failed to execute query: {e}"))
        })?;

        rows.iter().map(|row| map_row(row)).collect()
    }

    /// Execute a mutation statement (INSERT, UPDATE, DELETE)
    async fn execute<P>(&self, query: &str, params: P) -> Result<ExecOutcome>
    where
        P: Into<Params> + Send,
    {
        let mut conn = self.pool.get_conn().await.map_err(|e| {
            CadreError::connection_failed(format!("Failed to check out a connection: {e}"))
        })?;

        let result = conn.exec_iter(query, params).await.map_err(|e| {
            CadreError::query_failed(format!("Failed to execute statement: {e}"))
        })?;

        let last_insert_id = result.last_insert_id();
        drop(result);

        Ok(ExecOutcome { last_insert_id })
    }

    /// List all departments
    pub async fn departments(&self) -> Result<Vec<Department>> {
        self.fetch(
            "SELECT id, name FROM department ORDER BY id",
            (),
            department_from_row,
        )
        .await
    }

    /// List all roles with their department names
    pub async fn roles(&self) -> Result<Vec<RoleDetail>> {
        self.fetch(
            "SELECT r.id, r.title, r.salary, d.name
             FROM role r
             JOIN department d ON d.id = r.department_id
             ORDER BY r.id",
            (),
            role_detail_from_row,
        )
        .await
    }

    /// List all employees in the denormalized view
    pub async fn employees(&self) -> Result<Vec<EmployeeDetail>> {
        self.fetch(
            &format!("{EMPLOYEE_DETAIL_SELECT} ORDER BY e.id"),
            (),
            employee_detail_from_row,
        )
        .await
    }

    /// List employees reporting to the given manager
    pub async fn employees_by_manager(&self, manager_id: u32) -> Result<Vec<EmployeeDetail>> {
        self.fetch(
            &format!("{EMPLOYEE_DETAIL_SELECT} WHERE e.manager_id = ? ORDER BY e.id"),
            (manager_id,),
            employee_detail_from_row,
        )
        .await
    }

    /// List employees in the given department, via their role's department id
    pub async fn employees_by_department(&self, department_id: u32) -> Result<Vec<EmployeeDetail>> {
        self.fetch(
            &format!("{EMPLOYEE_DETAIL_SELECT} WHERE r.department_id = ? ORDER BY e.id"),
            (department_id,),
            employee_detail_from_row,
        )
        .await
    }

    /// Fetch a single employee row by id
    pub async fn employee(&self, id: u32) -> Result<Option<Employee>> {
        let rows = self
            .fetch(
                "SELECT id, first_name, last_name, role_id, manager_id
                 FROM employee
                 WHERE id = ?",
                (id,),
                employee_from_row,
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Sum of salaries across all roles in a department ("total utilized
    /// budget"), reduced client-side
    pub async fn department_budget(&self, department_id: u32) -> Result<f64> {
        let roles = self
            .fetch(
                "SELECT id, title, salary, department_id
                 FROM role
                 WHERE department_id = ?",
                (department_id,),
                role_from_row,
            )
            .await?;

        Ok(sum_salaries(&roles))
    }

    /// Insert a department and return its new id
    pub async fn add_department(&self, name: &str) -> Result<u32> {
        let outcome = self
            .execute("INSERT INTO department (name) VALUES (?)", (name,))
            .await?;
        new_row_id(outcome)
    }

    /// Insert a role and return its new id
    pub async fn add_role(&self, title: &str, salary: f64, department_id: u32) -> Result<u32> {
        let outcome = self
            .execute(
                "INSERT INTO role (title, salary, department_id) VALUES (?, ?, ?)",
                (title, salary, department_id),
            )
            .await?;
        new_row_id(outcome)
    }

    /// Insert an employee and return the new id
    pub async fn add_employee(
        &self,
        first_name: &str,
        last_name: &str,
        role_id: u32,
        manager_id: Option<u32>,
    ) -> Result<u32> {
        let outcome = self
            .execute(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES (?, ?, ?, ?)",
                (first_name, last_name, role_id, manager_id),
            )
            .await?;
        new_row_id(outcome)
    }

    /// Reassign an employee's role
    pub async fn update_employee_role(&self, employee_id: u32, role_id: u32) -> Result<()> {
        self.execute(
            "UPDATE employee SET role_id = ? WHERE id = ?",
            (role_id, employee_id),
        )
        .await?;
        Ok(())
    }

    /// Reassign an employee's manager (or clear it)
    pub async fn update_employee_manager(
        &self,
        employee_id: u32,
        manager_id: Option<u32>,
    ) -> Result<()> {
        self.execute(
            "UPDATE employee SET manager_id = ? WHERE id = ?",
            (manager_id, employee_id),
        )
        .await?;
        Ok(())
    }

    /// Delete a department by id
    ///
    /// Referenced departments are not guarded here; the database's
    /// foreign-key policy decides the outcome.
    pub async fn delete_department(&self, id: u32) -> Result<()> {
        self.execute("DELETE FROM department WHERE id = ?", (id,)).await?;
        Ok(())
    }

    /// Delete a role by id
    pub async fn delete_role(&self, id: u32) -> Result<()> {
        self.execute("DELETE FROM role WHERE id = ?", (id,)).await?;
        Ok(())
    }

    /// Delete an employee by id
    pub async fn delete_employee(&self, id: u32) -> Result<()> {
        self.execute("DELETE FROM employee WHERE id = ?", (id,)).await?;
        Ok(())
    }
}

/// Shared SELECT for the denormalized employee view
///
/// The self-join is aliased (`m`) to resolve the manager's full name.
const EMPLOYEE_DETAIL_SELECT: &str = "SELECT e.id, e.first_name, e.last_name, r.title, d.name, r.salary,
        CONCAT(m.first_name, ' ', m.last_name)
 FROM employee e
 JOIN role r ON r.id = e.role_id
 JOIN department d ON d.id = r.department_id
 LEFT JOIN employee m ON m.id = e.manager_id";

fn department_from_row(row: &Row) -> Result<Department> {
    Ok(Department {
        id: row
            .get(0)
            .ok_or_else(|| CadreError::query_failed("Failed to extract department id"))?,
        name: row
            .get(1)
            .ok_or_else(|| CadreError::query_failed("Failed to extract department name"))?,
    })
}

fn role_from_row(row: &Row) -> Result<Role> {
    Ok(Role {
        id: row
            .get(0)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role id"))?,
        title: row
            .get(1)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role title"))?,
        salary: row
            .get(2)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role salary"))?,
        department_id: row
            .get(3)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role department id"))?,
    })
}

fn role_detail_from_row(row: &Row) -> Result<RoleDetail> {
    Ok(RoleDetail {
        id: row
            .get(0)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role id"))?,
        title: row
            .get(1)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role title"))?,
        salary: row
            .get(2)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role salary"))?,
        department: row
            .get(3)
            .ok_or_else(|| CadreError::query_failed("Failed to extract department name"))?,
    })
}

fn employee_from_row(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: row
            .get(0)
            .ok_or_else(|| CadreError::query_failed("Failed to extract employee id"))?,
        first_name: row
            .get(1)
            .ok_or_else(|| CadreError::query_failed("Failed to extract first name"))?,
        last_name: row
            .get(2)
            .ok_or_else(|| CadreError::query_failed("Failed to extract last name"))?,
        role_id: row
            .get(3)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role id"))?,
        manager_id: row.get(4),
    })
}

fn employee_detail_from_row(row: &Row) -> Result<EmployeeDetail> {
    Ok(EmployeeDetail {
        id: row
            .get(0)
            .ok_or_else(|| CadreError::query_failed("Failed to extract employee id"))?,
        first_name: row
            .get(1)
            .ok_or_else(|| CadreError::query_failed("Failed to extract first name"))?,
        last_name: row
            .get(2)
            .ok_or_else(|| CadreError::query_failed("Failed to extract last name"))?,
        title: row
            .get(3)
            .ok_or_else(|| CadreError::query_failed("Failed to extract role title"))?,
        department: row
            .get(4)
            .ok_or_else(|| CadreError::query_failed("Failed to extract department name"))?,
        salary: row
            .get(5)
            .ok_or_else(|| CadreError::query_failed("Failed to extract salary"))?,
        manager: row.get(6),
    })
}

/// Extract the auto-assigned id from an insert outcome
fn new_row_id(outcome: ExecOutcome) -> Result<u32> {
    let id = outcome
        .last_insert_id
        .ok_or_else(|| CadreError::query_failed("Insert returned no generated id"))?;

    u32::try_from(id)
        .map_err(|_| CadreError::query_failed(format!("Generated id {id} out of range")))
}

/// Client-side reduction for the department budget
fn sum_salaries(roles: &[Role]) -> f64 {
    roles.iter().map(|role| role.salary).sum()
}
