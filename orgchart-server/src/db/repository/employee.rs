//! Employee Repository
//!
//! Subtree reads use a recursive CTE with `UNION` (set semantics), so a
//! walk terminates even over cyclic rows.

use super::{RepoError, RepoResult};
use crate::services::query::{SearchFilter, SortSpec, like_pattern};
use crate::utils::types::PageRequest;
use shared::error::ErrorCode;
use shared::models::{
    Employee, EmployeeCreate, EmployeeDetail, EmployeeSummary, EmployeeUpdate, EmployeeView,
};
use shared::types::Page;
use shared::util::{now_millis, snowflake_id};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const EMPLOYEE_SELECT: &str = "SELECT id, full_name, email, hire_date, position_id, supervisor_id, \
     show_subordinates, created_at, updated_at FROM employee";

const VIEW_SELECT: &str = "SELECT e.id, e.full_name, e.email, e.hire_date, e.position_id, \
     p.name AS position_name, e.supervisor_id, s.full_name AS supervisor_name, e.show_subordinates \
     FROM employee e \
     LEFT JOIN position p ON p.id = e.position_id \
     LEFT JOIN employee s ON s.id = e.supervisor_id";

const COUNT_SELECT: &str = "SELECT COUNT(*) FROM employee e \
     LEFT JOIN position p ON p.id = e.position_id \
     LEFT JOIN employee s ON s.id = e.supervisor_id";

const SUMMARY_SELECT: &str = "SELECT e.id, e.full_name, p.name AS position_name \
     FROM employee e LEFT JOIN position p ON p.id = e.position_id";

/// Transitive subordinates of `?1`, which may itself appear when rows are cyclic
const SUBTREE_CTE: &str = "WITH RECURSIVE sub(id) AS ( \
     SELECT id FROM employee WHERE supervisor_id = ?1 \
     UNION \
     SELECT e.id FROM employee e JOIN sub ON e.supervisor_id = sub.id)";

fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
}

// ── Reads ─────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!("{EMPLOYEE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn find_view(pool: &SqlitePool, id: i64) -> RepoResult<Option<EmployeeView>> {
    let view = sqlx::query_as::<_, EmployeeView>(&format!("{VIEW_SELECT} WHERE e.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(view)
}

/// Employee with supervisor summary and direct reports
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<EmployeeDetail> {
    let employee = find_view(pool, id).await?.ok_or_else(|| not_found(id))?;

    let supervisor = match employee.supervisor_id {
        Some(sid) => sqlx::query_as::<_, EmployeeSummary>(&format!("{SUMMARY_SELECT} WHERE e.id = ?"))
            .bind(sid)
            .fetch_optional(pool)
            .await?,
        None => None,
    };
    let subordinates = direct_reports(pool, id).await?;

    Ok(EmployeeDetail {
        employee,
        supervisor,
        subordinates,
    })
}

pub async fn direct_reports(pool: &SqlitePool, id: i64) -> RepoResult<Vec<EmployeeSummary>> {
    let reports = sqlx::query_as::<_, EmployeeSummary>(&format!(
        "{SUMMARY_SELECT} WHERE e.supervisor_id = ? ORDER BY e.full_name COLLATE NOCASE, e.id"
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(reports)
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: Option<&SearchFilter>) {
    match filter {
        None => {}
        Some(SearchFilter::HireDate { from, to }) => {
            qb.push(" WHERE e.hire_date BETWEEN ")
                .push_bind(*from)
                .push(" AND ")
                .push_bind(*to);
        }
        Some(SearchFilter::Text(term)) => {
            let pattern = like_pattern(term);
            qb.push(" WHERE (e.full_name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR e.email LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR p.name LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
    }
}

/// One page of the filtered, sorted listing
pub async fn list(
    pool: &SqlitePool,
    filter: Option<&SearchFilter>,
    sort: SortSpec,
    page: PageRequest,
) -> RepoResult<Page<EmployeeView>> {
    let mut count = QueryBuilder::<Sqlite>::new(COUNT_SELECT);
    push_filter(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY ")
        .push(sort.order_by())
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    let items = qb.build_query_as::<EmployeeView>().fetch_all(pool).await?;

    Ok(Page::new(items, total.max(0) as u64, page.page, page.page_size))
}

/// Every employee, name-ordered (tree building)
pub async fn find_all_views(pool: &SqlitePool) -> RepoResult<Vec<EmployeeView>> {
    let views = sqlx::query_as::<_, EmployeeView>(&format!(
        "{VIEW_SELECT} ORDER BY e.full_name COLLATE NOCASE, e.id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(views)
}

/// Transitive subordinates of `root`, root excluded, each once
pub async fn subtree(pool: &SqlitePool, root: i64) -> RepoResult<Vec<EmployeeView>> {
    let views = sqlx::query_as::<_, EmployeeView>(&format!(
        "{SUBTREE_CTE} {VIEW_SELECT} WHERE e.id IN (SELECT id FROM sub) AND e.id <> ?1 \
         ORDER BY e.full_name COLLATE NOCASE, e.id"
    ))
    .bind(root)
    .fetch_all(pool)
    .await?;
    Ok(views)
}

pub(crate) async fn exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM employee WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn position_exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM position WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Whether `candidate` is a transitive subordinate of `root`
pub(crate) async fn is_in_subtree(
    conn: &mut SqliteConnection,
    root: i64,
    candidate: i64,
) -> RepoResult<bool> {
    let found: bool = sqlx::query_scalar(&format!(
        "{SUBTREE_CTE} SELECT EXISTS(SELECT 1 FROM sub WHERE id = ?2)"
    ))
    .bind(root)
    .bind(candidate)
    .fetch_one(&mut *conn)
    .await?;
    Ok(found)
}

// ── Hierarchy checks ──────────────────────────────────────

/// Rejects a supervisor assignment that would break the tree
///
/// The new supervisor must exist, differ from the employee and lie outside
/// the employee's subtree.
pub async fn ensure_can_reparent(
    conn: &mut SqliteConnection,
    employee_id: i64,
    supervisor_id: i64,
) -> RepoResult<()> {
    if employee_id == supervisor_id {
        return Err(RepoError::Business(
            ErrorCode::SelfSupervision,
            "An employee cannot supervise themselves".into(),
        ));
    }
    if !exists(conn, supervisor_id).await? {
        return Err(RepoError::Business(
            ErrorCode::SupervisorNotFound,
            format!("Supervisor {supervisor_id} not found"),
        ));
    }
    if is_in_subtree(conn, employee_id, supervisor_id).await? {
        return Err(RepoError::Business(
            ErrorCode::HierarchyCycle,
            format!("Employee {supervisor_id} is a subordinate of employee {employee_id}"),
        ));
    }
    Ok(())
}

// ── Writes ────────────────────────────────────────────────

pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    let id = snowflake_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;

    if let Some(pid) = data.position_id
        && !position_exists(&mut tx, pid).await?
    {
        return Err(RepoError::Business(
            ErrorCode::PositionNotFound,
            format!("Position {pid} not found"),
        ));
    }
    if let Some(sid) = data.supervisor_id
        && !exists(&mut tx, sid).await?
    {
        return Err(RepoError::Business(
            ErrorCode::SupervisorNotFound,
            format!("Supervisor {sid} not found"),
        ));
    }

    sqlx::query(
        "INSERT INTO employee (id, full_name, email, hire_date, position_id, supervisor_id, \
         show_subordinates, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(data.full_name.trim())
    .bind(data.email.trim())
    .bind(data.hire_date)
    .bind(data.position_id)
    .bind(data.supervisor_id)
    .bind(data.show_subordinates)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Partial update; `Some(None)` clears a nullable reference
pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    let mut tx = pool.begin().await?;

    if !exists(&mut tx, id).await? {
        return Err(not_found(id));
    }
    if let Some(Some(pid)) = data.position_id
        && !position_exists(&mut tx, pid).await?
    {
        return Err(RepoError::Business(
            ErrorCode::PositionNotFound,
            format!("Position {pid} not found"),
        ));
    }
    if let Some(Some(sid)) = data.supervisor_id {
        ensure_can_reparent(&mut tx, id, sid).await?;
    }

    sqlx::query(
        "UPDATE employee SET \
         full_name = COALESCE(?1, full_name), \
         email = COALESCE(?2, email), \
         hire_date = COALESCE(?3, hire_date), \
         position_id = CASE WHEN ?4 THEN ?5 ELSE position_id END, \
         supervisor_id = CASE WHEN ?6 THEN ?7 ELSE supervisor_id END, \
         show_subordinates = COALESCE(?8, show_subordinates), \
         updated_at = ?9 \
         WHERE id = ?10",
    )
    .bind(data.full_name.as_deref().map(str::trim))
    .bind(data.email.as_deref().map(str::trim))
    .bind(data.hire_date)
    .bind(data.position_id.is_some())
    .bind(data.position_id.flatten())
    .bind(data.supervisor_id.is_some())
    .bind(data.supervisor_id.flatten())
    .bind(data.show_subordinates)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Delete an employee; direct reports become roots
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let released = move_reports(&mut tx, id, None).await?;

    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    tx.commit().await?;
    tracing::debug!(employee_id = id, released, "Employee deleted");
    Ok(true)
}

pub(crate) async fn set_supervisor(
    conn: &mut SqliteConnection,
    id: i64,
    supervisor_id: Option<i64>,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE employee SET supervisor_id = ?, updated_at = ? WHERE id = ?")
        .bind(supervisor_id)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Points every direct report of `from` at `to`; returns how many moved
pub(crate) async fn move_reports(
    conn: &mut SqliteConnection,
    from: i64,
    to: Option<i64>,
) -> RepoResult<u64> {
    let rows =
        sqlx::query("UPDATE employee SET supervisor_id = ?, updated_at = ? WHERE supervisor_id = ?")
            .bind(to)
            .bind(now_millis())
            .bind(from)
            .execute(&mut *conn)
            .await?;
    Ok(rows.rows_affected())
}
