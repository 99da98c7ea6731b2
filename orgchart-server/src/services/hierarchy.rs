//! 上下级层级
//!
//! 员工通过 `supervisor_id` 组成森林。本模块负责:
//! - 子树查询 (SQL 递归 CTE, 脏数据成环时也能终止)
//! - 树视图构建 (`show_subordinates = false` 的节点折叠)
//! - 重新指派上级 / 批量转移下属, 均在单个事务内完成防环检查

use std::collections::{HashMap, HashSet};
#[cfg(test)]
use std::collections::VecDeque;

use shared::error::ErrorCode;
use shared::models::{Employee, EmployeeView, TreeNode};
use sqlx::SqlitePool;

use crate::db::repository::employee;
use crate::db::repository::{RepoError, RepoResult};

pub use crate::db::repository::employee::ensure_can_reparent;

fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
}

/// 按上级分组的直属下属索引, 保持输入顺序
fn reports_index(rows: &[EmployeeView]) -> HashMap<i64, Vec<&EmployeeView>> {
    let mut index: HashMap<i64, Vec<&EmployeeView>> = HashMap::new();
    for row in rows {
        if let Some(sid) = row.supervisor_id {
            index.entry(sid).or_default().push(row);
        }
    }
    index
}

/// `root` 的全部下属 (不含 root), 广度优先, 每人一次
///
/// 不看 `show_subordinates`, 折叠只影响展示。运行时走 SQL 递归 CTE
/// ([`employee::subtree`]), 这里的内存遍历用于测试中核对其结果。
#[cfg(test)]
pub(crate) fn collect_subtree(rows: &[EmployeeView], root: i64) -> Vec<i64> {
    let index = reports_index(rows);
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut out = Vec::new();

    while let Some(id) = queue.pop_front() {
        for report in index.get(&id).into_iter().flatten() {
            if visited.insert(report.id) {
                out.push(report.id);
                queue.push_back(report.id);
            }
        }
    }
    out
}

fn build_node(
    row: &EmployeeView,
    index: &HashMap<i64, Vec<&EmployeeView>>,
    visited: &mut HashSet<i64>,
) -> TreeNode {
    let reports = index.get(&row.id).map(Vec::as_slice).unwrap_or_default();
    let collapsed = !row.show_subordinates;

    let mut children = Vec::new();
    if !collapsed {
        for report in reports {
            if visited.insert(report.id) {
                children.push(build_node(report, index, visited));
            }
        }
    }

    TreeNode {
        id: row.id,
        full_name: row.full_name.clone(),
        position_name: row.position_name.clone(),
        subordinate_count: reports.len(),
        collapsed,
        children,
    }
}

/// 构建树视图
///
/// - `root = None`: 所有无上级员工组成的森林
/// - `root = Some(id)`: 以该员工为根的单棵树 (不在 `rows` 中时为空)
pub fn build_forest(rows: &[EmployeeView], root: Option<i64>) -> Vec<TreeNode> {
    let index = reports_index(rows);
    let roots: Vec<&EmployeeView> = match root {
        Some(id) => rows.iter().filter(|r| r.id == id).take(1).collect(),
        None => rows.iter().filter(|r| r.supervisor_id.is_none()).collect(),
    };

    let mut visited: HashSet<i64> = roots.iter().map(|r| r.id).collect();
    roots
        .into_iter()
        .map(|r| build_node(r, &index, &mut visited))
        .collect()
}

/// 加载并构建树视图
pub async fn load_forest(pool: &SqlitePool, root: Option<i64>) -> RepoResult<Vec<TreeNode>> {
    let rows = match root {
        Some(id) => {
            let head = employee::find_view(pool, id).await?.ok_or_else(|| not_found(id))?;
            let mut rows = vec![head];
            rows.extend(employee::subtree(pool, id).await?);
            rows
        }
        None => employee::find_all_views(pool).await?,
    };
    Ok(build_forest(&rows, root))
}

/// 完整下属列表 (平铺)
pub async fn subordinates(pool: &SqlitePool, root: i64) -> RepoResult<Vec<EmployeeView>> {
    if employee::find_by_id(pool, root).await?.is_none() {
        return Err(not_found(root));
    }
    employee::subtree(pool, root).await
}

/// 重新指派上级, 整棵子树随之移动; `None` 使其成为根
pub async fn update_supervisor(
    pool: &SqlitePool,
    employee_id: i64,
    supervisor_id: Option<i64>,
) -> RepoResult<Employee> {
    let mut tx = pool.begin().await?;

    if !employee::exists(&mut tx, employee_id).await? {
        return Err(not_found(employee_id));
    }
    if let Some(sid) = supervisor_id {
        ensure_can_reparent(&mut tx, employee_id, sid).await?;
    }
    employee::set_supervisor(&mut tx, employee_id, supervisor_id).await?;

    tx.commit().await?;

    tracing::info!(employee_id, ?supervisor_id, "Supervisor updated");
    employee::find_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| not_found(employee_id))
}

/// 把 `from` 的直属下属全部转到 `to` 名下 (`None` 则成为根)
///
/// `to` 不能是 `from` 本人, 也不能在 `from` 的子树内。返回移动人数。
pub async fn reassign_subordinates(
    pool: &SqlitePool,
    from: i64,
    to: Option<i64>,
) -> RepoResult<u64> {
    let mut tx = pool.begin().await?;

    if !employee::exists(&mut tx, from).await? {
        return Err(not_found(from));
    }
    if let Some(target) = to {
        if target == from {
            return Err(RepoError::Business(
                ErrorCode::InvalidRequest,
                "Subordinates are already assigned to this employee".into(),
            ));
        }
        if !employee::exists(&mut tx, target).await? {
            return Err(RepoError::Business(
                ErrorCode::SupervisorNotFound,
                format!("Supervisor {target} not found"),
            ));
        }
        if employee::is_in_subtree(&mut tx, from, target).await? {
            return Err(RepoError::Business(
                ErrorCode::HierarchyCycle,
                format!("Employee {target} is a subordinate of employee {from}"),
            ));
        }
    }

    let moved = employee::move_reports(&mut tx, from, to).await?;
    tx.commit().await?;

    tracing::info!(from, ?to, moved, "Subordinates reassigned");
    Ok(moved)
}
