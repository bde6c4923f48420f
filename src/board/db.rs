use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, params};

use super::models::*;
use super::status;

/// Async-safe handle to the board database.
///
/// Wraps `BoardDb` behind `Arc<Mutex>` and runs all access on tokio's
/// blocking thread pool via `spawn_blocking`, keeping synchronous SQLite
/// I/O off the async worker threads.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<std::sync::Mutex<BoardDb>>,
}

impl DbHandle {
    pub fn new(db: BoardDb) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(db)),
        }
    }

    /// Run a closure with access to the database on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&BoardDb) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
            f(&guard)
        })
        .await
        .context("DB task panicked")?
    }
}

pub struct BoardDb {
    conn: Connection,
}

/// Current time as an RFC 3339 UTC string, the format the API emits.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl BoardDb {
    /// Open (or create) a SQLite database at the given path and run migrations.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Create an in-memory SQLite database (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        self.run_migrations().context("Failed to run migrations")?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS boards (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    board_id INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    description TEXT,
                    status TEXT NOT NULL DEFAULT 'TODO',
                    priority TEXT NOT NULL DEFAULT 'MEDIUM',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS columns (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    board_id INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    status TEXT NOT NULL,
                    position INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_board ON tasks(board_id);
                CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(board_id, status);
                CREATE INDEX IF NOT EXISTS idx_columns_board ON columns(board_id);
                CREATE UNIQUE INDEX IF NOT EXISTS idx_columns_board_status
                    ON columns(board_id, status);
                ",
            )
            .context("Failed to create tables")?;
        Ok(())
    }

    // ── Board CRUD ────────────────────────────────────────────────────

    pub fn create_board(&self, title: &str, description: Option<&str>) -> Result<Board> {
        let ts = now();
        self.conn
            .execute(
                "INSERT INTO boards (title, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params![title, description, ts],
            )
            .context("Failed to insert board")?;
        let id = self.conn.last_insert_rowid();
        self.get_board(id)?.context("Board not found after insert")
    }

    pub fn list_boards(&self) -> Result<Vec<Board>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, description, created_at, updated_at
                 FROM boards ORDER BY id",
            )
            .context("Failed to prepare list_boards")?;
        let rows = stmt
            .query_map([], board_from_row)
            .context("Failed to query boards")?;
        let mut boards = Vec::new();
        for row in rows {
            boards.push(row.context("Failed to read board row")?);
        }
        Ok(boards)
    }

    pub fn get_board(&self, id: i64) -> Result<Option<Board>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, description, created_at, updated_at
                 FROM boards WHERE id = ?1",
            )
            .context("Failed to prepare get_board")?;
        let mut rows = stmt
            .query_map(params![id], board_from_row)
            .context("Failed to query board")?;
        match rows.next() {
            Some(row) => Ok(Some(row.context("Failed to read board row")?)),
            None => Ok(None),
        }
    }

    /// Partial update. Returns `Ok(None)` when the board does not exist.
    pub fn update_board(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Board>> {
        if self.get_board(id)?.is_none() {
            return Ok(None);
        }

        // unchecked_transaction keeps the field updates atomic; the
        // DbHandle mutex already guarantees single-threaded access.
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;
        let ts = now();
        if let Some(t) = title {
            tx.execute(
                "UPDATE boards SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![t, ts, id],
            )
            .context("Failed to update board title")?;
        }
        if let Some(d) = description {
            tx.execute(
                "UPDATE boards SET description = ?1, updated_at = ?2 WHERE id = ?3",
                params![d, ts, id],
            )
            .context("Failed to update board description")?;
        }
        tx.commit().context("Failed to commit board update")?;
        self.get_board(id)
    }

    /// Deletes the board. Owned tasks and columns go with it in the same
    /// statement via `ON DELETE CASCADE`, so the removal is atomic.
    pub fn delete_board(&self, id: i64) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM boards WHERE id = ?1", params![id])
            .context("Failed to delete board")?;
        Ok(count > 0)
    }

    pub fn get_board_detail(&self, id: i64) -> Result<Option<BoardDetail>> {
        let board = match self.get_board(id)? {
            Some(b) => b,
            None => return Ok(None),
        };
        let tasks = self.list_tasks(Some(id), None)?;
        Ok(Some(BoardDetail { board, tasks }))
    }

    /// The grouped view the client renders: effective columns (statics
    /// merged ahead of stored columns) with each board task filed under
    /// its status.
    pub fn get_board_view(&self, id: i64) -> Result<Option<BoardView>> {
        let board = match self.get_board(id)? {
            Some(b) => b,
            None => return Ok(None),
        };
        let tasks = self.list_tasks(Some(id), None)?;
        let columns = self.list_columns(Some(id))?;
        Ok(Some(BoardView {
            board,
            columns: status::group_tasks(&columns, &tasks),
        }))
    }

    // ── Task CRUD ─────────────────────────────────────────────────────

    pub fn create_task(
        &self,
        board_id: i64,
        title: &str,
        description: Option<&str>,
        task_status: &str,
        priority: Priority,
    ) -> Result<Task> {
        let ts = now();
        self.conn
            .execute(
                "INSERT INTO tasks (board_id, title, description, status, priority, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![board_id, title, description, task_status, priority.as_str(), ts],
            )
            .context("Failed to insert task")?;
        let id = self.conn.last_insert_rowid();
        self.get_task(id)?.context("Task not found after insert")
    }

    pub fn list_tasks(&self, board_id: Option<i64>, task_status: Option<&str>) -> Result<Vec<Task>> {
        let mut sql = String::from(
            "SELECT id, board_id, title, description, status, priority, created_at, updated_at
             FROM tasks",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(b) = board_id {
            clauses.push("board_id = ?");
            args.push(Box::new(b));
        }
        if let Some(s) = task_status {
            clauses.push("status = ?");
            args.push(Box::new(s.to_string()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql).context("Failed to prepare list_tasks")?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args), task_row_from_row)
            .context("Failed to query tasks")?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.context("Failed to read task row")?.into_task()?);
        }
        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, board_id, title, description, status, priority, created_at, updated_at
                 FROM tasks WHERE id = ?1",
            )
            .context("Failed to prepare get_task")?;
        let mut rows = stmt
            .query_map(params![id], task_row_from_row)
            .context("Failed to query task")?;
        match rows.next() {
            Some(row) => Ok(Some(row.context("Failed to read task row")?.into_task()?)),
            None => Ok(None),
        }
    }

    /// Partial update. Status assignment is a plain field write: any string
    /// is accepted, with no transition rules. Returns `Ok(None)` when the
    /// task does not exist.
    pub fn update_task(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
        task_status: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<Option<Task>> {
        if self.get_task(id)?.is_none() {
            return Ok(None);
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;
        let ts = now();
        if let Some(t) = title {
            tx.execute(
                "UPDATE tasks SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![t, ts, id],
            )
            .context("Failed to update task title")?;
        }
        if let Some(d) = description {
            tx.execute(
                "UPDATE tasks SET description = ?1, updated_at = ?2 WHERE id = ?3",
                params![d, ts, id],
            )
            .context("Failed to update task description")?;
        }
        if let Some(s) = task_status {
            tx.execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![s, ts, id],
            )
            .context("Failed to update task status")?;
        }
        if let Some(p) = priority {
            tx.execute(
                "UPDATE tasks SET priority = ?1, updated_at = ?2 WHERE id = ?3",
                params![p.as_str(), ts, id],
            )
            .context("Failed to update task priority")?;
        }
        tx.commit().context("Failed to commit task update")?;
        self.get_task(id)
    }

    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .context("Failed to delete task")?;
        Ok(count > 0)
    }

    // ── Column CRUD ───────────────────────────────────────────────────

    /// Inserts a column with an explicit `order`. Callers assign the order
    /// through `status::next_column_order` so the rule lives in one place.
    pub fn create_column(
        &self,
        board_id: i64,
        title: &str,
        column_status: &str,
        order: i64,
    ) -> Result<Column> {
        let ts = now();
        self.conn
            .execute(
                "INSERT INTO columns (board_id, title, status, position, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![board_id, title, column_status, order, ts],
            )
            .context("Failed to insert column")?;
        let id = self.conn.last_insert_rowid();
        self.get_column(id)?
            .context("Column not found after insert")
    }

    pub fn list_columns(&self, board_id: Option<i64>) -> Result<Vec<Column>> {
        let mut sql = String::from(
            "SELECT id, board_id, title, status, position, created_at, updated_at FROM columns",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(b) = board_id {
            sql.push_str(" WHERE board_id = ?");
            args.push(Box::new(b));
        }
        // Ties on position break by insertion order.
        sql.push_str(" ORDER BY position, id");

        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("Failed to prepare list_columns")?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args), column_from_row)
            .context("Failed to query columns")?;
        let mut columns = Vec::new();
        for row in rows {
            columns.push(row.context("Failed to read column row")?);
        }
        Ok(columns)
    }

    pub fn get_column(&self, id: i64) -> Result<Option<Column>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, board_id, title, status, position, created_at, updated_at
                 FROM columns WHERE id = ?1",
            )
            .context("Failed to prepare get_column")?;
        let mut rows = stmt
            .query_map(params![id], column_from_row)
            .context("Failed to query column")?;
        match rows.next() {
            Some(row) => Ok(Some(row.context("Failed to read column row")?)),
            None => Ok(None),
        }
    }

    /// Partial update. Returns `Ok(None)` when the column does not exist.
    pub fn update_column(
        &self,
        id: i64,
        title: Option<&str>,
        column_status: Option<&str>,
        order: Option<i64>,
    ) -> Result<Option<Column>> {
        if self.get_column(id)?.is_none() {
            return Ok(None);
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;
        let ts = now();
        if let Some(t) = title {
            tx.execute(
                "UPDATE columns SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![t, ts, id],
            )
            .context("Failed to update column title")?;
        }
        if let Some(s) = column_status {
            tx.execute(
                "UPDATE columns SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![s, ts, id],
            )
            .context("Failed to update column status")?;
        }
        if let Some(o) = order {
            tx.execute(
                "UPDATE columns SET position = ?1, updated_at = ?2 WHERE id = ?3",
                params![o, ts, id],
            )
            .context("Failed to update column order")?;
        }
        tx.commit().context("Failed to commit column update")?;
        self.get_column(id)
    }

    /// Removes the column row only. Tasks carrying its status keep the
    /// status string and become an orphaned grouping.
    pub fn delete_column(&self, id: i64) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM columns WHERE id = ?1", params![id])
            .context("Failed to delete column")?;
        Ok(count > 0)
    }
}

// ── Row mappers ───────────────────────────────────────────────────────

fn board_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn column_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        status: row.get(3)?,
        order: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Intermediate row for tasks; priority is stored as text and parsed after
/// the rusqlite mapping so a bad row surfaces as a regular error.
struct TaskRow {
    id: i64,
    board_id: i64,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    created_at: String,
    updated_at: String,
}

fn task_row_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let priority = Priority::from_str(&self.priority)
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid priority in task row")?;
        Ok(Task {
            id: self.id,
            board_id: self.board_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_database_and_run_migrations() -> Result<()> {
        let db = BoardDb::new_in_memory()?;

        let table_count: i32 = db.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('boards', 'tasks', 'columns')",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(table_count, 3, "Expected 3 tables to exist");

        let index_count: i32 = db.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name IN ('idx_tasks_board', 'idx_tasks_status', 'idx_columns_board', 'idx_columns_board_status')",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(index_count, 4, "Expected 4 indexes to exist");

        Ok(())
    }

    #[test]
    fn test_create_board() -> Result<()> {
        let db = BoardDb::new_in_memory()?;

        let board = db.create_board("Sprint 1", Some("First sprint"))?;
        assert!(board.id > 0);
        assert_eq!(board.title, "Sprint 1");
        assert_eq!(board.description.as_deref(), Some("First sprint"));
        assert!(!board.created_at.is_empty());
        assert_eq!(board.created_at, board.updated_at);

        let fetched = db.get_board(board.id)?.expect("board should exist");
        assert_eq!(fetched.title, "Sprint 1");

        Ok(())
    }

    #[test]
    fn test_list_boards_ordered_by_id() -> Result<()> {
        let db = BoardDb::new_in_memory()?;

        db.create_board("alpha", None)?;
        db.create_board("beta", None)?;
        db.create_board("gamma", None)?;

        let boards = db.list_boards()?;
        assert_eq!(boards.len(), 3);
        assert_eq!(boards[0].title, "alpha");
        assert_eq!(boards[2].title, "gamma");

        Ok(())
    }

    #[test]
    fn test_update_board_partial_fields() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("Old", Some("Old desc"))?;

        let updated = db.update_board(board.id, Some("New"), None)?.unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description.as_deref(), Some("Old desc"));

        let updated = db.update_board(board.id, None, Some("New desc"))?.unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description.as_deref(), Some("New desc"));

        Ok(())
    }

    #[test]
    fn test_update_missing_board_returns_none() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        assert!(db.update_board(999, Some("x"), None)?.is_none());
        Ok(())
    }

    #[test]
    fn test_task_defaults() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;

        let task = db.create_task(board.id, "Fix bug", None, "TODO", Priority::Medium)?;
        assert_eq!(task.status, "TODO");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.description.is_none());
        assert_eq!(task.board_id, board.id);

        Ok(())
    }

    #[test]
    fn test_list_tasks_filters() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let a = db.create_board("A", None)?;
        let b = db.create_board("B", None)?;

        db.create_task(a.id, "t1", None, "TODO", Priority::Low)?;
        db.create_task(a.id, "t2", None, "QA", Priority::Medium)?;
        db.create_task(b.id, "t3", None, "TODO", Priority::High)?;

        assert_eq!(db.list_tasks(None, None)?.len(), 3);
        assert_eq!(db.list_tasks(Some(a.id), None)?.len(), 2);
        assert_eq!(db.list_tasks(Some(a.id), Some("QA"))?.len(), 1);
        assert_eq!(db.list_tasks(None, Some("TODO"))?.len(), 2);
        assert!(db.list_tasks(Some(a.id), Some("DONE"))?.is_empty());

        Ok(())
    }

    #[test]
    fn test_update_task_status_accepts_any_string() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        let task = db.create_task(board.id, "t", None, "TODO", Priority::Medium)?;

        let updated = db
            .update_task(task.id, None, None, Some("SOMETHING_NOBODY_DEFINED"), None)?
            .unwrap();
        assert_eq!(updated.status, "SOMETHING_NOBODY_DEFINED");

        Ok(())
    }

    #[test]
    fn test_update_task_partial_fields() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        let task = db.create_task(board.id, "Old", Some("d"), "TODO", Priority::Medium)?;

        let updated = db
            .update_task(task.id, Some("New"), None, None, Some(Priority::High))?
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description.as_deref(), Some("d"));
        assert_eq!(updated.status, "TODO");
        assert_eq!(updated.priority, Priority::High);

        Ok(())
    }

    #[test]
    fn test_delete_task() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        let task = db.create_task(board.id, "t", None, "TODO", Priority::Medium)?;

        assert!(db.delete_task(task.id)?);
        assert!(db.get_task(task.id)?.is_none());
        assert!(!db.delete_task(task.id)?);

        Ok(())
    }

    #[test]
    fn test_columns_ordered_by_position_then_id() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;

        db.create_column(board.id, "Z", "Z", 1)?;
        db.create_column(board.id, "A", "A", 0)?;
        db.create_column(board.id, "M", "M", 1)?;

        let cols = db.list_columns(Some(board.id))?;
        let statuses: Vec<&str> = cols.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(statuses, vec!["A", "Z", "M"]);

        Ok(())
    }

    #[test]
    fn test_duplicate_column_status_rejected_by_index() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let a = db.create_board("A", None)?;
        let b = db.create_board("B", None)?;

        db.create_column(a.id, "In Review", "IN_REVIEW", 0)?;
        // Same status on the same board violates the unique index.
        assert!(db.create_column(a.id, "Review 2", "IN_REVIEW", 1).is_err());
        // Same status on another board is fine.
        assert!(db.create_column(b.id, "In Review", "IN_REVIEW", 0).is_ok());

        Ok(())
    }

    #[test]
    fn test_update_column_fields() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        let col = db.create_column(board.id, "QA", "QA", 0)?;

        let updated = db
            .update_column(col.id, Some("Quality"), None, Some(5))?
            .unwrap();
        assert_eq!(updated.title, "Quality");
        assert_eq!(updated.status, "QA");
        assert_eq!(updated.order, 5);

        Ok(())
    }

    #[test]
    fn test_delete_column_leaves_tasks_orphaned() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        let col = db.create_column(board.id, "QA", "QA", 0)?;
        let task = db.create_task(board.id, "t", None, "QA", Priority::Medium)?;

        assert!(db.delete_column(col.id)?);
        let orphan = db.get_task(task.id)?.expect("task must survive");
        assert_eq!(orphan.status, "QA");

        Ok(())
    }

    #[test]
    fn test_delete_board_cascades_to_tasks_and_columns() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        let other = db.create_board("Other", None)?;
        let task = db.create_task(board.id, "t", None, "TODO", Priority::Medium)?;
        let col = db.create_column(board.id, "QA", "QA", 0)?;
        let kept = db.create_task(other.id, "kept", None, "TODO", Priority::Medium)?;

        assert!(db.delete_board(board.id)?);

        assert!(db.get_board(board.id)?.is_none());
        assert!(db.get_task(task.id)?.is_none());
        assert!(db.get_column(col.id)?.is_none());
        // Unrelated board untouched.
        assert!(db.get_task(kept.id)?.is_some());

        Ok(())
    }

    #[test]
    fn test_board_detail_includes_tasks() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        db.create_task(board.id, "t1", None, "TODO", Priority::Medium)?;
        db.create_task(board.id, "t2", None, "QA", Priority::Medium)?;

        let detail = db.get_board_detail(board.id)?.unwrap();
        assert_eq!(detail.board.id, board.id);
        assert_eq!(detail.tasks.len(), 2);

        assert!(db.get_board_detail(999)?.is_none());

        Ok(())
    }

    #[test]
    fn test_board_view_groups_tasks_under_effective_columns() -> Result<()> {
        let db = BoardDb::new_in_memory()?;
        let board = db.create_board("B", None)?;
        db.create_column(board.id, "In Review", "IN_REVIEW", 0)?;
        db.create_task(board.id, "t1", None, "IN_REVIEW", Priority::Medium)?;
        db.create_task(board.id, "t2", None, "TODO", Priority::Medium)?;

        let view = db.get_board_view(board.id)?.unwrap();
        let statuses: Vec<&str> = view.columns.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(statuses, vec!["TODO", "IN_PROGRESS", "DONE", "IN_REVIEW"]);
        assert_eq!(view.columns[0].tasks.len(), 1);
        assert_eq!(view.columns[3].tasks.len(), 1);
        assert_eq!(view.columns[3].title, "In Review");

        Ok(())
    }
}
