use crate::models::Task;
use rusqlite::{params, Connection, Result, Row};
use std::sync::{Arc, Mutex};

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    completed_at TIMESTAMP,
    goal_id INTEGER
);";
const SELECT_TASKS: &str = "SELECT id, title, description, completed_at, goal_id FROM tasks";
const INSERT_TASK: &str = "INSERT INTO tasks (title, description) VALUES (?1, ?2)";
const UPDATE_TASK: &str =
    "UPDATE tasks SET title = ?1, description = ?2, completed_at = ?3 WHERE id = ?4";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Title sort directive for the list query. Ordering happens in SQL so
/// ties fall back to the store's default (insertion) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Handle to the tasks database. Cheap to clone; a single connection is
/// shared behind a mutex, held only across one query at a time.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn open(path: &str) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA_TASKS, [])?;
        Ok(Db {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts a new task and returns it with the store-assigned id.
    /// Tasks always start incomplete.
    pub fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        let conn = self.conn.lock().unwrap();
        conn.execute(INSERT_TASK, params![title, description])?;
        Ok(Task {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            description: description.to_string(),
            completed_at: None,
            goal_id: None,
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{SELECT_TASKS} WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], row_to_task)?;
        rows.next().transpose()
    }

    pub fn list_tasks(&self, sort: Option<SortOrder>) -> Result<Vec<Task>> {
        let query = match sort {
            Some(SortOrder::Asc) => format!("{SELECT_TASKS} ORDER BY title ASC"),
            Some(SortOrder::Desc) => format!("{SELECT_TASKS} ORDER BY title DESC"),
            None => SELECT_TASKS.to_string(),
        };

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], row_to_task)?;
        rows.collect()
    }

    /// Writes `title`, `description` and `completed_at` back by id.
    pub fn update_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            UPDATE_TASK,
            params![task.title, task.description, task.completed_at, task.id],
        )?;
        Ok(())
    }

    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(DELETE_TASK, params![id])?;
        Ok(deleted > 0)
    }
}

fn row_to_task(row: &Row<'_>) -> Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed_at: row.get(3)?,
        goal_id: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn create_assigns_fresh_ids() {
        let db = Db::open_in_memory().unwrap();
        let a = db.create_task("a", "first").unwrap();
        let b = db.create_task("b", "second").unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.completed_at.is_none());
        assert!(a.goal_id.is_none());
    }

    #[test]
    fn get_round_trips_created_task() {
        let db = Db::open_in_memory().unwrap();
        let created = db.create_task("title", "description").unwrap();

        let fetched = db.get_task(created.id).unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "title");
        assert_eq!(fetched.description, "description");
        assert!(fetched.completed_at.is_none());
    }

    #[test]
    fn get_missing_task_is_none() {
        let db = Db::open_in_memory().unwrap();
        assert!(db.get_task(999_999).unwrap().is_none());
    }

    #[test]
    fn list_sorts_by_title() {
        let db = Db::open_in_memory().unwrap();
        for title in ["b", "a", "c"] {
            db.create_task(title, "").unwrap();
        }

        let titles = |sort| -> Vec<String> {
            db.list_tasks(sort)
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect()
        };

        assert_eq!(titles(Some(SortOrder::Asc)), ["a", "b", "c"]);
        assert_eq!(titles(Some(SortOrder::Desc)), ["c", "b", "a"]);
        assert_eq!(titles(None).len(), 3);
    }

    #[test]
    fn update_overwrites_fields_in_place() {
        let db = Db::open_in_memory().unwrap();
        let mut task = db.create_task("old", "old text").unwrap();

        task.title = "new".to_string();
        task.description = "new text".to_string();
        task.completed_at = Some(Utc::now());
        db.update_task(&task).unwrap();

        let fetched = db.get_task(task.id).unwrap().unwrap();
        assert_eq!(fetched.title, "new");
        assert_eq!(fetched.description, "new text");
        assert!(fetched.is_complete());
    }

    #[test]
    fn delete_removes_row() {
        let db = Db::open_in_memory().unwrap();
        let task = db.create_task("t", "d").unwrap();

        assert!(db.delete_task(task.id).unwrap());
        assert!(db.get_task(task.id).unwrap().is_none());
        assert!(!db.delete_task(task.id).unwrap());
    }
}
