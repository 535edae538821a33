use crate::seed::default_todos;
use domain::{Todo, TodoError, TodoId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA_TODOS: &str = "CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY,
    item TEXT,
    completed BOOLEAN,
    responsible TEXT
);";
const SELECT_TODOS: &str = "SELECT id, item, completed, responsible FROM todos";
const SELECT_TODO_BY_ID: &str =
    "SELECT id, item, completed, responsible FROM todos WHERE id = ?1";
const INSERT_TODO: &str =
    "INSERT INTO todos (id, item, completed, responsible) VALUES (?1, ?2, ?3, ?4)";
const INSERT_TODO_IF_ABSENT: &str =
    "INSERT OR IGNORE INTO todos (id, item, completed, responsible) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_FIELDS: &str = "UPDATE todos SET item = ?1, completed = ?2 WHERE id = ?3";
const UPDATE_COMPLETED: &str = "UPDATE todos SET completed = 1 WHERE id = ?1";
const UPDATE_RESPONSIBLE: &str = "UPDATE todos SET responsible = ?1 WHERE id = ?2";
const DELETE_TODO: &str = "DELETE FROM todos WHERE id = ?1";

/// Todo テーブルへのアクセスを抽象化したリポジトリ
///
/// ハンドラは `Arc<dyn TodoRepository>` としてこのトレイトを受け取る。
/// 各操作は単一の SQL 文で、トランザクションやリトライは行わない。
pub trait TodoRepository: Send + Sync {
    /// 全件取得（並び順は保証しない）
    fn list_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// 1 件取得。存在しなければ `TodoError::NotFound`
    fn get_by_id(&self, id: &TodoId) -> Result<Todo, TodoError>;

    /// 新規作成。ID 重複も含めて失敗は `TodoError::Storage`
    fn insert(&self, todo: &Todo) -> Result<(), TodoError>;

    /// item / completed を上書きし、更新後のレコードを返す
    fn update_fields(&self, id: &TodoId, item: &str, completed: bool)
        -> Result<Todo, TodoError>;

    /// completed を true にする（何度呼んでも結果は同じ）
    fn set_completed(&self, id: &TodoId) -> Result<Todo, TodoError>;

    /// 担当者を設定する
    fn set_responsible(&self, id: &TodoId, responsible: &str) -> Result<Todo, TodoError>;

    /// 削除。行が存在したかどうかを返し、存在しなくてもエラーにはしない
    fn delete_by_id(&self, id: &TodoId) -> Result<bool, TodoError>;
}

/// SQLite をバックエンドとするリポジトリ
///
/// 接続は 1 本を `Mutex` で直列化する。更新と読み戻しは同じロック内で行う。
pub struct SqliteTodoRepository {
    conn: Mutex<Connection>,
}

impl SqliteTodoRepository {
    /// データベースファイルを開き、テーブルが無ければ作成する
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TodoError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(TodoError::storage)?;
        info!(path = %path.display(), "SQLite database opened");
        Self::from_connection(conn)
    }

    /// テスト・開発用のインメモリデータベース
    pub fn open_in_memory() -> Result<Self, TodoError> {
        let conn = Connection::open_in_memory().map_err(TodoError::storage)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, TodoError> {
        conn.execute_batch(SCHEMA_TODOS)
            .map_err(TodoError::storage)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 固定の初期データを投入する。既存の ID は上書きしない。
    /// 実際に挿入した件数を返す。
    pub fn seed_defaults(&self) -> Result<usize, TodoError> {
        let conn = self.lock()?;
        let mut inserted = 0;
        for todo in default_todos() {
            inserted += conn
                .execute(
                    INSERT_TODO_IF_ABSENT,
                    params![todo.id.as_str(), todo.item, todo.completed, todo.responsible],
                )
                .map_err(TodoError::storage)?;
        }
        info!(inserted, "Default todos seeded");

        Ok(inserted)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TodoError> {
        self.conn
            .lock()
            .map_err(|_| TodoError::storage("connection lock poisoned"))
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_TODOS).map_err(TodoError::storage)?;
        let todo_iter = stmt
            .query_map([], row_to_todo)
            .map_err(TodoError::storage)?;

        let mut todos = Vec::new();
        for todo_result in todo_iter {
            todos.push(todo_result.map_err(TodoError::storage)?);
        }
        debug!(count = todos.len(), "Todos fetched");

        Ok(todos)
    }

    fn get_by_id(&self, id: &TodoId) -> Result<Todo, TodoError> {
        let conn = self.lock()?;
        select_one(&conn, id)
    }

    fn insert(&self, todo: &Todo) -> Result<(), TodoError> {
        let conn = self.lock()?;
        conn.execute(
            INSERT_TODO,
            params![todo.id.as_str(), todo.item, todo.completed, todo.responsible],
        )
        .map_err(TodoError::storage)?;
        debug!(id = %todo.id, "Todo inserted");

        Ok(())
    }

    fn update_fields(
        &self,
        id: &TodoId,
        item: &str,
        completed: bool,
    ) -> Result<Todo, TodoError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(UPDATE_FIELDS, params![item, completed, id.as_str()])
            .map_err(TodoError::storage)?;

        read_back(&conn, id, affected)
    }

    fn set_completed(&self, id: &TodoId) -> Result<Todo, TodoError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(UPDATE_COMPLETED, params![id.as_str()])
            .map_err(TodoError::storage)?;

        read_back(&conn, id, affected)
    }

    fn set_responsible(&self, id: &TodoId, responsible: &str) -> Result<Todo, TodoError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(UPDATE_RESPONSIBLE, params![responsible, id.as_str()])
            .map_err(TodoError::storage)?;

        read_back(&conn, id, affected)
    }

    fn delete_by_id(&self, id: &TodoId) -> Result<bool, TodoError> {
        let conn = self.lock()?;
        let deleted = conn
            .execute(DELETE_TODO, params![id.as_str()])
            .map_err(TodoError::storage)?;
        debug!(id = %id, deleted, "Todo delete executed");

        Ok(deleted > 0)
    }
}

fn select_one(conn: &Connection, id: &TodoId) -> Result<Todo, TodoError> {
    conn.query_row(SELECT_TODO_BY_ID, params![id.as_str()], row_to_todo)
        .optional()
        .map_err(TodoError::storage)?
        .ok_or_else(|| TodoError::not_found(id))
}

/// UPDATE の影響行数が 0 なら NotFound、そうでなければ更新後の行を返す
fn read_back(conn: &Connection, id: &TodoId, affected: usize) -> Result<Todo, TodoError> {
    if affected == 0 {
        return Err(TodoError::not_found(id));
    }
    select_one(conn, id)
}

// item / responsible / completed は NULL を許容するカラムなので既定値で埋める
fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    let id: String = row.get(0)?;
    let item: Option<String> = row.get(1)?;
    let completed: Option<bool> = row.get(2)?;
    let responsible: Option<String> = row.get(3)?;

    Ok(Todo {
        id: TodoId::from(id),
        item: item.unwrap_or_default(),
        completed: completed.unwrap_or_default(),
        responsible: responsible.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> SqliteTodoRepository {
        SqliteTodoRepository::open_in_memory().unwrap()
    }

    #[test]
    fn test_list_all_on_empty_table() {
        let repo = repo();

        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_then_get_by_id() {
        // Arrange
        let repo = repo();
        let todo = Todo::new("6", "Walk dog");

        // Act
        repo.insert(&todo).unwrap();
        let fetched = repo.get_by_id(&TodoId::from("6")).unwrap();

        // Assert
        assert_eq!(fetched, todo);
    }

    #[test]
    fn test_insert_duplicate_id_is_storage_error() {
        let repo = repo();
        repo.insert(&Todo::new("1", "first")).unwrap();

        let err = repo.insert(&Todo::new("1", "second")).unwrap_err();

        assert!(matches!(err, TodoError::Storage(_)));
        assert_eq!(repo.get_by_id(&TodoId::from("1")).unwrap().item, "first");
    }

    #[test]
    fn test_get_by_id_missing_is_not_found() {
        let repo = repo();

        let err = repo.get_by_id(&TodoId::from("404")).unwrap_err();

        assert_eq!(err, TodoError::NotFound("404".to_string()));
    }

    #[test]
    fn test_update_fields_returns_updated_record() {
        let repo = repo();
        let mut todo = Todo::new("1", "Buy groceries");
        todo.responsible = "alice".to_string();
        repo.insert(&todo).unwrap();

        let updated = repo
            .update_fields(&TodoId::from("1"), "Buy milk", true)
            .unwrap();

        assert_eq!(updated.item, "Buy milk");
        assert!(updated.completed);
        // responsible は変更されない
        assert_eq!(updated.responsible, "alice");
    }

    #[test]
    fn test_update_operations_on_missing_id_are_not_found() {
        let repo = repo();
        let id = TodoId::from("missing");

        assert!(matches!(
            repo.update_fields(&id, "x", false),
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(
            repo.set_completed(&id),
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(
            repo.set_responsible(&id, "bob"),
            Err(TodoError::NotFound(_))
        ));
        // 暗黙の行作成は起きない
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_set_completed_is_idempotent() {
        let repo = repo();
        repo.insert(&Todo::new("1", "Buy groceries")).unwrap();
        let id = TodoId::from("1");

        let first = repo.set_completed(&id).unwrap();
        let second = repo.set_completed(&id).unwrap();

        assert!(first.completed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_responsible_is_visible_in_reads() {
        let repo = repo();
        repo.insert(&Todo::new("3", "Go to the gym")).unwrap();
        let id = TodoId::from("3");

        repo.set_responsible(&id, "carol").unwrap();

        assert_eq!(repo.get_by_id(&id).unwrap().responsible, "carol");
        assert_eq!(repo.list_all().unwrap()[0].responsible, "carol");
    }

    #[test]
    fn test_delete_by_id_reports_existence() {
        let repo = repo();
        repo.insert(&Todo::new("1", "Buy groceries")).unwrap();
        let id = TodoId::from("1");

        assert!(repo.delete_by_id(&id).unwrap());
        assert!(!repo.delete_by_id(&id).unwrap());
        assert!(matches!(repo.get_by_id(&id), Err(TodoError::NotFound(_))));
    }

    #[test]
    fn test_seed_defaults_is_idempotent() {
        let repo = repo();

        assert_eq!(repo.seed_defaults().unwrap(), 5);
        assert_eq!(repo.seed_defaults().unwrap(), 0);
        assert_eq!(repo.list_all().unwrap().len(), 5);
    }

    #[test]
    fn test_seed_defaults_keeps_existing_changes() {
        let repo = repo();
        repo.seed_defaults().unwrap();
        repo.set_completed(&TodoId::from("1")).unwrap();

        repo.seed_defaults().unwrap();

        assert!(repo.get_by_id(&TodoId::from("1")).unwrap().completed);
    }

    #[test]
    fn test_null_columns_read_as_defaults() {
        // Arrange: 他のクライアントが NULL を書き込んだ行
        let repo = repo();
        repo.lock()
            .unwrap()
            .execute("INSERT INTO todos (id) VALUES ('legacy')", [])
            .unwrap();

        // Act
        let todo = repo.get_by_id(&TodoId::from("legacy")).unwrap();

        // Assert
        assert_eq!(todo, Todo::new("legacy", ""));
    }
}
