use domain::Todo;

/// 起動時に投入する固定の Todo 一覧
pub fn default_todos() -> Vec<Todo> {
    vec![
        Todo::new("1", "Buy groceries"),
        Todo::new("2", "Finish homework"),
        Todo::new("3", "Go to the gym"),
        Todo::new("4", "Read a book"),
        Todo::new("5", "Call mom"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_todos_have_unique_ids() {
        let todos = default_todos();
        let mut ids: Vec<&str> = todos.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(todos.len(), 5);
        assert_eq!(ids.len(), 5);
        assert!(todos.iter().all(|t| !t.completed && t.responsible.is_empty()));
    }
}
