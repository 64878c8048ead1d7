//! Shared helpers for integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use oxide_dbal_core::{Executor, Result, Row, SqlValue};

/// An executor that records statements and answers queries from a script
/// keyed by SQL prefix. Clones share the same script and log.
#[derive(Debug, Default, Clone)]
pub struct ScriptedExecutor {
    log: Rc<RefCell<Vec<String>>>,
    answers: Rc<RefCell<Vec<(String, Vec<Row>)>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries starting with `prefix` return `rows`.
    pub fn answer(&self, prefix: &str, rows: Vec<Row>) {
        self.answers.borrow_mut().push((prefix.to_string(), rows));
    }

    /// Every statement run so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&mut self, sql: &str) -> Result<u64> {
        self.log.borrow_mut().push(sql.to_string());
        Ok(1)
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.log.borrow_mut().push(sql.to_string());
        Ok(self
            .answers
            .borrow()
            .iter()
            .find(|(prefix, _)| sql.starts_with(prefix.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

/// One-column rows named `name`, as catalog listings return them.
pub fn name_rows(names: &[&str]) -> Vec<Row> {
    names
        .iter()
        .map(|name| Row::new().with("name", SqlValue::Text((*name).to_string())))
        .collect()
}
