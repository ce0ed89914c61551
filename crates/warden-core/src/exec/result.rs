//! Per-statement execution results

use super::RowSet;
use crate::value::Value;
use serde::Serialize;

/// Normalised result grid
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Grid {
    /// Lower-cased column names, in result order
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Grid {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Cell `column` of row `row`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<RowSet> for Grid {
    fn from(set: RowSet) -> Self {
        Self {
            columns: set.columns.iter().map(|c| c.to_lowercase()).collect(),
            rows: set
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(Value::normalize).collect())
                .collect(),
        }
    }
}

/// What happened to one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StatementOutcome {
    Grid {
        data: Grid,
    },
    Message {
        text: String,
        rows_affected: u64,
    },
    Error {
        message: String,
    },
}

/// Result of one statement, paired with the text that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementResult {
    #[serde(flatten)]
    pub outcome: StatementOutcome,
    /// Statement text as sent to the engine
    pub sql: String,
    /// 1-based line of the statement in the submitted script
    pub line: usize,
}

impl StatementResult {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, StatementOutcome::Error { .. })
    }

    pub fn grid(&self) -> Option<&Grid> {
        match &self.outcome {
            StatementOutcome::Grid { data } => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            StatementOutcome::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_lowercases_columns_and_normalises_cells() {
        let grid = Grid::from(RowSet {
            columns: vec!["SID".into(), "Raw_Addr".into()],
            rows: vec![vec![Value::Integer(7), Value::Bytes(vec![0xAB, 0xFF])]],
        });
        assert_eq!(grid.columns, vec!["sid", "raw_addr"]);
        assert_eq!(grid.get(0, "RAW_ADDR"), Some(&Value::Text("ABFF".into())));
    }

    #[test]
    fn serializes_with_type_tag() {
        let result = StatementResult {
            outcome: StatementOutcome::Error {
                message: "ORA-00942: table or view does not exist".into(),
            },
            sql: "SELECT * FROM nope".into(),
            line: 1,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["sql"], "SELECT * FROM nope");
        assert!(json["message"].as_str().unwrap().starts_with("ORA-00942"));
    }

    #[test]
    fn grid_serializes_under_data() {
        let result = StatementResult {
            outcome: StatementOutcome::Grid {
                data: Grid {
                    columns: vec!["n".into()],
                    rows: vec![vec![Value::Integer(1)]],
                },
            },
            sql: "SELECT 1 AS n".into(),
            line: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "grid");
        assert_eq!(json["data"]["columns"][0], "n");
        assert_eq!(json["data"]["rows"][0][0], 1);
    }
}
