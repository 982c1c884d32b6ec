use super::types::{Predicate, SqlParam, SqlResult};

/// Compiles a predicate list into a parameterised WHERE clause for `contacts`
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(predicates: &[Predicate]) -> SqlResult {
        let mut filter_where = Self::new(0);
        filter_where.build(predicates)
    }

    fn build(&mut self, predicates: &[Predicate]) -> SqlResult {
        let sql_conditions: Vec<String> = predicates
            .iter()
            .map(|predicate| self.build_sql_condition(predicate))
            .collect();

        let query = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        SqlResult { query, params: self.param_values.clone() }
    }

    fn build_sql_condition(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::OwnedBy(user_id) => {
                format!("\"user_id\" = {}", self.param(SqlParam::Int(*user_id)))
            }
            Predicate::Contains { columns, needle } => {
                // One parameter shared by every column in the group
                let placeholder = self.param(SqlParam::Text(format!("%{}%", escape_like(needle))));
                let alternatives: Vec<String> = columns
                    .iter()
                    .map(|column| format!("\"{}\" ILIKE {} ESCAPE '\\'", column.to_sql(), placeholder))
                    .collect();
                if alternatives.len() == 1 {
                    alternatives.join("")
                } else {
                    format!("({})", alternatives.join(" OR "))
                }
            }
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escape LIKE wildcards so user input is matched literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
