//! Typed WHERE-clause builder for listing queries.
//! 
//! Conditions are collected first and rendered into a `sqlx::QueryBuilder`
//! afterwards, so the same filter can drive both the COUNT and the page
//! SELECT. Values are always bound, never interpolated.

use sqlx::{QueryBuilder, Sqlite};

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Sql(String),
    Bind(Value),
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    conditions: Vec<Vec<Part>>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq_int(mut self, column: &'static str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.conditions.push(vec![
                Part::Sql(format!("{} = ", column)),
                Part::Bind(Value::Int(value)),
            ]);
        }
        self
    }

    /// Equality on a text column; blank values are ignored.
    pub fn eq_text(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.conditions.push(vec![
                Part::Sql(format!("{} = ", column)),
                Part::Bind(Value::Text(value.to_string())),
            ]);
        }
        self
    }

    /// Case-insensitive substring match over any of `columns`.
    pub fn search(mut self, columns: &[&'static str], term: Option<&str>) -> Self {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }

        let pattern = format!("%{}%", escape_like(term));
        let mut parts = vec![Part::Sql("(".to_string())];
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(Part::Sql(" OR ".to_string()));
            }
            parts.push(Part::Sql(format!("{} LIKE ", column)));
            parts.push(Part::Bind(Value::Text(pattern.clone())));
            parts.push(Part::Sql(" ESCAPE '\\'".to_string()));
        }
        parts.push(Part::Sql(")".to_string()));
        self.conditions.push(parts);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Append ` WHERE a AND b ...` (nothing when there are no conditions).
    pub fn push_where<'args>(&self, builder: &mut QueryBuilder<'args, Sqlite>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            for part in condition {
                match part {
                    Part::Sql(sql) => {
                        builder.push(sql);
                    }
                    Part::Bind(Value::Int(v)) => {
                        builder.push_bind(*v);
                    }
                    Part::Bind(Value::Text(v)) => {
                        builder.push_bind(v.clone());
                    }
                }
            }
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_adds_nothing() {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM tricycle_routes");
        FilterBuilder::new()
            .eq_int("barangay_id", None)
            .eq_text("status", Some("  "))
            .search(&["route_name"], None)
            .push_where(&mut builder);
        assert_eq!(builder.sql(), "SELECT * FROM tricycle_routes");
    }

    #[test]
    fn test_conditions_are_joined_with_and() {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM r");
        FilterBuilder::new()
            .eq_int("r.barangay_id", Some(2))
            .eq_text("r.status", Some("Active"))
            .search(&["r.route_code", "r.route_name"], Some("poblacion"))
            .push_where(&mut builder);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM r WHERE r.barangay_id = ? AND r.status = ? AND \
             (r.route_code LIKE ? ESCAPE '\\' OR r.route_name LIKE ? ESCAPE '\\')"
        );
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
