//! Renders a typed `Statement` into SQL DDL text. Kept separate from
//! generation so the paradigms stay structure-only and a future sink/driver
//! could render to a different target without touching `flat`/`json_nested`.

use crate::catalog::DataType;

use super::statement::Statement;

fn sql_type(data_type: &DataType, size: u32) -> String {
    match data_type {
        DataType::Integer => "INTEGER".to_string(),
        DataType::Float => "DOUBLE PRECISION".to_string(),
        DataType::Boolean => "BOOLEAN".to_string(),
        DataType::Date => "DATE".to_string(),
        DataType::Timestamp => "TIMESTAMP".to_string(),
        DataType::Varchar => format!("VARCHAR({size})"),
        DataType::Json => "JSONB".to_string(),
    }
}

pub fn render(statement: &Statement) -> String {
    match statement {
        Statement::CreateTable {
            name,
            columns,
            primary_key,
            foreign_keys,
        } => {
            let mut lines: Vec<String> = columns
                .iter()
                .map(|c| {
                    let null = if c.nullable { "" } else { " NOT NULL" };
                    format!("  {} {}{}", c.name, sql_type(&c.data_type, c.size), null)
                })
                .collect();
            if !primary_key.is_empty() {
                lines.push(format!("  PRIMARY KEY ({})", primary_key.join(", ")));
            }
            for fk in foreign_keys {
                lines.push(format!(
                    "  FOREIGN KEY ({}) REFERENCES {} ({})",
                    fk.columns.join(", "),
                    fk.references_table,
                    fk.references_columns.join(", ")
                ));
            }
            format!("CREATE TABLE {} (\n{}\n);", name, lines.join(",\n"))
        }
    }
}

pub fn render_all(statements: &[Statement]) -> Vec<String> {
    statements.iter().map(render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_gen::statement::ColumnDef;

    #[test]
    fn renders_primary_key_clause() {
        let stmt = Statement::CreateTable {
            name: "Books".into(),
            columns: vec![ColumnDef {
                name: "id".into(),
                data_type: DataType::Integer,
                size: 8,
                nullable: false,
            }],
            primary_key: vec!["id".into()],
            foreign_keys: vec![],
        };
        let sql = render(&stmt);
        assert!(sql.contains("CREATE TABLE Books"));
        assert!(sql.contains("PRIMARY KEY (id)"));
    }
}
