use crate::error::Result;
use crate::render::{GraphSpec, Record, Rendered};
use crate::types::OptionItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table};

/// Rows of a graph spec as CSV, columns in `keys` order. Missing cells are
/// written empty.
pub fn write_csv(path: &Path, keys: &[String], records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(keys)?;
    for rec in records {
        wtr.write_record(keys.iter().map(|k| cell_text(rec.get(k))))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Written next to each export so a later reader knows what produced it.
#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub slide: usize,
    pub selection: String,
    pub graph_id: String,
    pub rows: usize,
    pub json: PathBuf,
    pub csv: PathBuf,
    pub generated_at: DateTime<Utc>,
}

/// Write the graph spec as JSON and its rows as CSV under `dir`, plus a
/// manifest. Returns the manifest.
pub fn export(dir: &Path, slide: usize, selection: &str, spec: &GraphSpec) -> Result<ExportManifest> {
    fs::create_dir_all(dir)?;
    let json = dir.join(format!("{}.json", spec.graph_id));
    let csv = dir.join(format!("{}.csv", spec.graph_id));
    write_json(&json, spec)?;
    write_csv(&csv, &spec.keys(), &spec.data)?;
    let manifest = ExportManifest {
        slide,
        selection: selection.to_string(),
        graph_id: spec.graph_id.clone(),
        rows: spec.data.len(),
        json,
        csv,
        generated_at: Utc::now(),
    };
    write_json(&dir.join(format!("{}.manifest.json", spec.graph_id)), &manifest)?;
    Ok(manifest)
}

/// Markdown rendering of the first `max_rows` rows, or the state message.
pub fn preview(rendered: &Rendered, max_rows: usize) -> String {
    let spec = match rendered {
        Rendered::Graph(spec) => spec,
        Rendered::NoData { message } => return message.clone(),
        Rendered::Loading => return "Loading...".to_string(),
        Rendered::Failed { message } => return format!("Error: {}", message),
    };
    let keys = spec.keys();
    if spec.data.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(keys.iter().cloned());
    for rec in spec.data.iter().take(max_rows) {
        builder.push_record(keys.iter().map(|k| cell_text(rec.get(k))));
    }
    let mut out = format!("{} [{:?}]\n", spec.title, spec.graph_type);
    out.push_str(&builder.build().with(Style::markdown()).to_string());
    if spec.data.len() > max_rows {
        out.push_str(&format!("\n... {} more rows", spec.data.len() - max_rows));
    }
    if let Some(note) = &spec.settings.foot_note {
        out.push_str(&format!("\n{}", note));
    }
    out
}

pub fn print_options(title: &str, options: &[OptionItem]) {
    println!("{}", title);
    if options.is_empty() {
        println!("(none)\n");
        return;
    }
    println!("{}\n", Table::new(options).with(Style::markdown()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{GraphSettings, GraphType, TableColumn};
    use serde_json::json;

    fn spec() -> GraphSpec {
        let mut a = Record::new();
        a.insert("area".into(), json!("Goa"));
        a.insert("2018".into(), json!(49.0));
        let mut b = Record::new();
        b.insert("area".into(), json!("Bihar"));
        GraphSpec {
            graph_id: "slide-3-table".into(),
            graph_type: GraphType::DataTable,
            title: "SDG 1 by year".into(),
            data: vec![a, b],
            data_configuration: Vec::new(),
            settings: GraphSettings {
                column_data: vec![TableColumn::new("States/UTs", "area"), TableColumn::new("2018", "2018")],
                ..GraphSettings::default()
            },
        }
    }

    #[test]
    fn export_writes_rows_in_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = export(dir.path(), 3, "goal SDG 1", &spec()).unwrap();
        assert_eq!(manifest.rows, 2);
        let csv = fs::read_to_string(&manifest.csv).unwrap();
        assert_eq!(csv, "area,2018\nGoa,49.0\nBihar,\n");
        let json: Value = serde_json::from_str(&fs::read_to_string(&manifest.json).unwrap()).unwrap();
        assert_eq!(json["graphType"], json!("dataTable"));
        assert!(dir.path().join("slide-3-table.manifest.json").exists());
    }

    #[test]
    fn preview_truncates_and_reports_states() {
        let text = preview(&Rendered::Graph(spec()), 1);
        assert!(text.contains("| Goa"));
        assert!(!text.contains("Bihar"));
        assert!(text.ends_with("... 1 more rows"));
        assert_eq!(preview(&Rendered::Loading, 5), "Loading...");
        assert_eq!(
            preview(&Rendered::no_data("Goa", "2018"), 5),
            "No data available for Goa for 2018"
        );
    }
}
