use serde_json::Value;
use seriesplot::ir::Trace;
use seriesplot::{csv_reader, data, parser, CorrelationChartWidget, FieldProvider, WidgetConfig};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run seriesplot with arguments and stdin input
fn run_seriesplot(args: &[&str], stdin_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_seriesplot"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(stdin_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str], stdin_content: &str) -> Value {
    let stdout = run_seriesplot(args, stdin_content).expect("seriesplot failed");
    serde_json::from_slice(&stdout).expect("stdout is not JSON")
}

fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn widget_from_dsl(dsl: &str, results: &[seriesplot::QueryResult]) -> CorrelationChartWidget {
    let fields = FieldProvider::from_query_result(&results[0]);
    let (_, spec) = parser::parse_widget_spec(dsl).unwrap();
    let config = WidgetConfig::from_spec(&spec, &fields).unwrap();
    let mut widget = CorrelationChartWidget::new(config, fields);
    widget.on_data_received(results).unwrap();
    widget
}

#[test]
fn test_library_csv_grouped_density() {
    let csv = fs::read_to_string("test/readings.csv").expect("Failed to read test CSV");
    let result = csv_reader::read_csv(csv.as_bytes(), Some("pump")).unwrap();
    let widget = widget_from_dsl(r#"correlation(x: flow, y: pressure, display: "Density")"#, &[result]);

    let traces = widget.traces();
    assert_eq!(traces.len(), 6);
    let names: Vec<&str> = traces.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["p1", "p1", "p2", "p2", "p3", "p3"]);
    let axes: Vec<(&str, &str)> = traces.iter().map(|t| t.axes()).collect();
    assert_eq!(
        axes,
        vec![("x", "y"), ("x", "y"), ("x2", "y2"), ("x2", "y2"), ("x3", "y3"), ("x3", "y3")]
    );

    let colors: Vec<&str> = traces
        .iter()
        .filter_map(|t| match t {
            Trace::Scatter(s) => Some(s.marker.color.as_str()),
            Trace::Contour(_) => None,
        })
        .collect();
    assert_eq!(colors, vec!["#015c0d", "#1d7829", "#399445"]);

    let layout = widget.layout();
    assert_eq!(layout.grid.rows, 2);
    assert_eq!(layout.grid.columns, 2);
    assert_eq!(layout.xaxis.title.text, "flow");
    assert_eq!(layout.yaxis.title.text, "pressure");
}

#[test]
fn test_library_json_result_names_and_nulls() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let results = data::from_json_str(&json).unwrap();
    let widget = widget_from_dsl("correlation(x: flow, y: pressure)", &results);

    let traces = widget.traces();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].name(), "north");
    assert_eq!(traces[1].name(), "density");
    assert_eq!(traces[1].x().len(), 2);
    assert!(traces[1].x()[1].is_null());
    assert_eq!(widget.layout().grid.columns, 2);
    assert_eq!(widget.layout().grid.rows, 1);
}

#[test]
fn test_library_unknown_field_is_reported() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let results = data::from_json_str(&json).unwrap();
    let fields = FieldProvider::from_query_result(&results[0]);
    let (_, spec) = parser::parse_widget_spec("correlation(x: flow, y: humidity)").unwrap();
    let err = WidgetConfig::from_spec(&spec, &fields).unwrap_err();
    assert!(err.to_string().contains("humidity"));
}

#[test]
fn test_end_to_end_json_scatter() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let plot = run_json(&["correlation(x: flow, y: pressure)"], &json);

    let data = plot["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["type"], "scatter");
    assert_eq!(data[0]["mode"], "markers");
    assert_eq!(data[0]["marker"]["size"], 5);
    assert_eq!(data[0]["marker"]["opacity"], 0.9);
    assert_eq!(data[0]["marker"]["color"], "#015c0d");
    assert_eq!(data[1]["marker"]["color"], "#1d7829");
    assert_eq!(data[1]["xaxis"], "x2");
    assert_eq!(data[1]["yaxis"], "y2");
    assert_eq!(data[0]["y"], serde_json::json!([10, 20, 30]));

    assert_eq!(plot["layout"]["grid"]["pattern"], "independent");
    assert_eq!(plot["layout"]["autosize"], true);
    assert_eq!(plot["config"]["displaylogo"], false);
    assert_eq!(plot["config"]["responsive"], true);
}

#[test]
fn test_end_to_end_scatter_key_order() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let stdout = run_seriesplot(&["correlation(x: flow, y: pressure)"], &json).unwrap();
    let text = String::from_utf8(stdout).unwrap();
    assert!(text.starts_with(
        r##"{"data":[{"x":[1.5,2.5,3.5],"y":[10,20,30],"mode":"markers","name":"north","marker":{"color":"#015c0d","size":5,"opacity":0.9},"type":"scatter","xaxis":"x","yaxis":"y"}"##
    ));
}

#[test]
fn test_end_to_end_csv_density_with_appearance() {
    let csv = fs::read_to_string("test/readings.csv").expect("Failed to read test CSV");
    let plot = run_json(
        &[
            r##"correlation(x: flow, y: pressure, display: "Density") | appearance(background: "#1e1e1e", text: "#ffffff") | grid(columns: 3)"##,
            "--format",
            "csv",
            "--group-by",
            "pump",
        ],
        &csv,
    );

    let data = plot["data"].as_array().unwrap();
    assert_eq!(data.len(), 6);
    assert_eq!(data[1]["type"], "histogram2dcontour");
    assert_eq!(data[1]["ncontours"], 20);
    assert_eq!(data[1]["colorscale"], "Hot");
    assert_eq!(data[1]["reversescale"], true);
    assert_eq!(data[1]["showscale"], false);
    assert_eq!(data[0]["marker"]["size"], 2);
    assert_eq!(data[0]["marker"]["opacity"], 0.4);

    assert_eq!(plot["layout"]["grid"]["rows"], 1);
    assert_eq!(plot["layout"]["grid"]["columns"], 3);
    assert_eq!(plot["layout"]["paper_bgcolor"], "#1e1e1e");
    assert_eq!(plot["layout"]["plot_bgcolor"], "#1e1e1e");
    assert_eq!(plot["layout"]["font"]["color"], "#ffffff");
}

#[test]
fn test_end_to_end_size_pins_layout() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let plot = run_json(&["correlation(x: flow, y: pressure) | size(width: 640, height: 480)"], &json);
    assert_eq!(plot["layout"]["autosize"], false);
    assert_eq!(plot["layout"]["width"], 640);
    assert_eq!(plot["layout"]["height"], 480);
}

#[test]
fn test_end_to_end_config_file() {
    let csv = fs::read_to_string("test/readings.csv").expect("Failed to read test CSV");
    let plot = run_json(
        &["--config", "test/widget_config.json", "--format", "csv", "--group-by", "pump"],
        &csv,
    );
    assert_eq!(plot["data"].as_array().unwrap().len(), 6);
    assert_eq!(plot["layout"]["grid"]["columns"], 3);
    assert_eq!(plot["layout"]["font"]["color"], "#ffffff");
}

#[test]
fn test_end_to_end_input_file_and_pretty() {
    let stdout = run_seriesplot(
        &["correlation(x: flow, y: pressure)", "--input", "test/query_result.json", "--pretty"],
        "",
    )
    .unwrap();
    let text = String::from_utf8(stdout).unwrap();
    assert!(text.contains("\n  \"data\": ["));
    let plot: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(plot["data"].as_array().unwrap().len(), 2);
}

#[test]
fn test_end_to_end_empty_result() {
    let plot = run_json(
        &["correlation(x: flow, y: pressure)"],
        r#"{"headers": ["flow", "pressure"], "allDataSeries": []}"#,
    );
    assert_eq!(plot["data"], serde_json::json!([]));
}

#[test]
fn test_end_to_end_preview_png() {
    let empty = r#"{"headers": ["flow", "pressure"], "allDataSeries": []}"#;
    let path = std::env::temp_dir().join(format!("seriesplot-preview-{}.png", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let result = run_seriesplot(&["correlation(x: flow, y: pressure)", "--preview", &path_str], empty);
    assert!(result.is_ok(), "Failed: {:?}", result.err());

    let bytes = fs::read(&path).unwrap();
    let _ = fs::remove_file(&path);
    assert!(is_valid_png(&bytes), "Preview is not a valid PNG");
}

#[test]
fn test_end_to_end_density_preview_png_and_svg() {
    let csv = fs::read_to_string("test/readings.csv").expect("Failed to read test CSV");
    let dsl = r#"correlation(x: flow, y: pressure, display: "Density") | size(width: 600, height: 400)"#;
    let dir = std::env::temp_dir();
    let png_path = dir.join(format!("seriesplot-density-{}.png", std::process::id()));
    let svg_path = dir.join(format!("seriesplot-density-{}.svg", std::process::id()));

    let png_str = png_path.to_string_lossy().to_string();
    let result = run_seriesplot(
        &[dsl, "--format", "csv", "--group-by", "pump", "--preview", &png_str],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png = fs::read(&png_path).unwrap();
    let _ = fs::remove_file(&png_path);
    assert!(is_valid_png(&png), "Preview is not a valid PNG");

    let svg_str = svg_path.to_string_lossy().to_string();
    let result = run_seriesplot(
        &[dsl, "--format", "csv", "--group-by", "pump", "--preview", &svg_str, "--preview-format", "svg"],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = fs::read_to_string(&svg_path).unwrap();
    let _ = fs::remove_file(&svg_path);
    assert!(svg.contains("<circle"), "No markers drawn");
    assert!(svg.contains("<rect"), "No density bins drawn");
}

#[test]
fn test_end_to_end_oversized_preview_rejected() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let path = std::env::temp_dir().join(format!("seriesplot-oversized-{}.png", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let result = run_seriesplot(
        &[
            "correlation(x: flow, y: pressure) | size(width: 40000, height: 40000)",
            "--preview",
            &path_str,
        ],
        &json,
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("40000x40000"));
    assert!(!path.exists());
}

#[test]
fn test_end_to_end_invalid_syntax() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let result = run_seriesplot(&["correlation(x: flow"], &json);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Parse error"));
}

#[test]
fn test_end_to_end_column_not_found() {
    let json = fs::read_to_string("test/query_result.json").expect("Failed to read test JSON");
    let result = run_seriesplot(&["correlation(x: flow, y: humidity)"], &json);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("humidity"));
}

#[test]
fn test_end_to_end_missing_group_by_column() {
    let csv = fs::read_to_string("test/readings.csv").expect("Failed to read test CSV");
    let result = run_seriesplot(
        &["correlation(x: flow, y: pressure)", "--format", "csv", "--group-by", "site"],
        &csv,
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("site"));
}
