use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use seriesplot::{
    csv_reader, data, parser, preview, telemetry, CorrelationChartWidget, FieldProvider, OutputFormat,
    QueryResult, RenderOptions, WidgetConfig,
};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "seriesplot")]
#[command(about = "Turn tag-grouped query results into a correlation plot specification", long_about = None)]
struct Args {
    /// Chart DSL (e.g., 'correlation(x: flow, y: pressure, display: "Density") | grid(columns: 3)')
    #[arg(required_unless_present = "config")]
    dsl: Option<String>,

    /// Widget configuration JSON instead of a DSL string
    #[arg(long, conflicts_with = "dsl")]
    config: Option<PathBuf>,

    /// Query result file (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = InputFormat::Json)]
    format: InputFormat,

    /// CSV column whose values split rows into series groups
    #[arg(long)]
    group_by: Option<String>,

    /// Pretty-print the plot specification
    #[arg(long)]
    pretty: bool,

    /// Also render a preview image to this path
    #[arg(long)]
    preview: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    preview_format: OutputFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _ = telemetry::init_default_tracing();

    let results = read_results(&args).context("Failed to read query result")?;
    let fields = results
        .first()
        .map(FieldProvider::from_query_result)
        .unwrap_or_default();

    let config = match (&args.config, &args.dsl) {
        (Some(path), _) => WidgetConfig::load(path)?,
        (None, Some(dsl)) => {
            let spec = match parser::parse_widget_spec(dsl) {
                Ok((_, spec)) => spec,
                Err(e) => {
                    eprintln!("Parse error: {:?}", e);
                    std::process::exit(1);
                }
            };
            WidgetConfig::from_spec(&spec, &fields)?
        }
        (None, None) => unreachable!("clap requires a DSL or --config"),
    };

    for field in [&config.visualization_config.first_field, &config.visualization_config.second_field]
        .into_iter()
        .flatten()
    {
        if !field.is_numeric() {
            warn!(field = %field.full_db_name, "correlating a non-numeric field");
        }
    }

    let size = config.size;
    let mut widget = CorrelationChartWidget::new(config, fields);
    widget.before_data_fetched();
    widget
        .on_data_received(&results)
        .context("Failed to build plot specification")?;
    if let Some((width, height)) = size {
        widget.on_resize(width, height);
        widget.refresh_view();
    }

    let plot = widget.plot_spec();
    let json = if args.pretty {
        serde_json::to_string_pretty(&plot)
    } else {
        serde_json::to_string(&plot)
    }
    .context("Failed to serialize plot specification")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write plot specification to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    if let Some(path) = &args.preview {
        let options = RenderOptions {
            format: args.preview_format,
            ..RenderOptions::default()
        };
        let bytes = preview::render_preview(&plot, &options).context("Failed to render preview")?;
        fs::write(path, bytes).with_context(|| format!("Failed to write preview to {}", path.display()))?;
    }

    Ok(())
}

fn read_results(args: &Args) -> Result<Vec<QueryResult>> {
    match args.format {
        InputFormat::Csv => {
            let group_by = args.group_by.as_deref();
            let result = match &args.input {
                Some(path) => {
                    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
                    csv_reader::read_csv(file, group_by)?
                }
                None => csv_reader::read_csv_from_stdin(group_by)?,
            };
            Ok(vec![result])
        }
        InputFormat::Json => {
            let text = match &args.input {
                Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
                    buf
                }
            };
            data::from_json_str(&text)
        }
    }
}
