use panelfix::{DetectionBatch, RelabelConfig, Relabeler};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <batch.json> [config.json] [out.json]", args[0]);
        std::process::exit(2);
    }

    let batch = DetectionBatch::from_json_str(&std::fs::read_to_string(&args[1])?)?;
    let config = match args.get(2) {
        Some(path) => RelabelConfig::from_json_file(Path::new(path))?,
        None => RelabelConfig::default(),
    };

    let panel = Relabeler::new(config).relabel(&batch)?;
    println!(
        "{} buttons in {} rows x {} cols, read {:?}.",
        panel.summary.n_buttons,
        panel.summary.n_rows,
        panel.summary.n_cols,
        panel.template.order()
    );
    for event in &panel.events {
        println!("  {event:?}");
    }

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&panel)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
