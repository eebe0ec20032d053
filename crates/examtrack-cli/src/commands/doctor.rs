//! The `examtrack doctor` command.

use anyhow::Result;

use examtrack_store::doctor::run_health_check;
use examtrack_store::DataPaths;

pub fn execute(format: String) -> Result<()> {
    let paths = DataPaths::resolve()?;
    let report = run_health_check(&paths);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let icon = |ok: bool| if ok { "OK" } else { "FAIL" };
        println!(
            "Data dir {}: {}",
            paths.root().display(),
            icon(report.data_dir_exists)
        );
        println!("Backups dir: {}", icon(report.backups_dir_exists));
        for (name, ok) in &report.files_exist {
            println!("File {name}: {}", icon(*ok));
        }
        for (name, ok) in &report.schemas_ok {
            println!("Schema {name}: {}", icon(*ok));
        }
        println!("Write probe: {}", icon(report.write_ok));
    }

    if !report.healthy() {
        std::process::exit(1);
    }
    Ok(())
}
