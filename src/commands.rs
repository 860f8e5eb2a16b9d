use anyhow::Context;
use chrono::NaiveDate;
use hrdesk::config::{default_config, ensure_db_dir, write_config, Settings};
use hrdesk::output::{emit_success, OutputMode};
use hrdesk::query::{DateWindow, QueryEngine};
use hrdesk::server::{prepare_database, start_server};
use hrdesk::storage::{HrStore, SchemaState};
use hrdesk::ui::{self, Icons, TableBuilder};
use hrdesk::upload;
use owo_colors::OwoColorize;
use std::path::Path;

/// Open the configured database, creating and seeding it on first use
fn open_store(settings: &Settings) -> anyhow::Result<HrStore> {
    prepare_database(&settings.database, settings.seed_demo)?;
    let store = HrStore::open(&settings.database)
        .with_context(|| format!("failed to open {}", settings.database.display()))?;
    Ok(store)
}

pub fn run_init(output_mode: OutputMode, settings: &Settings, no_seed: bool, reset: bool) -> anyhow::Result<()> {
    ensure_db_dir(&settings.database)?;
    let store = HrStore::open(&settings.database)?;
    if reset {
        tracing::info!("Dropping all tables in {}", settings.database.display());
        store.reset_schema()?;
    }

    let state = store.ensure_schema()?;
    let seeded = match state {
        SchemaState::AlreadyInitialized => None,
        SchemaState::Created if no_seed || !settings.seed_demo => {
            store.mark_initialized()?;
            None
        }
        SchemaState::Created => {
            let today = chrono::Local::now().date_naive();
            store.seed_demo_data(today, &mut rand::thread_rng())?
        }
    };
    let tables = store.list_tables()?;

    if output_mode.is_human() {
        ui::header("hrdesk init");
        ui::status(Icons::DATABASE, "Database", &settings.database.display().to_string());
        match (&state, &seeded) {
            (SchemaState::AlreadyInitialized, _) => ui::success("Already initialized, nothing to do"),
            (_, Some(summary)) => {
                ui::status(
                    Icons::SEED,
                    "Seeded",
                    &format!("{} employees, {} leaving soon", summary.employees, summary.leavers),
                );
                ui::success(&format!("Created {} tables and seeded {} rows", tables.len(), summary.rows));
            }
            (_, None) => ui::success(&format!("Created {} empty tables", tables.len())),
        }
    } else {
        let data = serde_json::json!({
            "database": settings.database.display().to_string(),
            "state": match state {
                SchemaState::Created => "created",
                SchemaState::AlreadyInitialized => "already_initialized",
            },
            "tables": tables,
            "seeded": seeded,
        });
        emit_success(output_mode, "init", &data)?;
    }
    Ok(())
}

pub fn run_dashboard(
    output_mode: OutputMode,
    settings: &Settings,
    from: Option<NaiveDate>,
    days: Option<u32>,
) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let engine = QueryEngine::new(&store);
    let start = from.unwrap_or_else(|| chrono::Local::now().date_naive());
    let window = DateWindow::starting(start, days.unwrap_or(settings.window_days))?;
    let view = engine.dashboard(window)?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "dashboard", &view);
    }

    let counts = &view.counts;
    ui::header(&format!("{} Dashboard {}", Icons::CALENDAR, window));
    println!(
        "{}",
        ui::stats_table(&[
            ("Onboarding", &counts.onboarding.total.to_string()),
            ("  Freshers", &counts.onboarding.freshers.to_string()),
            ("  Experienced", &counts.onboarding.experienced.to_string()),
            ("Offboarding", &counts.offboarding.total.to_string()),
            ("  Freshers", &counts.offboarding.freshers.to_string()),
            ("  Experienced", &counts.offboarding.experienced.to_string()),
        ])
    );

    ui::lifecycle_heading(true, view.joiners.len());
    if view.joiners.is_empty() {
        println!("  {}", ui::muted("none"));
    } else {
        println!("{}", ui::employee_table(&view.joiners));
    }

    ui::lifecycle_heading(false, view.leavers.len());
    if view.leavers.is_empty() {
        println!("  {}", ui::muted("none"));
    } else {
        println!("{}", ui::employee_table(&view.leavers));
    }

    ui::section(&format!(" {} Rows per table ", Icons::STATS));
    let mut builder = TableBuilder::new();
    for count in &counts.table_counts {
        builder.add_row(&count.table, &count.rows.to_string());
    }
    println!("{}", builder.build());
    Ok(())
}

pub fn run_tables(output_mode: OutputMode, settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let counts = store.table_counts()?;

    if output_mode.is_human() {
        ui::header(&format!("{} tables", counts.len()));
        let mut builder = TableBuilder::new();
        for (table, rows) in &counts {
            builder.add_row(table, &rows.to_string());
        }
        println!("{}", builder.build());
    } else {
        let data: Vec<_> = counts
            .iter()
            .map(|(table, rows)| serde_json::json!({ "table": table, "rows": rows }))
            .collect();
        emit_success(output_mode, "tables", &data)?;
    }
    Ok(())
}

pub fn run_show(output_mode: OutputMode, settings: &Settings, table: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let data = QueryEngine::new(&store).table_rows(table, limit.unwrap_or(settings.row_limit))?;

    if output_mode.is_human() {
        ui::header(&format!("{} {}", Icons::TABLE, table));
        if data.is_empty() {
            println!("  {}", ui::muted("no rows"));
        } else {
            println!("{}", ui::data_table(&data));
            ui::summary_row("rows shown:", &data.len().to_string());
        }
    } else {
        emit_success(output_mode, "show", &data)?;
    }
    Ok(())
}

pub fn run_columns(output_mode: OutputMode, settings: &Settings, table: &str) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let columns = QueryEngine::new(&store).table_columns(table)?;

    if output_mode.is_human() {
        ui::header(&format!("Upload columns for {}", table));
        for column in &columns {
            println!("  {}", column.bold());
        }
    } else {
        let data = serde_json::json!({ "table": table, "columns": columns });
        emit_success(output_mode, "columns", &data)?;
    }
    Ok(())
}

const PREVIEW_ROWS: usize = 5;

/// Parse `file`, show a preview in human mode, then insert it
fn upload_with_preview(
    engine: &QueryEngine<'_>,
    output_mode: OutputMode,
    table: &str,
    file: &Path,
) -> hrdesk::Result<usize> {
    // Unknown tables fail before the file is read
    let expected = engine.table_columns(table)?;
    let rows = upload::read_file(file)?;

    if output_mode.is_human() {
        ui::status(Icons::UPLOAD, "File", &file.display().to_string());
        ui::info("Rows in file", &rows.len().to_string());
        if rows.is_empty() {
            ui::warn("File has a header but no rows");
        } else {
            println!("{}", ui::preview_table(table, &rows, PREVIEW_ROWS));
        }
    }
    engine.bulk_insert(table, &rows, &expected)
}

pub fn run_upload(output_mode: OutputMode, settings: &Settings, table: &str, file: &Path) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let engine = QueryEngine::new(&store);

    let inserted = match upload_with_preview(&engine, output_mode, table, file) {
        Ok(n) => n,
        Err(err) => {
            if output_mode.is_human() {
                let missing = err.missing_columns();
                let unexpected = err.unexpected_columns();
                if !missing.is_empty() {
                    ui::summary_row("missing columns:", &missing.join(", "));
                }
                if !unexpected.is_empty() {
                    ui::summary_row("unexpected columns:", &unexpected.join(", "));
                }
            }
            return Err(anyhow::Error::new(err)
                .context(format!("upload of {} into {} failed; no rows were written", file.display(), table)));
        }
    };

    if output_mode.is_human() {
        ui::success(&format!("Inserted {} rows into {}", inserted, table));
    } else {
        let data = serde_json::json!({
            "table": table,
            "file": file.display().to_string(),
            "inserted": inserted,
        });
        emit_success(output_mode, "upload", &data)?;
    }
    Ok(())
}

pub fn run_workflow(output_mode: OutputMode, settings: &Settings, status: Option<&str>) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let tasks = QueryEngine::new(&store).workflow_tasks(status)?;

    if output_mode.is_human() {
        ui::header(&format!("{} Workflow tasks", Icons::TASK));
        if tasks.is_empty() {
            println!("  {}", ui::muted("no tasks"));
        } else {
            println!("{}", ui::workflow_table(&tasks));
        }
    } else {
        emit_success(output_mode, "workflow", &tasks)?;
    }
    Ok(())
}

pub fn run_serve(settings: Settings, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(settings.port);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(start_server(port, settings))
}

pub fn run_config(output_mode: OutputMode, path: &Path, force: bool) -> anyhow::Result<()> {
    write_config(path, &default_config(), force)?;

    if output_mode.is_human() {
        ui::status(Icons::GEAR, "Config", &path.display().to_string());
        ui::success("Wrote default config");
    } else {
        let data = serde_json::json!({ "path": path.display().to_string() });
        emit_success(output_mode, "config", &data)?;
    }
    Ok(())
}
