use super::fs_utils::ensure_writable;
use super::json_csv::{export_csv, export_json};
use super::{ExportFormat, HrpEntryExport};
use crate::core::hrp::entries::month_entries;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write one user's HRP entries for `year`-`month`; returns the row count.
    pub fn export_month(
        pool: &mut DbPool,
        user_id: &str,
        year: i32,
        month: u32,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        // the log row is only committed once the file has been written
        pool.with_write_tx(|tx| {
            let rows: Vec<HrpEntryExport> = month_entries(tx, user_id, year, month)?
                .iter()
                .map(HrpEntryExport::from)
                .collect();

            if rows.is_empty() {
                warning(format!(
                    "No HRP entries for {} in {:04}-{:02}; writing an empty export.",
                    user_id, year, month
                ));
            }

            ttlog(
                tx,
                "export",
                user_id,
                &format!(
                    "{} rows for {:04}-{:02} as {} to {}",
                    rows.len(),
                    year,
                    month,
                    format.as_str(),
                    path.display()
                ),
            )?;

            match format {
                ExportFormat::Csv => export_csv(&rows, path)?,
                ExportFormat::Json => export_json(&rows, path)?,
            }

            Ok(rows.len())
        })
    }
}
