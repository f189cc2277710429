use crate::error::ExportError;
use core_types::{ExpenseRecord, IncomeRecord};
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPENSES_SHEET: &str = "Expenses";
pub const INCOME_SHEET: &str = "Income";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One named table of the export: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(title: &str, header: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// The download name, e.g. `financial_data_expenses.csv`.
    pub fn file_name(&self) -> String {
        format!("financial_data_{}.csv", self.title.to_lowercase())
    }

    /// Serializes the header and all rows as CSV.
    pub fn to_csv(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.to_string()))
    }
}

/// The full export of one user's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Builds the "Expenses" and "Income" sheets, in record order.
    pub fn from_records(expenses: &[ExpenseRecord], incomes: &[IncomeRecord]) -> Self {
        let mut expense_sheet =
            Sheet::new(EXPENSES_SHEET, &["Date", "Category", "Amount", "Description"]);
        expense_sheet.rows = expenses
            .iter()
            .map(|e| {
                vec![
                    e.created_at.format(DATE_FORMAT).to_string(),
                    e.category_name().unwrap_or_default().to_string(),
                    e.amount.to_string(),
                    e.name.clone(),
                ]
            })
            .collect();

        let mut income_sheet = Sheet::new(INCOME_SHEET, &["Date", "Source", "Amount"]);
        income_sheet.rows = incomes
            .iter()
            .map(|i| {
                vec![
                    i.created_at.format(DATE_FORMAT).to_string(),
                    i.name.clone(),
                    i.amount.to_string(),
                ]
            })
            .collect();

        Self {
            sheets: vec![expense_sheet, income_sheet],
        }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Looks a sheet up by title, ignoring case.
    pub fn sheet(&self, title: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.title.eq_ignore_ascii_case(title))
    }

    /// Writes every sheet to `dir` and returns the paths written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            let path = dir.join(sheet.file_name());
            fs::write(&path, sheet.to_csv()?)?;
            tracing::info!(path = %path.display(), rows = sheet.rows.len(), "Wrote export sheet.");
            written.push(path);
        }
        Ok(written)
    }
}
