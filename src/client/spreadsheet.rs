use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::{ClientConfig, Worksheet};
use crate::excel::{Workbook, open_workbook};

const DEFAULT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone)]
pub struct SpreadsheetClient {
    config: ClientConfig,
}

impl SpreadsheetClient {
    /// Checks the configured store and returns a client bound to it.
    pub fn authorize(config: ClientConfig) -> Result<Self> {
        if !config.root.is_dir() {
            anyhow::bail!(
                "Spreadsheet directory does not exist: {}",
                config.root.display()
            );
        }

        log::info!("Authorized against {}", config.root.display());
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn open(&self, name: &str) -> Result<Spreadsheet> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            anyhow::bail!("Spreadsheet not found: {} ({})", name, path.display());
        }

        let workbook = open_workbook(
            &path,
            (self.config.default_rows, self.config.default_cols),
        )?;
        log::info!("Opened spreadsheet '{}'", name);

        Ok(Spreadsheet {
            name: name.to_string(),
            path,
            workbook,
            config: self.config.clone(),
        })
    }

    /// Creates a new spreadsheet with a single empty `Sheet1` and writes it out.
    pub fn create(&self, name: &str) -> Result<Spreadsheet> {
        let path = self.path_for(name)?;
        if path.exists() {
            anyhow::bail!("Spreadsheet already exists: {} ({})", name, path.display());
        }

        let mut workbook = Workbook::new();
        workbook.add_worksheet(
            DEFAULT_SHEET_NAME,
            self.config.default_rows,
            self.config.default_cols,
        )?;
        workbook.save(&path)?;
        log::info!("Created spreadsheet '{}'", name);

        Ok(Spreadsheet {
            name: name.to_string(),
            path,
            workbook,
            config: self.config.clone(),
        })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            anyhow::bail!("Invalid spreadsheet name: {:?}", name);
        }

        Ok(self.config.root.join(format!("{}.xlsx", name)))
    }
}

pub struct Spreadsheet {
    name: String,
    path: PathBuf,
    workbook: Workbook,
    config: ClientConfig,
}

impl Spreadsheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    pub fn is_modified(&self) -> bool {
        self.workbook.is_modified()
    }

    pub fn worksheet(&mut self, sheet_name: &str) -> Result<Worksheet<'_>> {
        let spreadsheet = self.name.clone();
        let sheet = self.workbook.sheet_mut(sheet_name).with_context(|| {
            format!("Worksheet '{}' not found in '{}'", sheet_name, spreadsheet)
        })?;

        Ok(Worksheet::new(sheet))
    }

    /// Adds one worksheet per name, each with the configured default grid.
    pub fn create_sheets<S: AsRef<str>>(&mut self, sheet_names: &[S]) -> Result<()> {
        for name in sheet_names {
            let name = name.as_ref();
            self.workbook
                .add_worksheet(name, self.config.default_rows, self.config.default_cols)
                .with_context(|| format!("Unable to add worksheet to '{}'", self.name))?;
            log::debug!("Added worksheet '{}' to '{}'", name, self.name);
        }

        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        if !self.workbook.is_modified() {
            log::info!("No changes to save.");
            return Ok(());
        }

        if self.config.backup_on_save && self.path.is_file() {
            let backup = backup_path(&self.path);
            fs::copy(&self.path, &backup)
                .with_context(|| format!("Unable to write backup: {}", backup.display()))?;
            log::info!("Backed up '{}' to {}", self.name, backup.display());
        }

        self.workbook.save(&self.path)?;
        log::info!("Saved spreadsheet '{}'", self.name);
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let file_stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("sheet");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("xlsx");
    let parent_dir = path.parent().unwrap_or_else(|| Path::new(""));

    parent_dir.join(format!("{}_{}.{}", file_stem, timestamp, extension))
}
