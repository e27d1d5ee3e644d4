//! Write [`EnrichmentTable`]s to disk
//!
//! Every table is saved twice: once ordered by p-value and once as
//! `<name>_ranked` ordered by descending fold enrichment.
//!
//! # Examples
//!
//! ```
//! use gsea::export::{OutputFormat, ResultExporter};
//! use gsea::{Enrichment, EnrichmentTable, Term};
//!
//! let table = EnrichmentTable::new(vec![Enrichment::new(
//!     Term::new("GO:0005840", "ribosome", Some("cellular_component")),
//!     0.001,
//!     4,
//!     4,
//!     5.0,
//! )]);
//!
//! let dir = tempfile::tempdir().unwrap();
//! let exporter = ResultExporter::new(dir.path().join("results")).unwrap();
//! let format: OutputFormat = "tsv".parse().unwrap();
//! let files = exporter.save("go_res", &table, format).unwrap();
//!
//! assert!(files[0].ends_with("go_res.tsv"));
//! assert!(files[1].ends_with("go_res_ranked.tsv"));
//! ```
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::debug;

use crate::stats::{f64_from_usize, Enrichment};
use crate::{EnrichmentTable, GseaError, GseaResult};

/// File encoding of exported result tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tab separated values
    #[default]
    Tsv,
    /// Excel spreadsheet
    Xlsx,
}

impl OutputFormat {
    /// The file extension, without a leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GseaError;

    /// Parses a format name, ignoring case
    ///
    /// ```
    /// use gsea::export::OutputFormat;
    ///
    /// assert_eq!("XLSX".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
    /// assert!("pdf".parse::<OutputFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(GseaError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Saves result tables into an output directory
#[derive(Debug, Clone)]
pub struct ResultExporter {
    dir: PathBuf,
}

impl ResultExporter {
    /// Constructs a new [`ResultExporter`], creating `dir` if needed
    ///
    /// # Errors
    ///
    /// [`GseaError::CannotWriteFile`]: The directory can't be created
    pub fn new<P: AsRef<Path>>(dir: P) -> GseaResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|_| GseaError::CannotWriteFile(dir.display().to_string()))?;
        Ok(Self { dir })
    }

    /// The output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `table` as `<name>.<ext>` and `<name>_ranked.<ext>`
    ///
    /// Returns the paths of both files. Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotWriteFile`]: A file can't be created or written
    /// - [`GseaError::Spreadsheet`]: The xlsx encoder failed
    pub fn save(
        &self,
        name: &str,
        table: &EnrichmentTable,
        format: OutputFormat,
    ) -> GseaResult<[PathBuf; 2]> {
        let by_pvalue = self.dir.join(format!("{name}.{}", format.extension()));
        let ranked = self
            .dir
            .join(format!("{name}_ranked.{}", format.extension()));

        match format {
            OutputFormat::Tsv => {
                save_tsv(&by_pvalue, |w| table.write_tsv(w))?;
                save_tsv(&ranked, |w| table.write_ranked_tsv(w))?;
            }
            OutputFormat::Xlsx => {
                save_xlsx(&by_pvalue, table.header(), table.iter())?;
                save_xlsx(&ranked, table.header(), table.ranked().into_iter())?;
            }
        }
        debug!("Saved {} rows to {}", table.len(), by_pvalue.display());
        Ok([by_pvalue, ranked])
    }
}

fn save_tsv<F>(path: &Path, write: F) -> GseaResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let filename = path.display().to_string();
    let file = File::create(path).map_err(|_| GseaError::CannotWriteFile(filename.clone()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|_| GseaError::CannotWriteFile(filename))
}

fn save_xlsx<'a, I>(path: &Path, header: [&str; 7], rows: I) -> GseaResult<()>
where
    I: Iterator<Item = &'a Enrichment>,
{
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, title) in (0u16..).zip(header) {
        sheet.write_string_with_format(0, col, title, &bold)?;
    }
    for (row, enrichment) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, enrichment.id().as_str())?;
        sheet.write_string(row, 1, enrichment.name())?;
        sheet.write_number(row, 2, enrichment.pvalue())?;
        sheet.write_number(row, 3, f64_from_usize(enrichment.count()))?;
        sheet.write_number(row, 4, f64_from_usize(enrichment.term_size()))?;
        sheet.write_number(row, 5, enrichment.enrichment())?;
        sheet.write_number(row, 6, enrichment.score())?;
    }

    workbook.save(path)?;
    Ok(())
}

impl From<XlsxError> for GseaError {
    fn from(err: XlsxError) -> Self {
        GseaError::Spreadsheet(err.to_string())
    }
}
