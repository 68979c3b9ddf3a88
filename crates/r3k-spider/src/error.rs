use thiserror::Error;

/// Failures while reading EDGAR listing and filing index pages.
#[derive(Debug, Error)]
pub enum EdgarError {
    #[error("no table found on {0}")]
    MissingTable(String),

    #[error("table row has {found} cells but the header has {expected}")]
    RowWidth { expected: usize, found: usize },

    #[error("\"{field}\" missing from {uri}")]
    MissingField { uri: String, field: &'static str },

    #[error("no N-CSR document listed on {0}")]
    NoMainDocument(String),

    #[error("invalid date \"{0}\"")]
    Date(String),

    #[error("invalid document size \"{0}\"")]
    Size(String),

    #[error("unknown filing format version {0}")]
    Version(u8),
}

/// Failures while extracting holdings from a raw N-CSR document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no Russell 3000 schedule of investments found")]
    NoSchedule,

    #[error("unexpected schedule header: {0}")]
    Header(String),

    #[error("unexpected fund name \"{0}\"")]
    FundName(String),

    #[error("unrecognised report date \"{0}\"")]
    ReportDate(String),

    #[error("unexpected number of tables on first holdings page: {0}")]
    TableLayout(usize),

    #[error("malformed holdings column: {0}")]
    Column(String),

    #[error("unexpected row format: {0:?}")]
    Row(Vec<String>),

    #[error("invalid integer \"{0}\"")]
    Integer(String),

    #[error("holding \"{0}\" listed before any sector heading")]
    OrphanHolding(String),

    #[error("sector total {0} listed before any sector heading")]
    OrphanTotal(i64),

    #[error("duplicate total for sector \"{0}\"")]
    DuplicateTotal(String),

    #[error("schedule ended without a total for common stocks")]
    MissingGrandTotal,

    #[error("{label} reports {stated} but holdings sum to {derived}")]
    TotalMismatch {
        label: String,
        stated: i64,
        derived: i64,
    },

    #[error("holdings pages disagree on fund name or report date")]
    InconsistentPages,
}
