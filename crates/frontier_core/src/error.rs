use std::fmt;
use std::path::PathBuf;

use jiff::civil::Date;

/// Errors raised while reading price files into `PriceSeries`
#[derive(Debug)]
pub enum IngestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        file: String,
        source: csv::Error,
    },
    /// No `Close` / `Adj Close` / `Price` style header
    MissingColumn { file: String },
    /// No `Date` header
    MissingDateColumn { file: String },
    /// None of the accepted date patterns parses every date cell
    UnrecognizedDateFormat { file: String, value: String },
    InvalidPrice {
        file: String,
        line: u64,
        value: String,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            IngestError::Csv { file, source } => write!(f, "malformed CSV in {file}: {source}"),
            IngestError::MissingColumn { file } => write!(
                f,
                "file {file} does not contain a 'Close', 'Adj Close' or 'Price' column"
            ),
            IngestError::MissingDateColumn { file } => {
                write!(f, "file {file} does not contain a 'Date' column")
            }
            IngestError::UnrecognizedDateFormat { file, value } => write!(
                f,
                "file {file}: date {value:?} does not match any accepted format \
                 (YYYY-MM-DD, DD-MM-YYYY, YYYY/MM/DD, DD/MM/YYYY)"
            ),
            IngestError::InvalidPrice { file, line, value } => {
                write!(f, "file {file}, line {line}: invalid price {value:?}")
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io { source, .. } => Some(source),
            IngestError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors related to the shape of the input data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    InsufficientData {
        context: String,
        required: usize,
        available: usize,
    },
    NoAssets,
    DuplicateTicker {
        ticker: String,
    },
    RaggedColumn {
        ticker: String,
        expected: usize,
        actual: usize,
    },
    /// Row index must be strictly ascending
    UnorderedDates,
    /// A return cell is NaN or infinite
    NonFiniteReturn {
        ticker: String,
        date: Date,
    },
}

impl DataError {
    pub(crate) fn insufficient(context: impl Into<String>, required: usize, available: usize) -> Self {
        DataError::InsufficientData {
            context: context.into(),
            required,
            available,
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::InsufficientData {
                context,
                required,
                available,
            } => write!(
                f,
                "insufficient data for {context}: need at least {required}, got {available}"
            ),
            DataError::NoAssets => write!(f, "no assets supplied"),
            DataError::DuplicateTicker { ticker } => {
                write!(f, "ticker {ticker} supplied more than once")
            }
            DataError::RaggedColumn {
                ticker,
                expected,
                actual,
            } => write!(
                f,
                "return column {ticker} has {actual} values, expected {expected}"
            ),
            DataError::UnorderedDates => write!(f, "return dates are not strictly ascending"),
            DataError::NonFiniteReturn { ticker, date } => {
                write!(f, "return for {ticker} on {date} is not a finite number")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Errors raised by the Monte Carlo simulator
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Mean / covariance / weight lengths disagree. Indicates a caller bug.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    /// Every trial had a non-finite Sharpe ratio
    NoValidTrial,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(f, "dimension mismatch in {what}: expected {expected}, got {actual}"),
            SimulationError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {name}: {reason}")
            }
            SimulationError::NoValidTrial => write!(
                f,
                "no trial produced a finite Sharpe ratio; max-Sharpe portfolio unavailable"
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Errors related to the country rate table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    UnknownCountry {
        country: String,
        available: Vec<String>,
    },
}

impl fmt::Display for RateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateError::UnknownCountry { country, available } => write!(
                f,
                "unknown country: {country}. Available: {}",
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for RateError {}

/// Errors raised while writing simulation output
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "export I/O error: {e}"),
            ExportError::Csv(e) => write!(f, "export CSV error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

/// Umbrella error for a full ingest → align → simulate run
#[derive(Debug)]
pub enum Error {
    Ingest(IngestError),
    Data(DataError),
    Simulation(SimulationError),
    Rate(RateError),
    Export(ExportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Ingest(e) => write!(f, "{e}"),
            Error::Data(e) => write!(f, "{e}"),
            Error::Simulation(e) => write!(f, "{e}"),
            Error::Rate(e) => write!(f, "{e}"),
            Error::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Ingest(e) => Some(e),
            Error::Data(e) => Some(e),
            Error::Simulation(e) => Some(e),
            Error::Rate(e) => Some(e),
            Error::Export(e) => Some(e),
        }
    }
}

impl From<IngestError> for Error {
    fn from(err: IngestError) -> Self {
        Error::Ingest(err)
    }
}

impl From<DataError> for Error {
    fn from(err: DataError) -> Self {
        Error::Data(err)
    }
}

impl From<SimulationError> for Error {
    fn from(err: SimulationError) -> Self {
        Error::Simulation(err)
    }
}

impl From<RateError> for Error {
    fn from(err: RateError) -> Self {
        Error::Rate(err)
    }
}

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        Error::Export(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
