// ==========================================
// Proposal Desk - importer error types
// ==========================================
// Scope: structural failures only (the whole file is unusable)
// Field-level problems never become an ImportError
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Structural import failures; each one aborts the import before any row is classified
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== file =====
    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato de arquivo não suportado: {0} (use .xlsx/.xls/.xlsm/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("Falha ao ler o arquivo: {0}")]
    FileReadError(String),

    #[error("Falha ao interpretar a planilha Excel: {0}")]
    ExcelParseError(String),

    #[error("Falha ao interpretar o CSV: {0}")]
    CsvParseError(String),

    // ===== sheet structure =====
    #[error("A planilha não possui abas")]
    NoSheets,

    #[error("A planilha está vazia: {0}")]
    EmptySheet(String),

    // ===== template =====
    #[error("Falha ao gerar o template: {0}")]
    TemplateWriteError(String),

    // ===== generic =====
    #[error("Erro interno: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::TemplateWriteError(err.to_string())
    }
}

/// Result alias for the importer
pub type ImportResult<T> = Result<T, ImportError>;
