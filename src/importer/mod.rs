// ==========================================
// Proposal Desk - import layer
// ==========================================
// Responsibility: spreadsheet → validated candidate proposals
// Pipeline: file_parser → column_map → row_classifier
//           (numeric + proposal_synthesizer) → batch_validator
// Supports: Excel, CSV
// ==========================================

pub mod batch_validator;
pub mod column_map;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod numeric;
pub mod proposal_synthesizer;
pub mod row_classifier;
pub mod template;

// Re-export core types
pub use batch_validator::{validate, BatchValidation};
pub use column_map::ColumnMap;
pub use error::{ImportError, ImportResult};
pub use file_parser::{select_sheet, CsvParser, ExcelParser, UniversalFileParser, DEFAULT_SHEET_KEYWORD};
pub use importer_trait::{FileParser, ParsedSheet};
pub use numeric::{literal_number, normalize, same_amount};
pub use proposal_synthesizer::{synthesize, AcceptedRow, ImportContext};
pub use row_classifier::{classify, BlankRowPolicy, ClassifierContext};
pub use template::{write_template, OFFICIAL_HEADERS, TEMPLATE_FILE_NAME};
