// ==========================================
// Expo Lead Fusion - Loader Layer
// ==========================================
// Responsibility: turn external source files into lead records
// Supports: OCR+QR extraction JSON, Excel (.xlsx/.xls), CSV
// ==========================================

pub mod error;
pub mod extraction_json;
pub mod sheet;

// Re-export core types
pub use error::{LoadError, LoadResult};
pub use extraction_json::ExtractionJsonLoader;
pub use sheet::{CsvSheetParser, ExcelSheetParser, SheetParser, UniversalSheetParser};
