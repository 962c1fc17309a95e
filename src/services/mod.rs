pub mod export;
pub mod pdf_renderer;
pub mod persistence;

pub use export::{
    export_filename, qualifying_rows, Align, DocumentExporter, DocumentRenderer, ExportRow,
    Table, TitleStyle,
};
pub use pdf_renderer::PdfRenderer;
pub use persistence::{decode_snapshot, encode_snapshot, RosterRepository, STORAGE_KEY};
