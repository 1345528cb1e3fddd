mod heading;
mod normalize;
mod patterns;
mod table;
mod unit;


pub use heading::{HeadingPath, MAX_HEADING_LEVEL, PATH_SEPARATOR};
pub use normalize::{
    PSEUDO_HEADING_LEVEL, normalize_document, normalize_headings, normalize_line_endings,
    pseudo_heading_title,
};
pub use patterns::{is_figure_label, is_list_item, is_table_label};
pub use table::{
    COLUMN_SEPARATOR, ParsedTable, is_table_divider, is_table_row, is_table_start, parse_table,
    split_row, table_extent,
};
pub use unit::{StructuralUnit, classify_line};

pub(crate) use patterns::Patterns;
