pub mod formatter;

pub use formatter::{
    format_deal, format_entry_detail, format_pipeline_table, format_pipeline_tsv, format_stages,
    format_summary, should_use_colors,
};
