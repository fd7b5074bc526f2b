pub mod text_summary;
