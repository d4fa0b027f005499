pub mod charts;
pub mod formatting;
pub mod label_placement;
pub mod normalizer;
pub mod pie_layout;
pub mod report_client;
