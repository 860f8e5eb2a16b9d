pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    dim, error, header, info, lifecycle_heading, muted, section, status, success, summary_row, warn,
};
pub use table::{data_table, employee_table, preview_table, stats_table, workflow_table, TableBuilder};
pub use theme::{theme, Theme};
