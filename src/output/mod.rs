pub mod formatter;

pub use formatter::{
    format_age_group_awards, format_age_groups, format_awards, format_diagnostics,
    format_individual, format_report, format_team_standings, should_use_colors,
};
