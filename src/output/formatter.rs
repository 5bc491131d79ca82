use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{
    AgeGroupAwards, AgeGroupResult, Diagnostics, RaceReport, RankedEntry, TeamStanding,
};
use crate::timing::format_time;

/// Widest name column, used when output is piped
const MAX_NAME_WIDTH: usize = 24;
const MIN_NAME_WIDTH: usize = 10;
/// Place + bib + time columns with separators
const FIXED_WIDTH: usize = 6 + 7 + 13;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Name column width for the current terminal
fn name_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize)
            .saturating_sub(FIXED_WIDTH)
            .clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH),
        None => MAX_NAME_WIDTH,
    }
}

/// Truncate a name to fit the column, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn heading(title: &str, use_colors: bool) -> String {
    let rule = "=".repeat(title.chars().count());
    if use_colors {
        format!("{}\n{}", title.bold(), rule.dimmed())
    } else {
        format!("{}\n{}", title, rule)
    }
}

fn entry_line(place: u32, entry: &RankedEntry, width: usize, use_colors: bool) -> String {
    let name = truncate_name(&entry.name, width);
    let time = format_time(Some(entry.finish_time));
    if use_colors {
        format!(
            "{:>4}. {:>6} {:<width$} {:>12}",
            place.dimmed(),
            entry.bib.cyan(),
            name,
            time.bold(),
            width = width
        )
    } else {
        format!(
            "{:>4}. {:>6} {:<width$} {:>12}",
            place,
            entry.bib,
            name,
            time,
            width = width
        )
    }
}

/// Overall results, one finisher per line
pub fn format_individual(entries: &[RankedEntry], use_colors: bool) -> String {
    format_entries("INDIVIDUAL RESULTS", entries, use_colors)
}

/// Overall award winners
pub fn format_awards(awards: &[RankedEntry], use_colors: bool) -> String {
    format_entries("AWARDS", awards, use_colors)
}

fn format_entries(title: &str, entries: &[RankedEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return format!("{}\nNo race results found.", heading(title, use_colors));
    }
    let width = name_width();
    let mut lines = vec![heading(title, use_colors)];
    lines.extend(
        entries
            .iter()
            .map(|e| entry_line(e.place, e, width, use_colors)),
    );
    lines.join("\n")
}

/// Team standings with scorers and displacers
pub fn format_team_standings(
    standings: &[TeamStanding],
    unscored_teams: &[String],
    use_colors: bool,
) -> String {
    let mut lines = vec![heading("TEAM RESULTS", use_colors)];
    if standings.is_empty() {
        lines.push("No team has five finishers.".to_string());
    }

    let width = name_width();
    for standing in standings {
        let summary = &standing.summary;
        let rank = if standing.tied {
            format!("T{}", standing.rank)
        } else {
            standing.rank.to_string()
        };
        let header = format!("{:>4}. {}  score {}", rank, summary.team, summary.score);
        if use_colors {
            lines.push(header.bold().to_string());
        } else {
            lines.push(header);
        }
        for scorer in &summary.scorers {
            lines.push(format!("  {}", entry_line(scorer.place, scorer, width, use_colors)));
        }
        for displacer in &summary.displacers {
            let line = format!(
                "  {} (displacer)",
                entry_line(displacer.place, displacer, width, false)
            );
            if use_colors {
                lines.push(line.dimmed().to_string());
            } else {
                lines.push(line);
            }
        }
    }

    if !unscored_teams.is_empty() {
        lines.push(format!(
            "Not scored (fewer than five finishers): {}",
            unscored_teams.join(", ")
        ));
    }
    lines.join("\n")
}

/// Age group results with group and overall places
pub fn format_age_groups(groups: &[AgeGroupResult], use_colors: bool) -> String {
    let mut lines = vec![heading("AGE GROUP RESULTS", use_colors)];
    if groups.is_empty() {
        lines.push("No runners could be placed in an age group.".to_string());
    }

    let width = name_width();
    for group in groups {
        let title = format!("Age Group {}", group.bracket);
        if use_colors {
            lines.push(title.bold().to_string());
        } else {
            lines.push(title);
        }
        for member in &group.entries {
            let age = member
                .entry
                .age
                .map(|a| a.to_string())
                .unwrap_or_default();
            lines.push(format!(
                "{}  (overall {}, age {})",
                entry_line(member.group_place, &member.entry, width, use_colors),
                member.entry.place,
                age
            ));
        }
    }
    lines.join("\n")
}

/// Award winners inside each age group
pub fn format_age_group_awards(awards: &[AgeGroupAwards], use_colors: bool) -> String {
    let mut lines = vec![heading("AGE GROUP AWARDS", use_colors)];
    let width = name_width();
    for group in awards {
        lines.push(format!("Age Group {}", group.bracket));
        for winner in &group.winners {
            lines.push(entry_line(winner.group_place, &winner.entry, width, use_colors));
        }
    }
    lines.join("\n")
}

/// Data problems found while scoring; empty when there were none
pub fn format_diagnostics(diagnostics: &Diagnostics, use_colors: bool) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }
    let mut lines = vec![heading("WARNINGS", use_colors)];
    for warning in &diagnostics.warnings {
        let line = format!("  - {}", warning);
        if use_colors {
            lines.push(line.yellow().to_string());
        } else {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Every section that applies to the report's race type
pub fn format_report(report: &RaceReport, use_colors: bool) -> String {
    let mut sections = vec![
        format!("{} race on {}", report.race_type, report.race_date),
        format_individual(&report.individual, use_colors),
    ];
    if !report.teams.is_empty() || !report.unscored_teams.is_empty() {
        sections.push(format_team_standings(
            &report.teams,
            &report.unscored_teams,
            use_colors,
        ));
    }
    if !report.age_groups.is_empty() {
        sections.push(format_age_groups(&report.age_groups, use_colors));
    }
    sections.push(format_awards(&report.awards, use_colors));
    if !report.age_group_awards.is_empty() {
        sections.push(format_age_group_awards(&report.age_group_awards, use_colors));
    }
    let diagnostics = format_diagnostics(&report.diagnostics, use_colors);
    if !diagnostics.is_empty() {
        sections.push(diagnostics);
    }
    sections.join("\n\n")
}
