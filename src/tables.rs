use std::sync::LazyLock;

use regex::Regex;

static GRID_BORDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\+-([+-]+)-\+$").expect("grid border pattern is valid")
});

/// Turns `+---+---+` grid-table borders into pipe-table rows so pandoc's
/// `pipe_tables` reader accepts them.
pub fn normalize_grid_borders(input: &str) -> String {
    GRID_BORDER.replace_all(input, "| $1 |").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_border_lines_only() {
        let input = "+---+---+\n| a | b |\n+---+---+\ntext +-x-+\n";
        assert_eq!(
            normalize_grid_borders(input),
            "| --+-- |\n| a | b |\n| --+-- |\ntext +-x-+\n"
        );
    }

    #[test]
    fn leaves_header_separators_alone() {
        let input = "+===+===+\n";
        assert_eq!(normalize_grid_borders(input), input);
    }
}
