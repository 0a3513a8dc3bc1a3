//! Rendering of cohort views: terminal summary and Plotters bar charts

use crate::view::{Distribution, ViewModel};
use plotters::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Width in characters of the longest bar in the terminal summary
const TEXT_BAR_WIDTH: usize = 30;

const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);

/// Render the heading, description, cohort size and a text bar chart per attribute
pub fn render_summary(view: &ViewModel) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "You are closest to the group: {}", view.name);
    let _ = writeln!(out, "({})", view.cluster);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", view.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "People in your group: {}", view.cohort_size);

    for distribution in &view.distributions {
        let _ = writeln!(out);
        out.push_str(&render_text_distribution(distribution));
    }

    out
}

/// Horizontal text histogram of one distribution
pub fn render_text_distribution(distribution: &Distribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", distribution.title);
    let _ = writeln!(
        out,
        "  {} / {}",
        distribution.x_label, distribution.y_label
    );

    if distribution.bins.is_empty() {
        let _ = writeln!(out, "  (no answers)");
        return out;
    }

    let label_width = distribution
        .bins
        .iter()
        .map(|bin| bin.category.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = distribution.max_count().max(1);

    for bin in &distribution.bins {
        let bar_len = (bin.count * TEXT_BAR_WIDTH).div_ceil(max_count);
        let padding = label_width - bin.category.chars().count();
        let _ = writeln!(
            out,
            "  {}{} | {} {}",
            bin.category,
            " ".repeat(padding),
            "#".repeat(bar_len),
            bin.count
        );
    }

    out
}

/// Draw one bar chart for a distribution and save it as PNG
pub fn create_distribution_chart(distribution: &Distribution, output_path: &Path) -> crate::Result<()> {
    let categories: Vec<&str> = distribution.bins.iter().map(|bin| bin.category).collect();
    let max_count = distribution.max_count().max(1);
    let y_max = max_count + max_count / 10 + 1;

    let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&distribution.title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..categories.len().max(1)).into_segmented(), 0usize..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(distribution.x_label.as_str())
        .y_desc(distribution.y_label.as_str())
        .x_label_formatter(&|value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(idx) => categories
                .get(*idx)
                .map(|category| category.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(10)
            .data(
                distribution
                    .bins
                    .iter()
                    .enumerate()
                    .map(|(idx, bin)| (idx, bin.count)),
            ),
    )?;

    root.present()?;
    Ok(())
}

/// File name of the chart for a distribution, e.g. `fav_place.png`
pub fn chart_file_name(distribution: &Distribution) -> String {
    format!("{}.png", distribution.attribute.column())
}

/// Write every distribution chart of a view into `output_dir`
pub fn render_charts(view: &ViewModel, output_dir: &Path) -> crate::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(view.distributions.len());
    for distribution in &view.distributions {
        let path = output_dir.join(chart_file_name(distribution));
        create_distribution_chart(distribution, &path)?;
        info!(chart = %path.display(), "saved distribution chart");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterId;
    use crate::survey::Attribute;
    use crate::view::Bin;

    fn create_test_view() -> ViewModel {
        let distributions = Attribute::ALL
            .iter()
            .map(|&attribute| Distribution {
                attribute,
                title: format!("{} distribution in the group", attribute.label()),
                x_label: attribute.label().to_string(),
                y_label: "Number of people".to_string(),
                bins: if attribute == Attribute::Gender {
                    vec![
                        Bin { category: "Mężczyzna", count: 10 },
                        Bin { category: "Kobieta", count: 5 },
                    ]
                } else {
                    Vec::new()
                },
            })
            .collect();

        ViewModel {
            cluster: ClusterId::Int(2).key(),
            name: "Leśni wędrowcy".to_string(),
            description: "Lubią las i góry".to_string(),
            cohort_size: 15,
            distributions,
        }
    }

    #[test]
    fn test_render_summary() {
        let summary = render_summary(&create_test_view());

        assert!(summary.contains("You are closest to the group: Leśni wędrowcy"));
        assert!(summary.contains("(Cluster 2)"));
        assert!(summary.contains("Lubią las i góry"));
        assert!(summary.contains("People in your group: 15"));
        assert!(summary.contains("Gender distribution in the group"));
        assert!(summary.contains("(no answers)"));
    }

    #[test]
    fn test_text_bars_scale_to_largest_bin() {
        let view = create_test_view();
        let gender = render_text_distribution(&view.distributions[4]);

        let lines: Vec<&str> = gender.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("  Mężczyzna | "));
        assert!(lines[2].ends_with(&format!("{} 10", "#".repeat(TEXT_BAR_WIDTH))));
        assert!(lines[3].starts_with("  Kobieta   | "));
        assert!(lines[3].ends_with(&format!("{} 5", "#".repeat(TEXT_BAR_WIDTH / 2))));
    }

    #[test]
    fn test_chart_file_names() {
        let view = create_test_view();
        let names: Vec<String> = view.distributions.iter().map(chart_file_name).collect();
        assert_eq!(
            names,
            vec!["age.png", "edu_level.png", "fav_animals.png", "fav_place.png", "gender.png"]
        );
    }
}
