//! Line plot of the intensity series

use chrono::Datelike;
use log::info;
use plotters::prelude::*;
use plotters::style::register_font;
use std::error::Error;
use std::path::Path;

use crate::error::{NightError, NightResult};

use super::{IntensitySample, IntensitySeries};

/// Pixel size of the rendered plot
pub const PLOT_SIZE: (u32, u32) = (1200, 600);

const LINE_COLOR: RGBColor = RGBColor(30, 144, 255);

const FONT_FAMILY: &str = "sans-serif";

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Renders `series` as a PNG line plot at `path`
///
/// Samples are placed one per slot in date order; only January samples
/// get an x-axis label.
///
/// # Returns
/// The number of points drawn
pub fn draw_intensity_plot(series: &IntensitySeries, path: &Path) -> NightResult<usize> {
    if series.is_empty() {
        return Err(NightError::Plot("no samples to plot".to_string()));
    }
    register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS)
        .map_err(|_| NightError::Plot("embedded font could not be loaded".to_string()))?;
    let points = draw(series, path).map_err(|e| NightError::Plot(format!("{}: {}", path.display(), e)))?;
    info!("Plot of {} points saved as {}", points, path.display());
    Ok(points)
}

/// X-axis label of `slot`: YYYY-MM for January samples, blank otherwise
///
/// Slots run from -1 to `samples.len()`; the two outer ones are padding.
pub fn tick_label(samples: &[IntensitySample], slot: i32) -> String {
    usize::try_from(slot)
        .ok()
        .and_then(|i| samples.get(i))
        .filter(|s| s.date.month() == 1)
        .map(|s| s.date.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn value_range(series: &IntensitySeries) -> Option<(f64, f64)> {
    let finite = series.samples().iter().map(|s| s.mean_value).filter(|v| v.is_finite());
    let (lo, hi) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    Some((lo - pad, hi + pad))
}

fn draw(series: &IntensitySeries, path: &Path) -> Result<usize, Box<dyn Error>> {
    let samples = series.samples();
    let count = samples.len() as i32;
    let (y_min, y_max) = value_range(series).ok_or("no finite sample values")?;

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Changes in Pixel Intensity Over Time", (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(-1i32..count, y_min..y_max)?;

    let january_label = |slot: &i32| tick_label(samples, *slot);

    chart.configure_mesh()
        .x_labels(samples.len() + 2)
        .x_label_formatter(&january_label)
        .x_desc("Month")
        .y_desc("Average Radiance (nW/cm²/sr)")
        .x_label_style((FONT_FAMILY, 14))
        .y_label_style((FONT_FAMILY, 14))
        .draw()?;

    let points: Vec<(i32, f64)> = samples.iter()
        .enumerate()
        .map(|(i, s)| (i as i32, s.mean_value))
        .collect();

    chart.draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))?;
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, LINE_COLOR.filled())))?;

    root.present()?;
    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::IntensitySeriesBuilder;
    use chrono::NaiveDate;
    use std::fs;

    fn monthly_series(first_year: i32, months: u32) -> IntensitySeries {
        let mut builder = IntensitySeriesBuilder::new();
        for i in 0..months {
            let year = first_year + (i / 12) as i32;
            let date = NaiveDate::from_ymd_opt(year, i % 12 + 1, 1).unwrap();
            builder.push(IntensitySample { date, mean_value: (i % 5) as f64 });
        }
        builder.build(NaiveDate::MIN, NaiveDate::MAX).unwrap()
    }

    #[test]
    fn writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.png");
        let mut builder = IntensitySeriesBuilder::new();
        for (i, m) in [(0, 11), (1, 12)] {
            builder.push(IntensitySample { date: NaiveDate::from_ymd_opt(2015, m, 1).unwrap(), mean_value: i as f64 });
        }
        builder.push(IntensitySample { date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(), mean_value: 4.0 });
        let series = builder.build(NaiveDate::MIN, NaiveDate::MAX).unwrap();

        assert_eq!(draw_intensity_plot(&series, &path).unwrap(), 3);

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), PLOT_SIZE);
    }

    #[test]
    fn only_january_slots_are_labeled() {
        let series = monthly_series(2015, 14);
        let samples = series.samples();

        let labels: Vec<String> = (-1..=samples.len() as i32).map(|slot| tick_label(samples, slot)).collect();
        let labeled: Vec<(usize, &str)> = labels.iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, l)| (i, l.as_str()))
            .collect();

        // index 0 is slot -1
        assert_eq!(labeled, vec![(1, "2015-01"), (13, "2016-01")]);
        assert_eq!(tick_label(samples, -1), "");
        assert_eq!(tick_label(samples, samples.len() as i32), "");
    }

    #[test]
    fn axis_labels_are_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let earlier = dir.path().join("2015.png");
        let later = dir.path().join("2019.png");

        draw_intensity_plot(&monthly_series(2015, 13), &earlier).unwrap();
        draw_intensity_plot(&monthly_series(2019, 13), &later).unwrap();

        // the series differ only in the years printed under January
        let a = image::open(&earlier).unwrap().to_rgb8();
        let b = image::open(&later).unwrap().to_rgb8();
        assert_eq!(a.dimensions(), b.dimensions());
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn single_sample_gets_padded_axis() {
        let mut builder = IntensitySeriesBuilder::new();
        builder.push(IntensitySample { date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(), mean_value: 3.0 });
        let series = builder.build(NaiveDate::MIN, NaiveDate::MAX).unwrap();
        assert_eq!(value_range(&series), Some((2.0, 4.0)));
    }
}
