//! Runs a random insert-then-delete workload against `ChainedMap` and plots how
//! its bucket array follows the entry count.
#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::too_many_lines)]

use chained_map::{BucketDiagnostics, ChainedMap, MapError};
use plotters::prelude::*;
use rand::{Rng, seq::SliceRandom};

// Distinct keys inserted before the delete phase starts
const KEY_COUNT: usize = 2_000;

#[derive(Debug, Clone, Copy)]
struct Sample {
    len: usize,
    capacity: usize,
    load_factor: f64,
    longest_chain: usize,
}

impl Sample {
    fn of(map: &ChainedMap<i64, usize>) -> Self {
        Self {
            len: map.len(),
            capacity: map.capacity(),
            load_factor: map.load_factor(),
            longest_chain: map.longest_chain(),
        }
    }
}

// Inserts KEY_COUNT random keys, then deletes them all in shuffled order,
// sampling the map after every operation
fn run_workload(map: &mut ChainedMap<i64, usize>) -> Result<Vec<Sample>, MapError> {
    let mut rng = rand::rng();
    let mut keys: Vec<i64> = Vec::with_capacity(KEY_COUNT);
    let mut samples = vec![Sample::of(map)];

    while keys.len() < KEY_COUNT {
        let key: i64 = rng.random();
        if map.contains(&key) {
            continue;
        }
        map.set(key, keys.len());
        keys.push(key);
        samples.push(Sample::of(map));
    }

    keys.shuffle(&mut rng);
    for key in &keys {
        map.delete(key)?;
        samples.push(Sample::of(map));
    }

    Ok(samples)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut map = ChainedMap::new();
    let samples = run_workload(&mut map)?;
    let grow_threshold = map.policy().grow_threshold();
    let shrink_threshold = map.policy().shrink_threshold();

    let resizes = samples.windows(2).filter(|pair| pair[0].capacity != pair[1].capacity).count();
    let peak_capacity = samples.iter().map(|s| s.capacity).max().unwrap_or(0);
    let worst_chain = samples.iter().map(|s| s.longest_chain).max().unwrap_or(0);
    println!("Operations: {}", samples.len() - 1);
    println!("Resizes: {resizes}, peak capacity: {peak_capacity}, longest chain: {worst_chain}");

    let font_family = "sans-serif";
    let line_width = 2;
    let text_size = 16;
    let title_size = 30;
    let operations = samples.len();

    // Plot 1: capacity and entry count
    let root = BitMapBackend::new("capacity_profile.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = peak_capacity as f64 * 1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Bucket Count Under Insert-Then-Delete Workload", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..operations, 0.0..max_count)?;

    chart
        .configure_mesh()
        .x_desc("Operation")
        .y_desc("Count")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let capacity_style = ShapeStyle::from(&BLUE).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, s)| (i, s.capacity as f64)),
            capacity_style,
        ))?
        .label("Capacity (buckets)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], capacity_style));

    let len_style = ShapeStyle::from(&RED).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, s)| (i, s.len as f64)),
            len_style,
        ))?
        .label("Entries")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], len_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;

    // Plot 2: load factor against thresholds, longest chain below
    let root = BitMapBackend::new("load_factor_profile.png", (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    let max_load = samples.iter().map(|s| s.load_factor).fold(grow_threshold, f64::max) * 1.1;

    let mut load_chart = ChartBuilder::on(&areas[0])
        .caption("Load Factor per Operation", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..operations, 0.0..max_load)?;

    load_chart
        .configure_mesh()
        .x_desc("Operation")
        .y_desc("Entries / Buckets")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    for (threshold, label, color) in
        [(grow_threshold, "Grow threshold", RED), (shrink_threshold, "Shrink threshold", GREEN)]
    {
        let threshold_style = ShapeStyle::from(&color.mix(0.5)).stroke_width(1);
        load_chart
            .draw_series(LineSeries::new(
                vec![(0, threshold), (operations, threshold)],
                threshold_style,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));
    }

    let load_style = ShapeStyle::from(&BLUE).stroke_width(line_width);
    load_chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, s)| (i, s.load_factor)),
            load_style,
        ))?
        .label("Load factor")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], load_style));

    load_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    let max_chain = (worst_chain as f64 + 1.0) * 1.1;

    let mut chain_chart = ChartBuilder::on(&areas[1])
        .caption("Longest Chain per Operation", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..operations, 0.0..max_chain)?;

    chain_chart
        .configure_mesh()
        .x_desc("Operation")
        .y_desc("Entries in longest bucket")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    chain_chart.draw_series(LineSeries::new(
        samples.iter().enumerate().map(|(i, s)| (i, s.longest_chain as f64)),
        ShapeStyle::from(&MAGENTA).stroke_width(line_width),
    ))?;

    root.present()?;

    println!("Generated plot images: capacity_profile.png, load_factor_profile.png");

    Ok(())
}
