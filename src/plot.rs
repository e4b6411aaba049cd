use std::error::Error;
use std::f64::consts::TAU;
use std::path::PathBuf;

use plotters::prelude::*;

use crate::trajectory::Trajectory;

/// Plots the ground track of a trajectory around the target, with the landing
/// tolerance circle, into `<name>.png`. Lengths are expected in metres.
pub fn plot(
    name: &str,
    trajectory: &Trajectory,
    landing_radius: f64,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = PathBuf::from(format!("{}.png", name.to_lowercase().replace(' ', "_")));

    let track: Vec<(f64, f64)> = trajectory
        .waypoints
        .iter()
        .map(|w| {
            let offset = w.offset();
            (offset.x, offset.y)
        })
        .collect();
    let extent = track
        .iter()
        .fold(landing_radius, |acc, &(x, y)| acc.max(x.abs()).max(y.abs()))
        * 1.1;

    let tolerance: Vec<(f64, f64)> = (0..=64)
        .map(|i| {
            let a = i as f64 * TAU / 64.0;
            (landing_radius * a.cos(), landing_radius * a.sin())
        })
        .collect();

    {
        let root = BitMapBackend::new(&path, (800, 800)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(name, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-extent..extent, -extent..extent)?;

        chart
            .configure_mesh()
            .x_desc("East (m)")
            .y_desc("North (m)")
            .draw()?;

        chart
            .draw_series(LineSeries::new(tolerance, &RED))?
            .label("Landing tolerance")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .draw_series(LineSeries::new(track.iter().copied(), &BLUE))?
            .label("Trajectory")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        // Release point
        chart.draw_series(
            track
                .iter()
                .take(1)
                .map(|&point| Circle::new(point, 4, GREEN.filled())),
        )?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(path)
}
