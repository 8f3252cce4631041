use fractal_sampler::{
    BifurcationParams, C, ColorScheme, Message, RasterParams, RasterResolution, Resolution,
    color_for, evaluate, render_region, sample_bifurcation
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn points_outside_radius_two_escape() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let radius = rng.gen_range(2.001..50.0);
        let theta = rng.gen_range(0.0..std::f64::consts::TAU);
        let max_iter = rng.gen_range(2..500);
        let e = evaluate(C::from_polar(radius, theta), max_iter, 2.0);
        assert!(e.iterations < max_iter, "c at radius {} did not escape", radius);
    }
}

#[test]
fn inside_set_reports_max_iterations() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        // disc of radius 1/4 around the origin lies inside the main cardioid
        let c = C::from_polar(rng.gen_range(0.0..0.24), rng.gen_range(0.0..std::f64::consts::TAU));
        let max_iter = rng.gen_range(1..300);
        assert_eq!(evaluate(c, max_iter, 2.0).iterations, max_iter);
    }
}

#[test]
fn default_view_first_band() {
    let params = RasterParams {
        max_iterations: 50,
        resolution: RasterResolution::Low,
        custom_resolution: None,
        color_scheme: ColorScheme::Classic,
        escape_radius: 2.0,
        zoom_region: None,
    };

    let first = render_region(params).next().unwrap();
    let progress = first.progress();
    let frame = first.into_payload().unwrap();

    assert_eq!((frame.width, frame.height), (2048, 1365));
    assert_eq!(frame.buffer.len(), 2048 * 1365 * 4);
    assert_eq!(progress, 50.0 / 1365.0);
    assert_eq!(frame.rows, 0..50);

    // top-left corner is c = -2.5 - 2i: out after a single step
    let corner = evaluate(C::new(-2.5, -2.0), 50, 2.0);
    assert_eq!(corner.iterations, 1);
    assert_eq!(frame.pixel(0, 0), color_for(corner.smoothed, 50, ColorScheme::Classic));

    // nothing below the first band has been written yet
    assert_eq!(frame.pixel(0, 50), [0, 0, 0, 0]);
}

#[test]
fn bifurcation_progress_is_monotone_and_ends_at_one() {
    let params = BifurcationParams {
        start_r: 2.6,
        end_r: 3.05,
        resolution: Resolution::Low,
        accuracy_value: 0.001,
        max_iterations: 40,
        warmup_iterations: 60,
    };

    let messages: Vec<_> = sample_bifurcation(params).collect();
    let progress: Vec<f64> = messages.iter().map(Message::progress).collect();

    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
    assert_eq!(progress[progress.len() - 2], 1.0);
    assert!(messages.last().unwrap().is_complete());
    assert_eq!(messages.iter().filter(|m| m.is_complete()).count(), 1);
}
