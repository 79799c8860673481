use alphapoly2d::mask::BitMask;
use alphapoly2d::math::{Point, Real};
use alphapoly2d::transformation::simplify::douglas_peucker;
use alphapoly2d::transformation::{simplify, trace_boundary, Simplifier};

fn traced_blob(seed: u64) -> Vec<Point<Real>> {
    let mut rng = oorandom::Rand32::new(seed);
    let bumps: Vec<(f32, f32)> = (0..3)
        .map(|_| (2.0 + rng.rand_float() * 3.0, rng.rand_float() * 6.0))
        .collect();

    // A star-shaped blob: its radius wobbles with the angle.
    let mask = BitMask::from_fn(40, 40, |x, y| {
        let dx = x as f32 + 0.5 - 20.0;
        let dy = y as f32 + 0.5 - 20.0;
        let angle = dy.atan2(dx);
        let radius = 12.0
            + bumps
                .iter()
                .map(|(freq, phase)| (angle * freq.floor() + phase).sin())
                .sum::<f32>();
        dx * dx + dy * dy <= radius * radius
    });

    trace_boundary(&mask, false)
        .unwrap()
        .outer
        .iter()
        .map(|p| Point::new(p.x as Real, p.y as Real))
        .collect()
}

#[test]
fn douglas_peucker_is_idempotent() {
    for seed in 0..8 {
        let outline = traced_blob(seed);

        for tolerance in [0.5, 1.0, 2.5] {
            let once = douglas_peucker(&outline, tolerance);
            let twice = douglas_peucker(&once, tolerance);
            assert_eq!(once, twice);
            assert!(once.len() <= outline.len());
            assert_eq!(once[0], outline[0]);
        }
    }
}

#[test]
fn simplification_never_grows_loops() {
    let outline = traced_blob(123);

    for simplifier in Simplifier::ALL {
        let simplified = simplify(&outline, simplifier, 1.0, 3);
        assert!(simplified.len() <= outline.len(), "{simplifier}");
    }

    assert_eq!(simplify(&outline, Simplifier::None, 1.0, 3), outline);
}
